// Copyright (c) 2026 rezky_nightky

use glam::Vec2;

use crate::collision::Aabb;
use crate::color::Rgba;

pub const SPAWN_MARGIN: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Raindrop {
    pub pos: Vec2,
    pub vel: Vec2,
    size: Vec2,
    color: Rgba,
}

impl Raindrop {
    pub fn new(x: f32, size: f32, color: Rgba) -> Self {
        let size = Vec2::new(size, size * 2.0);
        Self {
            pos: Vec2::new(x, -size.y - SPAWN_MARGIN),
            vel: Vec2::ZERO,
            size,
            color,
        }
    }

    pub fn advance(&mut self, gravity: f32, dt: f32) {
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
    }

    #[cfg(test)]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}
