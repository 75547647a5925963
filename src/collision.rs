// Copyright (c) 2026 rezky_nightky

use glam::Vec2;

use crate::mover::Mover;
use crate::raindrop::Raindrop;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[cfg(test)]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    // Shared edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    // Edges included.
    pub fn contains(&self, p: Vec2) -> bool {
        let in_x = p.x >= self.min.x && p.x <= self.max.x;
        let in_y = p.y >= self.min.y && p.y <= self.max.y;
        in_x && in_y
    }
}

// Drops are not consumed; one keeps soaking for as long as it overlaps.
pub fn soak(drops: &[Raindrop], mover: &mut Mover) -> usize {
    let body = mover.bounds();
    let mut hits = 0;
    for drop in drops.iter().filter(|d| d.bounds().overlaps(&body)) {
        mover.add_exposure(drop.area());
        hits += 1;
    }
    hits
}
