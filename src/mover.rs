// Copyright (c) 2026 rezky_nightky

use glam::Vec2;

use crate::collision::Aabb;
use crate::color::Rgba;
use crate::config::MoverConfig;
use crate::render::Canvas;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveState {
    Idle,
    Moving { target: Vec2, speed: f32 },
}

#[derive(Clone, Debug)]
pub struct Mover {
    pos: Vec2,
    size: Vec2,
    state: MoveState,
    exposure: f32,
    arrive_threshold: f32,
    exposure_cap: f32,
    dry: Rgba,
    soaked: Rgba,
}

impl Mover {
    pub fn new(pos: Vec2, config: &MoverConfig) -> Self {
        Self {
            pos,
            size: config.size,
            state: MoveState::Idle,
            exposure: 0.0,
            arrive_threshold: config.arrive_threshold,
            exposure_cap: config.exposure_cap,
            dry: config.dry,
            soaked: config.soaked,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[cfg(test)]
    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MoveState::Moving { .. })
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn start_move(&mut self, target: Vec2, speed: f32) -> bool {
        if self.is_moving() {
            return false;
        }
        self.state = MoveState::Moving { target, speed };
        true
    }

    pub fn advance(&mut self, dt: f32) -> bool {
        let MoveState::Moving { target, speed } = self.state else {
            return false;
        };

        let to_target = target - self.pos;
        let remaining = to_target.length();
        let step = speed * dt;
        if remaining < self.arrive_threshold || step >= remaining {
            self.pos = target;
            self.state = MoveState::Idle;
            return true;
        }

        self.pos += to_target / remaining * step;
        false
    }

    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.state = MoveState::Idle;
        self.exposure = 0.0;
    }

    pub fn add_exposure(&mut self, amount: f32) {
        if amount > 0.0 {
            self.exposure += amount;
        }
    }

    pub fn wetness(&self) -> f32 {
        if self.exposure_cap <= 0.0 {
            return 1.0;
        }
        self.exposure.min(self.exposure_cap) / self.exposure_cap
    }

    pub fn visual_state(&self) -> Rgba {
        self.dry.lerp(self.soaked, self.wetness())
    }

    // Moves the walker without touching exposure. A running move keeps its
    // speed and heads for `retarget(old_target)`.
    pub fn relocate(&mut self, pos: Vec2, retarget: impl FnOnce(Vec2) -> Vec2) {
        self.pos = pos;
        if let MoveState::Moving { target, speed } = self.state {
            self.state = MoveState::Moving {
                target: retarget(target),
                speed,
            };
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.fill_rect(self.bounds(), self.visual_state());
    }
}
