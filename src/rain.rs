// Copyright (c) 2026 rezky_nightky

use glam::Vec2;
use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
};

use crate::collision::Aabb;
use crate::config::RainConfig;
use crate::raindrop::Raindrop;
use crate::render::Canvas;

pub struct RainSet {
    config: RainConfig,
    bounds: Vec2,
    drops: Vec<Raindrop>,
    rng: StdRng,
    rand_x: Option<Uniform<f32>>,
    rand_size: Uniform<f32>,
}

impl RainSet {
    pub fn new(config: RainConfig, bounds: Vec2, rng: StdRng) -> Self {
        let (lo, hi) = if config.min_size <= config.max_size {
            (config.min_size, config.max_size)
        } else {
            (config.max_size, config.min_size)
        };
        let rand_size = Uniform::new_inclusive(lo, hi).unwrap_or_else(|_| {
            Uniform::new_inclusive(1.0, 1.0).expect("1..=1 is a valid range")
        });

        Self {
            config,
            bounds,
            drops: Vec::new(),
            rng,
            rand_x: horizontal_range(bounds.x),
            rand_size,
        }
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    #[cfg(test)]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    #[cfg(test)]
    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn advance(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        for drop in &mut self.drops {
            drop.advance(gravity, dt);
        }
    }

    pub fn cull(&mut self, zones: &[Aabb]) {
        let bottom = self.bounds.y;
        self.drops
            .retain(|d| d.pos.y <= bottom && !zones.iter().any(|z| z.contains(d.pos)));
    }

    pub fn spawn(&mut self) -> usize {
        let count = self.config.spawn.quota(self.drops.len());
        self.drops.reserve(count);
        for _ in 0..count {
            let x = match &self.rand_x {
                Some(dist) => dist.sample(&mut self.rng),
                None => 0.0,
            };
            let size = self.rand_size.sample(&mut self.rng);
            self.drops.push(Raindrop::new(x, size, self.config.color));
        }
        count
    }

    pub fn update(&mut self, dt: f32, zones: &[Aabb]) {
        self.advance(dt);
        self.cull(zones);
        self.spawn();
    }

    pub fn resize(&mut self, bounds: Vec2) {
        if bounds == self.bounds {
            return;
        }
        log::debug!(
            "rain bounds {}x{} -> {}x{} with {} drops alive",
            self.bounds.x,
            self.bounds.y,
            bounds.x,
            bounds.y,
            self.drops.len()
        );
        self.bounds = bounds;
        self.rand_x = horizontal_range(bounds.x);
    }

    pub fn clear(&mut self) {
        self.drops.clear();
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        for drop in &self.drops {
            canvas.fill_rect(drop.bounds(), drop.color());
        }
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, drop: Raindrop) {
        self.drops.push(drop);
    }
}

fn horizontal_range(width: f32) -> Option<Uniform<f32>> {
    if width > 0.0 && width.is_finite() {
        Uniform::new(0.0, width).ok()
    } else {
        None
    }
}
