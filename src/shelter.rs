// Copyright (c) 2026 rezky_nightky

use glam::Vec2;

use crate::collision::Aabb;
use crate::config::{MoverConfig, ShelterLayout, PLATFORM_COLOR};
use crate::mover::Mover;
use crate::render::Canvas;
use crate::runtime::Command;

// A walker this close to a station is standing on it.
const STATION_SNAP: f32 = 0.5;

pub struct Shelter {
    layout: ShelterLayout,
    walk_speed: f32,
    run_speed: f32,
    actor: Vec2,
    world: Vec2,
    platforms: [Aabb; 2],
    stations: [Vec2; 2],
    mover: Mover,
}

impl Shelter {
    pub fn new(layout: ShelterLayout, mover: &MoverConfig, world: Vec2) -> Self {
        let platforms = layout.platforms(world);
        let stations = layout.stations(world, mover.size);
        Self {
            walk_speed: mover.walk_speed,
            run_speed: mover.run_speed,
            actor: mover.size,
            world,
            platforms,
            stations,
            mover: Mover::new(stations[0], mover),
            layout,
        }
    }

    pub fn zones(&self) -> &[Aabb] {
        &self.platforms
    }

    #[cfg(test)]
    pub fn stations(&self) -> [Vec2; 2] {
        self.stations
    }

    pub fn mover(&self) -> &Mover {
        &self.mover
    }

    pub fn mover_mut(&mut self) -> &mut Mover {
        &mut self.mover
    }

    fn far_station(&self) -> Vec2 {
        let pos = self.mover.position();
        let [home, away] = self.stations;
        if pos.distance_squared(home) >= pos.distance_squared(away) {
            home
        } else {
            away
        }
    }

    pub fn command(&mut self, cmd: Command) {
        let speed = match cmd {
            Command::Walk => self.walk_speed,
            Command::Run => self.run_speed,
            Command::Reset => {
                self.mover.reset(self.stations[0]);
                log::info!("walker reset to home shelter");
                return;
            }
        };
        let target = self.far_station();
        if self.mover.start_move(target, speed) {
            log::info!("walker heading to ({:.0}, {:.0}) at {speed} px/s", target.x, target.y);
        } else {
            log::debug!("{cmd:?} ignored, walker already on the move");
        }
    }

    pub fn resize(&mut self, world: Vec2) {
        if world == self.world {
            return;
        }
        let stretch = if self.world.x > 0.0 {
            world.x / self.world.x
        } else {
            1.0
        };
        let old = self.stations;
        self.world = world;
        self.platforms = self.layout.platforms(world);
        self.stations = self.layout.stations(world, self.actor);

        let new = self.stations;
        let follow = |p: Vec2| match old.iter().position(|s| s.distance(p) < STATION_SNAP) {
            Some(i) => new[i],
            None => Vec2::new(p.x * stretch, new[0].y),
        };
        let pos = follow(self.mover.position());
        self.mover.relocate(pos, follow);
    }

    pub fn draw_platforms(&self, canvas: &mut impl Canvas) {
        for p in &self.platforms {
            canvas.fill_rect(*p, PLATFORM_COLOR);
        }
    }
}
