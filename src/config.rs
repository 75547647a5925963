// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use crate::collision::Aabb;
use crate::color::Rgba;
use crate::runtime::SceneKind;

pub const GRAVITY: f32 = 9.81 * 10.0;
pub const RAINDROP_MIN_SIZE: f32 = 2.0;
pub const RAINDROP_MAX_SIZE: f32 = 5.0;
pub const DROPS_PER_TICK: usize = 5;
pub const MAX_RAINDROPS: usize = 2000;
pub const RAIN_COLOR: Rgba = Rgba::rgba(173, 216, 230, 200);

pub const ACTOR_SIZE: Vec2 = Vec2::new(32.0, 64.0);
pub const WALK_SPEED: f32 = 120.0;
pub const RUN_SPEED: f32 = 360.0;
pub const ARRIVE_THRESHOLD: f32 = 1.0;
pub const MAX_EXPOSURE: f32 = 20_000.0;
pub const DRY_COLOR: Rgba = Rgba::rgb(230, 180, 110);
pub const SOAKED_COLOR: Rgba = Rgba::rgb(40, 80, 200);

pub const BACKDROP: Rgba = Rgba::rgb(10, 12, 22);
pub const PLATFORM_COLOR: Rgba = Rgba::rgb(110, 110, 124);
pub const HUD_COLOR: Rgba = Rgba::rgba(235, 235, 235, 220);
pub const BORDER_COLOR: Rgba = Rgba::rgb(90, 90, 100);

pub const CELL_PX: Vec2 = Vec2::new(8.0, 16.0);
pub const WINDOWED_SIZE: Vec2 = Vec2::new(1280.0, 720.0);
pub const MAX_FRAME_DELTA: f32 = 0.25;

pub const HUD_FONT_PATH: &str = "assets/hud.font";

#[allow(dead_code)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPolicy {
    Unbounded { per_tick: usize },
    Capped { per_tick: usize, ceiling: usize },
    TopUp { ceiling: usize },
}

impl SpawnPolicy {
    pub fn quota(self, live: usize) -> usize {
        match self {
            SpawnPolicy::Unbounded { per_tick } => per_tick,
            SpawnPolicy::Capped { per_tick, ceiling } => per_tick.min(ceiling.saturating_sub(live)),
            SpawnPolicy::TopUp { ceiling } => ceiling.saturating_sub(live),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RainConfig {
    pub gravity: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub spawn: SpawnPolicy,
    pub color: Rgba,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            min_size: RAINDROP_MIN_SIZE,
            max_size: RAINDROP_MAX_SIZE,
            spawn: SpawnPolicy::Capped {
                per_tick: DROPS_PER_TICK,
                ceiling: MAX_RAINDROPS,
            },
            color: RAIN_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoverConfig {
    pub size: Vec2,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub arrive_threshold: f32,
    pub exposure_cap: f32,
    pub dry: Rgba,
    pub soaked: Rgba,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            size: ACTOR_SIZE,
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            arrive_threshold: ARRIVE_THRESHOLD,
            exposure_cap: MAX_EXPOSURE,
            dry: DRY_COLOR,
            soaked: SOAKED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShelterLayout {
    pub left_center: Vec2,
    pub right_center: Vec2,
    pub half_extents: Vec2,
    pub ground: f32,
}

impl Default for ShelterLayout {
    fn default() -> Self {
        Self {
            left_center: Vec2::new(0.15, 0.55),
            right_center: Vec2::new(0.85, 0.55),
            half_extents: Vec2::new(0.12, 0.025),
            ground: 0.92,
        }
    }
}

impl ShelterLayout {
    pub fn platforms(&self, world: Vec2) -> [Aabb; 2] {
        let half = self.half_extents * world;
        [
            Aabb::from_center(self.left_center * world, half),
            Aabb::from_center(self.right_center * world, half),
        ]
    }

    pub fn stations(&self, world: Vec2, actor: Vec2) -> [Vec2; 2] {
        let y = self.ground * world.y - actor.y;
        [
            Vec2::new(self.left_center.x * world.x - actor.x * 0.5, y),
            Vec2::new(self.right_center.x * world.x - actor.x * 0.5, y),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneConfig {
    pub rain: RainConfig,
    pub mover: MoverConfig,
    pub layout: ShelterLayout,
}

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub const KEYS_USAGE: &str = "\
KEYS:
  q, Esc   quit
  F11      toggle fullscreen / windowed
  p        pause
  Space    reset (shelter: walker back home and dry; downpour: clear the sky)
  w        walk to the other shelter
  r        run to the other shelter";

#[derive(Parser, Debug, Clone)]
#[command(name = "drizzle", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "scene",
        default_value_t = SceneKind::Downpour,
        value_enum,
        help_heading = "GENERAL",
        help = "Scene to simulate"
    )]
    pub scene: SceneKind,

    #[arg(
        short = 'W',
        long = "windowed",
        help_heading = "GENERAL",
        help = "Start in a 1280x720 window instead of the full terminal"
    )]
    pub windowed: bool,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for the rain generator (random when omitted)"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: auto-detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "log-file",
        help_heading = "DIAGNOSTICS",
        help = "Write logs (filtered by RUST_LOG, default info) to this file"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_quota_per_policy() {
        let unbounded = SpawnPolicy::Unbounded { per_tick: 5 };
        assert_eq!(unbounded.quota(1_000_000), 5);

        let capped = SpawnPolicy::Capped {
            per_tick: 5,
            ceiling: 10,
        };
        assert_eq!(capped.quota(0), 5);
        assert_eq!(capped.quota(8), 2);
        assert_eq!(capped.quota(12), 0);

        let top_up = SpawnPolicy::TopUp { ceiling: 10 };
        assert_eq!(top_up.quota(3), 7);
        assert_eq!(top_up.quota(10), 0);
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn layout_scales_with_world() {
        let layout = ShelterLayout::default();
        let world = Vec2::new(1000.0, 800.0);
        let [left, right] = layout.platforms(world);
        assert!(close((left.min + left.max) * 0.5, Vec2::new(150.0, 440.0)));
        assert!(close((right.min + right.max) * 0.5, Vec2::new(850.0, 440.0)));
        assert!(close(left.size(), Vec2::new(240.0, 40.0)));

        let [home, away] = layout.stations(world, Vec2::new(20.0, 60.0));
        assert!(close(home, Vec2::new(140.0, 676.0)));
        assert!(close(away, Vec2::new(840.0, 676.0)));
    }

    #[test]
    fn args_parse_scene_and_seed() {
        let args = Args::parse_from(["drizzle", "--scene", "shelter", "--seed", "7", "-W"]);
        assert_eq!(args.scene, SceneKind::Shelter);
        assert_eq!(args.seed, Some(7));
        assert!(args.windowed);
        assert_eq!(args.fps, 60.0);
    }
}
