// Copyright (c) 2026 rezky_nightky

use glam::Vec2;
use rand::rngs::StdRng;

use crate::collision::{soak, Aabb};
use crate::config::{SceneConfig, BACKDROP, HUD_COLOR};
use crate::font::Font;
use crate::rain::RainSet;
use crate::render::Canvas;
use crate::runtime::{Command, SceneKind};
use crate::shelter::Shelter;

pub struct Scene {
    kind: SceneKind,
    world: Vec2,
    rain: RainSet,
    shelter: Option<Shelter>,
    hud: Option<Font>,
    paused: bool,
}

impl Scene {
    pub fn downpour(config: &SceneConfig, world: Vec2, rng: StdRng) -> Self {
        Self {
            kind: SceneKind::Downpour,
            world,
            rain: RainSet::new(config.rain.clone(), world, rng),
            shelter: None,
            hud: None,
            paused: false,
        }
    }

    pub fn shelter(config: &SceneConfig, world: Vec2, rng: StdRng, font: Font) -> Self {
        Self {
            kind: SceneKind::Shelter,
            world,
            rain: RainSet::new(config.rain.clone(), world, rng),
            shelter: Some(Shelter::new(config.layout.clone(), &config.mover, world)),
            hud: Some(font),
            paused: false,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn world(&self) -> Vec2 {
        self.world
    }

    pub fn rain(&self) -> &RainSet {
        &self.rain
    }

    #[cfg(test)]
    pub fn shelter_ref(&self) -> Option<&Shelter> {
        self.shelter.as_ref()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn tick(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        let zones: &[Aabb] = match &self.shelter {
            Some(s) => s.zones(),
            None => &[],
        };
        self.rain.update(dt, zones);

        if let Some(shelter) = self.shelter.as_mut() {
            let mover = shelter.mover_mut();
            if mover.advance(dt) {
                log::info!(
                    "walker arrived with exposure {:.0} ({:.0}% soaked)",
                    mover.exposure(),
                    mover.wetness() * 100.0
                );
            }
            soak(self.rain.drops(), mover);
        }
    }

    pub fn apply(&mut self, cmd: Command) {
        match (self.shelter.as_mut(), cmd) {
            (Some(shelter), cmd) => shelter.command(cmd),
            (None, Command::Reset) => {
                log::info!("cleared {} drops", self.rain.len());
                self.rain.clear();
            }
            (None, cmd) => log::debug!("{cmd:?} has nothing to move in {:?}", self.kind),
        }
    }

    pub fn resize(&mut self, world: Vec2) {
        if world == self.world {
            return;
        }
        log::info!("world resized to {}x{}", world.x, world.y);
        self.world = world;
        self.rain.resize(world);
        if let Some(shelter) = self.shelter.as_mut() {
            shelter.resize(world);
        }
    }

    pub fn hud_text(&self) -> Option<String> {
        let shelter = self.shelter.as_ref()?;
        let pct = (shelter.mover().wetness() * 100.0).round() as u32;
        let mut text = format!("WET {pct}%");
        if self.paused {
            text.push_str("  PAUSED");
        }
        Some(text)
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.clear(BACKDROP);
        if let Some(shelter) = &self.shelter {
            shelter.draw_platforms(canvas);
        }
        self.rain.draw(canvas);
        if let Some(shelter) = &self.shelter {
            shelter.mover().draw(canvas);
        }
        if let (Some(font), Some(text)) = (&self.hud, self.hud_text()) {
            let px = canvas.cell_px();
            let cols = (self.world.x / px.x).floor();
            let col = ((cols - font.text_width(&text) as f32) * 0.5).floor().max(2.0);
            let origin = Vec2::new(col, 1.0) * px;
            for rect in font.layout(&text, origin, px) {
                canvas.fill_rect(rect, HUD_COLOR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::config::SpawnPolicy;
    use crate::cell::Cell;
    use crate::frame::Frame;
    use crate::render::tests::Recorder;
    use crate::render::TermCanvas;
    use crate::runtime::{ColorMode, DisplayMode};
    use crate::viewport::Viewport;

    const WORLD: Vec2 = Vec2::new(1280.0, 720.0);

    fn hud_font() -> Font {
        Font::parse(
            "height 1\nglyph W\n#\nglyph E\n#\nglyph T\n#\nglyph space\n.\nglyph %\n#\n\
             glyph 0\n#\nglyph 1\n#\nglyph 2\n#\nglyph 3\n#\nglyph 4\n#\nglyph 5\n#\n\
             glyph 6\n#\nglyph 7\n#\nglyph 8\n#\nglyph 9\n#\n",
        )
        .expect("valid font")
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn downpour_rains_and_reset_clears() {
        let mut scene = Scene::downpour(&SceneConfig::default(), WORLD, rng());
        for _ in 0..10 {
            scene.tick(1.0 / 60.0);
        }
        assert_eq!(scene.rain().len(), 50);

        scene.apply(Command::Walk);
        scene.apply(Command::Reset);
        assert!(scene.rain().is_empty());
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut scene = Scene::downpour(&SceneConfig::default(), WORLD, rng());
        scene.tick(1.0 / 60.0);
        let before = scene.rain().drops().to_vec();
        scene.toggle_pause();
        scene.tick(1.0);
        assert_eq!(scene.rain().drops(), &before[..]);
        scene.toggle_pause();
        scene.tick(1.0 / 60.0);
        assert_ne!(scene.rain().drops(), &before[..]);
    }

    #[test]
    fn draw_clears_once_before_any_rect() {
        let mut scene = Scene::shelter(&SceneConfig::default(), WORLD, rng(), hud_font());
        scene.tick(1.0 / 60.0);
        let mut rec = Recorder::default();
        scene.draw(&mut rec);

        assert_eq!(rec.clears, vec![BACKDROP]);
        assert_eq!(rec.rects_before_clear, 0);
        // two roofs, five drops, the walker, then HUD text
        assert!(rec.rects.len() > 2 + 5 + 1);
        let walker = scene.shelter_ref().map(|s| s.mover().bounds());
        assert_eq!(rec.rects.get(7).map(|r| r.0), walker);
    }

    #[test]
    fn walker_gets_wet_crossing_in_the_rain() {
        let config = SceneConfig {
            rain: crate::config::RainConfig {
                spawn: SpawnPolicy::Capped {
                    per_tick: 40,
                    ceiling: 4000,
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let mut scene = Scene::shelter(&config, WORLD, rng(), hud_font());
        // let the sky fill up first
        for _ in 0..300 {
            scene.tick(1.0 / 60.0);
        }
        let dry = scene.shelter_ref().map(|s| s.mover().exposure());
        assert_eq!(dry, Some(0.0));

        scene.apply(Command::Walk);
        let mut last = 0.0;
        for _ in 0..600 {
            scene.tick(1.0 / 60.0);
            let now = scene.shelter_ref().map(|s| s.mover().exposure()).unwrap_or(0.0);
            assert!(now >= last);
            last = now;
        }
        assert!(last > 0.0);
        assert!(scene.hud_text().is_some_and(|t| t.starts_with("WET ")));
    }

    #[test]
    fn roofs_swallow_the_rain_above_them() {
        let mut scene = Scene::shelter(&SceneConfig::default(), WORLD, rng(), hud_font());
        for _ in 0..400 {
            scene.tick(1.0 / 60.0);
        }
        let zones = scene.shelter_ref().map(|s| s.zones().to_vec()).unwrap_or_default();
        assert!(scene
            .rain()
            .drops()
            .iter()
            .all(|d| !zones.iter().any(|z| z.contains(d.pos))));
    }

    #[test]
    fn resize_keeps_rain_and_walker_state() {
        let mut scene = Scene::shelter(&SceneConfig::default(), WORLD, rng(), hud_font());
        for _ in 0..5 {
            scene.tick(1.0 / 60.0);
        }
        let drops = scene.rain().len();
        scene.apply(Command::Walk);
        scene.resize(Vec2::new(640.0, 360.0));

        assert_eq!(scene.world(), Vec2::new(640.0, 360.0));
        assert_eq!(scene.rain().len(), drops);
        assert_eq!(scene.rain().bounds(), Vec2::new(640.0, 360.0));
        assert!(scene.shelter_ref().is_some_and(|s| s.mover().is_moving()));
    }

    #[test]
    fn hud_stays_legible_in_a_squeezed_window() {
        let vp = Viewport::fit(DisplayMode::Windowed, 80, 24);
        let mut frame = Frame::new(80, 24);
        let scene = Scene::shelter(&SceneConfig::default(), vp.world, rng(), hud_font());
        scene.draw(&mut TermCanvas::new(&mut frame, &vp, ColorMode::TrueColor));

        let cells: Vec<Cell> = (0..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter_map(|(x, y)| frame.get(x, y).copied())
            .collect();
        assert!(cells.iter().all(|c| c.ch != '│'));

        let lit = Some(HUD_COLOR.over(BACKDROP));
        let hud_row = vp.row0 + 1;
        let hud_cells = (0..80)
            .filter(|&x| frame.get(x, hud_row).and_then(|c| c.bg) == lit)
            .count();
        // W, E, T, 0 and % are one lit pixel each in the test font
        assert_eq!(hud_cells, 5);
    }

    #[test]
    fn hud_reports_pause() {
        let mut scene = Scene::shelter(&SceneConfig::default(), WORLD, rng(), hud_font());
        assert_eq!(scene.hud_text().as_deref(), Some("WET 0%"));
        scene.toggle_pause();
        assert_eq!(scene.hud_text().as_deref(), Some("WET 0%  PAUSED"));
        assert!(Scene::downpour(&SceneConfig::default(), WORLD, rng())
            .hud_text()
            .is_none());
    }
}
