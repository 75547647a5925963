// Copyright (c) 2026 rezky_nightky

use glam::Vec2;

use crate::cell::Cell;
use crate::collision::Aabb;
use crate::color::Rgba;
use crate::frame::Frame;
use crate::runtime::ColorMode;
use crate::viewport::Viewport;

pub trait Canvas {
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: Aabb, color: Rgba);
    // World pixels covered by one output cell.
    fn cell_px(&self) -> Vec2;
}

const THIN_CELLS: f32 = 0.5;
const THIN_GLYPH: char = '│';
const MONO_BLOCK: char = '█';

pub struct TermCanvas<'a> {
    frame: &'a mut Frame,
    viewport: &'a Viewport,
    color_mode: ColorMode,
    backdrop: Rgba,
}

impl<'a> TermCanvas<'a> {
    pub fn new(frame: &'a mut Frame, viewport: &'a Viewport, color_mode: ColorMode) -> Self {
        Self {
            frame,
            viewport,
            color_mode,
            backdrop: Rgba::rgb(0, 0, 0),
        }
    }
}

impl Canvas for TermCanvas<'_> {
    fn clear(&mut self, color: Rgba) {
        self.backdrop = Rgba { a: 255, ..color };
        let blank = Cell::solid(self.backdrop);
        self.frame
            .update_region(self.viewport.cols_range(), self.viewport.rows_range(), |_| blank);
    }

    fn cell_px(&self) -> Vec2 {
        self.viewport.cell_px()
    }

    fn fill_rect(&mut self, rect: Aabb, color: Rgba) {
        let Some(span) = self.viewport.span(&rect) else {
            return;
        };
        let backdrop = self.backdrop;
        let mono = self.color_mode == ColorMode::Mono;
        let thin = span.footprint.x < THIN_CELLS;

        self.frame.update_region(span.cols, span.rows, |under| {
            let base = under.bg.unwrap_or(backdrop);
            let blended = color.over(base);
            match (thin, mono) {
                (true, _) => Cell::glyph(THIN_GLYPH, blended, under.bg),
                (false, true) => Cell::glyph(MONO_BLOCK, blended, None),
                (false, false) => Cell::solid(blended),
            }
        });
    }
}
