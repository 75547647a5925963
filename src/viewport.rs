// Copyright (c) 2026 rezky_nightky

use std::ops::Range;

use glam::Vec2;

use crate::cell::Cell;
use crate::collision::Aabb;
use crate::color::Rgba;
use crate::config::{CELL_PX, WINDOWED_SIZE};
use crate::frame::Frame;
use crate::runtime::DisplayMode;

// Rounding slack, in cells, so edges that land on a cell boundary do not spill.
const SNAP_CELLS: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub mode: DisplayMode,
    pub col0: u16,
    pub row0: u16,
    pub cols: u16,
    pub rows: u16,
    pub world: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellSpan {
    pub cols: Range<u16>,
    pub rows: Range<u16>,
    pub footprint: Vec2,
}

impl Viewport {
    pub fn fit(mode: DisplayMode, term_cols: u16, term_rows: u16) -> Self {
        match mode {
            DisplayMode::Fullscreen => Self {
                mode,
                col0: 0,
                row0: 0,
                cols: term_cols,
                rows: term_rows,
                world: Vec2::new(term_cols as f32, term_rows as f32) * CELL_PX,
            },
            DisplayMode::Windowed => {
                let want = WINDOWED_SIZE / CELL_PX;
                let cols = (want.x as u16).min(term_cols.saturating_sub(2)).max(1);
                let rows = (want.y as u16).min(term_rows.saturating_sub(2)).max(1);
                Self {
                    mode,
                    col0: term_cols.saturating_sub(cols) / 2,
                    row0: term_rows.saturating_sub(rows) / 2,
                    cols,
                    rows,
                    world: WINDOWED_SIZE,
                }
            }
        }
    }

    // World pixels per cell. Falls back to `CELL_PX` for an empty world.
    pub fn cell_px(&self) -> Vec2 {
        let s = self.scale();
        if s.x > 0.0 && s.y > 0.0 {
            Vec2::ONE / s
        } else {
            CELL_PX
        }
    }

    pub fn scale(&self) -> Vec2 {
        if self.world.x <= 0.0 || self.world.y <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.cols as f32, self.rows as f32) / self.world
    }

    // Anything that touches the viewport covers at least one cell.
    pub fn span(&self, rect: &Aabb) -> Option<CellSpan> {
        let s = self.scale();
        let lo = rect.min * s;
        let hi = rect.max * s;
        let (cols, rows) = (self.cols as f32, self.rows as f32);
        let outside = hi.x <= 0.0 || hi.y <= 0.0 || lo.x >= cols || lo.y >= rows;
        if outside || hi.x <= lo.x || hi.y <= lo.y {
            return None;
        }

        let axis = |lo: f32, hi: f32, len: f32, origin: u16| {
            let start = (lo + SNAP_CELLS).floor().max(0.0);
            let end = (hi - SNAP_CELLS).ceil().min(len).max(start + 1.0);
            (origin + start as u16)..(origin + end as u16)
        };

        Some(CellSpan {
            cols: axis(lo.x, hi.x, cols, self.col0),
            rows: axis(lo.y, hi.y, rows, self.row0),
            footprint: hi - lo,
        })
    }

    pub fn cols_range(&self) -> Range<u16> {
        self.col0..self.col0 + self.cols
    }

    pub fn rows_range(&self) -> Range<u16> {
        self.row0..self.row0 + self.rows
    }

    pub fn draw_border(&self, frame: &mut Frame, color: Rgba) {
        if self.mode != DisplayMode::Windowed || self.col0 == 0 || self.row0 == 0 {
            return;
        }
        let left = self.col0 - 1;
        let right = self.col0 + self.cols;
        let top = self.row0 - 1;
        let bottom = self.row0 + self.rows;

        let put = |frame: &mut Frame, x: u16, y: u16, ch: char| {
            frame.set(x, y, Cell::glyph(ch, color, None));
        };
        for x in self.cols_range() {
            put(frame, x, top, '─');
            put(frame, x, bottom, '─');
        }
        for y in self.rows_range() {
            put(frame, left, y, '│');
            put(frame, right, y, '│');
        }
        put(frame, left, top, '┌');
        put(frame, right, top, '┐');
        put(frame, left, bottom, '└');
        put(frame, right, bottom, '┘');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullscreen_world_follows_terminal() {
        let vp = Viewport::fit(DisplayMode::Fullscreen, 100, 40);
        assert_eq!(vp.world, Vec2::new(800.0, 640.0));
        assert_eq!(vp.scale(), Vec2::new(1.0 / 8.0, 1.0 / 16.0));
        assert_eq!((vp.col0, vp.row0, vp.cols, vp.rows), (0, 0, 100, 40));
    }

    #[test]
    fn windowed_is_centred_and_fixed_size() {
        let vp = Viewport::fit(DisplayMode::Windowed, 200, 60);
        assert_eq!(vp.world, WINDOWED_SIZE);
        assert_eq!((vp.cols, vp.rows), (160, 45));
        assert_eq!((vp.col0, vp.row0), (20, 7));
    }

    #[test]
    fn windowed_squeezes_into_small_terminals() {
        let vp = Viewport::fit(DisplayMode::Windowed, 80, 24);
        assert_eq!((vp.cols, vp.rows), (78, 22));
        assert_eq!((vp.col0, vp.row0), (1, 1));
        assert_eq!(vp.world, WINDOWED_SIZE);
    }

    #[test]
    fn thin_rect_still_covers_a_cell() {
        let vp = Viewport::fit(DisplayMode::Fullscreen, 100, 40);
        let drop = Aabb::from_pos_size(Vec2::new(400.0, 32.0), Vec2::new(2.0, 4.0));
        let span = vp.span(&drop).expect("on screen");
        assert_eq!(span.cols, 50..51);
        assert_eq!(span.rows, 2..3);
        assert!(span.footprint.x < 0.5);
    }

    #[test]
    fn offscreen_and_partial_rects() {
        let vp = Viewport::fit(DisplayMode::Fullscreen, 10, 10);
        let above = Aabb::from_pos_size(Vec2::new(0.0, -104.0), Vec2::new(2.0, 4.0));
        assert!(vp.span(&above).is_none());

        let straddling = Aabb::from_pos_size(Vec2::new(-8.0, -8.0), Vec2::new(24.0, 24.0));
        let span = vp.span(&straddling).expect("partly visible");
        assert_eq!(span.cols, 0..2);
        assert_eq!(span.rows, 0..1);
    }

    #[test]
    fn cell_sized_rects_land_on_exactly_one_cell() {
        let vp = Viewport::fit(DisplayMode::Windowed, 80, 24);
        let px = vp.cell_px();
        let rect = Aabb::from_pos_size(px * Vec2::new(7.0, 3.0), px);
        let span = vp.span(&rect).expect("on screen");
        assert_eq!(span.cols, 8..9);
        assert_eq!(span.rows, 4..5);
        assert!((span.footprint - Vec2::ONE).length() < 1e-3);

        assert_eq!(Viewport::fit(DisplayMode::Fullscreen, 0, 0).cell_px(), CELL_PX);
    }

    #[test]
    fn span_is_offset_by_window_origin() {
        let vp = Viewport::fit(DisplayMode::Windowed, 200, 60);
        let rect = Aabb::from_pos_size(Vec2::ZERO, Vec2::new(8.0, 16.0));
        let span = vp.span(&rect).expect("on screen");
        assert_eq!(span.cols, 20..21);
        assert_eq!(span.rows, 7..8);
    }

    #[test]
    fn border_wraps_windowed_viewport() {
        let vp = Viewport::fit(DisplayMode::Windowed, 200, 60);
        let mut frame = Frame::new(200, 60);
        vp.draw_border(&mut frame, Rgba::rgb(1, 1, 1));
        assert_eq!(frame.get(19, 6).map(|c| c.ch), Some('┌'));
        assert_eq!(frame.get(180, 52).map(|c| c.ch), Some('┘'));
        assert_eq!(frame.get(20, 7).map(|c| c.ch), Some(' '));
    }
}
