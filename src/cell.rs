// Copyright (c) 2026 rezky_nightky

use crate::color::Rgba;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: None,
        bg: None,
    };

    pub fn solid(bg: Rgba) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: Some(bg),
        }
    }

    pub fn glyph(ch: char, fg: Rgba, bg: Option<Rgba>) -> Self {
        Self {
            ch,
            fg: Some(fg),
            bg,
        }
    }
}
