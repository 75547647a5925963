// Copyright (c) 2026 rezky_nightky

use std::ops::Range;

use crate::cell::Cell;

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    pub fn clear(&mut self, blank: Cell) {
        self.cells.fill(blank);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(Cell::BLANK)
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn update_region(&mut self, cols: Range<u16>, rows: Range<u16>, f: impl Fn(Cell) -> Cell) {
        let cols = cols.start.min(self.width)..cols.end.min(self.width);
        for y in rows.start..rows.end.min(self.height) {
            let row = y as usize * self.width as usize;
            for x in cols.clone() {
                let i = row + x as usize;
                self.cells[i] = f(self.cells[i]);
            }
        }
    }
}
