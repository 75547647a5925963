// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::runtime::ColorMode;

pub struct Terminal {
    stdout: Stdout,
    color_mode: ColorMode,
    last: Option<Frame>,
    run_buf: String,
}

impl Terminal {
    pub fn new(color_mode: ColorMode) -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            color_mode,
            last: None,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn present(&mut self, frame: &Frame) -> Result<()> {
        let full = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);
        if full {
            self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let mut cur_fg: Option<Option<Color>> = None;
        let mut cur_bg: Option<Option<Color>> = None;
        let width = frame.width as usize;

        for y in 0..frame.height {
            let row = y as usize * width;
            let mut x = 0usize;
            while x < width {
                let cell = frame.cell_at_index(row + x);
                if !full && self.last.as_ref().map(|l| l.cell_at_index(row + x)) == Some(cell) {
                    x += 1;
                    continue;
                }

                let fg = cell.fg.and_then(|c| c.to_term(self.color_mode));
                let bg = cell.bg.and_then(|c| c.to_term(self.color_mode));

                self.run_buf.clear();
                self.run_buf.push(cell.ch);
                let start = x;
                x += 1;
                while x < width {
                    let next = frame.cell_at_index(row + x);
                    let unchanged =
                        !full && self.last.as_ref().map(|l| l.cell_at_index(row + x)) == Some(next);
                    if unchanged || !same_style(next, cell) {
                        break;
                    }
                    self.run_buf.push(next.ch);
                    x += 1;
                }

                self.stdout.queue(cursor::MoveTo(start as u16, y))?;
                if cur_fg != Some(fg) {
                    self.stdout.queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
                    cur_fg = Some(fg);
                }
                if cur_bg != Some(bg) {
                    self.stdout.queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
                    cur_bg = Some(bg);
                }
                self.stdout.queue(Print(self.run_buf.as_str()))?;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;

        match self.last.as_mut() {
            Some(last) if !full => last.clone_from(frame),
            _ => self.last = Some(frame.clone()),
        }
        Ok(())
    }
}

fn same_style(a: Cell, b: Cell) -> bool {
    a.fg == b.fg && a.bg == b.bg
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}
