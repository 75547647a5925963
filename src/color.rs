// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        Rgba {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
            a: lerp_u8(self.a, other.a, t),
        }
    }

    pub fn over(self, under: Rgba) -> Rgba {
        let t = self.a as f32 / 255.0;
        Rgba::rgb(
            lerp_u8(under.r, self.r, t),
            lerp_u8(under.g, self.g, t),
            lerp_u8(under.b, self.b, t),
        )
    }

    pub fn to_term(self, mode: ColorMode) -> Option<Color> {
        match mode {
            ColorMode::Mono => None,
            ColorMode::TrueColor => Some(Color::Rgb {
                r: self.r,
                g: self.g,
                b: self.b,
            }),
            ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(self.r, self.g, self.b))),
            ColorMode::Color16 => Some(rgb_to_color16(self.r, self.g, self.b)),
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    dr * dr + dg * dg + db * db
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (level(r), level(g), level(b));
    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, 0),
        239..=255 => (231, 255),
        _ => {
            let step = (avg - 8) / 10;
            (232 + step, 8 + 10 * step)
        }
    };

    if dist2((r, g, b), (gray, gray, gray)) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2((r, g, b), *rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_both_endpoints() {
        let a = Rgba::rgb(0, 100, 200);
        let b = Rgba::rgb(200, 0, 100);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::rgb(100, 50, 150));
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn opaque_over_replaces_and_clear_over_keeps() {
        let under = Rgba::rgb(10, 20, 30);
        assert_eq!(Rgba::rgb(1, 2, 3).over(under), Rgba::rgb(1, 2, 3));
        assert_eq!(Rgba::rgba(255, 255, 255, 0).over(under), under);
    }

    #[test]
    fn quantizes_per_color_mode() {
        let white = Rgba::rgb(255, 255, 255);
        assert_eq!(white.to_term(ColorMode::Mono), None);
        assert_eq!(white.to_term(ColorMode::Color256), Some(Color::AnsiValue(231)));
        assert_eq!(white.to_term(ColorMode::Color16), Some(Color::White));
        assert_eq!(
            Rgba::rgb(0, 0, 255).to_term(ColorMode::Color256),
            Some(Color::AnsiValue(21))
        );
    }
}
