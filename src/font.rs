// Copyright (c) 2026 rezky_nightky

// HUD font file: `height N`, then `glyph C` blocks of N rows of `#` and `.`.
// `glyph space` names the blank glyph. `#` lines outside a glyph are comments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::collision::Aabb;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("font defines no glyphs")]
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
struct Glyph {
    width: usize,
    rows: Vec<Vec<bool>>,
}

#[derive(Clone, Debug)]
pub struct Font {
    height: usize,
    glyphs: HashMap<char, Glyph>,
}

const TRACKING: usize = 1;
const MISSING_ADVANCE: usize = 3;

fn parse_err(line: usize, reason: impl Into<String>) -> FontError {
    FontError::Parse {
        line,
        reason: reason.into(),
    }
}

impl Font {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Self::parse(&src)?;
        log::info!(
            "loaded font {} ({} glyphs, height {})",
            path.display(),
            font.glyphs.len(),
            font.height
        );
        Ok(font)
    }

    pub fn parse(src: &str) -> Result<Self, FontError> {
        let mut height: Option<usize> = None;
        let mut glyphs = HashMap::new();
        let mut current: Option<(char, usize, Glyph)> = None;

        for (idx, raw) in src.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') && current.is_none() {
                continue;
            }

            if let Some((ch, start, mut glyph)) = current.take() {
                let row: Vec<bool> = line
                    .chars()
                    .map(|c| match c {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        other => Err(parse_err(
                            line_no,
                            format!("unexpected {other:?} in glyph row"),
                        )),
                    })
                    .collect::<Result<_, _>>()?;
                if glyph.rows.is_empty() {
                    glyph.width = row.len();
                } else if row.len() != glyph.width {
                    return Err(parse_err(
                        line_no,
                        format!("row is {} wide, glyph {ch:?} is {}", row.len(), glyph.width),
                    ));
                }
                glyph.rows.push(row);

                let h = height.unwrap_or(0);
                if glyph.rows.len() == h {
                    glyphs.insert(ch, glyph);
                } else {
                    current = Some((ch, start, glyph));
                }
                continue;
            }

            let (key, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let value = value.trim();
            match key {
                "height" => {
                    let h: usize = value
                        .parse()
                        .map_err(|_| parse_err(line_no, format!("invalid height {value:?}")))?;
                    if h == 0 {
                        return Err(parse_err(line_no, "height must be positive"));
                    }
                    if height.is_some() {
                        return Err(parse_err(line_no, "height given twice"));
                    }
                    height = Some(h);
                }
                "glyph" => {
                    if height.is_none() {
                        return Err(parse_err(line_no, "glyph before height"));
                    }
                    let ch = match value {
                        "space" => ' ',
                        v => {
                            let mut it = v.chars();
                            match (it.next(), it.next()) {
                                (Some(c), None) => c.to_ascii_uppercase(),
                                _ => {
                                    return Err(parse_err(line_no, format!("bad glyph name {v:?}")))
                                }
                            }
                        }
                    };
                    let empty = Glyph {
                        width: 0,
                        rows: Vec::new(),
                    };
                    current = Some((ch, line_no, empty));
                }
                other => return Err(parse_err(line_no, format!("unknown directive {other:?}"))),
            }
        }

        if let Some((ch, start, _)) = current {
            return Err(parse_err(start, format!("glyph {ch:?} is missing rows")));
        }
        let height = height.ok_or(FontError::Empty)?;
        if glyphs.is_empty() {
            return Err(FontError::Empty);
        }
        Ok(Self { height, glyphs })
    }

    pub fn text_width(&self, text: &str) -> usize {
        let mut w = 0;
        for (i, c) in text.chars().enumerate() {
            if i > 0 {
                w += TRACKING;
            }
            w += self.glyph(c).map(|g| g.width).unwrap_or(MISSING_ADVANCE);
        }
        w
    }

    pub fn layout(&self, text: &str, origin: Vec2, pixel: Vec2) -> Vec<Aabb> {
        let mut out = Vec::new();
        let mut pen = 0usize;
        for c in text.chars() {
            let Some(glyph) = self.glyph(c) else {
                pen += MISSING_ADVANCE + TRACKING;
                continue;
            };
            for (y, row) in glyph.rows.iter().enumerate() {
                let mut x = 0;
                while x < row.len() {
                    if !row[x] {
                        x += 1;
                        continue;
                    }
                    let start = x;
                    while x < row.len() && row[x] {
                        x += 1;
                    }
                    let pos = origin + Vec2::new((pen + start) as f32, y as f32) * pixel;
                    let size = Vec2::new((x - start) as f32, 1.0) * pixel;
                    out.push(Aabb::from_pos_size(pos, size));
                }
            }
            pen += glyph.width + TRACKING;
        }
        out
    }

    fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "\
# test font
height 2
glyph A
#.#
###
glyph space
..
..
";

    #[test]
    fn parses_glyphs_and_lowercase_lookup() {
        let font = Font::parse(TINY).expect("valid font");
        assert_eq!(font.height, 2);
        assert_eq!(font.text_width("a"), 3);
        assert_eq!(font.text_width("A A"), 3 + 1 + 2 + 1 + 3);
        assert_eq!(font.text_width("?"), MISSING_ADVANCE);
    }

    #[test]
    fn layout_merges_runs() {
        let font = Font::parse(TINY).expect("valid font");
        let rects = font.layout("A", Vec2::new(10.0, 20.0), Vec2::new(2.0, 4.0));
        assert_eq!(
            rects,
            vec![
                Aabb::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(2.0, 4.0)),
                Aabb::from_pos_size(Vec2::new(14.0, 20.0), Vec2::new(2.0, 4.0)),
                Aabb::from_pos_size(Vec2::new(10.0, 24.0), Vec2::new(6.0, 4.0)),
            ]
        );
    }

    #[test]
    fn layout_advances_past_spaces_and_unknowns() {
        let font = Font::parse(TINY).expect("valid font");
        let rects = font.layout(" ?A", Vec2::ZERO, Vec2::ONE);
        let first = rects.first().expect("A is lit");
        assert_eq!(first.min, Vec2::new(3.0 + 4.0, 0.0));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Font::parse("height 2\nglyph B\n##\n#\n").unwrap_err();
        assert!(matches!(err, FontError::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn rejects_truncated_glyph() {
        let err = Font::parse("height 3\nglyph C\n##\n").unwrap_err();
        assert!(matches!(err, FontError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn rejects_unknown_directive_and_empty_font() {
        assert!(matches!(
            Font::parse("width 3").unwrap_err(),
            FontError::Parse { line: 1, .. }
        ));
        assert!(matches!(Font::parse("height 3\n").unwrap_err(), FontError::Empty));
        assert!(matches!(Font::parse("").unwrap_err(), FontError::Empty));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Font::load("definitely/not/here.font").unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }

    #[test]
    fn bundled_hud_font_covers_the_hud() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::config::HUD_FONT_PATH);
        let font = Font::load(path).expect("bundled font parses");
        for c in "WET 0123456789%".chars() {
            assert!(font.glyph(c).is_some(), "missing {c:?}");
        }
    }
}
