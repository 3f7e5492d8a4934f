//! Bitmap fonts
//!
//! A font is a single-row strip image: black glyphs on white, with at least
//! one all-white column between neighbours. Slicing happens once at load.

use crate::canvas::{Canvas, ImageData};
use crate::palette::{composite, Palette, Rgb};
use log::warn;

/// Gap between adjacent glyphs
pub const LETTER_SPACING: i32 = 1;
/// Advance for ' ' (plus letter spacing)
pub const SPACE_WIDTH: i32 = 2;

/// Fully opaque white, the strip background
const CUT_PIXEL: [u8; 4] = [255, 255, 255, 255];

/// Where one glyph lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub glyph: usize,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub placements: Vec<Placement>,
    /// Characters with no glyph, in text order
    pub unknown: Vec<char>,
}

/// Per-call drawing options
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Tint; `None` blits the raw glyph pixels
    pub color: Option<Rgb>,
    pub rtl: bool,
    /// Overrides the font's space width for this call only
    pub space_width: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct BitmapFont {
    map: Vec<char>,
    glyphs: Vec<ImageData>,
    height: usize,
    pub letter_spacing: i32,
    pub space_width: i32,
}

impl BitmapFont {
    /// Slice `strip` into glyphs. Columns listed in `row_escapes` are never
    /// treated as cuts (for glyphs like '"' that contain a blank column).
    pub fn from_strip(name: &str, strip: &ImageData, map: &str, row_escapes: &[usize]) -> Self {
        let height = strip.height;
        let mut glyphs = Vec::new();
        let mut start = 0usize;

        for col in 0..strip.width {
            if row_escapes.contains(&col) {
                continue;
            }
            if strip.column(col).all(|px| px == CUT_PIXEL) {
                glyphs.push(strip.sub_image(start as i32, 0, col - start, height));
                start = col + 1;
            }
        }
        glyphs.push(strip.sub_image(start as i32, 0, strip.width.saturating_sub(start), height));

        let map: Vec<char> = map.chars().collect();
        if map.len() != glyphs.len() {
            warn!(
                "font '{}': map has {} characters but the strip has {} glyphs",
                name,
                map.len(),
                glyphs.len()
            );
        }

        Self {
            map,
            glyphs,
            height,
            letter_spacing: LETTER_SPACING,
            space_width: SPACE_WIDTH,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The character map as a string (used by the font specimen view)
    pub fn map(&self) -> String {
        self.map.iter().collect()
    }

    #[cfg(test)]
    pub fn glyph(&self, ch: char) -> Option<&ImageData> {
        let idx = self.map.iter().position(|&c| c == ch)?;
        self.glyphs.get(idx)
    }

    /// Compute glyph positions without touching a canvas
    pub fn layout(&self, text: &str, x: i32, y: i32, rtl: bool, space_width: Option<i32>) -> TextLayout {
        let space = space_width.unwrap_or(self.space_width);
        let mut out = TextLayout::default();
        let (mut cx, mut cy) = (x, y);
        let dir = if rtl { -1 } else { 1 };

        let chars: Vec<char> = if rtl { text.chars().rev().collect() } else { text.chars().collect() };
        for ch in chars {
            match ch {
                ' ' => cx += dir * (space + self.letter_spacing),
                '\n' => {
                    cx = x;
                    cy += self.height as i32 + space;
                }
                _ => {
                    let found = self
                        .map
                        .iter()
                        .position(|&c| c == ch)
                        .filter(|&idx| idx < self.glyphs.len());
                    match found {
                        Some(idx) => {
                            let w = self.glyphs[idx].width as i32;
                            let gx = if rtl { cx - w } else { cx };
                            out.placements.push(Placement { glyph: idx, x: gx, y: cy });
                            cx += dir * (w + self.letter_spacing);
                        }
                        None => {
                            out.unknown.push(ch);
                            cx += dir * (space + self.letter_spacing);
                        }
                    }
                }
            }
        }
        out
    }

    /// Width in pixels of a single line of text
    pub fn text_width(&self, text: &str) -> i32 {
        let layout = self.layout(text, 0, 0, false, None);
        layout
            .placements
            .last()
            .map(|p| p.x + self.glyphs[p.glyph].width as i32)
            .unwrap_or(0)
    }

    pub fn draw_text(&self, canvas: &mut Canvas, text: &str, x: i32, y: i32, color: Option<Rgb>) -> Vec<char> {
        self.draw(canvas, text, x, y, TextOptions { color, ..Default::default() })
    }

    /// Right-aligned: (x, y) is where the last glyph ends
    pub fn draw_text_rtl(&self, canvas: &mut Canvas, text: &str, x: i32, y: i32, color: Option<Rgb>) -> Vec<char> {
        self.draw(
            canvas,
            text,
            x,
            y,
            TextOptions {
                color,
                rtl: true,
                space_width: None,
            },
        )
    }

    /// Draw text and return the characters that had no glyph
    pub fn draw(&self, canvas: &mut Canvas, text: &str, x: i32, y: i32, opts: TextOptions) -> Vec<char> {
        let layout = self.layout(text, x, y, opts.rtl, opts.space_width);
        for ch in &layout.unknown {
            warn!("could not print character '{}' with charmap '{}'", ch, self.map());
        }

        let tint = opts.color.map(|c| (font_palette(), Palette::new().with("foreground", c)));
        for p in &layout.placements {
            let glyph = &self.glyphs[p.glyph];
            match &tint {
                None => canvas.put_image_data(glyph, p.x, p.y),
                Some((from, to)) => {
                    let under = canvas.get_image_data(p.x, p.y, glyph.width, glyph.height);
                    let mut out = ImageData::new(glyph.width, glyph.height);
                    composite(&mut out.data, &glyph.data, &under.data, from, to);
                    canvas.put_image_data(&out, p.x, p.y);
                }
            }
        }
        layout.unknown
    }
}

/// Colors glyph strips are authored in
fn font_palette() -> Palette {
    Palette::new().with("foreground", Rgb::BLACK).with("background", Rgb::WHITE)
}
