//! Pixel compositing
//!
//! All buffers are tightly packed RGBA8, the layout `ImageData` uses.

use super::{Palette, Rgb};
use log::error;

/// Per-role substitution table: input color → output color, or `None`
/// when the output palette lacks the role (fall through to background).
struct RoleMap {
    entries: Vec<(Rgb, Option<Rgb>)>,
}

impl RoleMap {
    fn new(input: &Palette, output: &Palette) -> Self {
        Self {
            entries: input.iter().map(|(role, color)| (color, output.get(role))).collect(),
        }
    }

    /// `None` if the color is not a role of the input palette
    fn lookup(&self, color: Rgb) -> Option<Option<Rgb>> {
        self.entries.iter().find(|(c, _)| *c == color).map(|(_, out)| *out)
    }
}

fn check_lengths(out: usize, fg: usize, bg: usize) -> bool {
    if out != fg || fg != bg || out % 4 != 0 {
        error!("composite buffer size mismatch: out={} fg={} bg={}", out, fg, bg);
        return false;
    }
    true
}

/// Recolor `fg` over `bg` into `out`.
///
/// Transparent foreground pixels copy the background verbatim. An opaque
/// foreground pixel whose color is a role of `input` becomes that role in
/// `output` (or the background color if `output` lacks it). Anything else
/// becomes the background color. Non-transparent results are fully opaque.
pub fn composite(out: &mut [u8], fg: &[u8], bg: &[u8], input: &Palette, output: &Palette) {
    if !check_lengths(out.len(), fg.len(), bg.len()) {
        return;
    }
    let map = RoleMap::new(input, output);

    for ((o, f), b) in out.chunks_exact_mut(4).zip(fg.chunks_exact(4)).zip(bg.chunks_exact(4)) {
        if f[3] == 0 {
            o.copy_from_slice(b);
            continue;
        }
        let bg_rgb = Rgb::new(b[0], b[1], b[2]);
        let color = match map.lookup(Rgb::new(f[0], f[1], f[2])) {
            Some(Some(mapped)) => mapped,
            Some(None) | None => bg_rgb,
        };
        o.copy_from_slice(&color.to_rgba());
    }
}

/// `composite(buf, buf, buf, input, output)` without the aliasing.
pub fn composite_in_place(buf: &mut [u8], input: &Palette, output: &Palette) {
    if buf.len() % 4 != 0 {
        error!("composite buffer is not RGBA ({} bytes)", buf.len());
        return;
    }
    let map = RoleMap::new(input, output);

    for px in buf.chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let own = Rgb::new(px[0], px[1], px[2]);
        let color = match map.lookup(own) {
            Some(Some(mapped)) => mapped,
            Some(None) | None => own,
        };
        px.copy_from_slice(&color.to_rgba());
    }
}

/// Binary-mask blit for decorative images: opaque foreground pixels win,
/// transparent ones show the background.
pub fn overlay(out: &mut [u8], fg: &[u8], bg: &[u8]) {
    if !check_lengths(out.len(), fg.len(), bg.len()) {
        return;
    }
    for ((o, f), b) in out.chunks_exact_mut(4).zip(fg.chunks_exact(4)).zip(bg.chunks_exact(4)) {
        if f[3] == 0 {
            o.copy_from_slice(b);
        } else {
            o.copy_from_slice(&[f[0], f[1], f[2], 255]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sunset() -> Palette {
        Palette::new()
            .with("background", Rgb::new(0xdf, 0x82, 0x5f))
            .with("foreground", Rgb::new(0x5c, 0x1f, 0x09))
            .with("light", Rgb::new(0xff, 0xd2, 0xa2))
    }

    fn ocean() -> Palette {
        Palette::new()
            .with("background", Rgb::new(0x10, 0x20, 0x40))
            .with("foreground", Rgb::new(0xe0, 0xf0, 0xff))
            .with("light", Rgb::new(0x40, 0x80, 0xc0))
    }

    /// 2x2 indexed image in `p`: bg, fg / light, transparent
    fn indexed(p: &Palette) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend(p.get("background").unwrap().to_rgba());
        buf.extend(p.get("foreground").unwrap().to_rgba());
        buf.extend(p.get("light").unwrap().to_rgba());
        buf.extend([0, 0, 0, 0]);
        buf
    }

    #[test]
    fn test_same_palette_is_identity() {
        let p = sunset();
        let original = indexed(&p);
        let mut buf = original.clone();
        composite_in_place(&mut buf, &p, &p);
        assert_eq!(buf, original);

        let mut out = vec![0; original.len()];
        composite(&mut out, &original, &original, &p, &p);
        assert_eq!(out, original);
    }

    #[test]
    fn test_recolor_maps_every_role() {
        let (a, b) = (sunset(), ocean());
        let img = indexed(&a);
        let mut out = vec![0; img.len()];
        composite(&mut out, &img, &img, &a, &b);
        assert_eq!(out, indexed(&b));

        // And back again
        let mut back = out.clone();
        composite_in_place(&mut back, &b, &a);
        assert_eq!(back, img);
    }

    #[test]
    fn test_alpha_forced_opaque() {
        let a = sunset();
        let fg = [0x5c, 0x1f, 0x09, 10];
        let bg = [1, 2, 3, 40];
        let mut out = [0u8; 4];
        composite(&mut out, &fg, &bg, &a, &ocean());
        assert_eq!(out, [0xe0, 0xf0, 0xff, 255]);
    }

    #[test]
    fn test_missing_output_role_falls_back_to_background() {
        let font = Palette::new().with("foreground", Rgb::BLACK).with("background", Rgb::WHITE);
        let tint = Palette::new().with("foreground", Rgb::new(9, 9, 9));
        // black glyph pixel, white glyph pixel, transparent
        let fg = [0, 0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 0];
        let bg = [50, 60, 70, 255, 50, 60, 70, 255, 50, 60, 70, 128];
        let mut out = [0u8; 12];
        composite(&mut out, &fg, &bg, &font, &tint);
        assert_eq!(out, [9, 9, 9, 255, 50, 60, 70, 255, 50, 60, 70, 128]);
    }

    #[test]
    fn test_overlay_mask() {
        let fg = [10, 20, 30, 255, 0, 0, 0, 0];
        let bg = [1, 1, 1, 255, 2, 2, 2, 255];
        let mut out = [0u8; 8];
        overlay(&mut out, &fg, &bg);
        assert_eq!(out, [10, 20, 30, 255, 2, 2, 2, 255]);
    }

    #[test]
    fn test_size_mismatch_leaves_output_untouched() {
        let mut out = [7u8; 8];
        composite(&mut out, &[0; 4], &[0; 8], &sunset(), &ocean());
        assert_eq!(out, [7u8; 8]);
    }
}
