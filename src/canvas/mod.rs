//! Software canvas
//!
//! An RGBA8 pixel surface with the handful of 2D primitives the skin needs.
//! Everything is integer-addressed; strokes are one pixel wide and cover
//! both edges (a stroked `w`×`h` rect spans `w + 1` columns).

mod image_data;

pub use image_data::ImageData;

use crate::palette::Rgb;

/// Integer rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Flip negative extents so `w` and `h` are never below zero
    pub fn normalized(self) -> Self {
        let (x, w) = if self.w < 0 { (self.x + self.w, -self.w) } else { (self.x, self.w) };
        let (y, h) = if self.h < 0 { (self.y + self.h, -self.h) } else { (self.y, self.h) };
        Self::new(x, y, w, h)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    image: ImageData,
}

impl Canvas {
    /// New canvas, fully transparent
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: ImageData::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.image.width
    }

    pub fn height(&self) -> usize {
        self.image.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.image.data
    }

    #[cfg(test)]
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 {
            return None;
        }
        self.image.pixel(x as usize, y as usize)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 {
            self.image.set_pixel(x as usize, y as usize, color.to_rgba());
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        let bytes = color.to_rgba();
        for px in self.image.data.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn clear_transparent(&mut self) {
        self.image.data.fill(0);
    }

    /// Fill `w`×`h` pixels starting at (x, y). Negative sizes extend
    /// left/up from the anchor.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        let r = PixelRect::new(x, y, w, h).normalized();
        if r.w == 0 || r.h == 0 {
            return;
        }

        let min_x = r.x.max(0);
        let min_y = r.y.max(0);
        let max_x = (r.x + r.w).min(self.width() as i32);
        let max_y = (r.y + r.h).min(self.height() as i32);

        let bytes = color.to_rgba();
        for py in min_y..max_y {
            for px in min_x..max_x {
                let idx = (py as usize * self.width() + px as usize) * 4;
                self.image.data[idx..idx + 4].copy_from_slice(&bytes);
            }
        }
    }

    /// Outline from (x, y) to (x + w, y + h), both corners inclusive
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        let r = PixelRect::new(x, y, w, h).normalized();
        let (x0, y0, x1, y1) = (r.x, r.y, r.x + r.w, r.y + r.h);

        self.line(x0, y0, x1, y0, color);
        self.line(x1, y0, x1, y1, color);
        self.line(x1, y1, x0, y1, color);
        self.line(x0, y1, x0, y0, color);
    }

    /// Bresenham line, both endpoints inclusive
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Copy a region out; pixels outside the canvas read as transparent
    pub fn get_image_data(&self, x: i32, y: i32, w: usize, h: usize) -> ImageData {
        self.image.sub_image(x, y, w, h)
    }

    /// Raw copy including alpha, clipped to the canvas
    pub fn put_image_data(&mut self, src: &ImageData, x: i32, y: i32) {
        self.image.blit(src, x, y);
    }

    /// Alpha-mask blit: transparent source pixels leave the canvas alone
    pub fn draw_image(&mut self, src: &ImageData, x: i32, y: i32) {
        let under = self.get_image_data(x, y, src.width, src.height);
        let mut out = ImageData::new(src.width, src.height);
        crate::palette::overlay(&mut out.data, &src.data, &under.data);
        self.put_image_data(&out, x, y);
    }

    pub fn snapshot(&self) -> ImageData {
        self.image.clone()
    }

    /// Put a snapshot back. Snapshots of a different size are ignored.
    pub fn restore(&mut self, snapshot: &ImageData) -> bool {
        if snapshot.width != self.width() || snapshot.height != self.height() {
            return false;
        }
        self.image.data.copy_from_slice(&snapshot.data);
        true
    }

    /// Blend every pixel toward `color` by `amount` (0 = unchanged, 1 = solid)
    pub fn dim(&mut self, color: Rgb, amount: f32) {
        let a = amount.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| (src as f32 * (1.0 - a) + dst as f32 * a).round() as u8;
        for px in self.image.data.chunks_exact_mut(4) {
            px[0] = mix(px[0], color.r);
            px[1] = mix(px[1], color.g);
            px[2] = mix(px[2], color.b);
            px[3] = 255;
        }
    }

    /// Bounding box of every pixel that is not transparent black
    pub fn painted_bounds(&self) -> Option<PixelRect> {
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let idx = (y * self.width() + x) * 4;
                if self.image.data[idx..idx + 4] == [0, 0, 0, 0] {
                    continue;
                }
                let (x, y) = (x as i32, y as i32);
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds.map(|(x0, y0, x1, y1)| PixelRect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }
}
