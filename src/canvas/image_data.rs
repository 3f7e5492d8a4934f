//! Raw RGBA images

use image::{ImageError, ImageFormat};
use std::io::Cursor;

/// Width × height RGBA8 pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl ImageData {
    /// Fully transparent image
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    /// Wrap existing pixels; `None` if the length does not match
    #[cfg(test)]
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * 4).then_some(Self { width, height, data })
    }

    /// Decode any format the `image` crate was built with
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let img = image::load_from_memory(bytes)?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width: width as usize,
            height: height as usize,
            data: rgba.into_raw(),
        })
    }

    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, ImageError> {
        let buffer = image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or_else(|| {
                ImageError::Parameter(image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ))
            })?;
        let mut out = Cursor::new(Vec::new());
        buffer.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3]])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.data[idx..idx + 4].copy_from_slice(&rgba);
        }
    }

    /// Column `x` as RGBA pixels, top to bottom
    pub fn column(&self, x: usize) -> impl Iterator<Item = [u8; 4]> + '_ {
        (0..self.height).filter_map(move |y| self.pixel(x, y))
    }

    /// Copy out a `w`×`h` region at (x, y); out-of-bounds pixels are transparent
    pub fn sub_image(&self, x: i32, y: i32, w: usize, h: usize) -> ImageData {
        let mut out = ImageData::new(w, h);
        for row in 0..h {
            let sy = y + row as i32;
            if sy < 0 || sy >= self.height as i32 {
                continue;
            }
            for col in 0..w {
                let sx = x + col as i32;
                if sx < 0 || sx >= self.width as i32 {
                    continue;
                }
                let src = (sy as usize * self.width + sx as usize) * 4;
                let dst = (row * w + col) * 4;
                out.data[dst..dst + 4].copy_from_slice(&self.data[src..src + 4]);
            }
        }
        out
    }

    /// Raw copy of `src` onto self at (x, y), clipped
    pub fn blit(&mut self, src: &ImageData, x: i32, y: i32) {
        for row in 0..src.height {
            let dy = y + row as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for col in 0..src.width {
                let dx = x + col as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let s = (row * src.width + col) * 4;
                let d = (dy as usize * self.width + dx as usize) * 4;
                self.data[d..d + 4].copy_from_slice(&src.data[s..s + 4]);
            }
        }
    }
}
