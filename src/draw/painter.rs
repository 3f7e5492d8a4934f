//! Composite drawing primitives
//!
//! The skin's higher-level shapes (beveled buttons, meters, pan indicators,
//! windows) built on the canvas' rect/line primitives with the active
//! palette.

use crate::asset::{AssetStore, TextOptions};
use crate::canvas::{Canvas, ImageData};
use crate::palette::{composite, overlay, Palette, Rgb};
use crate::song::Waveform;
use thiserror::Error;

/// Color of the center ticks of the pan indicator
pub const PAN_CENTER: Rgb = Rgb::new(0xff, 0x9f, 0x00);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("no image named '{0}'")]
    MissingImage(String),
    #[error("no font named '{0}'")]
    MissingFont(String),
    #[error("active palette has no '{0}' role")]
    MissingRole(&'static str),
}

pub struct Painter<'a> {
    pub canvas: &'a mut Canvas,
    pub palette: &'a Palette,
    pub assets: &'a AssetStore,
}

impl<'a> Painter<'a> {
    pub fn new(canvas: &'a mut Canvas, palette: &'a Palette, assets: &'a AssetStore) -> Self {
        Self { canvas, palette, assets }
    }

    fn role(&self, role: &'static str) -> Result<Rgb, DrawError> {
        self.palette.get(role).ok_or(DrawError::MissingRole(role))
    }

    /// Beveled button; `pressed` swaps the highlight and shadow
    pub fn button(&mut self, x: i32, y: i32, w: i32, h: i32, pressed: bool) -> Result<(), DrawError> {
        let bg = self.role("background")?;
        let fg = self.role("foreground")?;
        let light = self.role("light")?;
        let dark = self.role("dark")?;

        self.canvas.stroke_rect(x + 1, y + 1, w - 2, h - 2, if pressed { bg } else { light });
        self.canvas.stroke_rect(x + 2, y + 2, w - 3, h - 3, if pressed { light } else { fg });
        self.canvas.fill_rect(x + 2, y + 2, w - 3, h - 3, dark);
        self.canvas.stroke_rect(x, y, w, h, fg);
        Ok(())
    }

    /// Vertical stripes: every 4 px a checkered column followed by a
    /// 2 px solid dark band
    pub fn texture(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DrawError> {
        let bg = self.role("background")?;
        let dark = self.role("dark")?;

        let mut i = 0;
        while i + 4 <= w {
            for row in 0..h {
                let color = if row % 2 == 0 { bg } else { dark };
                self.canvas.set_pixel(x + i, y + row, color);
            }
            self.canvas.fill_rect(x + i + 1, y, 2, h, dark);
            i += 4;
        }
        Ok(())
    }

    /// Sixteen ticks, eight per side, growing outward. `None` draws every
    /// tick dark.
    pub fn pan(&mut self, x: i32, y: i32, value: Option<f64>) -> Result<(), DrawError> {
        let light = self.role("light")?;
        let dark = self.role("dark")?;

        for i in -8i32..=8 {
            if i == 0 {
                continue;
            }
            let color = match value {
                None => dark,
                Some(_) if i.abs() == 1 => PAN_CENTER,
                Some(v) if (v > 0.0) == (i > 0) && v.abs() >= (i as f64 / 8.0).abs() => light,
                Some(_) => dark,
            };
            let height = (i.abs() as f64 / 2.0 + 1.5).floor() as i32;
            let tx = x + i * 2 + if i > 0 { 13 } else { 16 };
            self.canvas.stroke_rect(tx, y + 5 - height, 0, height, color);
        }
        Ok(())
    }

    /// `h` segments, three pixels apart, lit from the bottom up to `value`
    pub fn vu_meter(&mut self, x: i32, y: i32, w: i32, h: i32, value: f64) -> Result<(), DrawError> {
        let light = self.role("light")?;
        let dark = self.role("dark")?;

        for i in 0..h {
            let lit = value >= (h - i) as f64 / h as f64;
            self.canvas.fill_rect(x, y + i * 3, w + 1, 2, if lit { light } else { dark });
        }
        Ok(())
    }

    /// One period of `wave` as columns around the line at `y + 11`
    pub fn waveform(&mut self, x: i32, y: i32, width: i32, color: Rgb, wave: &Waveform) {
        for i in 0..width.max(0) {
            let mut val = (wave.sample(i as f64 / width as f64) * 7.5).round() as i32;
            if val >= 0 {
                val += 1;
            }
            self.canvas.fill_rect(x + i + 1, y + 11, 1, -val, color);
        }
    }

    pub fn pbar(&mut self, value: f64, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        self.canvas.fill_rect(x, y, (w as f64 * value).round() as i32, h, color);
    }

    /// Draw a named image through its alpha mask. With `dim` the light role
    /// is shown as foreground.
    pub fn image(&mut self, name: &str, x: i32, y: i32, dim: bool) -> Result<(), DrawError> {
        let image = self
            .assets
            .image(name)
            .ok_or_else(|| DrawError::MissingImage(name.to_string()))?;

        if !dim {
            self.canvas.draw_image(image, x, y);
            return Ok(());
        }
        let dimmed_palette = Palette::new()
            .with("light", self.role("foreground")?)
            .with("dark", self.role("dark")?);
        let mut dimmed = ImageData::new(image.width, image.height);
        composite(&mut dimmed.data, &image.data, &image.data, self.palette, &dimmed_palette);
        self.canvas.draw_image(&dimmed, x, y);
        Ok(())
    }

    /// Returns the characters the font could not print
    pub fn text(&mut self, font: &str, text: &str, x: i32, y: i32, opts: TextOptions) -> Result<Vec<char>, DrawError> {
        let font = self
            .assets
            .font(font)
            .ok_or_else(|| DrawError::MissingFont(font.to_string()))?;
        Ok(font.draw(self.canvas, text, x, y, opts))
    }

    /// Framed window. Edge gradients are stretched from the corner images'
    /// inner rows and columns, so they follow the palette.
    pub fn window(&mut self, x: i32, y: i32, w: i32, h: i32, title: Option<&str>) -> Result<(), DrawError> {
        let assets = self.assets;
        let corner = move |name: &str| {
            assets
                .image(name)
                .ok_or_else(|| DrawError::MissingImage(name.to_string()))
        };
        let ul = corner("upperLeft")?;
        let ur = corner("upperRight")?;
        let ll = corner("lowerLeft")?;
        let lr = corner("lowerRight")?;
        let bg = self.role("background")?;
        let white = self.role("white")?;

        let (ulw, ulh) = (ul.width as i32, ul.height as i32);
        let (urw, urh) = (ur.width as i32, ur.height as i32);
        let (llw, llh) = (ll.width as i32, ll.height as i32);
        let (lrw, lrh) = (lr.width as i32, lr.height as i32);

        // corners are blended with whatever is under the window's outline
        let over = |canvas: &Canvas, img: &ImageData, cx: i32, cy: i32| {
            let under = canvas.get_image_data(cx, cy, img.width, img.height);
            let mut out = ImageData::new(img.width, img.height);
            overlay(&mut out.data, &img.data, &under.data);
            (out, cx, cy)
        };
        let corners = [
            over(&*self.canvas, ul, x, y),
            over(&*self.canvas, ur, x + w - urw, y),
            over(&*self.canvas, ll, x, y + h - llh),
            over(&*self.canvas, lr, x + w - lrw, y + h - lrh),
        ];

        self.canvas.fill_rect(x, y, w, h, bg);

        let px = |img: &ImageData, col: i32, row: i32| {
            img.pixel(col.max(0) as usize, row.max(0) as usize)
                .map(Rgb::from_rgba)
                .unwrap_or(bg)
        };
        for i in 0..ulw {
            self.canvas.line(x + i, y, x + i, y + h - 1, px(ul, i, ulh - 1));
        }
        for i in 0..urw {
            let col = x + w - urw + i;
            self.canvas.line(col, y, col, y + h - 1, px(ur, i, urh - 1));
        }
        for i in 0..ulh {
            self.canvas.line(x, y + i, x + w - 1, y + i, px(ul, ulw - 1, i));
        }
        for i in 0..llh {
            let row = y + h - llh + i;
            self.canvas.line(x, row, x + w - 1, row, px(ll, llw - 1, i));
        }

        for (img, cx, cy) in &corners {
            self.canvas.put_image_data(img, *cx, *cy);
        }

        if let Some(title) = title {
            self.text(
                "large",
                title,
                x + 8,
                y + 7,
                TextOptions {
                    color: Some(white),
                    ..Default::default()
                },
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Canvas, Palette, AssetStore) {
        let mut canvas = Canvas::new(40, 40);
        canvas.clear(Rgb::BLACK);
        (canvas, Palette::loading(), AssetStore::new())
    }

    #[test]
    fn test_button_layers() {
        let (mut canvas, palette, assets) = setup();
        Painter::new(&mut canvas, &palette, &assets).button(0, 0, 10, 8, false).unwrap();
        let fg = palette.get("foreground").unwrap().to_rgba();
        let light = palette.get("light").unwrap().to_rgba();
        let dark = palette.get("dark").unwrap().to_rgba();
        assert_eq!(canvas.pixel(0, 0), Some(fg));
        assert_eq!(canvas.pixel(10, 8), Some(fg));
        assert_eq!(canvas.pixel(1, 1), Some(light));
        assert_eq!(canvas.pixel(4, 4), Some(dark));

        Painter::new(&mut canvas, &palette, &assets).button(0, 0, 10, 8, true).unwrap();
        assert_eq!(canvas.pixel(1, 1), Some(palette.get("background").unwrap().to_rgba()));
    }

    #[test]
    fn test_vu_meter_lights_from_bottom() {
        let (mut canvas, palette, assets) = setup();
        Painter::new(&mut canvas, &palette, &assets).vu_meter(0, 0, 1, 4, 0.5).unwrap();
        let light = palette.get("light").unwrap().to_rgba();
        let dark = palette.get("dark").unwrap().to_rgba();
        // segments at y = 0, 3, 6, 9; thresholds 1, 0.75, 0.5, 0.25
        assert_eq!(canvas.pixel(0, 0), Some(dark));
        assert_eq!(canvas.pixel(0, 3), Some(dark));
        assert_eq!(canvas.pixel(0, 6), Some(light));
        assert_eq!(canvas.pixel(1, 9), Some(light));
        assert_eq!(canvas.pixel(0, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_pan_center_and_unset() {
        let (mut canvas, palette, assets) = setup();
        Painter::new(&mut canvas, &palette, &assets).pan(0, 10, Some(1.0)).unwrap();
        let center = PAN_CENTER.to_rgba();
        // i = 1 tick at x = 2 + 13, height 2, rows 13..=15
        assert_eq!(canvas.pixel(15, 13), Some(center));
        assert_eq!(canvas.pixel(15, 15), Some(center));
        // i = 8 tick at x = 29, lit
        assert_eq!(canvas.pixel(29, 15), Some(palette.get("light").unwrap().to_rgba()));
        // i = -8 tick at x = 0, wrong side
        assert_eq!(canvas.pixel(0, 15), Some(palette.get("dark").unwrap().to_rgba()));

        Painter::new(&mut canvas, &palette, &assets).pan(0, 10, None).unwrap();
        assert_eq!(canvas.pixel(15, 15), Some(palette.get("dark").unwrap().to_rgba()));
    }

    #[test]
    fn test_pbar_rounds_width() {
        let (mut canvas, palette, assets) = setup();
        let red = Rgb::new(255, 0, 0);
        Painter::new(&mut canvas, &palette, &assets).pbar(0.5, 0, 0, 9, 1, red);
        assert_eq!(canvas.pixel(4, 0), Some(red.to_rgba()));
        assert_eq!(canvas.pixel(5, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_missing_assets_are_errors() {
        let (mut canvas, palette, assets) = setup();
        let mut p = Painter::new(&mut canvas, &palette, &assets);
        assert_eq!(p.image("logo", 0, 0, false), Err(DrawError::MissingImage("logo".into())));
        assert!(matches!(p.window(0, 0, 20, 20, None), Err(DrawError::MissingImage(_))));
        assert_eq!(
            p.text("small", "x", 0, 0, TextOptions::default()),
            Err(DrawError::MissingFont("small".into()))
        );

        let empty = Palette::new();
        let mut p = Painter::new(&mut canvas, &empty, &assets);
        assert_eq!(p.texture(0, 0, 8, 8), Err(DrawError::MissingRole("background")));
    }

    #[test]
    fn test_dimmed_image() {
        let (mut canvas, palette, mut assets) = setup();
        let light = palette.get("light").unwrap();
        let mut icon = ImageData::new(1, 1);
        icon.set_pixel(0, 0, light.to_rgba());
        assets.insert_image("repeat", icon);

        Painter::new(&mut canvas, &palette, &assets).image("repeat", 0, 0, true).unwrap();
        assert_eq!(canvas.pixel(0, 0), Some(palette.get("foreground").unwrap().to_rgba()));
        Painter::new(&mut canvas, &palette, &assets).image("repeat", 0, 0, false).unwrap();
        assert_eq!(canvas.pixel(0, 0), Some(light.to_rgba()));
    }
}
