//! Config overlay
//!
//! A modal window over a dimmed copy of the main screen. While it is open
//! the main screen's hit regions are parked and only the overlay's own
//! regions receive input.

use super::{CanvasRenderer, UiAction, OVERLAY_PREFIX};
use crate::canvas::{ImageData, PixelRect};
use crate::draw::{parse_group, DrawEntry};
use crate::palette::Rgb;
use crate::ui::{CursorHint, HitRegion, Rect, RegionSet};
use log::info;
use serde_json::json;

const WINDOW_W: i32 = 200;
const WINDOW_H: i32 = 250;
const TITLE: &str = "Config";

/// Color the screen fades toward, and how far
const DIM_COLOR: Rgb = Rgb::new(1, 1, 1);
const DIM_AMOUNT: f32 = 0.75;
const BACKDROP_FACTOR: f32 = 0.25;

const ROW_X: i32 = 10;
const ROW_Y: i32 = 28;
const ROW_W: i32 = WINDOW_W - 20;
const ROW_H: i32 = 12;
const ROW_PITCH: i32 = 14;

const CLOSE_W: i32 = 50;
const CLOSE_H: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    /// Config button pressed, window not painted yet
    Opening,
    Open,
    Closing,
}

pub(super) enum Overlay {
    Closed,
    Opening,
    Open {
        /// Main-screen regions, parked
        saved: RegionSet<UiAction>,
        /// Main screen as it was before dimming
        frame: ImageData,
    },
    Closing,
}

impl Overlay {
    pub(super) fn phase(&self) -> OverlayPhase {
        match self {
            Overlay::Closed => OverlayPhase::Closed,
            Overlay::Opening => OverlayPhase::Opening,
            Overlay::Open { .. } => OverlayPhase::Open,
            Overlay::Closing => OverlayPhase::Closing,
        }
    }
}

/// The overlay window, centered on a `width`×`height` canvas
pub fn window_rect(width: usize, height: usize) -> PixelRect {
    PixelRect::new(
        (width as i32 - WINDOW_W) / 2,
        (height as i32 - WINDOW_H) / 2,
        WINDOW_W,
        WINDOW_H,
    )
}

fn row_rect(window: PixelRect, idx: usize) -> PixelRect {
    PixelRect::new(window.x + ROW_X, window.y + ROW_Y + idx as i32 * ROW_PITCH, ROW_W, ROW_H)
}

fn close_rect(window: PixelRect) -> PixelRect {
    PixelRect::new(
        window.x + window.w - CLOSE_W - 10,
        window.y + window.h - CLOSE_H - 10,
        CLOSE_W,
        CLOSE_H,
    )
}

impl CanvasRenderer {
    #[cfg(test)]
    pub fn overlay_phase(&self) -> OverlayPhase {
        self.overlay.phase()
    }

    /// Park the main screen and show the config window
    pub fn open_config(&mut self) {
        if !matches!(self.overlay.phase(), OverlayPhase::Closed | OverlayPhase::Opening) {
            return;
        }
        info!("opening config");
        let saved = self.hits.take_regions();
        self.region_epoch += 1;
        let frame = self.canvas.snapshot();
        self.pressed.clear();
        self.overlay = Overlay::Open { saved, frame };

        self.paint_overlay();
        self.init_overlay_regions();
    }

    /// Put the main screen back exactly as it was
    pub fn close_config(&mut self) {
        match std::mem::replace(&mut self.overlay, Overlay::Closing) {
            Overlay::Open { saved, frame } => {
                info!("closing config");
                self.canvas.restore(&frame);
                self.hits.restore_regions(saved);
                self.region_epoch += 1;
                self.backdrop = self.palette.background();
                self.hits.set_over("config", false);
                self.draw_group("config");
                self.overlay = Overlay::Closed;
            }
            Overlay::Opening | Overlay::Closing | Overlay::Closed => self.overlay = Overlay::Closed,
        }
    }

    /// Dim whatever is on the canvas and draw the window over it
    pub(super) fn paint_overlay(&mut self) {
        self.canvas.dim(DIM_COLOR, DIM_AMOUNT);
        self.backdrop = self.palette.background().scale(BACKDROP_FACTOR);
        self.draw_overlay();
    }

    /// Repaint from the parked frame (after the font specimen)
    pub(super) fn repaint_overlay(&mut self) {
        if let Overlay::Open { frame, .. } = &self.overlay {
            self.canvas.restore(frame);
        }
        self.paint_overlay();
    }

    pub(super) fn draw_overlay(&mut self) {
        let window = window_rect(self.canvas.width(), self.canvas.height());
        let entries = self.overlay_entries(window);
        self.draw_entries(&entries);
        self.draw_all_groups_with_prefix(OVERLAY_PREFIX, None, window.x, window.y);
    }

    fn overlay_entries(&self, window: PixelRect) -> Vec<DrawEntry> {
        let mut items = vec![json!(["window", window.x, window.y, window.w, window.h, TITLE])];

        for (idx, name) in self.assets.borrow().palette_names().iter().enumerate() {
            let row = row_rect(window, idx);
            let current = *name == self.palette_name;
            if current {
                items.push(json!(["filledRect", row.x, row.y, row.w, row.h, "#dark"]));
            }
            let color = if current { "#white" } else { "#foreground" };
            items.push(json!(["text", "medium", name, row.x + 4, row.y + 3, color]));
        }

        let close = close_rect(window);
        items.push(json!(["button", close.x, close.y, close.w, close.h, "$pressed:close"]));
        items.push(json!(["text", "medium", "Close", close.x + 12, close.y + 6, "#foreground"]));
        parse_group(&items)
    }

    fn init_overlay_regions(&mut self) {
        let (w, h) = (self.canvas.width() as f32, self.canvas.height() as f32);
        let backdrop = HitRegion::new(Rect::new(0.0, 0.0, w, h)).on_down(UiAction::DismissOverlay);
        self.hits.add_hit_region(backdrop, Some("overlayBackdrop"));

        let window = window_rect(self.canvas.width(), self.canvas.height());
        let names = self.assets.borrow().palette_names();
        for (idx, name) in names.into_iter().enumerate() {
            let region = HitRegion::new(row_rect(window, idx).into())
                .with_cursor(CursorHint::Pointer)
                .on_down(UiAction::SwitchPalette(name.clone()));
            self.hits.add_hit_region(region, Some(&format!("palette:{}", name)));
        }

        let close = HitRegion::new(close_rect(window).into())
            .with_cursor(CursorHint::Pointer)
            .on_up(UiAction::CloseConfig);
        self.hits.add_hit_region(close, Some("close"));
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::renderer;
    use super::*;
    use crate::ui::PressState;

    fn open(r: &mut super::super::CanvasRenderer) {
        r.mouse_move(340.0, 30.0);
        r.mouse_down(340.0, 30.0, 0);
        r.mouse_up(340.0, 30.0, 0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Opening);
        r.tick(1.0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Open);
    }

    #[test]
    fn test_window_centered() {
        assert_eq!(window_rect(634, 444), PixelRect::new(217, 97, 200, 250));
    }

    #[test]
    fn test_open_parks_main_regions_and_dims() {
        let mut r = renderer();
        let before = r.canvas().pixel(1, 1);
        open(&mut r);

        assert!(!r.hits().contains("chan0"));
        assert!(r.hits().contains("close"));
        assert!(r.hits().contains("palette:ocean"));
        assert_ne!(r.canvas().pixel(1, 1), before);
        assert_eq!(r.backdrop(), Rgb::new(0xdf, 0x82, 0x5f).scale(0.25));

        // a click on a channel only dismisses the window
        r.mouse_down(60.0, 50.0, 0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Closed);
        r.mouse_up(60.0, 50.0, 0);
        assert!(!r.song().borrow().channels[0].mute);
    }

    #[test]
    fn test_click_outside_closes_and_restores() {
        let mut r = renderer();
        let before = r.canvas().snapshot();
        open(&mut r);

        // inside the window: stays open
        r.mouse_move(300.0, 300.0);
        r.mouse_down(300.0, 300.0, 0);
        r.mouse_up(300.0, 300.0, 0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Open);

        r.mouse_move(5.0, 5.0);
        r.mouse_down(5.0, 5.0, 0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Closed);
        assert!(r.hits().contains("chan0"));
        assert!(!r.hits().contains("close"));
        assert_eq!(r.backdrop(), r.palette().background());
        assert!(!r.hits().is_over("config"));
        assert_eq!(r.canvas().pixel(1, 1), before.pixel(1, 1));
        r.mouse_up(5.0, 5.0, 0);
    }

    #[test]
    fn test_close_button() {
        let mut r = renderer();
        open(&mut r);
        let close = close_rect(window_rect(634, 444));
        let (x, y) = ((close.x + 5) as f32, (close.y + 5) as f32);
        r.mouse_move(x, y);
        r.mouse_down(x, y, 0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Open);
        r.mouse_up(x, y, 0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Closed);
    }
}
