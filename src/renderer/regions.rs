//! Main-screen hit regions

use super::{CanvasRenderer, UiAction};
use crate::canvas::{Canvas, PixelRect};
use crate::draw::DrawObject;
use crate::song::Transport;
use crate::ui::{CursorHint, HitRegion, Rect};
use log::{debug, warn};

pub const CHANNEL_WIDTH: i32 = 33;
pub const CHANNEL_HEIGHT: i32 = 13;

/// Left edge of the slider track, minus one
const SLIDER_ORIGIN: f32 = 57.0;
const SLIDER_WIDTH: f32 = 236.0;
const SLIDER_RECT: PixelRect = PixelRect::new(58, 402, 236, 16);
const LOOP_RECT: PixelRect = PixelRect::new(300, 402, 20, 17);
const LINK_RECT: PixelRect = PixelRect::new(164, 435, 183, 10);

/// Transport button row: x of each button, in `Transport::ALL` order, then config
const BUTTON_X: [i32; 6] = [132, 172, 212, 252, 292, 332];
const BUTTON_Y: i32 = 19;
const BUTTON_W: i32 = 34;
const BUTTON_H: i32 = 22;

/// Top-left of channel `idx`: 16 per row, two banks 168 px apart
pub fn channel_origin(idx: usize) -> (i32, i32) {
    let col = (idx % 16) as i32;
    let row = (idx / 16) as i32;
    (col * 36 + 58, row * 168 + 49)
}

/// Slider position for canvas x
pub fn position_from_x(x: f32) -> f64 {
    (((x - SLIDER_ORIGIN) / SLIDER_WIDTH) as f64).clamp(0.0, 1.0)
}

impl CanvasRenderer {
    /// Register every main-screen region. Any regions already present are
    /// dropped first.
    pub(super) fn init_regions(&mut self) {
        self.hits.clear_hit_regions();
        self.region_epoch += 1;

        let channels = self.song.borrow().channels.len();
        for idx in 0..channels {
            let (x, y) = channel_origin(idx);
            let rect = Rect::new(x as f32, y as f32, CHANNEL_WIDTH as f32, CHANNEL_HEIGHT as f32);
            let region = HitRegion::new(rect).on_down(UiAction::ToggleMute(idx));
            self.hits.add_hit_region(region, Some(&format!("chan{}", idx)));
        }

        let slider = HitRegion::new(SLIDER_RECT.into())
            .with_cursor(CursorHint::EwResize)
            .on_down(UiAction::Seek);
        self.hits.add_hit_region(slider, Some("positionSlider"));

        let repeat = self
            .auto_region("loop", LOOP_RECT)
            .on_down(UiAction::Press("loop".into()))
            .on_up(UiAction::ToggleRepeat);
        self.hits.add_hit_region(repeat, Some("loop"));

        for (transport, x) in Transport::ALL.iter().zip(BUTTON_X) {
            let name = transport.name();
            let region = self
                .auto_region(name, PixelRect::new(x, BUTTON_Y, BUTTON_W, BUTTON_H))
                .on_down(UiAction::Press(name.into()))
                .on_down(UiAction::Transport(*transport));
            self.hits.add_hit_region(region, Some(name));
        }

        let config = self
            .auto_region("config", PixelRect::new(BUTTON_X[5], BUTTON_Y, BUTTON_W, BUTTON_H))
            .on_down(UiAction::Press("config".into()))
            .on_down(UiAction::OpenConfig);
        self.hits.add_hit_region(config, Some("config"));

        let link = self
            .auto_region("link", LINK_RECT)
            .with_cursor(CursorHint::Pointer)
            .on_enter(UiAction::Redraw("link".into()))
            .on_exit(UiAction::Redraw("link".into()))
            .on_down(UiAction::OpenLink);
        self.hits.add_hit_region(link, Some("link"));

        debug!("registered {} hit regions", self.hits.len());
    }

    /// Region covering a draw group: its trailing `bounds` entry, else the
    /// measured painted area, else `fallback`
    pub fn auto_region(&self, group: &str, fallback: PixelRect) -> HitRegion<UiAction> {
        let declared = self.assets.borrow().draw_group(group).and_then(|entries| {
            entries.iter().rev().find_map(|entry| match entry.object {
                DrawObject::Bounds(rect) => Some(rect),
                _ => None,
            })
        });

        let rect = declared
            .or_else(|| self.measure_group_bounds(group, None))
            .unwrap_or_else(|| {
                warn!("no bounds for group '{}', using built-in layout", group);
                fallback
            });
        HitRegion::new(rect.normalized().into())
    }
}

/// Scratch canvas the size of `like`, fully transparent
pub(super) fn scratch_canvas(like: &Canvas) -> Canvas {
    let mut canvas = Canvas::new(like.width(), like.height());
    canvas.clear_transparent();
    canvas
}
