//! Palette transitions
//!
//! Switching palettes is a two-frame affair: first a plain "Loading..."
//! frame goes up, then after a short delay the captured screen is recolored
//! to the new palette and put back while every cached image is swapped.
//! Only one transition runs at a time; a request arriving meanwhile waits in
//! a single slot and the most recent one wins.

use super::overlay::Overlay;
use super::{CanvasRenderer, OverlayPhase, Task};
use crate::canvas::ImageData;
use crate::palette::composite_in_place;
use crate::storage::prefs::PREF_PALETTE;
use log::{debug, error, info};

const LOADING_TEXT: &str = "Loading...";
const LOADING_FONT: &str = "large";

struct Pending {
    from: String,
    to: String,
    /// Screen as it was when the switch was requested
    frame: ImageData,
}

#[derive(Default)]
pub(super) struct Transitions {
    pending: Option<Pending>,
    queued: Option<String>,
    /// Reopen the config overlay once the switch lands
    reopen: bool,
}

impl Transitions {
    pub(super) fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub(super) fn target(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.to.as_str())
    }
}

impl CanvasRenderer {
    /// Name of the palette being switched to, if a switch is underway
    pub fn pending_palette(&self) -> Option<&str> {
        self.transitions.target()
    }

    /// Switch to palette `name` through the loading frame
    pub fn request_palette(&mut self, name: &str) {
        if let Some(pending) = &self.transitions.pending {
            if pending.to != name {
                debug!("palette '{}' queued behind '{}'", name, pending.to);
                self.transitions.queued = Some(name.to_string());
            }
            return;
        }
        if name == self.palette_name {
            return;
        }
        if self.assets.borrow().palette(name).is_none() {
            error!("no palette named '{}'", name);
            return;
        }

        match self.overlay.phase() {
            OverlayPhase::Open => {
                self.close_config();
                self.transitions.reopen = true;
            }
            OverlayPhase::Opening => {
                self.overlay = Overlay::Closed;
                self.transitions.reopen = true;
            }
            OverlayPhase::Closed | OverlayPhase::Closing => {}
        }

        info!("switching palette '{}' -> '{}'", self.palette_name, name);
        let frame = self.canvas.snapshot();
        self.canvas.clear(self.palette.background());
        if let Some(fg) = self.palette.require("foreground") {
            self.draw_centered_text(LOADING_FONT, LOADING_TEXT, fg);
        }

        self.transitions.pending = Some(Pending {
            from: self.palette_name.clone(),
            to: name.to_string(),
            frame,
        });
        self.scheduler
            .schedule(self.now + self.options.palette_switch_delay, Task::FinishTransition);
    }

    pub(super) fn finish_transition(&mut self) {
        let Some(Pending { from, to, mut frame }) = self.transitions.pending.take() else {
            return;
        };

        let palettes = {
            let assets = self.assets.borrow();
            (assets.palette(&from).cloned(), assets.palette(&to).cloned())
        };
        let (Some(old), Some(new)) = palettes else {
            error!("palette '{}' or '{}' went missing mid-switch", from, to);
            self.canvas.restore(&frame);
            return;
        };

        composite_in_place(&mut frame.data, &old, &new);
        self.canvas.restore(&frame);
        self.assets.borrow_mut().switch_palette(&from, &to);

        self.backdrop = new.background();
        self.palette = new;
        self.prefs.set(PREF_PALETTE, &to);
        self.palette_name = to;

        if std::mem::take(&mut self.transitions.reopen) {
            self.open_config();
        }
        if let Some(next) = self.transitions.queued.take() {
            self.request_palette(&next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::renderer;
    use super::*;
    use crate::palette::Rgb;
    use crate::storage::Preferences;

    #[test]
    fn test_switch_shows_loading_then_recolors() {
        let mut r = renderer();
        let loading_bg = r.palette().background().to_rgba();
        let loading_fg = r.palette().get("foreground").unwrap().to_rgba();

        r.request_palette("ocean");
        assert_eq!(r.pending_palette(), Some("ocean"));
        assert_eq!(r.canvas().pixel(1, 1), Some(loading_bg));
        // "Loading" is 7 one-pixel glyphs: 13 px wide, 3 tall, centered
        assert_eq!(r.canvas().pixel(310, 220), Some(loading_fg));

        r.tick(0.005);
        assert_eq!(r.palette_name(), "default");

        r.tick(0.02);
        assert!(r.pending_palette().is_none());
        assert_eq!(r.palette_name(), "ocean");
        assert_eq!(r.backdrop(), Rgb::new(0, 0, 80));
        assert_eq!(r.canvas().pixel(1, 1), Some([0, 200, 255, 255]));
        assert_eq!(r.prefs.get(PREF_PALETTE).as_deref(), Some("ocean"));
        let icon = r.assets.borrow().image("repeat").cloned().unwrap();
        assert_eq!(icon.pixel(0, 0), Some([0, 200, 255, 255]));
    }

    #[test]
    fn test_input_ignored_while_switching() {
        let mut r = renderer();
        r.request_palette("ocean");
        r.mouse_move(60.0, 50.0);
        r.mouse_down(60.0, 50.0, 0);
        r.mouse_up(60.0, 50.0, 0);
        assert!(!r.song().borrow().channels[0].mute);
        assert!(!r.hits().is_mouse_down());
    }

    #[test]
    fn test_latest_queued_request_wins() {
        let mut r = renderer();
        r.request_palette("ocean");
        r.request_palette("forest");
        r.request_palette("default");
        // same as the pending target: ignored, queue untouched
        r.request_palette("ocean");

        r.tick(1.0);
        assert_eq!(r.palette_name(), "ocean");
        assert_eq!(r.pending_palette(), Some("default"));

        r.tick(2.0);
        assert_eq!(r.palette_name(), "default");
        assert!(r.pending_palette().is_none());
    }

    #[test]
    fn test_same_or_unknown_palette_is_ignored() {
        let mut r = renderer();
        r.request_palette("default");
        assert!(r.pending_palette().is_none());
        r.request_palette("nope");
        assert!(r.pending_palette().is_none());
        assert_eq!(r.palette_name(), "default");
    }

    #[test]
    fn test_switch_from_overlay_reopens_it() {
        let mut r = renderer();
        r.mouse_move(340.0, 30.0);
        r.mouse_down(340.0, 30.0, 0);
        r.mouse_up(340.0, 30.0, 0);
        r.tick(1.0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Open);

        // third row: forest
        r.mouse_move(250.0, 158.0);
        r.mouse_down(250.0, 158.0, 0);
        assert_eq!(r.overlay_phase(), OverlayPhase::Closed);
        assert_eq!(r.pending_palette(), Some("forest"));
        r.mouse_up(250.0, 158.0, 0);

        r.tick(2.0);
        assert_eq!(r.palette_name(), "forest");
        assert_eq!(r.overlay_phase(), OverlayPhase::Open);
        assert_eq!(r.backdrop(), Rgb::new(0, 80, 0).scale(0.25));
    }
}
