//! Canvas renderer
//!
//! Owns the software canvas and everything needed to paint it: the shared
//! asset store and song, the hit detector, the active palette and the
//! preferences. Pointer input goes in through `mouse_*`, the presenter
//! drives time through `tick`, and requests for the outside world (transport
//! buttons, the project link) come back out of `drain_requests`.

mod overlay;
mod regions;
mod schedule;
mod transition;

pub use overlay::{window_rect, OverlayPhase};
pub use regions::{channel_origin, position_from_x};
pub use schedule::Scheduler;

use crate::asset::{SharedAssets, DEFAULT_PALETTE};
use crate::canvas::{Canvas, PixelRect};
use crate::config::AppConfig;
use crate::draw::{DrawEntry, DrawReport, Interpreter, Scope};
use crate::palette::{Palette, Rgb};
use crate::song::{SharedSong, Transport};
use crate::storage::prefs::{PREF_PALETTE, PREF_REPEAT};
use crate::storage::Preferences;
use crate::ui::{CursorHint, HitDetector, HitEvent};
use log::{debug, error, info};
use overlay::Overlay;
use transition::Transitions;

/// Prefix of the draw groups drawn once per channel
pub const CHANNEL_PREFIX: &str = "channel";
/// Prefix of draw groups that only appear on the config overlay
pub const OVERLAY_PREFIX: &str = "overlay";

/// What a hit region does when triggered
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Redraw a group (hover effects)
    Redraw(String),
    /// Redraw a group now and again when the button is released
    Press(String),
    ToggleMute(usize),
    /// Start dragging the position slider
    Seek,
    ToggleRepeat,
    Transport(Transport),
    OpenConfig,
    CloseConfig,
    /// Close the overlay if the click landed outside its window
    DismissOverlay,
    SwitchPalette(String),
    OpenLink,
}

/// Something the presenter should do on the renderer's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Transport(Transport),
    OpenUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    OpenConfig,
    FinishTransition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererOptions {
    pub width: usize,
    pub height: usize,
    pub palette_switch_delay: f64,
    pub press_feedback_delay: f64,
    pub continuous_render: bool,
    pub project_url: String,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RendererOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            width: config.canvas_width,
            height: config.canvas_height,
            palette_switch_delay: config.palette_switch_delay,
            press_feedback_delay: config.press_feedback_delay,
            continuous_render: config.continuous_render,
            project_url: config.project_url.clone(),
        }
    }
}

pub struct CanvasRenderer {
    canvas: Canvas,
    assets: SharedAssets,
    song: SharedSong,
    hits: HitDetector<UiAction>,
    prefs: Box<dyn Preferences>,
    options: RendererOptions,

    palette_name: String,
    palette: Palette,
    /// Color behind the canvas (window clear color)
    backdrop: Rgb,
    scale: f32,

    overlay: Overlay,
    transitions: Transitions,
    scheduler: Scheduler<Task>,
    requests: Vec<Request>,

    dragging_slider: bool,
    /// Groups drawn pressed, redrawn on release
    pressed: Vec<String>,
    /// Bumped whenever the whole region set is swapped
    region_epoch: u64,
    showing_specimen: bool,
    now: f64,
}

impl CanvasRenderer {
    pub fn new(assets: SharedAssets, song: SharedSong, prefs: Box<dyn Preferences>, options: RendererOptions) -> Self {
        let default_palette = assets
            .borrow()
            .palette(DEFAULT_PALETTE)
            .cloned()
            .unwrap_or_else(Palette::loading);

        let mut renderer = Self {
            canvas: Canvas::new(options.width, options.height),
            assets,
            song,
            hits: HitDetector::new(),
            prefs,
            options,
            palette_name: DEFAULT_PALETTE.to_string(),
            backdrop: default_palette.background(),
            palette: default_palette,
            scale: 1.0,
            overlay: Overlay::Closed,
            transitions: Transitions::default(),
            scheduler: Scheduler::new(),
            requests: Vec::new(),
            dragging_slider: false,
            pressed: Vec::new(),
            region_epoch: 0,
            showing_specimen: false,
            now: 0.0,
        };

        if let Some(repeat) = renderer.prefs.get_bool(PREF_REPEAT) {
            renderer.song.borrow_mut().repeat = repeat;
        }
        if let Some(name) = renderer.prefs.get(PREF_PALETTE) {
            renderer.apply_palette_now(&name);
        }
        renderer.init_regions();
        renderer
    }

    // -- accessors --

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn backdrop(&self) -> Rgb {
        self.backdrop
    }

    #[cfg(test)]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_name(&self) -> &str {
        &self.palette_name
    }

    pub fn cursor(&self) -> CursorHint {
        self.hits.cursor()
    }

    #[cfg(test)]
    pub fn hits(&self) -> &HitDetector<UiAction> {
        &self.hits
    }

    #[cfg(test)]
    pub fn song(&self) -> &SharedSong {
        &self.song
    }

    #[cfg(test)]
    pub fn is_showing_specimen(&self) -> bool {
        self.showing_specimen
    }

    /// Take the requests queued since the last call
    pub fn drain_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    /// Integer scale that fits the canvas in a `win_w`×`win_h` window
    pub fn rescale(&mut self, win_w: f32, win_h: f32) -> f32 {
        let fit = (win_w / self.canvas.width() as f32).min(win_h / self.canvas.height() as f32);
        self.scale = fit.floor().max(1.0);
        self.hits.set_scale(self.scale);
        self.scale
    }

    // -- drawing --

    /// Paint everything: the non-channel groups in manifest order, then every
    /// channel
    pub fn redraw(&mut self) -> DrawReport {
        self.canvas.clear(self.palette.background());
        let mut report = DrawReport::default();

        let groups = self.assets.borrow().group_names();
        for name in groups
            .iter()
            .filter(|n| !n.starts_with(CHANNEL_PREFIX) && !n.starts_with(OVERLAY_PREFIX))
        {
            report.merge(self.draw_group(name));
        }

        let channels = self.song.borrow().channels.len();
        for idx in 0..channels {
            report.merge(self.draw_channel(idx, None));
        }
        report
    }

    pub fn draw_group(&mut self, name: &str) -> DrawReport {
        self.draw_group_at(name, None, 0, 0)
    }

    /// Draw a group translated by (dx, dy), with `channel` in scope for
    /// channel providers
    pub fn draw_group_at(&mut self, name: &str, channel: Option<usize>, dx: i32, dy: i32) -> DrawReport {
        let song = self.song.borrow();
        let assets = self.assets.borrow();
        let mut scope = Scope::new(&song, &self.hits, &self.palette);
        if let Some(idx) = channel {
            scope = scope.with_channel(idx);
        }
        Interpreter::new(&mut self.canvas, &assets, scope)
            .with_offset(dx, dy)
            .run_group(name)
    }

    /// Draw ad-hoc entries (overlay content)
    fn draw_entries(&mut self, entries: &[DrawEntry]) -> DrawReport {
        let song = self.song.borrow();
        let assets = self.assets.borrow();
        let scope = Scope::new(&song, &self.hits, &self.palette);
        Interpreter::new(&mut self.canvas, &assets, scope).run(entries)
    }

    /// Draw one channel at its grid position: a single group, or every
    /// `channel*` group
    pub fn draw_channel(&mut self, idx: usize, group: Option<&str>) -> DrawReport {
        let (x, y) = channel_origin(idx);
        match group {
            Some(name) => self.draw_group_at(name, Some(idx), x, y),
            None => self.draw_all_groups_with_prefix(CHANNEL_PREFIX, Some(idx), x, y),
        }
    }

    pub fn draw_all_groups_with_prefix(&mut self, prefix: &str, channel: Option<usize>, dx: i32, dy: i32) -> DrawReport {
        let groups = self.assets.borrow().group_names();
        let mut report = DrawReport::default();
        for name in groups.iter().filter(|n| n.starts_with(prefix)) {
            report.merge(self.draw_group_at(name, channel, dx, dy));
        }
        report
    }

    /// Per-frame work for the presenter: while playing, keep the meters and
    /// the position slider current
    pub fn render_frame(&mut self) {
        if !self.options.continuous_render
            || self.showing_specimen
            || self.overlay.phase() != OverlayPhase::Closed
            || self.transitions.is_busy()
            || !self.song.borrow().is_playing()
        {
            return;
        }
        let channels = self.song.borrow().channels.len();
        for idx in 0..channels {
            self.draw_channel(idx, Some("channelVEN"));
        }
        self.draw_group("positionSlider");
    }

    /// Center a line of text in the given font (used for "Loading...")
    fn draw_centered_text(&mut self, font: &str, text: &str, color: Rgb) {
        let assets = self.assets.borrow();
        let Some(font) = assets.font(font) else {
            error!("no font named '{}'", font);
            return;
        };
        let x = (self.canvas.width() as i32 - font.text_width(text)) / 2;
        let y = (self.canvas.height() as i32 - font.height() as i32) / 2;
        font.draw_text(&mut self.canvas, text, x, y, Some(color));
    }

    /// Debug view: every font's character map, raw and tinted, with its
    /// glyph count right-aligned on the same line
    pub fn draw_font_specimen(&mut self) {
        self.canvas.clear(self.palette.background());
        let fg = self.palette.get("foreground").unwrap_or(Rgb::BLACK);
        let right = self.canvas.width() as i32 - 10;
        let assets = self.assets.borrow();
        let mut y = 10;
        for tint in [None, Some(fg)] {
            for name in assets.font_names() {
                if let Some(font) = assets.font(&name) {
                    font.draw_text(&mut self.canvas, &font.map(), 10, y, tint);
                    font.draw_text_rtl(&mut self.canvas, &font.glyph_count().to_string(), right, y, tint);
                    y += font.height() as i32 + 4;
                }
            }
            y += 8;
        }
    }

    /// The active palette as a PNG strip, one pixel per role sorted by name
    pub fn export_palette_png(&self) -> Option<Vec<u8>> {
        let strip = self.assets.borrow().export_palette_strip(&self.palette_name)?;
        match strip.to_png() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!("could not encode palette '{}': {}", self.palette_name, e);
                None
            }
        }
    }

    pub fn toggle_font_specimen(&mut self) {
        self.showing_specimen = !self.showing_specimen;
        if self.showing_specimen {
            self.draw_font_specimen();
        } else if self.overlay.phase() == OverlayPhase::Open {
            self.repaint_overlay();
        } else {
            self.redraw();
        }
    }

    // -- input --

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        if self.input_blocked() {
            return;
        }
        let events = self.hits.mouse_move(x, y);
        if self.dragging_slider {
            self.seek_to(x / self.scale);
        }
        self.dispatch(events);
    }

    pub fn mouse_down(&mut self, x: f32, y: f32, button: u8) {
        if self.input_blocked() {
            return;
        }
        let events = self.hits.mouse_down(x, y, button);
        self.dispatch(events);
    }

    pub fn mouse_up(&mut self, x: f32, y: f32, button: u8) {
        if button == 0 {
            self.dragging_slider = false;
        }
        // the detector sees every release, blocked or not
        let events = self.hits.mouse_up(x, y, button);
        if self.input_blocked() {
            return;
        }
        self.dispatch(events);

        let pressed = std::mem::take(&mut self.pressed);
        if self.overlay.phase() == OverlayPhase::Closed {
            for group in pressed {
                self.draw_group(&group);
            }
        }
    }

    /// Input is ignored while a palette swap is repainting the frame
    fn input_blocked(&self) -> bool {
        self.transitions.is_busy() || self.showing_specimen
    }

    fn dispatch(&mut self, events: Vec<HitEvent>) {
        let epoch = self.region_epoch;
        for event in events {
            for action in self.hits.handlers(&event) {
                self.perform(action, &event);
                // the regions these events refer to are gone
                if self.region_epoch != epoch {
                    return;
                }
            }
        }
    }

    fn perform(&mut self, action: UiAction, event: &HitEvent) {
        debug!("{:?} -> {:?}", event, action);
        match action {
            UiAction::Redraw(group) => {
                self.draw_group(&group);
            }
            UiAction::Press(group) => {
                self.draw_group(&group);
                if !self.pressed.contains(&group) {
                    self.pressed.push(group);
                }
            }
            UiAction::ToggleMute(idx) => {
                if let Some(chan) = self.song.borrow_mut().channels.get_mut(idx) {
                    chan.mute = !chan.mute;
                }
                self.draw_channel(idx, None);
            }
            UiAction::Seek => {
                if let HitEvent::Down { x, .. } = event {
                    self.dragging_slider = true;
                    self.seek_to(*x);
                }
            }
            UiAction::ToggleRepeat => {
                let repeat = {
                    let mut song = self.song.borrow_mut();
                    song.repeat = !song.repeat;
                    song.repeat
                };
                self.prefs.set(PREF_REPEAT, &repeat.to_string());
                self.draw_group("loop");
            }
            UiAction::Transport(transport) => {
                info!("transport: {}", transport.name());
                self.requests.push(Request::Transport(transport));
            }
            UiAction::OpenConfig => {
                if self.overlay.phase() == OverlayPhase::Closed {
                    self.overlay = Overlay::Opening;
                    self.scheduler
                        .schedule(self.now + self.options.press_feedback_delay, Task::OpenConfig);
                }
            }
            UiAction::CloseConfig => self.close_config(),
            UiAction::DismissOverlay => {
                if let HitEvent::Down { x, y, .. } = event {
                    let rect = window_rect(self.canvas.width(), self.canvas.height());
                    if !rect.contains(*x as i32, *y as i32) {
                        self.close_config();
                    }
                }
            }
            UiAction::SwitchPalette(name) => self.request_palette(&name),
            UiAction::OpenLink => {
                self.requests.push(Request::OpenUrl(self.options.project_url.clone()));
            }
        }
    }

    /// Move the slider to canvas x
    fn seek_to(&mut self, x: f32) {
        self.song.borrow_mut().set_position(position_from_x(x));
        self.draw_group("positionSlider");
    }

    // -- time --

    /// Advance the clock to `now` (seconds) and run whatever is due
    pub fn tick(&mut self, now: f64) {
        self.now = now;
        for task in self.scheduler.take_due(now) {
            match task {
                Task::OpenConfig => {
                    if self.overlay.phase() == OverlayPhase::Opening {
                        self.open_config();
                    }
                }
                Task::FinishTransition => self.finish_transition(),
            }
        }
    }

    /// Switch palettes without the transition (startup)
    fn apply_palette_now(&mut self, name: &str) {
        if name == self.palette_name {
            return;
        }
        let Some(palette) = self.assets.borrow().palette(name).cloned() else {
            error!("saved palette '{}' does not exist", name);
            return;
        };
        if !self.assets.borrow_mut().switch_palette(&self.palette_name, name) {
            return;
        }
        self.palette_name = name.to_string();
        self.backdrop = palette.background();
        self.palette = palette;
    }

    /// Area a group actually paints, found by drawing it on a blank scratch
    /// canvas
    pub fn measure_group_bounds(&self, name: &str, channel: Option<usize>) -> Option<PixelRect> {
        let mut scratch = regions::scratch_canvas(&self.canvas);
        let song = self.song.borrow();
        let assets = self.assets.borrow();
        let mut scope = Scope::new(&song, &self.hits, &self.palette);
        if let Some(idx) = channel {
            scope = scope.with_channel(idx);
        }
        Interpreter::new(&mut scratch, &assets, scope).run_group(name);
        scratch.painted_bounds()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::asset::{font_test_strip, AssetStore, BitmapFont};
    use crate::canvas::ImageData;
    use crate::draw::parse_group;
    use crate::song::Song;
    use crate::storage::prefs::MemoryPreferences;
    use serde_json::json;

    pub(crate) fn ocean() -> Palette {
        Palette::new()
            .with("background", Rgb::new(0, 0, 80))
            .with("foreground", Rgb::new(0, 0, 10))
            .with("dark", Rgb::new(0, 0, 40))
            .with("light", Rgb::new(0, 200, 255))
            .with("white", Rgb::WHITE)
    }

    pub(crate) fn store() -> AssetStore {
        let mut store = AssetStore::new();
        store.insert_palette("ocean", ocean());
        store.insert_palette("forest", ocean().with("background", Rgb::new(0, 80, 0)));

        let font = font_test_strip(&[1; 8]);
        for name in ["small", "medium", "large"] {
            store.insert_font(name, BitmapFont::from_strip(name, &font, "Loadingx", &[]));
        }
        let light = Palette::loading().get("light").unwrap_or_default().to_rgba();
        for name in ["upperLeft", "upperRight", "lowerLeft", "lowerRight"] {
            let mut corner = ImageData::new(3, 3);
            corner.set_pixel(2, 2, light);
            store.insert_image(name, corner);
        }
        let mut icon = ImageData::new(2, 2);
        icon.set_pixel(0, 0, light);
        store.insert_image("repeat", icon);

        let groups = json!({
            "logos": [["filledRect", 0, 0, 4, 4, "#light"]],
            "positionSlider": [
                ["filledRect", 58, 402, 236, 16, "#background"],
                ["pbar", "$position", 59, 402, 235, 16, "#dark"],
                ["strokeRect", 58, 402, 236, 16, "#foreground"]
            ],
            "loop": [
                ["button", 300, 402, 20, 16, "$pressed:loop"],
                ["image", "repeat", 304, 405, "$!repeat"],
                ["bounds", 300, 402, 20, 17]
            ],
            "play": [["button", 132, 19, 34, 21, "$pressed:play"], ["bounds", 132, 19, 34, 22]],
            "config": [["button", 332, 19, 34, 21, "$pressed:config"]],
            "link": [["line?over:link", 164, 443, 347, 443, "#dark"], ["bounds", 164, 435, 183, 10]],
            "channelMutePoly": [["strokeRect", 0, 0, 33, 13, "#foreground"], ["image?mute", "repeat", 3, 3]],
            "channelVEN": [["vuMeter", 4, 26, 0, 15, "$volume"]]
        });
        for (name, items) in groups.as_object().unwrap() {
            store.insert_draw_group(name, parse_group(items.as_array().unwrap()));
        }
        store
    }

    pub(crate) fn renderer_with(store: AssetStore, prefs: MemoryPreferences) -> CanvasRenderer {
        let song = Song::new(32).shared();
        let mut r = CanvasRenderer::new(store.shared(), song, Box::new(prefs), RendererOptions::default());
        r.redraw();
        r
    }

    pub(crate) fn renderer() -> CanvasRenderer {
        renderer_with(store(), MemoryPreferences::new())
    }

    fn click(r: &mut CanvasRenderer, x: f32, y: f32) {
        r.mouse_move(x, y);
        r.mouse_down(x, y, 0);
        r.mouse_up(x, y, 0);
    }

    #[test]
    fn test_redraw_paints_groups_and_channels() {
        let mut r = renderer();
        let report = r.redraw();
        assert!(report.is_clean(), "{:?}", report);
        let light = r.palette().get("light").unwrap().to_rgba();
        assert_eq!(r.canvas().pixel(1, 1), Some(light));
        // channel 17 sits in the second bank
        let (x, y) = channel_origin(17);
        assert_eq!((x, y), (94, 217));
        assert_eq!(r.canvas().pixel(x, y), Some(r.palette().get("foreground").unwrap().to_rgba()));
    }

    #[test]
    fn test_mute_toggle() {
        let mut r = renderer();
        click(&mut r, 60.0, 50.0);
        assert!(r.song().borrow().channels[0].mute);
        let light = r.palette().get("light").unwrap().to_rgba();
        assert_eq!(r.canvas().pixel(58 + 3, 49 + 3), Some(light));
        click(&mut r, 60.0, 50.0);
        assert!(!r.song().borrow().channels[0].mute);
    }

    #[test]
    fn test_slider_seek_and_drag() {
        let mut r = renderer();
        r.mouse_move(175.0, 410.0);
        assert_eq!(r.cursor(), CursorHint::EwResize);
        r.mouse_down(175.0, 410.0, 0);
        assert!((r.song().borrow().position - 0.5).abs() < 1e-9);

        r.mouse_move(600.0, 300.0);
        assert_eq!(r.song().borrow().position, 1.0);
        r.mouse_up(600.0, 300.0, 0);
        r.mouse_move(10.0, 300.0);
        assert_eq!(r.song().borrow().position, 1.0);
    }

    #[test]
    fn test_repeat_toggles_on_release() {
        let mut r = renderer();
        r.mouse_move(305.0, 410.0);
        r.mouse_down(305.0, 410.0, 0);
        assert!(r.song().borrow().repeat);
        r.mouse_up(305.0, 410.0, 0);
        assert!(!r.song().borrow().repeat);
        assert_eq!(r.prefs.get(PREF_REPEAT).as_deref(), Some("false"));
    }

    #[test]
    fn test_transport_request_and_press_visual() {
        let mut r = renderer();
        r.mouse_move(140.0, 30.0);
        r.mouse_down(140.0, 30.0, 0);
        assert_eq!(r.drain_requests(), vec![Request::Transport(Transport::Play)]);
        let bg = r.palette().get("background").unwrap().to_rgba();
        let light = r.palette().get("light").unwrap().to_rgba();
        assert_eq!(r.canvas().pixel(133, 20), Some(bg));
        r.mouse_up(140.0, 30.0, 0);
        assert_eq!(r.canvas().pixel(133, 20), Some(light));
        assert!(r.drain_requests().is_empty());
    }

    #[test]
    fn test_link_hover_and_open() {
        let mut r = renderer();
        let dark = r.palette().get("dark").unwrap().to_rgba();
        r.mouse_move(200.0, 440.0);
        assert_eq!(r.canvas().pixel(200, 443), Some(dark));
        r.mouse_down(200.0, 440.0, 0);
        assert_eq!(
            r.drain_requests(),
            vec![Request::OpenUrl("https://github.com/milkey-mouse/JSSCC".into())]
        );
    }

    #[test]
    fn test_rescale() {
        let mut r = renderer();
        assert_eq!(r.rescale(1268.0, 900.0), 2.0);
        assert_eq!(r.rescale(600.0, 400.0), 1.0);
        r.rescale(1902.0, 1332.0);
        // window (180, 90) is canvas (60, 30); channel 0 mute box
        r.mouse_move(180.0, 150.0);
        r.mouse_down(180.0, 150.0, 0);
        assert!(r.song().borrow().channels[0].mute);
    }

    #[test]
    fn test_continuous_render_only_while_playing() {
        let mut r = renderer();
        let (x, y) = channel_origin(0);
        let dark = r.palette().get("dark").unwrap().to_rgba();
        let light = r.palette().get("light").unwrap().to_rgba();
        assert_eq!(r.canvas().pixel(x + 4, y + 26), Some(dark));

        r.song().borrow_mut().channels[0].volume = 1.0;
        r.render_frame();
        assert_eq!(r.canvas().pixel(x + 4, y + 26), Some(dark));

        r.song().borrow_mut().apply_transport(Transport::Play);
        r.render_frame();
        assert_eq!(r.canvas().pixel(x + 4, y + 26), Some(light));
    }

    #[test]
    fn test_saved_preferences_apply_at_startup() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(PREF_PALETTE, "ocean");
        prefs.set(PREF_REPEAT, "false");
        let r = renderer_with(store(), prefs);
        assert_eq!(r.palette_name(), "ocean");
        assert_eq!(r.backdrop(), Rgb::new(0, 0, 80));
        assert!(!r.song().borrow().repeat);
        let icon = r.assets.borrow().image("repeat").cloned().unwrap();
        assert_eq!(icon.pixel(0, 0), Some([0, 200, 255, 255]));
    }

    #[test]
    fn test_export_palette_png() {
        let r = renderer();
        let png = r.export_palette_png().unwrap();
        let strip = ImageData::decode(&png).unwrap();
        assert_eq!((strip.width, strip.height), (5, 1));
        // background sorts first
        assert_eq!(strip.pixel(0, 0), Some(r.palette().background().to_rgba()));
    }

    #[test]
    fn test_font_specimen_blocks_input() {
        let mut r = renderer();
        r.toggle_font_specimen();
        assert!(r.is_showing_specimen());
        click(&mut r, 60.0, 50.0);
        assert!(!r.song().borrow().channels[0].mute);
        r.toggle_font_specimen();
        click(&mut r, 60.0, 50.0);
        assert!(r.song().borrow().channels[0].mute);
    }

    #[test]
    fn test_font_specimen_right_aligns_glyph_count() {
        let mut store = store();
        store.insert_font("digits", BitmapFont::from_strip("digits", &font_test_strip(&[1; 8]), "12345678", &[]));
        let mut r = renderer_with(store, MemoryPreferences::new());
        r.toggle_font_specimen();

        // "8" is one pixel wide and ends 10px from the right edge
        let right = r.canvas().width() as i32 - 10;
        let ink = [0, 0, 0, 255];
        let height = r.canvas().height() as i32;
        assert!((0..height).any(|y| r.canvas().pixel(right - 1, y) == Some(ink)));
        assert!(!(0..height).any(|y| r.canvas().pixel(right, y) == Some(ink)));
    }
}
