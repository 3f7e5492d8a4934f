//! sccview: a skinned pixel-art front end for a MIDI channel sequencer
//!
//! Everything is drawn into a fixed-size software canvas from a data-driven
//! skin (palettes, indexed images, bitmap fonts and draw groups listed in a
//! JSON manifest). macroquad only presents that canvas at an integer scale
//! and feeds mouse input back in.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod asset;
mod canvas;
mod config;
mod draw;
mod palette;
mod renderer;
mod song;
mod storage;
mod ui;

use asset::AssetLoader;
use config::AppConfig;
use log::{error, info, warn};
use macroquad::miniquad::{window::set_mouse_cursor, CursorIcon};
use macroquad::prelude::*;
use palette::{Palette, Rgb};
use renderer::{CanvasRenderer, RendererOptions, Request};
use song::{SharedSong, Song};
use ui::{CursorHint, MouseState};

/// Length of the stand-in song the slider runs through while nothing real
/// drives playback
const DEMO_SONG_SECONDS: f64 = 90.0;

const LOADING_TEXT: &str = "Loading assets...";
const LOADING_FONT_SIZE: f32 = 20.0;

fn window_conf() -> Conf {
    let defaults = AppConfig::default();
    Conf {
        window_title: format!("sccview v{}", VERSION),
        window_width: defaults.canvas_width as i32 * 2,
        window_height: defaults.canvas_height as i32 * 2,
        window_resizable: true,
        ..Default::default()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

fn cursor_icon(hint: CursorHint) -> CursorIcon {
    match hint {
        CursorHint::Auto => CursorIcon::Default,
        CursorHint::Pointer => CursorIcon::Pointer,
        CursorHint::EwResize => CursorIcon::EWResize,
    }
}

/// Shown until the manifest and everything it lists has arrived
fn draw_loading_screen(palette: &Palette, loader: &AssetLoader) {
    clear_background(to_color(palette.background()));
    let fg = to_color(palette.get("foreground").unwrap_or(Rgb::BLACK));

    let mut lines = vec![LOADING_TEXT.to_string()];
    if loader.outstanding() > 0 {
        lines.push(format!("{} left", loader.outstanding()));
    }
    if !loader.failures().is_empty() {
        lines.push(format!("{} failed to load", loader.failures().len()));
    }

    let line_height = LOADING_FONT_SIZE + 4.0;
    let top = ((screen_height() - line_height * lines.len() as f32) / 2.0).floor();
    for (i, line) in lines.iter().enumerate() {
        let size = measure_text(line, None, LOADING_FONT_SIZE as u16, 1.0);
        draw_text(
            line,
            ((screen_width() - size.width) / 2.0).floor(),
            top + line_height * (i as f32 + 1.0),
            LOADING_FONT_SIZE,
            fg,
        );
    }
}

/// Act on what the renderer asked for this frame
fn handle_requests(renderer: &mut CanvasRenderer, song: &SharedSong) {
    for request in renderer.drain_requests() {
        match request {
            Request::Transport(transport) => {
                if !song.borrow_mut().apply_transport(transport) {
                    warn!("'{}' needs a sequencer; ignored", transport.name());
                }
                renderer.draw_group("positionSlider");
            }
            Request::OpenUrl(url) => {
                if let Err(e) = webbrowser::open(&url) {
                    error!("could not open {}: {}", url, e);
                }
            }
        }
    }
}

/// Write the active palette into the working directory as a PNG strip
fn export_palette(renderer: &CanvasRenderer) {
    let Some(png) = renderer.export_palette_png() else {
        return;
    };
    let path = format!("{}-palette.png", renderer.palette_name());
    match std::fs::write(&path, png) {
        Ok(()) => info!("exported palette to {}", path),
        Err(e) => error!("could not write {}: {}", path, e),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("=== sccview v{} ===", VERSION);

    let config = AppConfig::load();
    let fetcher = storage::fetcher_for(&config.manifest, &config.asset_root);
    let mut loader = AssetLoader::new(fetcher);
    loader.load(&config.manifest);

    let song = Song::new(config.channels).shared();
    let loading_palette = Palette::loading();
    let mut renderer: Option<CanvasRenderer> = None;

    let mut mouse = MouseState::default();
    let mut cursor = CursorHint::Auto;
    let mut last_time = get_time();

    loop {
        let now = get_time();
        let dt = now - last_time;
        last_time = now;

        if renderer.is_none() && loader.poll() {
            let prefs = storage::prefs::open_default();
            let mut fresh = CanvasRenderer::new(loader.store(), song.clone(), prefs, RendererOptions::from(&config));
            let report = fresh.redraw();
            if !report.is_clean() {
                warn!(
                    "first frame: {} warnings, {} errors",
                    report.warnings.len(),
                    report.errors.len()
                );
            }
            renderer = Some(fresh);
        }

        let Some(r) = renderer.as_mut() else {
            draw_loading_screen(&loading_palette, &loader);
            next_frame().await;
            continue;
        };

        // Canvas placement: integer scale, centered
        let scale = r.rescale(screen_width(), screen_height());
        let draw_w = r.canvas().width() as f32 * scale;
        let draw_h = r.canvas().height() as f32 * scale;
        let origin = (
            ((screen_width() - draw_w) / 2.0).floor(),
            ((screen_height() - draw_h) / 2.0).floor(),
        );

        mouse = MouseState::poll(&mouse, origin);
        if mouse.moved {
            r.mouse_move(mouse.x, mouse.y);
        }
        if mouse.left_pressed {
            r.mouse_down(mouse.x, mouse.y, 0);
        }
        if mouse.left_released {
            r.mouse_up(mouse.x, mouse.y, 0);
        }
        if is_key_pressed(KeyCode::F1) {
            r.toggle_font_specimen();
        }
        if is_key_pressed(KeyCode::F2) {
            export_palette(r);
        }

        r.tick(now);
        handle_requests(r, &song);

        {
            let mut s = song.borrow_mut();
            if s.is_playing() {
                s.advance(dt / DEMO_SONG_SECONDS);
                s.animate_meters(now);
            }
        }
        r.render_frame();

        if r.cursor() != cursor {
            cursor = r.cursor();
            set_mouse_cursor(cursor_icon(cursor));
        }

        clear_background(to_color(r.backdrop()));
        let canvas = r.canvas();
        let texture = Texture2D::from_rgba8(canvas.width() as u16, canvas.height() as u16, canvas.pixels());
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            origin.0,
            origin.1,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
