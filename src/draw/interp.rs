//! Draw-group interpreter

use super::{Arg, DrawEntry, DrawError, DrawObject, Painter, Scope, Value};
use crate::asset::{AssetStore, TextOptions};
use crate::canvas::Canvas;
use crate::palette::{canonicalize_hex, Rgb};
use log::{error, warn};

/// What happened during one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawReport {
    pub drawn: usize,
    /// Entries that drew nothing: failed guards, metadata, bad entries
    pub skipped: usize,
    /// Content problems; drawing continued
    pub warnings: Vec<String>,
    /// Missing assets or palette roles; that object was not drawn
    pub errors: Vec<String>,
}

impl DrawReport {
    pub fn merge(&mut self, other: DrawReport) {
        self.drawn += other.drawn;
        self.skipped += other.skipped;
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// Replays draw entries onto a canvas
pub struct Interpreter<'a> {
    canvas: &'a mut Canvas,
    assets: &'a AssetStore,
    scope: Scope<'a>,
    dx: i32,
    dy: i32,
    report: DrawReport,
}

impl<'a> Interpreter<'a> {
    pub fn new(canvas: &'a mut Canvas, assets: &'a AssetStore, scope: Scope<'a>) -> Self {
        Self {
            canvas,
            assets,
            scope,
            dx: 0,
            dy: 0,
            report: DrawReport::default(),
        }
    }

    /// Translate every drawn position by (dx, dy)
    pub fn with_offset(mut self, dx: i32, dy: i32) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    /// Draw a named group from the asset store
    pub fn run_group(&mut self, name: &str) -> DrawReport {
        let assets = self.assets;
        match assets.draw_group(name) {
            Some(entries) => self.run(entries),
            None => {
                let msg = format!("no draw group named '{}'", name);
                error!("{}", msg);
                DrawReport {
                    errors: vec![msg],
                    ..Default::default()
                }
            }
        }
    }

    /// Draw `entries` in order. Problems with one entry never stop the rest.
    pub fn run(&mut self, entries: &[DrawEntry]) -> DrawReport {
        for entry in entries {
            if let Some(guard) = &entry.guard {
                if !self.resolve(guard).as_bool() {
                    self.report.skipped += 1;
                    continue;
                }
            }
            match self.draw(&entry.object) {
                Ok(true) => self.report.drawn += 1,
                Ok(false) => self.report.skipped += 1,
                Err(e) => {
                    error!("{}: {}", entry.object.kind(), e);
                    self.report.errors.push(format!("{}: {}", entry.object.kind(), e));
                    self.report.skipped += 1;
                }
            }
        }
        std::mem::take(&mut self.report)
    }

    fn warn(&mut self, msg: String) {
        warn!("{}", msg);
        self.report.warnings.push(msg);
    }

    /// Resolve one argument to a value.
    ///
    /// `#role` becomes the active palette's hex for that role. A `#` string
    /// that is not a role but is valid hex is a literal color; anything
    /// else passes through unchanged with a warning.
    pub fn resolve(&mut self, arg: &Arg) -> Value {
        match arg {
            Arg::Lit(value) => value.clone(),
            Arg::Role(role) => {
                if let Some(color) = self.scope.palette.get(role) {
                    Value::Str(color.to_hex())
                } else if let Ok(hex) = canonicalize_hex(role) {
                    Value::Str(hex)
                } else {
                    self.warn(format!("unknown palette role '{}'", role));
                    Value::Str(format!("#{}", role))
                }
            }
            Arg::Provider { provider, negate } => match provider.eval(&self.scope) {
                Ok(value) if *negate => Value::Bool(!value.as_bool()),
                Ok(value) => value,
                Err(e) => {
                    self.warn(e);
                    Value::Null
                }
            },
            Arg::UnknownProvider(name) => {
                self.warn(format!("unknown value provider '${}'", name));
                Value::Null
            }
        }
    }

    fn num(&mut self, arg: &Arg) -> f64 {
        let value = self.resolve(arg);
        value.as_f64().unwrap_or_else(|| {
            self.warn(format!("expected a number, got {:?}", value));
            0.0
        })
    }

    fn int(&mut self, arg: &Arg) -> i32 {
        self.num(arg).round() as i32
    }

    fn x(&mut self, arg: &Arg) -> i32 {
        self.int(arg) + self.dx
    }

    fn y(&mut self, arg: &Arg) -> i32 {
        self.int(arg) + self.dy
    }

    /// `None` if the argument is not a usable color; unknown roles were
    /// already reported by `resolve`
    fn color(&mut self, arg: &Arg) -> Option<Rgb> {
        let is_role = matches!(arg, Arg::Role(_));
        match self.resolve(arg) {
            Value::Str(s) => match Rgb::from_hex(&s) {
                Ok(color) => Some(color),
                Err(e) => {
                    if !is_role {
                        self.warn(e.to_string());
                    }
                    None
                }
            },
            other => {
                self.warn(format!("expected a color, got {:?}", other));
                None
            }
        }
    }

    /// Returns whether anything was drawn
    fn draw(&mut self, object: &DrawObject) -> Result<bool, DrawError> {
        match object {
            DrawObject::Button { x, y, w, h, pressed } => {
                let (x, y, w, h) = (self.x(x), self.y(y), self.int(w), self.int(h));
                let pressed = self.resolve(pressed).as_bool();
                self.painter().button(x, y, w, h, pressed)?;
            }
            DrawObject::FilledRect { x, y, w, h, color } | DrawObject::StrokeRect { x, y, w, h, color } => {
                let (x, y, w, h) = (self.x(x), self.y(y), self.int(w), self.int(h));
                let Some(color) = self.color(color) else {
                    return Ok(false);
                };
                if matches!(object, DrawObject::FilledRect { .. }) {
                    self.canvas.fill_rect(x, y, w, h, color);
                } else {
                    self.canvas.stroke_rect(x, y, w, h, color);
                }
            }
            DrawObject::Image { name, x, y, dim } => {
                let name = self.resolve(name).as_text();
                let (x, y) = (self.x(x), self.y(y));
                let dim = match dim {
                    Some(arg) => self.resolve(arg).as_bool(),
                    None => false,
                };
                self.painter().image(&name, x, y, dim)?;
            }
            DrawObject::Line { x1, y1, x2, y2, color } => {
                let (x1, y1, x2, y2) = (self.x(x1), self.y(y1), self.x(x2), self.y(y2));
                let Some(color) = self.color(color) else {
                    return Ok(false);
                };
                self.canvas.line(x1, y1, x2, y2, color);
            }
            DrawObject::Pbar { value, x, y, w, h, color } => {
                let value = self.num(value);
                let (x, y, w, h) = (self.x(x), self.y(y), self.int(w), self.int(h));
                let Some(color) = self.color(color) else {
                    return Ok(false);
                };
                self.painter().pbar(value, x, y, w, h, color);
            }
            DrawObject::Text { font, text, x, y, color, rtl, space_width } => {
                let rtl = match rtl {
                    Some(arg) => self.resolve(arg).as_bool(),
                    None => false,
                };
                let space_width = space_width.as_ref().map(|arg| self.int(arg));
                return self.text(font, text, x, y, color.as_ref(), rtl, space_width);
            }
            DrawObject::TextRtl { font, text, x, y, color } => {
                return self.text(font, text, x, y, color.as_ref(), true, None);
            }
            DrawObject::Texture { x, y, w, h } => {
                let (x, y, w, h) = (self.x(x), self.y(y), self.int(w), self.int(h));
                self.painter().texture(x, y, w, h)?;
            }
            DrawObject::Pan { x, y, value } => {
                let (x, y) = (self.x(x), self.y(y));
                let value = self.resolve(value).as_f64();
                self.painter().pan(x, y, value)?;
            }
            DrawObject::VuMeter { x, y, w, h, value } => {
                let (x, y, w, h) = (self.x(x), self.y(y), self.int(w), self.int(h));
                let value = self.num(value);
                self.painter().vu_meter(x, y, w, h, value)?;
            }
            DrawObject::Waveform { x, y, width, color } => {
                let Some(chan) = self.scope.current_channel() else {
                    self.warn("waveform outside a channel group".to_string());
                    return Ok(false);
                };
                let Some(wave) = chan.wave else {
                    return Ok(false);
                };
                let (x, y, width) = (self.x(x), self.y(y), self.int(width));
                let Some(color) = self.color(color) else {
                    return Ok(false);
                };
                self.painter().waveform(x, y, width, color, &wave);
            }
            DrawObject::Window { x, y, w, h, title } => {
                let (x, y, w, h) = (self.x(x), self.y(y), self.int(w), self.int(h));
                let title = title.as_ref().map(|arg| self.resolve(arg).as_text());
                self.painter().window(x, y, w, h, title.as_deref())?;
            }
            DrawObject::Nop | DrawObject::Bounds(_) => return Ok(false),
            DrawObject::Unknown { kind } => {
                self.warn(format!("unrecognized draw object kind '{}'", kind));
                return Ok(false);
            }
            DrawObject::Invalid { kind, reason } => {
                self.warn(format!("malformed '{}': {}", kind, reason));
                return Ok(false);
            }
        }
        Ok(true)
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        font: &Arg,
        text: &Arg,
        x: &Arg,
        y: &Arg,
        color: Option<&Arg>,
        rtl: bool,
        space_width: Option<i32>,
    ) -> Result<bool, DrawError> {
        let font = self.resolve(font).as_text();
        let text = self.resolve(text).as_text();
        let (x, y) = (self.x(x), self.y(y));
        let color = match color {
            Some(arg) => match self.color(arg) {
                Some(color) => Some(color),
                None => return Ok(false),
            },
            None => None,
        };

        let opts = TextOptions { color, rtl, space_width };
        let unknown = self.painter().text(&font, &text, x, y, opts)?;
        for ch in unknown {
            self.report.warnings.push(format!("font '{}' has no glyph for '{}'", font, ch));
        }
        Ok(true)
    }

    fn painter(&mut self) -> Painter<'_> {
        Painter::new(self.canvas, self.scope.palette, self.assets)
    }
}
