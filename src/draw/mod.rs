//! Declarative draw objects
//!
//! Draw groups in the manifest are lists of JSON tuples such as
//! `["filledRect", 0, 0, 10, 10, "#dark"]`. They are parsed once at load
//! into `DrawEntry` values and replayed by the `Interpreter` whenever a group
//! needs painting.
//!
//! Argument syntax:
//! - `#role` names a palette role (`&role` is accepted too); a `#` string
//!   that is not a role but parses as hex is a literal color
//! - `$name` / `$name:param` reads a live value from the closed provider
//!   table, `$!name` negates a boolean provider
//! - anything else is a literal
//!
//! A kind written `kind?cond` (or `kind?!cond`) only draws when the boolean
//! provider `cond` is true (or false).

mod interp;
mod painter;
mod provider;

pub use interp::{DrawReport, Interpreter};
pub use painter::{DrawError, Painter};
pub use provider::{Provider, Scope};

use crate::canvas::PixelRect;
use serde_json::Value as Json;

/// A resolved argument value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

impl Value {
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => n.as_f64().map(Value::Num).unwrap_or(Value::Null),
            Json::String(s) => Value::Str(s.clone()),
            other => Value::Str(other.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// JS-ish truthiness
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Num(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Value::Num(n) => n.to_string(),
            Value::Str(s) => s.clone(),
        }
    }
}

/// One argument slot of a draw object
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Lit(Value),
    /// `#role`; resolved against the active palette at draw time
    Role(String),
    Provider { provider: Provider, negate: bool },
    /// `$name` that is not in the provider table
    UnknownProvider(String),
}

impl Arg {
    pub fn parse(json: &Json) -> Self {
        let Json::String(s) = json else {
            return Arg::Lit(Value::from_json(json));
        };
        if let Some(expr) = s.strip_prefix('$') {
            let (negate, expr) = match expr.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, expr),
            };
            return match Provider::parse(expr) {
                Some(provider) => Arg::Provider { provider, negate },
                None => Arg::UnknownProvider(expr.to_string()),
            };
        }
        if let Some(role) = s.strip_prefix('#').or_else(|| s.strip_prefix('&')) {
            if !role.is_empty() {
                return Arg::Role(role.to_string());
            }
        }
        Arg::Lit(Value::Str(s.clone()))
    }

    #[cfg(test)]
    pub fn num(n: f64) -> Self {
        Arg::Lit(Value::Num(n))
    }
}

/// Typed draw objects, one variant per kind
#[derive(Debug, Clone, PartialEq)]
pub enum DrawObject {
    Button { x: Arg, y: Arg, w: Arg, h: Arg, pressed: Arg },
    FilledRect { x: Arg, y: Arg, w: Arg, h: Arg, color: Arg },
    StrokeRect { x: Arg, y: Arg, w: Arg, h: Arg, color: Arg },
    /// `dim` recolors light to foreground (used for toggles that are off)
    Image { name: Arg, x: Arg, y: Arg, dim: Option<Arg> },
    Line { x1: Arg, y1: Arg, x2: Arg, y2: Arg, color: Arg },
    Pbar { value: Arg, x: Arg, y: Arg, w: Arg, h: Arg, color: Arg },
    Text {
        font: Arg,
        text: Arg,
        x: Arg,
        y: Arg,
        color: Option<Arg>,
        rtl: Option<Arg>,
        space_width: Option<Arg>,
    },
    TextRtl { font: Arg, text: Arg, x: Arg, y: Arg, color: Option<Arg> },
    Texture { x: Arg, y: Arg, w: Arg, h: Arg },
    Pan { x: Arg, y: Arg, value: Arg },
    VuMeter { x: Arg, y: Arg, w: Arg, h: Arg, value: Arg },
    Waveform { x: Arg, y: Arg, width: Arg, color: Arg },
    Window { x: Arg, y: Arg, w: Arg, h: Arg, title: Option<Arg> },
    Nop,
    /// Hit-box metadata for `auto_region`; never drawn
    Bounds(PixelRect),
    Unknown { kind: String },
    /// Known kind with the wrong shape
    Invalid { kind: String, reason: String },
}

impl DrawObject {
    pub fn kind(&self) -> &str {
        match self {
            DrawObject::Button { .. } => "button",
            DrawObject::FilledRect { .. } => "filledRect",
            DrawObject::StrokeRect { .. } => "strokeRect",
            DrawObject::Image { .. } => "image",
            DrawObject::Line { .. } => "line",
            DrawObject::Pbar { .. } => "pbar",
            DrawObject::Text { .. } => "text",
            DrawObject::TextRtl { .. } => "textRTL",
            DrawObject::Texture { .. } => "texture",
            DrawObject::Pan { .. } => "pan",
            DrawObject::VuMeter { .. } => "vuMeter",
            DrawObject::Waveform { .. } => "waveform",
            DrawObject::Window { .. } => "window",
            DrawObject::Nop => "nop",
            DrawObject::Bounds(_) => "bounds",
            DrawObject::Unknown { kind } | DrawObject::Invalid { kind, .. } => kind,
        }
    }
}

/// A draw object with its optional guard
#[derive(Debug, Clone, PartialEq)]
pub struct DrawEntry {
    pub guard: Option<Arg>,
    pub object: DrawObject,
}

impl From<DrawObject> for DrawEntry {
    fn from(object: DrawObject) -> Self {
        Self { guard: None, object }
    }
}

/// Positional arguments after the kind tag
struct Args<'a> {
    kind: &'a str,
    items: &'a [Json],
}

impl<'a> Args<'a> {
    fn need(&self, count: usize) -> Result<(), String> {
        if self.items.len() < count {
            Err(format!("'{}' needs {} arguments, got {}", self.kind, count, self.items.len()))
        } else {
            Ok(())
        }
    }

    fn at(&self, idx: usize) -> Arg {
        self.items.get(idx).map(Arg::parse).unwrap_or(Arg::Lit(Value::Null))
    }

    /// Optional slot; explicit `null` counts as absent
    fn opt(&self, idx: usize) -> Option<Arg> {
        match self.items.get(idx) {
            None | Some(Json::Null) => None,
            Some(json) => Some(Arg::parse(json)),
        }
    }

    fn int(&self, idx: usize) -> Result<i32, String> {
        self.items
            .get(idx)
            .and_then(Json::as_f64)
            .map(|n| n as i32)
            .ok_or_else(|| format!("'{}' argument {} must be a number", self.kind, idx + 1))
    }
}

/// Parse one JSON tuple
pub fn parse_entry(json: &Json) -> DrawEntry {
    let Some((tag, items)) = json.as_array().and_then(|a| a.split_first()) else {
        return DrawObject::Invalid {
            kind: json.to_string(),
            reason: "draw object must be a non-empty array".to_string(),
        }
        .into();
    };
    let Some(tag) = tag.as_str() else {
        return DrawObject::Invalid {
            kind: tag.to_string(),
            reason: "draw object kind must be a string".to_string(),
        }
        .into();
    };

    let (kind, guard) = match tag.split_once('?') {
        Some((kind, cond)) => (kind, Some(Arg::parse(&Json::String(format!("${}", cond))))),
        None => (tag, None),
    };

    let args = Args { kind, items };
    let object = parse_object(&args).unwrap_or_else(|reason| DrawObject::Invalid {
        kind: kind.to_string(),
        reason,
    });
    DrawEntry { guard, object }
}

/// Parse a whole draw group
pub fn parse_group(items: &[Json]) -> Vec<DrawEntry> {
    items.iter().map(parse_entry).collect()
}

fn parse_object(a: &Args) -> Result<DrawObject, String> {
    let object = match a.kind {
        "button" => {
            a.need(4)?;
            DrawObject::Button {
                x: a.at(0),
                y: a.at(1),
                w: a.at(2),
                h: a.at(3),
                pressed: a.opt(4).unwrap_or(Arg::Lit(Value::Bool(false))),
            }
        }
        "filledRect" => {
            a.need(5)?;
            DrawObject::FilledRect { x: a.at(0), y: a.at(1), w: a.at(2), h: a.at(3), color: a.at(4) }
        }
        "strokeRect" => {
            a.need(5)?;
            DrawObject::StrokeRect { x: a.at(0), y: a.at(1), w: a.at(2), h: a.at(3), color: a.at(4) }
        }
        "image" => {
            a.need(3)?;
            DrawObject::Image { name: a.at(0), x: a.at(1), y: a.at(2), dim: a.opt(3) }
        }
        "line" => {
            a.need(5)?;
            DrawObject::Line { x1: a.at(0), y1: a.at(1), x2: a.at(2), y2: a.at(3), color: a.at(4) }
        }
        "pbar" => {
            a.need(6)?;
            DrawObject::Pbar {
                value: a.at(0),
                x: a.at(1),
                y: a.at(2),
                w: a.at(3),
                h: a.at(4),
                color: a.at(5),
            }
        }
        "text" => {
            a.need(4)?;
            DrawObject::Text {
                font: a.at(0),
                text: a.at(1),
                x: a.at(2),
                y: a.at(3),
                color: a.opt(4),
                rtl: a.opt(5),
                space_width: a.opt(6),
            }
        }
        "textRTL" => {
            a.need(4)?;
            DrawObject::TextRtl { font: a.at(0), text: a.at(1), x: a.at(2), y: a.at(3), color: a.opt(4) }
        }
        "texture" => {
            a.need(4)?;
            DrawObject::Texture { x: a.at(0), y: a.at(1), w: a.at(2), h: a.at(3) }
        }
        "pan" => {
            a.need(2)?;
            DrawObject::Pan { x: a.at(0), y: a.at(1), value: a.at(2) }
        }
        "vuMeter" => {
            a.need(5)?;
            DrawObject::VuMeter { x: a.at(0), y: a.at(1), w: a.at(2), h: a.at(3), value: a.at(4) }
        }
        "waveform" => {
            a.need(3)?;
            DrawObject::Waveform {
                x: a.at(0),
                y: a.at(1),
                width: a.at(2),
                color: a.opt(3).unwrap_or(Arg::Role("light".to_string())),
            }
        }
        "window" => {
            a.need(4)?;
            DrawObject::Window { x: a.at(0), y: a.at(1), w: a.at(2), h: a.at(3), title: a.opt(4) }
        }
        "nop" => DrawObject::Nop,
        "bounds" | "newBounds" => {
            a.need(4)?;
            DrawObject::Bounds(PixelRect::new(a.int(0)?, a.int(1)?, a.int(2)?, a.int(3)?))
        }
        other => DrawObject::Unknown { kind: other.to_string() },
    };
    Ok(object)
}
