//! Palettes
//!
//! A palette maps role names (background, foreground, ...) to colors. Every
//! indexed image in the skin is drawn using only role colors, which is what
//! lets the whole UI be recolored by role substitution instead of reloading.

mod composite;

pub use composite::{composite, composite_in_place, overlay};

use log::{error, warn};
use thiserror::Error;

/// Roles every complete palette is expected to define
pub const STANDARD_ROLES: [&str; 5] = ["background", "foreground", "light", "dark", "white"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("could not parse hex color '{0}'")]
    InvalidHex(String),
}

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or shorthand `#rgb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || PaletteError::InvalidHex(hex.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(bad()),
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| bad());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Multiply each channel by `factor`, rounding to nearest
    pub fn scale(self, factor: f32) -> Self {
        let s = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(s(self.r), s(self.g), s(self.b))
    }

    /// Opaque RGBA bytes
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    pub fn from_rgba(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

/// Normalize a hex string to lowercase `#rrggbb`
pub fn canonicalize_hex(hex: &str) -> Result<String, PaletteError> {
    Rgb::from_hex(hex).map(|rgb| rgb.to_hex())
}

/// Ordered role → color mapping
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    roles: Vec<(String, Rgb)>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette shown while assets are still loading
    pub fn loading() -> Self {
        Self::new()
            .with("background", Rgb::new(0xdf, 0x82, 0x5f))
            .with("foreground", Rgb::new(0x5c, 0x1f, 0x09))
            .with("dark", Rgb::new(0xb2, 0x59, 0x3f))
            .with("light", Rgb::new(0xff, 0xd2, 0xa2))
            .with("white", Rgb::WHITE)
    }

    /// Build from raw `(role, hex)` pairs as they appear in a manifest.
    ///
    /// Bad hex strings become white with an error logged; missing standard
    /// roles only produce a warning.
    pub fn from_hex_pairs<'a>(name: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut palette = Self::new();
        for (role, hex) in pairs {
            let rgb = Rgb::from_hex(hex).unwrap_or_else(|e| {
                error!("palette '{}', role '{}': {}", name, role, e);
                Rgb::WHITE
            });
            palette.set(role, rgb);
        }

        let missing = palette.missing_standard_roles();
        if !missing.is_empty() {
            warn!("palette '{}' is missing roles: {}", name, missing.join(", "));
        }
        palette
    }

    /// Builder-style insert
    pub fn with(mut self, role: &str, color: Rgb) -> Self {
        self.set(role, color);
        self
    }

    /// Insert or replace a role, keeping its original position
    pub fn set(&mut self, role: &str, color: Rgb) {
        match self.roles.iter_mut().find(|(r, _)| r == role) {
            Some(entry) => entry.1 = color,
            None => self.roles.push((role.to_string(), color)),
        }
    }

    pub fn get(&self, role: &str) -> Option<Rgb> {
        self.roles.iter().find(|(r, _)| r == role).map(|(_, c)| *c)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.get(role).is_some()
    }

    /// Like `get`, but logs when the role is absent
    pub fn require(&self, role: &str) -> Option<Rgb> {
        let color = self.get(role);
        if color.is_none() {
            error!("palette has no '{}' role", role);
        }
        color
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.roles.iter().map(|(r, c)| (r.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn missing_standard_roles(&self) -> Vec<&'static str> {
        STANDARD_ROLES.iter().copied().filter(|r| !self.contains(r)).collect()
    }

    /// The background color, or black if the palette has none
    pub fn background(&self) -> Rgb {
        self.get("background").unwrap_or(Rgb::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#df825f").unwrap(), Rgb::new(0xdf, 0x82, 0x5f));
        assert_eq!(Rgb::from_hex("DF825F").unwrap(), Rgb::new(0xdf, 0x82, 0x5f));
        assert_eq!(Rgb::from_hex("#03F").unwrap(), Rgb::new(0x00, 0x33, 0xff));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize_hex("#FFF").as_deref(), Ok("#ffffff"));
        assert_eq!(canonicalize_hex("5C1F09").as_deref(), Ok("#5c1f09"));
        assert!(canonicalize_hex("not a color").is_err());
    }

    #[test]
    fn test_scale_quarter() {
        let bg = Rgb::new(0xdf, 0x82, 0x5f).scale(0.25);
        assert_eq!(bg, Rgb::new(56, 33, 24));
    }

    #[test]
    fn test_palette_keeps_order_and_replaces_in_place() {
        let mut p = Palette::new().with("b", Rgb::BLACK).with("a", Rgb::WHITE);
        p.set("b", Rgb::new(1, 2, 3));
        let roles: Vec<&str> = p.iter().map(|(r, _)| r).collect();
        assert_eq!(roles, vec!["b", "a"]);
        assert_eq!(p.get("b"), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn test_from_hex_pairs_tolerates_bad_input() {
        let p = Palette::from_hex_pairs("odd", [("background", "#000"), ("foreground", "zzz")]);
        assert_eq!(p.get("background"), Some(Rgb::BLACK));
        assert_eq!(p.get("foreground"), Some(Rgb::WHITE));
        assert_eq!(p.missing_standard_roles(), vec!["light", "dark", "white"]);
    }

    #[test]
    fn test_loading_palette_is_complete() {
        assert!(Palette::loading().missing_standard_roles().is_empty());
    }
}
