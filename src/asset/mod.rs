//! Skin assets
//!
//! Everything the renderer draws with lives in one `AssetStore`: palettes,
//! decoded images, sliced bitmap fonts and parsed draw groups. The store is
//! filled by one or more `AssetLoader`s from JSON manifests.
//!
//! Images are kept in the colors of the active palette. Switching palettes
//! recolors them in place (`switch_palette`); fonts stay in their authored
//! black-on-white and are tinted per draw call instead.

mod font;
mod loader;
mod manifest;

pub use font::{BitmapFont, TextOptions};
pub use loader::AssetLoader;

#[cfg(test)]
pub(crate) use font::tests::strip as font_test_strip;

use crate::canvas::ImageData;
use crate::draw::DrawEntry;
use crate::palette::{composite_in_place, Palette};
use log::{error, info};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Name of the built-in palette shown before anything loads
pub const DEFAULT_PALETTE: &str = "default";

pub type SharedAssets = Rc<RefCell<AssetStore>>;

#[derive(Debug, Clone)]
pub struct AssetStore {
    palettes: Vec<(String, Palette)>,
    images: HashMap<String, ImageData>,
    fonts: HashMap<String, BitmapFont>,
    draw_groups: Vec<(String, Vec<DrawEntry>)>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore {
    pub fn new() -> Self {
        Self {
            palettes: vec![(DEFAULT_PALETTE.to_string(), Palette::loading())],
            images: HashMap::new(),
            fonts: HashMap::new(),
            draw_groups: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedAssets {
        Rc::new(RefCell::new(self))
    }

    // -- palettes --

    pub fn palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// Palette names in manifest order ("default" first)
    pub fn palette_names(&self) -> Vec<String> {
        self.palettes.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Insert or replace; a replaced palette keeps its position
    pub fn insert_palette(&mut self, name: &str, palette: Palette) {
        match self.palettes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = palette,
            None => self.palettes.push((name.to_string(), palette)),
        }
    }

    // -- images --

    pub fn image(&self, name: &str) -> Option<&ImageData> {
        self.images.get(name)
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn insert_image(&mut self, name: &str, image: ImageData) {
        self.images.insert(name.to_string(), image);
    }

    #[cfg(test)]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    // -- fonts --

    pub fn font(&self, name: &str) -> Option<&BitmapFont> {
        self.fonts.get(name)
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn insert_font(&mut self, name: &str, font: BitmapFont) {
        self.fonts.insert(name.to_string(), font);
    }

    /// Font names, sorted
    pub fn font_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fonts.keys().cloned().collect();
        names.sort();
        names
    }

    // -- draw groups --

    pub fn draw_group(&self, name: &str) -> Option<&[DrawEntry]> {
        self.draw_groups.iter().find(|(n, _)| n == name).map(|(_, g)| g.as_slice())
    }

    /// Group names in manifest order
    pub fn group_names(&self) -> Vec<String> {
        self.draw_groups.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn insert_draw_group(&mut self, name: &str, group: Vec<DrawEntry>) {
        match self.draw_groups.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = group,
            None => self.draw_groups.push((name.to_string(), group)),
        }
    }

    /// Recolor every cached image from palette `old` to palette `new`.
    /// Returns false (and changes nothing) if either palette is unknown.
    pub fn switch_palette(&mut self, old: &str, new: &str) -> bool {
        let (Some(from), Some(to)) = (self.palette(old).cloned(), self.palette(new).cloned()) else {
            error!("cannot switch palette '{}' -> '{}': unknown palette", old, new);
            return false;
        };
        self.recolor_images(&from, &to);
        info!("switched palette '{}' -> '{}'", old, new);
        true
    }

    pub fn recolor_images(&mut self, from: &Palette, to: &Palette) {
        for image in self.images.values_mut() {
            composite_in_place(&mut image.data, from, to);
        }
    }

    /// One pixel per role, roles sorted by name
    pub fn export_palette_strip(&self, name: &str) -> Option<ImageData> {
        let Some(palette) = self.palette(name) else {
            error!("no palette named '{}'", name);
            return None;
        };
        let mut roles: Vec<(&str, _)> = palette.iter().collect();
        roles.sort_by(|a, b| a.0.cmp(b.0));

        let mut strip = ImageData::new(roles.len(), 1);
        for (x, (_, color)) in roles.into_iter().enumerate() {
            strip.set_pixel(x, 0, color.to_rgba());
        }
        Some(strip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;

    fn ocean() -> Palette {
        Palette::new()
            .with("background", Rgb::new(0, 0, 80))
            .with("foreground", Rgb::new(0, 0, 10))
            .with("dark", Rgb::new(0, 0, 40))
            .with("light", Rgb::new(0, 200, 255))
            .with("white", Rgb::WHITE)
    }

    #[test]
    fn test_default_palette_present() {
        let store = AssetStore::new();
        assert_eq!(store.palette_names(), vec!["default"]);
        assert_eq!(store.palette(DEFAULT_PALETTE), Some(&Palette::loading()));
    }

    #[test]
    fn test_switch_palette_recolors_images() {
        let mut store = AssetStore::new();
        store.insert_palette("ocean", ocean());
        let loading = Palette::loading();

        let mut img = ImageData::new(2, 1);
        img.set_pixel(0, 0, loading.get("light").unwrap().to_rgba());
        store.insert_image("icon", img);

        assert!(store.switch_palette("default", "ocean"));
        let icon = store.image("icon").unwrap();
        assert_eq!(icon.pixel(0, 0), Some([0, 200, 255, 255]));
        assert_eq!(icon.pixel(1, 0), Some([0, 0, 0, 0]));

        assert!(store.switch_palette("ocean", "default"));
        assert_eq!(store.image("icon").unwrap().pixel(0, 0), Some(loading.get("light").unwrap().to_rgba()));

        assert!(!store.switch_palette("default", "missing"));
    }

    #[test]
    fn test_groups_keep_insertion_order() {
        let mut store = AssetStore::new();
        store.insert_draw_group("b", Vec::new());
        store.insert_draw_group("a", Vec::new());
        store.insert_draw_group("b", Vec::new());
        assert_eq!(store.group_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_export_palette_strip_sorted_by_role() {
        let mut store = AssetStore::new();
        store.insert_palette("ocean", ocean());
        let strip = store.export_palette_strip("ocean").unwrap();
        assert_eq!((strip.width, strip.height), (5, 1));
        // background, dark, foreground, light, white
        assert_eq!(strip.pixel(0, 0), Some([0, 0, 80, 255]));
        assert_eq!(strip.pixel(1, 0), Some([0, 0, 40, 255]));
        assert_eq!(strip.pixel(4, 0), Some([255, 255, 255, 255]));
        assert!(store.export_palette_strip("nope").is_none());
    }
}
