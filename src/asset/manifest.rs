//! Asset manifest format
//!
//! ```json
//! {
//!   "palettes": { "default": { "background": "#df825f", ... } },
//!   "images": ["img/logo.png", ...],
//!   "fonts": [{ "path": "fonts/large.png", "map": "ABC...", "rowEscapes": [3, 4] }],
//!   "drawGroups": { "logos": [["image", "logo", 15, 10], ...] }
//! }
//! ```
//!
//! Palette and draw-group order is significant (draw order, overlay rows),
//! so those maps are read into `OrderedMap` instead of a hash map.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

/// JSON object kept in document order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            // Later duplicates win, like a JS object literal
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Ok(OrderedMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// One bitmap font strip
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontEntry {
    pub path: String,
    pub map: String,
    #[serde(default)]
    pub row_escapes: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub palettes: OrderedMap<OrderedMap<String>>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
    /// Raw draw-object tuples; parsed into typed objects by the loader
    #[serde(default)]
    pub draw_groups: OrderedMap<Vec<serde_json::Value>>,
}

impl Manifest {
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Directory part of a manifest location ("assets/manifest.json" → "assets")
pub fn location_prefix(location: &str) -> &str {
    location.rfind('/').map(|i| &location[..i]).unwrap_or("")
}

/// Join a manifest-relative asset path onto the manifest's directory
pub fn resolve(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

/// Asset name: file stem of its path ("img/upperLeft.png" → "upperLeft")
pub fn asset_name(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}
