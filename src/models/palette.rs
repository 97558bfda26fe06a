//! Palette types: index -> color lookup for sprite frames.

use crate::color::{parse_color, ColorError};
use image::Rgba;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fully transparent black, the color of every unresolved pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A single palette entry.
///
/// Sheets only carry fully opaque or fully transparent pixels, so there is
/// no alpha channel here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Transparent,
    Rgb([u8; 3]),
}

impl PaletteColor {
    /// Build a color from a packed `0xRRGGBB` integer.
    ///
    /// `-1` is accepted as transparent.
    pub fn from_int(value: i64) -> Result<Self, ColorError> {
        match value {
            -1 => Ok(PaletteColor::Transparent),
            0..=0xFF_FFFF => {
                let v = value as u32;
                Ok(PaletteColor::Rgb([(v >> 16) as u8, (v >> 8) as u8, v as u8]))
            }
            _ => Err(ColorError::OutOfRange(value)),
        }
    }

    /// The RGBA pixel this entry renders as.
    pub fn to_rgba(self) -> Rgba<u8> {
        match self {
            PaletteColor::Transparent => TRANSPARENT,
            PaletteColor::Rgb([r, g, b]) => Rgba([r, g, b, 255]),
        }
    }
}

impl Serialize for PaletteColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PaletteColor::Transparent => serializer.serialize_unit(),
            PaletteColor::Rgb([r, g, b]) => {
                serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}", r, g, b))
            }
        }
    }
}

impl<'de> Deserialize<'de> for PaletteColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PaletteColorVisitor)
    }
}

struct PaletteColorVisitor;

impl<'de> Visitor<'de> for PaletteColorVisitor {
    type Value = PaletteColor;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null, -1, a 0xRRGGBB integer, or a CSS color string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<PaletteColor, E> {
        Ok(PaletteColor::Transparent)
    }

    fn visit_none<E: de::Error>(self) -> Result<PaletteColor, E> {
        Ok(PaletteColor::Transparent)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<PaletteColor, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PaletteColor, E> {
        PaletteColor::from_int(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PaletteColor, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(ColorError::OutOfRange(i64::MAX)))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<PaletteColor, E> {
        if v.fract() != 0.0 || !v.is_finite() {
            return Err(E::custom(format!("palette color {} is not an integer", v)));
        }
        self.visit_i64(v as i64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PaletteColor, E> {
        parse_color(v).map_err(E::custom)
    }
}

/// Index -> color mapping of a sprite.
///
/// Serialized as an object whose keys are decimal indices (`{"0": null, "1": 0xff0000}`),
/// since JSON object keys are always strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<u32, PaletteColor>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color of an index, replacing any previous entry.
    pub fn insert(&mut self, index: u32, color: PaletteColor) {
        self.colors.insert(index, color);
    }

    pub fn get(&self, index: u32) -> Option<PaletteColor> {
        self.colors.get(&index).copied()
    }

    /// Resolve an index to a pixel. Indices missing from the palette are transparent.
    pub fn resolve(&self, index: u32) -> Rgba<u8> {
        self.get(index).map_or(TRANSPARENT, PaletteColor::to_rgba)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl FromIterator<(u32, PaletteColor)> for Palette {
    fn from_iter<I: IntoIterator<Item = (u32, PaletteColor)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.colors.len()))?;
        for (index, color) in &self.colors {
            map.serialize_entry(&index.to_string(), color)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PaletteVisitor)
    }
}

struct PaletteVisitor;

impl<'de> Visitor<'de> for PaletteVisitor {
    type Value = Palette;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from palette index to color")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Palette, A::Error> {
        let mut palette = Palette::new();
        while let Some((key, color)) = access.next_entry::<String, PaletteColor>()? {
            let index = key.trim().parse::<u32>().map_err(|_| {
                de::Error::custom(format!(
                    "palette index \"{}\" is not a non-negative integer",
                    key
                ))
            })?;
            palette.insert(index, color);
        }
        Ok(palette)
    }
}
