//! Sprite definition: the authored input of one sprite sheet.

use super::direction::Direction;
use super::palette::Palette;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One animation frame: `height` rows of `width` palette indices.
pub type Frame = Vec<Vec<u32>>;

/// Default animation speed written to sheet metadata, in frames per second.
pub const DEFAULT_FRAME_RATE: u32 = 8;

/// A named, directional, animated pixel-art sprite.
///
/// Definitions are plain data. Checking that the frames actually match the
/// declared size happens when the sheet is rendered, so a definition that
/// parses can still fail to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteDefinition {
    /// Unique name, used as the output file stem
    pub name: String,
    /// Logical frame width, before scaling
    pub width: u32,
    /// Logical frame height, before scaling
    pub height: u32,
    /// Integer upscale factor; each logical pixel becomes a `scale`×`scale` block
    #[serde(default = "default_scale")]
    pub scale: u32,
    pub palette: Palette,
    /// Frames per direction. Directions missing here get no sheet row.
    #[serde(default, deserialize_with = "deserialize_angles")]
    pub angles: BTreeMap<Direction, Vec<Frame>>,
    /// Playback speed recorded in the sheet metadata
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

/// Direction keys go through `String` so unquoted JSON5 keys (`down: [...]`)
/// are accepted the same way as quoted ones.
fn deserialize_angles<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<Direction, Vec<Frame>>, D::Error> {
    BTreeMap::<String, Vec<Frame>>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, frames)| {
            key.parse::<Direction>()
                .map(|direction| (direction, frames))
                .map_err(de::Error::custom)
        })
        .collect()
}

fn default_scale() -> u32 {
    1
}

fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}

impl SpriteDefinition {
    /// Directions that have frames, in sheet row order.
    pub fn defined_directions(&self) -> Vec<Direction> {
        // BTreeMap keys iterate in Direction's clockwise order
        self.angles.keys().copied().collect()
    }

    /// Number of authored frames for a direction (0 if undefined).
    pub fn frame_count(&self, direction: Direction) -> usize {
        self.angles.get(&direction).map_or(0, Vec::len)
    }

    /// Largest frame count over all defined directions.
    pub fn max_frame_count(&self) -> usize {
        self.angles.values().map(Vec::len).max().unwrap_or(0)
    }
}
