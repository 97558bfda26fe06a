//! JSON sidecar describing a generated sheet
//!
//! The animation player needs the frame size and the direction/frame grid
//! to slice a sheet. The sidecar records that geometry together with ready
//! made walk/idle animations per direction.
//!
//! # Example Output
//!
//! ```json
//! {
//!   "image": "robot.png",
//!   "size": [32, 32],
//!   "frame_width": 32,
//!   "frame_height": 32,
//!   "rows": 1,
//!   "cols": 1,
//!   "frame_rate": 8,
//!   "directions": [{ "direction": "down", "row": 0, "frames": 1 }],
//!   "animations": {
//!     "robot-idle-down": { "frames": [0], "frame_rate": 8, "repeat": false },
//!     "robot-walk-down": { "frames": [0], "frame_rate": 8, "repeat": true }
//!   }
//! }
//! ```

use crate::models::{Direction, SpriteDefinition};
use crate::spritesheet::SheetLayout;
use serde::Serialize;
use std::collections::BTreeMap;

/// One sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionEntry {
    pub direction: Direction,
    pub row: u32,
    /// Number of authored frames (columns past this repeat the last one)
    pub frames: u32,
}

/// A named frame sequence, frames given as linear sheet indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationEntry {
    pub frames: Vec<u32>,
    pub frame_rate: u32,
    pub repeat: bool,
}

/// Everything written to `<name>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetMetadata {
    pub image: String,
    pub size: [u32; 2],
    pub frame_width: u32,
    pub frame_height: u32,
    pub rows: u32,
    pub cols: u32,
    pub frame_rate: u32,
    pub directions: Vec<DirectionEntry>,
    pub animations: BTreeMap<String, AnimationEntry>,
}

impl SheetMetadata {
    /// Build the metadata for a sprite rendered with `layout`.
    pub fn new(sprite: &SpriteDefinition, layout: &SheetLayout, image: impl Into<String>) -> Self {
        let mut directions = Vec::with_capacity(layout.directions.len());
        let mut animations = BTreeMap::new();

        for (row, &direction) in layout.directions.iter().enumerate() {
            let authored = sprite.frame_count(direction) as u32;
            directions.push(DirectionEntry { direction, row: row as u32, frames: authored });

            let walk: Vec<u32> = (0..authored)
                .filter_map(|frame| layout.frame_index(direction, frame))
                .collect();
            let idle: Vec<u32> = layout.frame_index(direction, 0).into_iter().collect();

            animations.insert(
                direction.walk_key(&sprite.name),
                AnimationEntry { frames: walk, frame_rate: sprite.frame_rate, repeat: true },
            );
            animations.insert(
                direction.idle_key(&sprite.name),
                AnimationEntry { frames: idle, frame_rate: sprite.frame_rate, repeat: false },
            );
        }

        Self {
            image: image.into(),
            size: [layout.width(), layout.height()],
            frame_width: layout.frame_width,
            frame_height: layout.frame_height,
            rows: layout.rows,
            cols: layout.cols,
            frame_rate: sprite.frame_rate,
            directions,
            animations,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
