//! pxsheet - Sprite sheet generation for 8-direction pixel-art avatars
//!
//! This library provides functionality to:
//! - Parse JSON5 sprite definitions (palette plus per-direction frame grids)
//! - Rasterize them into a directions × frames sheet with nearest-neighbor scaling
//! - Encode the sheet as an RGBA PNG, with an optional JSON metadata sidecar
//! - Discover and batch-generate every definition in a directory

pub mod cli;
pub mod color;
pub mod config;
pub mod generate;
pub mod metadata;
pub mod models;
pub mod output;
pub mod parser;
pub mod png;
pub mod registry;
pub mod renderer;
pub mod spritesheet;
pub mod suggest;
