//! Data models for sprite definitions (directions, palettes, frames)

mod direction;
mod palette;
mod sprite;

pub use direction::{Direction, UnknownDirection};
pub use palette::{Palette, PaletteColor, TRANSPARENT};
pub use sprite::{Frame, SpriteDefinition, DEFAULT_FRAME_RATE};
