//! Sprite sheet rasterization
//!
//! Turns a [`SpriteDefinition`] into an RGBA canvas laid out as
//! directions × frames, plus the [`SheetLayout`] describing that grid.

use crate::models::{Direction, Frame, SpriteDefinition};
use crate::spritesheet::SheetLayout;
use image::RgbaImage;
use thiserror::Error;

/// Largest width or height a PNG image may declare.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Largest RGBA canvas, in bytes, a single sheet may allocate (1 GiB).
pub const MAX_SHEET_BYTES: usize = 1 << 30;

const BYTES_PER_PIXEL: usize = 4;

/// A definition that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("sprite has an empty name")]
    EmptyName,
    #[error("sprite name \"{name}\" cannot be used as a file name: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("sprite \"{sprite}\" has zero {field}")]
    ZeroDimension { sprite: String, field: &'static str },
    #[error("sprite \"{sprite}\" has no angles defined")]
    NoAngles { sprite: String },
    #[error("sprite \"{sprite}\" direction {direction} has no frames")]
    EmptyDirection { sprite: String, direction: Direction },
    #[error(
        "sprite \"{sprite}\" direction {direction} frame {frame} has {actual} rows, expected {expected}"
    )]
    FrameHeight {
        sprite: String,
        direction: Direction,
        frame: usize,
        expected: u32,
        actual: usize,
    },
    #[error(
        "sprite \"{sprite}\" direction {direction} frame {frame} row {row} has {actual} pixels, expected {expected}"
    )]
    FrameWidth {
        sprite: String,
        direction: Direction,
        frame: usize,
        row: usize,
        expected: u32,
        actual: usize,
    },
    #[error("sprite \"{sprite}\" sheet would be too large ({detail})")]
    TooLarge { sprite: String, detail: String },
}

/// A rendered sheet: the pixels and the grid they are arranged in.
#[derive(Debug, Clone)]
pub struct RenderedSheet {
    pub image: RgbaImage,
    pub layout: SheetLayout,
}

/// Check a definition against everything rendering relies on.
///
/// Frames must match the declared size exactly; a mismatch is reported
/// instead of truncating or padding.
pub fn validate(sprite: &SpriteDefinition) -> Result<(), RenderError> {
    if sprite.name.trim().is_empty() {
        return Err(RenderError::EmptyName);
    }
    check_name(&sprite.name)?;
    let dimensions = [
        ("width", sprite.width),
        ("height", sprite.height),
        ("scale", sprite.scale),
        ("frame_rate", sprite.frame_rate),
    ];
    for (field, value) in dimensions {
        if value == 0 {
            return Err(RenderError::ZeroDimension { sprite: sprite.name.clone(), field });
        }
    }
    if sprite.angles.is_empty() {
        return Err(RenderError::NoAngles { sprite: sprite.name.clone() });
    }

    for (&direction, frames) in &sprite.angles {
        if frames.is_empty() {
            return Err(RenderError::EmptyDirection { sprite: sprite.name.clone(), direction });
        }
        for (frame_idx, frame) in frames.iter().enumerate() {
            check_frame(sprite, direction, frame_idx, frame)?;
        }
    }
    Ok(())
}

/// The name becomes `<out>/<name>.png`, so it must be a plain file stem.
fn check_name(name: &str) -> Result<(), RenderError> {
    let invalid = |reason: &'static str| -> Result<(), RenderError> {
        Err(RenderError::InvalidName { name: name.to_string(), reason })
    };
    if name.contains(|c: char| c == '/' || c == '\\') {
        return invalid("contains a path separator");
    }
    if name.contains('\0') {
        return invalid("contains a NUL byte");
    }
    if name == "." || name == ".." {
        return invalid("is a relative directory");
    }
    Ok(())
}

fn check_frame(
    sprite: &SpriteDefinition,
    direction: Direction,
    frame_idx: usize,
    frame: &Frame,
) -> Result<(), RenderError> {
    if frame.len() != sprite.height as usize {
        return Err(RenderError::FrameHeight {
            sprite: sprite.name.clone(),
            direction,
            frame: frame_idx,
            expected: sprite.height,
            actual: frame.len(),
        });
    }
    for (row_idx, row) in frame.iter().enumerate() {
        if row.len() != sprite.width as usize {
            return Err(RenderError::FrameWidth {
                sprite: sprite.name.clone(),
                direction,
                frame: frame_idx,
                row: row_idx,
                expected: sprite.width,
                actual: row.len(),
            });
        }
    }
    Ok(())
}

/// Compute the sheet grid for a validated definition.
pub fn layout_for(sprite: &SpriteDefinition) -> Result<SheetLayout, RenderError> {
    let too_large = |detail: String| RenderError::TooLarge { sprite: sprite.name.clone(), detail };

    let frame_width = sprite
        .width
        .checked_mul(sprite.scale)
        .ok_or_else(|| too_large(format!("frame width {} x {}", sprite.width, sprite.scale)))?;
    let frame_height = sprite
        .height
        .checked_mul(sprite.scale)
        .ok_or_else(|| too_large(format!("frame height {} x {}", sprite.height, sprite.scale)))?;

    let directions = sprite.defined_directions();
    let rows = directions.len() as u32;
    let cols = u32::try_from(sprite.max_frame_count())
        .map_err(|_| too_large(format!("{} frames", sprite.max_frame_count())))?;

    let width = frame_width.checked_mul(cols).filter(|w| *w <= MAX_DIMENSION);
    let height = frame_height.checked_mul(rows).filter(|h| *h <= MAX_DIMENSION);
    let (width, height) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(too_large(format!(
                "{} cols of {}px by {} rows of {}px",
                cols, frame_width, rows, frame_height
            )))
        }
    };

    // The canvas is allocated up front; refuse before the allocation can fail
    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .filter(|bytes| *bytes <= MAX_SHEET_BYTES);
    if bytes.is_none() {
        return Err(too_large(format!(
            "{}x{} canvas exceeds {} bytes",
            width, height, MAX_SHEET_BYTES
        )));
    }

    Ok(SheetLayout { frame_width, frame_height, rows, cols, directions })
}

/// Render a sprite definition to a sheet.
///
/// Each output pixel maps back to its source pixel by integer division by
/// `scale` (nearest neighbor, no blending). Directions with fewer frames
/// than the widest row repeat their last frame in the remaining columns.
///
/// # Examples
///
/// ```
/// use pxsheet::models::{Direction, PaletteColor, SpriteDefinition};
/// use pxsheet::renderer::render_sheet;
///
/// let sprite = SpriteDefinition {
///     name: "dot".to_string(),
///     width: 1,
///     height: 1,
///     scale: 3,
///     palette: [(1, PaletteColor::Rgb([255, 0, 0]))].into_iter().collect(),
///     angles: [(Direction::Down, vec![vec![vec![1]]])].into_iter().collect(),
///     frame_rate: 8,
/// };
///
/// let sheet = render_sheet(&sprite).unwrap();
/// assert_eq!(sheet.image.dimensions(), (3, 3));
/// assert_eq!(sheet.layout.rows, 1);
/// ```
pub fn render_sheet(sprite: &SpriteDefinition) -> Result<RenderedSheet, RenderError> {
    validate(sprite)?;
    let layout = layout_for(sprite)?;

    let scale = sprite.scale;
    let mut image = RgbaImage::new(layout.width(), layout.height());

    for (row, direction) in layout.directions.iter().enumerate() {
        // validate() guarantees every defined direction has at least one frame
        let frames = &sprite.angles[direction];
        let origin_y = row as u32 * layout.frame_height;

        for col in 0..layout.cols {
            let frame = &frames[(col as usize).min(frames.len() - 1)];
            let origin_x = col * layout.frame_width;

            for y in 0..layout.frame_height {
                let src_row = &frame[(y / scale) as usize];
                for x in 0..layout.frame_width {
                    let index = src_row[(x / scale) as usize];
                    image.put_pixel(origin_x + x, origin_y + y, sprite.palette.resolve(index));
                }
            }
        }
    }

    Ok(RenderedSheet { image, layout })
}
