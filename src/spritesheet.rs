//! Sprite sheet geometry: where each direction/frame lives in the sheet
//!
//! A sheet is a grid with one row per rendered direction (clockwise order,
//! undefined directions skipped) and one column per frame. This layout is
//! the contract with the animation player that slices the sheet back up.

use crate::models::Direction;
use serde::Serialize;

/// Pixel rectangle of one frame inside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Geometry of a rendered sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetLayout {
    /// Width of one frame cell in output pixels (already scaled)
    pub frame_width: u32,
    /// Height of one frame cell in output pixels (already scaled)
    pub frame_height: u32,
    /// Number of rows (rendered directions)
    pub rows: u32,
    /// Number of columns (largest frame count among rendered directions)
    pub cols: u32,
    /// Rendered directions, top row first
    pub directions: Vec<Direction>,
}

impl SheetLayout {
    /// Total sheet width in pixels.
    pub fn width(&self) -> u32 {
        self.frame_width * self.cols
    }

    /// Total sheet height in pixels.
    pub fn height(&self) -> u32 {
        self.frame_height * self.rows
    }

    /// Row of a direction, or `None` if it is not in the sheet.
    pub fn row_of(&self, direction: Direction) -> Option<u32> {
        self.directions.iter().position(|d| *d == direction).map(|r| r as u32)
    }

    /// Rectangle holding `frame` of `direction`.
    ///
    /// Frames past the last column are clamped to it, matching how short
    /// directions are padded with their final frame.
    ///
    /// ```
    /// use pxsheet::models::Direction;
    /// use pxsheet::spritesheet::{Cell, SheetLayout};
    ///
    /// let layout = SheetLayout {
    ///     frame_width: 32,
    ///     frame_height: 32,
    ///     rows: 2,
    ///     cols: 3,
    ///     directions: vec![Direction::Down, Direction::Up],
    /// };
    /// assert_eq!(layout.cell(Direction::Up, 1), Some(Cell { x: 32, y: 32, w: 32, h: 32 }));
    /// assert_eq!(layout.cell(Direction::Left, 0), None);
    /// ```
    pub fn cell(&self, direction: Direction, frame: u32) -> Option<Cell> {
        let row = self.row_of(direction)?;
        let col = self.clamp_col(frame);
        Some(Cell {
            x: col * self.frame_width,
            y: row * self.frame_height,
            w: self.frame_width,
            h: self.frame_height,
        })
    }

    /// Linear frame number (`row * cols + col`), the numbering game engines
    /// use when a sheet is loaded with a fixed frame size.
    pub fn frame_index(&self, direction: Direction, frame: u32) -> Option<u32> {
        let row = self.row_of(direction)?;
        Some(row * self.cols + self.clamp_col(frame))
    }

    fn clamp_col(&self, frame: u32) -> u32 {
        frame.min(self.cols.saturating_sub(1))
    }
}
