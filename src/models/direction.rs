//! Compass directions used as sprite sheet rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A direction name that is not one of the eight facings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction \"{0}\", expected one of down, down_right, right, up_right, up, up_left, left, down_left")]
pub struct UnknownDirection(pub String);

/// One of the eight facings a sprite can be drawn in.
///
/// The declaration order is the sheet row order: clockwise, starting at
/// `Down`. `Ord` follows it, so a `BTreeMap<Direction, _>` iterates rows in
/// sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    DownRight,
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
}

impl Direction {
    /// All directions in sheet row order.
    pub const ALL: [Direction; 8] = [
        Direction::Down,
        Direction::DownRight,
        Direction::Right,
        Direction::UpRight,
        Direction::Up,
        Direction::UpLeft,
        Direction::Left,
        Direction::DownLeft,
    ];

    /// Position in the clockwise order (`Down` = 0 .. `DownLeft` = 7).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Direction::index`], wrapping modulo 8.
    pub fn from_index(index: usize) -> Direction {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Serialized name, e.g. `down_right`.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::DownRight => "down_right",
            Direction::Right => "right",
            Direction::UpRight => "up_right",
            Direction::Up => "up",
            Direction::UpLeft => "up_left",
            Direction::Left => "left",
            Direction::DownLeft => "down_left",
        }
    }

    /// Pick the facing for a velocity in screen coordinates (+x right, +y down).
    ///
    /// Returns `None` when the velocity is zero, i.e. the avatar is standing
    /// still and should keep its previous facing. Each direction covers a 45°
    /// sector centered on its axis.
    ///
    /// ```
    /// use pxsheet::models::Direction;
    ///
    /// assert_eq!(Direction::from_velocity(0.0, 160.0), Some(Direction::Down));
    /// assert_eq!(Direction::from_velocity(160.0, 0.0), Some(Direction::Right));
    /// assert_eq!(Direction::from_velocity(-1.0, -1.0), Some(Direction::UpLeft));
    /// assert_eq!(Direction::from_velocity(0.0, 0.0), None);
    /// ```
    pub fn from_velocity(vx: f64, vy: f64) -> Option<Direction> {
        if vx == 0.0 && vy == 0.0 {
            return None;
        }

        // atan2 in screen space: right = 0°, down = 90°, up = -90°
        let degrees = vy.atan2(vx).to_degrees().rem_euclid(360.0);

        // Rotate so down = 0° and angles grow clockwise
        let adjusted = (90.0 - degrees).rem_euclid(360.0);

        // adjusted is in [0, 360), so the rounded sector is in 0..=8
        let sector = (adjusted / 45.0).round() as usize;
        Some(Self::from_index(sector))
    }

    /// Animation key for walking in this direction, e.g. `player-walk-down-right`.
    pub fn walk_key(self, sprite: &str) -> String {
        format!("{}-walk-{}", sprite, self.key_suffix())
    }

    /// Animation key for standing still in this direction, e.g. `player-idle-up`.
    pub fn idle_key(self, sprite: &str) -> String {
        format!("{}-idle-{}", sprite, self.key_suffix())
    }

    fn key_suffix(self) -> String {
        self.as_str().replace('_', "-")
    }
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_clockwise_from_down() {
        let names: Vec<&str> = Direction::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(
            names,
            vec!["down", "down_right", "right", "up_right", "up", "up_left", "left", "down_left"]
        );
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), *dir);
        }
    }

    #[test]
    fn test_ord_matches_sheet_order() {
        let mut shuffled = vec![Direction::Left, Direction::Down, Direction::UpRight, Direction::Up];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Direction::Down, Direction::UpRight, Direction::Up, Direction::Left]
        );
    }

    #[test]
    fn test_from_velocity_axes() {
        assert_eq!(Direction::from_velocity(0.0, 1.0), Some(Direction::Down));
        assert_eq!(Direction::from_velocity(1.0, 0.0), Some(Direction::Right));
        assert_eq!(Direction::from_velocity(0.0, -1.0), Some(Direction::Up));
        assert_eq!(Direction::from_velocity(-1.0, 0.0), Some(Direction::Left));
    }

    #[test]
    fn test_from_velocity_diagonals() {
        assert_eq!(Direction::from_velocity(1.0, 1.0), Some(Direction::DownRight));
        assert_eq!(Direction::from_velocity(1.0, -1.0), Some(Direction::UpRight));
        assert_eq!(Direction::from_velocity(-1.0, -1.0), Some(Direction::UpLeft));
        assert_eq!(Direction::from_velocity(-1.0, 1.0), Some(Direction::DownLeft));
    }

    #[test]
    fn test_from_velocity_stopped() {
        assert_eq!(Direction::from_velocity(0.0, 0.0), None);
    }

    #[test]
    fn test_from_velocity_sector_boundaries() {
        // 20° below the +x axis is still closer to right than to down-right
        let rad = 20f64.to_radians();
        assert_eq!(Direction::from_velocity(rad.cos(), rad.sin()), Some(Direction::Right));

        // Slightly right of straight down wraps back to down, not index 8
        assert_eq!(Direction::from_velocity(0.01, 1.0), Some(Direction::Down));
        assert_eq!(Direction::from_velocity(-0.01, 1.0), Some(Direction::Down));
    }

    #[test]
    fn test_animation_keys() {
        assert_eq!(Direction::DownRight.walk_key("player"), "player-walk-down-right");
        assert_eq!(Direction::Up.idle_key("robot"), "robot-idle-up");
    }

    #[test]
    fn test_from_str() {
        for dir in Direction::ALL {
            assert_eq!(dir.as_str().parse::<Direction>(), Ok(dir));
        }
        assert_eq!("north".parse::<Direction>(), Err(UnknownDirection("north".to_string())));
        assert!("Down".parse::<Direction>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Direction::UpLeft).unwrap();
        assert_eq!(json, "\"up_left\"");
        let parsed: Direction = serde_json::from_str("\"down_left\"").unwrap();
        assert_eq!(parsed, Direction::DownLeft);
        assert!(serde_json::from_str::<Direction>("\"north\"").is_err());
    }
}
