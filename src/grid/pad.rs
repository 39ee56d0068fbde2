use serde::{Deserialize, Serialize};

use crate::protocols::GRID_WIDTH;
use crate::{Error, Result};

/// A single pad of a track's window, with its current display state
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Pad {
    /// Hardware index, row-major from the bottom left, 0..64
    pub index: u8,
    /// Pitch-class position inside the window's repeating 12-tone pattern
    pub n0: u8,
    pub color: u8,
    pub mode: u8,
}

impl Pad {
    /// Column on the 8x8 surface
    pub fn x(&self) -> u8 {
        self.index % GRID_WIDTH
    }

    /// Row on the 8x8 surface, 0 is the bottom row
    pub fn y(&self) -> u8 {
        self.index / GRID_WIDTH
    }
}

/// A rectangle of pads, in pad coordinates.
///
/// ```rust
/// # use pushpad::Window;
/// let window = Window { x: 0, y: 4, width: 8, height: 4 };
/// assert!(window.validate().is_ok());
/// assert!(window.contains(63));
/// assert!(!window.contains(0));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Window {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
}

impl Window {
    /// The whole 8x8 surface
    pub const FULL: Self = Self {
        x: 0,
        y: 0,
        width: GRID_WIDTH,
        height: GRID_WIDTH,
    };

    /// Fails if the window is empty or reaches past the surface
    pub fn validate(&self) -> Result<()> {
        let fits = |start: u8, len: u8| len > 0 && start as u16 + len as u16 <= GRID_WIDTH as u16;
        if fits(self.x, self.width) && fits(self.y, self.height) {
            Ok(())
        } else {
            Err(Error::InvalidWindow {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn contains(&self, index: u8) -> bool {
        let (x, y) = (index % GRID_WIDTH, index / GRID_WIDTH);
        index < GRID_WIDTH * GRID_WIDTH
            && (self.x..self.x + self.width).contains(&x)
            && (self.y..self.y + self.height).contains(&y)
    }

    /// Hardware indices covered by this window, row by row
    pub fn indices(self) -> impl Iterator<Item = u8> {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| y * GRID_WIDTH + x))
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_validation() {
        assert!(Window::FULL.validate().is_ok());
        assert!(Window { x: 7, y: 7, width: 1, height: 1 }.validate().is_ok());
        assert!(Window { x: 4, y: 0, width: 5, height: 2 }.validate().is_err());
        assert!(Window { x: 0, y: 0, width: 0, height: 2 }.validate().is_err());
        assert!(Window { x: 200, y: 0, width: 100, height: 1 }.validate().is_err());
    }

    #[test]
    fn test_window_indices() {
        let window = Window { x: 2, y: 1, width: 2, height: 2 };
        assert_eq!(window.indices().collect::<Vec<_>>(), vec![10, 11, 18, 19]);
        assert!(window.contains(19));
        assert!(!window.contains(12));
    }

    #[test]
    fn test_pad_coordinates() {
        let pad = Pad { index: 13, n0: 0, color: 0, mode: 0 };
        assert_eq!((pad.x(), pad.y()), (5, 1));
    }
}
