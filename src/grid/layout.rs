use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The four palette codes a track is drawn with
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct ColorScheme {
    pub dark: u8,
    pub medium: u8,
    pub bright: u8,
    /// Shown while a pad's note sounds
    pub pressed: u8,
}

impl ColorScheme {
    /// Palette codes are 7 bit
    pub fn validate(&self) -> Result<()> {
        if [self.dark, self.medium, self.bright, self.pressed]
            .iter()
            .all(|&code| code <= 127)
        {
            Ok(())
        } else {
            Err(Error::InvalidArgument("palette codes must be within 0..=127"))
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            dark: 0,
            medium: 101,
            bright: 86,
            pressed: 16,
        }
    }
}

/// Base color for each of the twelve pitch-class positions, plus the pressed color
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Layout {
    pub colors: [u8; 12],
    pub pressed: u8,
}

impl Layout {
    /// Roots bright, the other white keys medium, black keys dark
    pub fn chromatic(scheme: ColorScheme) -> Self {
        let ColorScheme {
            dark: d,
            medium: m,
            bright: b,
            pressed,
        } = scheme;
        Self {
            colors: [b, d, m, d, m, m, d, m, d, m, d, m],
            pressed,
        }
    }

    /// Base color of pitch-class position `n0`
    pub fn color(&self, n0: u8) -> u8 {
        self.colors[n0 as usize % 12]
    }
}

impl From<ColorScheme> for Layout {
    fn from(scheme: ColorScheme) -> Self {
        Self::chromatic(scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chromatic_pattern() {
        let layout = Layout::chromatic(ColorScheme {
            dark: 1,
            medium: 2,
            bright: 3,
            pressed: 4,
        });
        assert_eq!(layout.colors, [3, 1, 2, 1, 2, 2, 1, 2, 1, 2, 1, 2]);
        assert_eq!(layout.pressed, 4);
        assert_eq!(layout.color(12), 3);
        assert_eq!(layout.color(13), 1);
    }

    #[test]
    fn test_scheme_rejects_8_bit_codes() {
        let scheme = ColorScheme {
            pressed: 128,
            ..ColorScheme::default()
        };
        assert!(scheme.validate().is_err());
        assert!(ColorScheme::default().validate().is_ok());
    }
}
