/*!
# Ableton Push vocabulary

The Push has an 8x8 grid of velocity sensitive pads, sending notes 36..=99 (bottom left to top
right), nine relative encoders with touch sensors, two rows of eight toggle buttons above and
below the screen, a touch strip, a 4x68 character screen and a bunch of fixed function buttons.

Only the controls the router actually handles have names here. Pad colors are an opaque
palette; [`crate::ColorScheme`] picks the four codes a track needs.
*/

mod input;
pub use input::*;

mod output;
pub use output::*;

/// A fixed function button, identified by its controller number
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Button(pub u8);

impl Button {
    pub const TAP_TEMPO: Self = Button(3);
    pub const METRONOME: Self = Button(9);
    pub const LEFT: Self = Button(44);
    pub const RIGHT: Self = Button(45);
    pub const UP: Self = Button(46);
    pub const DOWN: Self = Button(47);
    pub const SELECT: Self = Button(48);
    pub const SHIFT: Self = Button(49);
    pub const NOTE: Self = Button(50);
    pub const SESSION: Self = Button(51);
    pub const OCTAVE_DOWN: Self = Button(54);
    pub const OCTAVE_UP: Self = Button(55);
    pub const REPEAT: Self = Button(56);
    pub const ACCENT: Self = Button(57);
    pub const SCALES: Self = Button(58);
    pub const USER: Self = Button(59);
    pub const PLAY: Self = Button(85);
    pub const RECORD: Self = Button(86);
    pub const DELETE: Self = Button(118);
    pub const UNDO: Self = Button(119);

    pub fn code(self) -> u8 {
        self.0
    }
}

/// Light modes of the fixed function buttons
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ButtonLight {
    Off = 0,
    Dim = 1,
    DimSlow = 2,
    DimFast = 3,
    Full = 4,
    FullSlow = 5,
    FullFast = 6,
}

/// Display modes of a pad, sent in the low nibble of the pad's Note-On status byte
pub struct PadMode;

impl PadMode {
    pub const PLAIN: u8 = 0;
    pub const FADE_24: u8 = 1;
    pub const FADE_2: u8 = 5;
    pub const PULSE_24: u8 = 6;
    pub const PULSE_2: u8 = 10;
    pub const BLINK_24: u8 = 11;
    pub const BLINK_2: u8 = 15;

    /// How pads of held notes are shown
    pub const HOLD: u8 = Self::PULSE_2;
}

/// Touch strip modes
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum StripMode {
    PitchBend = 0,
    ModWheel = 1,
    Pan = 2,
    Volume = 3,
}

impl StripMode {
    /// The strip toggle alternates between these two
    pub fn toggled(self) -> Self {
        match self {
            Self::PitchBend => Self::ModWheel,
            _ => Self::PitchBend,
        }
    }
}

impl Default for StripMode {
    fn default() -> Self {
        Self::PitchBend
    }
}

/// The two rows of toggle buttons around the screen
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ToggleRow {
    Upper,
    Lower,
}

impl ToggleRow {
    /// Controller number of the first toggle of the row
    pub fn base(self) -> u8 {
        match self {
            Self::Upper => 20,
            Self::Lower => 102,
        }
    }
}

/// Controllers the touch strip sends in its non-pitch-bend modes
pub const STRIP_CONTROLLERS: [u8; 3] = [1, 7, 10];

/// Controller of the leftmost encoder; the nine encoders are consecutive
pub const FIRST_KNOB: u8 = 71;
pub const KNOB_COUNT: usize = 9;

/// Toggles per row
pub const TOGGLE_COUNT: usize = 8;
