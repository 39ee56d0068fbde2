//! Wire format of the messages exchanged with the Push and with the instrument.
//!
//! Short messages are plain 3-byte MIDI. Everything the Push shows on its screen or strip goes
//! through System-Exclusive frames, see [`sysex`].

pub mod sysex;

/// Pad hardware indices are sent as note numbers starting here. Note-On/Off messages below this
/// come from the touch sensors of the encoders and the strip.
pub const PAD_NOTE_OFFSET: u8 = 36;

/// Number of pads on the grid
pub const PAD_COUNT: u8 = 64;

/// Width of the pad grid, hardware indices are row-major with this stride
pub const GRID_WIDTH: u8 = 8;

/// The message family, i.e. the top nibble of a status byte
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Family {
    NoteOff,
    NoteOn,
    PolyAftertouch,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    System,
}

impl Family {
    pub fn from_status(status: u8) -> Option<Self> {
        match status & 0xF0 {
            0x80 => Some(Self::NoteOff),
            0x90 => Some(Self::NoteOn),
            0xA0 => Some(Self::PolyAftertouch),
            0xB0 => Some(Self::ControlChange),
            0xC0 => Some(Self::ProgramChange),
            0xD0 => Some(Self::ChannelPressure),
            0xE0 => Some(Self::PitchBend),
            0xF0 => Some(Self::System),
            // data byte, not a status
            _ => None,
        }
    }

    pub fn status_nibble(self) -> u8 {
        match self {
            Self::NoteOff => 0x80,
            Self::NoteOn => 0x90,
            Self::PolyAftertouch => 0xA0,
            Self::ControlChange => 0xB0,
            Self::ProgramChange => 0xC0,
            Self::ChannelPressure => 0xD0,
            Self::PitchBend => 0xE0,
            Self::System => 0xF0,
        }
    }
}

/// A decoded 3-byte channel message
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShortMessage {
    pub family: Family,
    pub channel: u8,
    pub data1: u8,
    pub data2: u8,
}

impl ShortMessage {
    pub fn to_bytes(self) -> [u8; 3] {
        short(self.family, self.channel, self.data1, self.data2)
    }

    /// Whether this is a Note-On/Off for a physical pad rather than a touch sensor
    pub fn is_pad_note(&self) -> bool {
        matches!(self.family, Family::NoteOn | Family::NoteOff)
            && self.data1 >= PAD_NOTE_OFFSET
            && self.data1 < PAD_NOTE_OFFSET + PAD_COUNT
    }
}

/// Classify an incoming message. Returns `None` for anything that isn't a 3-byte channel message
/// (SysEx, realtime bytes, running status).
pub fn classify(data: &[u8]) -> Option<ShortMessage> {
    match *data {
        [status, data1, data2] => {
            let family = Family::from_status(status)?;
            if family == Family::System {
                return None;
            }
            Some(ShortMessage {
                family,
                channel: status & 0x0F,
                data1,
                data2,
            })
        }
        _ => None,
    }
}

/// Build a short message. The channel is masked to 4 bits and the data bytes to 7.
pub fn short(family: Family, channel: u8, data1: u8, data2: u8) -> [u8; 3] {
    [
        family.status_nibble() | (channel & 0x0F),
        data1 & 0x7F,
        data2 & 0x7F,
    ]
}

pub fn note_on(channel: u8, pitch: u8, velocity: u8) -> [u8; 3] {
    short(Family::NoteOn, channel, pitch, velocity)
}

pub fn note_off(channel: u8, pitch: u8, velocity: u8) -> [u8; 3] {
    short(Family::NoteOff, channel, pitch, velocity)
}

pub fn poly_aftertouch(channel: u8, pitch: u8, pressure: u8) -> [u8; 3] {
    short(Family::PolyAftertouch, channel, pitch, pressure)
}

pub fn control_change(channel: u8, controller: u8, value: u8) -> [u8; 3] {
    short(Family::ControlChange, channel, controller, value)
}

/// Color and display mode of a single pad: `{0x90|mode, pad+36, color}`
pub fn pad(index: u8, color: u8, mode: u8) -> [u8; 3] {
    assert!(index < PAD_COUNT);
    [0x90 | (mode & 0x0F), index + PAD_NOTE_OFFSET, color & 0x7F]
}

/// Light mode of a button: `{0xB0, button, mode}`
pub fn button(code: u8, mode: u8) -> [u8; 3] {
    control_change(0, code, mode)
}
