use super::{Button, ToggleRow, FIRST_KNOB, KNOB_COUNT, STRIP_CONTROLLERS, TOGGLE_COUNT};
use crate::protocols::{self, Family, PAD_COUNT, PAD_NOTE_OFFSET};

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
/// A Push input message, classified by what it controls
pub enum Message {
    /// A pad was hit
    PadPress { pad: u8, velocity: u8, channel: u8 },
    /// A pad was let go. A Note-On with zero velocity also ends up here
    PadRelease { pad: u8, velocity: u8, channel: u8 },
    /// Pressure change on a held pad
    PadAftertouch { pad: u8, pressure: u8, channel: u8 },
    /// An encoder or the strip was touched or let go (notes below 36)
    Touch { sensor: u8, touched: bool },
    /// Touch strip in controller mode; passed through as is
    Strip { controller: u8, value: u8 },
    /// Touch strip in pitch bend mode; passed through as is
    PitchBend { channel: u8, lsb: u8, msb: u8 },
    /// A toggle button above or below the screen
    Toggle { row: ToggleRow, index: u8, value: u8 },
    /// An encoder was turned, `value` is relative
    Knob { index: u8, value: u8 },
    /// A fixed function button; `value` 0 means released
    Button { button: Button, value: u8 },

    Unknown,
}

/// Decode raw bytes coming from the Push.
pub fn decode_message(data: &[u8]) -> Message {
    let msg = match protocols::classify(data) {
        Some(msg) => msg,
        None => return Message::Unknown,
    };

    match msg.family {
        Family::NoteOn | Family::NoteOff if !msg.is_pad_note() => {
            if msg.data1 >= PAD_NOTE_OFFSET {
                return Message::Unknown;
            }
            Message::Touch {
                sensor: msg.data1,
                touched: msg.family == Family::NoteOn && msg.data2 > 0,
            }
        }
        Family::NoteOn if msg.data2 > 0 => Message::PadPress {
            pad: msg.data1 - PAD_NOTE_OFFSET,
            velocity: msg.data2,
            channel: msg.channel,
        },
        Family::NoteOn | Family::NoteOff => Message::PadRelease {
            pad: msg.data1 - PAD_NOTE_OFFSET,
            velocity: msg.data2,
            channel: msg.channel,
        },
        Family::PolyAftertouch
            if msg.data1 >= PAD_NOTE_OFFSET && msg.data1 < PAD_NOTE_OFFSET + PAD_COUNT =>
        {
            Message::PadAftertouch {
                pad: msg.data1 - PAD_NOTE_OFFSET,
                pressure: msg.data2,
                channel: msg.channel,
            }
        }
        Family::PitchBend => Message::PitchBend {
            channel: msg.channel,
            lsb: msg.data1,
            msb: msg.data2,
        },
        Family::ControlChange => decode_control_change(msg.data1, msg.data2),
        _ => Message::Unknown,
    }
}

fn decode_control_change(controller: u8, value: u8) -> Message {
    const UPPER_LAST: u8 = 20 + TOGGLE_COUNT as u8 - 1;
    const LOWER_LAST: u8 = 102 + TOGGLE_COUNT as u8 - 1;
    const LAST_KNOB: u8 = FIRST_KNOB + KNOB_COUNT as u8 - 1;

    match controller {
        c if STRIP_CONTROLLERS.contains(&c) => Message::Strip {
            controller: c,
            value,
        },
        c @ 20..=UPPER_LAST => Message::Toggle {
            row: ToggleRow::Upper,
            index: c - ToggleRow::Upper.base(),
            value,
        },
        c @ 102..=LOWER_LAST => Message::Toggle {
            row: ToggleRow::Lower,
            index: c - ToggleRow::Lower.base(),
            value,
        },
        c @ FIRST_KNOB..=LAST_KNOB => Message::Knob {
            index: c - FIRST_KNOB,
            value,
        },
        c => Message::Button {
            button: Button(c),
            value,
        },
    }
}
