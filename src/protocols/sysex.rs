//! System-Exclusive frames for the Push screen and touch strip.
//!
//! All frames start with the Ableton/Push preamble `F0 47 7F 15` and end with `F7`. The byte
//! layouts are fixed; the Push ignores anything that deviates.

use crate::message::RawMessage;
use crate::{Error, Result};

pub const PREAMBLE: [u8; 4] = [0xF0, 0x47, 0x7F, 0x15];
pub const END: u8 = 0xF7;

/// Lines on the screen
pub const SCREEN_ROWS: u8 = 4;
/// Characters per screen line
pub const SCREEN_COLUMNS: u8 = 68;

const WRITE_LINE: u8 = 0x18;
const CLEAR_LINE: u8 = 0x1C;
const STRIP_MODE: u8 = 0x63;

/// Write `text` into screen line `row`, starting at column `col`.
///
/// Layout: `F0 47 7F 15 (18+row) 00 len col <text> 00 F7`, where `len` counts the text plus its
/// terminating zero byte. Characters outside of 7-bit ASCII are replaced with `?`.
pub fn screen_text(frame: u32, row: u8, col: u8, text: &str) -> Result<RawMessage> {
    if row >= SCREEN_ROWS {
        return Err(Error::InvalidArgument("screen row must be within 0..4"));
    }
    let chars = text.chars().count();
    if col as usize + chars > SCREEN_COLUMNS as usize {
        return Err(Error::ScreenOverflow { col, len: chars });
    }

    let len = chars + 1;
    let mut bytes = [0u8; 10 + SCREEN_COLUMNS as usize];
    bytes[..4].copy_from_slice(&PREAMBLE);
    bytes[4] = WRITE_LINE + row;
    bytes[5] = 0;
    bytes[6] = len as u8;
    bytes[7] = col;
    for (i, c) in text.chars().enumerate() {
        bytes[8 + i] = if c.is_ascii() { c as u8 } else { b'?' };
    }
    // bytes[8 + chars] is the terminator, already zero
    bytes[8 + len] = END;

    RawMessage::new(frame, &bytes[..9 + len])
}

/// Blank screen line `row`: `F0 47 7F 15 (1C+row) 00 00 F7`
pub fn screen_clear_line(row: u8) -> Result<[u8; 8]> {
    if row >= SCREEN_ROWS {
        return Err(Error::InvalidArgument("screen row must be within 0..4"));
    }
    Ok([
        PREAMBLE[0],
        PREAMBLE[1],
        PREAMBLE[2],
        PREAMBLE[3],
        CLEAR_LINE + row,
        0,
        0,
        END,
    ])
}

/// Switch the touch strip mode: `F0 47 7F 15 63 00 01 <mode> F7`
pub fn strip_mode(mode: u8) -> [u8; 9] {
    [
        PREAMBLE[0],
        PREAMBLE[1],
        PREAMBLE[2],
        PREAMBLE[3],
        STRIP_MODE,
        0,
        1,
        mode & 0x7F,
        END,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_text_layout() {
        let msg = screen_text(0, 1, 4, "12").unwrap();
        assert_eq!(
            msg.bytes(),
            &[0xF0, 0x47, 0x7F, 0x15, 0x19, 0x00, 0x03, 0x04, 0x31, 0x32, 0x00, 0xF7]
        );
    }

    #[test]
    fn test_screen_text_full_line() {
        let line = "x".repeat(68);
        let msg = screen_text(7, 3, 0, &line).unwrap();
        assert_eq!(msg.len(), 9 + 69);
        assert_eq!(msg.frame(), 7);
        assert_eq!(msg.bytes()[4], 0x1B);
        assert_eq!(msg.bytes()[6], 69);
        assert_eq!(*msg.bytes().last().unwrap(), 0xF7);
    }

    #[test]
    fn test_screen_text_replaces_non_ascii() {
        let msg = screen_text(0, 0, 0, "é").unwrap();
        assert_eq!(&msg.bytes()[8..10], &[b'?', 0]);
    }

    #[test]
    fn test_screen_text_bounds() {
        assert!(matches!(
            screen_text(0, 4, 0, "a"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            screen_text(0, 0, 66, "abc"),
            Err(Error::ScreenOverflow { col: 66, len: 3 })
        ));
    }

    #[test]
    fn test_clear_line_and_strip() {
        assert_eq!(
            screen_clear_line(2).unwrap(),
            [0xF0, 0x47, 0x7F, 0x15, 0x1E, 0x00, 0x00, 0xF7]
        );
        assert_eq!(
            strip_mode(1),
            [0xF0, 0x47, 0x7F, 0x15, 0x63, 0x00, 0x01, 0x01, 0xF7]
        );
    }
}
