use super::{Button, ButtonLight, StripMode, ToggleRow};
use crate::message::{MidiWriter, Port};
use crate::protocols::{self, sysex};

/// Sends messages to the Push and to the instrument through a [`MidiWriter`], all stamped with
/// the same frame offset. Every method corresponds to exactly one MIDI message, unless noted
/// otherwise.
///
/// Inside the block callback the writer is the block's output buffer and the frame is the one
/// of the incoming message being handled. Anywhere else, use a [`crate::QueueWriter`]; the
/// frame is then irrelevant.
///
/// ```
/// use pushpad::{event_queue, push::{Button, ButtonLight, Output}};
///
/// let (writer, _reader) = event_queue::channel(1024)?;
/// let mut output = Output::new(writer, 0);
/// output.screen_clear()?;
/// output.screen_display(0, 31, "PUSHPAD")?;
/// output.set_button(Button::OCTAVE_UP, ButtonLight::Full)?;
/// # Ok::<(), pushpad::Error>(())
/// ```
pub struct Output<W: MidiWriter> {
    writer: W,
    frame: u32,
}

impl<W: MidiWriter> Output<W> {
    pub fn new(writer: W, frame: u32) -> Self {
        Self { writer, frame }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn set_frame(&mut self, frame: u32) {
        self.frame = frame;
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Send raw bytes to the Push
    pub fn send(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.writer.write(Port::Device, self.frame, bytes)
    }

    /// Send raw bytes to the instrument, unchanged
    pub fn forward(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.writer.write(Port::Instrument, self.frame, bytes)
    }

    /// Set the color and display mode of a pad, given by its hardware index (0..64)
    pub fn set_pad(&mut self, index: u8, color: u8, mode: u8) -> crate::Result<()> {
        self.send(&protocols::pad(index, color, mode))
    }

    pub fn set_button(&mut self, button: Button, light: ButtonLight) -> crate::Result<()> {
        self.send(&protocols::button(button.code(), light as u8))
    }

    /// Light toggle `index` (0..8) of a toggle row
    pub fn set_toggle(&mut self, row: ToggleRow, index: u8, light: ButtonLight) -> crate::Result<()> {
        assert!(index < super::TOGGLE_COUNT as u8);
        self.send(&protocols::button(row.base() + index, light as u8))
    }

    pub fn set_strip(&mut self, mode: StripMode) -> crate::Result<()> {
        self.send(&sysex::strip_mode(mode as u8))
    }

    /// Write `text` into screen line `row` (0..4), starting at column `col`
    pub fn screen_display(&mut self, row: u8, col: u8, text: &str) -> crate::Result<()> {
        let msg = sysex::screen_text(self.frame, row, col, text)?;
        self.send(msg.bytes())
    }

    pub fn screen_clear_line(&mut self, row: u8) -> crate::Result<()> {
        self.send(&sysex::screen_clear_line(row)?)
    }

    // --------------------------------------------------------------------------------------------
    // Below this point are shorthand functions
    // --------------------------------------------------------------------------------------------

    /// Blank the whole screen. Sends one message per line
    pub fn screen_clear(&mut self) -> crate::Result<()> {
        for row in 0..sysex::SCREEN_ROWS {
            self.screen_clear_line(row)?;
        }
        Ok(())
    }

    pub fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8) -> crate::Result<()> {
        self.forward(&protocols::note_on(channel, pitch, velocity))
    }

    pub fn note_off(&mut self, channel: u8, pitch: u8, velocity: u8) -> crate::Result<()> {
        self.forward(&protocols::note_off(channel, pitch, velocity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::BlockBuffer;

    #[test]
    fn test_routes_to_ports_at_frame() {
        let mut block = BlockBuffer::new();
        let mut output = Output::new(&mut block, 12);
        output.set_pad(0, 101, 0).unwrap();
        output.note_on(2, 60, 90).unwrap();
        output.set_toggle(ToggleRow::Lower, 3, ButtonLight::Full).unwrap();

        let messages = block.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|(_, msg)| msg.frame() == 12));
        assert_eq!(messages[0].0, Port::Device);
        assert_eq!(messages[0].1.bytes(), &[0x90, 36, 101]);
        assert_eq!(messages[1].0, Port::Instrument);
        assert_eq!(messages[1].1.bytes(), &[0x92, 60, 90]);
        assert_eq!(messages[2].1.bytes(), &[0xB0, 105, 4]);
    }

    #[test]
    fn test_screen_clear_sends_four_lines() {
        let mut block = BlockBuffer::new();
        Output::new(&mut block, 0).screen_clear().unwrap();
        let rows: Vec<u8> = block.bytes_for(Port::Device).map(|b| b[4]).collect();
        assert_eq!(rows, vec![0x1C, 0x1D, 0x1E, 0x1F]);
    }
}
