//! Timestamped raw MIDI messages and the writers they are handed to.

use crate::{Error, Result};

/// Largest message the codec builds. A full screen line is 78 bytes, so this leaves headroom.
pub const MAX_MESSAGE_LEN: usize = 128;

/// Where an outgoing message goes
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Port {
    /// The control surface itself (pad colors, button lights, screen, strip)
    Device = 0,
    /// The downstream instrument (notes, aftertouch, pass-through controllers)
    Instrument = 1,
}

impl Port {
    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Device),
            1 => Some(Self::Instrument),
            _ => None,
        }
    }
}

/// A MIDI message with its frame offset inside the current block.
///
/// The payload is stored inline so that building, copying and queueing a message never
/// allocates.
#[derive(Copy, Clone)]
pub struct RawMessage {
    frame: u32,
    len: u8,
    data: [u8; MAX_MESSAGE_LEN],
}

impl RawMessage {
    pub fn new(frame: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLong {
                len: bytes.len(),
                max: MAX_MESSAGE_LEN,
            });
        }

        let mut data = [0; MAX_MESSAGE_LEN];
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            frame,
            len: bytes.len() as u8,
            data,
        })
    }

    /// Shorthand for a 3-byte message
    pub fn short(frame: u32, bytes: [u8; 3]) -> Self {
        let mut data = [0; MAX_MESSAGE_LEN];
        data[..3].copy_from_slice(&bytes);
        Self { frame, len: 3, data }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

impl std::fmt::Debug for RawMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMessage")
            .field("frame", &self.frame)
            .field("bytes", &self.bytes())
            .finish()
    }
}

impl PartialEq for RawMessage {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.bytes() == other.bytes()
    }
}

impl Eq for RawMessage {}

/// Anything outgoing messages can be written to.
///
/// The transport's per-block output buffer implements this (the _immediate_ writer, only valid
/// while the block callback runs), and so does [`crate::QueueWriter`] (the _queued_ writer,
/// usable from anywhere, delivered on the next block).
pub trait MidiWriter {
    fn write(&mut self, port: Port, frame: u32, bytes: &[u8]) -> Result<()>;
}

impl<W: MidiWriter + ?Sized> MidiWriter for &mut W {
    fn write(&mut self, port: Port, frame: u32, bytes: &[u8]) -> Result<()> {
        (**self).write(port, frame, bytes)
    }
}

/// Collects the outgoing messages of one block, in submission order.
#[derive(Debug, Default)]
pub struct BlockBuffer {
    messages: Vec<(Port, RawMessage)>,
}

impl BlockBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Vec::with_capacity(capacity),
        }
    }

    pub fn messages(&self) -> &[(Port, RawMessage)] {
        &self.messages
    }

    /// Iterate the byte payloads written to one port, in submission order
    pub fn bytes_for(&self, port: Port) -> impl Iterator<Item = &[u8]> + '_ {
        self.messages
            .iter()
            .filter(move |(p, _)| *p == port)
            .map(|(_, msg)| msg.bytes())
    }

    /// Empties the buffer, returning the messages ordered by frame. Messages with the same frame
    /// keep their submission order.
    pub fn take_sorted(&mut self) -> Vec<(Port, RawMessage)> {
        let mut messages = std::mem::take(&mut self.messages);
        messages.sort_by_key(|(_, msg)| msg.frame());
        messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MidiWriter for BlockBuffer {
    fn write(&mut self, port: Port, frame: u32, bytes: &[u8]) -> Result<()> {
        self.messages.push((port, RawMessage::new(frame, bytes)?));
        Ok(())
    }
}
