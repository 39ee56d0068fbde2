//! A fixed-capacity, lock-free message queue between any number of producers and the one
//! realtime block callback.
//!
//! This is not a ring buffer. Producers bump a shared write cursor, the reader trails behind
//! with its own cursor, and once per block the reader drains everything and rewinds both cursors
//! to the start. The total amount of bytes written between two rewinds therefore can't exceed
//! the capacity; a write that doesn't fit is rejected with [`Error::QueueFull`] and counted.
//!
//! ```
//! use pushpad::{event_queue, Port};
//!
//! let (writer, mut reader) = event_queue::channel(64)?;
//! writer.write(Port::Device, &[0xB0, 55, 4])?;
//!
//! let drained: Vec<_> = reader.drain().collect();
//! assert_eq!(drained[0].message.bytes(), &[0xB0, 55, 4]);
//! assert!(reader.reset());
//! # Ok::<(), pushpad::Error>(())
//! ```

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::message::{MidiWriter, Port, RawMessage, MAX_MESSAGE_LEN};
use crate::{Error, Result};

/// Slot header: state, port, payload length
pub const HEADER_LEN: usize = 3;

// Slot states. Drained slots are zeroed back to WRITING, so after a rewind a freshly claimed slot
// can never be mistaken for a stale ready one.
const WRITING: u8 = 0;
const READY: u8 = 1;
const SKIPPED: u8 = 2;

struct Shared {
    data: Box<[AtomicU8]>,
    write: AtomicUsize,
    read: AtomicUsize,
    overflows: AtomicUsize,
}

impl Shared {
    fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Create a queue of `capacity` bytes (headers included).
///
/// There is exactly one [`QueueReader`]; it can't be cloned, so a second concurrent reader is
/// impossible by construction. The [`QueueWriter`] can be cloned and sent to other threads.
pub fn channel(capacity: usize) -> Result<(QueueWriter, QueueReader)> {
    if capacity <= HEADER_LEN {
        return Err(Error::InvalidArgument(
            "event queue capacity must exceed the slot header",
        ));
    }

    let data = (0..capacity).map(|_| AtomicU8::new(WRITING)).collect();
    let shared = Arc::new(Shared {
        data,
        write: AtomicUsize::new(0),
        read: AtomicUsize::new(0),
        overflows: AtomicUsize::new(0),
    });

    Ok((
        QueueWriter {
            shared: Arc::clone(&shared),
        },
        QueueReader { shared },
    ))
}

/// The producing end of the event queue. Cheap to clone.
#[derive(Clone)]
pub struct QueueWriter {
    shared: Arc<Shared>,
}

impl QueueWriter {
    /// Claim a slot for a message of `nbytes` bytes, to be filled through the returned
    /// [`Reservation`] and then committed.
    pub fn reserve(&self, port: Port, nbytes: usize) -> Result<Reservation<'_>> {
        if nbytes > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLong {
                len: nbytes,
                max: MAX_MESSAGE_LEN,
            });
        }

        let shared = &*self.shared;
        let requested = HEADER_LEN + nbytes;
        let mut start = shared.write.load(Ordering::Acquire);
        loop {
            let end = start + requested;
            if end > shared.capacity() {
                shared.overflows.fetch_add(1, Ordering::Relaxed);
                return Err(Error::QueueFull {
                    requested,
                    available: shared.capacity().saturating_sub(start),
                });
            }

            match shared
                .write
                .compare_exchange_weak(start, end, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(current) => start = current,
            }
        }

        // state stays WRITING until commit
        shared.data[start + 1].store(port as u8, Ordering::Relaxed);
        shared.data[start + 2].store(nbytes as u8, Ordering::Relaxed);

        Ok(Reservation {
            shared,
            start,
            len: nbytes,
            committed: false,
        })
    }

    /// Copy a whole message into a freshly reserved slot
    pub fn write(&self, port: Port, bytes: &[u8]) -> Result<()> {
        let mut reservation = self.reserve(port, bytes.len())?;
        reservation.copy_from_slice(bytes);
        reservation.commit();
        Ok(())
    }

    /// Number of writes rejected because the queue was full, since creation
    pub fn overflows(&self) -> usize {
        self.shared.overflows.load(Ordering::Relaxed)
    }

    /// Bytes left until the next rewind
    pub fn available(&self) -> usize {
        let shared = &*self.shared;
        shared.capacity() - shared.write.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }
}

/// Queued messages are always delivered at the start of the next block, so the frame is
/// ignored.
impl MidiWriter for QueueWriter {
    fn write(&mut self, port: Port, _frame: u32, bytes: &[u8]) -> Result<()> {
        QueueWriter::write(self, port, bytes)
    }
}

impl std::fmt::Debug for QueueWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueWriter")
            .field("capacity", &self.capacity())
            .field("available", &self.available())
            .field("overflows", &self.overflows())
            .finish()
    }
}

/// A claimed slot in the queue. The reader won't see it until [`Reservation::commit`] is called;
/// a reservation that is dropped uncommitted is skipped by the reader.
pub struct Reservation<'a> {
    shared: &'a Shared,
    start: usize,
    len: usize,
    committed: bool,
}

impl Reservation<'_> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set payload byte `index`
    pub fn set(&mut self, index: usize, byte: u8) {
        assert!(index < self.len, "reservation index out of bounds");
        self.shared.data[self.start + HEADER_LEN + index].store(byte, Ordering::Relaxed);
    }

    /// Fill the payload from `bytes`, which must be exactly as long as the reservation
    pub fn copy_from_slice(&mut self, bytes: &[u8]) {
        assert_eq!(bytes.len(), self.len, "reservation length mismatch");
        for (index, &byte) in bytes.iter().enumerate() {
            self.set(index, byte);
        }
    }

    /// Publish the slot to the reader
    pub fn commit(mut self) {
        self.finish(READY);
    }

    fn finish(&mut self, state: u8) {
        self.committed = true;
        self.shared.data[self.start].store(state, Ordering::Release);
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.finish(SKIPPED);
        }
    }
}

/// A message taken out of the queue
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct QueuedMessage {
    pub port: Port,
    /// Always at frame 0: queued messages go out at the start of the block that drains them
    pub message: RawMessage,
}

/// The single consuming end of the event queue, owned by the block callback
pub struct QueueReader {
    shared: Arc<Shared>,
}

impl QueueReader {
    /// Iterate the pending messages in write order. The iterator stops at the end of the written
    /// data, or early at a slot a producer is still filling. Consumed messages are gone; a new
    /// `drain()` continues where the last one stopped.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain { reader: self }
    }

    /// Rewind both cursors to the start of the buffer. Only happens if everything written so far
    /// has been drained; returns whether the queue was rewound.
    pub fn reset(&mut self) -> bool {
        let shared = &*self.shared;
        let read = shared.read.load(Ordering::Relaxed);
        if shared
            .write
            .compare_exchange(read, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        shared.read.store(0, Ordering::Release);
        true
    }

    /// Create another producer for this queue
    pub fn writer(&self) -> QueueWriter {
        QueueWriter {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Lazy iterator over pending messages, see [`QueueReader::drain`]
pub struct Drain<'a> {
    reader: &'a mut QueueReader,
}

impl Iterator for Drain<'_> {
    type Item = QueuedMessage;

    fn next(&mut self) -> Option<QueuedMessage> {
        let shared = &*self.reader.shared;
        loop {
            let read = shared.read.load(Ordering::Relaxed);
            if read >= shared.write.load(Ordering::Acquire) {
                return None;
            }

            let state = shared.data[read].load(Ordering::Acquire);
            if state == WRITING {
                return None;
            }

            let port = shared.data[read + 1].load(Ordering::Relaxed);
            let len = shared.data[read + 2].load(Ordering::Relaxed) as usize;

            let mut bytes = [0u8; MAX_MESSAGE_LEN];
            for (i, byte) in bytes[..len].iter_mut().enumerate() {
                *byte = shared.data[read + HEADER_LEN + i].load(Ordering::Relaxed);
            }

            // Clear the whole slot: after a rewind, any of its bytes may become a slot header
            let end = read + HEADER_LEN + len;
            for byte in &shared.data[read..end] {
                byte.store(WRITING, Ordering::Relaxed);
            }
            shared.read.store(end, Ordering::Release);

            if state == SKIPPED {
                continue;
            }
            let port = match Port::from_byte(port) {
                Some(port) => port,
                None => continue,
            };
            // len <= MAX_MESSAGE_LEN is checked on reserve
            let message = RawMessage::new(0, &bytes[..len]).ok()?;
            return Some(QueuedMessage { port, message });
        }
    }
}
