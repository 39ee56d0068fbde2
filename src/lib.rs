/*!
Turns an Ableton Push into a chromatic note controller: pads play notes on a downstream
instrument, the pads, buttons and screen show what is going on.

# Overview

A [`Device`] owns one or more [`Track`]s. Each track shows a chromatic layout in its window of
the 8x8 pad grid, plays in its own octave and sends on its own MIDI channel (track `n` plays `n`
channels above the incoming one). Notes keep sounding correctly while the octave is moved under
them, and can be held with the accent button.

All the work happens in one realtime callback per block, [`Device::process_block`], which reads
the block's incoming messages and writes everything they cause into a [`MidiWriter`] at the
incoming message's frame. Messages produced outside of the callback go through the lock-free
[`event_queue`] and are sent at the start of the next block.

```no_run
use pushpad::{Device, PushTransport, Settings};

let settings = Settings::load(Some("pushpad.toml"))?;
let mut device = Device::from_settings(&settings)?;
let mut transport = PushTransport::connect(&settings)?;

loop {
    transport.run_block(&mut device)?;
    std::thread::sleep(std::time::Duration::from_secs_f64(settings.block_duration()));
}
# Ok::<(), pushpad::Error>(())
```

# Low-level access

The [`push`] module decodes Push input into [`push::Message`]s and has an [`push::Output`] to
light pads and buttons, write to the screen and switch the touch strip. Every `Output` function
corresponds to exactly one MIDI message (unless noted otherwise in the documentation).

```
use pushpad::{BlockBuffer, Port, push::{Output, PadMode}};

let mut block = BlockBuffer::new();
let mut output = Output::new(&mut block, 0);
output.set_pad(0, 16, PadMode::PULSE_2)?;
output.screen_display(1, 4, "12")?;

let bytes: Vec<&[u8]> = block.bytes_for(Port::Device).collect();
assert_eq!(bytes[0], &[0x9A, 36, 16]);
assert_eq!(bytes[1], &[0xF0, 0x47, 0x7F, 0x15, 0x19, 0x00, 0x03, 0x04, 0x31, 0x32, 0x00, 0xF7]);
# Ok::<(), pushpad::Error>(())
```
*/

pub mod util;

pub mod protocols;

mod errors;
pub use errors::*;

mod message;
pub use message::*;

pub mod event_queue;
pub use event_queue::{QueueReader, QueueWriter};

pub mod push;

pub mod grid;
pub use grid::{ColorScheme, Grid, Layout, Window};

mod knob;
pub use knob::*;

pub mod track;
pub use track::{Outcome, Shift, Track};

mod routing;
pub use routing::*;

mod device;
pub use device::*;

pub mod settings;
pub use settings::{Settings, TrackSettings};

mod midi_io;
pub use midi_io::*;

/// Identifier used for e.g. the midi port names etc.
const APPLICATION_NAME: &str = "pushpad";
