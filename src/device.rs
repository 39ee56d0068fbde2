/*!
# The Push as a whole

[`Device`] owns the tracks and the surface-wide state (hold flag, strip mode, encoder values,
toggle states) and routes every incoming message to whatever handles it.

It is driven by one realtime callback per block, [`Device::process_block`]. That callback is the
only place where device state changes, so none of it is locked. Other threads talk to the
surface through a [`QueueWriter`] from [`Device::queue_writer`]; their messages go out at the
start of the next block.
*/

use log::{debug, info, warn};

use crate::errors::Lookup;
use crate::event_queue::{self, QueueReader, QueueWriter};
use crate::grid::{ColorScheme, Grid, Layout, Window, DEFAULT_MAX_MIRRORS};
use crate::knob::Knob;
use crate::message::{MidiWriter, RawMessage};
use crate::push::{
    self, Button, ButtonLight, Output, StripMode, ToggleRow, KNOB_COUNT, TOGGLE_COUNT,
};
use crate::routing::RoutingTable;
use crate::settings::Settings;
use crate::track::{Track, DEFAULT_OCTAVE};
use crate::{Error, Result};

/// Screen columns per encoder
const KNOB_COLUMNS: u8 = 8;

pub struct Device {
    tracks: Vec<Track>,
    routing: RoutingTable,
    selected: usize,
    knobs: [Knob; KNOB_COUNT],
    toggles: [[bool; TOGGLE_COUNT]; 2],
    hold: bool,
    strip: StripMode,
    reader: QueueReader,
    writer: QueueWriter,
    max_mirrors: usize,
    knob_row: u8,
}

impl Device {
    /// A device without tracks, with an event queue of `queue_capacity` bytes
    pub fn new(queue_capacity: usize) -> Result<Self> {
        let (writer, reader) = event_queue::channel(queue_capacity)?;
        let mut knobs = [Knob::new(0); KNOB_COUNT];
        for (i, knob) in knobs.iter_mut().enumerate() {
            *knob = Knob::new(i as u8);
        }

        Ok(Self {
            tracks: Vec::new(),
            routing: RoutingTable::new(),
            selected: 0,
            knobs,
            toggles: [[false; TOGGLE_COUNT]; 2],
            hold: false,
            strip: StripMode::default(),
            reader,
            writer,
            max_mirrors: DEFAULT_MAX_MIRRORS,
            knob_row: 1,
        })
    }

    /// Build the device and its tracks. The initial screen, strip and pad state is queued and
    /// goes out with the first block.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let mut device = Self::new(settings.queue_capacity)?;
        device.max_mirrors = settings.max_mirrors;
        device.knob_row = settings.knob_row;

        let mut out = Output::new(device.queue_writer(), 0);
        out.screen_clear()?;
        out.set_strip(device.strip)?;
        out.set_button(Button::ACCENT, ButtonLight::Off)?;
        for track in &settings.tracks {
            device.add_track(track.scheme, track.window, track.octave, &mut out)?;
        }

        Ok(device)
    }

    /// Create a track showing `window`, and draw it. Returns the new track's index, which is
    /// also its channel offset.
    pub fn create_track<W: MidiWriter>(
        &mut self,
        scheme: ColorScheme,
        window: Window,
        out: &mut Output<W>,
    ) -> Result<usize> {
        self.add_track(scheme, window, DEFAULT_OCTAVE, out)
    }

    fn add_track<W: MidiWriter>(
        &mut self,
        scheme: ColorScheme,
        window: Window,
        octave: u8,
        out: &mut Output<W>,
    ) -> Result<usize> {
        scheme.validate()?;
        let index = self.tracks.len();
        let grid = Grid::with_max_mirrors(Layout::chromatic(scheme), self.max_mirrors);
        let mut track = Track::new(index, grid, octave)?;

        self.routing.assign_window(index, window)?;
        track.display(window, out)?;
        self.tracks.push(track);

        info!("created track {} at {:?}, octave {}", index, window, octave);
        Ok(index)
    }

    /// Move track `index` to another window and redraw it. The pads it leaves are not cleared.
    pub fn display_track<W: MidiWriter>(
        &mut self,
        index: usize,
        window: Window,
        out: &mut Output<W>,
    ) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(Error::NotFound(Lookup::Track(index)));
        }
        self.routing.assign_window(index, window)?;
        self.tracks[index].display(window, out)
    }

    /// Make `controller` act on track `track`, regardless of which track is selected
    pub fn route_control(&mut self, controller: u8, track: usize) -> Result<()> {
        if track >= self.tracks.len() {
            return Err(Error::NotFound(Lookup::Track(track)));
        }
        self.routing.route_control(controller, track)
    }

    /// A producer for the event queue, for use outside of the block callback
    pub fn queue_writer(&self) -> QueueWriter {
        self.writer.clone()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Result<&Track> {
        self.tracks
            .get(index)
            .ok_or(Error::NotFound(Lookup::Track(index)))
    }

    pub fn track_mut(&mut self, index: usize) -> Result<&mut Track> {
        self.tracks
            .get_mut(index)
            .ok_or(Error::NotFound(Lookup::Track(index)))
    }

    pub fn selected_track(&self) -> usize {
        self.selected
    }

    pub fn hold(&self) -> bool {
        self.hold
    }

    pub fn strip(&self) -> StripMode {
        self.strip
    }

    pub fn knob(&self, index: usize) -> Option<&Knob> {
        self.knobs.get(index)
    }

    pub fn toggle(&self, row: ToggleRow, index: usize) -> bool {
        self.toggles[row as usize].get(index).copied().unwrap_or(false)
    }

    /// Flip the hold flag and light the accent button to match. Returns the new state.
    pub fn toggle_hold<W: MidiWriter>(&mut self, out: &mut Output<W>) -> Result<bool> {
        self.hold = !self.hold;
        let light = if self.hold {
            ButtonLight::Full
        } else {
            ButtonLight::Off
        };
        out.set_button(Button::ACCENT, light)?;
        Ok(self.hold)
    }

    /// Switch the touch strip between pitch bend and mod wheel
    pub fn toggle_strip<W: MidiWriter>(&mut self, out: &mut Output<W>) -> Result<StripMode> {
        self.strip = self.strip.toggled();
        out.set_strip(self.strip)?;
        Ok(self.strip)
    }

    /// The realtime block callback. Sends everything queued since the last block at frame 0,
    /// then handles `incoming` in order. Failures are logged and the block carries on.
    pub fn process_block<W: MidiWriter>(&mut self, incoming: &[RawMessage], out: &mut W) {
        for queued in self.reader.drain() {
            if let Err(e) = out.write(queued.port, 0, queued.message.bytes()) {
                warn!("dropped queued message {:?}: {}", queued.message, e);
            }
        }
        if !self.reader.reset() {
            debug!("event queue not rewound, a producer is still writing");
        }

        for msg in incoming {
            if let Err(e) = self.process_incoming(msg, out) {
                warn!("failed to handle {:?}: {}", msg, e);
            }
        }
    }

    /// Handle one message from the Push. Whatever it triggers is written to `out` at the
    /// message's frame.
    pub fn process_incoming<W: MidiWriter>(&mut self, msg: &RawMessage, out: &mut W) -> Result<()> {
        let mut out = Output::new(out, msg.frame());

        match push::decode_message(msg.bytes()) {
            push::Message::PadPress {
                pad,
                velocity,
                channel,
            } => {
                if let Some(track) = self.pad_track(pad) {
                    self.tracks[track].press(pad, velocity, channel, &mut out)?;
                }
            }
            push::Message::PadRelease {
                pad,
                velocity,
                channel,
            } => {
                if let Some(track) = self.pad_track(pad) {
                    let hold = self.hold;
                    self.tracks[track].release(pad, velocity, channel, hold, &mut out)?;
                }
            }
            push::Message::PadAftertouch {
                pad,
                pressure,
                channel,
            } => {
                if let Some(track) = self.pad_track(pad) {
                    self.tracks[track].aftertouch(pad, pressure, channel, &mut out)?;
                }
            }
            push::Message::Strip { .. } | push::Message::PitchBend { .. } => {
                out.forward(msg.bytes())?;
            }
            push::Message::Toggle { row, index, value } => {
                if value == 0 {
                    let lit = &mut self.toggles[row as usize][index as usize];
                    *lit = !*lit;
                    let light = if *lit {
                        ButtonLight::Full
                    } else {
                        ButtonLight::Off
                    };
                    out.set_toggle(row, index, light)?;
                }
            }
            push::Message::Knob { index, value } => {
                let knob = &mut self.knobs[index as usize];
                knob.update(value);
                out.screen_display(self.knob_row, index * KNOB_COLUMNS, knob.label().as_str())?;
            }
            push::Message::Button { button, value } => {
                if value == 0 {
                    self.process_button(button, &mut out)?;
                }
            }
            push::Message::Touch { .. } | push::Message::Unknown => {}
        }

        Ok(())
    }

    fn process_button<W: MidiWriter>(&mut self, button: Button, out: &mut Output<W>) -> Result<()> {
        let target = self.control_track(button.code());

        match button {
            Button::OCTAVE_UP => {
                self.track_mut(target)?.shift_octave(1, out)?;
            }
            Button::OCTAVE_DOWN => {
                self.track_mut(target)?.shift_octave(-1, out)?;
            }
            Button::SELECT => {
                if !self.tracks.is_empty() {
                    self.selected = (self.selected + 1) % self.tracks.len();
                    info!("selected track {}", self.selected);
                }
            }
            Button::ACCENT => {
                self.toggle_hold(out)?;
            }
            Button::USER => {
                self.toggle_strip(out)?;
            }
            Button::DELETE => {
                self.track_mut(target)?.release_held(out)?;
            }
            other => debug!("button {} has no function", other.code()),
        }

        Ok(())
    }

    fn pad_track(&self, pad: u8) -> Option<usize> {
        let track = self.routing.pad(pad);
        if track.is_none() {
            debug!("pad {} is outside every track's window", pad);
        }
        track
    }

    // Pinned track of a controller, otherwise the selected one
    fn control_track(&self, controller: u8) -> usize {
        self.routing.control(controller).unwrap_or(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{BlockBuffer, Port};

    fn device() -> Device {
        let mut device = Device::new(1024).unwrap();
        let mut block = BlockBuffer::new();
        device
            .create_track(
                ColorScheme::default(),
                Window::FULL,
                &mut Output::new(&mut block, 0),
            )
            .unwrap();
        device
    }

    fn process(device: &mut Device, bytes: &[u8]) -> BlockBuffer {
        let mut block = BlockBuffer::new();
        device
            .process_incoming(&RawMessage::new(3, bytes).unwrap(), &mut block)
            .unwrap();
        block
    }

    #[test]
    fn test_pad_press_plays_note_at_frame() {
        let mut device = device();
        let block = process(&mut device, &[0x90, 36, 100]);
        let notes: Vec<_> = block.bytes_for(Port::Instrument).collect();
        assert_eq!(notes, vec![&[0x90, 36, 100][..]]);
        assert!(block.messages().iter().all(|(_, msg)| msg.frame() == 3));
    }

    #[test]
    fn test_buttons_fire_on_release_only() {
        let mut device = device();
        process(&mut device, &[0xB0, 55, 127]);
        assert_eq!(device.track(0).unwrap().octave(), 3);
        process(&mut device, &[0xB0, 55, 0]);
        assert_eq!(device.track(0).unwrap().octave(), 4);
        process(&mut device, &[0xB0, 54, 0]);
        process(&mut device, &[0xB0, 54, 0]);
        assert_eq!(device.track(0).unwrap().octave(), 2);
    }

    #[test]
    fn test_hold_and_strip_toggles() {
        let mut device = device();
        let block = process(&mut device, &[0xB0, 57, 0]);
        assert!(device.hold());
        assert_eq!(
            block.bytes_for(Port::Device).collect::<Vec<_>>(),
            vec![&[0xB0, 57, 4][..]]
        );

        let block = process(&mut device, &[0xB0, 59, 0]);
        assert_eq!(device.strip(), StripMode::ModWheel);
        assert_eq!(
            block.bytes_for(Port::Device).next().unwrap(),
            &[0xF0, 0x47, 0x7F, 0x15, 0x63, 0x00, 0x01, 0x01, 0xF7]
        );
    }

    #[test]
    fn test_knob_shows_value_on_screen() {
        let mut device = device();
        let block = process(&mut device, &[0xB0, 73, 5]);
        assert_eq!(device.knob(2).unwrap().value(), 5);
        let screen = block.bytes_for(Port::Device).next().unwrap();
        assert_eq!(
            screen,
            &[0xF0, 0x47, 0x7F, 0x15, 0x19, 0x00, 0x04, 16, b' ', b' ', b'5', 0x00, 0xF7]
        );
    }

    #[test]
    fn test_toggle_flips_on_release() {
        let mut device = device();
        process(&mut device, &[0xB0, 104, 127]);
        assert!(!device.toggle(ToggleRow::Lower, 2));
        let block = process(&mut device, &[0xB0, 104, 0]);
        assert!(device.toggle(ToggleRow::Lower, 2));
        assert_eq!(
            block.bytes_for(Port::Device).collect::<Vec<_>>(),
            vec![&[0xB0, 104, 4][..]]
        );
    }

    #[test]
    fn test_strip_and_pitch_bend_pass_through() {
        let mut device = device();
        for bytes in [[0xB0u8, 1, 64], [0xB0, 10, 3], [0xE0, 0, 100]] {
            let block = process(&mut device, &bytes);
            assert_eq!(
                block.bytes_for(Port::Instrument).collect::<Vec<_>>(),
                vec![&bytes[..]]
            );
        }
    }

    #[test]
    fn test_unknown_track_lookups() {
        let mut device = device();
        assert!(matches!(
            device.route_control(55, 3),
            Err(Error::NotFound(Lookup::Track(3)))
        ));
        let mut block = BlockBuffer::new();
        assert!(device
            .display_track(1, Window::FULL, &mut Output::new(&mut block, 0))
            .is_err());
    }
}
