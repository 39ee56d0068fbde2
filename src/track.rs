/*!
# Note tracking

A [`Track`] turns pad hits inside its window into notes for the instrument, and keeps the pads
lit to match. It tracks every sounding pitch in one of three sets:

- _active_: triggered by a pad that is still held down
- _held_: released while hold was on, keeps sounding until [`Track::release_held`]
- _ghosts_: were active while the octave moved. Each ghost remembers the octave it was triggered
  at, so that releasing its pad still stops the right pitch

A pitch is never in both the active and the held set.
*/

use log::debug;

use crate::grid::{Grid, Layout, Window};
use crate::message::MidiWriter;
use crate::push::{Output, PadMode};
use crate::util::{pitch, position};
use crate::{protocols, Error, Result};

pub const DEFAULT_OCTAVE: u8 = 3;
pub const MAX_OCTAVE: u8 = 10;

/// A note that kept sounding across an octave shift
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ghost {
    pub pitch: u8,
    /// The octave the note was triggered at
    pub octave: u8,
}

/// What a pad event did
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// Note-On sent
    Played,
    /// The pitch was already sounding from a mirrored pad; Note-Off then Note-On sent
    Retriggered,
    /// Moved to the held set, nothing sent to the instrument
    Held,
    /// Note-Off sent
    Released,
    /// Note-Off sent for a ghost, at its trigger octave
    GhostReleased,
    /// Nothing to do: the pitch is held or beyond the MIDI range
    Ignored,
    /// A release nobody is waiting for, e.g. a duplicate
    Stale,
}

/// Result of [`Track::shift_octave`]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Shift {
    /// The new octave
    Applied(u8),
    /// Would have left 0..=10, nothing changed
    Rejected,
}

#[derive(Debug, Clone)]
pub struct Track {
    index: usize,
    grid: Grid,
    octave: u8,
    active: Vec<u8>,
    held: Vec<u8>,
    ghosts: Vec<Ghost>,
    // input channel of the last pad hit, used by release_held
    last_channel: u8,
}

impl Track {
    pub fn new(index: usize, grid: Grid, octave: u8) -> Result<Self> {
        if octave > MAX_OCTAVE {
            return Err(Error::InvalidArgument("octave must be within 0..=10"));
        }
        Ok(Self {
            index,
            grid,
            octave,
            // 128 pitches at most, so these never reallocate while playing
            active: Vec::with_capacity(128),
            held: Vec::with_capacity(128),
            ghosts: Vec::with_capacity(128),
            last_channel: 0,
        })
    }

    pub fn with_layout(index: usize, layout: Layout) -> Self {
        Self {
            index,
            grid: Grid::new(layout),
            octave: DEFAULT_OCTAVE,
            active: Vec::with_capacity(128),
            held: Vec::with_capacity(128),
            ghosts: Vec::with_capacity(128),
            last_channel: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> &[u8] {
        &self.active
    }

    pub fn held(&self) -> &[u8] {
        &self.held
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    /// Instrument channel for an event that came in on `channel`. Track `n` plays `n` channels up.
    pub fn channel(&self, channel: u8) -> u8 {
        ((channel as usize + self.index) & 0x0F) as u8
    }

    /// Move the track to `window` and draw it, including the notes that are still sounding
    pub fn display<W: MidiWriter>(&mut self, window: Window, out: &mut Output<W>) -> Result<()> {
        self.grid.set_window(window)?;
        self.grid.paint(out)?;

        let pressed = self.grid.layout().pressed;
        let Self {
            grid,
            octave,
            active,
            held,
            ghosts,
            ..
        } = self;
        let sounding = active
            .iter()
            .map(|&p| (p, PadMode::PLAIN))
            .chain(ghosts.iter().map(|g| (g.pitch, PadMode::PLAIN)))
            .chain(held.iter().map(|&p| (p, PadMode::HOLD)));
        for (pitch, mode) in sounding {
            let n0 = position(pitch, *octave);
            if grid.shows(n0) {
                grid.render(n0 as u8, pressed, mode, out)?;
            }
        }
        Ok(())
    }

    pub fn press<W: MidiWriter>(
        &mut self,
        pad: u8,
        velocity: u8,
        channel: u8,
        out: &mut Output<W>,
    ) -> Result<Outcome> {
        let n0 = self.grid.by_index(pad)?.n0;
        let pitch = match pitch(n0, self.octave) {
            Some(pitch) => pitch,
            None => {
                debug!("pad {} is beyond the MIDI range at octave {}", pad, self.octave);
                return Ok(Outcome::Ignored);
            }
        };
        self.last_channel = channel;

        if self.held.contains(&pitch) {
            return Ok(Outcome::Ignored);
        }

        let ch = self.channel(channel);
        let outcome = if self.active.contains(&pitch) {
            out.note_off(ch, pitch, velocity)?;
            Outcome::Retriggered
        } else {
            self.active.push(pitch);
            Outcome::Played
        };
        out.note_on(ch, pitch, velocity)?;

        let pressed = self.grid.layout().pressed;
        self.grid.render(n0, pressed, PadMode::PLAIN, out)?;

        Ok(outcome)
    }

    /// Handle a pad being let go. With `hold` set, an active note keeps sounding and moves to the
    /// held set instead.
    pub fn release<W: MidiWriter>(
        &mut self,
        pad: u8,
        velocity: u8,
        channel: u8,
        hold: bool,
        out: &mut Output<W>,
    ) -> Result<Outcome> {
        let n0 = self.grid.by_index(pad)?.n0;
        let ch = self.channel(channel);

        let active = pitch(n0, self.octave).and_then(|p| self.active.iter().position(|&a| a == p));
        if let Some(i) = active {
            let pitch = self.active.remove(i);
            if hold {
                self.held.push(pitch);
                let pressed = self.grid.layout().pressed;
                self.grid.render(n0, pressed, PadMode::HOLD, out)?;
                return Ok(Outcome::Held);
            }

            out.note_off(ch, pitch, velocity)?;
            self.grid.render_base(n0, out)?;
            return Ok(Outcome::Released);
        }

        // The pad may have triggered its note before the octave moved
        let ghost = self
            .ghosts
            .iter()
            .position(|g| n0 as u16 + g.octave as u16 * 12 == g.pitch as u16);
        match ghost {
            Some(i) => {
                let ghost = self.ghosts.remove(i);
                out.note_off(ch, ghost.pitch, velocity)?;
                let current = position(ghost.pitch, self.octave);
                if self.grid.shows(current) {
                    self.grid.render_base(current as u8, out)?;
                } else {
                    debug!("ghost {} is outside the window, not redrawn", ghost.pitch);
                }
                Ok(Outcome::GhostReleased)
            }
            None => {
                debug!("stale release of pad {} on track {}", pad, self.index);
                Ok(Outcome::Stale)
            }
        }
    }

    /// Forward pad pressure as polyphonic aftertouch on the pad's pitch
    pub fn aftertouch<W: MidiWriter>(
        &mut self,
        pad: u8,
        pressure: u8,
        channel: u8,
        out: &mut Output<W>,
    ) -> Result<()> {
        let n0 = self.grid.by_index(pad)?.n0;
        if let Some(pitch) = pitch(n0, self.octave) {
            out.forward(&protocols::poly_aftertouch(self.channel(channel), pitch, pressure))?;
        }
        Ok(())
    }

    /// Move the window `delta` octaves. Sounding notes keep sounding; their pads follow them to
    /// the new position, when it is inside the window.
    pub fn shift_octave<W: MidiWriter>(&mut self, delta: i8, out: &mut Output<W>) -> Result<Shift> {
        let target = self.octave as i16 + delta as i16;
        if !(0..=MAX_OCTAVE as i16).contains(&target) {
            debug!("octave shift to {} rejected", target);
            return Ok(Shift::Rejected);
        }
        let target = target as u8;

        let Self {
            grid,
            octave,
            active,
            held,
            ghosts,
            ..
        } = self;
        for ghost in ghosts.iter() {
            move_note(grid, ghost.pitch, *octave, target, PadMode::PLAIN, out)?;
        }
        for &pitch in held.iter() {
            move_note(grid, pitch, *octave, target, PadMode::HOLD, out)?;
        }
        for &pitch in active.iter() {
            ghosts.push(Ghost {
                pitch,
                octave: *octave,
            });
            move_note(grid, pitch, *octave, target, PadMode::PLAIN, out)?;
        }
        active.clear();
        *octave = target;

        Ok(Shift::Applied(target))
    }

    /// Stop every held note. Returns how many were stopped.
    pub fn release_held<W: MidiWriter>(&mut self, out: &mut Output<W>) -> Result<usize> {
        let ch = self.channel(self.last_channel);
        let count = self.held.len();
        for &pitch in &self.held {
            out.note_off(ch, pitch, 0)?;
            let n0 = position(pitch, self.octave);
            if self.grid.shows(n0) {
                self.grid.render_base(n0 as u8, out)?;
            }
        }
        self.held.clear();
        Ok(count)
    }
}

// Redraw a sounding pitch for a new octave: base color where it was, pressed where it is now
fn move_note<W: MidiWriter>(
    grid: &mut Grid,
    pitch: u8,
    from: u8,
    to: u8,
    mode: u8,
    out: &mut Output<W>,
) -> Result<()> {
    let old = position(pitch, from);
    if grid.shows(old) {
        grid.render_base(old as u8, out)?;
    }
    let new = position(pitch, to);
    if grid.shows(new) {
        let pressed = grid.layout().pressed;
        grid.render(new as u8, pressed, mode, out)?;
    }
    Ok(())
}
