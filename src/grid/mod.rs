/*!
# Pad grid mapping

A [`Grid`] maps the pads of a [`Window`] to pitch-class positions (`n0`) and remembers what each
pad currently shows.

Positions are counted pad by pad, row by row. Windows wider than five pads step back by
`width - 5` at every row boundary, so that each row starts a fourth above the previous one and the
12-tone pattern keeps lining up across rows. Such windows show some positions twice; those pads
are _mirrors_ of each other and are always lit together, up to a cap of `max_mirrors` pads.
*/

mod layout;
pub use layout::*;

mod pad;
pub use pad::*;

use crate::errors::Lookup;
use crate::message::MidiWriter;
use crate::push::{Output, PadMode};
use crate::{Error, Result};

/// How many pads sharing one position get lit, unless configured otherwise
pub const DEFAULT_MAX_MIRRORS: usize = 2;

#[derive(Debug, Clone)]
pub struct Grid {
    layout: Layout,
    window: Option<Window>,
    pads: Vec<Pad>,
    max_mirrors: usize,
}

impl Grid {
    pub fn new(layout: Layout) -> Self {
        Self::with_max_mirrors(layout, DEFAULT_MAX_MIRRORS)
    }

    pub fn with_max_mirrors(layout: Layout, max_mirrors: usize) -> Self {
        Self {
            layout,
            window: None,
            pads: Vec::with_capacity(64),
            max_mirrors,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Takes effect on the next [`Self::set_window`]
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn max_mirrors(&self) -> usize {
        self.max_mirrors
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Regenerate the pad list for `window`. Every pad gets its base color, plain mode.
    pub fn set_window(&mut self, window: Window) -> Result<()> {
        window.validate()?;

        self.pads.clear();
        let mut n0 = 0u8;
        for y in window.y..window.y + window.height {
            for x in window.x..window.x + window.width {
                self.pads.push(Pad {
                    index: y * 8 + x,
                    n0,
                    color: self.layout.color(n0),
                    mode: PadMode::PLAIN,
                });
                n0 += 1;
            }
            if window.width > 5 {
                n0 -= window.width - 5;
            }
        }
        self.window = Some(window);

        Ok(())
    }

    pub fn by_index(&self, index: u8) -> Result<&Pad> {
        self.pads
            .iter()
            .find(|pad| pad.index == index)
            .ok_or(Error::NotFound(Lookup::PadIndex(index)))
    }

    /// First pad at position `n0`
    pub fn by_n0(&self, n0: u8) -> Result<&Pad> {
        self.pads
            .iter()
            .find(|pad| pad.n0 == n0)
            .ok_or(Error::NotFound(Lookup::PitchClass(n0)))
    }

    /// Lowest and highest position shown by the window. Every position in between is shown too.
    pub fn n0_range(&self) -> Result<(u8, u8)> {
        let min = self.pads.iter().map(|pad| pad.n0).min();
        let max = self.pads.iter().map(|pad| pad.n0).max();
        min.zip(max).ok_or(Error::NotFound(Lookup::Range))
    }

    /// Whether `n0` (which may come from pitch arithmetic and be out of `u8` range) is shown
    pub fn shows(&self, n0: i16) -> bool {
        match self.n0_range() {
            Ok((min, max)) => n0 >= min as i16 && n0 <= max as i16,
            Err(_) => false,
        }
    }

    /// Light the pads at position `n0`, up to `max_mirrors` of them, and remember their new
    /// state. Returns how many pads were written.
    pub fn render<W: MidiWriter>(
        &mut self,
        n0: u8,
        color: u8,
        mode: u8,
        out: &mut Output<W>,
    ) -> Result<usize> {
        let mut written = 0;
        for pad in self.pads.iter_mut().filter(|pad| pad.n0 == n0) {
            if written == self.max_mirrors {
                break;
            }
            pad.color = color;
            pad.mode = mode;
            out.set_pad(pad.index, color, mode)?;
            written += 1;
        }
        Ok(written)
    }

    /// Put the pads at position `n0` back to their base color
    pub fn render_base<W: MidiWriter>(&mut self, n0: u8, out: &mut Output<W>) -> Result<usize> {
        let color = self.layout.color(n0);
        self.render(n0, color, PadMode::PLAIN, out)
    }

    /// Send the current state of every pad
    pub fn paint<W: MidiWriter>(&self, out: &mut Output<W>) -> Result<()> {
        for pad in &self.pads {
            out.set_pad(pad.index, pad.color, pad.mode)?;
        }
        Ok(())
    }
}
