//! Which track owns which control.

use crate::grid::Window;
use crate::protocols::PAD_COUNT;
use crate::{Error, Result};

/// Maps pads and controllers to the index of the track they belong to. Pads are owned through
/// the track's window, windows of different tracks may not overlap. Controllers are pinned
/// explicitly; unpinned ones go to whichever track is selected.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    pads: [Option<usize>; PAD_COUNT as usize],
    controls: [Option<usize>; 128],
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            pads: [None; PAD_COUNT as usize],
            controls: [None; 128],
        }
    }
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the pads of `window` to `track`, replacing the pads it owned before. Nothing changes
    /// if the window overlaps another track's.
    pub fn assign_window(&mut self, track: usize, window: Window) -> Result<()> {
        window.validate()?;
        if let Some(pad) = window
            .indices()
            .find(|&pad| matches!(self.pads[pad as usize], Some(owner) if owner != track))
        {
            return Err(Error::WindowOverlap {
                pad,
                track: self.pads[pad as usize].unwrap_or(track),
            });
        }

        for owner in self.pads.iter_mut() {
            if *owner == Some(track) {
                *owner = None;
            }
        }
        for pad in window.indices() {
            self.pads[pad as usize] = Some(track);
        }
        Ok(())
    }

    pub fn pad(&self, index: u8) -> Option<usize> {
        self.pads.get(index as usize).copied().flatten()
    }

    pub fn route_control(&mut self, controller: u8, track: usize) -> Result<()> {
        let slot = self
            .controls
            .get_mut(controller as usize)
            .ok_or(Error::InvalidArgument("controller numbers are 7 bit"))?;
        *slot = Some(track);
        Ok(())
    }

    /// The track a controller is pinned to, if any
    pub fn control(&self, controller: u8) -> Option<usize> {
        self.controls.get(controller as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: Window = Window { x: 0, y: 0, width: 4, height: 8 };
    const RIGHT: Window = Window { x: 4, y: 0, width: 4, height: 8 };

    #[test]
    fn test_split_surface() {
        let mut table = RoutingTable::new();
        table.assign_window(0, LEFT).unwrap();
        table.assign_window(1, RIGHT).unwrap();
        assert_eq!(table.pad(0), Some(0));
        assert_eq!(table.pad(7), Some(1));
        assert_eq!(table.pad(60), Some(1));
        assert_eq!(table.pad(64), None);
    }

    #[test]
    fn test_overlap_is_rejected() {
        let mut table = RoutingTable::new();
        table.assign_window(0, LEFT).unwrap();
        assert!(matches!(
            table.assign_window(1, Window::FULL),
            Err(Error::WindowOverlap { pad: 0, track: 0 })
        ));
        assert_eq!(table.pad(7), None);
    }

    #[test]
    fn test_moving_a_window_frees_old_pads() {
        let mut table = RoutingTable::new();
        table.assign_window(0, LEFT).unwrap();
        table.assign_window(0, RIGHT).unwrap();
        assert_eq!(table.pad(0), None);
        assert_eq!(table.pad(7), Some(0));
    }

    #[test]
    fn test_controls() {
        let mut table = RoutingTable::new();
        assert_eq!(table.control(71), None);
        table.route_control(71, 2).unwrap();
        assert_eq!(table.control(71), Some(2));
        assert!(table.route_control(128, 0).is_err());
    }
}
