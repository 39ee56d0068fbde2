//! Runtime configuration, read from an optional TOML file and `PUSHPAD_*` environment variables.
//!
//! ```toml
//! device = "Ableton Push"
//! instrument = "FLUID Synth"
//! queue_capacity = 8192
//!
//! [[tracks]]
//! window = { x = 0, y = 0, width = 8, height = 8 }
//! scheme = { dark = 0, medium = 101, bright = 86, pressed = 16 }
//! octave = 3
//! ```

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::event_queue::HEADER_LEN;
use crate::grid::{ColorScheme, Window, DEFAULT_MAX_MIRRORS};
use crate::message::MAX_MESSAGE_LEN;
use crate::protocols::sysex::SCREEN_ROWS;
use crate::routing::RoutingTable;
use crate::track::{DEFAULT_OCTAVE, MAX_OCTAVE};
use crate::{Error, Result};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Settings {
    /// Substring of the Push's MIDI port name
    pub device: String,
    /// Substring of the instrument's MIDI output port name. Without one, notes go to a virtual
    /// output port where available.
    pub instrument: Option<String>,
    /// Event queue size in bytes, slot headers included
    pub queue_capacity: usize,
    pub block_frames: u32,
    pub sample_rate: u32,
    /// How many pads showing the same pitch class are lit together
    pub max_mirrors: usize,
    /// Screen line the encoder values are shown on
    pub knob_row: u8,
    pub tracks: Vec<TrackSettings>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct TrackSettings {
    pub window: Window,
    pub scheme: ColorScheme,
    pub octave: u8,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            window: Window::FULL,
            scheme: ColorScheme::default(),
            octave: DEFAULT_OCTAVE,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: "Ableton Push".to_string(),
            instrument: None,
            queue_capacity: 8192,
            block_frames: 256,
            sample_rate: 48000,
            max_mirrors: DEFAULT_MAX_MIRRORS,
            knob_row: 1,
            tracks: vec![TrackSettings::default()],
        }
    }
}

impl Settings {
    /// Read the settings from `path` (any format the config crate knows, by extension) if given,
    /// then apply environment overrides, then validate.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder = builder.add_source(Environment::with_prefix("PUSHPAD").try_parsing(true));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML document, without environment overrides
    pub fn from_toml(toml: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidSettings(msg));

        if self.device.is_empty() {
            return invalid("device port keyword must not be empty".to_string());
        }
        if self.queue_capacity < HEADER_LEN + MAX_MESSAGE_LEN {
            return invalid(format!(
                "queue capacity must be at least {} bytes (found {})",
                HEADER_LEN + MAX_MESSAGE_LEN,
                self.queue_capacity
            ));
        }
        if self.block_frames == 0 || self.sample_rate == 0 {
            return invalid("block frames and sample rate must not be zero".to_string());
        }
        if self.max_mirrors == 0 {
            return invalid("max mirrors must be at least 1".to_string());
        }
        if self.knob_row >= SCREEN_ROWS {
            return invalid(format!("knob row must be below {SCREEN_ROWS}"));
        }

        let mut routing = RoutingTable::new();
        for (i, track) in self.tracks.iter().enumerate() {
            if track.octave > MAX_OCTAVE {
                return invalid(format!("track {i}: octave must be within 0..={MAX_OCTAVE}"));
            }
            if let Err(e) = track
                .scheme
                .validate()
                .and_then(|_| routing.assign_window(i, track.window))
            {
                return invalid(format!("track {i}: {e}"));
            }
        }

        Ok(())
    }

    /// Length of a block in seconds
    pub fn block_duration(&self) -> f64 {
        self.block_frames as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tracks.len(), 1);
        assert_eq!(settings.queue_capacity, 8192);
    }

    #[test]
    fn test_from_toml() {
        let settings = Settings::from_toml(
            r#"
            device = "Push"
            knob_row = 2

            [[tracks]]
            window = { x = 0, y = 0, width = 4, height = 8 }

            [[tracks]]
            window = { x = 4, y = 0, width = 4, height = 8 }
            scheme = { dark = 1, medium = 2, bright = 3, pressed = 4 }
            octave = 5
            "#,
        )
        .unwrap();

        assert_eq!(settings.device, "Push");
        assert_eq!(settings.knob_row, 2);
        assert_eq!(settings.block_frames, 256);
        assert_eq!(settings.tracks.len(), 2);
        assert_eq!(settings.tracks[0].octave, DEFAULT_OCTAVE);
        assert_eq!(settings.tracks[0].scheme, ColorScheme::default());
        assert_eq!(settings.tracks[1].octave, 5);
        assert_eq!(settings.tracks[1].scheme.pressed, 4);
    }

    #[test]
    fn test_overlapping_tracks_are_rejected() {
        let result = Settings::from_toml(
            r#"
            [[tracks]]
            octave = 2

            [[tracks]]
            window = { x = 2, y = 2, width = 2, height = 2 }
            "#,
        );
        assert!(matches!(result, Err(Error::InvalidSettings(_))));
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings {
            knob_row: 4,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        settings.knob_row = 0;
        settings.queue_capacity = 16;
        assert!(settings.validate().is_err());

        settings.queue_capacity = 1024;
        settings.tracks[0].window.width = 9;
        assert!(settings.validate().is_err());

        settings.tracks[0].window.width = 8;
        settings.tracks[0].octave = 11;
        assert!(settings.validate().is_err());
    }
}
