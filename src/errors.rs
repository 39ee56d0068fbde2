use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// What a failed grid lookup was searching for
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Lookup {
    /// A hardware pad index (0..64)
    PadIndex(u8),
    /// A pitch-class position inside the current window
    PitchClass(u8),
    /// The pitch-class range of an empty window
    Range,
    /// A track index
    Track(usize),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("connecting to MIDI input port failed")]
    InputConnect(#[from] midir::ConnectError<midir::MidiInput>),

    #[error("connecting to MIDI output port failed")]
    OutputConnect(#[from] midir::ConnectError<midir::MidiOutput>),

    #[error("MIDI context initialization failed")]
    Init(#[from] midir::InitError),

    #[error("MIDI port retrieval failed")]
    PortInfo(#[from] midir::PortInfoError),

    #[error("sending MIDI message failed")]
    Send(#[from] midir::SendError),

    #[error("couldn't find a port for {keyword:?}")]
    NoPortFound {
        // The keyword that was searched for
        keyword: String,
    },

    /// The event queue can't fit another message until the next block drains it
    #[error("event queue full: {requested} bytes requested, {available} available")]
    QueueFull { requested: usize, available: usize },

    #[error("grid lookup failed: {0:?}")]
    NotFound(Lookup),

    #[error("window {width}x{height} at ({x}, {y}) doesn't fit the 8x8 pad grid")]
    InvalidWindow { x: u8, y: u8, width: u8, height: u8 },

    #[error("pad {pad} is already routed to track {track}")]
    WindowOverlap { pad: u8, track: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("message of {len} bytes exceeds the {max} byte limit")]
    MessageTooLong { len: usize, max: usize },

    #[error("text of {len} chars at column {col} overflows the screen line")]
    ScreenOverflow { col: u8, len: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("couldn't load settings")]
    Config(#[from] config::ConfigError),
}
