//! Plays the Push as a chromatic keyboard.
//!
//! ```text
//! cargo run --example chromatic -- [settings.toml]
//! ```
//!
//! Without a settings file the whole grid is one track, sending to a virtual output port. Use
//! `RUST_LOG=debug` to see what happens to each pad hit.

use std::time::{Duration, Instant};

use pushpad::push::{Button, ButtonLight, Output};
use pushpad::{Device, PushTransport, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Show all interface names.
    let midi = midir::MidiInput::new("pushpad")?;
    for port in midi.ports() {
        println!("{}", midi.port_name(&port)?);
    }

    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref())?;
    log::info!("running with {:?}", settings);

    let mut device = Device::from_settings(&settings)?;
    let mut transport = PushTransport::connect(&settings)?;

    // Greeting, delivered with the first block
    let mut output = Output::new(device.queue_writer(), 0);
    output.screen_display(0, 0, "pushpad")?;
    output.set_button(Button::OCTAVE_UP, ButtonLight::Dim)?;
    output.set_button(Button::OCTAVE_DOWN, ButtonLight::Dim)?;

    let period = Duration::from_secs_f64(settings.block_duration());
    let mut next = Instant::now();
    loop {
        transport.run_block(&mut device)?;

        next += period;
        if let Some(wait) = next.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }
}
