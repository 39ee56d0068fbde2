use crate::ok_or_continue;
use crate::{BlockBuffer, Device, Error, Port, RawMessage, Result, Settings};
use log::{info, warn};
use midir::{MidiIO, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use std::sync::mpsc::{channel, Receiver};


fn guess_port<T: MidiIO>(midi_io: &T, keyword: &str) -> Result<T::Port> {
	for port in midi_io.ports() {
		let name = ok_or_continue!(midi_io.port_name(&port));

		if name.contains(keyword) {
			info!("using port '{}' for '{}'", name, keyword);
			return Ok(port);
		}
	}

	return Err(Error::NoPortFound { keyword: keyword.to_string() });
}

fn connect_output(keyword: &str, connection_name: &str) -> Result<MidiOutputConnection> {
	let midi_output = MidiOutput::new(crate::APPLICATION_NAME)?;
	let port = guess_port(&midi_output, keyword)?;
	return Ok(midi_output.connect(&port, connection_name)?);
}

#[cfg(unix)]
fn virtual_output() -> Result<Option<MidiOutputConnection>> {
	use midir::os::unix::VirtualOutput;

	let midi_output = MidiOutput::new(crate::APPLICATION_NAME)?;
	let connection = midi_output.create_virtual(crate::APPLICATION_NAME)?;
	info!("notes go to the virtual port '{}'", crate::APPLICATION_NAME);
	return Ok(Some(connection));
}

#[cfg(not(unix))]
fn virtual_output() -> Result<Option<MidiOutputConnection>> {
	warn!("no instrument port configured, notes are dropped");
	return Ok(None);
}

/// Offset of a message inside the current block, in frames. `start` is the timestamp of the
/// block's first message, both in microseconds. Late messages land on the last frame.
pub fn frame_offset(timestamp: u64, start: u64, sample_rate: u32, block_frames: u32) -> u32 {
	let micros = timestamp.saturating_sub(start);
	let frame = micros * sample_rate as u64 / 1_000_000;
	return frame.min(block_frames.saturating_sub(1) as u64) as u32;
}

/// The midir connections to the Push and the instrument, plus the per-block buffers that carry
/// messages between them and a [`Device`].
///
/// midir has no block callback of its own, so whoever owns the transport calls
/// [`Self::run_block`] once per block period.
pub struct PushTransport {
	#[allow(dead_code)]
	input: MidiInputConnection<()>,
	receiver: Receiver<(u64, RawMessage)>,
	device_out: MidiOutputConnection,
	instrument_out: Option<MidiOutputConnection>,
	block: BlockBuffer,
	incoming: Vec<RawMessage>,
	block_frames: u32,
	sample_rate: u32,
}

impl PushTransport {
	/// Connect to the first ports matching the configured keywords
	pub fn connect(settings: &Settings) -> Result<Self> {
		let midi_input = MidiInput::new(crate::APPLICATION_NAME)?;
		let port = guess_port(&midi_input, &settings.device)?;

		let (sender, receiver) = channel();
		let midir_callback = move |timestamp: u64, data: &[u8], _: &mut ()| {
			match RawMessage::new(0, data) {
				// The receiver only goes away together with the connection
				Ok(msg) => { let _ = sender.send((timestamp, msg)); },
				Err(e) => warn!("dropping incoming message: {}", e),
			}
		};
		let input = midi_input.connect(&port, "pushpad-in", midir_callback, ())?;

		let device_out = connect_output(&settings.device, "pushpad-out")?;
		let instrument_out = match &settings.instrument {
			Some(keyword) => Some(connect_output(keyword, "pushpad-instrument")?),
			None => virtual_output()?,
		};

		return Ok(Self {
			input,
			receiver,
			device_out,
			instrument_out,
			block: BlockBuffer::with_capacity(settings.block_frames as usize),
			incoming: Vec::with_capacity(settings.block_frames as usize),
			block_frames: settings.block_frames,
			sample_rate: settings.sample_rate,
		});
	}

	/// Collect what arrived since the last call, run the device's block callback on it, then
	/// send the output ordered by frame.
	pub fn run_block(&mut self, device: &mut Device) -> Result<()> {
		self.incoming.clear();
		let mut start = None;
		for (timestamp, msg) in self.receiver.try_iter() {
			let start = *start.get_or_insert(timestamp);
			let frame = frame_offset(timestamp, start, self.sample_rate, self.block_frames);
			self.incoming.push(RawMessage::new(frame, msg.bytes())?);
		}

		device.process_block(&self.incoming, &mut self.block);

		for (port, msg) in self.block.take_sorted() {
			match port {
				Port::Device => self.device_out.send(msg.bytes())?,
				Port::Instrument => match &mut self.instrument_out {
					Some(out) => out.send(msg.bytes())?,
					None => {},
				},
			}
		}

		return Ok(());
	}
}
