use pushpad::push::{Output, PadMode};
use pushpad::{BlockBuffer, ColorScheme, Device, Port, RawMessage, Settings, TrackSettings, Window};

const LEFT: Window = Window {
    x: 0,
    y: 0,
    width: 4,
    height: 8,
};
const RIGHT: Window = Window {
    x: 4,
    y: 0,
    width: 4,
    height: 8,
};

fn split_device() -> Device {
    let settings = Settings {
        tracks: vec![
            TrackSettings {
                window: LEFT,
                ..TrackSettings::default()
            },
            TrackSettings {
                window: RIGHT,
                scheme: ColorScheme {
                    dark: 0,
                    medium: 45,
                    bright: 41,
                    pressed: 5,
                },
                octave: 4,
            },
        ],
        ..Settings::default()
    };
    let mut device = Device::from_settings(&settings).unwrap();
    // flush the setup messages
    device.process_block(&[], &mut BlockBuffer::new());
    device
}

fn block(device: &mut Device, incoming: &[(u32, [u8; 3])]) -> BlockBuffer {
    let incoming: Vec<RawMessage> = incoming
        .iter()
        .map(|&(frame, bytes)| RawMessage::short(frame, bytes))
        .collect();
    let mut out = BlockBuffer::new();
    device.process_block(&incoming, &mut out);
    out
}

fn instrument(out: &BlockBuffer) -> Vec<Vec<u8>> {
    out.bytes_for(Port::Instrument).map(|b| b.to_vec()).collect()
}

#[test]
fn setup_is_delivered_with_the_first_block() {
    let mut device = Device::from_settings(&Settings::default()).unwrap();
    let mut out = BlockBuffer::new();
    device.process_block(&[RawMessage::short(10, [0x90, 36, 100])], &mut out);

    let sorted = out.take_sorted();
    // 4 screen lines, strip, accent light, 64 pads, then the note and its pad
    assert_eq!(sorted.len(), 4 + 1 + 1 + 64 + 2);
    assert!(sorted[..70].iter().all(|(port, msg)| *port == Port::Device && msg.frame() == 0));
    assert_eq!(sorted[70].0, Port::Instrument);
    assert_eq!(sorted[70].1.frame(), 10);

    // nothing is sent twice
    let mut out = BlockBuffer::new();
    device.process_block(&[], &mut out);
    assert!(out.is_empty());
}

#[test]
fn tracks_own_their_windows() {
    let mut device = split_device();
    let out = block(&mut device, &[(0, [0x90, 36, 100]), (5, [0x90, 40, 90])]);

    // pad 0 is track 0 at octave 3, pad 4 is position 0 of track 1 at octave 4, one channel up
    assert_eq!(instrument(&out), vec![vec![0x90, 36, 100], vec![0x91, 48, 90]]);
    assert_eq!(device.track(0).unwrap().active(), &[36]);
    assert_eq!(device.track(1).unwrap().active(), &[48]);
    assert_eq!(device.track(1).unwrap().grid().by_index(4).unwrap().color, 5);
}

#[test]
fn held_notes_survive_release_until_deleted() {
    let mut device = split_device();
    block(&mut device, &[(0, [0xB0, 57, 127]), (1, [0xB0, 57, 0])]);
    assert!(device.hold());

    let out = block(&mut device, &[(0, [0x90, 37, 100]), (3, [0x80, 37, 0])]);
    assert_eq!(instrument(&out), vec![vec![0x90, 37, 100]]);
    assert_eq!(device.track(0).unwrap().held(), &[37]);
    let pad = *device.track(0).unwrap().grid().by_index(1).unwrap();
    assert_eq!((pad.color, pad.mode), (ColorScheme::default().pressed, PadMode::HOLD));

    let out = block(&mut device, &[(0, [0xB0, 118, 0])]);
    assert_eq!(instrument(&out), vec![vec![0x80, 37, 0]]);
    assert!(device.track(0).unwrap().held().is_empty());
}

#[test]
fn notes_outlive_octave_shifts() {
    let mut device = split_device();
    let out = block(
        &mut device,
        &[
            (0, [0x90, 36, 100]),
            (1, [0xB0, 55, 0]),
            (2, [0x80, 36, 0]),
        ],
    );
    assert_eq!(instrument(&out), vec![vec![0x90, 36, 100], vec![0x80, 36, 0]]);
    assert_eq!(device.track(0).unwrap().octave(), 4);
    assert!(device.track(0).unwrap().ghosts().is_empty());

    // same pad, new octave
    let out = block(&mut device, &[(0, [0x90, 36, 100])]);
    assert_eq!(instrument(&out), vec![vec![0x90, 48, 100]]);
}

#[test]
fn select_moves_buttons_to_the_next_track() {
    let mut device = split_device();
    block(&mut device, &[(0, [0xB0, 48, 0]), (1, [0xB0, 54, 0])]);
    assert_eq!(device.selected_track(), 1);
    assert_eq!(device.track(0).unwrap().octave(), 3);
    assert_eq!(device.track(1).unwrap().octave(), 3);

    // a pinned control ignores the selection
    device.route_control(55, 0).unwrap();
    block(&mut device, &[(0, [0xB0, 55, 0])]);
    assert_eq!(device.track(0).unwrap().octave(), 4);
}

#[test]
fn queued_messages_arrive_on_the_next_block() {
    let mut device = split_device();
    let writer = device.queue_writer();
    std::thread::spawn(move || {
        let mut output = Output::new(writer, 0);
        output.screen_display(2, 0, "hello").unwrap();
    })
    .join()
    .unwrap();

    let out = block(&mut device, &[(7, [0xB0, 71, 1])]);
    let device_bytes: Vec<&[u8]> = out.bytes_for(Port::Device).collect();
    assert_eq!(device_bytes.len(), 2);
    assert_eq!(device_bytes[0][4], 0x1A);
    assert_eq!(out.messages()[0].1.frame(), 0);
    // knob 0 shows its value on row 1, column 0
    assert_eq!(&device_bytes[1][4..8], &[0x19, 0x00, 0x04, 0x00]);
    assert_eq!(out.messages()[1].1.frame(), 7);
}

#[test]
fn unhandled_input_is_dropped_quietly() {
    let mut device = Device::new(1024).unwrap();
    let mut out = BlockBuffer::new();
    device
        .create_track(ColorScheme::default(), LEFT, &mut Output::new(&mut out, 0))
        .unwrap();
    out.clear();

    // pad outside every window, touch sensor, stale release, sysex
    device.process_block(
        &[
            RawMessage::short(0, [0x90, 99, 100]),
            RawMessage::short(0, [0x90, 0, 127]),
            RawMessage::short(0, [0x80, 36, 0]),
            RawMessage::new(0, &[0xF0, 0x47, 0x7F, 0x15, 0xF7]).unwrap(),
        ],
        &mut out,
    );
    assert!(out.is_empty());
}
