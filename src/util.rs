#[macro_export]
macro_rules! ok_or_continue {
	( $e:expr ) => (
		match $e {
			Ok(value) => value,
			Err(_e) => {
				continue;
			},
		}
	)
}

/// Shorthand for the `n0 + octave * 12` pitch arithmetic. Returns `None` if the result isn't a
/// valid MIDI pitch.
pub fn pitch(n0: u8, octave: u8) -> Option<u8> {
	let pitch = n0 as u16 + octave as u16 * 12;
	if pitch <= 127 {
		Some(pitch as u8)
	} else {
		None
	}
}

/// Inverse of [`pitch`]: the pitch-class position a pitch has under the given octave. May be
/// negative or past the window, the caller has to bounds-check.
pub fn position(pitch: u8, octave: u8) -> i16 {
	pitch as i16 - octave as i16 * 12
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pitch_bounds() {
		assert_eq!(pitch(0, 3), Some(36));
		assert_eq!(pitch(7, 10), Some(127));
		assert_eq!(pitch(8, 10), None);
	}

	#[test]
	fn test_position_can_go_negative() {
		assert_eq!(position(36, 3), 0);
		assert_eq!(position(36, 4), -12);
		assert_eq!(position(50, 3), 14);
	}
}
