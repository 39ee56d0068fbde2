//! Relative encoders.

use std::fmt::Write as _;

/// One of the nine encoders above the screen. It holds an absolute 7-bit value that incoming
/// relative messages move around.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Knob {
    index: u8,
    value: u8,
}

impl Knob {
    pub fn new(index: u8) -> Self {
        Self { index, value: 0 }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn set_value(&mut self, value: u8) {
        self.value = value.min(127);
    }

    /// Apply a relative encoder value and return the new absolute value.
    ///
    /// 1..=100 turn up by that much, 101..=127 turn down by `127 - value`, 0 does nothing. The
    /// result is clamped to 0..=127.
    ///
    /// ```rust
    /// # use pushpad::Knob;
    /// let mut knob = Knob::new(0);
    /// knob.set_value(50);
    /// assert_eq!(knob.update(3), 53);
    /// assert_eq!(knob.update(125), 51);
    /// ```
    pub fn update(&mut self, relative: u8) -> u8 {
        let delta = match relative {
            1..=100 => relative as i16,
            101..=127 => -(127 - relative as i16),
            _ => 0,
        };
        self.value = (self.value as i16 + delta).clamp(0, 127) as u8;
        self.value
    }

    /// The value as right-aligned 3 character decimal text
    pub fn label(&self) -> Label {
        let mut label = Label::default();
        // three digits always fit
        let _ = write!(label, "{:>3}", self.value);
        label
    }
}

/// Fixed size text buffer for [`Knob::label`]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Label {
    bytes: [u8; 3],
    len: usize,
}

impl Label {
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }
}

impl std::fmt::Write for Label {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let end = self.len + s.len();
        if end > self.bytes.len() {
            return Err(std::fmt::Error);
        }
        self.bytes[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knob(value: u8) -> Knob {
        let mut knob = Knob::new(0);
        knob.set_value(value);
        knob
    }

    #[test]
    fn test_update_examples() {
        assert_eq!(knob(0).update(5), 5);
        assert_eq!(knob(5).update(127), 5);
        assert_eq!(knob(10).update(120), 3);
        assert_eq!(knob(50).update(3), 53);
        assert_eq!(knob(50).update(125), 48);
        assert_eq!(knob(0).update(127), 0);
        assert_eq!(knob(126).update(5), 127);
        assert_eq!(knob(2).update(101), 0);
        assert_eq!(knob(64).update(0), 64);
    }

    #[test]
    fn test_update_accumulates() {
        let mut knob = knob(0);
        for _ in 0..10 {
            knob.update(20);
        }
        assert_eq!(knob.value(), 127);
        knob.update(107);
        assert_eq!(knob.value(), 107);
    }

    #[test]
    fn test_label_is_right_aligned() {
        assert_eq!(knob(5).label().as_str(), "  5");
        assert_eq!(knob(42).label().as_str(), " 42");
        assert_eq!(knob(127).label().as_str(), "127");
    }
}
