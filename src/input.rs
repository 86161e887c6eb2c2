//! Operator input primitives: keypad keys, joystick direction
//! classification with rising-edge latching, and the bounded digit-entry
//! buffer shared by the password and threshold screens.
//!
//! Electrical scanning and debounce happen in the drivers; this module
//! only interprets the already-clean samples the ports deliver.

use crate::config::JoystickThresholds;

// ---------------------------------------------------------------------------
// Keypad
// ---------------------------------------------------------------------------

/// A debounced keypad press delivered by the input driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `0`–`9`.
    Digit(u8),
    /// `*` — reset/cancel.
    Star,
    /// `#` — confirm.
    Hash,
    /// `A`–`D` function keys (currently unbound; ignored by every mode).
    Letter(char),
}

// ---------------------------------------------------------------------------
// Joystick
// ---------------------------------------------------------------------------

/// Classified joystick deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoyDirection {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

/// Classify raw axis samples against the four fixed thresholds.
///
/// Evaluation order is UP, DOWN, LEFT, RIGHT — the first threshold crossed
/// wins, so a diagonal deflection resolves to its vertical component.
pub fn classify_axes(x: u16, y: u16, th: &JoystickThresholds) -> JoyDirection {
    if y < th.up {
        JoyDirection::Up
    } else if y > th.down {
        JoyDirection::Down
    } else if x < th.left {
        JoyDirection::Left
    } else if x > th.right {
        JoyDirection::Right
    } else {
        JoyDirection::None
    }
}

/// Rising-edge latch over the classified direction.
///
/// A direction is actionable only when the previous sample was `None` or a
/// different direction; returning to `None` always clears the latch, so a
/// held deflection produces exactly one action until released.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionLatch {
    last: JoyDirection,
}

impl DirectionLatch {
    pub const fn new() -> Self {
        Self {
            last: JoyDirection::None,
        }
    }

    /// Feed one raw sample; returns the direction on its rising edge.
    pub fn edge(&mut self, dir: JoyDirection) -> Option<JoyDirection> {
        if dir == JoyDirection::None {
            self.last = JoyDirection::None;
            return None;
        }
        if dir == self.last {
            return None;
        }
        self.last = dir;
        Some(dir)
    }
}

// ---------------------------------------------------------------------------
// Digit entry
// ---------------------------------------------------------------------------

/// Bounded digit-entry buffer (4 digits for passwords, 2 for thresholds).
///
/// Digits are accepted while below capacity; `*` maps to [`clear`];
/// `#`/confirm commits only when the caller's length rule is satisfied.
#[derive(Debug, Clone, Default)]
pub struct DigitBuffer<const N: usize> {
    digits: heapless::String<N>,
}

impl<const N: usize> DigitBuffer<N> {
    pub const fn new() -> Self {
        Self {
            digits: heapless::String::new(),
        }
    }

    /// Append a digit; ignored (returns `false`) once at capacity.
    pub fn push(&mut self, digit: u8) -> bool {
        debug_assert!(digit <= 9);
        self.digits.push((b'0' + digit) as char).is_ok()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() == N
    }

    pub fn as_str(&self) -> &str {
        self.digits.as_str()
    }

    /// Parse the buffer as a small integer. Empty buffers yield `None`.
    pub fn value(&self) -> Option<u8> {
        if self.digits.is_empty() {
            return None;
        }
        self.digits.parse::<u8>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;

    fn th() -> JoystickThresholds {
        SystemConfig::default().joystick
    }

    #[test]
    fn centre_classifies_as_none() {
        assert_eq!(classify_axes(3100, 3000, &th()), JoyDirection::None);
    }

    #[test]
    fn axis_priority_up_wins_over_right() {
        // Diagonal up-right deflection: UP is evaluated first.
        assert_eq!(classify_axes(4095, 100, &th()), JoyDirection::Up);
    }

    #[test]
    fn four_directions_classify() {
        let t = th();
        assert_eq!(classify_axes(3100, 100, &t), JoyDirection::Up);
        assert_eq!(classify_axes(3100, 4000, &t), JoyDirection::Down);
        assert_eq!(classify_axes(100, 3000, &t), JoyDirection::Left);
        assert_eq!(classify_axes(4095, 3000, &t), JoyDirection::Right);
    }

    #[test]
    fn held_direction_fires_once() {
        let mut latch = DirectionLatch::new();
        assert_eq!(latch.edge(JoyDirection::Up), Some(JoyDirection::Up));
        assert_eq!(latch.edge(JoyDirection::Up), None);
        assert_eq!(latch.edge(JoyDirection::Up), None);
        // Release, press again.
        assert_eq!(latch.edge(JoyDirection::None), None);
        assert_eq!(latch.edge(JoyDirection::Up), Some(JoyDirection::Up));
    }

    #[test]
    fn direction_change_fires_without_release() {
        let mut latch = DirectionLatch::new();
        assert_eq!(latch.edge(JoyDirection::Left), Some(JoyDirection::Left));
        assert_eq!(latch.edge(JoyDirection::Right), Some(JoyDirection::Right));
    }

    #[test]
    fn digit_buffer_respects_capacity() {
        let mut buf: DigitBuffer<4> = DigitBuffer::new();
        for d in 1..=4 {
            assert!(buf.push(d));
        }
        assert!(!buf.push(5), "fifth digit must be ignored");
        assert_eq!(buf.as_str(), "1234");
        assert!(buf.is_full());
    }

    #[test]
    fn digit_buffer_clear_and_value() {
        let mut buf: DigitBuffer<2> = DigitBuffer::new();
        assert_eq!(buf.value(), None);
        buf.push(4);
        buf.push(2);
        assert_eq!(buf.value(), Some(42));
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn leading_zero_parses() {
        let mut buf: DigitBuffer<2> = DigitBuffer::new();
        buf.push(0);
        buf.push(5);
        assert_eq!(buf.value(), Some(5));
    }
}
