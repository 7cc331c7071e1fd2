//! NEC frame assembly.
//!
//! An NEC frame is a 32-bit word built from three fields:
//!
//! | Bits  | Field            |
//! |-------|------------------|
//! | 0-15  | address          |
//! | 16-23 | command          |
//! | 24-31 | `!command`       |
//!
//! The word is transmitted least-significant bit first. The inverted command lets the
//! receiver detect corrupted frames.
//!
//! Besides the bit accessors used by the [`encoder`](crate::encoder), a frame can be
//! expanded into its run-length [`Pulse`] train, which is handy for peripherals that
//! take pulse durations directly (RMT, PIO) and for checking a tick-level trace.

use crate::consts::{
    BASE_UNIT_US, DATA_HIGH_SPACE_TICKS, DATA_LOW_SPACE_TICKS, DATA_MARK_TICKS, FOOTER_MARK_TICKS,
    FOOTER_SPACE_TICKS, FRAME_BASE_TICKS, FRAME_BITS, HEADER_MARK_TICKS, HEADER_SPACE_TICKS,
    PULSE_COUNT,
};
use crate::error::FrameError;
use heapless::Vec;

/// Output level of the IR path during one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Level {
    /// Carrier oscillating (optically "on").
    Mark,
    /// Carrier suppressed (optically "off").
    Space,
}

/// A run of a single [`Level`], measured in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Pulse {
    /// Level held during the pulse.
    pub level: Level,
    /// Duration in base units (560 µs each).
    pub ticks: u8,
}

impl Pulse {
    const fn mark(ticks: u8) -> Self {
        Self {
            level: Level::Mark,
            ticks,
        }
    }

    const fn space(ticks: u8) -> Self {
        Self {
            level: Level::Space,
            ticks,
        }
    }
}

/// An immutable 32-bit NEC frame.
///
/// # Example
/// ```rust
/// use nec_tx::frame::Frame;
///
/// let frame = Frame::new(0xEF00, 0x02);
/// assert_eq!(frame.raw(), 0xFD02_EF00);
/// assert_eq!(frame.command(), 0x02);
/// assert_eq!(frame.inverted_command(), 0xFD);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Frame(u32);

impl Frame {
    /// Assembles a frame from an address and a command.
    ///
    /// No validation is done: the bit layout is the only constraint.
    pub const fn new(address: u16, command: u8) -> Self {
        Self(address as u32 | (command as u32) << 16 | ((!command) as u32) << 24)
    }

    /// Wraps an already assembled 32-bit word without checking it.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The frame as transmitted.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Bits 0-15.
    pub const fn address(self) -> u16 {
        self.0 as u16
    }

    /// Bits 16-23.
    pub const fn command(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Bits 24-31.
    pub const fn inverted_command(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Value of bit `index`, counting from the first bit on the air.
    ///
    /// Indices of 32 and above read as `false`.
    pub const fn bit(self, index: u8) -> bool {
        index < FRAME_BITS && (self.0 >> index) & 1 == 1
    }

    /// Number of `1` bits in the frame.
    pub const fn ones(self) -> u32 {
        self.0.count_ones()
    }

    /// Number of base-unit ticks needed to emit the whole frame.
    ///
    /// `16 + 8 + 32 + Σ(space ticks per bit) + 1 + 1`, which is
    /// `90 + 2 × ones()`.
    pub const fn tick_count(self) -> u16 {
        FRAME_BASE_TICKS + (DATA_HIGH_SPACE_TICKS - DATA_LOW_SPACE_TICKS) as u16 * self.ones() as u16
    }

    /// Time on the air, in microseconds.
    pub const fn duration_us(self) -> u32 {
        self.tick_count() as u32 * BASE_UNIT_US
    }

    /// Expands the frame into alternating mark and space pulses.
    pub fn pulses(self) -> Vec<Pulse, PULSE_COUNT> {
        let mut pulses = Vec::new();
        let _ = pulses.push(Pulse::mark(HEADER_MARK_TICKS));
        let _ = pulses.push(Pulse::space(HEADER_SPACE_TICKS));
        for index in 0..FRAME_BITS {
            let _ = pulses.push(Pulse::mark(DATA_MARK_TICKS));
            let _ = pulses.push(Pulse::space(if self.bit(index) {
                DATA_HIGH_SPACE_TICKS
            } else {
                DATA_LOW_SPACE_TICKS
            }));
        }
        let _ = pulses.push(Pulse::mark(FOOTER_MARK_TICKS));
        let _ = pulses.push(Pulse::space(FOOTER_SPACE_TICKS));
        pulses
    }
}

impl From<Frame> for u32 {
    fn from(frame: Frame) -> u32 {
        frame.raw()
    }
}

impl TryFrom<u32> for Frame {
    type Error = FrameError;

    /// Accepts `raw` only if its inverted-command byte matches the command byte.
    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        let frame = Self::from_raw(raw);
        if frame.command() != !frame.inverted_command() {
            return Err(FrameError::ComplementMismatch {
                command: frame.command(),
                inverted: frame.inverted_command(),
            });
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MAX_TICKS;

    #[test]
    fn test_frame_layout() {
        let frame = Frame::new(0xEF00, 0x02);
        assert_eq!(frame.raw(), 0xFD02_EF00);
        assert_eq!(frame.address(), 0xEF00);
        assert_eq!(frame.command(), 0x02);
        assert_eq!(frame.inverted_command(), 0xFD);
    }

    #[test]
    fn test_command_bits_hold_complement() {
        for command in 0..=u8::MAX {
            for address in [0x0000, 0x00FF, 0xEF00, 0x1234, 0xFFFF] {
                let frame = Frame::new(address, command);
                assert_eq!(((frame.raw() >> 16) & 0xFF) as u8, command);
                assert_eq!(((frame.raw() >> 24) & 0xFF) as u8, !command);
                assert_eq!(frame.address(), address);
            }
        }
    }

    #[test]
    fn test_bits_are_read_lsb_first() {
        let frame = Frame::from_raw(0b1011);
        assert!(frame.bit(0));
        assert!(frame.bit(1));
        assert!(!frame.bit(2));
        assert!(frame.bit(3));
        assert!(!frame.bit(31));
        assert!(!Frame::from_raw(u32::MAX).bit(32));
        assert!(Frame::from_raw(0x8000_0000).bit(31));
    }

    #[test]
    fn test_tick_count() {
        assert_eq!(Frame::from_raw(0).tick_count(), 90);
        assert_eq!(Frame::from_raw(u32::MAX).tick_count(), FRAME_MAX_TICKS);
        assert_eq!(FRAME_MAX_TICKS, 154);
        // 0xFD02EF00 has 15 bits set.
        let frame = Frame::new(0xEF00, 0x02);
        assert_eq!(frame.ones(), 15);
        assert_eq!(frame.tick_count(), 120);
        assert_eq!(frame.duration_us(), 120 * 560);
    }

    #[test]
    fn test_try_from_checks_complement() {
        assert_eq!(Frame::try_from(0xFD02_EF00), Ok(Frame::new(0xEF00, 0x02)));
        assert_eq!(
            Frame::try_from(0xFC02_EF00),
            Err(FrameError::ComplementMismatch {
                command: 0x02,
                inverted: 0xFC,
            })
        );
        assert_eq!(u32::from(Frame::new(0x0001, 0xFF)), 0x00FF_0001);
    }

    #[test]
    fn test_pulses_match_frame() {
        let frame = Frame::new(0xEF00, 0x02);
        let pulses = frame.pulses();
        assert_eq!(pulses.len(), PULSE_COUNT);
        assert_eq!(pulses[0], Pulse::mark(16));
        assert_eq!(pulses[1], Pulse::space(8));
        // Address 0xEF00: bits 0-7 are zero, bit 8 is one.
        assert_eq!(pulses[3], Pulse::space(1));
        assert_eq!(pulses[2 + 2 * 8 + 1], Pulse::space(3));
        assert_eq!(pulses[PULSE_COUNT - 2], Pulse::mark(1));
        assert_eq!(pulses[PULSE_COUNT - 1], Pulse::space(1));

        let total: u16 = pulses.iter().map(|p| p.ticks as u16).sum();
        assert_eq!(total, frame.tick_count());
    }
}
