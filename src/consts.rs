//! Constants used across the NEC protocol implementation.
//!
//! All protocol timing is expressed in multiples of the NEC base unit
//! ([`BASE_UNIT_US`]), which is also the period of the envelope heartbeat
//! driving [`NecEncoder::tick`](crate::encoder::NecEncoder::tick).
//!
//! ## Phase Timing Table
//!
//! | Phase           | Level | Ticks |
//! |-----------------|-------|-------|
//! | header mark     | mark  |    16 |
//! | header space    | space |     8 |
//! | data mark       | mark  |     1 |
//! | data high space | space |     3 |
//! | data low space  | space |     1 |
//! | footer mark     | mark  |     1 |
//! | footer space    | space |     1 |

/// The NEC base unit, in microseconds. One envelope heartbeat.
pub const BASE_UNIT_US: u32 = 560;

/// Frequency of the IR carrier, in hertz.
pub const CARRIER_FREQUENCY_HZ: u32 = 38_000;

/// Divisor applied to the carrier period to obtain its compare value.
///
/// A divisor of 4 gives the 25 % duty cycle IR LEDs are usually driven at.
pub const CARRIER_DUTY_DIVISOR: u16 = 4;

/// Number of data bits in an NEC frame.
pub const FRAME_BITS: u8 = 32;

/// Ticks spent in the header mark (9 ms).
pub const HEADER_MARK_TICKS: u8 = 16;

/// Ticks spent in the header space (4.5 ms).
pub const HEADER_SPACE_TICKS: u8 = 8;

/// Ticks spent in the mark that opens every data bit.
pub const DATA_MARK_TICKS: u8 = 1;

/// Ticks of space following the mark of a `1` bit.
pub const DATA_HIGH_SPACE_TICKS: u8 = 3;

/// Ticks of space following the mark of a `0` bit.
pub const DATA_LOW_SPACE_TICKS: u8 = 1;

/// Ticks spent in the closing mark.
pub const FOOTER_MARK_TICKS: u8 = 1;

/// Ticks spent in the closing space.
pub const FOOTER_SPACE_TICKS: u8 = 1;

/// Ticks consumed by a frame whose 32 bits are all `0`.
///
/// Every set bit adds `DATA_HIGH_SPACE_TICKS - DATA_LOW_SPACE_TICKS` on top.
pub const FRAME_BASE_TICKS: u16 = HEADER_MARK_TICKS as u16
    + HEADER_SPACE_TICKS as u16
    + FRAME_BITS as u16 * (DATA_MARK_TICKS as u16 + DATA_LOW_SPACE_TICKS as u16)
    + FOOTER_MARK_TICKS as u16
    + FOOTER_SPACE_TICKS as u16;

/// Ticks consumed by the longest possible frame (all bits set).
pub const FRAME_MAX_TICKS: u16 =
    FRAME_BASE_TICKS + FRAME_BITS as u16 * (DATA_HIGH_SPACE_TICKS - DATA_LOW_SPACE_TICKS) as u16;

/// Number of mark/space pulses in one frame: header, one pair per bit, footer.
pub const PULSE_COUNT: usize = 2 + 2 * FRAME_BITS as usize + 2;
