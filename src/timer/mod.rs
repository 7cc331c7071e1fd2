//! Timer and tick-loop utilities for the NEC encoder.
//!
//! The encoder needs two timer resources from the platform: a carrier channel
//! oscillating at 38 kHz and an envelope heartbeat interrupting every 560 µs. This
//! module computes the reload/compare values for both and, depending on features,
//! drives [`NecEncoder::tick`](crate::encoder::NecEncoder::tick) in one of two ways:
//! an interrupt service routine using `critical_section::with` (`timer-isr` feature),
//! or a busy-loop delay timer (`delay-loop` feature).
//!
//! Contains:
//! - `carrier_reload` / `const_carrier_reload`: counts per carrier period
//! - `envelope_reload` / `const_envelope_reload`: counts per base unit
//! - `carrier_compare`: compare value for a 25 % duty cycle
//! - `run_nec_tick_loop` and `run_nec_frame`: blocking drivers for DelayNs (feature `delay-loop`)
//! - `global_nec_timer_tick` and `tick_nec_timer!()`: interrupt-based tick callback wrapper
//!   (feature `timer-isr`)
//!
//! Reference values:
//!
//! | Timer clock | Prescaler | Carrier reload | Compare | Envelope reload |
//! |-------------|-----------|----------------|---------|-----------------|
//! |      48 MHz |         1 |           1263 |     315 |           26880 |
//! |       8 MHz |         1 |            211 |      52 |            4480 |
//! |      16 MHz |         8 |             53 |      13 |            1120 |

use crate::consts::{BASE_UNIT_US, CARRIER_DUTY_DIVISOR, CARRIER_FREQUENCY_HZ};
use libm::round;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// 1,000,000 microseconds = 1 second
pub const MICROSECONDS_PER_SECOND: u32 = 1_000_000;

/// Computes the number of timer counts per carrier period.
///
/// # Arguments
/// - `f_timer`: Timer input clock in Hz
/// - `prescaler`: Timer prescaler (1 for none)
///
/// # Returns
/// - Counts per 38 kHz period, rounded to nearest (load `reload - 1` into
///   auto-reload registers counting from zero)
pub fn carrier_reload(f_timer: u32, prescaler: u32) -> u16 {
    let counts_per_second = f_timer as f64 / prescaler as f64;
    round(counts_per_second / CARRIER_FREQUENCY_HZ as f64) as u16
}

/// Compile-time carrier reload calculator
///
/// Same as [`carrier_reload`], rounding with integer arithmetic.
pub const fn const_carrier_reload(f_timer: u32, prescaler: u32) -> u16 {
    let counts_per_second = f_timer / prescaler;
    ((counts_per_second + CARRIER_FREQUENCY_HZ / 2) / CARRIER_FREQUENCY_HZ) as u16
}

/// Computes the number of timer counts per NEC base unit (560 µs).
///
/// # Arguments
/// - `f_timer`: Timer input clock in Hz
/// - `prescaler`: Timer prescaler (1 for none)
pub fn envelope_reload(f_timer: u32, prescaler: u32) -> u32 {
    let counts_per_second = f_timer as f64 / prescaler as f64;
    round(counts_per_second * BASE_UNIT_US as f64 / MICROSECONDS_PER_SECOND as f64) as u32
}

/// Compile-time envelope reload calculator
///
/// Same as [`envelope_reload`], rounding with integer arithmetic.
pub const fn const_envelope_reload(f_timer: u32, prescaler: u32) -> u32 {
    let counts = (f_timer / prescaler) as u64 * BASE_UNIT_US as u64;
    ((counts + MICROSECONDS_PER_SECOND as u64 / 2) / MICROSECONDS_PER_SECOND as u64) as u32
}

/// Compare value giving the carrier its 25 % duty cycle.
pub const fn carrier_compare(carrier_reload: u16) -> u16 {
    carrier_reload / CARRIER_DUTY_DIVISOR
}

/// Timer values for both NEC timer resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TimerSettings {
    /// Counts per carrier period.
    pub carrier_reload: u16,
    /// Carrier compare value (25 % duty).
    pub carrier_compare: u16,
    /// Counts per base unit on the envelope timer.
    pub envelope_reload: u32,
}

impl TimerSettings {
    /// Computes the settings for a timer clock and prescaler shared by both timers.
    pub const fn new(f_timer: u32, prescaler: u32) -> Self {
        let carrier_reload = const_carrier_reload(f_timer, prescaler);
        Self {
            carrier_reload,
            carrier_compare: carrier_compare(carrier_reload),
            envelope_reload: const_envelope_reload(f_timer, prescaler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_values_at_48mhz() {
        assert_eq!(carrier_reload(48_000_000, 1), 1263);
        assert_eq!(const_carrier_reload(48_000_000, 1), 1263);
        assert_eq!(envelope_reload(48_000_000, 1), 26_880);
        assert_eq!(const_envelope_reload(48_000_000, 1), 26_880);
        assert_eq!(carrier_compare(1263), 315);
    }

    #[test]
    fn test_runtime_and_const_agree() {
        for (f_timer, prescaler) in [(8_000_000, 1), (16_000_000, 8), (72_000_000, 2), (1_000_000, 1)] {
            assert_eq!(
                carrier_reload(f_timer, prescaler),
                const_carrier_reload(f_timer, prescaler)
            );
            assert_eq!(
                envelope_reload(f_timer, prescaler),
                const_envelope_reload(f_timer, prescaler)
            );
        }
    }

    #[test]
    fn test_timer_settings() {
        const SETTINGS: TimerSettings = TimerSettings::new(48_000_000, 1);
        assert_eq!(
            SETTINGS,
            TimerSettings {
                carrier_reload: 1263,
                carrier_compare: 315,
                envelope_reload: 26_880,
            }
        );
        assert_eq!(TimerSettings::new(8_000_000, 1).carrier_reload, 211);
        assert_eq!(TimerSettings::new(16_000_000, 8).envelope_reload, 1120);
    }
}
