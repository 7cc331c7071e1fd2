//! # nec-tx
//!
//! A portable, no_std Rust transmitter for the NEC infrared remote-control protocol,
//! for driving an IR LED from a microcontroller towards NEC-compatible receivers
//! (RGB LED strip controllers, TVs, ...).
//!
//! The transmitter is split the way the hardware is:
//! - a **carrier** oscillating at 38 kHz, configured once by the platform and never
//!   touched again
//! - an **envelope** heartbeat interrupting every 560 µs (one NEC base unit)
//! - a software state machine, [`NecEncoder`](encoder::NecEncoder), stepped once per
//!   heartbeat, that gates the carrier on (mark) or off (space)
//! - a send gateway, [`NecSender`](request::NecSender), that hands 32-bit frames to the
//!   interrupt context through an interrupt-safe single-slot request
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` for the 560 µs heartbeat |
//! | `timer-isr` (default) | Global `critical_section` statics and macros for a timer interrupt |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Frame format
//!
//! ```text
//!  header mark  header space  bit 0       bit 1          ...  bit 31      footer
//! |<-- 16u -->|<---- 8u ---->|1u|1u or 3u|1u|1u or 3u|   ...  |1u|1u or 3u|1u|1u
//!  ‾‾‾‾‾‾‾‾‾‾‾               ‾‾          ‾‾                    ‾‾          ‾‾
//! ```
//!
//! Bits are sent LSB first: the 16-bit address, the 8-bit command, then the bitwise
//! complement of the command. A `1` is a short mark followed by three units of space,
//! a `0` a short mark followed by one unit of space.
//!
//! ## Usage
//!
//! ```ignore
//! use nec_tx::{carrier::GatedCarrier, encoder, request::TxRequest};
//!
//! static REQUEST: TxRequest = TxRequest::new();
//!
//! let (mut encoder, sender) = encoder::init(&REQUEST, GatedCarrier::new(envelope_pin, false))?;
//!
//! // From the 560 µs timer interrupt:
//! encoder.tick()?;
//!
//! // From application code:
//! sender.send(0xEF00, 0x02);
//! ```
//!
//! Or, with the `timer-isr` helpers:
//!
//! ```ignore
//! nec_tx::init_nec_transmitter!(GatedCarrier<EnvelopePin>);
//!
//! #[interrupt]
//! fn TIM16() {
//!     let _ = nec_tx::tick_nec_timer!();
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - Clock trees and pin multiplexing are the platform's job; this crate only gates
//!   the output path and counts heartbeats.
//! - If the heartbeat never fires, [`send`](request::NecSender::send) spins forever.
//!   Surface that with a watchdog.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub use critical_section;
pub use heapless;

#[macro_use]
mod fmt;

pub mod carrier;
pub mod consts;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod request;
pub mod timer;

pub use carrier::{GatedCarrier, IrOutput, PwmCarrier};
pub use encoder::{NecEncoder, TxState, init};
pub use error::{Error, FrameError};
pub use frame::{Frame, Level, Pulse};
pub use request::{NecSender, TxRequest};
