//! NEC frame encoder.
//!
//! This module provides [`NecEncoder`], the transmission state machine. It is stepped
//! once per NEC base unit (560 µs) from a timer interrupt and gates the carrier through
//! an [`IrOutput`] so that the output path carries:
//!
//! 1. a 16-unit header mark and an 8-unit header space
//! 2. for each of the 32 frame bits, LSB first, a 1-unit mark followed by a 3-unit
//!    (`1`) or 1-unit (`0`) space
//! 3. a 1-unit footer mark and a 1-unit footer space
//!
//! ## Tick contract
//!
//! Each call to [`tick()`](NecEncoder::tick):
//! - picks up a frame deposited by [`NecSender`] (clearing `ready` and `completed`)
//! - does nothing more while no frame is in flight, leaving the output gated off
//! - otherwise applies the current state's level for this tick, then advances through
//!   every state whose hold time has run out, within the same call
//!
//! The last step matters for the data mark that follows bit 31: it holds for zero
//! ticks and must hand over to the footer mark immediately instead of swallowing an
//! extra base unit. The loop runs at most twice per tick and never blocks.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use nec_tx::{carrier::GatedCarrier, encoder, request::TxRequest};
//!
//! let request = TxRequest::new();
//! # let pin = Pin::new(&[PinTransaction::set(PinState::Low), PinTransaction::set(PinState::High)]);
//! let (mut encoder, sender) = encoder::init(&request, GatedCarrier::new(pin, false)).unwrap();
//!
//! sender.send(0xEF00, 0x02);
//! encoder.tick().unwrap(); // Called every 560 µs by a timer interrupt
//! # encoder.output.envelope.done();
//! ```

use crate::carrier::IrOutput;
use crate::consts::{
    DATA_HIGH_SPACE_TICKS, DATA_LOW_SPACE_TICKS, DATA_MARK_TICKS, FOOTER_MARK_TICKS,
    FOOTER_SPACE_TICKS, FRAME_BITS, HEADER_MARK_TICKS, HEADER_SPACE_TICKS,
};
use crate::error::Error;
use crate::frame::{Frame, Level};
use crate::request::{NecSender, TxRequest};

/// Phase of the NEC frame currently being emitted.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxState {
    /// 9 ms leading burst. Also the resting state between frames.
    #[default]
    HeaderMark,
    /// 4.5 ms gap following the leading burst.
    HeaderSpace,
    /// Short burst opening every data bit.
    DataMark,
    /// Long gap encoding a `1`.
    DataHighSpace,
    /// Short gap encoding a `0`.
    DataLowSpace,
    /// Closing burst after bit 31.
    FooterMark,
    /// Closing gap; the frame is complete once it has elapsed.
    FooterSpace,
}

impl TxState {
    /// Number of base-unit ticks the state is held for.
    pub const fn ticks(self) -> u8 {
        match self {
            TxState::HeaderMark => HEADER_MARK_TICKS,
            TxState::HeaderSpace => HEADER_SPACE_TICKS,
            TxState::DataMark => DATA_MARK_TICKS,
            TxState::DataHighSpace => DATA_HIGH_SPACE_TICKS,
            TxState::DataLowSpace => DATA_LOW_SPACE_TICKS,
            TxState::FooterMark => FOOTER_MARK_TICKS,
            TxState::FooterSpace => FOOTER_SPACE_TICKS,
        }
    }

    /// Output level while in this state.
    pub const fn level(self) -> Level {
        match self {
            TxState::HeaderMark | TxState::DataMark | TxState::FooterMark => Level::Mark,
            TxState::HeaderSpace
            | TxState::DataHighSpace
            | TxState::DataLowSpace
            | TxState::FooterSpace => Level::Space,
        }
    }
}

/// Initializes an NEC transmitter on top of `output`.
///
/// Enables the carrier path (left gated off), resets the state machine and returns it
/// together with the sender handle application code uses to queue frames.
///
/// Clock trees, pin multiplexing and the 560 µs interrupt itself are left to the
/// platform; see [`crate::timer`].
pub fn init<O>(
    request: &TxRequest,
    output: O,
) -> Result<(NecEncoder<'_, O>, NecSender<'_>), Error<O::Error>>
where
    O: IrOutput,
{
    let encoder = NecEncoder::new(request, output)?;
    Ok((encoder, request.sender()))
}

/// The NEC transmission state machine.
///
/// Owns the output and all per-frame counters. The only state it shares with
/// application code is the [`TxRequest`] it was built with.
///
/// ## Type Parameters
///
/// - `O`: The [`IrOutput`] gating the carrier
#[derive(Debug)]
pub struct NecEncoder<'a, O>
where
    O: IrOutput,
{
    /// The gated carrier output
    pub output: O,
    request: &'a TxRequest,
    state: TxState,
    remaining: u8,
    index: u8,
    frame: Option<Frame>,

    /// Counter of successfully completed transmissions.
    /// Incremented when the footer space has elapsed and the encoder returns to idle.
    pub frames_sent: u16,
}

impl<'a, O> NecEncoder<'a, O>
where
    O: IrOutput,
{
    /// Creates an encoder bound to `request`.
    ///
    /// # Notes
    /// Calls [`IrOutput::enable_carrier`] once; the output is gated off afterwards.
    /// Any frame left in `request` by an earlier encoder, pending or half sent, is
    /// discarded.
    pub fn new(request: &'a TxRequest, mut output: O) -> Result<Self, Error<O::Error>> {
        output.enable_carrier().map_err(Error::Gate)?;
        request.reset();
        Ok(Self {
            output,
            request,
            state: TxState::HeaderMark,
            remaining: TxState::HeaderMark.ticks(),
            index: 0,
            frame: None,
            frames_sent: 0,
        })
    }

    /// Current phase.
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Ticks left before the current phase is left.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Index of the next frame bit to encode (0..=32).
    pub fn index(&self) -> u8 {
        self.index
    }

    /// The frame in flight, if any.
    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    /// `true` while a frame is pending or in flight.
    pub fn is_busy(&self) -> bool {
        self.frame.is_some() || self.request.is_ready()
    }

    /// A sender handle queuing frames for this encoder.
    pub fn sender(&self) -> NecSender<'a> {
        self.request.sender()
    }

    /// Advances the transmission by one base unit.
    ///
    /// Must be called every 560 µs, typically from a timer interrupt. Performs a
    /// bounded amount of work and never blocks.
    ///
    /// # Errors
    /// [`Error::Gate`] if the output could not be forced. The state machine has still
    /// advanced, so frame timing is kept even if one level change was lost.
    pub fn tick(&mut self) -> Result<(), Error<O::Error>> {
        if let Some(frame) = self.request.take() {
            trace!("NEC frame {:#x} in flight", frame.raw());
            self.frame = Some(frame);
        }
        let Some(frame) = self.frame else {
            return Ok(());
        };

        let gated = self.output.set_level(self.state.level());
        self.remaining = self.remaining.saturating_sub(1);
        while self.remaining == 0 && self.advance(frame) {}
        gated.map_err(Error::Gate)
    }

    /// Leaves the current state. Returns `false` once the frame is complete.
    fn advance(&mut self, frame: Frame) -> bool {
        self.state = match self.state {
            TxState::HeaderMark => TxState::HeaderSpace,
            TxState::HeaderSpace => TxState::DataMark,
            TxState::DataMark if self.index >= FRAME_BITS => TxState::FooterMark,
            TxState::DataMark => {
                let bit = frame.bit(self.index);
                self.index += 1;
                if bit {
                    TxState::DataHighSpace
                } else {
                    TxState::DataLowSpace
                }
            }
            TxState::DataHighSpace | TxState::DataLowSpace => TxState::DataMark,
            TxState::FooterMark => TxState::FooterSpace,
            TxState::FooterSpace => {
                self.complete(frame);
                return false;
            }
        };
        self.remaining = match self.state {
            // No bit left to open: hand over to the footer in the same tick.
            TxState::DataMark if self.index >= FRAME_BITS => 0,
            state => state.ticks(),
        };
        true
    }

    fn complete(&mut self, frame: Frame) {
        self.state = TxState::HeaderMark;
        self.remaining = TxState::HeaderMark.ticks();
        self.index = 0;
        self.frame = None;
        self.frames_sent = self.frames_sent.wrapping_add(1);
        self.request.finish();
        debug!("NEC frame {:#x} sent", frame.raw());
    }
}
