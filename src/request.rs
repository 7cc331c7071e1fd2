//! Single-slot transmission request and the send gateway.
//!
//! [`TxRequest`] is the only state shared between application code and the
//! interrupt context. It holds the pending frame and two flags:
//!
//! - `ready`: a frame has been deposited and not yet picked up by the interrupt
//! - `completed`: no frame is in flight
//!
//! Every access happens inside a [`critical_section`], so a read-modify-write from
//! the caller can never interleave with the interrupt.
//!
//! [`NecSender`] is the gateway application code goes through. It only deposits a
//! frame while the slot is idle (`completed && !ready`). A second `send` issued right
//! after the first, before the interrupt has had a chance to pick the frame up, waits
//! instead of overwriting it.

use crate::frame::Frame;
use core::cell::Cell;
use core::convert::Infallible;
use core::fmt;
use critical_section::Mutex;
use nb::block;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    frame: Option<Frame>,
    ready: bool,
    completed: bool,
}

impl Slot {
    const IDLE: Self = Self {
        frame: None,
        ready: false,
        completed: true,
    };
}

/// The interrupt-safe pending-frame register.
///
/// Usually declared as a `static` so that both the interrupt handler and the
/// application can reach it:
///
/// ```rust
/// use nec_tx::request::TxRequest;
///
/// static REQUEST: TxRequest = TxRequest::new();
/// assert!(REQUEST.is_idle());
/// ```
pub struct TxRequest {
    slot: Mutex<Cell<Slot>>,
}

impl TxRequest {
    /// Creates an idle request slot.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot::IDLE)),
        }
    }

    /// Returns a gateway handle depositing frames into this slot.
    pub fn sender(&self) -> NecSender<'_> {
        NecSender { request: self }
    }

    fn load(&self) -> Slot {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }

    /// `true` when no frame is in flight.
    pub fn is_completed(&self) -> bool {
        self.load().completed
    }

    /// `true` when a frame was deposited but not yet picked up by the interrupt.
    pub fn is_ready(&self) -> bool {
        self.load().ready
    }

    /// `true` when nothing is pending nor in flight.
    pub fn is_idle(&self) -> bool {
        let slot = self.load();
        slot.completed && !slot.ready
    }

    /// Deposits `frame` if the slot is idle.
    pub(crate) fn try_deposit(&self, frame: Frame) -> nb::Result<(), Infallible> {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let slot = cell.get();
            if !slot.completed || slot.ready {
                return Err(nb::Error::WouldBlock);
            }
            cell.set(Slot {
                frame: Some(frame),
                ready: true,
                completed: slot.completed,
            });
            Ok(())
        })
    }

    /// Consumes the `ready` flag, marking the deposited frame as in flight.
    pub(crate) fn take(&self) -> Option<Frame> {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let slot = cell.get();
            if !slot.ready {
                return None;
            }
            cell.set(Slot {
                frame: slot.frame,
                ready: false,
                completed: false,
            });
            slot.frame
        })
    }

    /// Drops any pending or in-flight frame and returns the slot to idle.
    pub(crate) fn reset(&self) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Slot::IDLE));
    }

    /// Marks the in-flight frame as fully emitted and clears it.
    pub(crate) fn finish(&self) {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let slot = cell.get();
            cell.set(Slot {
                frame: None,
                ready: slot.ready,
                completed: true,
            });
        });
    }
}

impl Default for TxRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TxRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.load();
        f.debug_struct("TxRequest")
            .field("frame", &slot.frame)
            .field("ready", &slot.ready)
            .field("completed", &slot.completed)
            .finish()
    }
}

/// Handle used by application code to queue NEC frames.
///
/// Cheap to copy; every copy talks to the same [`TxRequest`].
#[derive(Clone, Copy, Debug)]
pub struct NecSender<'a> {
    request: &'a TxRequest,
}

impl<'a> NecSender<'a> {
    /// Tries to queue `address`/`command` without waiting.
    ///
    /// # Returns
    /// - `Ok(())`: the frame was accepted and will be emitted from the next tick on
    /// - `Err(nb::Error::WouldBlock)`: a previous frame is still pending or in flight
    pub fn try_send(&self, address: u16, command: u8) -> nb::Result<(), Infallible> {
        self.try_send_frame(Frame::new(address, command))
    }

    /// Like [`try_send`](NecSender::try_send) for an already assembled frame.
    pub fn try_send_frame(&self, frame: Frame) -> nb::Result<(), Infallible> {
        self.request.try_deposit(frame)?;
        trace!("NEC frame {:#x} queued", frame.raw());
        Ok(())
    }

    /// Queues `address`/`command`, spinning until the previous frame has been fully
    /// emitted.
    ///
    /// Returns once the frame has been accepted, not once it has been sent. The wait
    /// is bounded by one frame (at most 154 ticks, about 86 ms) as long as the
    /// heartbeat is running; there is no timeout.
    pub fn send(&self, address: u16, command: u8) {
        self.send_frame(Frame::new(address, command));
    }

    /// Like [`send`](NecSender::send) for an already assembled frame.
    pub fn send_frame(&self, frame: Frame) {
        match block!(self.try_send_frame(frame)) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Like [`send`](NecSender::send), calling `idle` between polls so the caller can
    /// yield, sleep until the next interrupt (`wfi`) or feed a watchdog.
    pub fn send_yielding<F>(&self, address: u16, command: u8, idle: F)
    where
        F: FnMut(),
    {
        self.send_frame_yielding(Frame::new(address, command), idle);
    }

    /// Like [`send_yielding`](NecSender::send_yielding) for an already assembled frame.
    pub fn send_frame_yielding<F>(&self, frame: Frame, mut idle: F)
    where
        F: FnMut(),
    {
        while self.try_send_frame(frame).is_err() {
            idle();
        }
    }

    /// Resolves once the last queued frame has been fully emitted.
    pub fn flush(&self) -> nb::Result<(), Infallible> {
        if self.request.is_idle() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// The request slot this handle deposits into.
    pub fn request(&self) -> &'a TxRequest {
        self.request
    }
}
