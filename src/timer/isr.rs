use crate::carrier::IrOutput;
use crate::encoder::NecEncoder;
use crate::error::Error;
use crate::request::{NecSender, TxRequest};
use core::cell::RefCell;
use critical_section::Mutex;

/// A global `NecEncoder` slot shared between `main` and the timer interrupt.
pub type GlobalNecEncoder<O> = Mutex<RefCell<Option<NecEncoder<'static, O>>>>;

/// Used to initialize the global static `NecEncoder` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```ignore
/// use nec_tx::carrier::GatedCarrier;
/// use nec_tx::request::TxRequest;
/// use nec_tx::timer::{GlobalNecEncoder, global_nec_encoder_init};
/// use some_hal::PB9;
///
/// static NEC_REQUEST: TxRequest = TxRequest::new();
/// static NEC_ENCODER: GlobalNecEncoder<GatedCarrier<PB9>> =
///     global_nec_encoder_init::<GatedCarrier<PB9>>();
/// ```
pub const fn global_nec_encoder_init<O: IrOutput>() -> GlobalNecEncoder<O> {
    Mutex::new(RefCell::new(None))
}

/// Builds the encoder inside the global slot and returns the matching sender.
///
/// # Arguments
/// * The global static `NecEncoder`
/// * The global static `TxRequest`
/// * The carrier output
///
/// Any encoder already in the slot is replaced. Call this before unmasking the
/// envelope timer interrupt.
///
/// # Example
/// ```ignore
/// fn main() {
///     let sender = global_nec_setup(&NEC_ENCODER, &NEC_REQUEST, GatedCarrier::new(pb9, false))?;
///     sender.send(0xEF00, 0x02);
/// }
/// ```
pub fn global_nec_setup<O: IrOutput>(
    global_encoder: &'static GlobalNecEncoder<O>,
    request: &'static TxRequest,
    output: O,
) -> Result<NecSender<'static>, Error<O::Error>> {
    let encoder = NecEncoder::new(request, output)?;
    critical_section::with(|cs| {
        let _ = global_encoder.borrow(cs).replace(Some(encoder));
    });
    Ok(request.sender())
}

/// Runs the tick at each interrupt
///
/// Does nothing until [`global_nec_setup`] has filled the slot.
///
/// # Arguments
/// * The global static `NecEncoder`
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn TIM16() {
///     let _ = global_nec_timer_tick(&NEC_ENCODER);
///     // clear the timer's update flag
/// }
/// ```
pub fn global_nec_timer_tick<O: IrOutput>(
    global_encoder: &'static GlobalNecEncoder<O>,
) -> Result<(), Error<O::Error>> {
    critical_section::with(|cs| {
        match global_encoder.borrow(cs).borrow_mut().as_mut() {
            Some(encoder) => encoder.tick(),
            None => Ok(()),
        }
    })
}
