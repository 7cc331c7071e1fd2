/// Declares the static `NEC_REQUEST` and `NEC_ENCODER` globals protected by
/// `critical_section`.
///
/// This macro creates the singletons an interrupt-driven transmitter needs: the
/// request slot application code deposits frames into, and the encoder the timer
/// ISR steps.
///
/// # Arguments
/// - `$out`: The concrete type of the carrier output (must implement `IrOutput`)
///
/// # Example
/// ```ignore
/// init_nec_transmitter!(GatedCarrier<MyEnvelopePin>);
/// ```
#[macro_export]
macro_rules! init_nec_transmitter {
    ( $out:ty ) => {
        pub static NEC_REQUEST: $crate::request::TxRequest = $crate::request::TxRequest::new();
        pub static NEC_ENCODER: $crate::timer::GlobalNecEncoder<$out> =
            $crate::timer::global_nec_encoder_init::<$out>();
    };
}

/// Initializes the global `NEC_ENCODER` with the given carrier output.
///
/// Evaluates to `Result<NecSender<'static>, Error<_>>`.
///
/// # Arguments
/// - `$out`: The carrier output (must implement `IrOutput`)
///
/// # Example
/// ```ignore
/// main() {
///     let sender = setup_nec_transmitter!(GatedCarrier::new(pb9, false)).unwrap();
/// }
/// ```
///
/// # Notes
/// - Requires `init_nec_transmitter!` to have been used earlier.
#[macro_export]
macro_rules! setup_nec_transmitter {
    ( $out:expr ) => {
        $crate::timer::global_nec_setup(&NEC_ENCODER, &NEC_REQUEST, $out)
    };
}

/// Calls `tick()` on the global `NEC_ENCODER` if it has been initialized.
///
/// Intended to be invoked from the 560 µs envelope timer ISR. Evaluates to
/// `Result<(), Error<_>>`.
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn TIM16() {
///     let _ = tick_nec_timer!();
/// }
/// ```
///
/// # Notes
/// - Safe to call repeatedly. Does nothing until the encoder has been set up.
#[macro_export]
macro_rules! tick_nec_timer {
    () => {
        $crate::timer::global_nec_timer_tick(&NEC_ENCODER)
    };
}

/// Queues an NEC `address`/`command` pair on the global `NEC_REQUEST`, waiting for the
/// previous frame to finish first.
///
/// # Example
/// ```ignore
/// nec_send!(0xEF00, 0x02);
/// ```
#[macro_export]
macro_rules! nec_send {
    ( $address:expr, $command:expr ) => {
        NEC_REQUEST.sender().send($address, $command)
    };
}

#[cfg(test)]
mod tests {
    use crate::carrier::GatedCarrier;
    use crate::frame::{Frame, Level};
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    type Output = GatedCarrier<PinMock>;

    init_nec_transmitter!(Output);

    #[test]
    fn test_macros_drive_global_encoder() {
        let frame = Frame::new(0x00FF, 0x01);
        let mut expected = vec![PinTransaction::set(PinState::Low)];
        for pulse in frame.pulses() {
            for _ in 0..pulse.ticks {
                expected.push(PinTransaction::set(match pulse.level {
                    Level::Mark => PinState::High,
                    Level::Space => PinState::Low,
                }));
            }
        }
        let pin = PinMock::new(&expected);

        let _sender = setup_nec_transmitter!(GatedCarrier::new(pin, false)).unwrap();
        nec_send!(frame.address(), frame.command());
        for _ in 0..frame.tick_count() {
            tick_nec_timer!().unwrap();
        }
        // Idle heartbeat.
        tick_nec_timer!().unwrap();

        assert!(NEC_REQUEST.is_idle());
        critical_section::with(|cs| {
            let mut encoder = NEC_ENCODER.borrow(cs).borrow_mut();
            let encoder = encoder.as_mut().unwrap();
            assert_eq!(encoder.frames_sent, 1);
            encoder.output.envelope.done();
        });
    }
}
