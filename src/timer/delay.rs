use crate::carrier::IrOutput;
use crate::consts::BASE_UNIT_US;
use crate::encoder::NecEncoder;
use crate::error::Error;
use embedded_hal::delay::DelayNs;

/// Runs a blocking loop that repeatedly calls `tick()` on the provided NEC encoder.
///
/// This is a simple timing loop for use in environments where interrupts are unavailable
/// or undesired. It drives the encoder's heartbeat using a delay provider implementing
/// `embedded_hal::delay::DelayNs`, one call every 560 µs.
///
/// # Arguments
/// - `encoder`: A mutable reference to a `NecEncoder` instance.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
///
/// # Returns
/// Only if the output fails, with the error it raised.
///
/// # Notes
/// - Frames must be queued from another context (a second core, or an interrupt
///   handler) since this loop never yields.
/// - The time spent in `tick()` adds to every period; prefer a timer interrupt when
///   accuracy matters.
pub fn run_nec_tick_loop<D, O>(encoder: &mut NecEncoder<'_, O>, delay: &mut D) -> Error<O::Error>
where
    D: DelayNs,
    O: IrOutput,
{
    loop {
        if let Err(e) = encoder.tick() {
            return e;
        }
        delay.delay_us(BASE_UNIT_US);
    }
}

/// Ticks the encoder until the pending or in-flight frame has been fully emitted.
///
/// # Returns
/// The number of heartbeats consumed, `0` if nothing was queued.
///
/// # Example
/// ```ignore
/// sender.send(0xEF00, 0x02);
/// let ticks = run_nec_frame(&mut encoder, &mut delay)?;
/// ```
pub fn run_nec_frame<D, O>(
    encoder: &mut NecEncoder<'_, O>,
    delay: &mut D,
) -> Result<u16, Error<O::Error>>
where
    D: DelayNs,
    O: IrOutput,
{
    let mut ticks: u16 = 0;
    while encoder.is_busy() {
        encoder.tick()?;
        ticks += 1;
        delay.delay_us(BASE_UNIT_US);
    }
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::GatedCarrier;
    use crate::frame::{Frame, Level};
    use crate::encoder::TxState;
    use crate::request::TxRequest;
    use embedded_hal_mock::eh1::MockError;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use std::io::ErrorKind;

    /// Accumulates requested delays instead of sleeping.
    #[derive(Debug, Default)]
    struct ClockDelay {
        elapsed_ns: u64,
    }

    impl DelayNs for ClockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns += ns as u64;
        }
    }

    #[test]
    fn test_run_frame_paces_every_tick() {
        let frame = Frame::new(0xEF00, 0x02);
        let mut expected = vec![PinTransaction::set(PinState::Low)];
        for pulse in frame.pulses() {
            for _ in 0..pulse.ticks {
                expected.push(PinTransaction::set(match pulse.level {
                    Level::Mark => PinState::High,
                    Level::Space => PinState::Low,
                }));
            }
        }
        let request = TxRequest::new();
        let output = GatedCarrier::new(PinMock::new(&expected), false);
        let mut encoder = NecEncoder::new(&request, output).unwrap();
        let mut delay = ClockDelay::default();

        assert_eq!(run_nec_frame(&mut encoder, &mut delay), Ok(0));

        encoder.sender().send_frame(frame);
        let ticks = run_nec_frame(&mut encoder, &mut delay).unwrap();

        assert_eq!(ticks, frame.tick_count());
        assert_eq!(delay.elapsed_ns, frame.duration_us() as u64 * 1_000);
        assert!(request.is_idle());
        encoder.output.envelope.done();
    }

    #[test]
    fn test_tick_loop_returns_output_error() {
        let mut expected = vec![
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High).with_error(MockError::Io(ErrorKind::Other)),
        ];
        // The rest of the header mark, then the first header space tick.
        for _ in 1..16 {
            expected.push(PinTransaction::set(PinState::High));
        }
        expected.push(PinTransaction::set(PinState::Low));
        let request = TxRequest::new();
        let pin = PinMock::new(&expected);
        let mut encoder = NecEncoder::new(&request, GatedCarrier::new(pin, false)).unwrap();
        let mut delay = ClockDelay::default();

        encoder.sender().send(0xEF00, 0x02);
        let error = run_nec_tick_loop(&mut encoder, &mut delay);

        assert_eq!(error, Error::Gate(MockError::Io(ErrorKind::Other)));
        assert_eq!(delay.elapsed_ns, 0);
        // The failed tick still counted towards the header mark.
        assert_eq!(encoder.state(), TxState::HeaderMark);
        assert_eq!(encoder.remaining(), 15);

        for _ in 1..16 {
            encoder.tick().unwrap();
        }
        assert_eq!(encoder.state(), TxState::HeaderSpace);
        assert_eq!(encoder.remaining(), 8);

        encoder.tick().unwrap();
        assert_eq!(encoder.remaining(), 7);
        encoder.output.envelope.done();
    }
}
