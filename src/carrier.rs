//! Carrier gating.
//!
//! The encoder never starts or stops the 38 kHz carrier. It only decides, once per
//! base unit, whether the carrier is visible on the output path (mark) or forced to a
//! constant off level (space). How that gating is wired is platform specific, so it
//! is expressed as the [`IrOutput`] capability.
//!
//! Two stock implementations cover the usual wirings:
//!
//! - [`GatedCarrier`]: a free-running carrier timer whose output is combined with an
//!   envelope channel forced high or low (timer output-compare "force active/inactive"
//!   modes, or a GPIO driving an AND gate / transistor enable). The envelope is seen
//!   here as an `embedded_hal` [`OutputPin`].
//! - [`PwmCarrier`]: a single PWM channel already running at 38 kHz, gated by
//!   switching its duty cycle between 25 % and fully off.

use crate::consts::CARRIER_DUTY_DIVISOR;
use crate::frame::Level;
use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

/// The narrow hardware contract the encoder relies on.
///
/// Implementations must be cheap and non-blocking: [`mark`](IrOutput::mark) and
/// [`space`](IrOutput::space) are called from interrupt context once per tick.
pub trait IrOutput {
    /// Error raised by the underlying peripheral.
    type Error: Debug;

    /// Prepares the carrier path for transmission.
    ///
    /// Called once during setup. The output must be left gated off afterwards.
    fn enable_carrier(&mut self) -> Result<(), Self::Error>;

    /// Lets the carrier through to the output.
    fn mark(&mut self) -> Result<(), Self::Error>;

    /// Forces the output to its constant off level.
    fn space(&mut self) -> Result<(), Self::Error>;

    /// Applies `level` through [`mark`](IrOutput::mark) or [`space`](IrOutput::space).
    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        match level {
            Level::Mark => self.mark(),
            Level::Space => self.space(),
        }
    }
}

/// A free-running carrier gated by a forced envelope level.
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use nec_tx::carrier::{GatedCarrier, IrOutput};
///
/// # let envelope = Pin::new(&[PinTransaction::set(PinState::High)]);
/// let mut output = GatedCarrier::new(envelope, false);
/// output.mark().unwrap();
/// # output.envelope.done();
/// ```
#[derive(Debug)]
pub struct GatedCarrier<P>
where
    P: OutputPin,
{
    /// Envelope pin. High lets the carrier through unless inverted.
    pub envelope: P,
    inverted: bool,
}

impl<P> GatedCarrier<P>
where
    P: OutputPin,
{
    /// Wraps the envelope pin.
    ///
    /// # Arguments
    /// - `envelope`: The pin or forced timer channel gating the carrier.
    /// - `inverted`: Whether the output stage is active-low (mark = LOW, space = HIGH).
    pub fn new(envelope: P, inverted: bool) -> Self {
        Self { envelope, inverted }
    }

    /// Releases the envelope pin.
    pub fn release(self) -> P {
        self.envelope
    }

    fn write(&mut self, active: bool) -> Result<(), P::Error> {
        if active != self.inverted {
            self.envelope.set_high()
        } else {
            self.envelope.set_low()
        }
    }
}

impl<P> IrOutput for GatedCarrier<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn enable_carrier(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn mark(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }

    fn space(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }
}

/// A 38 kHz PWM channel gated through its duty cycle.
///
/// The channel's frequency must already be set up by the platform.
#[derive(Debug)]
pub struct PwmCarrier<C>
where
    C: SetDutyCycle,
{
    /// PWM channel producing the carrier.
    pub channel: C,
}

impl<C> PwmCarrier<C>
where
    C: SetDutyCycle,
{
    /// Wraps a PWM channel running at the carrier frequency.
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Releases the PWM channel.
    pub fn release(self) -> C {
        self.channel
    }
}

impl<C> IrOutput for PwmCarrier<C>
where
    C: SetDutyCycle,
{
    type Error = C::Error;

    fn enable_carrier(&mut self) -> Result<(), Self::Error> {
        self.channel.set_duty_cycle_fully_off()
    }

    fn mark(&mut self) -> Result<(), Self::Error> {
        self.channel.set_duty_cycle_fraction(1, CARRIER_DUTY_DIVISOR)
    }

    fn space(&mut self) -> Result<(), Self::Error> {
        self.channel.set_duty_cycle_fully_off()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[derive(Debug)]
    struct FakePwm {
        duty: u16,
    }

    impl ErrorType for FakePwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            1264
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn test_gated_carrier_levels() {
        let envelope = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut output = GatedCarrier::new(envelope, false);

        output.enable_carrier().unwrap();
        output.mark().unwrap();
        output.space().unwrap();
        output.set_level(Level::Mark).unwrap();
        output.envelope.done();
    }

    #[test]
    fn test_gated_carrier_inverted() {
        let envelope = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut output = GatedCarrier::new(envelope, true);

        output.enable_carrier().unwrap();
        output.mark().unwrap();
        output.set_level(Level::Space).unwrap();
        let mut envelope = output.release();
        envelope.done();
    }

    #[test]
    fn test_pwm_carrier_quarter_duty() {
        let mut output = PwmCarrier::new(FakePwm { duty: 42 });

        output.enable_carrier().unwrap();
        assert_eq!(output.channel.duty, 0);

        output.mark().unwrap();
        assert_eq!(output.channel.duty, 1264 / 4);

        output.set_level(Level::Space).unwrap();
        assert_eq!(output.release().duty, 0);
    }
}
