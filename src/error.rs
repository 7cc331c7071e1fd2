//! Error types.

use core::fmt::Debug;
use thiserror::Error;

/// Errors surfaced by the encoder and its setup.
///
/// `E` is the error type of the [`IrOutput`](crate::carrier::IrOutput) in use;
/// for most HAL pins this is [`core::convert::Infallible`]. With `defmt-0-3` it
/// implements `defmt::Format` whenever `E` does.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error<E: Debug> {
    /// Forcing the output path to mark or space failed.
    #[error("failed to gate the IR carrier: {0:?}")]
    Gate(E),
}

/// Errors raised when interpreting a raw 32-bit value as an NEC frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FrameError {
    /// Bits 24-31 are not the bitwise complement of bits 16-23.
    #[error("command {command:#04x} does not match its inverted copy {inverted:#04x}")]
    ComplementMismatch {
        /// Command byte found in bits 16-23.
        command: u8,
        /// Byte found in bits 24-31.
        inverted: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let gate: Error<&str> = Error::Gate("bus fault");
        assert_eq!(gate.to_string(), "failed to gate the IR carrier: \"bus fault\"");

        let mismatch = FrameError::ComplementMismatch {
            command: 0x02,
            inverted: 0xFC,
        };
        assert_eq!(
            mismatch.to_string(),
            "command 0x02 does not match its inverted copy 0xfc"
        );
    }

    #[cfg(feature = "defmt-0-3")]
    #[test]
    fn test_errors_are_defmt_loggable() {
        fn assert_format<T: defmt::Format>() {}

        assert_format::<Error<core::convert::Infallible>>();
        assert_format::<FrameError>();
    }
}
