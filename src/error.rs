//! ## Ful488 Errors
//!
//! The errors used throughout the crate.
//!

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("device not found")]
    DeviceNotFound,
    #[error("GPIB bus error (status {status:#04x})")]
    BusError { status: u8 },
    #[error("invalid GPIB address {0}, must be between 0 and 30")]
    InvalidAddress(u8),
    #[error("talk chunk of {0} bytes, must be between 1 and 3")]
    InvalidChunkLength(usize),
    #[error("bridge returned fewer bytes than requested")]
    ShortRead,
    #[error("serial poll returned no status byte")]
    EmptySerialPoll,
}
