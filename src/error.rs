use std::num::ParseIntError;
use thiserror::Error;

/// Errors produced while decoding a transport stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TsError {
    /// A read needed more bits than the buffer had left.
    #[error("unexpected end of data: {needed} bits requested, {available} available")]
    EndOfData {
        /// Bits the read asked for
        needed: usize,
        /// Bits that were left
        available: usize,
    },

    /// A read on a reader that already failed.
    #[error("bit reader already failed")]
    ReaderFailed,

    /// A bit field did not hold the value its syntax requires.
    #[error("bit field {index} expected {expected:#x}, found {actual:#x}")]
    UnexpectedValue {
        /// Position of the field within its group
        index: usize,
        /// Required value
        expected: u64,
        /// Value found
        actual: u64,
    },

    /// A bit field held a value its syntax forbids.
    #[error("bit field {index} must not be {value:#x}")]
    ForbiddenValue {
        /// Position of the field within its group
        index: usize,
        /// The forbidden value that was found
        value: u64,
    },

    /// The first byte of a packet was not 0x47.
    #[error("invalid sync byte: {0:#04x}")]
    InvalidSyncByte(u8),

    /// The transport_error_indicator of a packet was set.
    #[error("transport error indicator set")]
    TransportError,

    /// A packet buffer was not 188 bytes long.
    #[error("invalid packet size: expected 188 bytes, got {0}")]
    InvalidPacketSize(usize),

    /// Parser error with message
    #[error("parser error: {0}")]
    Parser(String),

    /// Invalid data error with message
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A configuration value was not a valid number.
    #[error("parse int error: {0}")]
    ParseInt(#[from] ParseIntError),
}

/// Result type alias using [`TsError`].
pub type Result<T> = std::result::Result<T, TsError>;
