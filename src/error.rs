//! Errors occurring while framing and decoding log records.

use thiserror::Error;

/// Result type alias for framing and decoding operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors occurring while framing or decoding log records.
///
/// Every failure is returned as a value. Whether the remainder of a stream
/// can still be trusted is a property of the error kind; see
/// [`Error::is_fatal`].
#[derive(Debug, Error)]
pub enum Error {
    /// Calculated and found checksum values do not match.
    #[error(
        "Calculated ({calculated}) and found ({found}) checksum values do not match \
         for a record of size {record_size}."
    )]
    Checksum {
        found: u16,
        calculated: u16,
        record_size: u16,
    },
    /// A length prefix too small to cover itself.
    #[error("Invalid record size ({0}).")]
    RecordSize(u16),
    /// Too few bytes in a frame for the common record header.
    #[error("Insufficient data: {0}.")]
    InsufficientData(usize),
    /// Unknown outer log record type.
    #[error("Unknown log record type: {0}.")]
    UnknownLogRecordType(u8),
    /// Unknown history log record subtype.
    #[error("Unknown history log record type: {0}.")]
    UnknownHistoryRecordType(u32),
    /// A read past the end of a frame.
    #[error("Unexpectedly reached the end of the frame ({needed} bytes needed at offset {offset}, {remaining} remaining).")]
    EndOfFrame {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// A record header without a timestamp.
    #[error("Record header is missing its timestamp.")]
    MissingTimestamp,
}

impl Error {
    /// Whether the error breaks the integrity of the whole stream.
    ///
    /// Fatal errors come from framing. Once a frame fails its checksum, the
    /// position of every later frame is suspect and decoding must stop.
    /// Other errors only concern the record that produced them.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Checksum { .. } | Error::RecordSize(_) => true,
            Error::InsufficientData(_)
            | Error::UnknownLogRecordType(_)
            | Error::UnknownHistoryRecordType(_)
            | Error::EndOfFrame { .. }
            | Error::MissingTimestamp => false,
        }
    }
}
