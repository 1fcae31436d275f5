//! Slicing checksum-verified frames off the front of a byte stream.
//!
//! A frame is laid out as a big-endian length prefix, the record payload, and
//! a big-endian checksum. The length prefix counts itself and the payload, so
//! a frame occupies `record_size + 2` bytes in total.

use either::Either::{self, Left, Right};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

use super::check::compute_checksum;

/// Smallest number of bytes worth inspecting for a frame.
const MIN_FRAME: usize = 4;

/// The payload of a single frame, after its checksum has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame<'a>(&'a [u8]);

impl<'a> RawFrame<'a> {
    /// Wrap bytes already known to form a record payload.
    pub fn new(payload: &'a [u8]) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &'a [u8] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read one frame from the front of a buffer.
///
/// Returns the frame and the bytes following it, or the untouched buffer if
/// it does not yet hold a complete frame. A checksum mismatch is an error,
/// after which no later frame of the same stream can be trusted.
pub fn read_frame(r: &[u8]) -> Result<Either<(RawFrame<'_>, &[u8]), &[u8]>> {
    if r.len() < MIN_FRAME {
        return Ok(Right(r));
    }

    let record_size = u16::from_be_bytes([r[0], r[1]]);
    let end = record_size as usize;

    if r.len() < end + 2 {
        debug!(record_size, available = r.len(), "Incomplete frame");
        return Ok(Right(r));
    }

    if end < 2 {
        Err(Error::RecordSize(record_size))?;
    }

    let payload = &r[2..end];
    let found = u16::from_be_bytes([r[end], r[end + 1]]);
    let calculated = compute_checksum(0, payload);

    if found != calculated {
        warn!(found, calculated, record_size, "Frame checksum mismatch");
        Err(Error::Checksum {
            found,
            calculated,
            record_size,
        })?;
    }

    let rest = &r[end + 2..];
    trace!(record_size, remaining = rest.len(), "Read frame");

    Ok(Left((RawFrame(payload), rest)))
}
