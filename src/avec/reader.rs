//! Reader-based stream decoding.
//!
//! _Requires Cargo feature `std`._

use alloc::vec::Vec;
use std::io::Read;

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::debug;

use crate::{decode::decode, record::LogRecord, sans::frame::read_frame};

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error framing or decoding a record.
    #[error(transparent)]
    Decode(#[from] crate::Error),
}

impl Error {
    /// Whether the error ends decoding of the stream. See
    /// [`crate::Error::is_fatal`].
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Decode(e) => e.is_fatal(),
        }
    }
}

type Result<T, E = Error> = core::result::Result<T, E>;

/// Iterate over the decoded records of a reader, reading one frame at a time.
///
/// This method is also re-exported as `ibflog::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn records<R: Read>(r: R) -> Records<R> {
    Records {
        r,
        buf: Vec::new(),
        done: false,
    }
}

/// Iterator over the decoded records of a reader. See [`records`].
#[derive(Debug)]
pub struct Records<R> {
    r: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> Records<R> {
    /// Bytes read but not decoded: an incomplete trailing frame once iteration
    /// has ended normally, or the frame that failed its checksum.
    pub fn remainder(&self) -> &[u8] {
        &self.buf
    }

    /// Read from the reader until the buffer holds `n` bytes, or the reader
    /// is exhausted.
    fn fill(&mut self, n: usize) -> Result<bool> {
        let missing = n.saturating_sub(self.buf.len());
        (&mut self.r).take(missing as u64).read_to_end(&mut self.buf)?;
        Ok(self.buf.len() >= n)
    }

    fn next_record(&mut self) -> Result<Option<LogRecord>> {
        self.buf.clear();

        if !self.fill(4)? {
            return Ok(None);
        }

        let record_size = u16::from_be_bytes([self.buf[0], self.buf[1]]);

        if !self.fill(record_size as usize + 2)? {
            return Ok(None);
        }

        match read_frame(&self.buf)? {
            Left((frame, _)) => Ok(Some(decode(frame)?)),
            Right(_) => Ok(None),
        }
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => {
                self.buf.clear();
                Some(Ok(record))
            }
            Ok(None) => {
                if !self.buf.is_empty() {
                    debug!(remaining = self.buf.len(), "Stream ends with an incomplete frame");
                }
                self.done = true;
                None
            }
            Err(e) => {
                if e.is_fatal() {
                    self.done = true;
                } else {
                    self.buf.clear();
                }
                Some(Err(e))
            }
        }
    }
}
