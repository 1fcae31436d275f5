//! Slice-based stream decoding.

use either::Either::{Left, Right};
use tracing::debug;

use crate::{
    decode::decode,
    error::Result,
    record::LogRecord,
    sans::frame::{RawFrame, read_frame},
};

/// Iterate over the frames of a slice.
pub fn frames(r: &[u8]) -> Frames<'_> {
    Frames {
        rest: r,
        failed: false,
    }
}

/// Iterate over the decoded records of a slice.
///
/// This method is also re-exported as `ibflog::avec::decode_slice`.
pub fn records(r: &[u8]) -> Records<'_> {
    Records { frames: frames(r) }
}

/// Iterator over the frames of a slice. See [`frames`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> Frames<'a> {
    /// Bytes not yet consumed: an incomplete trailing frame once iteration has
    /// ended normally, or the frame that failed its checksum.
    pub fn remainder(&self) -> &'a [u8] {
        self.rest
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<RawFrame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match read_frame(self.rest) {
            Ok(Left((frame, rest))) => {
                self.rest = rest;
                Some(Ok(frame))
            }
            Ok(Right(rest)) => {
                if !rest.is_empty() {
                    debug!(remaining = rest.len(), "Stream ends with an incomplete frame");
                }
                None
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterator over the decoded records of a slice. See [`records`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    frames: Frames<'a>,
}

impl<'a> Records<'a> {
    /// Bytes not yet consumed. See [`Frames::remainder`].
    pub fn remainder(&self) -> &'a [u8] {
        self.frames.remainder()
    }
}

impl Iterator for Records<'_> {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frames.next().map(|frame| frame.and_then(decode))
    }
}
