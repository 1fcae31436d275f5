//! I/O-free building blocks for decoding log streams.
//!
//! This module is intended for applications that manage their own buffering.
//! See [`crate::avec`] for implementations covering whole streams.
//!
//! # Architecture
//!
//! A log stream is a sequence of frames with no separators between them.
//! Decoding alternates two steps:
//!
//! - [`frame::read_frame`] slices one checksum-verified frame off the front
//! of a buffer, returning the remaining bytes. When the buffer does not yet
//! hold a complete frame, it is handed back untouched so the caller can read
//! more and retry.
//!
//! - [`crate::decode::decode`] interprets the payload of one frame as a typed
//! [`crate::record::LogRecord`].
//!
//! Both steps read through a [`cursor::ByteCursor`], which turns overruns
//! into errors rather than panics.
//!
//! A checksum mismatch is fatal to the stream: frame boundaries after it
//! cannot be located reliably, and decoding must stop. Any other error
//! concerns a single record, and the caller may move on to the next frame.

pub mod check;
pub mod cursor;
pub mod frame;
