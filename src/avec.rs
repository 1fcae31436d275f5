//! Convenience interfaces for decoding whole log streams.
//!
//! The iterators in this module frame and decode records one after another,
//! yielding a result per frame. Iteration ends when the stream runs out of
//! complete frames, or after the first error that breaks the integrity of
//! the stream (see [`crate::Error::is_fatal`]). Errors concerning a single
//! record are yielded without ending iteration.
//!
//! ```
//! for record in ibflog::avec::decode_slice(&data) {
//!     match record {
//!         Ok(record) => println!("{}: {:?}", record.header.log_index, record.body),
//!         Err(e) if e.is_fatal() => return Err(e),
//!         Err(e) => eprintln!("skipping record: {e}"),
//!     }
//! }
//! ```

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::records as decode_reader;
pub use slice::records as decode_slice;
