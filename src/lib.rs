#![no_std]

//! A decoder for the binary history and alarm logs written by insulin pump
//! management devices.
//!
//! A log stream is a sequence of length-prefixed, checksummed frames. Each
//! frame holds one record: either a history entry (boluses, basal rates,
//! blood glucose readings, alarms, pod activations, and so on) or the details
//! of a pump alarm. Ibflog slices frames off a byte buffer and decodes them
//! into the strongly-typed values of the [`record`] module.
//!
//! Most users should begin with the iterators in the [`avec`] module. If these
//! prove insufficient, for example when buffering data as it arrives, drive
//! the framer and decoder described in the [`sans`] module directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoding (default).

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod avec;
pub mod decode;
pub mod error;
pub mod record;
pub mod sans;

pub use decode::decode;
pub use error::{Error, Result};
pub use record::LogRecord;
pub use sans::frame::{RawFrame, read_frame};
