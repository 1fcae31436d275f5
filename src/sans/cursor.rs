//! Sequential reader over the bytes of a frame.

use alloc::string::String;

use zerocopy::FromBytes;

use crate::{
    error::{Error, Result},
    record::{Timestamp, Version},
};

/// Offset-tracked reader over an immutable byte buffer.
///
/// The offset only moves forward, and never past the end of the buffer: a
/// read that would overrun fails with [`Error::EndOfFrame`] and leaves the
/// offset where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

macro_rules! next_int {
    ($($name:ident: $t:ident $from:ident,)*) => {
        $(
            #[doc = concat!("Read the next `", stringify!($t), "` (`", stringify!($from), "`).")]
            pub fn $name(&mut self) -> Result<$t> {
                Ok($t::$from(self.take()?))
            }
        )*
    };
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Advance over bytes without interpreting them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take_slice(n).map(|_| ())
    }

    /// Take an exact number of bytes, advancing the offset.
    pub fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut r = [0; N];
        r.copy_from_slice(self.take_slice(N)?);
        Ok(r)
    }

    fn take_slice(&mut self, n: usize) -> Result<&'a [u8]> {
        let (buf, s) = (self.buf, self.offset);
        let r = s
            .checked_add(n)
            .and_then(|e| buf.get(s..e))
            .ok_or(Error::EndOfFrame {
                offset: s,
                needed: n,
                remaining: buf.len() - s,
            })?;
        self.offset += n;
        Ok(r)
    }

    pub fn next_u8(&mut self) -> Result<u8> {
        let [b] = self.take()?;
        Ok(b)
    }

    pub fn next_i8(&mut self) -> Result<i8> {
        Ok(self.next_u8()? as i8)
    }

    next_int! {
        next_u16_le: u16 from_le_bytes,
        next_u16_be: u16 from_be_bytes,
        next_i16_le: i16 from_le_bytes,
        next_i16_be: i16 from_be_bytes,
        next_u32_le: u32 from_le_bytes,
        next_u32_be: u32 from_be_bytes,
        next_i32_le: i32 from_le_bytes,
        next_i32_be: i32 from_be_bytes,
    }

    /// Read the next date field, if at least seven bytes remain.
    ///
    /// Components are stored day, month, year (little-endian), second,
    /// minute, hour, and are interpreted as device local time.
    pub fn next_date(&mut self) -> Option<Timestamp> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct DateField {
            day: u8,
            month: u8,
            year: [u8; 2],
            second: u8,
            minute: u8,
            hour: u8,
        }

        let r: [u8; 7] = self.take().ok()?;

        let DateField {
            day,
            month,
            year,
            second,
            minute,
            hour,
        } = zerocopy::transmute!(r);

        Some(Timestamp::new(
            u16::from_le_bytes(year),
            month,
            day,
            hour,
            minute,
            second,
        ))
    }

    /// Read the next `major.minor.patch` version, if at least three bytes
    /// remain.
    pub fn next_version(&mut self) -> Option<Version> {
        let [major, minor, patch] = self.take().ok()?;
        Some(Version {
            major,
            minor,
            patch,
        })
    }

    /// Read a zero-terminated string from a fixed-width field.
    ///
    /// The terminator is searched for from the current offset up to the end
    /// of the buffer, not the end of the field. Bytes before it are decoded
    /// as Latin-1. The offset then advances by exactly `width`, whatever the
    /// position of the terminator.
    pub fn next_string(&mut self, width: usize) -> Result<String> {
        let tail = &self.buf[self.offset..];
        let end = tail.iter().position(|b| *b == 0).unwrap_or(tail.len());
        let text = tail[..end].iter().map(|b| char::from(*b)).collect();

        self.skip(width)?;

        Ok(text)
    }
}
