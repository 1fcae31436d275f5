//! Helper for computing frame checksums.

/// Accumulate a slice of bytes into a checksum value.
///
/// The checksum is the sum of the bytes, wrapped to the 16-bit width of the
/// stored checksum field.
pub fn compute_checksum(init: u16, r: &[u8]) -> u16 {
    r.iter().fold(init, |acc, b| acc.wrapping_add(u16::from(*b)))
}
