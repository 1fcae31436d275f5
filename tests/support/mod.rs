#![allow(dead_code)]

/// Wrap a payload in a length prefix and checksum.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let size = (payload.len() + 2) as u16;
    let checksum = payload
        .iter()
        .fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)));

    let mut r = Vec::new();
    r.extend_from_slice(&size.to_be_bytes());
    r.extend_from_slice(payload);
    r.extend_from_slice(&checksum.to_be_bytes());
    r
}

/// Common record header: log type, index, size, error code, timestamp,
/// reserved byte, and seconds since power-up.
pub fn header(tag: u8, log_index: i32) -> Vec<u8> {
    let mut r = vec![tag];
    r.extend_from_slice(&log_index.to_be_bytes());
    r.extend_from_slice(&0u16.to_be_bytes());
    r.extend_from_slice(&0u16.to_be_bytes());
    r.extend_from_slice(&[15, 6]);
    r.extend_from_slice(&2023u16.to_le_bytes());
    r.extend_from_slice(&[30, 45, 10]);
    r.push(0);
    r.extend_from_slice(&86_400u32.to_le_bytes());
    r
}

pub fn history(log_index: i32, subtype: u32, flags: u16, body: &[u8]) -> Vec<u8> {
    let mut r = header(0x03, log_index);
    r.extend_from_slice(&subtype.to_le_bytes());
    r.extend_from_slice(&flags.to_le_bytes());
    r.extend_from_slice(&[0, 0]);
    r.extend_from_slice(body);
    r
}

/// A basal rate history payload.
pub fn basal_rate(log_index: i32, hundredths_per_hour: u32, minutes: u16, percent: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&hundredths_per_hour.to_le_bytes());
    body.extend_from_slice(&minutes.to_le_bytes());
    body.extend_from_slice(&percent.to_le_bytes());
    history(log_index, 0x0008, 0x0002, &body)
}

pub fn pump_alarm(log_index: i32, alarm_type: u8) -> Vec<u8> {
    let mut r = header(0x05, log_index);
    r.extend_from_slice(&[1, 1]);
    r.extend_from_slice(&2024u16.to_le_bytes());
    r.extend_from_slice(&[0, 0, 12]);
    r.extend_from_slice(&[0, alarm_type, 0, 3]);
    r.extend_from_slice(&77u32.to_le_bytes());
    r.extend_from_slice(&1_001u32.to_le_bytes());
    r.extend_from_slice(&[1, 0, 4, 2, 2, 0]);
    r
}
