//! Interpretation of frame payloads as typed log records.

use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    record::{LogRecord, LogRecordError, LogRecordType, RecordBody, RecordHeader},
    sans::{cursor::ByteCursor, frame::RawFrame},
};

mod alarm;
mod history;

/// Smallest payload holding the fields common to all records.
pub const MIN_RECORD: usize = 18;

/// Decode the payload of one frame into a log record.
///
/// Failures concern this record only; the next frame of the stream can still
/// be decoded.
pub fn decode(frame: RawFrame<'_>) -> Result<LogRecord> {
    let c = &mut ByteCursor::new(frame.payload());

    if c.remaining() < MIN_RECORD {
        Err(Error::InsufficientData(c.remaining()))?;
    }

    let tag = c.next_u8()?;
    let log_type: LogRecordType = zerocopy::try_transmute!(tag).map_err(|_| {
        debug!(tag, "Unknown log record type");
        Error::UnknownLogRecordType(tag)
    })?;

    let header = decode_header(c)?;

    let body = match log_type {
        LogRecordType::History => RecordBody::History(history::decode(c)?),
        LogRecordType::PumpAlarm => RecordBody::PumpAlarm(alarm::decode(c)?),
    };

    trace!(
        %log_type,
        log_index = header.log_index,
        history_type = ?history_type(&body),
        "Decoded record"
    );

    Ok(LogRecord { header, body })
}

/// Decode the fields following the log type tag.
fn decode_header(c: &mut ByteCursor<'_>) -> Result<RecordHeader> {
    let log_index = c.next_i32_be()?;
    let record_size = c.next_u16_be()?;
    let error = LogRecordError::from_code(c.next_u16_be()?);
    let timestamp = c.next_date().ok_or(Error::MissingTimestamp)?;

    c.skip(1)?;

    let seconds_since_power_up = c.next_u32_le()?;

    Ok(RecordHeader {
        log_index,
        record_size,
        error,
        timestamp,
        seconds_since_power_up,
    })
}

fn history_type(body: &RecordBody) -> Option<&'static str> {
    match body {
        RecordBody::History(r) => Some(r.record_type().name()),
        RecordBody::PumpAlarm(_) => None,
    }
}
