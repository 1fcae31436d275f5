//! Decoded log record types.
//!
//! Every record carries a [`RecordHeader`] with the fields common to all log
//! entries, and a [`RecordBody`] holding the fields of its log type. History
//! records nest a second level of variants, one per [`HistoryRecordType`].

use core::fmt;

use zerocopy::TryFromBytes;

pub mod alarm;
pub mod history;

pub use alarm::{AlarmType, PumpAlarmDetails};
pub use history::{
    ActivateRecord, AlarmRecord, BasalRateRecord, BloodGlucoseFlag, BloodGlucoseFlags,
    BloodGlucoseRecord, BolusRecord, CarbRecord, DateChangeRecord, HistoryFlag, HistoryFlags,
    HistoryPayload, HistoryRecord, HistoryRecordType, SuggestedCalculationRecord,
    TerminateBasalRecord, TerminateBolusRecord, TimeChangeRecord,
};

/// A single decoded log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub header: RecordHeader,
    pub body: RecordBody,
}

impl LogRecord {
    /// The outer log type of this record.
    pub fn log_type(&self) -> LogRecordType {
        match self.body {
            RecordBody::History(_) => LogRecordType::History,
            RecordBody::PumpAlarm(_) => LogRecordType::PumpAlarm,
        }
    }

    /// The history subtype, for history records.
    pub fn history_type(&self) -> Option<HistoryRecordType> {
        self.as_history().map(HistoryRecord::record_type)
    }

    pub fn as_history(&self) -> Option<&HistoryRecord> {
        match &self.body {
            RecordBody::History(r) => Some(r),
            RecordBody::PumpAlarm(_) => None,
        }
    }

    pub fn as_pump_alarm(&self) -> Option<&PumpAlarmDetails> {
        match &self.body {
            RecordBody::History(_) => None,
            RecordBody::PumpAlarm(r) => Some(r),
        }
    }
}

/// Fields shared by every log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Position of the record in the device's ring buffer.
    pub log_index: i32,
    /// Size of the record as stored by the device. Not checked against the
    /// frame length.
    pub record_size: u16,
    pub error: LogRecordError,
    /// Device local time at which the record was written.
    pub timestamp: Timestamp,
    /// Device uptime counter. Resets whenever the device power-cycles.
    pub seconds_since_power_up: u32,
}

/// The variant part of a log record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    History(HistoryRecord),
    PumpAlarm(PumpAlarmDetails),
}

/// Top-level kind of a log record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum LogRecordType {
    History = 0x03,
    PumpAlarm = 0x05,
}

impl LogRecordType {
    pub fn name(self) -> &'static str {
        match self {
            LogRecordType::History => "HISTORY",
            LogRecordType::PumpAlarm => "PUMP_ALARM",
        }
    }
}

impl fmt::Display for LogRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error state the device attached to a record when writing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogRecordError {
    NoErr,
    GetEepromErr,
    CrcErr,
    LogIndexErr,
    RecSizeErr,
    /// A code outside the known set, kept verbatim.
    Other(u16),
}

impl LogRecordError {
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => LogRecordError::NoErr,
            3 => LogRecordError::GetEepromErr,
            4 => LogRecordError::CrcErr,
            6 => LogRecordError::LogIndexErr,
            8 => LogRecordError::RecSizeErr,
            code => LogRecordError::Other(code),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            LogRecordError::NoErr => 0,
            LogRecordError::GetEepromErr => 3,
            LogRecordError::CrcErr => 4,
            LogRecordError::LogIndexErr => 6,
            LogRecordError::RecSizeErr => 8,
            LogRecordError::Other(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogRecordError::NoErr => "NO_ERR",
            LogRecordError::GetEepromErr => "GET_EEPROM_ERR",
            LogRecordError::CrcErr => "CRC_ERR",
            LogRecordError::LogIndexErr => "LOG_INDEX_ERR",
            LogRecordError::RecSizeErr => "REC_SIZE_ERR",
            LogRecordError::Other(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for LogRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRecordError::Other(code) => write!(f, "UNKNOWN({code})"),
            e => f.write_str(e.name()),
        }
    }
}

/// A calendar date and time in the device's local time zone.
///
/// Components are stored as found, without range validation. The month is
/// held zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    year: u16,
    month0: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Timestamp {
    /// Build a timestamp from a one-based month.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month0: month.wrapping_sub(1),
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Month of the year, counting from 1.
    pub fn month(&self) -> u8 {
        self.month0.wrapping_add(1)
    }

    /// Month of the year, counting from 0.
    pub fn month0(&self) -> u8 {
        self.month0
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year,
            self.month(),
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// A `major.minor.patch` firmware version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
