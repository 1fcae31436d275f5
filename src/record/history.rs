//! History log records.

use alloc::string::String;
use core::fmt;

use tartan_bitfield::bitfield;
use zerocopy::TryFromBytes;

use super::{AlarmType, Timestamp, Version};

/// Second-level kind of a history log record.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum HistoryRecordType {
    EndMarker = 0x0000,
    Deactivate = 0x0001,
    TimeChange = 0x0002,
    Bolus = 0x0004,
    BasalRate = 0x0008,
    Suspend = 0x0010,
    DateChange = 0x0020,
    SuggestedCalc = 0x0040,
    RemoteHazardAlarm = 0x0080,
    Alarm = 0x0400,
    BloodGlucose = 0x0800,
    Carb = 0x1000,
    TerminateBolus = 0x2000,
    TerminateBasal = 0x4000,
    Activate = 0x8000,
    Resume = 0x10000,
    Download = 0x20000,
    Occlusion = 0x40000,
}

impl HistoryRecordType {
    /// Every history subtype, in ascending tag order.
    pub const ALL: [HistoryRecordType; 18] = [
        HistoryRecordType::EndMarker,
        HistoryRecordType::Deactivate,
        HistoryRecordType::TimeChange,
        HistoryRecordType::Bolus,
        HistoryRecordType::BasalRate,
        HistoryRecordType::Suspend,
        HistoryRecordType::DateChange,
        HistoryRecordType::SuggestedCalc,
        HistoryRecordType::RemoteHazardAlarm,
        HistoryRecordType::Alarm,
        HistoryRecordType::BloodGlucose,
        HistoryRecordType::Carb,
        HistoryRecordType::TerminateBolus,
        HistoryRecordType::TerminateBasal,
        HistoryRecordType::Activate,
        HistoryRecordType::Resume,
        HistoryRecordType::Download,
        HistoryRecordType::Occlusion,
    ];

    /// Look up a subtype by its tag.
    pub fn from_tag(tag: u32) -> Option<Self> {
        zerocopy::try_transmute!(tag).ok()
    }

    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            HistoryRecordType::EndMarker => "END_MARKER",
            HistoryRecordType::Deactivate => "DEACTIVATE",
            HistoryRecordType::TimeChange => "TIME_CHANGE",
            HistoryRecordType::Bolus => "BOLUS",
            HistoryRecordType::BasalRate => "BASAL_RATE",
            HistoryRecordType::Suspend => "SUSPEND",
            HistoryRecordType::DateChange => "DATE_CHANGE",
            HistoryRecordType::SuggestedCalc => "SUGGESTED_CALC",
            HistoryRecordType::RemoteHazardAlarm => "REMOTE_HAZARD_ALARM",
            HistoryRecordType::Alarm => "ALARM",
            HistoryRecordType::BloodGlucose => "BLOOD_GLUCOSE",
            HistoryRecordType::Carb => "CARB",
            HistoryRecordType::TerminateBolus => "TERMINATE_BOLUS",
            HistoryRecordType::TerminateBasal => "TERMINATE_BASAL",
            HistoryRecordType::Activate => "ACTIVATE",
            HistoryRecordType::Resume => "RESUME",
            HistoryRecordType::Download => "DOWNLOAD",
            HistoryRecordType::Occlusion => "OCCLUSION",
        }
    }
}

impl fmt::Display for HistoryRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generate a set type over a fieldless flag enumeration, storing one bit per
/// variant ordinal.
macro_rules! flag_set {
    ($set:ident, $flag:ident, $(#[$attr:meta])*) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $set(u8);

        impl $set {
            /// Whether the flag is present.
            pub fn contains(&self, flag: $flag) -> bool {
                self.0 & (1 << flag as u8) != 0
            }

            pub fn is_empty(&self) -> bool {
                self.0 == 0
            }

            pub fn len(&self) -> usize {
                self.0.count_ones() as usize
            }

            /// Present flags, in bit order.
            pub fn iter(&self) -> impl Iterator<Item = $flag> {
                let set = *self;
                $flag::ALL.into_iter().filter(move |f| set.contains(*f))
            }

            fn insert(&mut self, flag: $flag) {
                self.0 |= 1 << flag as u8;
            }
        }

        impl FromIterator<$flag> for $set {
            fn from_iter<I: IntoIterator<Item = $flag>>(iter: I) -> Self {
                let mut set = Self::default();
                for flag in iter {
                    set.insert(flag);
                }
                set
            }
        }

        impl fmt::Debug for $set {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }
    };
}

/// A flag attached to a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryFlag {
    CarryOver,
    NewDay,
    InProgress,
    EndDay,
    Unconfirmed,
    ReverseCorr,
    MaxBolus,
    Error,
}

impl HistoryFlag {
    pub const ALL: [HistoryFlag; 8] = [
        HistoryFlag::CarryOver,
        HistoryFlag::NewDay,
        HistoryFlag::InProgress,
        HistoryFlag::EndDay,
        HistoryFlag::Unconfirmed,
        HistoryFlag::ReverseCorr,
        HistoryFlag::MaxBolus,
        HistoryFlag::Error,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HistoryFlag::CarryOver => "CARRY_OVER",
            HistoryFlag::NewDay => "NEW_DAY",
            HistoryFlag::InProgress => "IN_PROGRESS",
            HistoryFlag::EndDay => "END_DAY",
            HistoryFlag::Unconfirmed => "UNCONFIRMED",
            HistoryFlag::ReverseCorr => "REVERSE_CORR",
            HistoryFlag::MaxBolus => "MAX_BOLUS",
            HistoryFlag::Error => "ERROR",
        }
    }
}

impl fmt::Display for HistoryFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

flag_set!(HistoryFlags, HistoryFlag, /** Set of [`HistoryFlag`]s. */);

impl HistoryFlags {
    /// Decompose a raw flag word. Unnamed bits are dropped.
    ///
    /// The wire field is 16 bits wide, so [`HistoryFlag::Error`] (bit 31)
    /// never appears in decoded records.
    pub fn from_bits(bits: u32) -> Self {
        bitfield! {
            struct Word(u32) {
                [0] carry_over,
                [1] new_day,
                [2] in_progress,
                [3] end_day,
                [4] unconfirmed,
                [8] reverse_corr,
                [9] max_bolus,
                [31] error,
            }
        }

        let word = Word(bits);

        HistoryFlag::ALL
            .into_iter()
            .filter(|flag| match flag {
                HistoryFlag::CarryOver => word.carry_over(),
                HistoryFlag::NewDay => word.new_day(),
                HistoryFlag::InProgress => word.in_progress(),
                HistoryFlag::EndDay => word.end_day(),
                HistoryFlag::Unconfirmed => word.unconfirmed(),
                HistoryFlag::ReverseCorr => word.reverse_corr(),
                HistoryFlag::MaxBolus => word.max_bolus(),
                HistoryFlag::Error => word.error(),
            })
            .collect()
    }
}

/// A flag attached to a blood glucose reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BloodGlucoseFlag {
    Manual,
    Temperature,
    BelowTarget,
    AboveTarget,
    RangeErrorLow,
    RangeErrorHigh,
    OtherError,
}

impl BloodGlucoseFlag {
    pub const ALL: [BloodGlucoseFlag; 7] = [
        BloodGlucoseFlag::Manual,
        BloodGlucoseFlag::Temperature,
        BloodGlucoseFlag::BelowTarget,
        BloodGlucoseFlag::AboveTarget,
        BloodGlucoseFlag::RangeErrorLow,
        BloodGlucoseFlag::RangeErrorHigh,
        BloodGlucoseFlag::OtherError,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BloodGlucoseFlag::Manual => "MANUAL",
            BloodGlucoseFlag::Temperature => "TEMPERATURE",
            BloodGlucoseFlag::BelowTarget => "BELOW_TARGET",
            BloodGlucoseFlag::AboveTarget => "ABOVE_TARGET",
            BloodGlucoseFlag::RangeErrorLow => "RANGE_ERROR_LOW",
            BloodGlucoseFlag::RangeErrorHigh => "RANGE_ERROR_HIGH",
            BloodGlucoseFlag::OtherError => "OTHER_ERROR",
        }
    }
}

impl fmt::Display for BloodGlucoseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

flag_set!(BloodGlucoseFlags, BloodGlucoseFlag, /** Set of [`BloodGlucoseFlag`]s. */);

impl BloodGlucoseFlags {
    /// Decompose a raw flag byte. The top bit is unnamed and dropped.
    pub fn from_bits(bits: u8) -> Self {
        bitfield! {
            struct Byte(u8) {
                [0] manual,
                [1] temperature,
                [2] below_target,
                [3] above_target,
                [4] range_error_low,
                [5] range_error_high,
                [6] other_error,
            }
        }

        let byte = Byte(bits);

        BloodGlucoseFlag::ALL
            .into_iter()
            .filter(|flag| match flag {
                BloodGlucoseFlag::Manual => byte.manual(),
                BloodGlucoseFlag::Temperature => byte.temperature(),
                BloodGlucoseFlag::BelowTarget => byte.below_target(),
                BloodGlucoseFlag::AboveTarget => byte.above_target(),
                BloodGlucoseFlag::RangeErrorLow => byte.range_error_low(),
                BloodGlucoseFlag::RangeErrorHigh => byte.range_error_high(),
                BloodGlucoseFlag::OtherError => byte.other_error(),
            })
            .collect()
    }
}

/// A history log record.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub flags: HistoryFlags,
    pub payload: HistoryPayload,
}

impl HistoryRecord {
    pub fn record_type(&self) -> HistoryRecordType {
        self.payload.record_type()
    }
}

/// Subtype-specific fields of a history record.
///
/// Subtypes without fields of their own carry no data.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryPayload {
    EndMarker,
    Deactivate,
    TimeChange(TimeChangeRecord),
    Bolus(BolusRecord),
    BasalRate(BasalRateRecord),
    Suspend,
    DateChange(DateChangeRecord),
    SuggestedCalc(SuggestedCalculationRecord),
    RemoteHazardAlarm(AlarmRecord),
    Alarm(AlarmRecord),
    BloodGlucose(BloodGlucoseRecord),
    Carb(CarbRecord),
    TerminateBolus(TerminateBolusRecord),
    TerminateBasal(TerminateBasalRecord),
    Activate(ActivateRecord),
    Resume,
    Download,
    Occlusion,
}

impl HistoryPayload {
    pub fn record_type(&self) -> HistoryRecordType {
        match self {
            HistoryPayload::EndMarker => HistoryRecordType::EndMarker,
            HistoryPayload::Deactivate => HistoryRecordType::Deactivate,
            HistoryPayload::TimeChange(_) => HistoryRecordType::TimeChange,
            HistoryPayload::Bolus(_) => HistoryRecordType::Bolus,
            HistoryPayload::BasalRate(_) => HistoryRecordType::BasalRate,
            HistoryPayload::Suspend => HistoryRecordType::Suspend,
            HistoryPayload::DateChange(_) => HistoryRecordType::DateChange,
            HistoryPayload::SuggestedCalc(_) => HistoryRecordType::SuggestedCalc,
            HistoryPayload::RemoteHazardAlarm(_) => HistoryRecordType::RemoteHazardAlarm,
            HistoryPayload::Alarm(_) => HistoryRecordType::Alarm,
            HistoryPayload::BloodGlucose(_) => HistoryRecordType::BloodGlucose,
            HistoryPayload::Carb(_) => HistoryRecordType::Carb,
            HistoryPayload::TerminateBolus(_) => HistoryRecordType::TerminateBolus,
            HistoryPayload::TerminateBasal(_) => HistoryRecordType::TerminateBasal,
            HistoryPayload::Activate(_) => HistoryRecordType::Activate,
            HistoryPayload::Resume => HistoryRecordType::Resume,
            HistoryPayload::Download => HistoryRecordType::Download,
            HistoryPayload::Occlusion => HistoryRecordType::Occlusion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasalRateRecord {
    /// Units per hour.
    pub rate_per_hour: f64,
    pub duration_minutes: u16,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BolusRecord {
    pub units: f64,
    pub extended_duration_minutes: u16,
    pub calculation_record_offset: u16,
    pub immediate_duration_seconds: u16,
    /// Set when the calculation record offset holds the extended bolus
    /// sentinel.
    pub extended: bool,
}

impl BolusRecord {
    /// Calculation record offset marking an extended bolus.
    pub const EXTENDED_SENTINEL: u16 = 0xFFFF;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChangeRecord {
    pub new_date: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeChangeRecord {
    pub new_time: Option<Timestamp>,
}

/// Inputs and results of a bolus calculator suggestion.
///
/// Insulin amounts are in units; glucose values are in the device's
/// configured unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestedCalculationRecord {
    pub correction_delivered: f64,
    pub carb_bolus_delivered: f64,
    pub correction_programmed: f64,
    pub carb_bolus_programmed: f64,
    pub correction_suggested: f64,
    pub carb_bolus_suggested: f64,
    pub correction_job: u32,
    pub meal_job: u32,
    pub correction_factor_used: u16,
    pub current_bg: u16,
    pub target_bg: u16,
    pub correction_threshold_bg: u16,
    pub carb_grams: i16,
    pub ic_ratio_used: u16,
}

/// An alarm raised by the device, stored as a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmRecord {
    pub alarm_time: Option<Timestamp>,
    pub alarm_type_id: u16,
    pub file_number: u16,
    pub line_number: u16,
    pub alarm_error_code: u16,
}

impl AlarmRecord {
    /// Resolve the alarm type against the catalog.
    pub fn alarm_type(&self) -> Option<&'static AlarmType> {
        u8::try_from(self.alarm_type_id)
            .ok()
            .and_then(AlarmType::for_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodGlucoseRecord {
    pub error_code: u32,
    pub reading: u16,
    pub user_tag_1: String,
    pub user_tag_2: String,
    pub flags: BloodGlucoseFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarbRecord {
    pub carbs: u16,
    pub was_preset: u8,
    pub preset_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminateBolusRecord {
    pub insulin_left: f64,
    pub time_left_minutes: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminateBasalRecord {
    pub time_left_minutes: u16,
}

/// Activation of a new pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateRecord {
    pub lot_number: u16,
    pub serial_number: u16,
    pub pod_version: Option<Version>,
    pub interlock_version: Option<Version>,
}
