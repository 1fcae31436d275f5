//! Pump alarm records and the alarm type catalog.

use core::fmt;

use super::{Timestamp, Version};

/// Details of an alarm raised by the pump itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpAlarmDetails {
    pub alarm_time: Option<Timestamp>,
    /// Raw alarm type identifier, kept for identifiers absent from the
    /// catalog.
    pub alarm_type_id: u8,
    /// Catalog entry for the alarm type, if known.
    pub alarm_type: Option<&'static AlarmType>,
    pub alarm_error_code: u8,
    pub lot_number: u32,
    pub sequence_number: u32,
    pub processor_version: Option<Version>,
    pub interlock_version: Option<Version>,
}

/// An entry of the alarm type catalog.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AlarmType {
    pub id: u8,
    pub name: &'static str,
    pub explanation: &'static str,
    /// Whether the alarm stops insulin delivery, where known.
    pub stops_delivery: Option<bool>,
}

impl AlarmType {
    /// Look up a catalog entry by identifier.
    pub fn for_id(id: u8) -> Option<&'static AlarmType> {
        CATALOG.iter().find(|t| t.id == id)
    }

    /// Every catalog entry, in ascending identifier order.
    pub fn all() -> &'static [AlarmType] {
        &CATALOG
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.explanation, self.name)
    }
}

macro_rules! alarm {
    ($id:literal, $name:literal, $explanation:literal, $stops:expr) => {
        AlarmType {
            id: $id,
            name: $name,
            explanation: $explanation,
            stops_delivery: $stops,
        }
    };
}

static CATALOG: [AlarmType; 31] = [
    alarm!(0, "PDM_ERROR0", "PDM error", None),
    alarm!(1, "PDM_ERROR1", "PDM error", None),
    alarm!(2, "PDM_ERROR2", "PDM error", None),
    alarm!(3, "PDM_ERROR3", "PDM error", None),
    alarm!(4, "PDM_ERROR4", "PDM error", None),
    alarm!(5, "PDM_ERROR5", "PDM error", None),
    alarm!(6, "PDM_ERROR6", "PDM error", None),
    alarm!(7, "PDM_ERROR7", "PDM error", None),
    alarm!(8, "PDM_ERROR8", "PDM error", None),
    alarm!(9, "PDM_ERROR9", "PDM error", None),
    alarm!(10, "SYSTEM_ERROR10", "system error", Some(false)),
    alarm!(11, "UNKNOWN11", "Unknown alarm type", None),
    alarm!(12, "SYSTEM_ERROR12", "system error", None),
    alarm!(13, "HAZ_REMOTE", "clock reset alarm", Some(false)),
    alarm!(14, "HAZ_PUMP_VOL", "empty reservoir", Some(true)),
    alarm!(15, "HAZ_PUMP_AUTO_OFF", "auto-off", Some(true)),
    alarm!(16, "HAZ_PUMP_EXPIRED", "pod expired", Some(true)),
    alarm!(17, "HAZ_PUMP_OCCL", "pump site occluded", Some(true)),
    alarm!(18, "HAZ_PUMP_ACTIVATE", "pod is a lump of coal", Some(false)),
    alarm!(19, "UNKNOWN19", "Unknown alarm type", None),
    alarm!(20, "UNKNOWN20", "Unknown alarm type", None),
    alarm!(21, "ADV_KEY", "PDM stuck key detected", Some(false)),
    alarm!(22, "UNKNOWN22", "Unknown alarm type", None),
    alarm!(23, "ADV_PUMP_VOL", "low reservoir", Some(false)),
    alarm!(24, "ADV_PUMP_AUTO_OFF", "15 minutes to auto-off warning", Some(false)),
    alarm!(25, "ADV_PUMP_SUSPEND", "suspend done", Some(false)),
    alarm!(26, "ADV_PUMP_EXP1", "pod expiration advisory", Some(false)),
    alarm!(27, "ADV_PUMP_EXP2", "pod expiration alert", Some(false)),
    alarm!(28, "SYSTEM_ERROR28", "system error", None),
    alarm!(37, "EXP_WARNING", "pod expiration advisory", Some(false)),
    alarm!(39, "HAZ_PDM_AUTO_OFF", "auto-off", Some(true)),
];
