//! Decoding of pump alarm records.

use tracing::debug;

use crate::{
    error::Result,
    record::{AlarmType, PumpAlarmDetails},
    sans::cursor::ByteCursor,
};

/// Decode pump alarm details, starting after the common header.
pub(super) fn decode(c: &mut ByteCursor<'_>) -> Result<PumpAlarmDetails> {
    let alarm_time = c.next_date();

    c.skip(1)?;

    let alarm_type_id = c.next_u8()?;
    let alarm_type = AlarmType::for_id(alarm_type_id);
    if alarm_type.is_none() {
        debug!(alarm_type_id, "Alarm type not in catalog");
    }

    c.skip(1)?;

    Ok(PumpAlarmDetails {
        alarm_time,
        alarm_type_id,
        alarm_type,
        alarm_error_code: c.next_u8()?,
        lot_number: c.next_u32_le()?,
        sequence_number: c.next_u32_le()?,
        processor_version: c.next_version(),
        interlock_version: c.next_version(),
    })
}
