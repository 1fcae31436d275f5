//! Decoding of history records.

use tracing::debug;

use crate::{
    error::{Error, Result},
    record::history::*,
    sans::cursor::ByteCursor,
};

/// Width of each user tag of a blood glucose record.
const USER_TAG: usize = 24;

/// Decode a history record, starting at its subtype tag.
pub(super) fn decode(c: &mut ByteCursor<'_>) -> Result<HistoryRecord> {
    let tag = c.next_u32_le()?;
    let record_type = HistoryRecordType::from_tag(tag).ok_or_else(|| {
        debug!(tag, "Unknown history log record type");
        Error::UnknownHistoryRecordType(tag)
    })?;

    let flags = HistoryFlags::from_bits(c.next_u16_le()?.into());

    c.skip(2)?;

    let payload = match record_type {
        HistoryRecordType::BasalRate => HistoryPayload::BasalRate(BasalRateRecord {
            rate_per_hour: hundredths(c.next_u32_le()?),
            duration_minutes: c.next_u16_le()?,
            percent: hundredths(c.next_u16_le()?),
        }),
        HistoryRecordType::Bolus => {
            let units = hundredths(c.next_u32_le()?);
            let extended_duration_minutes = c.next_u16_le()?;
            let calculation_record_offset = c.next_u16_le()?;
            let immediate_duration_seconds = c.next_u16_le()?;

            HistoryPayload::Bolus(BolusRecord {
                units,
                extended_duration_minutes,
                calculation_record_offset,
                immediate_duration_seconds,
                extended: calculation_record_offset == BolusRecord::EXTENDED_SENTINEL,
            })
        }
        HistoryRecordType::DateChange => HistoryPayload::DateChange(DateChangeRecord {
            new_date: c.next_date(),
        }),
        HistoryRecordType::TimeChange => HistoryPayload::TimeChange(TimeChangeRecord {
            new_time: c.next_date(),
        }),
        HistoryRecordType::SuggestedCalc => {
            HistoryPayload::SuggestedCalc(decode_suggested_calculation(c)?)
        }
        HistoryRecordType::RemoteHazardAlarm => HistoryPayload::RemoteHazardAlarm(decode_alarm(c)?),
        HistoryRecordType::Alarm => HistoryPayload::Alarm(decode_alarm(c)?),
        HistoryRecordType::BloodGlucose => HistoryPayload::BloodGlucose(BloodGlucoseRecord {
            error_code: c.next_u32_le()?,
            reading: c.next_u16_le()?,
            user_tag_1: c.next_string(USER_TAG)?,
            user_tag_2: c.next_string(USER_TAG)?,
            flags: BloodGlucoseFlags::from_bits(c.next_u8()?),
        }),
        HistoryRecordType::Carb => HistoryPayload::Carb(CarbRecord {
            carbs: c.next_u16_le()?,
            was_preset: c.next_u8()?,
            preset_type: c.next_u8()?,
        }),
        HistoryRecordType::TerminateBolus => HistoryPayload::TerminateBolus(TerminateBolusRecord {
            insulin_left: hundredths(c.next_u32_le()?),
            time_left_minutes: c.next_u16_le()?,
        }),
        HistoryRecordType::TerminateBasal => HistoryPayload::TerminateBasal(TerminateBasalRecord {
            time_left_minutes: c.next_u16_le()?,
        }),
        HistoryRecordType::Activate => HistoryPayload::Activate(ActivateRecord {
            lot_number: c.next_u16_le()?,
            serial_number: c.next_u16_le()?,
            pod_version: c.next_version(),
            interlock_version: c.next_version(),
        }),
        HistoryRecordType::EndMarker => HistoryPayload::EndMarker,
        HistoryRecordType::Deactivate => HistoryPayload::Deactivate,
        HistoryRecordType::Suspend => HistoryPayload::Suspend,
        HistoryRecordType::Resume => HistoryPayload::Resume,
        HistoryRecordType::Download => HistoryPayload::Download,
        HistoryRecordType::Occlusion => HistoryPayload::Occlusion,
    };

    Ok(HistoryRecord { flags, payload })
}

fn decode_suggested_calculation(c: &mut ByteCursor<'_>) -> Result<SuggestedCalculationRecord> {
    // Struct expressions evaluate fields in source order, which is wire order.
    Ok(SuggestedCalculationRecord {
        correction_delivered: hundredths(c.next_u32_le()?),
        carb_bolus_delivered: hundredths(c.next_u32_le()?),
        correction_programmed: hundredths(c.next_u32_le()?),
        carb_bolus_programmed: hundredths(c.next_u32_le()?),
        correction_suggested: hundredths(c.next_i32_le()?),
        carb_bolus_suggested: hundredths(c.next_u32_le()?),
        correction_job: c.next_u32_le()?,
        meal_job: c.next_u32_le()?,
        correction_factor_used: c.next_u16_le()?,
        current_bg: c.next_u16_le()?,
        target_bg: c.next_u16_le()?,
        correction_threshold_bg: c.next_u16_le()?,
        carb_grams: c.next_i16_le()?,
        ic_ratio_used: c.next_u16_le()?,
    })
}

fn decode_alarm(c: &mut ByteCursor<'_>) -> Result<AlarmRecord> {
    let alarm_time = c.next_date();

    c.skip(1)?;

    Ok(AlarmRecord {
        alarm_time,
        alarm_type_id: c.next_u16_le()?,
        file_number: c.next_u16_le()?,
        line_number: c.next_u16_le()?,
        alarm_error_code: c.next_u16_le()?,
    })
}

/// Convert a value stored in hundredths.
fn hundredths(v: impl Into<f64>) -> f64 {
    v.into() / 100.0
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::{
        decode::{decode as decode_record, tests::payload},
        record::{LogRecord, Timestamp, Version},
        sans::frame::RawFrame,
    };

    fn history(tag: u32, flags: u16, body: &[u8]) -> Vec<u8> {
        let mut r = Vec::new();
        r.extend_from_slice(&tag.to_le_bytes());
        r.extend_from_slice(&flags.to_le_bytes());
        r.extend_from_slice(&[0xAA, 0xBB]);
        r.extend_from_slice(body);
        payload(0x03, &r)
    }

    fn decode_history(tag: u32, flags: u16, body: &[u8]) -> Result<LogRecord> {
        decode_record(RawFrame::new(&history(tag, flags, body)))
    }

    fn payload_of(record: LogRecord) -> HistoryPayload {
        record.as_history().unwrap().payload.clone()
    }

    #[test]
    fn unknown_subtype() {
        let err = decode_history(0x0100, 0, &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownHistoryRecordType(0x0100)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn flags_and_bare_subtypes() {
        let record = decode_history(0x20000, 0x0001 | 0x0008 | 0x0100, &[]).unwrap();
        let history = record.as_history().unwrap();
        assert_eq!(history.record_type(), HistoryRecordType::Download);
        assert_eq!(history.payload, HistoryPayload::Download);
        let flags: Vec<_> = history.flags.iter().collect();
        assert_eq!(
            flags,
            [HistoryFlag::CarryOver, HistoryFlag::EndDay, HistoryFlag::ReverseCorr]
        );

        for (tag, expected) in [
            (0x0000, HistoryPayload::EndMarker),
            (0x0001, HistoryPayload::Deactivate),
            (0x0010, HistoryPayload::Suspend),
            (0x10000, HistoryPayload::Resume),
            (0x40000, HistoryPayload::Occlusion),
        ] {
            assert_eq!(payload_of(decode_history(tag, 0, &[]).unwrap()), expected);
        }
    }

    #[test]
    fn basal_rate() {
        let mut body = Vec::new();
        body.extend_from_slice(&125u32.to_le_bytes());
        body.extend_from_slice(&30u16.to_le_bytes());
        body.extend_from_slice(&5050u16.to_le_bytes());

        let HistoryPayload::BasalRate(r) = payload_of(decode_history(0x0008, 0, &body).unwrap())
        else {
            panic!("expected a basal rate record");
        };
        assert_eq!(r.rate_per_hour, 1.25);
        assert_eq!(r.duration_minutes, 30);
        assert_eq!(r.percent, 50.5);
    }

    fn bolus(calculation_record_offset: u16) -> BolusRecord {
        let mut body = Vec::new();
        body.extend_from_slice(&350u32.to_le_bytes());
        body.extend_from_slice(&90u16.to_le_bytes());
        body.extend_from_slice(&calculation_record_offset.to_le_bytes());
        body.extend_from_slice(&45u16.to_le_bytes());

        let HistoryPayload::Bolus(r) = payload_of(decode_history(0x0004, 0, &body).unwrap())
        else {
            panic!("expected a bolus record");
        };
        r
    }

    #[test]
    fn extended_bolus_sentinel() {
        let r = bolus(65535);
        assert!(r.extended);
        assert_eq!(r.units, 3.5);
        assert_eq!(r.extended_duration_minutes, 90);
        assert_eq!(r.immediate_duration_seconds, 45);

        assert!(!bolus(0).extended);
        assert!(!bolus(65534).extended);
    }

    #[test]
    fn date_and_time_change() {
        let body = [1, 12, 0xE8, 0x07, 5, 4, 3];

        let HistoryPayload::DateChange(r) = payload_of(decode_history(0x0020, 0, &body).unwrap())
        else {
            panic!("expected a date change record");
        };
        assert_eq!(r.new_date, Some(Timestamp::new(2024, 12, 1, 3, 4, 5)));

        let HistoryPayload::TimeChange(r) = payload_of(decode_history(0x0002, 0, &body[..6]).unwrap())
        else {
            panic!("expected a time change record");
        };
        assert_eq!(r.new_time, None);
    }

    #[test]
    fn suggested_calculation_field_order() {
        let mut body = Vec::new();
        for v in [100u32, 200, 300, 400] {
            body.extend_from_slice(&v.to_le_bytes());
        }
        body.extend_from_slice(&(-150i32).to_le_bytes());
        body.extend_from_slice(&600u32.to_le_bytes());
        body.extend_from_slice(&7u32.to_le_bytes());
        body.extend_from_slice(&8u32.to_le_bytes());
        for v in [50u16, 180, 120, 140] {
            body.extend_from_slice(&v.to_le_bytes());
        }
        body.extend_from_slice(&(-12i16).to_le_bytes());
        body.extend_from_slice(&15u16.to_le_bytes());

        let HistoryPayload::SuggestedCalc(r) =
            payload_of(decode_history(0x0040, 0, &body).unwrap())
        else {
            panic!("expected a suggested calculation record");
        };
        assert_eq!(r.correction_delivered, 1.0);
        assert_eq!(r.carb_bolus_delivered, 2.0);
        assert_eq!(r.correction_programmed, 3.0);
        assert_eq!(r.carb_bolus_programmed, 4.0);
        assert_eq!(r.correction_suggested, -1.5);
        assert_eq!(r.carb_bolus_suggested, 6.0);
        assert_eq!((r.correction_job, r.meal_job), (7, 8));
        assert_eq!(r.correction_factor_used, 50);
        assert_eq!(r.current_bg, 180);
        assert_eq!(r.target_bg, 120);
        assert_eq!(r.correction_threshold_bg, 140);
        assert_eq!(r.carb_grams, -12);
        assert_eq!(r.ic_ratio_used, 15);
    }

    #[test]
    fn alarm_layouts_match() {
        let mut body = Vec::from([2, 3, 0xE7, 0x07, 0, 30, 8, 0xFF]);
        for v in [17u16, 4, 1234, 9] {
            body.extend_from_slice(&v.to_le_bytes());
        }

        let expected = AlarmRecord {
            alarm_time: Some(Timestamp::new(2023, 3, 2, 8, 30, 0)),
            alarm_type_id: 17,
            file_number: 4,
            line_number: 1234,
            alarm_error_code: 9,
        };

        assert_eq!(
            payload_of(decode_history(0x0400, 0, &body).unwrap()),
            HistoryPayload::Alarm(expected)
        );
        assert_eq!(
            payload_of(decode_history(0x0080, 0, &body).unwrap()),
            HistoryPayload::RemoteHazardAlarm(expected)
        );
    }

    #[test]
    fn blood_glucose() {
        let mut body = Vec::new();
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(&142u16.to_le_bytes());
        let mut tag = [0u8; 24];
        tag[..9].copy_from_slice(b"Pre-Meal\0");
        tag[10] = b'z';
        body.extend_from_slice(&tag);
        body.extend_from_slice(&[0; 24]);
        body.push(0x01 | 0x04);

        let HistoryPayload::BloodGlucose(r) =
            payload_of(decode_history(0x0800, 0, &body).unwrap())
        else {
            panic!("expected a blood glucose record");
        };
        assert_eq!(r.error_code, 2);
        assert_eq!(r.reading, 142);
        assert_eq!(r.user_tag_1, "Pre-Meal");
        assert_eq!(r.user_tag_2, "");
        assert!(r.flags.contains(BloodGlucoseFlag::Manual));
        assert!(r.flags.contains(BloodGlucoseFlag::BelowTarget));
        assert_eq!(r.flags.len(), 2);
    }

    #[test]
    fn carb() {
        let body = [0x2D, 0x00, 1, 3];
        assert_eq!(
            payload_of(decode_history(0x1000, 0, &body).unwrap()),
            HistoryPayload::Carb(CarbRecord {
                carbs: 45,
                was_preset: 1,
                preset_type: 3,
            })
        );
    }

    #[test]
    fn terminations() {
        let mut body = Vec::new();
        body.extend_from_slice(&275u32.to_le_bytes());
        body.extend_from_slice(&20u16.to_le_bytes());
        assert_eq!(
            payload_of(decode_history(0x2000, 0, &body).unwrap()),
            HistoryPayload::TerminateBolus(TerminateBolusRecord {
                insulin_left: 2.75,
                time_left_minutes: 20,
            })
        );

        assert_eq!(
            payload_of(decode_history(0x4000, 0, &[0x3C, 0x00]).unwrap()),
            HistoryPayload::TerminateBasal(TerminateBasalRecord {
                time_left_minutes: 60,
            })
        );
    }

    #[test]
    fn activate_with_missing_interlock_version() {
        let body = [0x39, 0x30, 0x10, 0x00, 2, 7, 1, 4];
        assert_eq!(
            payload_of(decode_history(0x8000, 0, &body).unwrap()),
            HistoryPayload::Activate(ActivateRecord {
                lot_number: 12345,
                serial_number: 16,
                pod_version: Some(Version {
                    major: 2,
                    minor: 7,
                    patch: 1,
                }),
                interlock_version: None,
            })
        );
    }

    #[test]
    fn truncated_subtype_fields() {
        let err = decode_history(0x0008, 0, &[0x01, 0x00]).unwrap_err();
        assert!(matches!(err, Error::EndOfFrame { needed: 4, .. }));
    }
}
