mod support;

use either::Either::{Left, Right};
use ibflog::{
    Error,
    avec::{decode_reader, decode_slice, slice::frames},
    decode, read_frame,
    record::{
        AlarmType, BasalRateRecord, HistoryFlag, HistoryPayload, HistoryRecordType,
        LogRecordType, Timestamp,
    },
    sans::cursor::ByteCursor,
};
use support::{basal_rate, frame, history, pump_alarm};

#[test]
fn frame_lengths() {
    let payload = basal_rate(1, 100, 60, 100);
    let mut r = frame(&payload);
    r.extend_from_slice(&[9, 9, 9]);

    let record_size = u16::from_be_bytes([r[0], r[1]]) as usize;
    let Left((f, rest)) = read_frame(&r).unwrap() else {
        panic!("expected a frame");
    };
    assert_eq!(f.len(), record_size - 2);
    assert_eq!(f.payload(), &payload[..]);
    assert_eq!(rest.len(), r.len() - (record_size + 2));
}

#[test]
fn corrupting_any_payload_byte_fails_checksum() {
    let r = frame(&basal_rate(1, 100, 60, 100));
    for i in 2..r.len() - 2 {
        let mut r = r.clone();
        r[i] = r[i].wrapping_add(1);
        assert!(
            matches!(read_frame(&r), Err(Error::Checksum { .. })),
            "byte {i} corrupted"
        );
    }
}

#[test]
fn string_field_width() {
    let mut r = b"basal\0garbage-after-terminator".to_vec();
    r.resize(30, 0xFF);
    let mut c = ByteCursor::new(&r);
    assert_eq!(c.next_string(24).unwrap(), "basal");
    assert_eq!(c.offset(), 24);
}

#[test]
fn date_field() {
    let mut r = vec![15, 6];
    r.extend_from_slice(&2023u16.to_le_bytes());
    r.extend_from_slice(&[30, 45, 10]);

    assert!(ByteCursor::new(&r[..6]).next_date().is_none());

    let t = ByteCursor::new(&r).next_date().unwrap();
    assert_eq!(
        (t.year(), t.month(), t.day(), t.hour(), t.minute(), t.second()),
        (2023, 6, 15, 10, 45, 30)
    );
}

#[test]
fn unknown_outer_tag_yields_no_record() {
    let mut payload = basal_rate(1, 100, 60, 100);
    payload[0] = 0x07;
    let r = frame(&payload);

    let Left((f, _)) = read_frame(&r).unwrap() else {
        panic!("expected a frame");
    };
    assert!(matches!(decode(f), Err(Error::UnknownLogRecordType(0x07))));
}

#[test]
fn catalog_lookup() {
    assert!(AlarmType::for_id(99).is_none());
    let t = AlarmType::for_id(14).unwrap();
    assert_eq!(t.explanation, "empty reservoir");
    assert_eq!(t.stops_delivery, Some(true));
}

#[test]
fn basal_record_then_truncated_frame() {
    let mut r = frame(&basal_rate(42, 85, 30, 10_000));
    let second = frame(&basal_rate(43, 90, 30, 10_000));
    let truncated = &second[..second.len() / 2];
    r.extend_from_slice(truncated);

    let Left((f, rest)) = read_frame(&r).unwrap() else {
        panic!("expected a frame");
    };
    let record = decode(f).unwrap();
    assert_eq!(record.log_type(), LogRecordType::History);
    assert_eq!(record.header.log_index, 42);
    assert_eq!(record.header.timestamp, Timestamp::new(2023, 6, 15, 10, 45, 30));
    assert_eq!(record.header.seconds_since_power_up, 86_400);

    let history = record.as_history().unwrap();
    assert_eq!(history.record_type(), HistoryRecordType::BasalRate);
    assert!(history.flags.contains(HistoryFlag::NewDay));
    assert_eq!(
        history.payload,
        HistoryPayload::BasalRate(BasalRateRecord {
            rate_per_hour: 0.85,
            duration_minutes: 30,
            percent: 100.0,
        })
    );

    assert_eq!(read_frame(rest).unwrap(), Right(truncated));
}

#[test]
fn mixed_stream_over_slice_and_reader() {
    let mut r = Vec::new();
    r.extend(frame(&basal_rate(1, 100, 60, 100)));
    r.extend(frame(&history(2, 0x0100, 0, &[])));
    r.extend(frame(&pump_alarm(3, 17)));
    r.extend(frame(&history(4, 0x0010, 0x0010, &[])));
    r.extend([0x00, 0x40]);

    let check = |results: Vec<Result<ibflog::LogRecord, String>>| {
        assert_eq!(results.len(), 4);
        assert_eq!(
            results[0].as_ref().unwrap().history_type(),
            Some(HistoryRecordType::BasalRate)
        );
        assert!(results[1].is_err());

        let alarm = results[2].as_ref().unwrap().as_pump_alarm().unwrap();
        assert_eq!(alarm.alarm_type.unwrap().name, "HAZ_PUMP_OCCL");
        assert_eq!(alarm.alarm_error_code, 3);
        assert_eq!(alarm.alarm_time, Some(Timestamp::new(2024, 1, 1, 12, 0, 0)));

        let suspend = results[3].as_ref().unwrap().as_history().unwrap();
        assert_eq!(suspend.payload, HistoryPayload::Suspend);
        assert!(suspend.flags.contains(HistoryFlag::Unconfirmed));
    };

    let mut records = decode_slice(&r);
    check(records.by_ref().map(|r| r.map_err(|e| e.to_string())).collect());
    assert_eq!(records.remainder(), &[0x00, 0x40]);

    let mut records = decode_reader(r.as_slice());
    check(records.by_ref().map(|r| r.map_err(|e| e.to_string())).collect());
    assert_eq!(records.remainder(), &[0x00, 0x40]);

    assert_eq!(frames(&r).count(), 4);
}
