//! End-to-end flows against an on-disk store.

use chrono::{Duration, TimeZone, Utc};
use garage::format::DisplayZone;
use garage::storage::GARAGE_KEY;
use garage::{
    Action, CheckInForm, Error, FixedAnswer, Garage, Instruction, KeyValueStore, Notice,
    SqliteStore,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Garage<SqliteStore> {
    let store = SqliteStore::open(dir.path().join("garage.db")).unwrap();
    Garage::new(store).with_display_zone(DisplayZone::Utc)
}

#[test]
fn vehicles_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let start = Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap();

    {
        let mut garage = open(&dir);
        for (i, licence) in ["AAA-0001", "BBB-0002", "CCC-0003"].iter().enumerate() {
            let at = start + Duration::minutes(i64::try_from(i).unwrap());
            let form = CheckInForm::new("Ana", format!("Car {i}"), *licence);
            garage
                .dispatch_at(Action::CheckIn(form), at, &mut FixedAnswer(true))
                .unwrap();
        }
    }

    let garage = open(&dir);
    let stored = garage.storage().load_vehicles().unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[2].licence, "CCC-0003");
    assert_eq!(stored[1].time, start + Duration::minutes(1));
    assert!(stored.iter().all(|v| !v.deleted));
}

#[test]
fn check_out_then_history_then_clear() {
    let dir = tempfile::tempdir().unwrap();
    let start = Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap();
    let mut garage = open(&dir);
    let mut yes = FixedAnswer(true);

    garage
        .dispatch_at(
            Action::CheckIn(CheckInForm::new("Ana", "Civic", "ABC-1234")),
            start,
            &mut yes,
        )
        .unwrap();
    let row = garage.find_active_row("ABC-1234").unwrap().unwrap();

    // Declining leaves the store untouched
    let out = garage
        .dispatch_at(
            Action::CheckOut(row.check_out_request()),
            start,
            &mut FixedAnswer(false),
        )
        .unwrap();
    assert!(matches!(out[0], Instruction::Notice(Notice::CheckOutCancelled { .. })));
    assert_eq!(garage.active_rows().unwrap().len(), 1);

    let out = garage
        .dispatch_at(
            Action::CheckOut(row.check_out_request()),
            start + Duration::seconds(3_725),
            &mut yes,
        )
        .unwrap();
    assert!(out.contains(&Instruction::Notice(Notice::CheckedOut {
        licence: "ABC-1234".to_string(),
        period: "62m e 5s".to_string(),
        matched: 1,
    })));
    assert!(garage.active_rows().unwrap().is_empty());

    let out = garage.dispatch_at(Action::ShowHistory, start, &mut yes).unwrap();
    let [Instruction::OpenHistory(report)] = out.as_slice() else {
        panic!("expected a history report, got {out:?}");
    };
    assert_eq!(report.entries()[0].checked_in, "10/03/2024 08:30");

    garage.dispatch_at(Action::ClearHistory, start, &mut yes).unwrap();
    assert!(garage.storage().load_vehicles().unwrap().is_empty());
    assert_eq!(
        garage.dispatch_at(Action::ShowHistory, start, &mut yes).unwrap(),
        vec![Instruction::Notice(Notice::NoHistory)]
    );
}

#[test]
fn reads_hand_written_json_collection() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteStore::open(dir.path().join("garage.db")).unwrap();
    store
        .set_item(
            GARAGE_KEY,
            r#"[{"name":"Civic","licence":"ABC-1234","owner":"Ana","time":"2024-03-10T08:30:00.000Z"},
                {"name":"Golf","licence":"DEF-5678","owner":"Bia","time":"2024-03-10T09:00:00.000Z","deleted":true}]"#,
        )
        .unwrap();

    let garage = Garage::new(store).with_display_zone(DisplayZone::Utc);
    let rows = garage.active_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].licence, "ABC-1234");
    assert_eq!(garage.history_report().unwrap().len(), 1);
}

#[test]
fn corrupt_collection_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteStore::open(dir.path().join("garage.db")).unwrap();
    store.set_item(GARAGE_KEY, "not json").unwrap();

    let garage = Garage::new(store);
    let err = garage.active_rows().unwrap_err();
    assert!(matches!(err, Error::CorruptStore { .. }));
}
