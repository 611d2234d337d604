use chrono::{TimeZone, Utc};
use pesca_core::{Catch, CatchUpdate, Participant, ValidationError};
use test_case::test_case;

#[test]
fn participant_new_starts_without_catches() {
    let participant = Participant::new("Ana", "Ruiz").unwrap();

    assert!(participant.id().starts_with("p_"));
    assert_eq!(participant.name(), "Ana");
    assert_eq!(participant.family_name(), "Ruiz");
    assert_eq!(participant.total_catches(), 0);
    assert_eq!(participant.total_weight(), 0.0);
    assert!(participant.heaviest_catch().is_none());
}

#[test_case("" ; "empty name")]
#[test_case("   " ; "blank name")]
fn participant_new_rejects_blank_name(name: &str) {
    let err = Participant::new(name, "Ruiz").unwrap_err();
    assert_eq!(err, ValidationError::EmptyField("name"));
}

#[test]
fn full_name_appends_family_name_only_when_present() {
    assert_eq!(Participant::new("Ana", "Ruiz").unwrap().full_name(), "Ana Ruiz");
    assert_eq!(Participant::new("Ana", "").unwrap().full_name(), "Ana");
    assert_eq!(Participant::new(" Ana ", "  ").unwrap().full_name(), "Ana");
}

#[test]
fn catches_keep_logging_order_and_sum_weights() {
    let mut participant = Participant::new("Luis", "").unwrap();
    participant.add_catch(Catch::new(500.0, "carp").unwrap()).unwrap();
    participant.add_catch(Catch::new(300.0, "").unwrap()).unwrap();
    participant.add_catch(Catch::new(900.0, "pike").unwrap()).unwrap();

    let weights = participant
        .catches()
        .iter()
        .map(Catch::weight)
        .collect::<Vec<_>>();
    assert_eq!(weights, vec![500.0, 300.0, 900.0]);
    assert_eq!(participant.total_catches(), 3);
    assert_eq!(participant.total_weight(), 1700.0);
    assert_eq!(participant.heaviest_catch().unwrap().weight(), 900.0);
}

#[test]
fn find_and_remove_catch_by_id() {
    let mut participant = Participant::new("Luis", "").unwrap();
    let catch = Catch::new(500.0, "carp").unwrap();
    let catch_id = catch.id().to_string();
    participant.add_catch(catch).unwrap();

    assert_eq!(participant.find_catch(&catch_id).unwrap().weight(), 500.0);
    assert!(participant.remove_catch(&catch_id));
    assert!(participant.find_catch(&catch_id).is_none());
    assert!(!participant.remove_catch(&catch_id));
    assert_eq!(participant.total_weight(), 0.0);
}

#[test]
fn update_catch_reports_missing_ids() {
    let mut participant = Participant::new("Luis", "").unwrap();
    let catch = Catch::new(500.0, "carp").unwrap();
    let catch_id = catch.id().to_string();
    participant.add_catch(catch).unwrap();

    let applied = participant.update_catch(
        &catch_id,
        CatchUpdate {
            weight: Some(650.0),
            fish_type: Some("mirror carp".to_string()),
        },
    );
    assert!(applied);
    let updated = participant.find_catch(&catch_id).unwrap();
    assert_eq!(updated.weight(), 650.0);
    assert_eq!(updated.fish_type(), "mirror carp");

    assert!(!participant.update_catch("c_missing", CatchUpdate::default()));
}

#[test]
fn update_catch_with_zero_weight_keeps_old_weight() {
    let mut participant = Participant::new("Luis", "").unwrap();
    let catch = Catch::new(500.0, "carp").unwrap();
    let catch_id = catch.id().to_string();
    participant.add_catch(catch).unwrap();

    assert!(participant.update_catch(
        &catch_id,
        CatchUpdate {
            weight: Some(0.0),
            fish_type: None,
        },
    ));
    assert_eq!(participant.find_catch(&catch_id).unwrap().weight(), 500.0);
}

#[test]
fn add_catch_rejects_an_id_already_held() {
    let mut participant = Participant::new("Luis", "").unwrap();
    let logged_at = Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap();
    participant
        .add_catch(Catch::with_id("c_x", 100.0, "", logged_at).unwrap())
        .unwrap();

    let err = participant
        .add_catch(Catch::with_id("c_x", 250.0, "pike", logged_at).unwrap())
        .unwrap_err();
    assert_eq!(err, ValidationError::DuplicateId("c_x".to_string()));
    assert_eq!(participant.total_catches(), 1);
    assert_eq!(participant.total_weight(), 100.0);
}
