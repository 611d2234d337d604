use chrono::{TimeZone, Utc};
use pesca_core::{Catch, CatchUpdate, ValidationError};
use test_case::test_case;

#[test]
fn catch_new_sets_defaults() {
    let before = Utc::now();
    let catch = Catch::new(450.0, "").unwrap();

    assert!(catch.id().starts_with("c_"));
    assert_eq!(catch.weight(), 450.0);
    assert_eq!(catch.fish_type(), "");
    assert!(catch.timestamp() >= before);
}

#[test]
fn catch_keeps_exact_positive_weight() {
    for weight in [0.001, 1.0, 825.5, 12_000.0] {
        assert_eq!(Catch::new(weight, "trout").unwrap().weight(), weight);
    }
}

#[test_case(0.0 ; "zero weight")]
#[test_case(-5.0 ; "negative weight")]
#[test_case(f64::NAN ; "not a number")]
#[test_case(f64::INFINITY ; "infinite weight")]
fn catch_new_rejects_invalid_weight(weight: f64) {
    let err = Catch::new(weight, "trout").unwrap_err();
    assert!(matches!(err, ValidationError::NonPositiveWeight(_)));
}

#[test]
fn with_id_rejects_blank_id() {
    let err = Catch::with_id("  ", 100.0, "", Utc::now()).unwrap_err();
    assert_eq!(err, ValidationError::EmptyField("catch id"));
}

#[test]
fn update_without_fields_changes_nothing() {
    let logged_at = Utc.with_ymd_and_hms(2024, 5, 10, 7, 45, 0).unwrap();
    let mut catch = Catch::with_id("c_1", 700.0, "bass", logged_at).unwrap();
    let original = catch.clone();

    catch.update(CatchUpdate::default());

    assert_eq!(catch, original);
}

#[test]
fn update_applies_valid_weight_and_ignores_negative_weight() {
    let mut catch = Catch::new(700.0, "bass").unwrap();

    catch.update(CatchUpdate {
        weight: Some(750.0),
        fish_type: None,
    });
    assert_eq!(catch.weight(), 750.0);

    catch.update(CatchUpdate {
        weight: Some(-1.0),
        fish_type: None,
    });
    assert_eq!(catch.weight(), 750.0);
    assert_eq!(catch.fish_type(), "bass");
}
