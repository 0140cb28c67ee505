//! Tests for error types

use lfg_matchmaker::core::{MatchError, SlotStatus, SlotStatusLabel};

#[test]
fn test_invalid_config_error() {
    let err = MatchError::InvalidConfig("max_instances must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_instances must be greater than 0"
    );
}

#[test]
fn test_impossible_match_error() {
    let err = MatchError::ImpossibleMatch {
        tanks: 1,
        healers: 1,
        dps: 2,
    };
    assert_eq!(
        format!("{}", err),
        "impossible match: 1 tank(s), 1 healer(s), 2 dps cannot form a party"
    );
}

#[test]
fn test_invalid_transition_error() {
    let err = MatchError::InvalidTransition {
        index: 2,
        from: SlotStatusLabel::Status(SlotStatus::Active),
        action: "reserve",
    };
    assert_eq!(format!("{}", err), "instance 2: cannot reserve a slot that is active");

    let missing = MatchError::InvalidTransition {
        index: 9,
        from: SlotStatusLabel::Missing,
        action: "release",
    };
    assert_eq!(format!("{}", missing), "instance 9: cannot release a slot that is missing");
}

#[test]
fn test_lifecycle_errors() {
    assert_eq!(format!("{}", MatchError::AlreadyStarted), "matcher already started");
    assert_eq!(
        format!("{}", MatchError::Matcher("thread panicked".to_string())),
        "matcher error: thread panicked"
    );
    assert_eq!(format!("{}", MatchError::InputClosed), "input closed");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let err: MatchError = io.into();
    assert!(matches!(err, MatchError::Io(_)));
    assert_eq!(format!("{}", err), "io error: pipe closed");
}

#[test]
fn test_anyhow_wraps_match_error() {
    let result: lfg_matchmaker::core::AppResult<()> = Err(MatchError::AlreadyStarted.into());
    let err = result.unwrap_err();
    assert!(err.downcast_ref::<MatchError>().is_some());
}
