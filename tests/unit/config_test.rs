//! Tests for session configuration validation and loading

use std::time::Duration;

use lfg_matchmaker::config::SessionConfig;
use lfg_matchmaker::core::MatchError;

#[test]
fn test_session_config_validation() {
    let valid = SessionConfig::new(2, 2, 2, 6, 1, 3);
    assert!(valid.validate().is_ok());
}

#[test]
fn test_session_config_invalid_instances() {
    let invalid = SessionConfig::new(0, 1, 1, 3, 1, 1);
    assert!(matches!(invalid.validate(), Err(MatchError::InvalidConfig(_))));
}

#[test]
fn test_session_config_invalid_times() {
    let zero_min = SessionConfig::new(1, 1, 1, 3, 0, 1);
    assert!(matches!(zero_min.validate(), Err(MatchError::InvalidConfig(_))));

    let reversed = SessionConfig::new(1, 1, 1, 3, 5, 2);
    let err = reversed.validate().unwrap_err();
    assert!(err.to_string().contains("max_time must be greater than or equal to min_time"));

    let zero_unit = SessionConfig::new(1, 1, 1, 3, 1, 1).with_time_unit_ms(0);
    assert!(matches!(zero_unit.validate(), Err(MatchError::InvalidConfig(_))));
}

#[test]
fn test_session_config_impossible_rosters() {
    for (tanks, healers, dps) in [(1, 1, 2), (0, 3, 9), (3, 0, 9)] {
        let cfg = SessionConfig::new(1, tanks, healers, dps, 1, 1);
        assert!(
            matches!(cfg.validate(), Err(MatchError::ImpossibleMatch { .. })),
            "{tanks}/{healers}/{dps} should be impossible"
        );
    }
}

#[test]
fn test_session_config_warnings() {
    let busy = SessionConfig::new(101, 1, 1, 3, 1, 1);
    assert!(busy.instance_warning().is_some());
    assert!(SessionConfig::new(100, 1, 1, 3, 1, 1).instance_warning().is_none());

    let skewed = SessionConfig::new(1, 1, 1, 11, 1, 1);
    assert!(skewed.imbalance_warning().is_some());
    assert!(SessionConfig::new(1, 1, 1, 10, 1, 1).imbalance_warning().is_none());
    // Warnings never fail validation
    assert!(busy.validate().is_ok());
    assert!(skewed.validate().is_ok());
}

#[test]
fn test_session_config_limits() {
    let cfg = SessionConfig::new(3, 1, 1, 3, 2, 4).with_time_unit_ms(50);
    let limits = cfg.limits();
    assert_eq!(limits.max_instances, 3);
    assert_eq!(limits.min_time, 2);
    assert_eq!(limits.max_time, 4);
    assert_eq!(limits.time_unit, Duration::from_millis(50));
    assert_eq!(cfg.total_players(), 5);
}

#[test]
fn test_session_config_from_json_defaults() {
    let cfg = SessionConfig::from_json_str(
        r#"{"max_instances":2,"tanks":2,"healers":2,"dps":6,"min_time":1,"max_time":3}"#,
    )
    .unwrap();
    assert_eq!(cfg, SessionConfig::new(2, 2, 2, 6, 1, 3));
    assert_eq!(cfg.time_unit_ms, 1000);
    assert_eq!(cfg.seed, None);
    assert_eq!(cfg.grace_secs, 5);
}

#[test]
fn test_session_config_from_json_overrides() {
    let cfg = SessionConfig::from_json_str(
        r#"{"max_instances":1,"tanks":1,"healers":1,"dps":3,"min_time":1,"max_time":1,
            "time_unit_ms":10,"seed":7,"grace_secs":0,"deadline_ms":40}"#,
    )
    .unwrap();
    assert_eq!(cfg.deadline(), Duration::from_millis(40));
    assert_eq!(cfg.time_unit_ms, 10);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.grace_secs, 0);
}

#[test]
fn test_session_config_from_json_rejects() {
    assert!(matches!(
        SessionConfig::from_json_str("not json"),
        Err(MatchError::InvalidConfig(_))
    ));
    assert!(matches!(
        SessionConfig::from_json_str(
            r#"{"max_instances":1,"tanks":1,"healers":1,"dps":2,"min_time":1,"max_time":1}"#
        ),
        Err(MatchError::ImpossibleMatch { tanks: 1, healers: 1, dps: 2 })
    ));
}

#[test]
fn test_session_config_roundtrips_through_json() {
    let cfg = SessionConfig::new(4, 3, 3, 9, 2, 6).with_seed(42);
    let raw = serde_json::to_string(&cfg).unwrap();
    assert_eq!(SessionConfig::from_json_str(&raw).unwrap(), cfg);
}
