//! Tests for builders

use lfg_matchmaker::builders::{build_engine, duration_source};
use lfg_matchmaker::config::SessionConfig;
use lfg_matchmaker::core::{DurationSource, MatchError, SlotStatus};
use lfg_matchmaker::runtime::TokioSpawner;

#[test]
fn test_seeded_duration_source_repeats() {
    let cfg = SessionConfig::new(1, 1, 1, 3, 1, 10).with_seed(5);
    let mut first = duration_source(&cfg);
    let mut second = duration_source(&cfg);
    let a: Vec<u64> = (0..16).map(|_| first.draw(1, 10)).collect();
    let b: Vec<u64> = (0..16).map(|_| second.draw(1, 10)).collect();
    assert_eq!(a, b);
    assert!(a.iter().all(|d| (1..=10).contains(d)));
}

#[tokio::test]
async fn test_build_engine_from_config() {
    let cfg = SessionConfig::new(3, 1, 1, 3, 1, 2);
    let engine = build_engine(&cfg, TokioSpawner::current()).unwrap();
    assert_eq!(engine.limits().max_instances, 3);
    assert_eq!(engine.instance_statuses(), vec![SlotStatus::Empty; 3]);
    assert_eq!(engine.snapshot().groups_formed, 0);
}

#[tokio::test]
async fn test_build_engine_rejects_invalid_config() {
    let cfg = SessionConfig::new(1, 1, 1, 2, 1, 1);
    let err = build_engine(&cfg, TokioSpawner::current()).err().unwrap();
    assert!(matches!(err, MatchError::ImpossibleMatch { .. }));
}
