//! Tests for utility helpers

use lfg_matchmaker::util::{init_tracing, DEFAULT_FILTER};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialized twice without panicking");
}

#[test]
fn test_default_filter() {
    assert_eq!(DEFAULT_FILTER, "info");
}
