//! Tests for configuration validation

use std::time::Duration;

use ticket_lot::config::{ExecutionMode, SimulationConfig, DEFAULT_CONCURRENCY_LIMIT};

#[test]
fn test_reference_config_is_valid() {
    let cfg = SimulationConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.concurrency_limit, DEFAULT_CONCURRENCY_LIMIT);
    assert_eq!(cfg.processing_delay(), Duration::from_millis(100));
    assert_eq!(cfg.arrival_delay(), Duration::from_millis(50));
    assert_eq!(cfg.execution, ExecutionMode::ThreadPerWorker);
}

#[test]
fn test_zero_workers_invalid() {
    assert!(SimulationConfig::new(0, 5, 3).validate().is_err());
}

#[test]
fn test_zero_tickets_invalid() {
    assert!(SimulationConfig::new(10, 0, 3).validate().is_err());
}

#[test]
fn test_zero_shows_invalid() {
    assert!(SimulationConfig::new(10, 5, 0).validate().is_err());
}

#[test]
fn test_zero_limit_invalid() {
    let cfg = SimulationConfig::new(10, 5, 3).with_concurrency_limit(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_empty_pool_invalid() {
    let cfg = SimulationConfig::new(10, 5, 3).with_execution(ExecutionMode::Pool { threads: 0 });
    assert!(cfg.validate().is_err());
}

#[test]
fn test_pool_per_cpu_has_threads() {
    match ExecutionMode::pool_per_cpu() {
        ExecutionMode::Pool { threads } => assert!(threads >= 1),
        ExecutionMode::ThreadPerWorker => panic!("expected pool mode"),
    }
}

#[test]
fn test_total_tickets() {
    assert_eq!(SimulationConfig::new(1, 15, 3).total_tickets(), 45);
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "workers": 20,
        "tickets_per_show": 15,
        "shows": 3,
        "concurrency_limit": 4,
        "seed": 99,
        "execution": { "mode": "pool", "threads": 2 }
    }"#;

    let cfg = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.workers, 20);
    assert_eq!(cfg.concurrency_limit, 4);
    assert_eq!(cfg.seed, Some(99));
    assert_eq!(cfg.execution, ExecutionMode::Pool { threads: 2 });
    // Omitted fields keep their reference values.
    assert_eq!(cfg.processing_delay_ms, 100);
}

#[test]
fn test_config_from_json_rejects_invalid_values() {
    let json = r#"{ "workers": 0, "tickets_per_show": 1, "shows": 1 }"#;
    assert!(SimulationConfig::from_json_str(json).is_err());
    assert!(SimulationConfig::from_json_str("not json").is_err());
}
