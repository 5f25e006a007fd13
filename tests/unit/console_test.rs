//! Tests for console rendering of real simulation reports

use std::time::Duration;

use ticket_lot::builders::build_simulation;
use ticket_lot::config::SimulationConfig;
use ticket_lot::console::{render_json, FinalReport, ShowTable};

#[test]
fn test_final_report_for_sold_out_run() {
    let cfg = SimulationConfig::new(5, 1, 1)
        .with_processing_delay(Duration::ZERO)
        .with_arrival_delay(Duration::ZERO);
    let report = build_simulation(&cfg).unwrap().run().unwrap();

    let text = FinalReport(&report).to_string();
    assert!(text.contains("Total tickets booked: 1"));
    assert!(text.contains("Sold-out attempts: 4"));
    assert!(text.contains("Booking success rate: 20.0%"));
    assert!(text.contains("ALL SHOWS SOLD OUT!"));
}

#[test]
fn test_intermediate_table_from_registry() {
    let cfg = SimulationConfig::new(1, 3, 2);
    let sim = build_simulation(&cfg).unwrap();
    let snapshot = sim.registry().snapshot();
    let text = ShowTable(&snapshot).to_string();
    assert_eq!(text.lines().filter(|l| l.starts_with("│ ")).count(), 4);
}

#[test]
fn test_json_report_shape() {
    let cfg = SimulationConfig::new(3, 2, 1)
        .with_processing_delay(Duration::ZERO)
        .with_arrival_delay(Duration::ZERO);
    let report = build_simulation(&cfg).unwrap().run().unwrap();

    let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
    assert_eq!(json["totals"]["booked"], 2);
    assert_eq!(json["totals"]["sold_out"], 1);
    assert_eq!(json["shows"][0]["available"], 0);
    assert_eq!(json["workers"].as_array().unwrap().len(), 3);
}
