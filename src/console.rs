//! Console reporting layer.
//!
//! Pure consumers of configuration and report snapshots; nothing here touches
//! core state.

use std::fmt;

use crate::config::SimulationConfig;
use crate::core::{AppResult, ShowSnapshot, SimulationReport};

const RULE: &str = "================================================================";

/// Run configuration banner.
pub struct ConfigHeader<'a>(pub &'a SimulationConfig);

impl fmt::Display for ConfigHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.0;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{:^64}", "TICKET LOT BOOKING SIMULATION")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "System configuration:")?;
        writeln!(f, "- Total users: {}", cfg.workers)?;
        writeln!(f, "- Tickets per show: {}", cfg.tickets_per_show)?;
        writeln!(f, "- Number of shows: {}", cfg.shows)?;
        writeln!(
            f,
            "- Concurrent booking limit: {} users at a time",
            cfg.concurrency_limit
        )?;
        if let Some(seed) = cfg.seed {
            writeln!(f, "- Selection seed: {seed}")?;
        }
        writeln!(f, "{RULE}")
    }
}

/// Per-show status table, usable for intermediate and final snapshots.
pub struct ShowTable<'a>(pub &'a [ShowSnapshot]);

impl fmt::Display for ShowTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌─────────┬─────────────┬─────────────┬──────────────┐")?;
        writeln!(f, "│ Show ID │ Initial     │ Remaining   │ Booked       │")?;
        writeln!(f, "├─────────┼─────────────┼─────────────┼──────────────┤")?;

        let (mut initial, mut remaining, mut booked) = (0_u64, 0_u64, 0_u64);
        for show in self.0 {
            writeln!(
                f,
                "│ {:>5}   │ {:>7}     │ {:>7}     │ {:>7}      │",
                show.id,
                show.capacity,
                show.available,
                show.booked()
            )?;
            initial += u64::from(show.capacity);
            remaining += u64::from(show.available);
            booked += u64::from(show.booked());
        }

        writeln!(f, "├─────────┼─────────────┼─────────────┼──────────────┤")?;
        writeln!(
            f,
            "│ TOTAL   │ {initial:>7}     │ {remaining:>7}     │ {booked:>7}      │"
        )?;
        writeln!(f, "└─────────┴─────────────┴─────────────┴──────────────┘")
    }
}

/// Final booking report: show table plus statistics.
pub struct FinalReport<'a>(pub &'a SimulationReport);

impl fmt::Display for FinalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{:^64}", "FINAL BOOKING REPORT")?;
        writeln!(f, "{RULE}")?;
        write!(f, "{}", ShowTable(&report.shows))?;

        writeln!(f)?;
        writeln!(f, "Booking statistics:")?;
        writeln!(f, "   Total users: {}", report.totals.workers)?;
        writeln!(f, "   Total tickets available: {}", report.total_capacity())?;
        writeln!(f, "   Total tickets booked: {}", report.total_booked_seats())?;
        writeln!(f, "   Sold-out attempts: {}", report.totals.sold_out)?;
        if report.totals.errors > 0 {
            writeln!(f, "   Failed attempts: {}", report.totals.errors)?;
        }
        writeln!(f, "   Booking success rate: {:.1}%", report.success_rate())?;
        writeln!(
            f,
            "   Peak concurrent bookings: {} (limit {})",
            report.peak_in_flight, report.concurrency_limit
        )?;
        if report.all_sold_out() {
            writeln!(f, "   ALL SHOWS SOLD OUT!")?;
        }
        writeln!(f, "{RULE}")
    }
}

/// Render the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &SimulationReport) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
