//! Console banner and end-of-session summary text.

use std::fmt::Write as _;

use super::session::SessionReport;

const BANNER_RULE: &str = "==========================================";
const SUMMARY_RULE: &str = "====================";

/// Startup banner.
pub fn banner() -> String {
    format!("{BANNER_RULE}\n  Looking for Group Synchronization\n{BANNER_RULE}\n")
}

/// Unit label for service time totals.
fn time_label(time_unit_ms: u64) -> String {
    if time_unit_ms == 1000 {
        "seconds".to_string()
    } else {
        format!("time units ({time_unit_ms}ms each)")
    }
}

/// Summary block: totals plus per-instance usage with 1-based labels.
pub fn render_summary(report: &SessionReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    let _ = writeln!(out, "\n{SUMMARY_RULE}");
    let _ = writeln!(out, "       Summary");
    let _ = writeln!(out, "{SUMMARY_RULE}");
    let _ = writeln!(out, "Total parties served: {}", stats.parties_served);
    let _ = writeln!(
        out,
        "Total time served: {} {}",
        stats.total_service_units,
        time_label(report.config.time_unit_ms)
    );
    let _ = writeln!(out, "\nInstance usage breakdown:");
    for (index, served) in stats.per_instance_served.iter().enumerate() {
        let _ = writeln!(out, "Instance {} served {} parties", index + 1, served);
    }
    let waiting = stats.waiting;
    if waiting.tank + waiting.healer + waiting.dps > 0 {
        let _ = writeln!(
            out,
            "\nUnmatched players: {} tank, {} healer, {} dps",
            waiting.tank, waiting.healer, waiting.dps
        );
    }
    if report.timed_out {
        let _ = writeln!(out, "\nSession stopped at its deadline before all parties finished.");
    }
    let _ = writeln!(out, "{SUMMARY_RULE}");
    out
}
