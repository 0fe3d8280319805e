//! Text and JSON rendering of run reports and sweeps.

use serde::Serialize;
use std::fmt::{self, Write as _};

use crate::core::simulation_engine::RunReport;

use super::SweepPoint;

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MMk Results: lambda = {:.6}, mu = {:.6}, k = {}",
            self.params.arrival_rate(),
            self.params.service_rate(),
            self.params.servers()
        )?;
        writeln!(f, "MMk Total customer served: {}", self.served)?;
        writeln!(
            f,
            "MMk Average queue length: {:.6}",
            self.result.avg_queue_length
        )?;
        writeln!(
            f,
            "MMk Average customer delay in queue: {:.6}",
            self.result.avg_delay
        )?;
        write!(
            f,
            "MMk Time-average server utility: {:.6}",
            self.result.utilization
        )
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

/// Fixed-width table of simulated against analytical figures
pub fn format_sweep_table(points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3} {:>6} {:>10} {:>10} {:>12} {:>12} {:>8} {:>8}",
        "k", "ratio", "Lq(sim)", "Lq(an)", "W(sim)", "W(an)", "U(sim)", "U(an)"
    );
    for point in points {
        let result = &point.report.result;
        let _ = writeln!(
            out,
            "{:>3} {:>6.2} {:>10.4} {:>10} {:>12.6} {:>12} {:>8.4} {:>8}",
            point.servers(),
            point.ratio,
            result.avg_queue_length,
            optional(point.analytical.map(|a| a.lq)),
            result.avg_delay,
            optional(point.analytical.map(|a| a.w)),
            result.utilization,
            optional(point.analytical.map(|a| a.utilization)),
        );
    }
    out
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::{run_sweep, single_run, SweepConfig, SweepPlan};

    #[test]
    fn test_summary_lines() {
        let report = single_run().unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "MMk Results: lambda = 0.083333, mu = 0.133333, k = 1"
        );
        assert_eq!(lines[1], "MMk Total customer served: 100");
        assert!(lines[4].starts_with("MMk Time-average server utility: "));
    }

    #[test]
    fn test_sweep_table_rows() {
        let plan = SweepPlan {
            ratios: vec![0.5, 1.0],
            ..SweepPlan::utilization()
        };
        let points = run_sweep(&plan, &SweepConfig::new()).unwrap();
        let table = format_sweep_table(&points);
        let rows: Vec<&str> = table.lines().collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("Lq(sim)"));
        // ρ = 1 has no steady state
        assert!(rows[2].trim_end().ends_with('-'));
    }

    #[test]
    fn test_json_export() {
        let report = single_run().unwrap();
        let json = to_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["served"], 100);
        assert_eq!(value["seed"], 101);
        assert_eq!(value["params"]["servers"], 1);
        assert!(value["result"]["utilization"].is_number());
    }
}
