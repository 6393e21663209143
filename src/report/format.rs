//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use std::collections::BTreeMap;

use crate::domain::ScenarioRow;
use crate::report::LtvReport;

const CURRENCY: &str = "$";

/// Format the full run summary (settings + fit + LTV overview + break-even).
pub fn format_run_summary(report: &LtvReport) -> String {
    let mut out = String::new();
    let inputs = &report.inputs;
    let result = &report.result;

    out.push_str("=== ltv - LTV Prediction ===\n");
    out.push_str(&format!("ARPDAU: {CURRENCY}{}\n", inputs.arpdau));
    out.push_str(&format!("CPI: {CURRENCY}{}\n", inputs.cpi));
    out.push_str(&format!("ROAS goal: {}%\n", inputs.roas_goal_percent));
    out.push_str(&format!("Horizon: D{}\n", inputs.horizon_day));
    out.push_str(&format!("Retention: {}\n", fmt_observations(report)));

    let p = &report.fit.params;
    let q = &report.fit.quality;
    out.push_str("\nPower curve (retention = a * day^-b):\n");
    out.push_str(&format!("- a: {:.6}\n", p.a));
    out.push_str(&format!("- b: {:.6}\n", p.b));
    out.push_str(&format!(
        "- SSE={:.3e} RMSE={:.5} iterations={} n={}\n",
        q.sse, q.rmse, q.iterations, q.n
    ));

    out.push_str("\nProjection:\n");
    out.push_str(&format!("- LTV: {CURRENCY}{}\n", result.ltv));
    out.push_str(&format!("- LTV lifetime (days): {}\n", result.lifetime_days));
    out.push_str(&format!("- ROAS: {}%\n", result.roas_percent));
    out.push_str(&format!("- Break-even day: {}\n", fmt_break_even(result.break_even_day)));

    out.push_str("\nLTV overview:\n");
    out.push_str(&format_day_ltv(&result.standard_day_ltv));

    out
}

/// Format a day -> LTV table, one `LTV (Dn)` line per day.
pub fn format_day_ltv(table: &BTreeMap<u32, f64>) -> String {
    let mut out = String::new();
    for (day, ltv) in table {
        out.push_str(&format!("LTV (D{day}): {CURRENCY}{ltv:.2}\n"));
    }
    out
}

/// Format a break-even scenario sweep.
pub fn format_scenarios(rows: &[ScenarioRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>8} {:>10} {:>10} {:>12} {:>12}\n",
            "cpi", "goal_%", "be_day", "ltv_at_be", "roas_720_%"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<8} {:-<10} {:-<10} {:-<12} {:-<12}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for r in rows {
        let day = if r.break_even_day > 0 {
            format!("D{}", r.break_even_day)
        } else {
            "-".to_string()
        };
        out.push_str(
            format!(
                "{:>8.2} {:>10.1} {:>10} {:>12.3} {:>12.3}\n",
                r.cpi, r.roas_goal_percent, day, r.ltv_at_break_even, r.max_roas_percent
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_break_even(day: u32) -> String {
    if day > 0 {
        format!("D{day}")
    } else {
        "not reached within 720 days".to_string()
    }
}

fn fmt_observations(report: &LtvReport) -> String {
    let parts: Vec<String> = report
        .observations
        .iter()
        .map(|o| format!("D{}={:.2}%", o.day, o.retention * 100.0))
        .collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_table_lines() {
        let mut t = BTreeMap::new();
        t.insert(1, 0.65);
        t.insert(7, 1.5);
        assert_eq!(format_day_ltv(&t), "LTV (D1): $0.65\nLTV (D7): $1.50\n");
    }

    #[test]
    fn scenario_table_marks_unreached() {
        let rows = [
            ScenarioRow {
                cpi: 1.0,
                roas_goal_percent: 120.0,
                break_even_day: 14,
                ltv_at_break_even: 1.2,
                max_roas_percent: 800.0,
            },
            ScenarioRow {
                cpi: 10.0,
                roas_goal_percent: 120.0,
                break_even_day: 0,
                ltv_at_break_even: 0.0,
                max_roas_percent: 80.0,
            },
        ];
        let txt = format_scenarios(&rows);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("D14"));
        assert!(lines[3].contains(" -"));
    }

    #[test]
    fn break_even_label() {
        assert_eq!(fmt_break_even(0), "not reached within 720 days");
        assert_eq!(fmt_break_even(42), "D42");
    }
}
