//! Display shapes handed to the chart, table and headline sinks.
//!
//! Currency strings use the rupee sign and Indian digit grouping
//! (`1,23,45,678`): the three lowest integer digits form one group and the
//! rest are grouped in pairs.

use serde::Serialize;
use std::fmt::Write;

use super::types::{GrowthApplied, ProjectionResult, YearRecord};

const RUPEE: &str = "₹";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn from_result(result: &ProjectionResult) -> Self {
        Self {
            labels: result
                .years
                .iter()
                .map(|year| format!("Year {}", year.year))
                .collect(),
            values: result.corpus_series(),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub year: u32,
    pub monthly_contribution: String,
    pub growth: String,
    pub rate_of_return: String,
    pub corpus_value: String,
}

impl TableRow {
    pub fn from_record(record: &YearRecord, annual_return_percent: f64) -> Self {
        let growth = match record.growth_applied {
            GrowthApplied::Amount(amount) => format!("{RUPEE}{amount:.2}"),
            GrowthApplied::Percent(rate) => format!("{}%", format_indian(rate, 2)),
            GrowthApplied::None => "-".to_string(),
        };
        Self {
            year: record.year,
            monthly_contribution: format!("{RUPEE}{:.2}", record.monthly_contribution),
            growth,
            rate_of_return: format!("{}%", format_indian(annual_return_percent, 2)),
            corpus_value: rupees_rounded(record.corpus_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_contributed: String,
    pub final_corpus_value: String,
    pub rows: Vec<TableRow>,
}

impl Summary {
    pub fn from_result(result: &ProjectionResult, annual_return_percent: f64) -> Self {
        Self {
            total_contributed: rupees_rounded(result.total_contributed),
            final_corpus_value: rupees_rounded(result.final_corpus_value),
            rows: result
                .years
                .iter()
                .map(|record| TableRow::from_record(record, annual_return_percent))
                .collect(),
        }
    }
}

fn rupees_rounded(value: f64) -> String {
    format!("{RUPEE}{}", format_indian(value.round(), 0))
}

pub fn format_indian(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + fixed.len() / 2);
    if integer.len() > 3 {
        let (head, tail) = integer.split_at(integer.len() - 3);
        let lead = head.len() % 2;
        if lead == 1 {
            grouped.push_str(&head[..1]);
        }
        for (idx, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
            if idx > 0 || lead == 1 {
                grouped.push(',');
            }
            grouped.push_str(std::str::from_utf8(pair).unwrap_or_default());
        }
        grouped.push(',');
        grouped.push_str(tail);
    } else {
        grouped.push_str(integer);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        grouped.insert(0, '-');
    }
    grouped
}

/// Text rendering of the yearly breakdown followed by the headline totals.
pub fn render_table(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>16}  {:>10}  {:>8}  {:>18}",
        "Year", "Monthly SIP", "Growth", "Return", "Corpus"
    );
    let _ = writeln!(out, "{}", "-".repeat(64));
    for row in &summary.rows {
        let _ = writeln!(
            out,
            "{:>4}  {:>16}  {:>10}  {:>8}  {:>18}",
            row.year, row.monthly_contribution, row.growth, row.rate_of_return, row.corpus_value
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total invested: {}", summary.total_contributed);
    let _ = writeln!(out, "Future value:   {}", summary.final_corpus_value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ProjectionResult {
        ProjectionResult {
            total_contributed: 36_000.0,
            final_corpus_value: 12_345_678.4,
            years: vec![
                YearRecord {
                    year: 1,
                    monthly_contribution: 1_000.0,
                    growth_applied: GrowthApplied::Amount(500.0),
                    corpus_value: 12_682.503,
                },
                YearRecord {
                    year: 2,
                    monthly_contribution: 1_500.0,
                    growth_applied: GrowthApplied::Percent(1_250.5),
                    corpus_value: 33_315.61,
                },
                YearRecord {
                    year: 3,
                    monthly_contribution: 2_000.0,
                    growth_applied: GrowthApplied::None,
                    corpus_value: 12_345_678.4,
                },
            ],
        }
    }

    #[test]
    fn format_indian_groups_in_pairs_above_thousands() {
        assert_eq!(format_indian(0.0, 0), "0");
        assert_eq!(format_indian(999.0, 0), "999");
        assert_eq!(format_indian(1_000.0, 0), "1,000");
        assert_eq!(format_indian(12_683.0, 0), "12,683");
        assert_eq!(format_indian(123_456.0, 0), "1,23,456");
        assert_eq!(format_indian(12_345_678.0, 0), "1,23,45,678");
        assert_eq!(format_indian(1_234_567.25, 2), "12,34,567.25");
        assert_eq!(format_indian(12.0, 2), "12.00");
        assert_eq!(format_indian(-54_321.0, 0), "-54,321");
    }

    #[test]
    fn table_rows_follow_calculator_formatting() {
        let result = sample_result();
        let rows: Vec<TableRow> = result
            .years
            .iter()
            .map(|record| TableRow::from_record(record, 12.0))
            .collect();

        assert_eq!(rows[0].monthly_contribution, "₹1000.00");
        assert_eq!(rows[0].growth, "₹500.00");
        assert_eq!(rows[0].rate_of_return, "12.00%");
        assert_eq!(rows[0].corpus_value, "₹12,683");
        assert_eq!(rows[1].growth, "1,250.50%");
        assert_eq!(rows[2].growth, "-");
        assert_eq!(rows[2].corpus_value, "₹1,23,45,678");
    }

    #[test]
    fn summary_rounds_headline_totals() {
        let summary = Summary::from_result(&sample_result(), 12.0);
        assert_eq!(summary.total_contributed, "₹36,000");
        assert_eq!(summary.final_corpus_value, "₹1,23,45,678");
        assert_eq!(summary.rows.len(), 3);
    }

    #[test]
    fn chart_series_labels_each_year() {
        let chart = ChartSeries::from_result(&sample_result());
        let points: Vec<(&str, f64)> = chart.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], ("Year 1", 12_682.503));
        assert_eq!(points[2].0, "Year 3");
    }

    #[test]
    fn render_table_lists_rows_and_totals() {
        let text = render_table(&Summary::from_result(&sample_result(), 8.5));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("Monthly SIP"));
        assert_eq!(lines.len(), 2 + 3 + 1 + 2);
        assert!(lines[2].contains("₹1000.00"));
        assert!(lines[2].contains("8.50%"));
        assert!(text.contains("Total invested: ₹36,000"));
        assert!(text.contains("Future value:   ₹1,23,45,678"));
    }
}
