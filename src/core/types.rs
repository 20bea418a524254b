use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Where the contribution settles once the growth window has passed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthFreeze {
    /// Frozen at `growth_duration_years` steps, one step ahead of the last
    /// in-window year.
    #[default]
    Leading,
    /// Frozen at the contribution of the last in-window year.
    Continuous,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GrowthMode {
    Percent(f64),
    Amount(f64),
}

impl GrowthMode {
    pub fn name(self) -> &'static str {
        match self {
            GrowthMode::Percent(_) => "percent",
            GrowthMode::Amount(_) => "amount",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    pub base_contribution: f64,
    pub duration_years: u32,
    pub growth_rate_percent: Option<f64>,
    pub growth_amount_per_year: Option<f64>,
    pub growth_duration_years: u32,
    pub annual_return_percent: f64,
    pub freeze: GrowthFreeze,
}

impl ProjectionInput {
    /// Amount growth wins whenever it is positive; otherwise percent growth
    /// applies, with zero meaning flat contributions.
    pub fn growth_mode(&self) -> GrowthMode {
        match self.growth_amount_per_year {
            Some(amount) if amount > 0.0 => GrowthMode::Amount(amount),
            _ => GrowthMode::Percent(self.growth_rate_percent.unwrap_or(0.0)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum GrowthApplied {
    Percent(f64),
    Amount(f64),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: u32,
    pub monthly_contribution: f64,
    pub growth_applied: GrowthApplied,
    pub corpus_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub total_contributed: f64,
    pub final_corpus_value: f64,
    pub years: Vec<YearRecord>,
}

impl ProjectionResult {
    pub fn corpus_series(&self) -> Vec<f64> {
        self.years.iter().map(|year| year.corpus_value).collect()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputField {
    BaseContribution,
    DurationYears,
    AnnualReturnPercent,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::BaseContribution => "base contribution",
            InputField::DurationYears => "duration in years",
            InputField::AnnualReturnPercent => "annual return rate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("invalid input: {field} must be > 0 (got {value})")]
    InvalidInput { field: InputField, value: f64 },
}
