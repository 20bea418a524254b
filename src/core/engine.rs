use tracing::debug;

use super::types::{
    GrowthApplied, GrowthFreeze, GrowthMode, InputField, ProjectionError, ProjectionInput,
    ProjectionResult, YearRecord,
};

const MONTHS_PER_YEAR: u32 = 12;

pub fn project(input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
    validate(input)?;

    let mode = input.growth_mode();
    let monthly_rate = input.annual_return_percent / 100.0 / MONTHS_PER_YEAR as f64;
    let year_compounding = (1.0 + monthly_rate).powi(MONTHS_PER_YEAR as i32);
    let annuity_factor = ordinary_annuity_factor(monthly_rate, MONTHS_PER_YEAR);

    let mut corpus = 0.0;
    let mut total_contributed = 0.0;
    let mut years = Vec::with_capacity(input.duration_years as usize);

    for year in 1..=input.duration_years {
        let contribution = monthly_contribution(input, mode, year);

        let compounded_prior = corpus * year_compounding;
        let year_fv = contribution * annuity_factor;
        corpus = compounded_prior + year_fv;
        total_contributed += contribution * MONTHS_PER_YEAR as f64;

        years.push(YearRecord {
            year,
            monthly_contribution: contribution,
            growth_applied: growth_applied(mode, year, input.growth_duration_years),
            corpus_value: corpus,
        });
    }

    debug!(
        years = input.duration_years,
        mode = mode.name(),
        total_contributed,
        final_corpus = corpus,
        "projection complete"
    );

    Ok(ProjectionResult {
        total_contributed,
        final_corpus_value: corpus,
        years,
    })
}

fn validate(input: &ProjectionInput) -> Result<(), ProjectionError> {
    if !(input.base_contribution.is_finite() && input.base_contribution > 0.0) {
        return Err(ProjectionError::InvalidInput {
            field: InputField::BaseContribution,
            value: input.base_contribution,
        });
    }
    if input.duration_years == 0 {
        return Err(ProjectionError::InvalidInput {
            field: InputField::DurationYears,
            value: 0.0,
        });
    }
    if !(input.annual_return_percent.is_finite() && input.annual_return_percent > 0.0) {
        return Err(ProjectionError::InvalidInput {
            field: InputField::AnnualReturnPercent,
            value: input.annual_return_percent,
        });
    }
    Ok(())
}

/// Growth steps applied to the base contribution in `year`.
fn growth_steps(year: u32, growth_duration_years: u32, freeze: GrowthFreeze) -> u32 {
    if year <= growth_duration_years {
        return year - 1;
    }
    match freeze {
        GrowthFreeze::Leading => growth_duration_years,
        GrowthFreeze::Continuous => growth_duration_years.saturating_sub(1),
    }
}

fn monthly_contribution(input: &ProjectionInput, mode: GrowthMode, year: u32) -> f64 {
    let steps = growth_steps(year, input.growth_duration_years, input.freeze);
    match mode {
        GrowthMode::Amount(amount) => input.base_contribution + amount * steps as f64,
        GrowthMode::Percent(rate) => {
            let exponent = i32::try_from(steps).unwrap_or(i32::MAX);
            input.base_contribution * (1.0 + rate / 100.0).powi(exponent)
        }
    }
}

fn growth_applied(mode: GrowthMode, year: u32, growth_duration_years: u32) -> GrowthApplied {
    if year > growth_duration_years {
        return GrowthApplied::None;
    }
    match mode {
        GrowthMode::Percent(rate) => GrowthApplied::Percent(rate),
        GrowthMode::Amount(amount) => GrowthApplied::Amount(amount),
    }
}

/// Future value of `periods` end-of-period payments of 1 at `rate` per period.
fn ordinary_annuity_factor(rate: f64, periods: u32) -> f64 {
    if rate == 0.0 {
        return periods as f64;
    }
    ((1.0 + rate).powi(periods as i32) - 1.0) / rate
}
