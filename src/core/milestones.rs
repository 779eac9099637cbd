use super::engine::fractional_year;
use super::error::{EngineError, EngineResult};
use super::types::{YearlySeries, check_amount, check_horizon};

// Re-runs the nominal accumulation and reports the first month at which
// lifetime interest matches lifetime contributions, i.e. the balance has
// doubled what was paid in. This is a total-to-date comparison, not "this
// year's interest against this year's contribution".
pub fn find_crossover_year(
    start_amount: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: u32,
) -> EngineResult<Option<f64>> {
    check_amount("startAmount", start_amount)?;
    check_amount("monthlyContribution", monthly_contribution)?;
    check_amount("annualRatePercent", annual_rate_percent)?;
    check_horizon(years)?;

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let total_months = u64::from(years) * 12;

    let mut balance = start_amount;
    let mut contributed = start_amount;
    for month in 1..=total_months {
        balance *= 1.0 + monthly_rate;
        balance += monthly_contribution;
        contributed += monthly_contribution;
        if balance - contributed >= contributed {
            return Ok(Some(fractional_year(month)));
        }
    }
    Ok(None)
}

// Earliest sampled year at which the saver could stop contributing and still
// reach the target through compounding alone. The projection is annual, a
// deliberately coarser check than the monthly simulation that produced the
// series. The final year is skipped: with no time left, coasting is moot.
pub fn find_coast_fire_year(
    balances: &YearlySeries,
    annual_rate_percent: f64,
    years: u32,
    target_balance: f64,
) -> EngineResult<Option<u32>> {
    check_amount("annualRatePercent", annual_rate_percent)?;
    check_amount("targetBalance", target_balance)?;
    check_horizon(years)?;

    let expected = years as usize + 1;
    if balances.len() != expected {
        return Err(EngineError::SeriesLength {
            expected,
            actual: balances.len(),
        });
    }
    for point in balances.points() {
        if !point.value.is_finite() {
            return Err(EngineError::NonFinite {
                field: "balances",
                value: point.value,
            });
        }
    }

    let annual_rate = annual_rate_percent / 100.0;
    for (i, point) in balances.points().iter().enumerate().take(years as usize) {
        let remaining = (years as usize - i) as u32;
        let projected = point.value * (1.0 + annual_rate).powf(f64::from(remaining));
        if projected >= target_balance {
            return Ok(Some(i as u32));
        }
    }
    Ok(None)
}
