use serde::Serialize;

use super::error::{EngineError, EngineResult};

// Rates are percentages as entered by the user (7 means 7% a year); the
// engine converts internally.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPlan {
    pub start_amount: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
    pub inflation_rate_percent: f64,
    pub adjust_for_inflation: bool,
    pub delay_years: u32,
}

impl GrowthPlan {
    pub fn validate(&self) -> EngineResult<()> {
        check_amount("startAmount", self.start_amount)?;
        check_amount("monthlyContribution", self.monthly_contribution)?;
        check_amount("annualRatePercent", self.annual_rate_percent)?;
        check_amount("inflationRatePercent", self.inflation_rate_percent)?;
        check_horizon(self.years)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownPlan {
    pub initial_pot: f64,
    pub monthly_drawdown: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
    pub take_lump_sum: bool,
    pub lump_sum_percent: f64,
}

impl DrawdownPlan {
    pub fn validate(&self) -> EngineResult<()> {
        check_amount("initialPot", self.initial_pot)?;
        check_amount("monthlyDrawdown", self.monthly_drawdown)?;
        check_amount("annualRatePercent", self.annual_rate_percent)?;
        check_percent("lumpSumPercent", self.lump_sum_percent)?;
        check_horizon(self.years)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: u32,
    pub value: f64,
}

// One entry per year from 0 to the horizon inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearlySeries(Vec<YearPoint>);

impl YearlySeries {
    pub fn from_points(points: Vec<YearPoint>) -> Self {
        Self(points)
    }

    pub(crate) fn with_horizon(years: u32) -> Self {
        Self(Vec::with_capacity(years as usize + 1))
    }

    pub(crate) fn push(&mut self, year: u32, value: f64) {
        self.0.push(YearPoint { year, value });
    }

    pub fn points(&self) -> &[YearPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.0.last().map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub balances: YearlySeries,
    pub contributions: YearlySeries,
    pub final_balance: f64,
    pub total_contributed: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownResult {
    pub balances: YearlySeries,
    pub withdrawn: YearlySeries,
    pub final_balance: f64,
    pub total_withdrawn: f64,
    pub lump_sum: f64,
    pub interest_deficit_year: Option<f64>,
}

pub(crate) fn check_amount(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(EngineError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn check_percent(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::NonFinite { field, value });
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(EngineError::PercentOutOfRange { field, value });
    }
    Ok(())
}

pub(crate) fn check_horizon(years: u32) -> EngineResult<()> {
    if years == 0 {
        return Err(EngineError::ZeroHorizon);
    }
    Ok(())
}
