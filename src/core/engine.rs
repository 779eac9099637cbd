use super::error::EngineResult;
use super::types::{DrawdownPlan, DrawdownResult, GrowthPlan, GrowthResult, YearlySeries};

// Monthly compounding with monthly contributions, sampled at year boundaries.
// The simulation always runs in nominal terms; inflation adjustment deflates
// the reported values only, each year by its own exponent. A delayed start
// means nothing is owned or contributed during the delay; the starting lump
// sum is injected only once the delay ends.
pub fn simulate_growth(plan: &GrowthPlan) -> EngineResult<GrowthResult> {
    plan.validate()?;

    let monthly_rate = plan.annual_rate_percent / 100.0 / 12.0;
    let total_months = u64::from(plan.years) * 12;
    let delay_months = u64::from(plan.delay_years) * 12;
    let delayed_start = plan.delay_years > 0;

    let initial = if delayed_start { 0.0 } else { plan.start_amount };
    let mut balance = initial;
    let mut contributed = initial;

    let mut balances = YearlySeries::with_horizon(plan.years);
    let mut contributions = YearlySeries::with_horizon(plan.years);
    balances.push(0, initial.round());
    contributions.push(0, initial.round());

    for month in 1..=total_months {
        let waiting = delayed_start && month <= delay_months;
        if !waiting {
            if delayed_start && month == delay_months + 1 {
                balance = plan.start_amount;
                contributed = plan.start_amount;
            }
            balance *= 1.0 + monthly_rate;
            balance += plan.monthly_contribution;
            contributed += plan.monthly_contribution;
        }
        if month % 12 == 0 {
            let year = (month / 12) as u32;
            balances.push(year, in_reported_terms(plan, balance, year).round());
            contributions.push(year, in_reported_terms(plan, contributed, year).round());
        }
    }

    let final_balance = in_reported_terms(plan, balance, plan.years);
    let total_contributed = in_reported_terms(plan, contributed, plan.years);

    Ok(GrowthResult {
        balances,
        contributions,
        final_balance: final_balance.round(),
        total_contributed: total_contributed.round(),
        total_interest: (final_balance - total_contributed).round(),
    })
}

// Monthly withdrawals against a compounding pot, floored at zero once the pot
// runs out. `total_withdrawn` keeps accumulating the full nominal withdrawal
// even after depletion: it reports income paid out under the plan, not
// capital actually consumed.
pub fn simulate_drawdown(plan: &DrawdownPlan) -> EngineResult<DrawdownResult> {
    plan.validate()?;

    let monthly_rate = plan.annual_rate_percent / 100.0 / 12.0;
    let total_months = u64::from(plan.years) * 12;

    let lump_sum = if plan.take_lump_sum {
        plan.initial_pot * plan.lump_sum_percent / 100.0
    } else {
        0.0
    };
    let mut balance = plan.initial_pot - lump_sum;
    let mut total_withdrawn = 0.0;
    let mut interest_deficit_year = None;

    let mut balances = YearlySeries::with_horizon(plan.years);
    let mut withdrawn = YearlySeries::with_horizon(plan.years);
    balances.push(0, balance.round());
    withdrawn.push(0, 0.0);

    for month in 1..=total_months {
        let monthly_interest = balance * monthly_rate;
        if balance > 0.0
            && interest_deficit_year.is_none()
            && plan.monthly_drawdown > monthly_interest
        {
            interest_deficit_year = Some(fractional_year(month));
        }

        balance += monthly_interest;
        balance -= plan.monthly_drawdown;
        total_withdrawn += plan.monthly_drawdown;
        if balance < 0.0 {
            balance = 0.0;
        }

        if month % 12 == 0 {
            let year = (month / 12) as u32;
            balances.push(year, balance.round());
            withdrawn.push(year, total_withdrawn.round());
        }
    }

    Ok(DrawdownResult {
        balances,
        withdrawn,
        final_balance: balance.round(),
        total_withdrawn: total_withdrawn.round(),
        lump_sum: lump_sum.round(),
        interest_deficit_year,
    })
}

// Month count to a year figure with one decimal, e.g. month 200 -> 16.7.
pub(crate) fn fractional_year(month: u64) -> f64 {
    (month as f64 / 12.0 * 10.0).round() / 10.0
}

fn in_reported_terms(plan: &GrowthPlan, value: f64, year: u32) -> f64 {
    if plan.adjust_for_inflation {
        value / (1.0 + plan.inflation_rate_percent / 100.0).powf(f64::from(year))
    } else {
        value
    }
}
