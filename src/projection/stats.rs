//! Derived statistics computed from rates and projection output

use crate::error::{ProjectionError, Result};

/// Annualized rate implied by compounding `rate_per_period` over a year
pub fn effective_annual_rate(rate_per_period: f64, periods_per_year: u32) -> f64 {
    (periods_per_year as f64 * rate_per_period.ln_1p()).exp_m1()
}

/// Rule-of-72 doubling time in years. An approximation; `None` for non-positive rates.
pub fn doubling_time_rule_of_72(annual_rate: f64) -> Option<f64> {
    if annual_rate > 0.0 {
        Some(72.0 / (annual_rate * 100.0))
    } else {
        None
    }
}

/// Exact doubling time in years under nominal-rate compounding
pub fn doubling_time_exact(annual_rate: f64, periods_per_year: u32) -> Option<f64> {
    if annual_rate <= 0.0 {
        return None;
    }
    let rate = annual_rate / periods_per_year as f64;
    Some(std::f64::consts::LN_2 / (periods_per_year as f64 * rate.ln_1p()))
}

/// Deflate a nominal value by `years` of inflation
pub fn inflation_adjusted_value(nominal_value: f64, inflation_rate: f64, years: f64) -> f64 {
    nominal_value / (1.0 + inflation_rate).powf(years)
}

/// Level payment retiring `principal` over `periods` payments at `rate` per period.
///
/// `P r (1+r)^n / ((1+r)^n - 1)`; at a zero rate this degenerates to `P / n`.
pub fn level_payment(principal: f64, rate: f64, periods: u32) -> Result<f64> {
    if periods == 0 {
        return Err(ProjectionError::invalid(
            "horizon_years",
            "loan term must contain at least one payment",
        ));
    }

    if rate == 0.0 {
        return Ok(principal / periods as f64);
    }

    let growth = (1.0 + rate).powi(periods as i32);
    let denominator = growth - 1.0;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(ProjectionError::invalid(
            "annual_rate",
            format!("level payment is undefined for a per-period rate of {:e} over {} periods", rate, periods),
        ));
    }

    let payment = principal * rate * growth / denominator;
    if !payment.is_finite() {
        return Err(ProjectionError::invalid("annual_rate", "level payment is not a finite amount"));
    }
    Ok(payment)
}

/// Constant annual rate at which `initial` decays to `final_amount` over `years`.
///
/// Returned as a positive fraction (0.1 = loses 10% per year).
pub fn annual_decay_rate(initial: f64, final_amount: f64, years: f64) -> Result<f64> {
    if !initial.is_finite() || initial <= 0.0 {
        return Err(ProjectionError::invalid("initial_amount", "must be a positive number"));
    }
    if !final_amount.is_finite() || final_amount < 0.0 {
        return Err(ProjectionError::invalid("final_amount", "must be zero or a positive number"));
    }
    if final_amount > initial {
        return Err(ProjectionError::invalid(
            "final_amount",
            "must not exceed the initial amount for a decaying quantity",
        ));
    }
    if !years.is_finite() || years <= 0.0 {
        return Err(ProjectionError::invalid("years", "must be a positive number"));
    }

    Ok(1.0 - (final_amount / initial).powf(1.0 / years))
}
