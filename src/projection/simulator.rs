//! Single-period balance step

/// Outcome of advancing a balance by one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodStep {
    /// Interest accrued on the opening balance
    pub interest: f64,

    /// Balance after interest and the period's cash flow
    pub new_balance: f64,
}

/// Advance `balance` by one period.
///
/// Interest accrues on the opening balance and the signed cash flow is applied at
/// the end of the period (positive = contribution, negative = payment or withdrawal).
#[inline]
pub fn advance(balance: f64, rate_per_period: f64, cash_flow: f64) -> PeriodStep {
    let interest = balance * rate_per_period;
    PeriodStep {
        interest,
        new_balance: balance + interest + cash_flow,
    }
}
