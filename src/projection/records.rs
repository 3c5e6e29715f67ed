//! Output structures for projections

use serde::{Deserialize, Serialize};

use super::engine::ProjectionMode;
use super::schedule::StopReason;

/// One simulated period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Period number (1-indexed)
    pub index: u32,
    pub opening_balance: f64,
    pub interest: f64,
    /// Cash flow actually applied (after any payoff or depletion cap)
    pub cash_flow: f64,
    pub closing_balance: f64,
    pub cumulative_interest: f64,
}

/// Aggregate of the periods belonging to one projection year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    /// Projection year (1-indexed)
    pub year: u32,

    /// Number of periods in this year; the last year can be partial
    pub periods: u32,

    pub start_balance: f64,

    /// Sum of positive cash flows
    pub contributions: f64,

    /// Sum of negative cash flows, as a positive amount
    pub withdrawals: f64,

    pub interest: f64,
    pub end_balance: f64,
}

impl YearSummary {
    /// Fold a window of consecutive period records into a summary
    pub fn from_records(year: u32, records: &[PeriodRecord]) -> Self {
        let start_balance = records.first().map(|r| r.opening_balance).unwrap_or(0.0);
        let end_balance = records.last().map(|r| r.closing_balance).unwrap_or(start_balance);

        records.iter().fold(
            YearSummary {
                year,
                periods: 0,
                start_balance,
                contributions: 0.0,
                withdrawals: 0.0,
                interest: 0.0,
                end_balance,
            },
            |mut acc, r| {
                acc.periods += 1;
                acc.interest += r.interest;
                if r.cash_flow >= 0.0 {
                    acc.contributions += r.cash_flow;
                } else {
                    acc.withdrawals -= r.cash_flow;
                }
                acc
            },
        )
    }

    pub fn net_cash_flow(&self) -> f64 {
        self.contributions - self.withdrawals
    }
}

/// Group period records into `periods_per_year`-sized windows
pub fn summarize_years(records: &[PeriodRecord], periods_per_year: u32) -> Vec<YearSummary> {
    records
        .chunks(periods_per_year.max(1) as usize)
        .enumerate()
        .map(|(i, window)| YearSummary::from_records(i as u32 + 1, window))
        .collect()
}

/// Loan-specific fields of an amortization result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    /// Level payment solved from the amortization formula
    pub level_payment: f64,

    /// Extra principal paid alongside every level payment
    pub extra_payment: f64,

    /// Number of payments in the contractual term
    pub scheduled_periods: u32,

    /// Most payments the schedule was allowed to run
    pub period_bound: u32,

    /// Number of payments actually made
    pub payoff_periods: u32,

    /// Sum of all payments made
    pub total_paid: f64,

    /// Interest over the schedule without extra payments
    pub baseline_total_interest: f64,

    pub interest_saved: f64,
    pub time_saved_periods: u32,
}

/// Where a drawdown ran out of money
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depletion {
    /// Periods elapsed at the zero crossing, interpolated within the final period
    pub periods_elapsed: f64,

    pub years_elapsed: f64,

    /// Age at depletion, when the scenario carries a start age
    pub age: Option<f64>,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub mode: ProjectionMode,
    pub periods_per_year: u32,
    pub rate_per_period: f64,

    pub initial_balance: f64,
    pub terminal_balance: f64,
    pub total_interest: f64,
    pub total_contributions: f64,
    pub total_withdrawals: f64,

    /// Number of periods simulated
    pub period_count: u32,
    pub stop_reason: StopReason,

    pub years: Vec<YearSummary>,

    /// Per-period detail; empty when detailed output is disabled
    pub periods: Vec<PeriodRecord>,

    pub effective_annual_rate: f64,
    pub doubling_time_years: Option<f64>,
    pub inflation_adjusted_value: Option<f64>,

    pub loan: Option<LoanSummary>,
    pub depletion: Option<Depletion>,
}

impl ProjectionResult {
    pub fn net_cash_flow(&self) -> f64 {
        self.total_contributions - self.total_withdrawals
    }

    pub fn elapsed_years(&self) -> f64 {
        self.period_count as f64 / self.periods_per_year as f64
    }

    /// `terminal - initial - interest - net cash flow`; zero up to rounding
    pub fn accounting_residual(&self) -> f64 {
        self.terminal_balance - self.initial_balance - self.total_interest - self.net_cash_flow()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            mode: self.mode,
            period_count: self.period_count,
            years: self.elapsed_years(),
            terminal_balance: self.terminal_balance,
            total_interest: self.total_interest,
            net_cash_flow: self.net_cash_flow(),
            effective_annual_rate: self.effective_annual_rate,
            level_payment: self.loan.map(|l| l.level_payment),
            interest_saved: self.loan.map(|l| l.interest_saved),
            depletion_age: self.depletion.and_then(|d| d.age),
        }
    }
}

/// Flat summary row used for batch comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub mode: ProjectionMode,
    pub period_count: u32,
    pub years: f64,
    pub terminal_balance: f64,
    pub total_interest: f64,
    pub net_cash_flow: f64,
    pub effective_annual_rate: f64,
    pub level_payment: Option<f64>,
    pub interest_saved: Option<f64>,
    pub depletion_age: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(index: u32, opening: f64, interest: f64, cash_flow: f64) -> PeriodRecord {
        PeriodRecord {
            index,
            opening_balance: opening,
            interest,
            cash_flow,
            closing_balance: opening + interest + cash_flow,
            cumulative_interest: 0.0,
        }
    }

    #[test]
    fn test_year_summary_splits_flows_by_sign() {
        let records = [record(1, 100.0, 1.0, 50.0), record(2, 151.0, 1.5, -20.0)];
        let year = YearSummary::from_records(1, &records);

        assert_eq!(year.periods, 2);
        assert_relative_eq!(year.start_balance, 100.0);
        assert_relative_eq!(year.contributions, 50.0);
        assert_relative_eq!(year.withdrawals, 20.0);
        assert_relative_eq!(year.interest, 2.5);
        assert_relative_eq!(year.end_balance, 132.5);
        assert_relative_eq!(year.net_cash_flow(), 30.0);
    }

    #[test]
    fn test_summarize_years_keeps_partial_final_year() {
        let mut records = Vec::new();
        let mut balance = 1000.0;
        for i in 1..=30 {
            let r = record(i, balance, 5.0, -10.0);
            balance = r.closing_balance;
            records.push(r);
        }

        let years = summarize_years(&records, 12);
        assert_eq!(years.len(), 3);
        assert_eq!(years[2].periods, 6);
        assert_eq!(years[2].year, 3);
        assert_relative_eq!(years[1].start_balance, years[0].end_balance);
        assert_relative_eq!(years[2].end_balance, balance);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize_years(&[], 12).is_empty());
    }
}
