//! Named periodicities and nominal per-period conversions
//!
//! Rates are converted by flat division of the nominal annual rate
//! (`annual_rate / periods_per_year`). This is the declared-nominal convention
//! used for loans and mortgages; it is applied to investment compounding as well
//! and is a simplification, not an effective-rate conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};

/// A named periodicity for compounding or cash-flow events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Annual,
    Semiannual,
    Quarterly,
    Monthly,
    Biweekly,
    Weekly,
    Daily,
}

impl Frequency {
    /// Frequencies accepted for interest compounding
    pub const COMPOUNDING: [Frequency; 5] = [
        Frequency::Annual,
        Frequency::Semiannual,
        Frequency::Quarterly,
        Frequency::Monthly,
        Frequency::Daily,
    ];

    /// Frequencies accepted as a loan payment cadence
    pub const PAYMENT: [Frequency; 3] = [Frequency::Monthly, Frequency::Biweekly, Frequency::Weekly];

    pub const fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::Semiannual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Biweekly => 26,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Annual => "annual",
            Frequency::Semiannual => "semiannual",
            Frequency::Quarterly => "quarterly",
            Frequency::Monthly => "monthly",
            Frequency::Biweekly => "biweekly",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
        }
    }

    /// Resolve a compounding frequency name
    pub fn compounding(name: &str) -> Result<Self> {
        Self::resolve_within(name, &Self::COMPOUNDING, "compounding_frequency")
    }

    /// Resolve a loan payment cadence name
    pub fn payment(name: &str) -> Result<Self> {
        Self::resolve_within(name, &Self::PAYMENT, "payment_frequency")
    }

    /// Check an already-resolved frequency is a loan payment cadence
    pub fn as_payment(self) -> Result<Self> {
        self.ensure_within(&Self::PAYMENT, "payment_frequency")
    }

    /// Check an already-resolved frequency is a compounding frequency
    pub fn as_compounding(self) -> Result<Self> {
        self.ensure_within(&Self::COMPOUNDING, "compounding_frequency")
    }

    /// Reverse lookup for a periods-per-year count
    pub fn from_periods_per_year(periods: u32) -> Option<Self> {
        match periods {
            1 => Some(Frequency::Annual),
            2 => Some(Frequency::Semiannual),
            4 => Some(Frequency::Quarterly),
            12 => Some(Frequency::Monthly),
            26 => Some(Frequency::Biweekly),
            52 => Some(Frequency::Weekly),
            365 => Some(Frequency::Daily),
            _ => None,
        }
    }

    fn resolve_within(name: &str, allowed: &[Frequency], field: &'static str) -> Result<Self> {
        name.parse::<Frequency>()
            .map_err(|_| ProjectionError::invalid(field, format!("unknown frequency `{}`", name)))?
            .ensure_within(allowed, field)
    }

    fn ensure_within(self, allowed: &[Frequency], field: &'static str) -> Result<Self> {
        if allowed.contains(&self) {
            Ok(self)
        } else {
            let names: Vec<&str> = allowed.iter().map(|f| f.as_str()).collect();
            Err(ProjectionError::invalid(
                field,
                format!("`{}` is not one of {}", self, names.join(", ")),
            ))
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "annually" | "yearly" => Ok(Frequency::Annual),
            "semiannual" | "semi-annual" | "semiannually" | "semi-annually" => Ok(Frequency::Semiannual),
            "quarterly" => Ok(Frequency::Quarterly),
            "monthly" => Ok(Frequency::Monthly),
            "biweekly" | "bi-weekly" | "fortnightly" => Ok(Frequency::Biweekly),
            "weekly" => Ok(Frequency::Weekly),
            "daily" => Ok(Frequency::Daily),
            other => Err(ProjectionError::invalid(
                "frequency",
                format!("unknown frequency `{}`", other),
            )),
        }
    }
}

/// Nominal rate per period: `annual_rate / periods_per_year`
pub fn rate_per_period(annual_rate: f64, periods_per_year: u32) -> f64 {
    annual_rate / periods_per_year as f64
}

/// Per-period share of an annual cash-flow total (linear scaling)
pub fn cash_flow_per_period(annual_amount: f64, periods_per_year: u32) -> f64 {
    annual_amount / periods_per_year as f64
}

/// Re-express a per-event amount paid `events_per_year` times on a grid of
/// `periods_per_year` periods. Monthly 100 on a quarterly grid is 300 per quarter.
pub fn rescale_cash_flow(amount_per_event: f64, events_per_year: u32, periods_per_year: u32) -> f64 {
    cash_flow_per_period(amount_per_event * events_per_year as f64, periods_per_year)
}
