use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    #[serde(rename = "US", alias = "us")]
    Us,
    #[serde(rename = "AP", alias = "ap")]
    Ap,
}

impl Region {
    pub fn as_label(self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Ap => "AP",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Region::Us),
            "AP" => Ok(Region::Ap),
            _ => Err(AppError::InvalidArgument(format!(
                "Unsupported region '{s}'. Use US or AP."
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPlan {
    Annual,
    Monthly,
}

impl PaymentPlan {
    pub fn as_label(self) -> &'static str {
        match self {
            PaymentPlan::Annual => "annual",
            PaymentPlan::Monthly => "monthly",
        }
    }

    pub fn is_monthly(self) -> bool {
        self == PaymentPlan::Monthly
    }
}

impl fmt::Display for PaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for PaymentPlan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(PaymentPlan::Annual),
            "monthly" => Ok(PaymentPlan::Monthly),
            _ => Err(AppError::InvalidArgument(format!(
                "Unsupported payment plan '{s}'. Use annual or monthly."
            ))),
        }
    }
}

/// One period of a storage projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: u32,
    pub cumulative_volume_millions: f64,
    pub period_cost: f64,
    pub is_accumulating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub monthly_volume_millions: f64,
    pub retention_months: u32,
    pub display_months: u32,
    pub plan: PaymentPlan,
    pub monthly_breakdown: Vec<MonthRecord>,
    /// Sum of period costs over the accumulating months only.
    pub total_cost_over_retention: f64,
    pub average_monthly_cost: f64,
}

impl ProjectionResult {
    pub fn month(&self, month: u32) -> Option<&MonthRecord> {
        self.monthly_breakdown.iter().find(|r| r.month == month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub events_millions: f64,
    pub volume_gb: f64,
    pub region: Region,
    pub plan: PaymentPlan,
    pub retention_days: u32,
    pub retention_rate: f64,
    pub ingestion_cost: f64,
    pub retention_cost: f64,
    pub total_usd: f64,
    pub total_jpy: f64,
}
