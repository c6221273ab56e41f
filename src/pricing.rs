use crate::config::RateOverrides;
use crate::error::AppError;
use crate::models::{PaymentPlan, Region};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const STORAGE_ANNUAL_PER_MILLION: f64 = 0.75;
pub const STORAGE_MONTHLY_PER_MILLION: f64 = 1.125;
pub const INGESTION_PER_GB: f64 = 0.10;

/// Retention lengths the built-in table prices.
pub const RETENTION_DAYS: [u32; 4] = [3, 7, 15, 30];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionRate {
    pub region: Region,
    pub plan: PaymentPlan,
    pub days: u32,
    pub per_million: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRates {
    pub storage_annual_per_million: f64,
    pub storage_monthly_per_million: f64,
    pub ingestion_per_gb: f64,
    pub retention: Vec<RetentionRate>,
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            storage_annual_per_million: STORAGE_ANNUAL_PER_MILLION,
            storage_monthly_per_million: STORAGE_MONTHLY_PER_MILLION,
            ingestion_per_gb: INGESTION_PER_GB,
            retention: built_in_retention_rates(),
        }
    }
}

pub fn built_in_retention_rates() -> Vec<RetentionRate> {
    let rows: [(Region, PaymentPlan, [f64; 4]); 4] = [
        (Region::Us, PaymentPlan::Annual, [1.06, 1.27, 1.70, 2.50]),
        (Region::Us, PaymentPlan::Monthly, [1.59, 1.91, 2.55, 3.75]),
        (Region::Ap, PaymentPlan::Annual, [1.33, 1.59, 2.13, 3.13]),
        (Region::Ap, PaymentPlan::Monthly, [1.99, 2.39, 3.19, 4.69]),
    ];

    rows.into_iter()
        .flat_map(|(region, plan, rates)| {
            RETENTION_DAYS
                .into_iter()
                .zip(rates)
                .map(move |(days, per_million)| RetentionRate {
                    region,
                    plan,
                    days,
                    per_million,
                })
        })
        .collect()
}

fn validate_rate(name: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        warn!(rate = name, value, "rejected non-positive rate override");
        Err(AppError::Config(format!(
            "Rate override '{name}' must be a positive number, got {value}."
        )))
    }
}

impl PricingRates {
    /// Built-in rates with any configured overrides applied on top.
    pub fn with_overrides(overrides: &RateOverrides) -> Result<Self, AppError> {
        let mut rates = Self::default();

        if let Some(v) = overrides.storage_annual_per_million {
            rates.storage_annual_per_million = validate_rate("storage_annual_per_million", v)?;
        }
        if let Some(v) = overrides.storage_monthly_per_million {
            rates.storage_monthly_per_million = validate_rate("storage_monthly_per_million", v)?;
        }
        if let Some(v) = overrides.ingestion_per_gb {
            rates.ingestion_per_gb = validate_rate("ingestion_per_gb", v)?;
        }

        for ov in &overrides.retention {
            let per_million = validate_rate("retention.per_million", ov.per_million)?;
            if ov.days == 0 {
                return Err(AppError::Config(
                    "Retention override must name a positive number of days.".into(),
                ));
            }
            match rates
                .retention
                .iter_mut()
                .find(|r| r.region == ov.region && r.plan == ov.plan && r.days == ov.days)
            {
                Some(row) => row.per_million = per_million,
                None => rates.retention.push(RetentionRate {
                    region: ov.region,
                    plan: ov.plan,
                    days: ov.days,
                    per_million,
                }),
            }
        }

        rates
            .retention
            .sort_by_key(|r| (r.region, r.plan, r.days));
        Ok(rates)
    }

    pub fn storage_rate(&self, plan: PaymentPlan) -> f64 {
        if plan.is_monthly() {
            self.storage_monthly_per_million
        } else {
            self.storage_annual_per_million
        }
    }

    /// Monthly storage charge for `volume_millions` stored events.
    pub fn storage_cost(&self, volume_millions: f64, plan: PaymentPlan) -> f64 {
        volume_millions * self.storage_rate(plan)
    }

    /// One-time ingestion charge. Does not accumulate over the retention axis.
    pub fn ingestion_cost(&self, volume_gb: f64) -> f64 {
        volume_gb * self.ingestion_per_gb
    }

    pub fn lookup_retention_rate(
        &self,
        region: Region,
        plan: PaymentPlan,
        days: u32,
    ) -> Result<f64, AppError> {
        self.retention
            .iter()
            .find(|r| r.region == region && r.plan == plan && r.days == days)
            .map(|r| r.per_million)
            .ok_or(AppError::MissingRate { region, plan, days })
    }

    /// Retention lengths priced for every region/plan pair, ascending.
    pub fn supported_retention_days(&self) -> Vec<u32> {
        let mut days: Vec<u32> = self.retention.iter().map(|r| r.days).collect();
        days.sort_unstable();
        days.dedup();
        days
    }
}
