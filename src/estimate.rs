use crate::error::AppError;
use crate::models::{Estimate, PaymentPlan, Region};
use crate::pricing::PricingRates;
use crate::units::{BytesUnit, EventsUnit};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_EXCHANGE_RATE_JPY: f64 = 150.0;

/// Inputs of the standard-tier estimate, in the units the user entered them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    pub events: f64,
    pub events_unit: EventsUnit,
    pub bytes: f64,
    pub bytes_unit: BytesUnit,
    pub retention_days: u32,
    pub region: Region,
    pub plan: PaymentPlan,
}

impl Default for EstimateInput {
    fn default() -> Self {
        Self {
            events: 100_000_000.0,
            events_unit: EventsUnit::Events,
            bytes: 1000.0,
            bytes_unit: BytesUnit::Gb,
            retention_days: 15,
            region: Region::Us,
            plan: PaymentPlan::Annual,
        }
    }
}

pub fn compute_estimate(
    rates: &PricingRates,
    input: &EstimateInput,
    exchange_rate_jpy: f64,
) -> Result<Estimate, AppError> {
    if !input.events.is_finite() || input.events <= 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "Log event count must be a positive number, got {}.",
            input.events
        )));
    }
    if !input.bytes.is_finite() || input.bytes < 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "Log byte volume must not be negative, got {}.",
            input.bytes
        )));
    }
    if !exchange_rate_jpy.is_finite() || exchange_rate_jpy <= 0.0 {
        return Err(AppError::Config(format!(
            "Exchange rate must be a positive number, got {exchange_rate_jpy}."
        )));
    }

    let retention_rate =
        rates.lookup_retention_rate(input.region, input.plan, input.retention_days)?;
    let events_millions = input.events_unit.to_millions(input.events);
    let volume_gb = input.bytes_unit.to_gb(input.bytes);

    let ingestion_cost = rates.ingestion_cost(volume_gb);
    let retention_cost = events_millions * retention_rate;
    let total_usd = ingestion_cost + retention_cost;

    debug!(
        events_millions,
        volume_gb,
        region = input.region.as_label(),
        plan = input.plan.as_label(),
        retention_days = input.retention_days,
        total_usd,
        "computed estimate"
    );

    Ok(Estimate {
        events_millions,
        volume_gb,
        region: input.region,
        plan: input.plan,
        retention_days: input.retention_days,
        retention_rate,
        ingestion_cost,
        retention_cost,
        total_usd,
        total_jpy: total_usd * exchange_rate_jpy,
    })
}
