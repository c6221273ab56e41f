//! Storage cost projection over a month axis.
//!
//! Stored volume ramps linearly while logs are still inside the retention
//! window, then holds at `monthly_volume * retention_months` once the oldest
//! month expires as fast as new data arrives.

use crate::error::AppError;
use crate::models::{MonthRecord, PaymentPlan, ProjectionResult};
use crate::pricing::PricingRates;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_HORIZON_MONTHS: u32 = 24;
pub const DEFAULT_COMPARE_OPTIONS: [u32; 2] = [6, 12];
/// Upper bound for both the retention period and the displayed horizon (100 years).
pub const MAX_PROJECTION_MONTHS: u32 = 1200;

fn validate_volume(monthly_volume_millions: f64) -> Result<(), AppError> {
    if monthly_volume_millions.is_finite() && monthly_volume_millions > 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidArgument(format!(
            "Monthly event volume must be a positive number, got {monthly_volume_millions}."
        )))
    }
}

fn stored_volume(monthly_volume_millions: f64, retention_months: u32, month: u32) -> f64 {
    monthly_volume_millions * f64::from(month.min(retention_months))
}

/// Projects month-by-month storage cost.
///
/// `display_months` defaults to `retention_months`. Months past retention
/// show the plateau but never count toward the total or the average.
pub fn compute_monthly_projection(
    rates: &PricingRates,
    monthly_volume_millions: f64,
    retention_months: u32,
    plan: PaymentPlan,
    display_months: Option<u32>,
) -> Result<ProjectionResult, AppError> {
    validate_volume(monthly_volume_millions)?;
    if retention_months == 0 {
        return Err(AppError::InvalidArgument(
            "Retention period must be at least 1 month.".into(),
        ));
    }
    if retention_months > MAX_PROJECTION_MONTHS {
        return Err(AppError::InvalidArgument(format!(
            "Retention period must be at most {MAX_PROJECTION_MONTHS} months, got {retention_months}."
        )));
    }
    let display_months = display_months.unwrap_or(retention_months);
    if display_months == 0 {
        return Err(AppError::InvalidArgument(
            "Display horizon must be at least 1 month.".into(),
        ));
    }
    if display_months > MAX_PROJECTION_MONTHS {
        return Err(AppError::InvalidArgument(format!(
            "Display horizon must be at most {MAX_PROJECTION_MONTHS} months, got {display_months}."
        )));
    }

    let monthly_breakdown: Vec<MonthRecord> = (1..=display_months)
        .map(|month| {
            let cumulative = stored_volume(monthly_volume_millions, retention_months, month);
            MonthRecord {
                month,
                cumulative_volume_millions: cumulative,
                period_cost: rates.storage_cost(cumulative, plan),
                is_accumulating: month <= retention_months,
            }
        })
        .collect();

    // Summed over the whole retention window even if the display is shorter.
    let total_cost_over_retention: f64 = (1..=retention_months)
        .map(|month| {
            rates.storage_cost(
                stored_volume(monthly_volume_millions, retention_months, month),
                plan,
            )
        })
        .sum();
    let average_monthly_cost = total_cost_over_retention / f64::from(retention_months);

    debug!(
        volume = monthly_volume_millions,
        retention_months,
        display_months,
        plan = plan.as_label(),
        total = total_cost_over_retention,
        "computed monthly projection"
    );

    Ok(ProjectionResult {
        monthly_volume_millions,
        retention_months,
        display_months,
        plan,
        monthly_breakdown,
        total_cost_over_retention,
        average_monthly_cost,
    })
}

/// Runs one projection per retention option over a shared horizon.
pub fn compute_comparative_projection(
    rates: &PricingRates,
    monthly_volume_millions: f64,
    plan: PaymentPlan,
    retention_options: &[u32],
    horizon_months: u32,
) -> Result<BTreeMap<u32, ProjectionResult>, AppError> {
    if retention_options.is_empty() {
        return Err(AppError::InvalidArgument(
            "At least one retention option is required for a comparison.".into(),
        ));
    }

    let mut results = BTreeMap::new();
    for &retention in retention_options {
        if results.contains_key(&retention) {
            continue;
        }
        let projection = compute_monthly_projection(
            rates,
            monthly_volume_millions,
            retention,
            plan,
            Some(horizon_months),
        )?;
        results.insert(retention, projection);
    }
    Ok(results)
}
