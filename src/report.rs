//! Presentation of calculation results.
//!
//! Results are first turned into plain view models, then rendered as a text
//! table, CSV or JSON. Nothing here touches pricing logic.

use crate::error::AppError;
use crate::format::{format_event_count, format_jpy, format_number, format_usd};
use crate::models::{Estimate, ProjectionResult};
use crate::pricing::PricingRates;
use crate::units::EventsUnit;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub fn parse_format(input: &str, allow_csv: bool) -> Result<OutputFormat, AppError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "csv" if allow_csv => Ok(OutputFormat::Csv),
        _ if allow_csv => Err(AppError::InvalidArgument(
            "Unsupported output format. Use table, json, or csv".into(),
        )),
        _ => Err(AppError::InvalidArgument(
            "Unsupported output format. Use table or json".into(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub month: u32,
    pub cumulative_volume: String,
    pub cost: String,
    pub phase: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionView {
    pub title: String,
    pub rows: Vec<ProjectionRow>,
    pub total: String,
    pub average: String,
    pub plateau_note: Option<String>,
}

pub fn projection_view(result: &ProjectionResult) -> ProjectionView {
    let rows = result
        .monthly_breakdown
        .iter()
        .map(|r| ProjectionRow {
            month: r.month,
            cumulative_volume: format!("{:.1}", r.cumulative_volume_millions),
            cost: format_usd(r.period_cost),
            phase: if r.is_accumulating {
                "accumulating"
            } else {
                "plateau"
            },
        })
        .collect();

    let plateau_note = (result.display_months > result.retention_months).then(|| {
        format!(
            "After month {}, expiring logs balance new ingest and cost holds at {}.",
            result.retention_months,
            format_usd(
                result
                    .month(result.retention_months)
                    .map(|r| r.period_cost)
                    .unwrap_or_default()
            )
        )
    });

    ProjectionView {
        title: format!(
            "{} M events/month, {}-month retention, {} plan",
            format_number(result.monthly_volume_millions),
            result.retention_months,
            result.plan
        ),
        rows,
        total: format_usd(result.total_cost_over_retention),
        average: format_usd(result.average_monthly_cost),
        plateau_note,
    }
}

pub fn render_projection_table(view: &ProjectionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(
        out,
        "{:>5}  {:>18}  {:>14}  {}",
        "month", "stored (M events)", "storage cost", "phase"
    );
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:>5}  {:>18}  {:>14}  {}",
            row.month, row.cumulative_volume, row.cost, row.phase
        );
    }
    let _ = writeln!(out, "total over retention: {}", view.total);
    let _ = writeln!(out, "monthly average: {}", view.average);
    if let Some(note) = &view.plateau_note {
        let _ = writeln!(out, "{note}");
    }
    out
}

pub fn render_projection_csv(result: &ProjectionResult) -> String {
    let mut out = String::from("month,cumulative_volume_millions,period_cost,is_accumulating\n");
    for r in &result.monthly_breakdown {
        let _ = writeln!(
            out,
            "{},{},{:.8},{}",
            r.month, r.cumulative_volume_millions, r.period_cost, r.is_accumulating
        );
    }
    out
}

pub fn render_comparison_table(results: &BTreeMap<u32, ProjectionResult>) -> String {
    let mut out = String::new();
    let horizon = results
        .values()
        .map(|p| p.display_months)
        .max()
        .unwrap_or_default();

    let _ = write!(out, "{:>5}", "month");
    for retention in results.keys() {
        let _ = write!(out, "  {:>14}", format!("{retention}-month"));
    }
    out.push('\n');

    for month in 1..=horizon {
        let _ = write!(out, "{month:>5}");
        for p in results.values() {
            let cell = p
                .month(month)
                .map(|r| {
                    let marker = if r.is_accumulating { "" } else { "*" };
                    format!("{}{marker}", format_usd(r.period_cost))
                })
                .unwrap_or_default();
            let _ = write!(out, "  {cell:>14}");
        }
        out.push('\n');
    }

    for (retention, p) in results {
        let _ = writeln!(
            out,
            "{retention}-month retention: total {}, average {}",
            format_usd(p.total_cost_over_retention),
            format_usd(p.average_monthly_cost)
        );
    }
    out.push_str("* plateau month, excluded from totals\n");
    out
}

pub fn render_comparison_csv(results: &BTreeMap<u32, ProjectionResult>) -> String {
    let mut out = String::from(
        "retention_months,month,cumulative_volume_millions,period_cost,is_accumulating\n",
    );
    for (retention, p) in results {
        for r in &p.monthly_breakdown {
            let _ = writeln!(
                out,
                "{},{},{},{:.8},{}",
                retention, r.month, r.cumulative_volume_millions, r.period_cost, r.is_accumulating
            );
        }
    }
    out
}

pub fn render_estimate_table(estimate: &Estimate) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} events, {} GB, {} region, {} plan, {}-day retention",
        format_event_count(estimate.events_millions, EventsUnit::Millions),
        format_number(estimate.volume_gb),
        estimate.region,
        estimate.plan,
        estimate.retention_days
    );
    let _ = writeln!(out, "ingestion:  {}", format_usd(estimate.ingestion_cost));
    let _ = writeln!(
        out,
        "retention:  {} ({}/M events)",
        format_usd(estimate.retention_cost),
        format_usd(estimate.retention_rate)
    );
    let _ = writeln!(out, "total:      {}", format_usd(estimate.total_usd));
    let _ = writeln!(out, "total JPY:  {}", format_jpy(estimate.total_jpy));
    out
}

pub fn render_rates_table(rates: &PricingRates) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "storage (per M events/month): annual ${}, monthly ${}",
        rates.storage_annual_per_million, rates.storage_monthly_per_million
    );
    let _ = writeln!(out, "ingestion (per GB): ${}", rates.ingestion_per_gb);
    let days: Vec<String> = rates
        .supported_retention_days()
        .iter()
        .map(u32::to_string)
        .collect();
    let _ = writeln!(out, "retention lengths (days): {}", days.join(", "));
    let _ = writeln!(out, "{:<6}  {:<8}  {:>5}  {:>10}", "region", "plan", "days", "per M");
    for r in &rates.retention {
        let _ = writeln!(
            out,
            "{:<6}  {:<8}  {:>5}  {:>10}",
            r.region.as_label(),
            r.plan.as_label(),
            r.days,
            format_usd(r.per_million)
        );
    }
    out
}

#[derive(Debug, Serialize)]
struct JsonReport<'a, T: Serialize> {
    kind: &'static str,
    generated_at: DateTime<Utc>,
    data: &'a T,
}

pub fn render_json<T: Serialize>(kind: &'static str, data: &T) -> Result<String, AppError> {
    let report = JsonReport {
        kind,
        generated_at: Utc::now(),
        data,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentPlan;
    use crate::projection::{compute_comparative_projection, compute_monthly_projection};

    fn sample() -> ProjectionResult {
        compute_monthly_projection(
            &PricingRates::default(),
            1.0,
            12,
            PaymentPlan::Annual,
            Some(24),
        )
        .unwrap()
    }

    #[test]
    fn parse_format_respects_csv_support() {
        assert_eq!(parse_format("JSON", true).unwrap(), OutputFormat::Json);
        assert_eq!(parse_format("csv", true).unwrap(), OutputFormat::Csv);
        let err = parse_format("csv", false).expect_err("csv not allowed");
        assert!(err.to_string().contains("Use table or json"));
        assert!(parse_format("xml", true).is_err());
    }

    #[test]
    fn projection_view_formats_rows_and_totals() {
        let view = projection_view(&sample());
        assert_eq!(view.rows.len(), 24);
        assert_eq!(view.rows[0].cost, "$0.75");
        assert_eq!(view.rows[11].cumulative_volume, "12.0");
        assert_eq!(view.rows[11].phase, "accumulating");
        assert_eq!(view.rows[12].phase, "plateau");
        assert_eq!(view.total, "$58.50");
        assert_eq!(view.average, "$4.88");
        assert!(view
            .plateau_note
            .as_deref()
            .unwrap()
            .contains("After month 12"));
        assert_eq!(view.title, "1 M events/month, 12-month retention, annual plan");
    }

    #[test]
    fn projection_without_plateau_has_no_note() {
        let p = compute_monthly_projection(
            &PricingRates::default(),
            2.0,
            6,
            PaymentPlan::Monthly,
            None,
        )
        .unwrap();
        assert!(projection_view(&p).plateau_note.is_none());
        let table = render_projection_table(&projection_view(&p));
        assert!(table.contains("total over retention: $47.25"));
        assert!(table.contains("monthly average: $7.88"));
    }

    #[test]
    fn projection_csv_has_one_line_per_month() {
        let csv = render_projection_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[1], "1,1,0.75000000,true");
        assert_eq!(lines[13], "13,12,9.00000000,false");
    }

    #[test]
    fn comparison_table_marks_plateau_months() {
        let cmp = compute_comparative_projection(
            &PricingRates::default(),
            1.0,
            PaymentPlan::Annual,
            &[6, 12],
            24,
        )
        .unwrap();
        let table = render_comparison_table(&cmp);
        assert!(table.contains("6-month"));
        assert!(table.contains("$4.50*"));
        assert!(table.contains("12-month retention: total $58.50, average $4.88"));

        let csv = render_comparison_csv(&cmp);
        assert_eq!(csv.lines().count(), 49);
    }

    #[test]
    fn rates_table_lists_every_row() {
        let table = render_rates_table(&PricingRates::default());
        assert!(table.contains("retention lengths (days): 3, 7, 15, 30"));
        assert!(table.contains("annual $0.75, monthly $1.125"));
        assert_eq!(table.lines().count(), 4 + 16);
    }

    #[test]
    fn json_report_wraps_data_with_kind() {
        let json = render_json("projection", &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "projection");
        assert_eq!(value["data"]["retention_months"], 12);
        assert!(value["generated_at"].is_string());
    }
}
