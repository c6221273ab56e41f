//! Shareable links carrying the estimate inputs as query parameters.

use crate::error::AppError;
use crate::estimate::EstimateInput;
use crate::models::{PaymentPlan, Region};
use crate::units::{BytesUnit, EventsUnit};
use std::str::FromStr;
use url::Url;

pub const PARAM_EVENTS: &str = "events";
pub const PARAM_EVENTS_UNIT: &str = "eventsUnit";
pub const PARAM_BYTES: &str = "bytes";
pub const PARAM_BYTES_UNIT: &str = "bytesUnit";
pub const PARAM_RETENTION: &str = "retention";
pub const PARAM_REGION: &str = "region";
pub const PARAM_PLAN: &str = "plan";

fn parse_param<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim().parse::<T>().map_err(|_| {
        AppError::InvalidArgument(format!("Invalid value '{raw}' for share parameter '{name}'."))
    })
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Writes every input into `base`'s query string, replacing any existing query.
pub fn to_share_url(input: &EstimateInput, base: &Url) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair(PARAM_EVENTS, &format_amount(input.events))
        .append_pair(PARAM_EVENTS_UNIT, input.events_unit.as_label())
        .append_pair(PARAM_BYTES, &format_amount(input.bytes))
        .append_pair(PARAM_BYTES_UNIT, input.bytes_unit.as_label())
        .append_pair(PARAM_RETENTION, &input.retention_days.to_string())
        .append_pair(PARAM_REGION, input.region.as_label())
        .append_pair(PARAM_PLAN, input.plan.as_label());
    url
}

/// Overlays the parameters present in `url` onto `input`.
///
/// Absent parameters keep their current value; unrecognized ones are ignored.
pub fn apply_share_url(input: &mut EstimateInput, url: &Url) -> Result<(), AppError> {
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            PARAM_EVENTS => input.events = parse_param::<f64>(PARAM_EVENTS, &value)?,
            PARAM_EVENTS_UNIT => {
                input.events_unit = parse_param::<EventsUnit>(PARAM_EVENTS_UNIT, &value)?
            }
            PARAM_BYTES => input.bytes = parse_param::<f64>(PARAM_BYTES, &value)?,
            PARAM_BYTES_UNIT => {
                input.bytes_unit = parse_param::<BytesUnit>(PARAM_BYTES_UNIT, &value)?
            }
            PARAM_RETENTION => {
                input.retention_days = parse_param::<u32>(PARAM_RETENTION, &value)?
            }
            PARAM_REGION => input.region = parse_param::<Region>(PARAM_REGION, &value)?,
            PARAM_PLAN => input.plan = parse_param::<PaymentPlan>(PARAM_PLAN, &value)?,
            _ => {}
        }
    }
    Ok(())
}

pub fn parse_share_url(raw: &str) -> Result<Url, AppError> {
    Ok(Url::parse(raw.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/estimator/").unwrap()
    }

    #[test]
    fn share_url_writes_all_parameters() {
        let url = to_share_url(&EstimateInput::default(), &base());
        assert_eq!(
            url.as_str(),
            "https://example.com/estimator/?events=100000000&eventsUnit=events&bytes=1000&bytesUnit=gb&retention=15&region=US&plan=annual"
        );
    }

    #[test]
    fn share_url_replaces_existing_query() {
        let with_query = Url::parse("https://example.com/?stale=1#top").unwrap();
        let url = to_share_url(&EstimateInput::default(), &with_query);
        assert!(!url.as_str().contains("stale"));
        assert!(url.fragment().is_none());
    }

    #[test]
    fn apply_overlays_only_present_parameters() {
        let mut input = EstimateInput::default();
        let url = Url::parse(
            "https://example.com/?region=AP&plan=monthly&retention=30&bytesUnit=tb&utm_source=x",
        )
        .unwrap();
        apply_share_url(&mut input, &url).unwrap();

        assert_eq!(input.region, Region::Ap);
        assert_eq!(input.plan, PaymentPlan::Monthly);
        assert_eq!(input.retention_days, 30);
        assert_eq!(input.bytes_unit, BytesUnit::Tb);
        assert_eq!(input.events, 100_000_000.0);
        assert_eq!(input.events_unit, EventsUnit::Events);
    }

    #[test]
    fn share_url_is_read_back_unchanged() {
        let original = EstimateInput {
            events: 2.5,
            events_unit: EventsUnit::Millions,
            bytes: 12.0,
            bytes_unit: BytesUnit::Mb,
            retention_days: 7,
            region: Region::Ap,
            plan: PaymentPlan::Monthly,
        };
        let url = to_share_url(&original, &base());
        let mut restored = EstimateInput::default();
        apply_share_url(&mut restored, &url).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn malformed_values_name_the_parameter() {
        let mut input = EstimateInput::default();
        let url = Url::parse("https://example.com/?retention=abc").unwrap();
        let err = apply_share_url(&mut input, &url).expect_err("expected invalid retention");
        assert!(err.to_string().contains("'retention'"));

        for (query, param) in [
            ("eventsUnit=pb", "'eventsUnit'"),
            ("bytesUnit=pb", "'bytesUnit'"),
            ("region=EU", "'region'"),
            ("plan=weekly", "'plan'"),
            ("events=lots", "'events'"),
        ] {
            let url = Url::parse(&format!("https://example.com/?{query}")).unwrap();
            let err = apply_share_url(&mut input, &url).expect_err("expected invalid value");
            assert!(matches!(err, AppError::InvalidArgument(_)));
            assert!(err.to_string().contains(param), "{err} should name {param}");
        }
    }

    #[test]
    fn parse_share_url_rejects_relative_links() {
        assert!(parse_share_url("?events=1").is_err());
        assert!(parse_share_url(" https://example.com/?events=1 ").is_ok());
    }
}
