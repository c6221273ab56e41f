use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventsUnit {
    Events,
    Millions,
}

impl EventsUnit {
    pub fn as_label(self) -> &'static str {
        match self {
            EventsUnit::Events => "events",
            EventsUnit::Millions => "millions",
        }
    }

    pub fn to_millions(self, value: f64) -> f64 {
        match self {
            EventsUnit::Events => value / 1_000_000.0,
            EventsUnit::Millions => value,
        }
    }
}

impl fmt::Display for EventsUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for EventsUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "events" => Ok(EventsUnit::Events),
            "millions" => Ok(EventsUnit::Millions),
            _ => Err(AppError::InvalidArgument(format!(
                "Unsupported events unit '{s}'. Use events or millions."
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BytesUnit {
    Bytes,
    Kb,
    Mb,
    Gb,
    Tb,
}

impl BytesUnit {
    pub fn as_label(self) -> &'static str {
        match self {
            BytesUnit::Bytes => "bytes",
            BytesUnit::Kb => "kb",
            BytesUnit::Mb => "mb",
            BytesUnit::Gb => "gb",
            BytesUnit::Tb => "tb",
        }
    }

    /// Decimal multiplier to bytes.
    pub fn multiplier(self) -> f64 {
        match self {
            BytesUnit::Bytes => 1.0,
            BytesUnit::Kb => 1e3,
            BytesUnit::Mb => 1e6,
            BytesUnit::Gb => 1e9,
            BytesUnit::Tb => 1e12,
        }
    }

    pub fn to_gb(self, value: f64) -> f64 {
        value * self.multiplier() / BytesUnit::Gb.multiplier()
    }
}

impl fmt::Display for BytesUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for BytesUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bytes" | "b" => Ok(BytesUnit::Bytes),
            "kb" => Ok(BytesUnit::Kb),
            "mb" => Ok(BytesUnit::Mb),
            "gb" => Ok(BytesUnit::Gb),
            "tb" => Ok(BytesUnit::Tb),
            _ => Err(AppError::InvalidArgument(format!(
                "Unsupported bytes unit '{s}'. Use bytes, kb, mb, gb, or tb."
            ))),
        }
    }
}

/// Stands in for an empty or zero event count before re-scaling.
pub const FALLBACK_EVENTS: f64 = 100_000_000.0;
/// Stands in for an empty or zero byte volume before re-scaling.
pub const FALLBACK_BYTES: f64 = 1000.0;

fn or_fallback(value: f64, fallback: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        fallback
    } else {
        value
    }
}

/// Re-scales an event count when the unit selector changes.
///
/// A zero or non-finite count is replaced by [`FALLBACK_EVENTS`] first.
pub fn convert_events(value: f64, from: EventsUnit, to: EventsUnit) -> f64 {
    let value = or_fallback(value, FALLBACK_EVENTS);
    match (from, to) {
        (EventsUnit::Events, EventsUnit::Millions) => (value / 1_000_000.0).round().max(1.0),
        (EventsUnit::Millions, EventsUnit::Events) => value * 1_000_000.0,
        _ => value,
    }
}

/// Re-scales a byte volume when the unit selector changes. Never drops below 1.
///
/// A zero or non-finite volume is replaced by [`FALLBACK_BYTES`] first.
pub fn convert_bytes(value: f64, from: BytesUnit, to: BytesUnit) -> f64 {
    let value = or_fallback(value, FALLBACK_BYTES);
    if from == to {
        return value;
    }
    let in_bytes = value * from.multiplier();
    (in_bytes / to.multiplier()).round().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_unit_scales_to_millions() {
        assert_eq!(EventsUnit::Events.to_millions(2_500_000.0), 2.5);
        assert_eq!(EventsUnit::Millions.to_millions(3.0), 3.0);
    }

    #[test]
    fn bytes_unit_scales_to_gb() {
        assert_eq!(BytesUnit::Tb.to_gb(2.0), 2000.0);
        assert_eq!(BytesUnit::Mb.to_gb(500.0), 0.5);
        assert_eq!(BytesUnit::Gb.to_gb(7.0), 7.0);
    }

    #[test]
    fn convert_events_rounds_and_floors_at_one() {
        assert_eq!(
            convert_events(100_000_000.0, EventsUnit::Events, EventsUnit::Millions),
            100.0
        );
        assert_eq!(
            convert_events(1_400_000.0, EventsUnit::Events, EventsUnit::Millions),
            1.0
        );
        assert_eq!(
            convert_events(10.0, EventsUnit::Events, EventsUnit::Millions),
            1.0
        );
        assert_eq!(
            convert_events(3.0, EventsUnit::Millions, EventsUnit::Events),
            3_000_000.0
        );
    }

    #[test]
    fn convert_bytes_goes_through_bytes() {
        assert_eq!(convert_bytes(1000.0, BytesUnit::Gb, BytesUnit::Tb), 1.0);
        assert_eq!(convert_bytes(2.0, BytesUnit::Tb, BytesUnit::Mb), 2_000_000.0);
        assert_eq!(convert_bytes(1.0, BytesUnit::Kb, BytesUnit::Gb), 1.0);
        assert_eq!(convert_bytes(42.0, BytesUnit::Mb, BytesUnit::Mb), 42.0);
    }

    #[test]
    fn zero_volumes_fall_back_to_defaults_before_rescaling() {
        assert_eq!(convert_bytes(0.0, BytesUnit::Gb, BytesUnit::Tb), 1.0);
        assert_eq!(convert_bytes(0.0, BytesUnit::Gb, BytesUnit::Mb), 1_000_000.0);
        assert_eq!(convert_bytes(f64::NAN, BytesUnit::Gb, BytesUnit::Gb), 1000.0);
        assert_eq!(convert_bytes(-5.0, BytesUnit::Gb, BytesUnit::Tb), 1.0);
        assert_eq!(
            convert_events(0.0, EventsUnit::Events, EventsUnit::Millions),
            100.0
        );
    }

    #[test]
    fn unknown_units_are_rejected() {
        assert!("pb".parse::<BytesUnit>().is_err());
        assert!("thousands".parse::<EventsUnit>().is_err());
        assert_eq!("GB".parse::<BytesUnit>().unwrap(), BytesUnit::Gb);
    }
}
