use crate::units::EventsUnit;

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_usd(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

/// Whole yen with thousands separators.
pub fn format_jpy(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}¥{}", group_thousands(&digits))
}

/// Up to two decimals with thousands separators, trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int_part))
    }
}

/// Compact event count using 億 (1e8), 万 (1e4) and 千 (1e3).
pub fn format_event_count(value: f64, unit: EventsUnit) -> String {
    let events = match unit {
        EventsUnit::Millions => value * 1_000_000.0,
        EventsUnit::Events => value,
    };

    if events >= 100_000_000.0 {
        format!("{:.1}億", events / 100_000_000.0)
    } else if events >= 10_000.0 {
        format!("{:.1}万", events / 10_000.0)
    } else if events >= 1_000.0 {
        format!("{:.1}千", events / 1_000.0)
    } else {
        format!("{events}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_uses_two_decimals() {
        assert_eq!(format_usd(58.5), "$58.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1234.567), "$1234.57");
    }

    #[test]
    fn jpy_rounds_and_groups() {
        assert_eq!(format_jpy(40_500.0), "¥40,500");
        assert_eq!(format_jpy(1_234_567.6), "¥1,234,568");
        assert_eq!(format_jpy(999.4), "¥999");
    }

    #[test]
    fn number_drops_trailing_zeros() {
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(0.126), "0.13");
        assert_eq!(format_number(1_000_000.0), "1,000,000");
    }

    #[test]
    fn event_count_uses_japanese_magnitudes() {
        assert_eq!(format_event_count(100_000_000.0, EventsUnit::Events), "1.0億");
        assert_eq!(format_event_count(1.0, EventsUnit::Millions), "100.0万");
        assert_eq!(format_event_count(2_500.0, EventsUnit::Events), "2.5千");
        assert_eq!(format_event_count(999.0, EventsUnit::Events), "999");
    }
}
