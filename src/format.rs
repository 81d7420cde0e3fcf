//! Number formatting shared by the console reports and the chart labels.

/// Formats an integer with `,` as the thousands separator, e.g. `1234567` -> `1,234,567`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Same as [`thousands`] for a tick position; rounds to the nearest integer.
pub fn thousands_f64(value: f64) -> String {
    let rounded = value.round();
    if rounded < 0.0 {
        format!("-{}", thousands((-rounded) as u64))
    } else {
        thousands(rounded as u64)
    }
}

/// Short count label used on top of bars: `999`, `1.5K`, `2.0M`, `3.1B`.
pub fn human_count(value: u64) -> String {
    let v = value as f64;
    if value >= 1_000_000_000 {
        format!("{:.1}B", v / 1_000_000_000.0)
    } else if value >= 1_000_000 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", v / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Share of `part` in `total` as a percentage. A zero total yields 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1_000, "1,000")]
    #[case(12_345, "12,345")]
    #[case(1_234_567, "1,234,567")]
    #[case(100_000_000, "100,000,000")]
    fn thousands_separators(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(thousands(value), expected);
    }

    #[test]
    fn thousands_for_tick_positions() {
        assert_eq!(thousands_f64(2_500.4), "2,500");
        assert_eq!(thousands_f64(-1_500.0), "-1,500");
        assert_eq!(thousands_f64(0.0), "0");
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1_000, "1.0K")]
    #[case(1_500, "1.5K")]
    #[case(999_999, "1000.0K")]
    #[case(1_000_000, "1.0M")]
    #[case(2_340_000, "2.3M")]
    #[case(1_000_000_000, "1.0B")]
    #[case(2_560_000_000, "2.6B")]
    fn human_scaled_counts(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(human_count(value), expected);
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(percentage(5, 0), 0.0);
        assert!((percentage(1, 4) - 25.0).abs() < 1e-9);
    }
}
