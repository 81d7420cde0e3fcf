//! Tick placement for count axes.
//!
//! gnuplot's own tick labels cannot print thousands separators portably, so
//! the charts compute their tick positions here and hand gnuplot custom labels.

use gnuplot::{AutoOption::Fix, Tick};

use crate::format::thousands_f64;

/// Upper bound on the number of ticks produced for one axis.
pub const MAX_TICKS: usize = 8;

/// Rounds a raw step up to 1, 2 or 5 times a power of ten. Never below 1.
fn nice_step(raw: f64) -> f64 {
    if !(raw > 1.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Evenly spaced tick positions inside `[lo, hi]`, at most `max_ticks` of them.
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    if !(hi > lo) || max_ticks < 2 {
        return vec![lo];
    }
    let mut step = nice_step((hi - lo) / (max_ticks - 1) as f64);
    loop {
        let first = (lo / step).ceil() * step;
        let count = ((hi - first) / step + 1e-9).floor() as usize + 1;
        if count <= max_ticks {
            return (0..count).map(|i| first + i as f64 * step).collect();
        }
        step = nice_step(step * 1.5);
    }
}

/// Custom gnuplot ticks for `[lo, hi]` labelled with thousands separators.
pub fn count_ticks(lo: f64, hi: f64) -> Vec<Tick<f64, String>> {
    nice_ticks(lo, hi, MAX_TICKS)
        .into_iter()
        .map(|pos| Tick::Major(pos, Fix(thousands_f64(pos))))
        .collect()
}

/// Axis range with a little room around a degenerate or tight span.
pub fn padded_range(min: u64, max: u64) -> (f64, f64) {
    if min == max {
        let v = min as f64;
        ((v - 1.0).max(0.0), v + 1.0)
    } else {
        (min as f64, max as f64)
    }
}

/// Upper limit for a count axis starting at zero, leaving room for annotations.
pub fn headroom(max: u64, factor: f64) -> f64 {
    if max == 0 {
        1.0
    } else {
        max as f64 * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_one_two_five() {
        assert_eq!(nice_step(0.3), 1.0);
        assert_eq!(nice_step(1.7), 2.0);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(7.0), 10.0);
        assert_eq!(nice_step(1_400.0), 2_000.0);
    }

    #[test]
    fn ticks_cover_range_without_exceeding_limit() {
        let ticks = nice_ticks(0.0, 13_200.0, MAX_TICKS);
        assert_eq!(ticks.first(), Some(&0.0));
        assert!(ticks.len() <= MAX_TICKS);
        assert!(ticks.iter().all(|t| *t >= 0.0 && *t <= 13_200.0));
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn small_integer_ranges_use_unit_steps() {
        assert_eq!(nice_ticks(0.0, 2.0, MAX_TICKS), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn offset_range_starts_on_step_multiple() {
        let ticks = nice_ticks(10_000.0, 50_000.0, MAX_TICKS);
        assert_eq!(ticks[0], 10_000.0);
        assert_eq!(*ticks.last().unwrap(), 50_000.0);
    }

    #[test]
    fn degenerate_range_yields_single_tick() {
        assert_eq!(nice_ticks(5.0, 5.0, MAX_TICKS), vec![5.0]);
    }

    #[test]
    fn tick_labels_use_thousands_separators() {
        let ticks = count_ticks(0.0, 4_000.0);
        let labels: Vec<String> = ticks
            .iter()
            .map(|t| match t {
                Tick::Major(_, Fix(label)) => label.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(labels, vec!["0", "1,000", "2,000", "3,000", "4,000"]);
    }

    #[test]
    fn padding_and_headroom() {
        assert_eq!(padded_range(0, 0), (0.0, 1.0));
        assert_eq!(padded_range(7, 7), (6.0, 8.0));
        assert_eq!(padded_range(0, 2), (0.0, 2.0));
        assert_eq!(headroom(0, 1.1), 1.0);
        assert!((headroom(100, 1.1) - 110.0).abs() < 1e-9);
    }
}
