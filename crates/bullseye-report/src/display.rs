//! Text conventions for report cells.
//!
//! Two kinds of sum share the `"{score} ({x}X)"` form but differ on zero:
//! a per-match cell with nothing to show is [`NO_DATA`], while an aggregate
//! sub-cell that had contributing stages shows `0 (0X)`.

use bullseye_core::StageSum;

/// Marker for a value that does not exist, as opposed to a zero.
pub const NO_DATA: &str = "-";

/// A single score or x-count: `None` is [`NO_DATA`], `0` is `"0"`.
pub fn scalar(value: Option<u32>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| v.to_string())
}

/// A per-match total with its x-count.
pub fn match_total(score: u32, x_count: u32) -> String {
    if score == 0 && x_count == 0 {
        NO_DATA.to_string()
    } else {
        with_x(score, x_count)
    }
}

/// An aggregate sub-cell; `None` when no stage contributed.
pub fn aggregate_sum(sum: Option<StageSum>) -> String {
    match sum {
        Some(sum) => with_x(sum.score, sum.x_count),
        None => NO_DATA.to_string(),
    }
}

pub fn average(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.2}"))
}

fn with_x(score: u32, x_count: u32) -> String {
    format!("{score} ({x_count}X)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_keeps_zero_distinct_from_missing() {
        assert_eq!(scalar(None), "-");
        assert_eq!(scalar(Some(0)), "0");
        assert_eq!(scalar(Some(97)), "97");
    }

    #[test]
    fn match_total_hides_empty_zero() {
        assert_eq!(match_total(0, 0), "-");
        assert_eq!(match_total(0, 1), "0 (1X)");
        assert_eq!(match_total(271, 4), "271 (4X)");
    }

    #[test]
    fn aggregate_sum_shows_contributed_zero() {
        assert_eq!(aggregate_sum(None), "-");
        assert_eq!(aggregate_sum(Some(StageSum::default())), "0 (0X)");
        assert_eq!(aggregate_sum(Some(StageSum::new(192, 6))), "192 (6X)");
    }

    #[test]
    fn average_has_two_decimals() {
        assert_eq!(average(None), "-");
        assert_eq!(average(Some(185.0)), "185.00");
        assert_eq!(average(Some(271.5)), "271.50");
    }
}
