//! Aggregation and calculation helpers for dashboard metrics
//!
//! Pure functions: trend comparison, sparkline shaping, percentage math
//! and the sum-to-100 normalization used by the sentiment dynamics chart.

use chrono::{Duration, NaiveDate};

use crate::db::dashboard::DailyCount;
use crate::models::{Trend, TrendDirection};

/// Compare the current period against the previous one
///
/// `change_percent` relative to the previous value; when the previous
/// period was empty it reads 100 for any growth and 0 otherwise.
pub fn calculate_trend(current: i64, previous: i64) -> Trend {
    let change = current - previous;
    let direction = if change >= 0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    let change_percent = if previous > 0 {
        ((change.abs() as f64 / previous as f64) * 100.0).round() as i64
    } else if current > 0 {
        100
    } else {
        0
    };

    Trend {
        direction,
        change: change.abs(),
        change_percent,
    }
}

/// Previous period of the same duration, ending the day before `from`
pub fn previous_period(from: NaiveDate, to: NaiveDate) -> (NaiveDate, NaiveDate) {
    let duration = to - from;
    let prev_to = from - Duration::days(1);
    let prev_from = prev_to - duration;
    (prev_from, prev_to)
}

/// Shape daily counts into a fixed-width sparkline
///
/// Takes the last `days` values in date order; shorter series are padded
/// with zeros at the front.
pub fn format_sparkline(points: &[DailyCount], days: usize) -> Vec<i64> {
    if points.is_empty() {
        return vec![0; days];
    }

    let mut sorted: Vec<&DailyCount> = points.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let values: Vec<i64> = sorted.iter().map(|point| point.value).collect();

    if values.len() >= days {
        values[values.len() - days..].to_vec()
    } else {
        let mut padded = vec![0; days - values.len()];
        padded.extend(values);
        padded
    }
}

/// Share of `count` in `total`, rounded to an integer percentage
pub fn percentage(count: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as i64
}

/// Force three sentiment percentages to sum to exactly 100
///
/// Rounding leaves the sum at 99 or 101 occasionally; the largest bucket
/// absorbs the residue (ties resolve positive, then neutral).
pub fn normalize_percentages(positive: i64, neutral: i64, negative: i64) -> (i64, i64, i64) {
    let total = positive + neutral + negative;
    if total == 100 {
        return (positive, neutral, negative);
    }

    let diff = 100 - total;
    let (mut positive, mut neutral, mut negative) = (positive, neutral, negative);

    if positive >= neutral && positive >= negative {
        positive += diff;
    } else if neutral >= negative {
        neutral += diff;
    } else {
        negative += diff;
    }

    (
        positive.clamp(0, 100),
        neutral.clamp(0, 100),
        negative.clamp(0, 100),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, value: i64) -> DailyCount {
        DailyCount {
            date: date.to_string(),
            value,
        }
    }

    #[test]
    fn trend_up_with_percent() {
        let trend = calculate_trend(2847, 2602);
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.change, 245);
        assert_eq!(trend.change_percent, 9);
    }

    #[test]
    fn trend_down_keeps_change_positive() {
        let trend = calculate_trend(684, 726);
        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.change, 42);
        assert_eq!(trend.change_percent, 6);
    }

    #[test]
    fn trend_from_empty_previous_period() {
        assert_eq!(calculate_trend(10, 0).change_percent, 100);
        assert_eq!(calculate_trend(0, 0).change_percent, 0);
        assert_eq!(calculate_trend(0, 0).direction, TrendDirection::Up);
    }

    #[test]
    fn previous_period_has_same_duration() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        let (prev_from, prev_to) = previous_period(from, to);
        assert_eq!(prev_to, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(prev_from, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(prev_to - prev_from, to - from);
    }

    #[test]
    fn sparkline_pads_short_series_at_the_front() {
        let sparkline = format_sparkline(&[day("2025-01-06", 5), day("2025-01-07", 8)], 7);
        assert_eq!(sparkline, vec![0, 0, 0, 0, 0, 5, 8]);
    }

    #[test]
    fn sparkline_takes_last_days_of_long_series() {
        let points: Vec<DailyCount> = (1..=10)
            .map(|d| day(&format!("2025-01-{d:02}"), d))
            .collect();
        let sparkline = format_sparkline(&points, 7);
        assert_eq!(sparkline, vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn sparkline_sorts_by_date() {
        let sparkline = format_sparkline(
            &[day("2025-01-03", 3), day("2025-01-01", 1), day("2025-01-02", 2)],
            3,
        );
        assert_eq!(sparkline, vec![1, 2, 3]);
    }

    #[test]
    fn empty_series_is_all_zeros() {
        assert_eq!(format_sparkline(&[], 7), vec![0; 7]);
    }

    #[test]
    fn percentage_rounds_and_guards_zero_total() {
        assert_eq!(percentage(1936, 2847), 68);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn normalization_gives_residue_to_largest_bucket() {
        // 33 + 33 + 33 = 99, positive wins the tie
        assert_eq!(normalize_percentages(33, 33, 33), (34, 33, 33));
        // 67 + 17 + 17 = 101, largest loses one
        assert_eq!(normalize_percentages(67, 17, 17), (66, 17, 17));
        // already exact
        assert_eq!(normalize_percentages(67, 25, 8), (67, 25, 8));
    }
}
