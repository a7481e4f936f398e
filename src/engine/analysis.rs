// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period-over-period comparisons and rankings.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::models::{
    AmountRange, Comparison, Entry, GrowthDirection, GrowthTrend, Trend, WeekdayTotal,
};
use crate::utils::{fmt_money, weekday_name};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const DISTRIBUTION_RANGES: u32 = 5;

/// Percentage change from `previous` to `current`. Growth from a zero
/// baseline reports 100% (or 0% when `current` is zero too), trending up.
pub fn compare(current: Decimal, previous: Decimal) -> Comparison {
    if previous.is_zero() {
        return Comparison {
            percentage: if current > Decimal::ZERO {
                HUNDRED
            } else {
                Decimal::ZERO
            },
            trend: Trend::Up,
            difference: None,
        };
    }
    let difference = current - previous;
    Comparison {
        percentage: (difference / previous * HUNDRED).abs(),
        trend: if difference >= Decimal::ZERO {
            Trend::Up
        } else {
            Trend::Down
        },
        difference: Some(difference),
    }
}

/// Compares the first and last months with a positive total.
pub fn growth_trend(monthly_totals: &[Decimal]) -> GrowthTrend {
    let valid: Vec<Decimal> = monthly_totals
        .iter()
        .copied()
        .filter(|t| *t > Decimal::ZERO)
        .collect();
    let (first, last) = match valid.as_slice() {
        [first, .., last] => (*first, *last),
        _ => {
            return GrowthTrend {
                trend: GrowthDirection::InsufficientData,
                rate: Decimal::ZERO,
                months_analyzed: valid.len(),
            };
        }
    };
    let cmp = compare(last, first);
    GrowthTrend {
        trend: match cmp.trend {
            Trend::Up => GrowthDirection::Up,
            Trend::Down => GrowthDirection::Down,
        },
        rate: cmp.percentage,
        months_analyzed: valid.len(),
    }
}

/// Index of the highest total; the earliest wins ties.
pub fn best_index(totals: &[Decimal]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, t) in totals.iter().enumerate() {
        match best {
            Some(b) if *t > totals[b] => best = Some(i),
            None => best = Some(i),
            _ => {}
        }
    }
    best
}

/// Index of the lowest total; the earliest wins ties.
pub fn worst_index(totals: &[Decimal]) -> Option<usize> {
    let mut worst: Option<usize> = None;
    for (i, t) in totals.iter().enumerate() {
        match worst {
            Some(w) if *t < totals[w] => worst = Some(i),
            None => worst = Some(i),
            _ => {}
        }
    }
    worst
}

/// Weekday totals (Sunday = 0), highest first, keeping weekday order on ties.
pub fn top_weekdays(entries: &[Entry], n: usize) -> Vec<WeekdayTotal> {
    let mut totals = [Decimal::ZERO; 7];
    for e in entries {
        totals[e.date.weekday().num_days_from_sunday() as usize] += e.amount;
    }
    let mut ranked: Vec<WeekdayTotal> = totals
        .iter()
        .enumerate()
        .map(|(i, total)| WeekdayTotal {
            weekday: i as u32,
            name: weekday_name(i as u32).to_string(),
            total: *total,
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked.truncate(n);
    ranked
}

/// Five equal-width amount ranges of width `ceil(max / 5)`. Each range is
/// half-open except the last, which includes its upper bound.
pub fn amount_distribution(entries: &[Entry]) -> Vec<AmountRange> {
    let max = entries
        .iter()
        .map(|e| e.amount)
        .max()
        .unwrap_or(Decimal::ZERO);
    let width = (max / Decimal::from(DISTRIBUTION_RANGES)).ceil();
    (0..DISTRIBUTION_RANGES)
        .map(|i| {
            let lo = width * Decimal::from(i);
            let hi = width * Decimal::from(i + 1);
            let last = i == DISTRIBUTION_RANGES - 1;
            let in_range = |a: Decimal| a >= lo && if last { a <= hi } else { a < hi };
            let count = entries.iter().filter(|e| in_range(e.amount)).count();
            AmountRange {
                label: format!("{} - {}", fmt_money(&lo), fmt_money(&hi)),
                min: lo,
                max: hi,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(date: &str, amount: Decimal) -> Entry {
        Entry {
            id: 0,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            note: None,
            owner_id: "ana".into(),
            revision_count: 0,
        }
    }

    #[test]
    fn zero_baseline_edge_cases() {
        let c = compare(dec!(0), dec!(0));
        assert_eq!(c.percentage, dec!(0));
        assert_eq!(c.trend, Trend::Up);
        assert_eq!(c.difference, None);

        let c = compare(dec!(100), dec!(0));
        assert_eq!(c.percentage, dec!(100));
        assert_eq!(c.trend, Trend::Up);
    }

    #[test]
    fn decline_reports_positive_percentage() {
        let c = compare(dec!(50), dec!(100));
        assert_eq!(c.percentage, dec!(50));
        assert_eq!(c.trend, Trend::Down);
        assert_eq!(c.difference, Some(dec!(-50)));
    }

    #[test]
    fn growth_needs_two_positive_months() {
        let mut series = vec![dec!(0); 12];
        assert_eq!(growth_trend(&series).trend, GrowthDirection::InsufficientData);
        series[4] = dec!(40);
        let g = growth_trend(&series);
        assert_eq!(g.trend, GrowthDirection::InsufficientData);
        assert_eq!(g.rate, dec!(0));
    }

    #[test]
    fn growth_compares_first_and_last_positive_months() {
        let series = vec![dec!(0), dec!(50), dec!(10), dec!(0), dec!(75)];
        let g = growth_trend(&series);
        assert_eq!(g.trend, GrowthDirection::Up);
        assert_eq!(g.rate, dec!(50));
        assert_eq!(g.months_analyzed, 3);
    }

    #[test]
    fn ties_resolve_to_first_occurrence() {
        let totals = vec![dec!(0), dec!(0), dec!(100), dec!(100), dec!(100), dec!(0)];
        assert_eq!(best_index(&totals), Some(2));
        assert_eq!(worst_index(&totals), Some(0));
        assert_eq!(best_index(&[]), None);
    }

    #[test]
    fn single_weekday_ranks_first_then_stable_zeros() {
        // 2024-06-05 and 2024-06-12 are Wednesdays
        let entries = vec![entry("2024-06-05", dec!(10)), entry("2024-06-12", dec!(15))];
        let ranked = top_weekdays(&entries, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].weekday, 3);
        assert_eq!(ranked[0].name, "Wednesday");
        assert_eq!(ranked[0].total, dec!(25));
        assert_eq!(ranked[1].weekday, 0);
        assert_eq!(ranked[2].weekday, 1);
    }

    #[test]
    fn distribution_closes_last_range() {
        let entries = vec![
            entry("2024-06-01", dec!(0)),
            entry("2024-06-02", dec!(20)),
            entry("2024-06-03", dec!(99)),
            entry("2024-06-04", dec!(100)),
        ];
        let ranges = amount_distribution(&entries);
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges[0].max, dec!(20));
        assert_eq!(ranges[0].count, 1);
        assert_eq!(ranges[1].count, 1);
        assert_eq!(ranges[4].count, 2);
        assert_eq!(ranges.iter().map(|r| r.count).sum::<usize>(), 4);
    }

    #[test]
    fn distribution_of_nothing_is_five_empty_ranges() {
        let ranges = amount_distribution(&[]);
        assert_eq!(ranges.len(), 5);
        assert!(ranges.iter().all(|r| r.count == 0 && r.max == Decimal::ZERO));
        assert_eq!(ranges[0].label, "0.00 - 0.00");
    }

    #[test]
    fn growth_can_trend_down() {
        let series = vec![dec!(0), dec!(200), dec!(120), dec!(0), dec!(50)];
        let g = growth_trend(&series);
        assert_eq!(g.trend, GrowthDirection::Down);
        assert_eq!(g.rate, dec!(75));
        assert_eq!(g.months_analyzed, 3);
    }
}
