// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Grouping of entries into day and month buckets.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{DayBucket, Entry, PeriodBucket};
use crate::utils::{days_in_month, short_month_name};

pub fn sum_amounts(entries: &[Entry]) -> Decimal {
    entries.iter().map(|e| e.amount).sum()
}

/// One bucket per distinct date, labelled `dd/mm`, ascending.
pub fn group_by_day(entries: &[Entry]) -> Vec<PeriodBucket> {
    let mut days: BTreeMap<NaiveDate, PeriodBucket> = BTreeMap::new();
    for e in entries {
        let bucket = days.entry(e.date).or_insert_with(|| PeriodBucket {
            label: e.date.format("%d/%m").to_string(),
            total: Decimal::ZERO,
            count: 0,
            entries: Vec::new(),
        });
        bucket.total += e.amount;
        bucket.count += 1;
        bucket.entries.push(e.clone());
    }
    days.into_values().collect()
}

/// One bucket per (year, month), labelled like `Jun 2024`, ascending.
pub fn group_by_month(entries: &[Entry]) -> Vec<PeriodBucket> {
    let mut months: BTreeMap<(i32, u32), PeriodBucket> = BTreeMap::new();
    for e in entries {
        let key = (e.date.year(), e.date.month());
        let bucket = months.entry(key).or_insert_with(|| PeriodBucket {
            label: format!("{} {}", short_month_name(key.1), key.0),
            total: Decimal::ZERO,
            count: 0,
            entries: Vec::new(),
        });
        bucket.total += e.amount;
        bucket.count += 1;
        bucket.entries.push(e.clone());
    }
    months.into_values().collect()
}

/// Exactly one bucket per calendar day of the month, zero-filled, with a
/// running `accumulated` total. Entries from other months are dropped.
pub fn daily_breakdown(entries: &[Entry], year: i32, month: u32) -> Vec<DayBucket> {
    let n = days_in_month(year, month);
    let mut days: Vec<DayBucket> = (1..=n)
        .map(|day| DayBucket {
            day,
            date: format!("{:04}-{:02}-{:02}", year, month, day),
            total: Decimal::ZERO,
            count: 0,
            entries: Vec::new(),
            accumulated: Decimal::ZERO,
        })
        .collect();

    for e in entries {
        if e.date.year() != year || e.date.month() != month {
            tracing::debug!(date = %e.date, year, month, "entry outside target month dropped");
            continue;
        }
        let idx = e.date.day0() as usize;
        if let Some(bucket) = days.get_mut(idx) {
            bucket.total += e.amount;
            bucket.count += 1;
            bucket.entries.push(e.clone());
        }
    }

    let mut accumulated = Decimal::ZERO;
    for bucket in days.iter_mut() {
        accumulated += bucket.total;
        bucket.accumulated = accumulated;
    }
    days
}

/// Running totals over bucket totals, in order.
pub fn cumulative(buckets: &[PeriodBucket]) -> Vec<Decimal> {
    buckets
        .iter()
        .scan(Decimal::ZERO, |acc, b| {
            *acc += b.total;
            Some(*acc)
        })
        .collect()
}
