// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use super::access::{Clock, DataAccess, SystemClock};
use super::aggregate::{cumulative, daily_breakdown, group_by_day, group_by_month, sum_amounts};
use super::analysis::{
    amount_distribution, best_index, compare, growth_trend, top_weekdays, worst_index,
};
use super::period::{previous_window, Period};
use crate::errors::PaydayResult;
use crate::models::{
    AnnualReport, DateRanges, DateWindow, DayBucket, Entry, EntryFilter, MonthRange,
    MonthSummary, MonthlyReport, PeriodChart, Projection, WeekdayTotal,
};
use crate::store::EntryStore;
use crate::utils::{days_in_month, month_name, next_month, previous_month};

/// Builds reports from a store. Each call recomputes from the fetched
/// entries; only the fetches are cached.
pub struct ReportEngine<S, C = SystemClock> {
    access: DataAccess<S, C>,
}

impl<S: EntryStore> ReportEngine<S, SystemClock> {
    pub fn new(store: S, cache_ttl: Duration) -> Self {
        Self::with_clock(store, SystemClock, cache_ttl)
    }
}

impl<S: EntryStore, C: Clock> ReportEngine<S, C> {
    pub fn with_clock(store: S, clock: C, cache_ttl: Duration) -> Self {
        Self {
            access: DataAccess::new(store, clock, cache_ttl),
        }
    }

    pub fn fetch_entries(&self, window: DateWindow, use_cache: bool) -> Vec<Entry> {
        self.access.fetch_entries(window, use_cache)
    }

    /// Must be called after any entry is created or edited.
    pub fn clear_cache(&self) {
        self.access.clear_cache();
    }

    pub fn cached_windows(&self) -> usize {
        self.access.cached_windows()
    }

    pub fn monthly_report(&self, year: i32, month: u32) -> PaydayResult<MonthlyReport> {
        let window = DateWindow::month(year, month)?;
        let entries = self.access.fetch_entries(window, true);
        let daily = daily_breakdown(&entries, year, month);
        let month_total: Decimal = daily.iter().map(|d| d.total).sum();

        let (py, pm) = previous_month(year, month);
        let (previous_month_total, _) = self.month_total(py, pm)?;

        let projection = project(&daily, year, month, self.access.clock().today());
        tracing::debug!(year, month, %month_total, %previous_month_total, "monthly report built");
        Ok(MonthlyReport {
            year,
            month,
            month_total,
            previous_month_total,
            comparison: compare(month_total, previous_month_total),
            average_daily: projection.average_daily,
            days_remaining: projection.days_remaining,
            projection,
            daily_breakdown: daily,
        })
    }

    fn month_total(&self, year: i32, month: u32) -> PaydayResult<(Decimal, usize)> {
        let entries = self
            .access
            .fetch_entries(DateWindow::month(year, month)?, true);
        Ok((sum_amounts(&entries), entries.len()))
    }

    /// Twelve independent month fetches, merged in month order.
    pub fn annual_report(&self, year: i32) -> PaydayResult<AnnualReport> {
        let mut months: Vec<MonthSummary> = Vec::with_capacity(12);
        for month in 1..=12 {
            let (total, count) = self.month_total(year, month)?;
            months.push(MonthSummary {
                month,
                month_name: month_name(month).to_string(),
                total,
                count,
                average: if count > 0 {
                    total / Decimal::from(count)
                } else {
                    Decimal::ZERO
                },
                comparison: None,
            });
        }
        Ok(assemble_annual(year, months))
    }

    /// Month options between the first and last entry, most recent first.
    /// `None` when there are no entries or the store cannot be read.
    pub fn available_date_ranges(&self) -> Option<DateRanges> {
        let (min_date, max_date) = match self.access.store().date_extremes() {
            Ok(Some(extremes)) => extremes,
            Ok(None) => return None,
            Err(err) => {
                tracing::error!(error = %err, "reading date extremes failed");
                return None;
            }
        };
        Some(DateRanges {
            min_date,
            max_date,
            month_ranges: month_ranges(min_date, max_date),
        })
    }

    /// Uncached range query, newest first.
    pub fn entries_by_range(&self, window: DateWindow, filter: &EntryFilter) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .access
            .fetch_entries(window, false)
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        entries.reverse();
        entries
    }

    pub fn top_weekdays(&self, window: DateWindow, n: usize) -> Vec<WeekdayTotal> {
        top_weekdays(&self.access.fetch_entries(window, true), n)
    }

    pub fn period_chart(&self, period: Period, with_comparison: bool) -> PaydayResult<PeriodChart> {
        let window = period.window(self.access.clock().today())?;
        let entries = self.access.fetch_entries(window, true);
        let group = |entries: &[Entry]| {
            if period.groups_by_month() {
                group_by_month(entries)
            } else {
                group_by_day(entries)
            }
        };
        let buckets = group(&entries);
        let total = sum_amounts(&entries);
        let count = entries.len();
        let (comparison_window, comparison) = if with_comparison {
            let prev = previous_window(window);
            let prev_entries = self.access.fetch_entries(prev, true);
            (Some(prev), Some(group(&prev_entries)))
        } else {
            (None, None)
        };
        Ok(PeriodChart {
            window,
            cumulative: cumulative(&buckets),
            buckets,
            total,
            count,
            average_per_entry: if count > 0 {
                total / Decimal::from(count)
            } else {
                Decimal::ZERO
            },
            distribution: amount_distribution(&entries),
            comparison_window,
            comparison,
        })
    }
}

/// Extrapolates the month from the daily mean so far when the month is the
/// current one; otherwise reports the actual total.
pub fn project(daily: &[DayBucket], year: i32, month: u32, today: NaiveDate) -> Projection {
    let days = days_in_month(year, month);
    let month_total: Decimal = daily.iter().map(|d| d.total).sum();
    let is_current = today.year() == year && today.month() == month;
    if !is_current {
        return Projection {
            projected_total: month_total,
            average_daily: if days > 0 {
                month_total / Decimal::from(days)
            } else {
                Decimal::ZERO
            },
            days_remaining: 0,
            total_so_far: None,
            is_projection: false,
        };
    }
    let days_with_data = today.day().min(days);
    let total_so_far: Decimal = daily
        .iter()
        .take(days_with_data as usize)
        .map(|d| d.total)
        .sum();
    let average_daily = if days_with_data > 0 {
        total_so_far / Decimal::from(days_with_data)
    } else {
        Decimal::ZERO
    };
    let days_remaining = days - days_with_data;
    Projection {
        projected_total: total_so_far + average_daily * Decimal::from(days_remaining),
        average_daily,
        days_remaining,
        total_so_far: Some(total_so_far),
        is_projection: true,
    }
}

/// Attaches month-over-month comparisons, the growth trend and the
/// best/worst months to twelve month summaries.
pub fn assemble_annual(year: i32, mut months: Vec<MonthSummary>) -> AnnualReport {
    for i in 1..months.len() {
        months[i].comparison = Some(compare(months[i].total, months[i - 1].total));
    }
    let totals: Vec<Decimal> = months.iter().map(|m| m.total).collect();
    let annual_total: Decimal = totals.iter().copied().sum();
    let pick = |idx: Option<usize>| {
        idx.and_then(|i| months.get(i).cloned())
            .unwrap_or_else(|| empty_month(1))
    };
    AnnualReport {
        year,
        annual_total,
        average_monthly: annual_total / Decimal::from(12),
        growth_trend: growth_trend(&totals),
        best_month: pick(best_index(&totals)),
        worst_month: pick(worst_index(&totals)),
        monthly_data: months,
    }
}

fn empty_month(month: u32) -> MonthSummary {
    MonthSummary {
        month,
        month_name: month_name(month).to_string(),
        total: Decimal::ZERO,
        count: 0,
        average: Decimal::ZERO,
        comparison: None,
    }
}

/// Every month from `min`'s to `max`'s inclusive, most recent first.
pub fn month_ranges(min: NaiveDate, max: NaiveDate) -> Vec<MonthRange> {
    let (mut y, mut m) = (min.year(), min.month());
    let end = (max.year(), max.month());
    let mut out = Vec::new();
    while (y, m) <= end {
        out.push(MonthRange {
            value: format!("{:04}-{:02}", y, m),
            label: format!("{} {}", month_name(m), y),
            year: y,
            month: m,
        });
        (y, m) = next_month(y, m);
    }
    out.reverse();
    out
}
