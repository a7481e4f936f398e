// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PaydayError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub note: Option<String>,
    pub owner_id: String,
    pub revision_count: i64,
}

impl Entry {
    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRevision {
    pub id: i64,
    pub entry_id: i64,
    pub previous_amount: Decimal,
    pub owner_id: String,
    pub revised_at: String,
}

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PaydayError> {
        if start > end {
            return Err(PaydayError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering every day of the given month.
    pub fn month(year: i32, month: u32) -> Result<Self, PaydayError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(PaydayError::InvalidMonth { year, month })?;
        let end = NaiveDate::from_ymd_opt(year, month, crate::utils::days_in_month(year, month))
            .ok_or(PaydayError::InvalidMonth { year, month })?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Optional filters for range queries; an absent field filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub owner_id: Option<String>,
    pub has_notes: Option<bool>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(min) = self.min_amount {
            if entry.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if entry.amount > max {
                return false;
            }
        }
        if let Some(ref owner) = self.owner_id {
            if &entry.owner_id != owner {
                return false;
            }
        }
        if let Some(want_notes) = self.has_notes {
            if entry.has_note() != want_notes {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub day: u32,
    pub date: String, // YYYY-MM-DD
    pub total: Decimal,
    pub count: usize,
    pub entries: Vec<Entry>,
    pub accumulated: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub label: String,
    pub total: Decimal,
    pub count: usize,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub percentage: Decimal,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthDirection {
    Up,
    Down,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthTrend {
    pub trend: GrowthDirection,
    pub rate: Decimal,
    pub months_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub projected_total: Decimal,
    pub average_daily: Decimal,
    pub days_remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_so_far: Option<Decimal>,
    pub is_projection: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub daily_breakdown: Vec<DayBucket>,
    pub month_total: Decimal,
    pub previous_month_total: Decimal,
    pub comparison: Comparison,
    pub projection: Projection,
    pub average_daily: Decimal,
    pub days_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    pub month_name: String,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub comparison: Option<Comparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualReport {
    pub year: i32,
    pub monthly_data: Vec<MonthSummary>,
    pub annual_total: Decimal,
    pub average_monthly: Decimal,
    pub growth_trend: GrowthTrend,
    pub best_month: MonthSummary,
    pub worst_month: MonthSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayTotal {
    /// Sunday = 0 .. Saturday = 6.
    pub weekday: u32,
    pub name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub value: String, // YYYY-MM
    pub label: String,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRanges {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub month_ranges: Vec<MonthRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountRange {
    pub label: String,
    pub min: Decimal,
    pub max: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodChart {
    pub window: DateWindow,
    pub buckets: Vec<PeriodBucket>,
    pub cumulative: Vec<Decimal>,
    pub total: Decimal,
    pub count: usize,
    pub average_per_entry: Decimal,
    pub distribution: Vec<AmountRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_window: Option<DateWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Vec<PeriodBucket>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}
