// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate};
use payday::engine::{ManualClock, Period, ReportEngine};
use payday::errors::{PaydayError, PaydayResult};
use payday::models::{DateWindow, Entry, EntryFilter, GrowthDirection, Trend};
use payday::store::{record_entry, EntryStore, SqliteStore};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    payday::db::init_schema(&conn).unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn add(conn: &Connection, date: &str, amount: Decimal, note: Option<&str>, owner: &str) {
    record_entry(conn, d(date), amount, note, owner).unwrap();
}

fn ttl() -> Duration {
    Duration::milliseconds(300_000)
}

#[test]
fn projection_for_the_current_month() {
    let conn = setup();
    for day in 1..=15 {
        add(&conn, &format!("2024-06-{:02}", day), dec!(20), None, "ana");
    }
    let clock = ManualClock::on(d("2024-06-15"));
    let engine = ReportEngine::with_clock(SqliteStore::new(&conn), &clock, ttl());
    let report = engine.monthly_report(2024, 6).unwrap();

    assert_eq!(report.daily_breakdown.len(), 30);
    assert_eq!(report.month_total, dec!(300));
    assert_eq!(report.average_daily, dec!(20));
    assert_eq!(report.days_remaining, 15);
    assert!(report.projection.is_projection);
    assert_eq!(report.projection.projected_total, dec!(600));
    assert_eq!(
        report.daily_breakdown.last().unwrap().accumulated,
        report.month_total
    );
}

#[test]
fn january_compares_against_previous_december() {
    let conn = setup();
    add(&conn, "2023-12-24", dec!(200), None, "ana");
    add(&conn, "2024-01-10", dec!(150), None, "ana");
    let clock = ManualClock::on(d("2024-03-01"));
    let engine = ReportEngine::with_clock(SqliteStore::new(&conn), &clock, ttl());
    let report = engine.monthly_report(2024, 1).unwrap();

    assert_eq!(report.previous_month_total, dec!(200));
    assert_eq!(report.comparison.trend, Trend::Down);
    assert_eq!(report.comparison.percentage, dec!(25));
    assert_eq!(report.comparison.difference, Some(dec!(-50)));
    assert!(!report.projection.is_projection);
    assert_eq!(report.days_remaining, 0);
    assert_eq!(report.projection.projected_total, dec!(150));
}

#[test]
fn warm_cache_gives_identical_reports_until_cleared() {
    let conn = setup();
    add(&conn, "2024-05-03", dec!(40), None, "ana");
    let clock = ManualClock::on(d("2024-05-20"));
    let engine = ReportEngine::with_clock(SqliteStore::new(&conn), &clock, ttl());

    let first = engine.monthly_report(2024, 5).unwrap();
    let second = engine.monthly_report(2024, 5).unwrap();
    assert_eq!(first, second);

    add(&conn, "2024-05-04", dec!(60), None, "ana");
    let stale = engine.monthly_report(2024, 5).unwrap();
    assert_eq!(stale.month_total, dec!(40));

    engine.clear_cache();
    let fresh = engine.monthly_report(2024, 5).unwrap();
    assert_eq!(fresh.month_total, dec!(100));
}

#[test]
fn expired_cache_sees_new_entries() {
    let conn = setup();
    add(&conn, "2024-05-03", dec!(40), None, "ana");
    let clock = ManualClock::on(d("2024-05-20"));
    let engine = ReportEngine::with_clock(SqliteStore::new(&conn), &clock, ttl());
    engine.monthly_report(2024, 5).unwrap();
    add(&conn, "2024-05-04", dec!(60), None, "ana");
    clock.advance(Duration::milliseconds(300_001));
    assert_eq!(engine.monthly_report(2024, 5).unwrap().month_total, dec!(100));
}

#[test]
fn annual_report_ranks_and_trends() {
    let conn = setup();
    add(&conn, "2024-03-05", dec!(100), None, "ana");
    add(&conn, "2024-04-05", dec!(60), None, "ana");
    add(&conn, "2024-04-06", dec!(40), None, "ana");
    add(&conn, "2024-05-05", dec!(100), None, "ana");
    let clock = ManualClock::on(d("2024-12-31"));
    let engine = ReportEngine::with_clock(SqliteStore::new(&conn), &clock, ttl());
    let report = engine.annual_report(2024).unwrap();

    assert_eq!(report.monthly_data.len(), 12);
    assert_eq!(report.best_month.month, 3);
    assert_eq!(report.worst_month.month, 1);
    assert_eq!(report.annual_total, dec!(300));
    assert_eq!(report.average_monthly, dec!(25));
    assert_eq!(report.growth_trend.trend, GrowthDirection::Up);
    assert_eq!(report.growth_trend.rate, dec!(0));
    assert_eq!(report.monthly_data[3].count, 2);
    assert_eq!(report.monthly_data[3].average, dec!(50));
    assert!(report.monthly_data[0].comparison.is_none());
    assert_eq!(engine.cached_windows(), 12);
}

#[test]
fn empty_store_gives_zero_reports() {
    let conn = setup();
    let clock = ManualClock::on(d("2024-02-10"));
    let engine = ReportEngine::with_clock(SqliteStore::new(&conn), &clock, ttl());
    let report = engine.monthly_report(2024, 2).unwrap();
    assert_eq!(report.daily_breakdown.len(), 29);
    assert_eq!(report.month_total, Decimal::ZERO);
    assert_eq!(report.average_daily, Decimal::ZERO);
    assert_eq!(report.days_remaining, 19);
    assert_eq!(report.comparison.percentage, Decimal::ZERO);

    let annual = engine.annual_report(2024).unwrap();
    assert_eq!(annual.growth_trend.trend, GrowthDirection::InsufficientData);
    assert!(engine.available_date_ranges().is_none());
}

struct BrokenStore;

impl EntryStore for BrokenStore {
    fn fetch_entries(&self, _window: DateWindow) -> PaydayResult<Vec<Entry>> {
        Err(PaydayError::NotFound("entries table".into()))
    }

    fn date_extremes(&self) -> PaydayResult<Option<(NaiveDate, NaiveDate)>> {
        Err(PaydayError::NotFound("entries table".into()))
    }
}

#[test]
fn store_failures_degrade_to_zero_activity() {
    let clock = ManualClock::on(d("2024-06-15"));
    let engine = ReportEngine::with_clock(BrokenStore, &clock, ttl());
    let report = engine.monthly_report(2024, 6).unwrap();
    assert_eq!(report.month_total, Decimal::ZERO);
    assert_eq!(report.daily_breakdown.len(), 30);
    assert_eq!(report.days_remaining, 15);
    assert!(engine.available_date_ranges().is_none());
    assert_eq!(engine.cached_windows(), 0);
}

#[test]
fn date_ranges_cover_every_month_between_extremes() {
    let conn = setup();
    add(&conn, "2023-11-30", dec!(1), None, "ana");
    add(&conn, "2024-02-01", dec!(1), None, "ana");
    let engine = ReportEngine::new(SqliteStore::new(&conn), ttl());
    let ranges = engine.available_date_ranges().unwrap();
    assert_eq!(ranges.min_date, d("2023-11-30"));
    assert_eq!(ranges.max_date, d("2024-02-01"));
    let values: Vec<_> = ranges.month_ranges.iter().map(|r| r.value.clone()).collect();
    assert_eq!(values, vec!["2024-02", "2024-01", "2023-12", "2023-11"]);
}

#[test]
fn range_filters_combine() {
    let conn = setup();
    add(&conn, "2024-06-01", dec!(10), Some("cash"), "ana");
    add(&conn, "2024-06-02", dec!(50), None, "ana");
    add(&conn, "2024-06-03", dec!(80), Some("card"), "luis");
    add(&conn, "2024-06-04", dec!(120), Some("card"), "ana");
    let engine = ReportEngine::new(SqliteStore::new(&conn), ttl());
    let june = DateWindow::month(2024, 6).unwrap();

    let all = engine.entries_by_range(june, &EntryFilter::default());
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].date, d("2024-06-04"));

    let filter = EntryFilter {
        min_amount: Some(dec!(20)),
        max_amount: Some(dec!(100)),
        ..Default::default()
    };
    let mid: Vec<_> = engine
        .entries_by_range(june, &filter)
        .iter()
        .map(|e| e.amount)
        .collect();
    assert_eq!(mid, vec![dec!(80), dec!(50)]);

    let filter = EntryFilter {
        owner_id: Some("ana".into()),
        has_notes: Some(true),
        ..Default::default()
    };
    let noted = engine.entries_by_range(june, &filter);
    assert_eq!(noted.len(), 2);
    assert!(noted.iter().all(|e| e.owner_id == "ana" && e.note.is_some()));

    let filter = EntryFilter {
        has_notes: Some(false),
        ..Default::default()
    };
    assert_eq!(engine.entries_by_range(june, &filter).len(), 1);
}

#[test]
fn weekday_ranking_through_the_engine() {
    let conn = setup();
    // Sundays in June 2024
    add(&conn, "2024-06-02", dec!(30), None, "ana");
    add(&conn, "2024-06-09", dec!(30), None, "ana");
    add(&conn, "2024-06-10", dec!(45), None, "ana");
    let engine = ReportEngine::new(SqliteStore::new(&conn), ttl());
    let ranked = engine.top_weekdays(DateWindow::month(2024, 6).unwrap(), 3);
    assert_eq!(ranked[0].name, "Sunday");
    assert_eq!(ranked[0].total, dec!(60));
    assert_eq!(ranked[1].name, "Monday");
    assert_eq!(ranked[2].name, "Tuesday");
    assert_eq!(ranked[2].total, Decimal::ZERO);
}

#[test]
fn period_chart_groups_and_compares() {
    let conn = setup();
    add(&conn, "2024-05-20", dec!(15), None, "ana");
    add(&conn, "2024-06-02", dec!(10), None, "ana");
    add(&conn, "2024-06-02", dec!(5), None, "ana");
    add(&conn, "2024-06-07", dec!(25), None, "ana");
    let clock = ManualClock::on(d("2024-06-18"));
    let engine = ReportEngine::with_clock(SqliteStore::new(&conn), &clock, ttl());

    let chart = engine.period_chart(Period::CurrentMonth, true).unwrap();
    assert_eq!(chart.buckets.len(), 2);
    assert_eq!(chart.buckets[0].label, "02/06");
    // the second add on 2024-06-02 revised the first
    assert_eq!(chart.buckets[0].total, dec!(5));
    assert_eq!(chart.cumulative, vec![dec!(5), dec!(30)]);
    assert_eq!(chart.total, dec!(30));
    assert_eq!(chart.average_per_entry, dec!(15));
    let prev = chart.comparison.unwrap();
    assert_eq!(prev.len(), 1);
    assert_eq!(prev[0].total, dec!(15));

    let yearly = engine.period_chart(Period::Year(2024), false).unwrap();
    let labels: Vec<_> = yearly.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["May 2024", "Jun 2024"]);
    assert!(yearly.comparison.is_none());
}
