// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration};
use rusqlite::Connection;

use crate::commands::window_arg;
use crate::config::Settings;
use crate::engine::{Clock, Period, ReportEngine, SystemClock};
use crate::models::{Comparison, DateWindow, Trend};
use crate::store::SqliteStore;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_month, pretty_table};

pub fn engine(conn: &Connection) -> Result<ReportEngine<SqliteStore<'_>>> {
    let settings = Settings::load(conn)?;
    Ok(ReportEngine::new(
        SqliteStore::new(conn),
        Duration::milliseconds(settings.cache_ttl_ms),
    ))
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let engine = engine(conn)?;
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(&engine, sub)?,
        Some(("annual", sub)) => annual(&engine, sub)?,
        Some(("weekdays", sub)) => weekdays(&engine, sub)?,
        Some(("ranges", sub)) => ranges(&engine, sub)?,
        Some(("chart", sub)) => chart(&engine, sub)?,
        _ => {}
    }
    Ok(())
}

fn fmt_comparison(c: &Comparison) -> String {
    let sign = match c.trend {
        Trend::Up => '+',
        Trend::Down => '-',
    };
    format!("{}{:.1}%", sign, c.percentage)
}

fn monthly(engine: &ReportEngine<SqliteStore<'_>>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => {
            let today = SystemClock.today();
            (today.year(), today.month())
        }
    };
    let report = engine.monthly_report(year, month)?;
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }

    if sub.get_flag("daily") {
        let rows = report
            .daily_breakdown
            .iter()
            .map(|d| {
                vec![
                    d.date.clone(),
                    d.count.to_string(),
                    fmt_money(&d.total),
                    fmt_money(&d.accumulated),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Entries", "Total", "Accumulated"], rows)
        );
    }

    let p = &report.projection;
    let mut rows = vec![
        vec!["Month".into(), format!("{:04}-{:02}", year, month)],
        vec!["Total".into(), fmt_money(&report.month_total)],
        vec!["Previous month".into(), fmt_money(&report.previous_month_total)],
        vec!["Change".into(), fmt_comparison(&report.comparison)],
        vec!["Average daily".into(), fmt_money(&report.average_daily)],
    ];
    if p.is_projection {
        rows.push(vec!["Days remaining".into(), report.days_remaining.to_string()]);
        rows.push(vec!["Projected total".into(), fmt_money(&p.projected_total)]);
    }
    println!("{}", pretty_table(&["Monthly report", ""], rows));
    Ok(())
}

fn annual(engine: &ReportEngine<SqliteStore<'_>>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = match sub.get_one::<i32>("year") {
        Some(y) => *y,
        None => SystemClock.today().year(),
    };
    let report = engine.annual_report(year)?;
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    let rows = report
        .monthly_data
        .iter()
        .map(|m| {
            vec![
                m.month_name.clone(),
                m.count.to_string(),
                fmt_money(&m.total),
                m.comparison
                    .as_ref()
                    .map(fmt_comparison)
                    .unwrap_or_else(|| "N/A".into()),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Entries", "Total", "Change"], rows));
    println!(
        "Total {}: {} | Monthly average: {} | Trend: {:?} {:.1}% | Best: {} ({}) | Worst: {} ({})",
        report.year,
        fmt_money(&report.annual_total),
        fmt_money(&report.average_monthly),
        report.growth_trend.trend,
        report.growth_trend.rate,
        report.best_month.month_name,
        fmt_money(&report.best_month.total),
        report.worst_month.month_name,
        fmt_money(&report.worst_month.total),
    );
    Ok(())
}

fn weekdays(engine: &ReportEngine<SqliteStore<'_>>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let top = *sub.get_one::<usize>("top").unwrap_or(&3);
    let window = match window_arg(sub)? {
        Some(w) => w,
        None => {
            let today = SystemClock.today();
            DateWindow::month(today.year(), today.month())?
        }
    };
    let ranked = engine.top_weekdays(window, top);
    if !maybe_print_json(json_flag, jsonl_flag, &ranked)? {
        let rows = ranked
            .iter()
            .enumerate()
            .map(|(i, w)| vec![(i + 1).to_string(), w.name.clone(), fmt_money(&w.total)])
            .collect();
        println!("{}", pretty_table(&["Rank", "Weekday", "Total"], rows));
    }
    Ok(())
}

fn ranges(engine: &ReportEngine<SqliteStore<'_>>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let Some(ranges) = engine.available_date_ranges() else {
        println!("No entries yet");
        return Ok(());
    };
    if !maybe_print_json(json_flag, jsonl_flag, &ranges)? {
        let rows = ranges
            .month_ranges
            .iter()
            .map(|r| vec![r.value.clone(), r.label.clone()])
            .collect();
        println!("{}", pretty_table(&["Value", "Month"], rows));
        println!("Entries from {} to {}", ranges.min_date, ranges.max_date);
    }
    Ok(())
}

pub fn period_arg(sub: &clap::ArgMatches) -> Result<Period> {
    if let (Some(from), Some(to)) = (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        return Ok(Period::Custom(DateWindow::new(
            parse_date(from)?,
            parse_date(to)?,
        )?));
    }
    let p = sub
        .get_one::<String>("period")
        .map(|s| s.as_str())
        .unwrap_or("current-month");
    p.parse::<Period>()
        .with_context(|| format!("Unknown period '{}'", p))
}

fn chart(engine: &ReportEngine<SqliteStore<'_>>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = period_arg(sub)?;
    let chart = engine.period_chart(period, sub.get_flag("compare"))?;
    if maybe_print_json(json_flag, jsonl_flag, &chart)? {
        return Ok(());
    }
    let rows = chart
        .buckets
        .iter()
        .zip(chart.cumulative.iter())
        .map(|(b, acc)| {
            vec![
                b.label.clone(),
                b.count.to_string(),
                fmt_money(&b.total),
                fmt_money(acc),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Period", "Entries", "Total", "Cumulative"], rows));
    println!(
        "{} ({} to {}): {} over {} entries, {} per entry",
        period.label(),
        chart.window.start,
        chart.window.end,
        fmt_money(&chart.total),
        chart.count,
        fmt_money(&chart.average_per_entry),
    );
    let dist = chart
        .distribution
        .iter()
        .map(|r| vec![r.label.clone(), r.count.to_string()])
        .collect();
    println!("{}", pretty_table(&["Amount range", "Entries"], dist));
    if let (Some(w), Some(prev)) = (chart.comparison_window, chart.comparison.as_ref()) {
        let total: rust_decimal::Decimal = prev.iter().map(|b| b.total).sum();
        println!("Previous period ({} to {}): {}", w.start, w.end, fmt_money(&total));
    }
    Ok(())
}
