// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;

use crate::commands::{reports::engine, window_arg};
use crate::models::{DateWindow, Entry, EntryFilter};
use crate::utils::{fmt_money, parse_decimal};

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim().to_string();
    let entries = query_entries(conn, sub)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)?;
            wtr.write_record(["date", "amount", "note", "owner"])?;
            for e in &entries {
                wtr.write_record([
                    e.date.to_string(),
                    fmt_money(&e.amount),
                    e.note.clone().unwrap_or_default(),
                    e.owner_id.clone(),
                ])?;
            }
            let total: Decimal = entries.iter().map(|e| e.amount).sum();
            wtr.write_record(["", "", "", ""])?;
            wtr.write_record(["TOTAL", fmt_money(&total).as_str(), "", ""])?;
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = entries
                .iter()
                .map(|e| {
                    json!({
                        "date": e.date, "amount": e.amount, "note": e.note, "owner": e.owner_id
                    })
                })
                .collect();
            std::fs::write(&out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} entries to {}", entries.len(), out);
    Ok(())
}

pub fn filter_arg(sub: &clap::ArgMatches) -> Result<EntryFilter> {
    Ok(EntryFilter {
        min_amount: sub
            .get_one::<String>("min-amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        max_amount: sub
            .get_one::<String>("max-amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        owner_id: sub.get_one::<String>("owner").map(|s| s.trim().to_string()),
        has_notes: sub.get_one::<bool>("has-notes").copied(),
    })
}

/// Filtered entries for the requested window (all entries when none is
/// given), oldest first.
pub fn query_entries(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Entry>> {
    let engine = engine(conn)?;
    let window = match window_arg(sub)? {
        Some(w) => w,
        None => match engine.available_date_ranges() {
            Some(r) => DateWindow::new(r.min_date, r.max_date)?,
            None => return Ok(Vec::new()),
        },
    };
    let mut entries = engine.entries_by_range(window, &filter_arg(sub)?);
    entries.reverse();
    Ok(entries)
}
