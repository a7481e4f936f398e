// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::commands::window_arg;
use crate::config::Settings;
use crate::models::{Entry, Page};
use crate::store::{self, RecordOutcome};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, sub)?;
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<RecordOutcome> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let note = sub.get_one::<String>("note").map(|s| s.as_str());
    let owner = match sub.get_one::<String>("owner") {
        Some(o) => o.trim().to_string(),
        None => Settings::load(conn)?.owner,
    };

    let outcome = store::record_entry(conn, date, amount, note, &owner)?;
    match outcome {
        RecordOutcome::Created { .. } => println!("Recorded {} on {}", amount, date),
        RecordOutcome::Updated { revision_count, .. } => println!(
            "Updated {} to {} (revision {})",
            date, amount, revision_count
        ),
    }
    Ok(outcome)
}

pub fn query_page(conn: &Connection, sub: &clap::ArgMatches) -> Result<Page<Entry>> {
    let page = *sub.get_one::<usize>("page").unwrap_or(&1);
    let page_size = match sub.get_one::<usize>("page-size") {
        Some(n) => *n,
        None => Settings::load(conn)?.page_size,
    };
    Ok(store::list_page(conn, page, page_size, window_arg(sub)?)?)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let page = query_page(conn, sub)?;
    if jsonl_flag {
        maybe_print_json(false, true, &page.items)?;
        return Ok(());
    }
    if !maybe_print_json(json_flag, false, &page)? {
        let rows: Vec<Vec<String>> = page
            .items
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    fmt_money(&e.amount),
                    e.note.clone().unwrap_or_else(|| "-".into()),
                    e.owner_id.clone(),
                    e.revision_count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Amount", "Note", "Owner", "Revisions"], rows)
        );
        println!(
            "Page {} of {} ({} entries)",
            page.page,
            page.total_pages.max(1),
            page.total_count
        );
    }
    Ok(())
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = *sub.get_one::<i64>("id").unwrap();
    let revisions = store::entry_history(conn, id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &revisions)? {
        if revisions.is_empty() {
            println!("Entry {} has no revisions", id);
            return Ok(());
        }
        let rows = revisions
            .iter()
            .map(|r| {
                vec![
                    r.revised_at.clone(),
                    fmt_money(&r.previous_amount),
                    r.owner_id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Revised at", "Previous amount", "Owner"], rows)
        );
    }
    Ok(())
}
