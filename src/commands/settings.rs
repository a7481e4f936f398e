// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::Connection;

use crate::config::{Settings, KEYS};
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => get(conn, sub)?,
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            Settings::set(conn, key, value)?;
            println!("{} = {}", key, value.trim());
        }
        _ => {}
    }
    Ok(())
}

fn get(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let pairs = settings.as_pairs();
    match sub.get_one::<String>("key").map(|k| k.trim()) {
        Some(key) => match pairs.iter().find(|(k, _)| *k == key) {
            Some((_, v)) => println!("{}", v),
            None => bail!("Unknown setting '{}' (known: {})", key, KEYS.join(", ")),
        },
        None => {
            let rows = pairs
                .into_iter()
                .map(|(k, v)| vec![k.to_string(), v])
                .collect();
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
    }
    Ok(())
}
