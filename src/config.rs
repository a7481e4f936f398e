// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime settings kept in the `settings` table.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::errors::{PaydayError, PaydayResult};

pub const DEFAULT_CACHE_TTL_MS: i64 = 300_000;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_OWNER: &str = "local";

pub const KEYS: [&str; 3] = ["cache_ttl_ms", "page_size", "owner"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub cache_ttl_ms: i64,
    pub page_size: usize,
    pub owner: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            page_size: DEFAULT_PAGE_SIZE,
            owner: DEFAULT_OWNER.to_string(),
        }
    }
}

impl Settings {
    /// Reads every known key, falling back to defaults for missing ones.
    pub fn load(conn: &Connection) -> PaydayResult<Self> {
        let mut s = Settings::default();
        if let Some(v) = get(conn, "cache_ttl_ms")? {
            s.cache_ttl_ms = parse_ttl(&v)?;
        }
        if let Some(v) = get(conn, "page_size")? {
            s.page_size = parse_page_size(&v)?;
        }
        if let Some(v) = get(conn, "owner")? {
            s.owner = v;
        }
        Ok(s)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> PaydayResult<()> {
        let value = value.trim();
        match key {
            "cache_ttl_ms" => {
                parse_ttl(value)?;
            }
            "page_size" => {
                parse_page_size(value)?;
            }
            "owner" => {
                if value.is_empty() {
                    return Err(invalid(key, "must not be empty"));
                }
            }
            _ => return Err(invalid(key, "unknown key")),
        }
        conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn as_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cache_ttl_ms", self.cache_ttl_ms.to_string()),
            ("page_size", self.page_size.to_string()),
            ("owner", self.owner.clone()),
        ]
    }
}

fn get(conn: &Connection, key: &str) -> PaydayResult<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

fn parse_ttl(v: &str) -> PaydayResult<i64> {
    match v.trim().parse::<i64>() {
        Ok(ms) if ms >= 0 => Ok(ms),
        _ => Err(invalid("cache_ttl_ms", "expected a non-negative integer")),
    }
}

fn parse_page_size(v: &str) -> PaydayResult<usize> {
    match v.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(invalid("page_size", "expected an integer >= 1")),
    }
}

fn invalid(key: &str, reason: &str) -> PaydayError {
    PaydayError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
