// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed entry storage.
//!
//! The reporting engine only sees the [`EntryStore`] trait. Writes, paging and
//! revision history live here as free functions over a `Connection`.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::{PaydayError, PaydayResult};
use crate::models::{DateWindow, Entry, EntryRevision, Page};

/// Source of entries for a date window.
pub trait EntryStore {
    /// Entries dated within `window` (both bounds inclusive), ascending by date.
    fn fetch_entries(&self, window: DateWindow) -> PaydayResult<Vec<Entry>>;

    /// Earliest and latest entry dates, or `None` when there are no entries.
    fn date_extremes(&self) -> PaydayResult<Option<(NaiveDate, NaiveDate)>>;
}

impl<T: EntryStore + ?Sized> EntryStore for &T {
    fn fetch_entries(&self, window: DateWindow) -> PaydayResult<Vec<Entry>> {
        (**self).fetch_entries(window)
    }

    fn date_extremes(&self) -> PaydayResult<Option<(NaiveDate, NaiveDate)>> {
        (**self).date_extremes()
    }
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl EntryStore for SqliteStore<'_> {
    fn fetch_entries(&self, window: DateWindow) -> PaydayResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, date, amount, note, owner_id, revision_count FROM entries
             WHERE date>=?1 AND date<=?2 ORDER BY date ASC, id ASC",
        )?;
        let rows = stmt.query_map(
            params![window.start.to_string(), window.end.to_string()],
            RawEntry::from_row,
        )?;
        let mut out = Vec::new();
        for row in rows {
            if let Some(e) = row?.into_entry_or_warn() {
                out.push(e);
            }
        }
        Ok(out)
    }

    fn date_extremes(&self) -> PaydayResult<Option<(NaiveDate, NaiveDate)>> {
        let mut stmt = self.conn.prepare("SELECT date FROM entries")?;
        let dates = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut extremes: Option<(NaiveDate, NaiveDate)> = None;
        for d in dates {
            let d = d?;
            let Some(date) = parse_stored_date(&d) else {
                tracing::warn!(date = %d, "skipping entry with malformed date");
                continue;
            };
            extremes = Some(match extremes {
                None => (date, date),
                Some((lo, hi)) => (lo.min(date), hi.max(date)),
            });
        }
        Ok(extremes)
    }
}

/// Dates are compared as text in SQL, so only the zero-padded `YYYY-MM-DD`
/// form is accepted.
fn parse_stored_date(s: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    (date.format("%Y-%m-%d").to_string() == s).then_some(date)
}

/// A row as stored, before date and amount validation.
#[derive(Debug, Clone, Serialize)]
pub struct RawEntry {
    pub id: i64,
    pub date: String,
    pub amount: String,
    pub note: Option<String>,
    pub owner_id: String,
    pub revision_count: i64,
}

impl RawEntry {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            date: r.get(1)?,
            amount: r.get(2)?,
            note: r.get(3)?,
            owner_id: r.get(4)?,
            revision_count: r.get(5)?,
        })
    }

    /// Validates the row; the error names what is wrong with it.
    pub fn parse(&self) -> Result<Entry, String> {
        let date = parse_stored_date(&self.date)
            .ok_or_else(|| format!("malformed date '{}'", self.date))?;
        let amount = self
            .amount
            .trim()
            .parse::<Decimal>()
            .map_err(|_| format!("malformed amount '{}'", self.amount))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(format!("negative amount '{}'", self.amount));
        }
        Ok(Entry {
            id: self.id,
            date,
            amount,
            note: self.note.clone(),
            owner_id: self.owner_id.clone(),
            revision_count: self.revision_count,
        })
    }

    fn into_entry_or_warn(self) -> Option<Entry> {
        match self.parse() {
            Ok(e) => Some(e),
            Err(reason) => {
                tracing::warn!(id = self.id, %reason, "skipping malformed entry");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MalformedEntry {
    pub id: i64,
    pub date: String,
    pub amount: String,
    pub reason: String,
}

/// Rows the store refuses to hand to the reporting engine.
pub fn malformed_entries(conn: &Connection) -> PaydayResult<Vec<MalformedEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, note, owner_id, revision_count FROM entries ORDER BY id",
    )?;
    let rows = stmt.query_map([], RawEntry::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        let raw = row?;
        if let Err(reason) = raw.parse() {
            out.push(MalformedEntry {
                id: raw.id,
                date: raw.date,
                amount: raw.amount,
                reason,
            });
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordOutcome {
    Created { id: i64 },
    Updated { id: i64, revision_count: i64 },
}

/// Records the amount for a day. A day holds one entry: an existing entry is
/// revised in place (its previous amount goes to `entry_revisions`), but only
/// by its owner.
pub fn record_entry(
    conn: &Connection,
    date: NaiveDate,
    amount: Decimal,
    note: Option<&str>,
    owner: &str,
) -> PaydayResult<RecordOutcome> {
    if amount <= Decimal::ZERO {
        return Err(PaydayError::InvalidAmount(amount.to_string()));
    }
    let note = note.map(str::trim).filter(|n| !n.is_empty());
    let tx = conn.unchecked_transaction()?;
    let existing: Option<(i64, String, String, i64)> = tx
        .query_row(
            "SELECT id, amount, owner_id, revision_count FROM entries WHERE date=?1",
            params![date.to_string()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()?;

    let outcome = match existing {
        None => {
            tx.execute(
                "INSERT INTO entries(date, amount, note, owner_id, revision_count)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![date.to_string(), amount.to_string(), note, owner],
            )?;
            RecordOutcome::Created {
                id: tx.last_insert_rowid(),
            }
        }
        Some((_, _, ref existing_owner, _)) if existing_owner != owner => {
            return Err(PaydayError::Forbidden {
                date,
                owner: existing_owner.clone(),
            });
        }
        Some((id, previous, _, revisions)) => {
            tx.execute(
                "INSERT INTO entry_revisions(entry_id, previous_amount, owner_id)
                 VALUES (?1, ?2, ?3)",
                params![id, previous, owner],
            )?;
            tx.execute(
                "UPDATE entries SET amount=?1, note=?2, revision_count=?3,
                 updated_at=datetime('now') WHERE id=?4",
                params![amount.to_string(), note, revisions + 1, id],
            )?;
            RecordOutcome::Updated {
                id,
                revision_count: revisions + 1,
            }
        }
    };
    tx.commit()?;
    tracing::info!(%date, %amount, owner, ?outcome, "entry recorded");
    Ok(outcome)
}

pub fn entry_for_date(conn: &Connection, date: NaiveDate) -> PaydayResult<Option<Entry>> {
    let raw = conn
        .query_row(
            "SELECT id, date, amount, note, owner_id, revision_count FROM entries WHERE date=?1",
            params![date.to_string()],
            RawEntry::from_row,
        )
        .optional()?;
    Ok(raw.and_then(RawEntry::into_entry_or_warn))
}

/// Revisions of an entry, most recent first.
pub fn entry_history(conn: &Connection, entry_id: i64) -> PaydayResult<Vec<EntryRevision>> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM entries WHERE id=?1",
            params![entry_id],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(PaydayError::NotFound(format!("Entry {}", entry_id)));
    }
    let mut stmt = conn.prepare(
        "SELECT id, entry_id, previous_amount, owner_id, revised_at FROM entry_revisions
         WHERE entry_id=?1 ORDER BY revised_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![entry_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, entry_id, prev, owner_id, revised_at) = row?;
        let Ok(previous_amount) = prev.trim().parse::<Decimal>() else {
            tracing::warn!(id, amount = %prev, "skipping revision with malformed amount");
            continue;
        };
        out.push(EntryRevision {
            id,
            entry_id,
            previous_amount,
            owner_id,
            revised_at,
        });
    }
    Ok(out)
}

/// One page of entries, newest first. Pages start at 1.
pub fn list_page(
    conn: &Connection,
    page: usize,
    page_size: usize,
    window: Option<DateWindow>,
) -> PaydayResult<Page<Entry>> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let mut filter = String::from(" WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(w) = window {
        filter.push_str(" AND date>=? AND date<=?");
        params_vec.push(w.start.to_string());
        params_vec.push(w.end.to_string());
    }

    // Paged in memory so skipped rows do not count towards the totals
    let sql = format!(
        "SELECT id, date, amount, note, owner_id, revision_count FROM entries{} \
         ORDER BY date DESC, id DESC",
        filter
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(params_vec.iter()),
        RawEntry::from_row,
    )?;
    let mut valid = Vec::new();
    for row in rows {
        if let Some(e) = row?.into_entry_or_warn() {
            valid.push(e);
        }
    }
    let total_count = valid.len();
    let items = match (page - 1).checked_mul(page_size) {
        Some(offset) => valid.into_iter().skip(offset).take(page_size).collect(),
        None => Vec::new(),
    };
    Ok(Page {
        items,
        page,
        page_size,
        total_count,
        total_pages: total_count.div_ceil(page_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn fetch_is_inclusive_and_ascending() {
        let conn = conn();
        for (date, amt) in [("2024-06-30", "5"), ("2024-06-01", "1"), ("2024-07-01", "9")] {
            record_entry(&conn, d(date), amt.parse().unwrap(), None, "ana").unwrap();
        }
        let store = SqliteStore::new(&conn);
        let got = store
            .fetch_entries(DateWindow::month(2024, 6).unwrap())
            .unwrap();
        let dates: Vec<_> = got.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2024-06-30"]);
    }

    #[test]
    fn malformed_rows_are_skipped_not_summed() {
        let conn = conn();
        conn.execute(
            "INSERT INTO entries(date, amount, owner_id) VALUES \
             ('2024-06-02','abc','ana'), ('2024-06-03','-4','ana'), ('2024-06-04','7.50','ana')",
            [],
        )
        .unwrap();
        let store = SqliteStore::new(&conn);
        let got = store
            .fetch_entries(DateWindow::month(2024, 6).unwrap())
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].amount, dec!(7.50));
        assert_eq!(malformed_entries(&conn).unwrap().len(), 2);
    }

    #[test]
    fn non_canonical_dates_are_flagged() {
        let conn = conn();
        conn.execute(
            "INSERT INTO entries(date, amount, owner_id) VALUES \
             ('2024-06-5','10','ana'), (' 2024-06-07','20','ana'), ('2024-06-09','3','ana')",
            [],
        )
        .unwrap();
        let store = SqliteStore::new(&conn);
        let got = store
            .fetch_entries(DateWindow::month(2024, 6).unwrap())
            .unwrap();
        assert_eq!(got.len(), 1);
        let flagged: Vec<_> = malformed_entries(&conn)
            .unwrap()
            .into_iter()
            .map(|m| m.date)
            .collect();
        assert_eq!(flagged, vec!["2024-06-5", " 2024-06-07"]);
        assert_eq!(
            store.date_extremes().unwrap(),
            Some((d("2024-06-09"), d("2024-06-09")))
        );
    }

    #[test]
    fn revising_keeps_history_and_counts() {
        let conn = conn();
        let created = record_entry(&conn, d("2024-06-10"), dec!(100), Some("tips"), "ana").unwrap();
        let RecordOutcome::Created { id } = created else {
            panic!("expected a new entry");
        };
        let updated = record_entry(&conn, d("2024-06-10"), dec!(120), None, "ana").unwrap();
        assert_eq!(
            updated,
            RecordOutcome::Updated {
                id,
                revision_count: 1
            }
        );
        let history = entry_history(&conn, id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].previous_amount, dec!(100));
        let entry = entry_for_date(&conn, d("2024-06-10")).unwrap().unwrap();
        assert_eq!(entry.amount, dec!(120));
        assert_eq!(entry.note, None);
    }

    #[test]
    fn other_owners_cannot_revise() {
        let conn = conn();
        record_entry(&conn, d("2024-06-10"), dec!(100), None, "ana").unwrap();
        let err = record_entry(&conn, d("2024-06-10"), dec!(1), None, "luis").unwrap_err();
        assert!(matches!(err, PaydayError::Forbidden { .. }));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let conn = conn();
        assert!(record_entry(&conn, d("2024-06-10"), dec!(0), None, "ana").is_err());
    }

    #[test]
    fn pages_are_newest_first() {
        let conn = conn();
        for day in 1..=12 {
            record_entry(
                &conn,
                NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                dec!(10),
                None,
                "ana",
            )
            .unwrap();
        }
        let p1 = list_page(&conn, 1, 5, None).unwrap();
        assert_eq!(p1.total_count, 12);
        assert_eq!(p1.total_pages, 3);
        assert_eq!(p1.items[0].date, d("2024-06-12"));
        let p3 = list_page(&conn, 3, 5, None).unwrap();
        assert_eq!(p3.items.len(), 2);
        let w = DateWindow::new(d("2024-06-01"), d("2024-06-03")).unwrap();
        let filtered = list_page(&conn, 1, 5, Some(w)).unwrap();
        assert_eq!(filtered.total_count, 3);
    }

    #[test]
    fn huge_page_numbers_give_empty_pages() {
        let conn = conn();
        record_entry(&conn, d("2024-06-01"), dec!(10), None, "ana").unwrap();
        let page = list_page(&conn, usize::MAX, 2, None).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 1);
        let page = list_page(&conn, 2, usize::MAX, None).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn skipped_rows_do_not_count_towards_pages() {
        let conn = conn();
        conn.execute(
            "INSERT INTO entries(date, amount, owner_id) VALUES \
             ('2024-06-01','1','ana'), ('2024-06-02','abc','ana'), ('2024-06-03','3','ana')",
            [],
        )
        .unwrap();
        let page = list_page(&conn, 1, 2, None).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 2);
    }
}
