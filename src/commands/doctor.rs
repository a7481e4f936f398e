// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Rows the store skips: bad dates, bad or negative amounts
    for bad in crate::store::malformed_entries(conn)? {
        rows.push(vec![
            "malformed_entry".into(),
            format!("#{} {} '{}': {}", bad.id, bad.date, bad.amount, bad.reason),
        ]);
    }

    // 2) Revision counters that disagree with the revision log
    let mut stmt = conn.prepare(
        "SELECT e.id, e.date, e.revision_count, COUNT(r.id)
         FROM entries e LEFT JOIN entry_revisions r ON r.entry_id=e.id
         GROUP BY e.id HAVING e.revision_count != COUNT(r.id) ORDER BY e.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let counted: i64 = r.get(2)?;
        let logged: i64 = r.get(3)?;
        rows.push(vec![
            "revision_mismatch".into(),
            format!("#{} {}: counter {} vs {} logged", id, date, counted, logged),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
