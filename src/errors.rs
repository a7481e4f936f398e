// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by the store, the settings layer and entry writes.
#[derive(Debug, Error)]
pub enum PaydayError {
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("Invalid window: {start} is after {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("Invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Invalid period '{0}'")]
    InvalidPeriod(String),
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("Invalid amount '{0}': must be greater than zero")]
    InvalidAmount(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Entry on {date} belongs to another owner ({owner})")]
    Forbidden { date: NaiveDate, owner: String },
}

pub type PaydayResult<T> = Result<T, PaydayError>;
