// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod entries;
pub mod reports;
pub mod exporter;
pub mod doctor;
pub mod settings;

use anyhow::Result;

use crate::models::DateWindow;
use crate::utils::{parse_date, parse_month};

/// Resolves `--month` or `--from/--to` into a window, if either was given.
pub fn window_arg(sub: &clap::ArgMatches) -> Result<Option<DateWindow>> {
    if let Some(month) = sub.get_one::<String>("month") {
        let (y, m) = parse_month(month)?;
        return Ok(Some(DateWindow::month(y, m)?));
    }
    match (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        (Some(from), Some(to)) => Ok(Some(DateWindow::new(parse_date(from)?, parse_date(to)?)?)),
        _ => Ok(None),
    }
}
