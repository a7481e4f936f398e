// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{PaydayError, PaydayResult};
use crate::models::DateWindow;
use crate::utils::{month_name, previous_month};

/// Named reporting period, resolved against "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    CurrentMonth,
    LastMonth,
    CurrentYear,
    /// The current month plus the `n - 1` months before it.
    LastMonths(u32),
    Year(i32),
    Month(i32, u32),
    Custom(DateWindow),
}

impl Period {
    pub fn window(&self, today: NaiveDate) -> PaydayResult<DateWindow> {
        let (y, m) = (today.year(), today.month());
        match *self {
            Period::CurrentMonth => DateWindow::month(y, m),
            Period::LastMonth => {
                let (py, pm) = previous_month(y, m);
                DateWindow::month(py, pm)
            }
            Period::CurrentYear => year_window(y),
            Period::LastMonths(n) => {
                let (mut sy, mut sm) = (y, m);
                for _ in 1..n.max(1) {
                    (sy, sm) = previous_month(sy, sm);
                }
                let start = DateWindow::month(sy, sm)?.start;
                let end = DateWindow::month(y, m)?.end;
                DateWindow::new(start, end)
            }
            Period::Year(year) => year_window(year),
            Period::Month(year, month) => DateWindow::month(year, month),
            Period::Custom(w) => Ok(w),
        }
    }

    /// Year periods chart by month, everything else by day.
    pub fn groups_by_month(&self) -> bool {
        matches!(self, Period::CurrentYear | Period::Year(_))
    }

    pub fn label(&self) -> String {
        match *self {
            Period::CurrentMonth => "Current month".into(),
            Period::LastMonth => "Last month".into(),
            Period::CurrentYear => "Current year".into(),
            Period::LastMonths(n) => format!("Last {} months", n),
            Period::Year(y) => format!("Year {}", y),
            Period::Month(y, m) => format!("{} {}", month_name(m), y),
            Period::Custom(w) => format!("{} - {}", w.start, w.end),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Period::CurrentMonth => write!(f, "current-month"),
            Period::LastMonth => write!(f, "last-month"),
            Period::CurrentYear => write!(f, "current-year"),
            Period::LastMonths(n) => write!(f, "last-{}-months", n),
            Period::Year(y) => write!(f, "year-{}", y),
            Period::Month(y, m) => write!(f, "month-{}-{:02}", y, m),
            Period::Custom(_) => write!(f, "custom"),
        }
    }
}

impl FromStr for Period {
    type Err = PaydayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || PaydayError::InvalidPeriod(s.to_string());
        match s {
            "current-month" => return Ok(Period::CurrentMonth),
            "last-month" => return Ok(Period::LastMonth),
            "current-year" => return Ok(Period::CurrentYear),
            "last-3-months" => return Ok(Period::LastMonths(3)),
            "last-6-months" => return Ok(Period::LastMonths(6)),
            _ => {}
        }
        if let Some(rest) = s.strip_prefix("year-") {
            let year = rest.parse::<i32>().map_err(|_| bad())?;
            return Ok(Period::Year(year));
        }
        if let Some(rest) = s.strip_prefix("month-") {
            let (y, m) = rest.split_once('-').ok_or_else(bad)?;
            let year = y.parse::<i32>().map_err(|_| bad())?;
            let month = m.parse::<u32>().map_err(|_| bad())?;
            if !(1..=12).contains(&month) {
                return Err(bad());
            }
            return Ok(Period::Month(year, month));
        }
        Err(bad())
    }
}

fn year_window(year: i32) -> PaydayResult<DateWindow> {
    let start = DateWindow::month(year, 1)?.start;
    let end = DateWindow::month(year, 12)?.end;
    DateWindow::new(start, end)
}

/// The window of equal length ending the day before `window` starts.
pub fn previous_window(window: DateWindow) -> DateWindow {
    let end = window.start - Duration::days(1);
    let start = end - (window.end - window.start);
    DateWindow { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_every_named_period() {
        assert_eq!("current-month".parse::<Period>().unwrap(), Period::CurrentMonth);
        assert_eq!("last-6-months".parse::<Period>().unwrap(), Period::LastMonths(6));
        assert_eq!("year-2023".parse::<Period>().unwrap(), Period::Year(2023));
        assert_eq!(
            "month-2024-02".parse::<Period>().unwrap(),
            Period::Month(2024, 2)
        );
        assert!("month-2024-13".parse::<Period>().is_err());
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn windows_resolve_against_today() {
        let today = d("2024-01-15");
        let w = Period::LastMonth.window(today).unwrap();
        assert_eq!((w.start, w.end), (d("2023-12-01"), d("2023-12-31")));
        let w = Period::LastMonths(3).window(today).unwrap();
        assert_eq!((w.start, w.end), (d("2023-11-01"), d("2024-01-31")));
        let w = Period::CurrentYear.window(today).unwrap();
        assert_eq!((w.start, w.end), (d("2024-01-01"), d("2024-12-31")));
    }

    #[test]
    fn previous_window_has_equal_length() {
        let june = DateWindow::month(2024, 6).unwrap();
        let prev = previous_window(june);
        assert_eq!(prev.end, d("2024-05-31"));
        assert_eq!(prev.start, d("2024-05-02"));
        assert_eq!(prev.days(), june.days());
    }
}
