// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reporting engine: cached fetches, day/month aggregation, comparisons and
//! the monthly and annual reports built on top of them.

pub mod access;
pub mod aggregate;
pub mod analysis;
pub mod period;
pub mod reports;

pub use access::{Clock, DataAccess, EntryCache, ManualClock, SystemClock};
pub use period::Period;
pub use reports::ReportEngine;
