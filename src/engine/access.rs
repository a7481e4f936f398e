// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use crate::models::{DateWindow, Entry};
use crate::store::EntryStore;

/// Wall-clock source for cache expiry and "current month" detection.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Noon UTC on the given day.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self::at(noon.and_utc())
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}

struct CachedFetch {
    entries: Vec<Entry>,
    inserted_at: DateTime<Utc>,
}

/// Fetch results keyed by exact window. Expired slots are dropped on lookup.
pub struct EntryCache {
    ttl: Duration,
    slots: RefCell<HashMap<DateWindow, CachedFetch>>,
}

impl EntryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, window: &DateWindow, now: DateTime<Utc>) -> Option<Vec<Entry>> {
        let mut slots = self.slots.borrow_mut();
        let expired = match slots.get(window) {
            None => return None,
            Some(slot) => now - slot.inserted_at > self.ttl,
        };
        if expired {
            slots.remove(window);
            tracing::debug!(start = %window.start, end = %window.end, "cache entry expired");
            return None;
        }
        slots.get(window).map(|slot| slot.entries.clone())
    }

    pub fn insert(&self, window: DateWindow, entries: Vec<Entry>, now: DateTime<Utc>) {
        self.slots.borrow_mut().insert(
            window,
            CachedFetch {
                entries,
                inserted_at: now,
            },
        );
    }

    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wraps an [`EntryStore`] with the TTL cache. Store failures degrade to an
/// empty list and are logged, never returned.
pub struct DataAccess<S, C> {
    store: S,
    clock: C,
    cache: EntryCache,
}

impl<S: EntryStore, C: Clock> DataAccess<S, C> {
    pub fn new(store: S, clock: C, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            cache: EntryCache::new(ttl),
        }
    }

    pub fn fetch_entries(&self, window: DateWindow, use_cache: bool) -> Vec<Entry> {
        if use_cache {
            if let Some(hit) = self.cache.get(&window, self.clock.now()) {
                tracing::debug!(start = %window.start, end = %window.end, "cache hit");
                return hit;
            }
        }
        match self.store.fetch_entries(window) {
            Ok(entries) => {
                self.cache.insert(window, entries.clone(), self.clock.now());
                entries
            }
            Err(err) => {
                tracing::error!(
                    start = %window.start,
                    end = %window.end,
                    error = %err,
                    "fetching entries failed"
                );
                Vec::new()
            }
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_windows(&self) -> usize {
        self.cache.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
