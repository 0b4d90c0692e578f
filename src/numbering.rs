//! Complaint number generation.
//!
//! Numbers look like `CMP-20240115-0007`: a `CMP-` prefix, the filing date,
//! and a four-digit sequence that restarts at 0001 each calendar day. The old
//! scan-the-table-for-the-max approach raced under concurrent submissions, so
//! the sequence lives in an explicit per-day counter arena: "read the current
//! maximum and reserve the next value" happens under one lock.
//!
//! The arena can be re-seeded from identifiers already in the store (process
//! restart, imported data) so a number is never issued twice.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::OmbudError;

/// Identifier prefix, fixed across the system.
pub const NUMBER_PREFIX: &str = "CMP";

/// Highest sequence a single day can issue. Four digits, no wrapping.
pub const MAX_DAILY_SEQUENCE: u32 = 9999;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CMP-(\d{8})-(\d{4})$").expect("complaint number pattern is valid")
});

/// Format a complaint number from its parts.
pub fn format_number(date: NaiveDate, sequence: u32) -> String {
    format!("{}-{}-{:04}", NUMBER_PREFIX, date.format("%Y%m%d"), sequence)
}

/// Parse a complaint number into its date and sequence, if well formed.
pub fn parse_number(number: &str) -> Option<(NaiveDate, u32)> {
    let caps = NUMBER_RE.captures(number)?;
    let date = NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y%m%d").ok()?;
    let sequence: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some((date, sequence))
}

/// Per-day monotonic counter arena.
///
/// `next` holds the lock for the whole compute-and-reserve step, so two
/// concurrent submissions can never observe the same maximum. Counters for
/// past days are retained; they are a handful of entries per day and make the
/// daily-reset behavior trivial to verify.
#[derive(Debug, Default)]
pub struct SequenceArena {
    counters: Mutex<HashMap<NaiveDate, u32>>,
}

impl SequenceArena {
    pub fn new() -> Self {
        SequenceArena {
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Reserve the next sequence for `date` and return the formatted number.
    ///
    /// Fails with `Conflict` once the day's four-digit space is exhausted;
    /// the sequence never wraps.
    pub fn next(&self, date: NaiveDate) -> Result<String, OmbudError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| OmbudError::Conflict("sequence arena lock poisoned".to_string()))?;
        let counter = counters.entry(date).or_insert(0);
        if *counter >= MAX_DAILY_SEQUENCE {
            return Err(OmbudError::Conflict(format!(
                "daily sequence exhausted for {date}"
            )));
        }
        *counter += 1;
        Ok(format_number(date, *counter))
    }

    /// Raise high-water marks from identifiers that already exist.
    ///
    /// Malformed identifiers are skipped; a mark is only ever raised, never
    /// lowered, so seeding after issuing numbers is safe.
    pub fn seed<'a, I>(&self, existing: I) -> Result<(), OmbudError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| OmbudError::Conflict("sequence arena lock poisoned".to_string()))?;
        for number in existing {
            if let Some((date, sequence)) = parse_number(number) {
                let counter = counters.entry(date).or_insert(0);
                if sequence > *counter {
                    *counter = sequence;
                }
            }
        }
        Ok(())
    }

    /// Last sequence issued for `date`, zero if none.
    pub fn current(&self, date: NaiveDate) -> u32 {
        self.counters
            .lock()
            .map(|counters| counters.get(&date).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}
