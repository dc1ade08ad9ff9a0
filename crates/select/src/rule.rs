use std::fmt;

use chrono::{DateTime, Utc};

/// Time unit of a relative period expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl PeriodUnit {
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            's' => Some(PeriodUnit::Seconds),
            'm' => Some(PeriodUnit::Minutes),
            'h' => Some(PeriodUnit::Hours),
            'd' => Some(PeriodUnit::Days),
            _ => None,
        }
    }

    /// Unit length in seconds.
    pub(crate) fn seconds(self) -> i64 {
        match self {
            PeriodUnit::Seconds => 1,
            PeriodUnit::Minutes => 60,
            PeriodUnit::Hours => 3600,
            PeriodUnit::Days => 86_400,
        }
    }
}

/// Which side of the `now - amount` cutoff to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodDirection {
    /// Keep records strictly newer than the cutoff (recent files).
    WithinLast,
    /// Keep records strictly older than the cutoff (stale files).
    OlderThan,
}

/// Declarative selection intent. Exactly one variant is active per call;
/// rules are immutable and carry no resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRule {
    /// Identity: no filtering.
    All,
    /// Keep the n records with the smallest active timestamp.
    Oldest(usize),
    /// Keep the n records with the largest active timestamp.
    Newest(usize),
    /// Drop the n oldest records, keep the rest.
    SkipOldest(usize),
    /// Drop the n newest records, keep the rest.
    SkipNewest(usize),
    /// Keep records on one side of `now - amount * unit` (strict).
    RelativePeriod {
        amount: u64,
        unit: PeriodUnit,
        direction: PeriodDirection,
    },
    /// Keep records with start < timestamp < end (exclusive both ends).
    DateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl SelectionRule {
    /// Reject self-contradictory rules before any filtering work.
    ///
    /// Count rules are never invalid: n beyond the record count is clamped
    /// by the selector so batch jobs don't fail merely because fewer files
    /// exist than requested.
    pub fn validate(&self) -> Result<(), InvalidRule> {
        match self {
            SelectionRule::RelativePeriod { amount: 0, .. } => Err(InvalidRule::NonPositiveAmount),
            SelectionRule::DateRange { start, end } if start >= end => {
                Err(InvalidRule::EmptyDateRange {
                    start: *start,
                    end: *end,
                })
            }
            _ => Ok(()),
        }
    }
}

/// A malformed or self-contradictory rule. The only error the selector
/// itself can produce; it performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRule {
    /// DateRange with start >= end.
    EmptyDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// RelativePeriod amount must be at least 1.
    NonPositiveAmount,
    /// Period expression did not match the grammar.
    MalformedPeriod(String),
    /// Period unit letter outside {s, m, h, d}.
    UnknownUnit(char),
}

impl fmt::Display for InvalidRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRule::EmptyDateRange { start, end } => {
                write!(f, "date range start {start} is not before end {end}")
            }
            InvalidRule::NonPositiveAmount => write!(f, "period amount must be at least 1"),
            InvalidRule::MalformedPeriod(s) => {
                write!(f, "malformed period expression {s:?} (expected e.g. \"-2h\" or \"30d\")")
            }
            InvalidRule::UnknownUnit(c) => {
                write!(f, "unknown period unit {c:?} (expected one of s, m, h, d)")
            }
        }
    }
}

impl std::error::Error for InvalidRule {}
