use chrono::{DateTime, Utc};
use log::debug;
use sift_fs::{DateProperty, FileRecord};

use crate::rule::{InvalidRule, PeriodDirection, SelectionRule};

/// Apply `rule` to `records`, comparing on the `property` timestamp.
///
/// The reference "now" for relative periods is captured once here and
/// reused for every record comparison, so a long-running scan cannot see
/// the cutoff move mid-operation.
pub fn select(
    records: &[FileRecord],
    property: DateProperty,
    rule: &SelectionRule,
) -> Result<Vec<FileRecord>, InvalidRule> {
    select_at(records, property, rule, Utc::now())
}

/// Deterministic core of [`select`]: same contract, explicit reference time.
///
/// Pure over its inputs: never touches the filesystem, never deletes.
/// Results come back sorted ascending by the active timestamp regardless of
/// rule; ties preserve input order (stable sort), so identical inputs always
/// produce identical output.
pub fn select_at(
    records: &[FileRecord],
    property: DateProperty,
    rule: &SelectionRule,
    now: DateTime<Utc>,
) -> Result<Vec<FileRecord>, InvalidRule> {
    rule.validate()?;

    let mut sorted: Vec<FileRecord> = records.to_vec();
    sorted.sort_by_key(|r| r.timestamp(property));

    let len = sorted.len();
    let kept = match rule {
        SelectionRule::All => sorted,
        SelectionRule::Oldest(n) => {
            sorted.truncate((*n).min(len));
            sorted
        }
        SelectionRule::Newest(n) => sorted.split_off(len - (*n).min(len)),
        SelectionRule::SkipOldest(n) => sorted.split_off((*n).min(len)),
        SelectionRule::SkipNewest(n) => {
            sorted.truncate(len - (*n).min(len));
            sorted
        }
        SelectionRule::RelativePeriod {
            amount,
            unit,
            direction,
        } => {
            let span = i64::try_from(*amount)
                .unwrap_or(i64::MAX)
                .saturating_mul(unit.seconds());
            let cutoff = now.timestamp().saturating_sub(span);

            sorted.retain(|r| {
                let ts = r.timestamp(property) as i64;
                match direction {
                    PeriodDirection::WithinLast => ts > cutoff,
                    PeriodDirection::OlderThan => ts < cutoff,
                }
            });
            sorted
        }
        SelectionRule::DateRange { start, end } => {
            let (start, end) = (start.timestamp(), end.timestamp());
            sorted.retain(|r| {
                let ts = r.timestamp(property) as i64;
                ts > start && ts < end
            });
            sorted
        }
    };

    debug!(
        "[select] rule {:?} kept {} of {} records",
        rule,
        kept.len(),
        len
    );

    Ok(kept)
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
