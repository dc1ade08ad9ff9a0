use super::*;
use crate::rule::PeriodUnit;
use chrono::DateTime;
use std::collections::BTreeSet;
use std::path::PathBuf;

const DAY: u64 = 86_400;

fn rec(name: &str, ts: u64) -> FileRecord {
    FileRecord {
        path: PathBuf::from(format!("/data/{name}")),
        name: name.to_owned(),
        size: 1,
        mtime_secs: ts,
        ctime_secs: ts,
        atime_secs: ts,
    }
}

/// Five files with timestamps at day 1..=5.
fn five_days() -> Vec<FileRecord> {
    (1..=5).map(|d| rec(&format!("day{d}"), d * DAY)).collect()
}

fn utc(secs: u64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs as i64, 0).expect("in-range timestamp")
}

fn names(records: &[FileRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

fn name_set(records: &[FileRecord]) -> BTreeSet<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

fn run(records: &[FileRecord], rule: SelectionRule) -> Vec<FileRecord> {
    select_at(records, DateProperty::LastWrite, &rule, utc(6 * DAY))
        .unwrap_or_else(|e| panic!("rule should be valid: {e}"))
}

#[test]
fn five_day_scenario() {
    let r = five_days();

    let cases: &[(SelectionRule, &[&str])] = &[
        (SelectionRule::Oldest(2), &["day1", "day2"]),
        (SelectionRule::Newest(2), &["day4", "day5"]),
        (SelectionRule::SkipOldest(2), &["day3", "day4", "day5"]),
        (SelectionRule::SkipNewest(2), &["day1", "day2", "day3"]),
        (
            SelectionRule::All,
            &["day1", "day2", "day3", "day4", "day5"],
        ),
        // now = day 6, cutoff = day 3: strictly older than the cutoff
        (
            SelectionRule::RelativePeriod {
                amount: 3,
                unit: PeriodUnit::Days,
                direction: PeriodDirection::OlderThan,
            },
            &["day1", "day2"],
        ),
        // ...and strictly within the last 3 days
        (
            SelectionRule::RelativePeriod {
                amount: 3,
                unit: PeriodUnit::Days,
                direction: PeriodDirection::WithinLast,
            },
            &["day4", "day5"],
        ),
    ];

    for (rule, expected) in cases {
        let kept = run(&r, rule.clone());
        assert_eq!(names(&kept), *expected, "rule: {:?}", rule);
    }
}

#[test]
fn count_rules_clamp_instead_of_erroring() {
    let r = five_days();

    for n in [5, 6, 100] {
        let all = run(&r, SelectionRule::Oldest(n));
        assert_eq!(all.len(), 5, "Oldest({n}) returns everything");

        let all = run(&r, SelectionRule::Newest(n));
        assert_eq!(all.len(), 5, "Newest({n}) returns everything");

        let none = run(&r, SelectionRule::SkipOldest(n));
        assert!(none.is_empty(), "SkipOldest({n}) returns nothing");

        let none = run(&r, SelectionRule::SkipNewest(n));
        assert!(none.is_empty(), "SkipNewest({n}) returns nothing");
    }
}

#[test]
fn zero_count_rules() {
    let r = five_days();

    assert!(run(&r, SelectionRule::Oldest(0)).is_empty());
    assert!(run(&r, SelectionRule::Newest(0)).is_empty());
    assert_eq!(run(&r, SelectionRule::SkipOldest(0)).len(), 5);
    assert_eq!(run(&r, SelectionRule::SkipNewest(0)).len(), 5);
}

#[test]
fn keep_and_skip_partition_the_input() {
    let r = five_days();
    let full = name_set(&r);

    for n in 0..=5 {
        let oldest = run(&r, SelectionRule::Oldest(n));
        let skip_oldest = run(&r, SelectionRule::SkipOldest(n));

        let union: BTreeSet<&str> = name_set(&oldest).union(&name_set(&skip_oldest)).copied().collect();
        assert_eq!(union, full, "Oldest({n}) ∪ SkipOldest({n}) covers the input");
        assert!(
            name_set(&oldest).is_disjoint(&name_set(&skip_oldest)),
            "Oldest({n}) and SkipOldest({n}) are disjoint"
        );

        let newest = run(&r, SelectionRule::Newest(n));
        let skip_newest = run(&r, SelectionRule::SkipNewest(n));

        let union: BTreeSet<&str> = name_set(&newest).union(&name_set(&skip_newest)).copied().collect();
        assert_eq!(union, full, "Newest({n}) ∪ SkipNewest({n}) covers the input");
        assert!(name_set(&newest).is_disjoint(&name_set(&skip_newest)));
    }
}

#[test]
fn all_is_idempotent() {
    // Unsorted input: All sorts ascending, and re-applying changes nothing.
    let r = vec![rec("c", 3 * DAY), rec("a", DAY), rec("b", 2 * DAY)];

    let once = run(&r, SelectionRule::All);
    assert_eq!(names(&once), ["a", "b", "c"]);

    let twice = run(&once, SelectionRule::All);
    assert_eq!(names(&twice), names(&once));
}

#[test]
fn equal_timestamps_preserve_input_order() {
    let r = vec![
        rec("first", DAY),
        rec("second", DAY),
        rec("third", DAY),
        rec("newer", 2 * DAY),
    ];

    let kept = run(&r, SelectionRule::Oldest(3));
    assert_eq!(names(&kept), ["first", "second", "third"]);

    let kept = run(&r, SelectionRule::All);
    assert_eq!(names(&kept), ["first", "second", "third", "newer"]);

    let kept = run(&r, SelectionRule::Newest(2));
    assert_eq!(names(&kept), ["third", "newer"]);
}

#[test]
fn results_are_always_ascending_by_timestamp() {
    let r = vec![
        rec("e", 5 * DAY),
        rec("b", 2 * DAY),
        rec("d", 4 * DAY),
        rec("a", DAY),
        rec("c", 3 * DAY),
    ];

    let cases = [
        SelectionRule::All,
        SelectionRule::Newest(3),
        SelectionRule::SkipOldest(1),
        SelectionRule::RelativePeriod {
            amount: 4,
            unit: PeriodUnit::Days,
            direction: PeriodDirection::WithinLast,
        },
    ];

    for rule in cases {
        let kept = run(&r, rule.clone());
        let stamps: Vec<u64> = kept
            .iter()
            .map(|rec| rec.timestamp(DateProperty::LastWrite))
            .collect();
        let mut sorted = stamps.clone();
        sorted.sort_unstable();
        assert_eq!(stamps, sorted, "rule {:?} output must be ascending", rule);
    }
}

#[test]
fn date_range_is_exclusive_on_both_ends() {
    let r = five_days();

    let kept = run(
        &r,
        SelectionRule::DateRange {
            start: utc(2 * DAY),
            end: utc(4 * DAY),
        },
    );

    // day2 == start and day4 == end are both excluded.
    assert_eq!(names(&kept), ["day3"]);
}

#[test]
fn date_range_start_not_before_end_is_invalid() {
    let ranges = [
        (utc(4 * DAY), utc(2 * DAY)),
        (utc(3 * DAY), utc(3 * DAY)), // start == end
    ];

    for (start, end) in ranges {
        for records in [five_days(), Vec::new()] {
            let result = select_at(
                &records,
                DateProperty::LastWrite,
                &SelectionRule::DateRange { start, end },
                utc(6 * DAY),
            );
            match result {
                Err(InvalidRule::EmptyDateRange { start: s, end: e }) => {
                    assert_eq!(s, start);
                    assert_eq!(e, end);
                }
                other => panic!("expected EmptyDateRange, got {:?}", other),
            }
        }
    }
}

#[test]
fn relative_period_zero_amount_is_invalid() {
    let rule = SelectionRule::RelativePeriod {
        amount: 0,
        unit: PeriodUnit::Hours,
        direction: PeriodDirection::WithinLast,
    };

    match select_at(&five_days(), DateProperty::LastWrite, &rule, utc(6 * DAY)) {
        Err(InvalidRule::NonPositiveAmount) => {}
        other => panic!("expected NonPositiveAmount, got {:?}", other),
    }
}

#[test]
fn relative_period_cutoff_is_strict() {
    // cutoff = day 6 - 3 days = day 3; a record exactly at the cutoff is
    // excluded in both directions.
    let r = vec![rec("at_cutoff", 3 * DAY)];

    for direction in [PeriodDirection::WithinLast, PeriodDirection::OlderThan] {
        let kept = run(
            &r,
            SelectionRule::RelativePeriod {
                amount: 3,
                unit: PeriodUnit::Days,
                direction,
            },
        );
        assert!(kept.is_empty(), "direction: {:?}", direction);
    }
}

#[test]
fn empty_input_yields_empty_output() {
    let empty: Vec<FileRecord> = Vec::new();

    let rules = [
        SelectionRule::All,
        SelectionRule::Oldest(3),
        SelectionRule::Newest(3),
        SelectionRule::SkipOldest(3),
        SelectionRule::SkipNewest(3),
        SelectionRule::RelativePeriod {
            amount: 1,
            unit: PeriodUnit::Hours,
            direction: PeriodDirection::OlderThan,
        },
        SelectionRule::DateRange {
            start: utc(DAY),
            end: utc(2 * DAY),
        },
    ];

    for rule in rules {
        let kept = run(&empty, rule.clone());
        assert!(kept.is_empty(), "rule: {:?}", rule);
    }
}

#[test]
fn date_property_switches_the_compared_timestamp() {
    let mut a = rec("a", 0);
    a.ctime_secs = DAY;
    a.mtime_secs = 3 * DAY;
    a.atime_secs = 5 * DAY;

    let mut b = rec("b", 0);
    b.ctime_secs = 2 * DAY;
    b.mtime_secs = DAY;
    b.atime_secs = 4 * DAY;

    let r = vec![a, b];

    let cases: &[(DateProperty, &[&str])] = &[
        (DateProperty::Created, &["a"]),
        (DateProperty::LastWrite, &["b"]),
        (DateProperty::LastAccess, &["b"]),
    ];

    for (property, expected) in cases {
        let kept = select_at(&r, *property, &SelectionRule::Oldest(1), utc(6 * DAY))
            .expect("valid rule");
        assert_eq!(names(&kept), *expected, "property: {:?}", property);
    }
}

#[test]
fn select_uses_wall_clock_once() {
    // Coarse check of the Utc::now() convenience wrapper: a record stamped
    // far in the past is "older than" one hour, a fresh one is not.
    let old = rec("old", DAY);
    let fresh = rec(
        "fresh",
        Utc::now().timestamp().max(0) as u64,
    );

    let rule = SelectionRule::RelativePeriod {
        amount: 1,
        unit: PeriodUnit::Hours,
        direction: PeriodDirection::OlderThan,
    };

    let kept = select(&[old, fresh], DateProperty::LastWrite, &rule).expect("valid rule");
    assert_eq!(names(&kept), ["old"]);
}

#[test]
fn parsed_period_feeds_straight_into_select() {
    let r = five_days();

    let rule = crate::parse_period("3d").expect("valid period");
    let kept = select_at(&r, DateProperty::LastWrite, &rule, utc(6 * DAY)).unwrap();
    assert_eq!(names(&kept), ["day1", "day2"]);

    let rule = crate::parse_period("-3d").expect("valid period");
    let kept = select_at(&r, DateProperty::LastWrite, &rule, utc(6 * DAY)).unwrap();
    assert_eq!(names(&kept), ["day4", "day5"]);
}
