use std::collections::HashSet;
use std::io::{Stderr, Stdout};
use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Subcommand, ValueEnum};
use log::warn;
use sift_fs::{DateProperty, FileRecord, NameFilter, WalkOptions};
use sift_runtime::transcript::{TranscriptEvent, TranscriptStore};
use sift_select::{SelectionRule, parse_period};

use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, SelectPrinter,
};

pub mod list;
pub mod prune;
pub mod transcript;

pub type CommandResult<T> = Result<T>;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List files under a directory, filtered by a selection rule
    List(list::ListArgs),
    /// Delete everything a keep rule would discard
    Prune(prune::PruneArgs),
    /// Inspect or clean up diagnostic transcripts
    Transcript(transcript::TranscriptArgs),
}

/// Which file timestamp selections compare on.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DatePropertyArg {
    Created,
    #[default]
    Modified,
    Accessed,
}

impl From<DatePropertyArg> for DateProperty {
    fn from(arg: DatePropertyArg) -> Self {
        match arg {
            DatePropertyArg::Created => DateProperty::Created,
            DatePropertyArg::Modified => DateProperty::LastWrite,
            DatePropertyArg::Accessed => DateProperty::LastAccess,
        }
    }
}

/// Mutually exclusive selection-mode flags. No flag at all means "select
/// everything".
#[derive(Debug, Args)]
pub struct RuleArgs {
    /// Keep the N files with the oldest timestamp
    #[arg(long, value_name = "N")]
    pub oldest: Option<usize>,

    /// Keep the N files with the newest timestamp
    #[arg(long, value_name = "N")]
    pub newest: Option<usize>,

    /// Drop the N oldest files, keep the rest
    #[arg(long, value_name = "N")]
    pub skip_oldest: Option<usize>,

    /// Drop the N newest files, keep the rest
    #[arg(long, value_name = "N")]
    pub skip_newest: Option<usize>,

    /// Relative period, e.g. "-2h" (within last 2 hours) or "30d" (older
    /// than 30 days)
    #[arg(long, value_name = "EXPR")]
    pub period: Option<String>,

    /// Exclusive lower bound (RFC 3339 or YYYY-MM-DD); requires --before
    #[arg(long, value_name = "DATETIME", requires = "before")]
    pub after: Option<String>,

    /// Exclusive upper bound (RFC 3339 or YYYY-MM-DD); requires --after
    #[arg(long, value_name = "DATETIME", requires = "after")]
    pub before: Option<String>,
}

impl RuleArgs {
    pub fn to_rule(&self) -> Result<SelectionRule> {
        let mut modes = 0;
        for set in [
            self.oldest.is_some(),
            self.newest.is_some(),
            self.skip_oldest.is_some(),
            self.skip_newest.is_some(),
            self.period.is_some(),
            self.after.is_some(),
        ] {
            modes += usize::from(set);
        }
        if modes > 1 {
            bail!(
                "--oldest, --newest, --skip-oldest, --skip-newest, --period and \
                 --after/--before are mutually exclusive"
            );
        }

        let rule = if let Some(n) = self.oldest {
            SelectionRule::Oldest(n)
        } else if let Some(n) = self.newest {
            SelectionRule::Newest(n)
        } else if let Some(n) = self.skip_oldest {
            SelectionRule::SkipOldest(n)
        } else if let Some(n) = self.skip_newest {
            SelectionRule::SkipNewest(n)
        } else if let Some(expr) = &self.period {
            parse_period(expr)?
        } else if let (Some(after), Some(before)) = (&self.after, &self.before) {
            let rule = SelectionRule::DateRange {
                start: parse_datetime(after)?,
                end: parse_datetime(before)?,
            };
            // Surface a bad range here, with the offending values, before
            // any enumeration work happens.
            rule.validate()?;
            rule
        } else {
            SelectionRule::All
        };

        Ok(rule)
    }
}

/// Accepts RFC 3339 ("2026-08-29T10:30:00Z") or a plain date interpreted as
/// midnight UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Utc.from_utc_datetime(&dt));
    }

    bail!("unrecognized date {s:?} (expected RFC 3339 or YYYY-MM-DD)")
}

/// Shared enumeration flags.
#[derive(Debug, Args)]
pub struct WalkArgs {
    /// Descend into subdirectories
    #[arg(long, short = 'r')]
    pub recurse: bool,

    /// Only consider files whose name matches this glob (e.g. "*.log")
    #[arg(long, value_name = "GLOB")]
    pub glob: Option<String>,

    /// Worker threads for directory enumeration
    #[arg(long, default_value = "4", hide = true)]
    pub threads: usize,
}

impl WalkArgs {
    pub fn to_options(&self) -> Result<WalkOptions> {
        let filter = match &self.glob {
            Some(pattern) => NameFilter::new(pattern)?,
            None => NameFilter::any(),
        };

        Ok(WalkOptions {
            recurse: self.recurse,
            filter,
            num_threads: self.threads,
        })
    }
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output results as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Suppress the summary line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    /// Create a printer based on the output options.
    pub fn make_printer(&self) -> Box<dyn SelectPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let color = match self.color.as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        };

        let cfg = PrinterConfig {
            format,
            color,
            show_summary: !self.quiet,
        };

        match format {
            OutputFormat::Human => Box::new(HumanPrinter::<Stdout, Stderr>::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::<Stdout, Stderr>::stdout(cfg)),
        }
    }
}

/// Delete every record NOT in the kept set. The selector only ever picks
/// what to keep; discarding the complement is this caller's job.
///
/// Returns the number of files deleted (or, in dry-run mode, the number
/// that would have been).
pub fn delete_complement(records: &[FileRecord], kept: &[FileRecord], dry_run: bool) -> usize {
    let keep: HashSet<&Path> = kept.iter().map(|r| r.path.as_path()).collect();

    let mut removed = 0;
    for record in records {
        if keep.contains(record.path.as_path()) {
            continue;
        }

        if dry_run {
            println!("would delete {}", record.path.display());
            removed += 1;
            continue;
        }

        match std::fs::remove_file(&record.path) {
            Ok(()) => removed += 1,
            // Someone else got there first; the goal state is reached.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("[prune] failed to delete {:?}: {e}", record.path),
        }
    }

    removed
}

/// Best-effort transcript append; a disabled store is silently skipped.
pub fn record_transcript(command: &str, hits: usize, duration_ms: u32) {
    if let Some(store) = TranscriptStore::new() {
        store.record(TranscriptEvent::new(command.to_owned(), hits, duration_ms));
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
