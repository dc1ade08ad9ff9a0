use std::process::ExitCode;

use clap::{Args, Subcommand};
use log::{error, info};
use sift_fs::{NameFilter, WalkOptions, enumerate};
use sift_runtime::transcript::TranscriptStore;
use sift_select::{DateProperty, PeriodDirection, PeriodUnit, SelectionRule, select};

use crate::commands::{CommandResult, delete_complement};

#[derive(Debug, Args)]
pub struct TranscriptArgs {
    #[command(subcommand)]
    pub action: TranscriptAction,
}

#[derive(Debug, Subcommand)]
pub enum TranscriptAction {
    /// Show recent transcript events
    Show {
        /// Number of entries to display
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },
    /// Apply the retention policy to transcript files
    Prune {
        /// Keep the N newest transcript files
        #[arg(long, value_name = "N", default_value = "14", conflicts_with = "keep_days")]
        keep: usize,

        /// Keep transcripts written within the last N days instead
        #[arg(long, value_name = "DAYS")]
        keep_days: Option<u64>,

        /// Print what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete all transcript files
    Clear,
}

pub fn run(args: TranscriptArgs) -> ExitCode {
    let store = match TranscriptStore::new() {
        Some(s) => s,
        None => {
            info!("[transcript] transcripts are currently disabled");
            return ExitCode::from(0);
        }
    };

    match args.action {
        TranscriptAction::Show { limit } => show(&store, limit),
        TranscriptAction::Prune {
            keep,
            keep_days,
            dry_run,
        } => match prune(&store, keep, keep_days, dry_run) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("[error] {e}");
                ExitCode::from(2)
            }
        },
        TranscriptAction::Clear => clear(&store),
    }
}

fn show(store: &TranscriptStore, limit: usize) -> ExitCode {
    let events = store.recent_events(limit);

    if events.is_empty() {
        println!("No transcript events yet.");
        return ExitCode::from(0);
    }

    // Print header
    println!("{:<20}  {:>6}  {:>8}  COMMAND", "TIMESTAMP", "HITS", "TIME");
    println!("{}", "-".repeat(72));

    for event in events {
        let ts = event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

        println!(
            "{:<20}  {:>6}  {:>6}ms  {}",
            ts, event.hits, event.duration_ms, event.command
        );
    }

    ExitCode::from(0)
}

/// The retention caller: select the transcripts to keep, then delete the
/// complement. The current day's transcript is always among the newest, so
/// an active session never deletes its own file.
fn prune(
    store: &TranscriptStore,
    keep: usize,
    keep_days: Option<u64>,
    dry_run: bool,
) -> CommandResult<ExitCode> {
    let rule = match keep_days {
        Some(days) => {
            let rule = SelectionRule::RelativePeriod {
                amount: days,
                unit: PeriodUnit::Days,
                direction: PeriodDirection::WithinLast,
            };
            rule.validate()?;
            rule
        }
        None => SelectionRule::Newest(keep),
    };

    let opts = WalkOptions {
        recurse: false,
        filter: NameFilter::new("sift-*.log")?,
        ..WalkOptions::default()
    };
    let records = enumerate(store.dir(), &opts);

    let kept = select(&records, DateProperty::LastWrite, &rule)?;
    let removed = delete_complement(&records, &kept, dry_run);

    if dry_run {
        eprintln!(
            "[transcript] dry run: would delete {} of {} transcripts",
            removed,
            records.len()
        );
    } else {
        eprintln!(
            "[transcript] deleted {} of {} transcripts",
            removed,
            records.len()
        );
    }

    Ok(ExitCode::from(0))
}

fn clear(store: &TranscriptStore) -> ExitCode {
    match store.clear() {
        Ok(removed) => {
            println!("Removed {removed} transcript files");
            ExitCode::from(0)
        }
        Err(e) => {
            error!("[error] Failed to clear transcripts: {}", e);
            ExitCode::from(1)
        }
    }
}
