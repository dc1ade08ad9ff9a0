use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::bail;
use clap::Args;
use log::info;
use sift_fs::enumerate;
use sift_select::{PeriodDirection, PeriodUnit, SelectionRule, select};

use crate::commands::{
    CommandResult, DatePropertyArg, WalkArgs, delete_complement, record_transcript,
};

#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Directory to prune
    pub root: PathBuf,

    /// Keep the N newest files, delete the rest
    #[arg(long, value_name = "N", conflicts_with = "keep_days")]
    pub keep_newest: Option<usize>,

    /// Keep files modified within the last N days, delete the rest
    #[arg(long, value_name = "DAYS")]
    pub keep_days: Option<u64>,

    /// Which timestamp to compare on
    #[arg(long, value_enum, default_value = "modified")]
    pub date_property: DatePropertyArg,

    /// Enumeration options
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Print what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

impl PruneArgs {
    /// The keep rule; everything it would discard gets deleted.
    fn keep_rule(&self) -> CommandResult<SelectionRule> {
        match (self.keep_newest, self.keep_days) {
            (Some(n), None) => Ok(SelectionRule::Newest(n)),
            (None, Some(days)) => {
                let rule = SelectionRule::RelativePeriod {
                    amount: days,
                    unit: PeriodUnit::Days,
                    direction: PeriodDirection::WithinLast,
                };
                rule.validate()?;
                Ok(rule)
            }
            (None, None) => bail!("one of --keep-newest or --keep-days is required"),
            (Some(_), Some(_)) => unreachable!("clap rejects conflicting keep flags"),
        }
    }
}

pub fn run(args: PruneArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: PruneArgs) -> CommandResult<ExitCode> {
    let started = Instant::now();

    let rule = args.keep_rule()?;
    let property = args.date_property.into();
    let opts = args.walk.to_options()?;

    let records = enumerate(&args.root, &opts);
    let kept = select(&records, property, &rule)?;

    info!(
        "[prune] {:?}: keeping {} of {} files",
        args.root,
        kept.len(),
        records.len()
    );

    let removed = delete_complement(&records, &kept, args.dry_run);

    let duration_ms = started.elapsed().as_millis() as u32;

    if args.dry_run {
        eprintln!(
            "[prune] dry run: would delete {} of {} files ({} kept)",
            removed,
            records.len(),
            kept.len()
        );
    } else {
        eprintln!(
            "[prune] deleted {} of {} files ({} kept)",
            removed,
            records.len(),
            kept.len()
        );
    }

    record_transcript("prune", kept.len(), duration_ms);

    Ok(ExitCode::SUCCESS)
}
