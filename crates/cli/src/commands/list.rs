use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Args;
use sift_fs::enumerate;
use sift_select::select;

use crate::commands::{
    CommandResult, DatePropertyArg, OutputOptions, RuleArgs, WalkArgs, record_transcript,
};
use crate::printer::{PrintContext, PrintRow};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory to enumerate
    pub root: PathBuf,

    /// Selection rule
    #[command(flatten)]
    pub rule: RuleArgs,

    /// Which timestamp to compare on
    #[arg(long, value_enum, default_value = "modified")]
    pub date_property: DatePropertyArg,

    /// Enumeration options
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Output formatting options
    #[command(flatten)]
    pub output: OutputOptions,
}

pub fn run(args: ListArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: ListArgs) -> CommandResult<ExitCode> {
    let started = Instant::now();

    // Validate the rule before touching the filesystem.
    let rule = args.rule.to_rule()?;
    let property = args.date_property.into();
    let opts = args.walk.to_options()?;

    let records = enumerate(&args.root, &opts);
    let kept = select(&records, property, &rule)?;

    let duration_ms = started.elapsed().as_millis() as u32;

    let mut printer = args.output.make_printer();
    let ctx = PrintContext {
        kind: "list",
        total: kept.len(),
        duration_ms: Some(duration_ms),
    };

    printer.begin(&ctx)?;
    for record in &kept {
        let path = record.path.to_string_lossy();
        let row = PrintRow {
            path: &path,
            size: record.size,
            timestamp_secs: record.timestamp(property),
        };
        printer.print_row(&row, &ctx)?;
    }
    printer.finish(&ctx)?;

    record_transcript("list", kept.len(), duration_ms);

    Ok(ExitCode::SUCCESS)
}
