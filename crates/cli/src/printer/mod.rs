use chrono::DateTime;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Configuration for printing selection results.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Whether to print the closing summary line.
    pub show_summary: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            show_summary: true,
        }
    }
}

/// Static context about a print run.
#[derive(Debug)]
pub struct PrintContext<'a> {
    /// Label for the operation ("list", "prune", ...).
    pub kind: &'a str,
    /// Number of selected records.
    pub total: usize,
    /// Wall time of the whole operation, if measured.
    pub duration_ms: Option<u32>,
}

/// One selected record in the result stream, already formatted for output.
#[derive(Debug)]
pub struct PrintRow<'a> {
    pub path: &'a str,
    pub size: u64,
    /// Active timestamp in unix seconds.
    pub timestamp_secs: u64,
}

impl PrintRow<'_> {
    fn timestamp_display(&self) -> String {
        DateTime::from_timestamp(self.timestamp_secs as i64, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.timestamp_secs.to_string())
    }
}

/// Trait for printing selection results.
///
/// Implementations receive a stream of rows and context, and are responsible
/// for formatting and outputting them appropriately.
pub trait SelectPrinter {
    /// Called once before any rows are printed.
    fn begin(&mut self, ctx: &PrintContext) -> io::Result<()>;

    /// Called for each selected record, in ascending timestamp order.
    fn print_row(&mut self, row: &PrintRow<'_>, ctx: &PrintContext) -> io::Result<()>;

    /// Called once after all rows are printed.
    fn finish(&mut self, ctx: &PrintContext) -> io::Result<()>;
}

/// Human-readable printer with optional color support.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            // Generic writers can't be probed for a TTY; stay plain unless
            // the caller asked for color explicitly.
            ColorChoice::Auto => false,
        };

        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    /// Create a printer that writes to stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> HumanPrinter<io::Stdout, io::Stderr> {
        use std::io::IsTerminal;

        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }

    #[inline]
    fn format_path(&self, path: &str) -> String {
        if self.use_color {
            format!("\x1b[32m{}\x1b[0m", path)
        } else {
            path.to_owned()
        }
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> JsonPrinter<io::Stdout, io::Stderr> {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }
}

impl<W: Write, E: Write> SelectPrinter for HumanPrinter<W, E> {
    fn begin(&mut self, _ctx: &PrintContext) -> io::Result<()> {
        Ok(())
    }

    fn print_row(&mut self, row: &PrintRow<'_>, _ctx: &PrintContext) -> io::Result<()> {
        let path = self.format_path(row.path);
        writeln!(
            self.out,
            "{}  {:>12}  {}",
            row.timestamp_display(),
            row.size,
            path
        )
    }

    fn finish(&mut self, ctx: &PrintContext) -> io::Result<()> {
        if self.cfg.show_summary {
            match ctx.duration_ms {
                Some(ms) => writeln!(self.err, "\n[{}] {} files in {}ms", ctx.kind, ctx.total, ms)?,
                None => writeln!(self.err, "\n[{}] {} files", ctx.kind, ctx.total)?,
            }
        }

        Ok(())
    }
}

impl<W: Write, E: Write> SelectPrinter for JsonPrinter<W, E> {
    fn begin(&mut self, _ctx: &PrintContext) -> io::Result<()> {
        Ok(())
    }

    fn print_row(&mut self, row: &PrintRow<'_>, ctx: &PrintContext) -> io::Result<()> {
        let obj = serde_json::json!({
            "kind": ctx.kind,
            "path": row.path,
            "size": row.size,
            "timestamp": row.timestamp_secs,
        });
        writeln!(self.out, "{}", obj)
    }

    fn finish(&mut self, ctx: &PrintContext) -> io::Result<()> {
        if self.cfg.show_summary {
            let obj = serde_json::json!({
                "type": "summary",
                "kind": ctx.kind,
                "total": ctx.total,
                "duration_ms": ctx.duration_ms,
            });
            writeln!(self.err, "{}", obj)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
