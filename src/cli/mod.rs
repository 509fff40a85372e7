// CLI module
// Command-line interface, argument parsing and the binary's run loop

mod args;

pub use args::CliArgs;

use crate::core::LedgerFacade;
use crate::types::{Account, Result, TimingStats};
use clap::Parser;
use log::warn;
use std::io::Write;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing input, or `--help`), clap
/// prints an error or the help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Import the input ledger, export it if requested, then print a summary
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments
/// * `output` - Writer for the account summary and statistics
///
/// # Errors
///
/// Returns an error if a format cannot be determined, the input cannot be
/// imported, the export fails, or the summary cannot be written.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<()> {
    let mut facade = LedgerFacade::new();

    let report = facade.import(&args.input_file, args.input_format()?)?;
    if report.skipped > 0 {
        warn!(
            "{} record(s) in {} were skipped",
            report.skipped,
            args.input_file.display()
        );
    }

    if let Some((path, format)) = args.export_target()? {
        facade.export(path, format)?;
    }

    write_accounts_summary(facade.store().accounts().iter(), output)?;

    if args.stats {
        write_statistics(&facade.statistics()?, output)?;
    }

    Ok(())
}

/// Write accounts as `id,name,balance` rows, sorted by id
pub fn write_accounts_summary<'a, I>(accounts: I, output: &mut dyn Write) -> Result<()>
where
    I: Iterator<Item = &'a Account>,
{
    let mut sorted: Vec<&Account> = accounts.collect();
    sorted.sort_by_key(|account| account.id());

    let mut writer = csv::Writer::from_writer(&mut *output);
    writer.write_record(["id", "name", "balance"])?;
    for account in sorted {
        writer.write_record(&[
            account.id().to_string(),
            account.name().to_string(),
            account.balance().to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

fn write_statistics(stats: &TimingStats, output: &mut dyn Write) -> Result<()> {
    writeln!(
        output,
        "commands: {}, mean: {:?}, min: {:?}, max: {:?}",
        stats.count, stats.mean, stats.min, stats.max
    )?;
    Ok(())
}
