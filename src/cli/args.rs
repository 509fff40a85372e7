use crate::types::{LedgerFormat, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Load a personal finance ledger and optionally convert it
#[derive(Parser, Debug)]
#[command(name = "finance-ledger")]
#[command(about = "Load a finance ledger file, print its accounts, optionally convert it", long_about = None)]
pub struct CliArgs {
    /// Ledger file to import
    #[arg(value_name = "INPUT", help = "Path to the ledger file to import")]
    pub input_file: PathBuf,

    /// Format of the input file
    #[arg(
        long = "from",
        value_name = "FORMAT",
        help = "Input format: csv, json or yaml (default: inferred from the extension)"
    )]
    pub from: Option<LedgerFormat>,

    /// File to export the loaded ledger to
    #[arg(long = "output", short = 'o', value_name = "PATH", help = "Export the ledger to this file")]
    pub output_file: Option<PathBuf>,

    /// Format of the exported file
    #[arg(
        long = "to",
        value_name = "FORMAT",
        help = "Output format: csv, json or yaml (default: inferred from the output extension, else the input format)"
    )]
    pub to: Option<LedgerFormat>,

    /// Print timing statistics after processing
    #[arg(long = "stats", help = "Print command timing statistics")]
    pub stats: bool,
}

impl CliArgs {
    /// Format to read the input file with
    ///
    /// # Errors
    ///
    /// Returns `UnknownFormat` if `--from` is absent and the input extension
    /// is not recognized.
    pub fn input_format(&self) -> Result<LedgerFormat> {
        match self.from {
            Some(format) => Ok(format),
            None => LedgerFormat::from_path(&self.input_file),
        }
    }

    /// Export target and its format, if `--output` was given
    ///
    /// Without `--to`, the format is inferred from the output extension and
    /// falls back to the input format.
    pub fn export_target(&self) -> Result<Option<(&Path, LedgerFormat)>> {
        let Some(path) = self.output_file.as_deref() else {
            return Ok(None);
        };

        let format = match self.to {
            Some(format) => format,
            None => match LedgerFormat::from_path(path) {
                Ok(format) => format,
                Err(_) => self.input_format()?,
            },
        };
        Ok(Some((path, format)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerError;
    use rstest::rstest;

    #[rstest]
    #[case::inferred_csv(&["program", "ledger.csv"], LedgerFormat::Csv)]
    #[case::inferred_yml(&["program", "ledger.YML"], LedgerFormat::Yaml)]
    #[case::explicit_overrides_extension(&["program", "--from", "json", "ledger.csv"], LedgerFormat::Json)]
    #[case::explicit_without_extension(&["program", "--from", "yaml", "ledger"], LedgerFormat::Yaml)]
    fn test_input_format(#[case] args: &[&str], #[case] expected: LedgerFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.input_format().unwrap(), expected);
    }

    #[test]
    fn test_input_format_unknown_extension() {
        let parsed = CliArgs::try_parse_from(["program", "ledger.txt"]).unwrap();
        assert!(matches!(
            parsed.input_format(),
            Err(LedgerError::UnknownFormat { .. })
        ));
    }

    #[rstest]
    #[case::no_output(&["program", "in.csv"], None)]
    #[case::inferred_from_output(&["program", "in.csv", "--output", "out.json"], Some(LedgerFormat::Json))]
    #[case::explicit_to(&["program", "in.csv", "-o", "out.json", "--to", "yaml"], Some(LedgerFormat::Yaml))]
    #[case::falls_back_to_input(&["program", "in.yaml", "--output", "backup"], Some(LedgerFormat::Yaml))]
    fn test_export_target(#[case] args: &[&str], #[case] expected: Option<LedgerFormat>) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let target = parsed.export_target().unwrap();
        assert_eq!(target.map(|(_, format)| format), expected);
    }

    #[rstest]
    #[case::stats_flag(&["program", "--stats", "in.csv"], true)]
    #[case::no_stats(&["program", "in.csv"], false)]
    fn test_stats_flag(#[case] args: &[&str], #[case] expected: bool) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.stats, expected);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_format(&["program", "--from", "xml", "in.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
