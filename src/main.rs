//! Finance Ledger CLI
//!
//! Loads a ledger file, optionally converts it to another format, and prints
//! the resulting account balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv
//! cargo run -- ledger.csv --output ledger.json
//! cargo run -- --from yaml backup --output ledger.csv --to csv --stats
//! RUST_LOG=debug cargo run -- ledger.json
//! ```
//!
//! The account summary (`id,name,balance`) goes to stdout. Log output goes
//! to stderr and is controlled by `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown format, file not found, unreadable ledger, failed export)

use rust_finance_ledger::cli;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
