//! Error types for the finance ledger
//!
//! This module defines every error a dispatcher call can report. Errors are
//! descriptive so they can be shown to a user as-is.
//!
//! # Error Classes
//!
//! - **Validation**: malformed or mismatched requests, rejected before any
//!   state changes
//! - **Not found**: a create request names an account or category that does
//!   not exist
//! - **Insufficient funds**: a debit would take an account below zero
//! - **File**: missing files, I/O failures, undecodable ledger files
//! - **Reference**: an operation points at a deleted account or category
//! - **Integrity**: id or arithmetic limits hit while mutating the store

use super::command::{CommandKind, DomainKind};
use super::format::LedgerFormat;
use rust_decimal::Decimal;
use std::path::Path;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Coarse classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    InsufficientFunds,
    File,
    Reference,
    Integrity,
}

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Create payload shaped for a different domain kind
    #[error(
        "Validation error: expected {expected} payload, got {}",
        actual.map(|k| k.to_string()).unwrap_or_else(|| "empty".to_string())
    )]
    PayloadMismatch {
        expected: DomainKind,
        actual: Option<DomainKind>,
    },

    /// Command requires a domain kind but none was given
    #[error("Validation error: {command} command requires a domain kind")]
    MissingDomain { command: CommandKind },

    /// Command requires an entity id but none was given
    #[error("Validation error: {command} {domain} requires an id")]
    MissingId {
        command: CommandKind,
        domain: DomainKind,
    },

    /// Export or import without a file path
    #[error("Validation error: {command} command requires a file path")]
    MissingFilePath { command: CommandKind },

    /// File extension does not map to a ledger format
    #[error("Validation error: cannot infer ledger format from '{path}'")]
    UnknownFormat { path: String },

    /// Operation amount is negative
    ///
    /// Amounts are unsigned; the operation type carries the direction.
    #[error("Validation error: invalid amount {amount}, amounts must not be negative")]
    InvalidAmount { amount: Decimal },

    /// Account opened with a negative balance
    #[error("Validation error: initial balance {balance} must not be negative")]
    NegativeInitialBalance { balance: Decimal },

    /// Referenced entity does not exist
    #[error("{domain} {id} not found")]
    NotFound { domain: DomainKind, id: u32 },

    /// Debit larger than the account balance
    ///
    /// The operation is rejected and the balance stays unchanged.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: u32,
        balance: Decimal,
        requested: Decimal,
    },

    /// Import source does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error while reading or writing a ledger file
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Ledger file could not be decoded
    #[error(
        "{format} parse error{}: {message}",
        line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    Parse {
        format: LedgerFormat,
        line: Option<u64>,
        message: String,
    },

    /// Operation points at an entity that has been deleted
    #[error("Dangling reference: {domain} {id} no longer exists")]
    DanglingReference { domain: DomainKind, id: u32 },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow { operation: String, account: u32 },

    /// Entity with the same id already stored
    #[error("Duplicate {domain} id {id}")]
    DuplicateId { domain: DomainKind, id: u32 },

    /// Id counter cannot advance any further
    #[error("No {domain} ids left to allocate")]
    IdSpaceExhausted { domain: DomainKind },

    /// Command produced an output of the wrong shape for its caller
    #[error("Internal error: unexpected output from {command} command")]
    UnexpectedOutput { command: CommandKind },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        if let csv::ErrorKind::Io(e) = error.kind() {
            return LedgerError::Io {
                message: e.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            format: LedgerFormat::Csv,
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            return LedgerError::Io {
                message: error.to_string(),
            };
        }
        let line = Some(error.line() as u64).filter(|&l| l > 0);

        LedgerError::Parse {
            format: LedgerFormat::Json,
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for LedgerError {
    fn from(error: serde_yaml::Error) -> Self {
        let line = error.location().map(|loc| loc.line() as u64);

        LedgerError::Parse {
            format: LedgerFormat::Yaml,
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Coarse class of this error
    pub fn class(&self) -> ErrorClass {
        match self {
            LedgerError::PayloadMismatch { .. }
            | LedgerError::MissingDomain { .. }
            | LedgerError::MissingId { .. }
            | LedgerError::MissingFilePath { .. }
            | LedgerError::UnknownFormat { .. }
            | LedgerError::InvalidAmount { .. }
            | LedgerError::NegativeInitialBalance { .. } => ErrorClass::Validation,
            LedgerError::NotFound { .. } => ErrorClass::NotFound,
            LedgerError::InsufficientFunds { .. } => ErrorClass::InsufficientFunds,
            LedgerError::FileNotFound { .. } | LedgerError::Io { .. } | LedgerError::Parse { .. } => {
                ErrorClass::File
            }
            LedgerError::DanglingReference { .. } => ErrorClass::Reference,
            LedgerError::ArithmeticOverflow { .. }
            | LedgerError::DuplicateId { .. }
            | LedgerError::IdSpaceExhausted { .. }
            | LedgerError::UnexpectedOutput { .. } => ErrorClass::Integrity,
        }
    }

    pub fn payload_mismatch(expected: DomainKind, actual: Option<DomainKind>) -> Self {
        LedgerError::PayloadMismatch { expected, actual }
    }

    pub fn missing_domain(command: CommandKind) -> Self {
        LedgerError::MissingDomain { command }
    }

    pub fn missing_id(command: CommandKind, domain: DomainKind) -> Self {
        LedgerError::MissingId { command, domain }
    }

    pub fn missing_file_path(command: CommandKind) -> Self {
        LedgerError::MissingFilePath { command }
    }

    pub fn unknown_format(path: &Path) -> Self {
        LedgerError::UnknownFormat {
            path: path.display().to_string(),
        }
    }

    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    pub fn not_found(domain: DomainKind, id: u32) -> Self {
        LedgerError::NotFound { domain, id }
    }

    pub fn insufficient_funds(account: u32, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    pub fn file_not_found(path: &Path) -> Self {
        LedgerError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create a Parse error with no line information
    pub fn parse(format: LedgerFormat, message: impl Into<String>) -> Self {
        LedgerError::Parse {
            format,
            line: None,
            message: message.into(),
        }
    }

    pub fn dangling_reference(domain: DomainKind, id: u32) -> Self {
        LedgerError::DanglingReference { domain, id }
    }

    pub fn arithmetic_overflow(operation: &str, account: u32) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    pub fn duplicate_id(domain: DomainKind, id: u32) -> Self {
        LedgerError::DuplicateId { domain, id }
    }

    pub fn unexpected_output(command: CommandKind) -> Self {
        LedgerError::UnexpectedOutput { command }
    }
}
