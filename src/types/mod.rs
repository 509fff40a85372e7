//! Types module
//!
//! Contains the plain data structures used throughout the ledger:
//! - `account`, `category`, `operation`: the three entity kinds
//! - `command`: dispatcher requests, outputs and responses
//! - `format`: interchange file formats
//! - `error`: error types for the ledger

pub mod account;
pub mod category;
pub mod command;
pub mod error;
pub mod format;
pub mod operation;

pub use account::{Account, AccountId};
pub use category::{Category, CategoryId};
pub use command::{
    AccountData, CategoryData, CommandKind, CommandOutput, CommandRequest, CommandResponse,
    CommandResult, DomainKind, EntityId, ImportReport, MiscData, OperationData, Payload,
    TimingStats,
};
pub use error::{ErrorClass, LedgerError, Result};
pub use format::LedgerFormat;
pub use operation::{Operation, OperationId, OperationType};
