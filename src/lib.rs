//! Rust Finance Ledger Library
//! # Overview
//!
//! This library provides an in-memory personal finance ledger: accounts,
//! income/expense categories and the operations that move account balances,
//! driven through a single command dispatcher and persisted as CSV, JSON or
//! YAML.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Category, Operation, commands, errors)
//! - [`cli`] - CLI argument parsing and the binary's run loop
//! - [`core`] - Business logic components:
//!   - [`core::store`] - Entity collections and id allocation
//!   - [`core::operation_engine`] - Balance-changing operations
//!   - [`core::dispatcher`] - Request validation, routing and timing
//!   - [`core::facade`] - Typed calls over the dispatcher
//! - [`io`] - Interchange codecs for whole-ledger export and import
//!
//! # Operations
//!
//! Every operation carries an unsigned amount and a type:
//!
//! - **Credit**: adds the amount to the account balance
//! - **Debit**: subtracts the amount; rejected if the balance would go below zero
//!
//! Deleting an operation does not reverse its effect on the balance.
//!
//! # Commands
//!
//! The dispatcher accepts Create, Get and Delete for each entity kind, plus
//! Export, Import and Statistics. Every command returns a
//! [`types::CommandResult`]; failures are logged and never panic.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{Dispatcher, LedgerFacade, LedgerStore, OperationEngine};
pub use io::{create_codec, LedgerCodec, LedgerDocument};
pub use types::{
    Account, AccountId, Category, CategoryId, CommandOutput, CommandRequest, CommandResponse,
    CommandResult, LedgerError, LedgerFormat, Operation, OperationId, OperationType,
};
