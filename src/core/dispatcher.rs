//! Command dispatcher
//!
//! The single entry point for ledger commands. Every request is validated
//! into a `Route` before anything runs, so a malformed request never
//! touches the store or the timing statistics. Valid requests run through
//! [`TimingCollector::time`]; the Statistics command itself is not timed.
//!
//! All handler failures come back as the uniform [`CommandResult`] and are
//! logged here at error level.

use crate::core::operation_engine::OperationEngine;
use crate::core::store::LedgerStore;
use crate::core::timing::TimingCollector;
use crate::io::codec::{create_codec, export_to_file, import_from_file};
use crate::types::{
    AccountData, CategoryData, CommandKind, CommandOutput, CommandRequest, CommandResult,
    DomainKind, EntityId, LedgerError, LedgerFormat, OperationData, Payload, Result,
    TimingStats,
};
use log::{debug, error};
use std::path::Path;

/// A request that passed validation
#[derive(Debug)]
enum Route<'a> {
    /// Read the timing statistics; not itself timed
    Statistics,
    Timed(Action<'a>),
}

/// Timed work, with every required field present
#[derive(Debug, Clone, PartialEq)]
enum Action<'a> {
    CreateAccount(&'a AccountData),
    CreateCategory(&'a CategoryData),
    CreateOperation(&'a OperationData),
    Get(DomainKind, EntityId),
    ListCategories,
    Delete(DomainKind, EntityId),
    Export(&'a Path, LedgerFormat),
    Import(&'a Path, LedgerFormat),
}

/// Routes commands to the store, engine and codecs
///
/// Owns the ledger store and the timing statistics for its lifetime.
#[derive(Debug, Default)]
pub struct Dispatcher {
    store: LedgerStore,
    timing: TimingCollector,
}

impl Dispatcher {
    /// Create a dispatcher over an empty ledger
    pub fn new() -> Self {
        Dispatcher {
            store: LedgerStore::new(),
            timing: TimingCollector::new(),
        }
    }

    /// Create a dispatcher over an existing store
    pub fn with_store(store: LedgerStore) -> Self {
        Dispatcher {
            store,
            timing: TimingCollector::new(),
        }
    }

    /// Validate and execute one command
    ///
    /// # Arguments
    ///
    /// * `request` - Command kind, optional domain kind, payload and routing data
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutput)` - Entity, category list, import report, statistics
    ///   or `CommandOutput::None`
    /// * `Err(LedgerError)` - Validation failure or handler failure
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Create/Get/Delete has no domain kind, or Get/Delete has no id
    /// - A Create payload does not match its domain kind
    /// - Export/Import has no file path, or the import file does not exist
    /// - The handler fails (insufficient funds, missing account, I/O, parse)
    ///
    /// Validation failures leave the store and statistics unchanged.
    pub fn dispatch(&mut self, request: &CommandRequest) -> CommandResult {
        let result = self.route(request);
        if let Err(e) = &result {
            error!("{} command failed: {}", request.command, e);
        }
        result
    }

    fn route(&mut self, request: &CommandRequest) -> CommandResult {
        match validate(request)? {
            Route::Statistics => Ok(CommandOutput::Statistics(self.timing.stats())),
            Route::Timed(action) => {
                debug!("Dispatching {:?}", action);
                let store = &mut self.store;
                self.timing.time(|| handle(store, action))
            }
        }
    }

    /// Aggregate timing over every timed command so far
    pub fn statistics(&self) -> TimingStats {
        self.timing.stats()
    }

    /// Clear the ledger and reset all id counters
    ///
    /// Timing statistics are kept.
    pub fn flush(&mut self) {
        self.store.reset();
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }
}

/// Check a request and extract what its handler needs
///
/// Reads the filesystem only to check that an import file exists.
fn validate(request: &CommandRequest) -> Result<Route<'_>> {
    let command = request.command;
    let id = request.misc.id;

    let action = match command {
        CommandKind::Create => {
            let domain = request
                .domain
                .ok_or_else(|| LedgerError::missing_domain(command))?;
            match (domain, &request.payload) {
                (DomainKind::Account, Payload::Account(data)) => Action::CreateAccount(data),
                (DomainKind::Category, Payload::Category(data)) => Action::CreateCategory(data),
                (DomainKind::Operation, Payload::Operation(data)) => Action::CreateOperation(data),
                (expected, payload) => {
                    return Err(LedgerError::payload_mismatch(expected, payload.domain()))
                }
            }
        }
        CommandKind::Get => {
            let domain = request
                .domain
                .ok_or_else(|| LedgerError::missing_domain(command))?;
            match (domain, id) {
                (_, Some(id)) => Action::Get(domain, id),
                (DomainKind::Category, None) => Action::ListCategories,
                (_, None) => return Err(LedgerError::missing_id(command, domain)),
            }
        }
        CommandKind::Delete => {
            let domain = request
                .domain
                .ok_or_else(|| LedgerError::missing_domain(command))?;
            let id = id.ok_or_else(|| LedgerError::missing_id(command, domain))?;
            Action::Delete(domain, id)
        }
        CommandKind::Export => Action::Export(file_path(request)?, request.misc.format),
        CommandKind::Import => {
            let path = file_path(request)?;
            if !path.is_file() {
                return Err(LedgerError::file_not_found(path));
            }
            Action::Import(path, request.misc.format)
        }
        CommandKind::Statistics => return Ok(Route::Statistics),
    };

    Ok(Route::Timed(action))
}

fn file_path(request: &CommandRequest) -> Result<&Path> {
    request
        .misc
        .file_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| LedgerError::missing_file_path(request.command))
}

fn handle(store: &mut LedgerStore, action: Action<'_>) -> CommandResult {
    match action {
        Action::CreateAccount(data) => store
            .create_account(&data.name, data.initial_balance)
            .map(CommandOutput::Account),
        Action::CreateCategory(data) => store
            .create_category(&data.name, data.is_positive)
            .map(CommandOutput::Category),
        Action::CreateOperation(data) => OperationEngine::new(store)
            .create(data)
            .map(CommandOutput::Operation),
        Action::Get(domain, id) => Ok(get(store, domain, id)),
        Action::ListCategories => Ok(CommandOutput::Categories(
            store.categories().iter().cloned().collect(),
        )),
        Action::Delete(domain, id) => {
            let removed = match domain {
                DomainKind::Account => store.delete_account(id).is_some(),
                DomainKind::Category => store.delete_category(id).is_some(),
                DomainKind::Operation => store.delete_operation(id).is_some(),
            };
            if !removed {
                debug!("Nothing to delete: no {} with id {}", domain, id);
            }
            Ok(CommandOutput::None)
        }
        Action::Export(path, format) => {
            export_to_file(create_codec(format).as_ref(), store, path)?;
            Ok(CommandOutput::None)
        }
        Action::Import(path, format) => {
            import_from_file(create_codec(format).as_ref(), path, store).map(CommandOutput::Import)
        }
    }
}

/// Look up one entity; an absent id is `CommandOutput::None`
fn get(store: &LedgerStore, domain: DomainKind, id: EntityId) -> CommandOutput {
    let found = match domain {
        DomainKind::Account => store.account(id).cloned().map(CommandOutput::Account),
        DomainKind::Category => store.category(id).cloned().map(CommandOutput::Category),
        DomainKind::Operation => store.operation(id).cloned().map(CommandOutput::Operation),
    };
    found.unwrap_or(CommandOutput::None)
}
