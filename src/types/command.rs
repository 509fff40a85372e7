//! Request and response shapes for the command dispatcher
//!
//! A request names a command kind, an optional domain kind, a payload for
//! creation, and miscellaneous routing data (id, file path, format). Every
//! request produces a [`CommandResult`]: either a [`CommandOutput`] or a
//! [`LedgerError`].

use super::account::{Account, AccountId};
use super::category::{Category, CategoryId};
use super::error::LedgerError;
use super::format::LedgerFormat;
use super::operation::{Operation, OperationType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Generic entity identifier used in requests
pub type EntityId = u32;

/// Action requested from the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandKind {
    Create,
    Get,
    Delete,
    Export,
    Import,
    Statistics,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Create => "create",
            CommandKind::Get => "get",
            CommandKind::Delete => "delete",
            CommandKind::Export => "export",
            CommandKind::Import => "import",
            CommandKind::Statistics => "statistics",
        };
        f.write_str(name)
    }
}

/// Which entity collection a request concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DomainKind {
    Account,
    Category,
    Operation,
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DomainKind::Account => "account",
            DomainKind::Category => "category",
            DomainKind::Operation => "operation",
        };
        f.write_str(name)
    }
}

/// Data needed to open an account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountData {
    pub name: String,
    /// Starting balance, must not be negative
    pub initial_balance: Decimal,
}

/// Data needed to create a category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryData {
    pub name: String,
    pub is_positive: bool,
}

/// Data needed to record an operation
///
/// `amount` is unsigned; `op_type` decides the direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationData {
    pub op_type: OperationType,
    pub account_id: AccountId,
    pub amount: Decimal,
    pub category_id: CategoryId,
    pub description: Option<String>,
}

/// Creation payload, one variant per domain kind
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    Empty,
    Account(AccountData),
    Category(CategoryData),
    Operation(OperationData),
}

impl Payload {
    /// Domain kind this payload is shaped for, if any
    pub fn domain(&self) -> Option<DomainKind> {
        match self {
            Payload::Empty => None,
            Payload::Account(_) => Some(DomainKind::Account),
            Payload::Category(_) => Some(DomainKind::Category),
            Payload::Operation(_) => Some(DomainKind::Operation),
        }
    }
}

/// Routing data that is not part of an entity payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiscData {
    pub id: Option<EntityId>,
    pub file_path: Option<PathBuf>,
    pub format: LedgerFormat,
}

/// A single request to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    pub command: CommandKind,
    pub domain: Option<DomainKind>,
    pub payload: Payload,
    pub misc: MiscData,
}

impl CommandRequest {
    /// Bare request with no domain, payload or routing data
    pub fn new(command: CommandKind) -> Self {
        CommandRequest {
            command,
            domain: None,
            payload: Payload::Empty,
            misc: MiscData::default(),
        }
    }

    pub fn with_domain(mut self, domain: DomainKind) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.misc.id = Some(id);
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, format: LedgerFormat) -> Self {
        self.misc.file_path = Some(path.into());
        self.misc.format = format;
        self
    }

    /// Create request; the payload must match `domain`
    pub fn create(domain: DomainKind, payload: Payload) -> Self {
        Self::new(CommandKind::Create)
            .with_domain(domain)
            .with_payload(payload)
    }

    pub fn get(domain: DomainKind, id: EntityId) -> Self {
        Self::new(CommandKind::Get).with_domain(domain).with_id(id)
    }

    /// Get without an id (only meaningful for categories)
    pub fn get_all(domain: DomainKind) -> Self {
        Self::new(CommandKind::Get).with_domain(domain)
    }

    pub fn delete(domain: DomainKind, id: EntityId) -> Self {
        Self::new(CommandKind::Delete).with_domain(domain).with_id(id)
    }

    pub fn export(path: impl Into<PathBuf>, format: LedgerFormat) -> Self {
        Self::new(CommandKind::Export).with_file(path, format)
    }

    pub fn import(path: impl Into<PathBuf>, format: LedgerFormat) -> Self {
        Self::new(CommandKind::Import).with_file(path, format)
    }

    pub fn statistics() -> Self {
        Self::new(CommandKind::Statistics)
    }
}

/// Outcome counts of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    pub accounts: usize,
    pub categories: usize,
    pub operations: usize,
    /// Records dropped because of duplicate ids or unresolved references
    pub skipped: usize,
}

/// Aggregate timing over every dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimingStats {
    pub count: usize,
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutput {
    /// Nothing to return (delete, export, get of an absent id)
    None,
    Account(Account),
    Category(Category),
    Operation(Operation),
    Categories(Vec<Category>),
    Import(ImportReport),
    Statistics(TimingStats),
}

/// Uniform result of every dispatcher call
pub type CommandResult = Result<CommandOutput, LedgerError>;

/// Flattened response for callers that want `{success, data, error}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub data: CommandOutput,
    pub error: Option<String>,
}

impl From<CommandResult> for CommandResponse {
    fn from(result: CommandResult) -> Self {
        match result {
            Ok(data) => CommandResponse {
                success: true,
                data,
                error: None,
            },
            Err(e) => CommandResponse {
                success: false,
                data: CommandOutput::None,
                error: Some(e.to_string()),
            },
        }
    }
}
