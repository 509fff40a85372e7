//! Interchange document shared by every codec
//!
//! A [`LedgerDocument`] is a flat snapshot of the store: accounts, then
//! categories, then operations, each record carrying its own id and the ids
//! it refers to. Codecs only translate between bytes and this document;
//! snapshot and restore rules live here so all formats behave the same.
//!
//! # Restore Rules
//!
//! - Sections are applied in order: accounts, categories, operations
//! - Every record keeps its id, and the id counters are advanced past it
//! - Account balances are taken verbatim; operations do not replay their
//!   balance effect
//! - A record with a duplicate id, or an operation whose account or category
//!   is missing, is skipped with a warning and counted in the report
//!
//! # Decimal Fields
//!
//! Balances and amounts are written as native numbers when a binary float
//! holds them exactly, and as decimal strings otherwise. Both forms are
//! accepted on read, so every stored value comes back unchanged.

use crate::core::operation_engine::OperationEngine;
use crate::core::store::LedgerStore;
use crate::core::traits::Repository;
use crate::types::{
    Account, AccountId, Category, CategoryId, ImportReport, Operation, OperationId,
    OperationType,
};
use chrono::NaiveDateTime;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

mod exact_decimal {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        match lossless_f64(value) {
            Some(float) => serializer.serialize_f64(float),
            None => serializer.serialize_str(&value.to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    /// The float whose shortest text parses back to exactly `value`
    pub(super) fn lossless_f64(value: &Decimal) -> Option<f64> {
        let float = value.to_f64()?;
        let back = Decimal::from_str(&float.to_string()).ok()?;
        (back == *value).then_some(float)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a number or a decimal string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
            Decimal::from_str(&value.to_string())
                .map_err(|_| E::invalid_value(Unexpected::Float(value), &self))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
            Decimal::from_str(value.trim())
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }
    }
}

/// Exported account: `{id, name, balance}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: AccountId,
    pub name: String,
    #[serde(with = "exact_decimal")]
    pub balance: Decimal,
}

/// Exported category: `{id, name, isPositive}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub is_positive: bool,
}

/// Exported operation
///
/// `type` is `true` for a credit. `description` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub id: OperationId,
    #[serde(rename = "type")]
    pub is_credit: bool,
    #[serde(with = "exact_decimal")]
    pub amount: Decimal,
    pub account_id: AccountId,
    pub date: NaiveDateTime,
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Whole-ledger snapshot in section order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub operations: Vec<OperationRecord>,
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        AccountRecord {
            id: account.id(),
            name: account.name().to_string(),
            balance: account.balance(),
        }
    }
}

impl From<&Category> for CategoryRecord {
    fn from(category: &Category) -> Self {
        CategoryRecord {
            id: category.id(),
            name: category.name().to_string(),
            is_positive: category.is_positive(),
        }
    }
}

impl From<&Operation> for OperationRecord {
    fn from(operation: &Operation) -> Self {
        OperationRecord {
            id: operation.id(),
            is_credit: operation.op_type().is_credit(),
            amount: operation.amount(),
            account_id: operation.account_id(),
            date: operation.date(),
            category_id: operation.category_id(),
            description: operation.description().map(str::to_string),
        }
    }
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Account::new(record.id, record.name, record.balance)
    }
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category::new(record.id, record.name, record.is_positive)
    }
}

impl From<OperationRecord> for Operation {
    fn from(record: OperationRecord) -> Self {
        Operation::new(
            record.id,
            OperationType::from(record.is_credit),
            record.account_id,
            record.amount,
            record.date,
            record.category_id,
            record.description,
        )
    }
}

impl LedgerDocument {
    /// Snapshot the store
    ///
    /// Operations whose account or category has been deleted are still
    /// written (their ids are data) and logged as warnings; importing them
    /// later will skip them.
    pub fn from_store(store: &LedgerStore) -> Self {
        for operation in store.operations().iter() {
            let dangling = store
                .resolve_account(operation)
                .and_then(|_| store.resolve_category(operation));
            if let Err(e) = dangling {
                warn!("Exporting operation {} with {}", operation.id(), e);
            }
        }

        LedgerDocument {
            accounts: store.accounts().iter().map(AccountRecord::from).collect(),
            categories: store.categories().iter().map(CategoryRecord::from).collect(),
            operations: store.operations().iter().map(OperationRecord::from).collect(),
        }
    }

    /// Apply the document to a store, section by section
    ///
    /// Never fails as a whole: bad records are skipped and counted.
    pub fn restore_into(self, store: &mut LedgerStore) -> ImportReport {
        let mut report = ImportReport::default();

        for record in self.accounts {
            match store.restore_account(record.into()) {
                Ok(()) => report.accounts += 1,
                Err(e) => {
                    warn!("Skipping account record: {}", e);
                    report.skipped += 1;
                }
            }
        }

        for record in self.categories {
            match store.restore_category(record.into()) {
                Ok(()) => report.categories += 1,
                Err(e) => {
                    warn!("Skipping category record: {}", e);
                    report.skipped += 1;
                }
            }
        }

        let mut engine = OperationEngine::new(store);
        for record in self.operations {
            let id = record.id;
            match engine.restore(record.into()) {
                Ok(()) => report.operations += 1,
                Err(e) => {
                    warn!("Skipping operation {}: {}", id, e);
                    report.skipped += 1;
                }
            }
        }

        report
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.categories.is_empty() && self.operations.is_empty()
    }
}
