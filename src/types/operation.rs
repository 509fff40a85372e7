//! Operation-related types for the finance ledger
//!
//! This module defines the operation record, its credit/debit type, and the
//! id-based references an operation keeps to its account and category.

use super::account::AccountId;
use super::category::CategoryId;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Operation identifier
pub type OperationId = u32;

/// Direction of an operation
///
/// Amounts are always stored unsigned; the type decides whether the amount
/// is added to or subtracted from the account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Money coming into the account
    ///
    /// Increases the account balance by the operation amount.
    Credit,

    /// Money leaving the account
    ///
    /// Decreases the account balance by the operation amount. Rejected when
    /// the balance would go below zero.
    Debit,
}

impl OperationType {
    /// Boolean form used by the interchange formats (`true` = credit)
    pub fn is_credit(self) -> bool {
        matches!(self, OperationType::Credit)
    }

    /// Apply the type's sign to an unsigned amount
    pub fn sign(self, amount: Decimal) -> Decimal {
        match self {
            OperationType::Credit => amount,
            OperationType::Debit => -amount,
        }
    }
}

impl From<bool> for OperationType {
    fn from(is_credit: bool) -> Self {
        if is_credit {
            OperationType::Credit
        } else {
            OperationType::Debit
        }
    }
}

/// A recorded credit or debit against an account
///
/// Operations reference their account and category by id only. Either side
/// may be deleted later, so every dereference goes through the store and
/// may come back empty. Operations are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    id: OperationId,
    #[serde(rename = "type")]
    op_type: OperationType,
    account_id: AccountId,
    amount: Decimal,
    date: NaiveDateTime,
    category_id: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Operation {
    /// Assemble an operation record
    ///
    /// This does not touch any balance. Use the operation engine to create
    /// operations that move money.
    pub fn new(
        id: OperationId,
        op_type: OperationType,
        account_id: AccountId,
        amount: Decimal,
        date: NaiveDateTime,
        category_id: CategoryId,
        description: Option<String>,
    ) -> Self {
        Operation {
            id,
            op_type,
            account_id,
            amount,
            date,
            category_id,
            description,
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn op_type(&self) -> OperationType {
        self.op_type
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Unsigned amount as entered
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount with the operation type's sign applied
    pub fn signed_amount(&self) -> Decimal {
        self.op_type.sign(self.amount)
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
