//! Account-related types for the finance ledger
//!
//! This module defines the Account structure. An account's balance is only
//! ever changed by the operation engine; everything else treats it as
//! read-only.

use rust_decimal::Decimal;
use serde::Serialize;

/// Account identifier
pub type AccountId = u32;

/// A named account with a running balance
///
/// Identity is the `id`. The balance reflects every operation applied to the
/// account through the operation engine, and is never negative as a result
/// of such an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    id: AccountId,
    name: String,
    balance: Decimal,
}

impl Account {
    /// Create an account record
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier issued by the account id allocator
    /// * `name` - Display name
    /// * `balance` - Balance the account starts with
    pub fn new(id: AccountId, name: impl Into<String>, balance: Decimal) -> Self {
        Account {
            id,
            name: name.into(),
            balance,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }
}
