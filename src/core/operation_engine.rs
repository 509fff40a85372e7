//! Operation processing engine
//!
//! This module provides the OperationEngine, the only path by which an
//! account balance changes. It validates an operation against its account,
//! enforces the no-negative-balance rule, and records the operation.
//!
//! The engine enforces:
//! - Amounts are unsigned; the operation type supplies the sign
//! - The referenced account and category exist at creation time
//! - A debit never takes the balance below zero
//! - Balance and id updates happen together or not at all

use crate::core::store::LedgerStore;
use crate::core::traits::Repository;
use crate::types::{DomainKind, LedgerError, Operation, OperationData, OperationId};
use chrono::{Local, NaiveDateTime};
use log::debug;
use rust_decimal::Decimal;

/// Applies operations to a ledger store
///
/// Borrows the store for the duration of one or more operations.
pub struct OperationEngine<'a> {
    store: &'a mut LedgerStore,
}

impl<'a> OperationEngine<'a> {
    pub fn new(store: &'a mut LedgerStore) -> Self {
        OperationEngine { store }
    }

    /// Create an operation stamped with the current local time
    ///
    /// # Errors
    ///
    /// See [`OperationEngine::create_at`].
    pub fn create(&mut self, data: &OperationData) -> Result<Operation, LedgerError> {
        self.create_at(data, Local::now().naive_local())
    }

    /// Create an operation with an explicit timestamp
    ///
    /// Applies the signed amount to the account balance, allocates the next
    /// operation id and appends the operation to the store.
    ///
    /// # Arguments
    ///
    /// * `data` - Operation type, account, unsigned amount, category, description
    /// * `date` - Timestamp recorded on the operation
    ///
    /// # Returns
    ///
    /// * `Ok(Operation)` - The recorded operation
    /// * `Err(LedgerError)` - If validation or the balance check failed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is negative (`InvalidAmount`)
    /// - The account or category does not exist (`NotFound`)
    /// - A debit exceeds the balance (`InsufficientFunds`)
    /// - The new balance would overflow (`ArithmeticOverflow`)
    ///
    /// On error the store is unchanged.
    pub fn create_at(
        &mut self,
        data: &OperationData,
        date: NaiveDateTime,
    ) -> Result<Operation, LedgerError> {
        let new_balance = self.checked_balance(data)?;
        let id = self.store.operation_ids_mut().next()?;

        Ok(self.commit(id, data, date, new_balance))
    }

    /// Re-apply a historical operation under its original id and timestamp
    ///
    /// The balance effect is computed exactly as for a fresh operation. The
    /// operation id counter is advanced past `id` instead of issuing a new one.
    ///
    /// # Errors
    ///
    /// Same as [`OperationEngine::create_at`], plus `DuplicateId` if an
    /// operation with `id` is already stored.
    pub fn replay(
        &mut self,
        id: OperationId,
        data: &OperationData,
        date: NaiveDateTime,
    ) -> Result<Operation, LedgerError> {
        if self.store.operations().contains(id) {
            return Err(LedgerError::duplicate_id(DomainKind::Operation, id));
        }
        let new_balance = self.checked_balance(data)?;
        self.store.operation_ids_mut().reserve_at_least(id);

        Ok(self.commit(id, data, date, new_balance))
    }

    /// Insert an exported operation verbatim, without touching any balance
    ///
    /// Used when reloading a ledger whose account balances already include
    /// this operation.
    ///
    /// # Errors
    ///
    /// - `DuplicateId` if an operation with the same id is stored
    /// - `DanglingReference` if its account or category is not in the store
    pub fn restore(&mut self, operation: Operation) -> Result<(), LedgerError> {
        if self.store.operations().contains(operation.id()) {
            return Err(LedgerError::duplicate_id(
                DomainKind::Operation,
                operation.id(),
            ));
        }
        self.store.resolve_account(&operation)?;
        self.store.resolve_category(&operation)?;

        self.store
            .operation_ids_mut()
            .reserve_at_least(operation.id());
        self.store.push_operation(operation);
        Ok(())
    }

    /// Validate an operation and compute the account's balance after it
    fn checked_balance(&self, data: &OperationData) -> Result<Decimal, LedgerError> {
        if data.amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(data.amount));
        }

        if self.store.category(data.category_id).is_none() {
            return Err(LedgerError::not_found(
                DomainKind::Category,
                data.category_id,
            ));
        }

        let account = self
            .store
            .account(data.account_id)
            .ok_or_else(|| LedgerError::not_found(DomainKind::Account, data.account_id))?;

        let new_balance = account
            .balance()
            .checked_add(data.op_type.sign(data.amount))
            .ok_or_else(|| LedgerError::arithmetic_overflow("operation", data.account_id))?;

        if new_balance < Decimal::ZERO {
            return Err(LedgerError::insufficient_funds(
                data.account_id,
                account.balance(),
                data.amount,
            ));
        }

        Ok(new_balance)
    }

    /// Write the balance and append the operation
    ///
    /// Only called after `checked_balance` succeeded, so the account exists.
    fn commit(
        &mut self,
        id: OperationId,
        data: &OperationData,
        date: NaiveDateTime,
        new_balance: Decimal,
    ) -> Operation {
        if let Some(account) = self.store.account_mut(data.account_id) {
            account.set_balance(new_balance);
        }

        let operation = Operation::new(
            id,
            data.op_type,
            data.account_id,
            data.amount,
            date,
            data.category_id,
            data.description.clone(),
        );
        self.store.push_operation(operation.clone());
        debug!(
            "Recorded operation {} ({:?} {}) on account {}, balance now {}",
            id, data.op_type, data.amount, data.account_id, new_balance
        );

        operation
    }
}
