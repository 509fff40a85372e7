//! Typed convenience layer over the dispatcher
//!
//! [`LedgerFacade`] builds [`CommandRequest`]s for the common calls and
//! unwraps the matching [`CommandOutput`] variant, so callers work with
//! entities instead of requests. Every call still goes through
//! [`Dispatcher::dispatch`], so validation, logging and timing apply.

use crate::core::dispatcher::Dispatcher;
use crate::core::store::LedgerStore;
use crate::types::{
    Account, AccountData, AccountId, Category, CategoryData, CategoryId, CommandKind,
    CommandOutput, CommandRequest, CommandResult, DomainKind, ImportReport, LedgerError,
    LedgerFormat, Operation, OperationData, OperationId, OperationType, Payload, Result,
    TimingStats,
};
use log::info;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Entity-level API for a single ledger
#[derive(Debug, Default)]
pub struct LedgerFacade {
    dispatcher: Dispatcher,
}

impl LedgerFacade {
    pub fn new() -> Self {
        LedgerFacade {
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        LedgerFacade { dispatcher }
    }

    /// Run a raw request
    pub fn execute(&mut self, request: &CommandRequest) -> CommandResult {
        self.dispatcher.dispatch(request)
    }

    pub fn store(&self) -> &LedgerStore {
        self.dispatcher.store()
    }

    /// Open an account
    ///
    /// # Errors
    ///
    /// Returns `NegativeInitialBalance` if `initial_balance` is below zero.
    pub fn create_account(&mut self, name: &str, initial_balance: Decimal) -> Result<Account> {
        let request = CommandRequest::create(
            DomainKind::Account,
            Payload::Account(AccountData {
                name: name.to_string(),
                initial_balance,
            }),
        );
        match self.execute(&request)? {
            CommandOutput::Account(account) => Ok(account),
            _ => Err(LedgerError::unexpected_output(CommandKind::Create)),
        }
    }

    /// Look up an account; `None` if absent
    pub fn get_account(&mut self, id: AccountId) -> Result<Option<Account>> {
        match self.execute(&CommandRequest::get(DomainKind::Account, id))? {
            CommandOutput::Account(account) => Ok(Some(account)),
            CommandOutput::None => Ok(None),
            _ => Err(LedgerError::unexpected_output(CommandKind::Get)),
        }
    }

    pub fn delete_account(&mut self, id: AccountId) -> Result<()> {
        self.execute(&CommandRequest::delete(DomainKind::Account, id))
            .map(|_| ())
    }

    pub fn create_category(&mut self, name: &str, is_positive: bool) -> Result<Category> {
        let request = CommandRequest::create(
            DomainKind::Category,
            Payload::Category(CategoryData {
                name: name.to_string(),
                is_positive,
            }),
        );
        match self.execute(&request)? {
            CommandOutput::Category(category) => Ok(category),
            _ => Err(LedgerError::unexpected_output(CommandKind::Create)),
        }
    }

    /// Look up a category; `None` if absent
    pub fn get_category(&mut self, id: CategoryId) -> Result<Option<Category>> {
        match self.execute(&CommandRequest::get(DomainKind::Category, id))? {
            CommandOutput::Category(category) => Ok(Some(category)),
            CommandOutput::None => Ok(None),
            _ => Err(LedgerError::unexpected_output(CommandKind::Get)),
        }
    }

    /// All categories in creation order
    pub fn list_categories(&mut self) -> Result<Vec<Category>> {
        match self.execute(&CommandRequest::get_all(DomainKind::Category))? {
            CommandOutput::Categories(categories) => Ok(categories),
            _ => Err(LedgerError::unexpected_output(CommandKind::Get)),
        }
    }

    pub fn delete_category(&mut self, id: CategoryId) -> Result<()> {
        self.execute(&CommandRequest::delete(DomainKind::Category, id))
            .map(|_| ())
    }

    /// Record an operation against an account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is negative
    /// - `NotFound` if the account or category does not exist
    /// - `InsufficientFunds` if a debit exceeds the balance
    pub fn create_operation(&mut self, data: OperationData) -> Result<Operation> {
        let request = CommandRequest::create(DomainKind::Operation, Payload::Operation(data));
        match self.execute(&request)? {
            CommandOutput::Operation(operation) => Ok(operation),
            _ => Err(LedgerError::unexpected_output(CommandKind::Create)),
        }
    }

    /// Look up an operation; `None` if absent
    pub fn get_operation(&mut self, id: OperationId) -> Result<Option<Operation>> {
        match self.execute(&CommandRequest::get(DomainKind::Operation, id))? {
            CommandOutput::Operation(operation) => Ok(Some(operation)),
            CommandOutput::None => Ok(None),
            _ => Err(LedgerError::unexpected_output(CommandKind::Get)),
        }
    }

    /// Remove an operation; the account balance is not adjusted
    pub fn delete_operation(&mut self, id: OperationId) -> Result<()> {
        self.execute(&CommandRequest::delete(DomainKind::Operation, id))
            .map(|_| ())
    }

    /// Credit `amount` to an account
    pub fn deposit(
        &mut self,
        account: AccountId,
        category: CategoryId,
        amount: Decimal,
    ) -> Result<Operation> {
        self.create_operation(OperationData {
            op_type: OperationType::Credit,
            account_id: account,
            amount,
            category_id: category,
            description: None,
        })
    }

    /// Debit `amount` from an account
    pub fn withdraw(
        &mut self,
        account: AccountId,
        category: CategoryId,
        amount: Decimal,
    ) -> Result<Operation> {
        self.create_operation(OperationData {
            op_type: OperationType::Debit,
            account_id: account,
            amount,
            category_id: category,
            description: None,
        })
    }

    /// Move `amount` from one account to another as a debit then a credit
    ///
    /// Both legs are checked before either is recorded, so a rejected
    /// transfer changes nothing.
    ///
    /// # Arguments
    ///
    /// * `from` - Account debited
    /// * `to` - Account credited
    /// * `category` - Category recorded on both operations
    /// * `amount` - Unsigned amount moved
    ///
    /// # Returns
    ///
    /// * `Ok((debit, credit))` - The two recorded operations
    /// * `Err(LedgerError)` - If the transfer was rejected
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is negative (`InvalidAmount`)
    /// - Either account or the category does not exist (`NotFound`)
    /// - `from` cannot cover the amount (`InsufficientFunds`)
    /// - Crediting `to` would overflow (`ArithmeticOverflow`)
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        category: CategoryId,
        amount: Decimal,
    ) -> Result<(Operation, Operation)> {
        self.check_transfer(from, to, category, amount)?;

        let debit = self.withdraw(from, category, amount)?;
        let credit = self.deposit(to, category, amount)?;
        info!("Transferred {} from account {} to account {}", amount, from, to);

        Ok((debit, credit))
    }

    fn check_transfer(
        &self,
        from: AccountId,
        to: AccountId,
        category: CategoryId,
        amount: Decimal,
    ) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        let store = self.store();
        if store.category(category).is_none() {
            return Err(LedgerError::not_found(DomainKind::Category, category));
        }
        let source = store
            .account(from)
            .ok_or_else(|| LedgerError::not_found(DomainKind::Account, from))?;
        let target = store
            .account(to)
            .ok_or_else(|| LedgerError::not_found(DomainKind::Account, to))?;

        if source.balance() < amount {
            return Err(LedgerError::insufficient_funds(from, source.balance(), amount));
        }
        // self-transfers net to zero
        if from != to && target.balance().checked_add(amount).is_none() {
            return Err(LedgerError::arithmetic_overflow("transfer", to));
        }

        Ok(())
    }

    /// Write the whole ledger to `path`
    pub fn export(&mut self, path: impl Into<PathBuf>, format: LedgerFormat) -> Result<()> {
        self.execute(&CommandRequest::export(path, format))
            .map(|_| ())
    }

    /// Load a ledger file into the current ledger
    pub fn import(&mut self, path: impl Into<PathBuf>, format: LedgerFormat) -> Result<ImportReport> {
        match self.execute(&CommandRequest::import(path, format))? {
            CommandOutput::Import(report) => Ok(report),
            _ => Err(LedgerError::unexpected_output(CommandKind::Import)),
        }
    }

    pub fn statistics(&mut self) -> Result<TimingStats> {
        match self.execute(&CommandRequest::statistics())? {
            CommandOutput::Statistics(stats) => Ok(stats),
            _ => Err(LedgerError::unexpected_output(CommandKind::Statistics)),
        }
    }

    /// Clear the ledger and reset all id counters
    pub fn flush(&mut self) {
        self.dispatcher.flush();
    }
}
