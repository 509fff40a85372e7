//! Ledger storage
//!
//! This module provides the in-memory store that owns every account,
//! category and operation, along with the id allocators for each kind.
//!
//! # Ownership
//!
//! The store exclusively owns all entity instances. Operations refer to
//! their account and category by id, and [`LedgerStore::resolve_account`] /
//! [`LedgerStore::resolve_category`] turn those ids back into entities,
//! returning `DanglingReference` when the target has been deleted.
//!
//! # Concurrency
//!
//! The store has no internal locking. A single caller is assumed; wrap the
//! dispatcher in a lock if it is ever shared between threads.

use crate::core::id_allocator::IdAllocator;
use crate::core::traits::{Entity, Repository};
use crate::types::{
    Account, AccountId, Category, CategoryId, DomainKind, EntityId, LedgerError, Operation,
    OperationId,
};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Insertion-ordered collection with an id index
#[derive(Debug, Clone)]
pub struct EntityCollection<T> {
    /// Entities in insertion order
    entities: Vec<T>,
    /// Map of entity id to position in `entities`
    index: HashMap<EntityId, usize>,
}

impl<T: Entity> EntityCollection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        EntityCollection {
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entities.iter()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(pos, entity)| (entity.id(), pos))
            .collect();
    }
}

impl<T: Entity> Default for EntityCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for EntityCollection<T> {
    /// Append an entity
    ///
    /// Callers check for duplicate ids first; if one slips through, the
    /// index points at the newest entity while both stay listed.
    fn add(&mut self, entity: T) {
        self.index.insert(entity.id(), self.entities.len());
        self.entities.push(entity);
    }

    fn get(&self, id: EntityId) -> Option<&T> {
        self.index.get(&id).map(|&pos| &self.entities[pos])
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&pos) => self.entities.get_mut(pos),
            None => None,
        }
    }

    fn delete(&mut self, id: EntityId) -> Option<T> {
        let pos = self.index.remove(&id)?;
        let removed = self.entities.remove(pos);
        self.rebuild_index();
        debug!("Deleted {} {}", T::DOMAIN, id);
        Some(removed)
    }

    fn all(&self) -> &[T] {
        &self.entities
    }

    fn replace_all(&mut self, entities: Vec<T>) {
        self.entities = entities;
        self.rebuild_index();
    }
}

/// The whole ledger: three collections plus their id allocators
#[derive(Debug, Clone)]
pub struct LedgerStore {
    accounts: EntityCollection<Account>,
    categories: EntityCollection<Category>,
    operations: EntityCollection<Operation>,
    account_ids: IdAllocator,
    category_ids: IdAllocator,
    operation_ids: IdAllocator,
}

impl LedgerStore {
    /// Create an empty store with fresh id counters
    pub fn new() -> Self {
        LedgerStore {
            accounts: EntityCollection::new(),
            categories: EntityCollection::new(),
            operations: EntityCollection::new(),
            account_ids: IdAllocator::new(DomainKind::Account),
            category_ids: IdAllocator::new(DomainKind::Category),
            operation_ids: IdAllocator::new(DomainKind::Operation),
        }
    }

    pub fn accounts(&self) -> &EntityCollection<Account> {
        &self.accounts
    }

    pub fn categories(&self) -> &EntityCollection<Category> {
        &self.categories
    }

    pub fn operations(&self) -> &EntityCollection<Operation> {
        &self.operations
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn operation(&self, id: OperationId) -> Option<&Operation> {
        self.operations.get(id)
    }

    /// Open a new account with the next account id
    ///
    /// # Errors
    ///
    /// - `NegativeInitialBalance` if `initial_balance` is below zero
    /// - `IdSpaceExhausted` if no account ids are left
    pub fn create_account(
        &mut self,
        name: &str,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::NegativeInitialBalance {
                balance: initial_balance,
            });
        }

        let id = self.account_ids.next()?;
        let account = Account::new(id, name, initial_balance);
        self.accounts.add(account.clone());
        debug!("Created account {} '{}'", id, name);

        Ok(account)
    }

    /// Create a new category with the next category id
    pub fn create_category(
        &mut self,
        name: &str,
        is_positive: bool,
    ) -> Result<Category, LedgerError> {
        let id = self.category_ids.next()?;
        let category = Category::new(id, name, is_positive);
        self.categories.add(category.clone());
        debug!("Created category {} '{}'", id, name);

        Ok(category)
    }

    /// Insert an account that already carries its id
    ///
    /// The balance is taken as-is. The account id counter is advanced past
    /// the restored id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if an account with the same id is stored.
    pub fn restore_account(&mut self, account: Account) -> Result<(), LedgerError> {
        let id = account.id();
        if self.accounts.contains(id) {
            return Err(LedgerError::duplicate_id(DomainKind::Account, id));
        }

        self.account_ids.reserve_at_least(id);
        self.accounts.add(account);
        Ok(())
    }

    /// Insert a category that already carries its id
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if a category with the same id is stored.
    pub fn restore_category(&mut self, category: Category) -> Result<(), LedgerError> {
        let id = category.id();
        if self.categories.contains(id) {
            return Err(LedgerError::duplicate_id(DomainKind::Category, id));
        }

        self.category_ids.reserve_at_least(id);
        self.categories.add(category);
        Ok(())
    }

    /// Remove an account; absent ids are ignored
    ///
    /// Operations that reference the account are left in place and become
    /// dangling.
    pub fn delete_account(&mut self, id: AccountId) -> Option<Account> {
        self.accounts.delete(id)
    }

    /// Remove a category; absent ids are ignored
    pub fn delete_category(&mut self, id: CategoryId) -> Option<Category> {
        self.categories.delete(id)
    }

    /// Remove an operation; absent ids are ignored
    ///
    /// The owning account's balance is not adjusted.
    pub fn delete_operation(&mut self, id: OperationId) -> Option<Operation> {
        self.operations.delete(id)
    }

    /// Look up the account an operation points at
    ///
    /// # Errors
    ///
    /// Returns `DanglingReference` if the account has been deleted.
    pub fn resolve_account(&self, operation: &Operation) -> Result<&Account, LedgerError> {
        self.account(operation.account_id()).ok_or_else(|| {
            LedgerError::dangling_reference(DomainKind::Account, operation.account_id())
        })
    }

    /// Look up the category an operation points at
    ///
    /// # Errors
    ///
    /// Returns `DanglingReference` if the category has been deleted.
    pub fn resolve_category(&self, operation: &Operation) -> Result<&Category, LedgerError> {
        self.category(operation.category_id()).ok_or_else(|| {
            LedgerError::dangling_reference(DomainKind::Category, operation.category_id())
        })
    }

    /// Clear all three collections and reset all three id counters
    pub fn reset(&mut self) {
        self.accounts.replace_all(Vec::new());
        self.categories.replace_all(Vec::new());
        self.operations.replace_all(Vec::new());
        self.account_ids.reset();
        self.category_ids.reset();
        self.operation_ids.reset();
        debug!("Ledger store flushed");
    }

    pub(crate) fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id)
    }

    pub(crate) fn operation_ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.operation_ids
    }

    pub(crate) fn push_operation(&mut self, operation: Operation) {
        self.operations.add(operation);
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
