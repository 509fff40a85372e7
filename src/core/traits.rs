//! Core traits for entity storage
//!
//! This module defines the abstractions the ledger store is built from, so
//! the three entity collections share one implementation.

use crate::types::{Account, Category, DomainKind, EntityId, Operation};

/// Something stored in the ledger with an integer identity
pub trait Entity {
    /// Domain kind used in errors and log lines
    const DOMAIN: DomainKind;

    /// The entity's identifier, unique within its kind
    fn id(&self) -> EntityId;
}

impl Entity for Account {
    const DOMAIN: DomainKind = DomainKind::Account;

    fn id(&self) -> EntityId {
        Account::id(self)
    }
}

impl Entity for Category {
    const DOMAIN: DomainKind = DomainKind::Category;

    fn id(&self) -> EntityId {
        Category::id(self)
    }
}

impl Entity for Operation {
    const DOMAIN: DomainKind = DomainKind::Operation;

    fn id(&self) -> EntityId {
        Operation::id(self)
    }
}

/// Trait for an insertion-ordered collection of entities
///
/// Lookups and deletes go by id. Deleting an absent id is a no-op.
pub trait Repository<T: Entity> {
    /// Append an entity
    fn add(&mut self, entity: T);

    /// Get an entity by id
    fn get(&self, id: EntityId) -> Option<&T>;

    /// Get a mutable entity by id
    fn get_mut(&mut self, id: EntityId) -> Option<&mut T>;

    /// Remove an entity by id, returning it if it was present
    fn delete(&mut self, id: EntityId) -> Option<T>;

    /// All entities in insertion order
    fn all(&self) -> &[T];

    /// Replace the whole collection
    fn replace_all(&mut self, entities: Vec<T>);

    /// Whether an entity with this id is stored
    fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }
}
