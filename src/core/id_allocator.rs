//! Identity allocation
//!
//! Each entity kind owns one [`IdAllocator`]. Ids start at zero, increase by
//! one per creation, and are never reissued until an explicit reset.
//! Importers carrying explicit ids call [`IdAllocator::reserve_at_least`] so
//! later auto-assigned ids cannot collide with imported ones.

use crate::types::{DomainKind, EntityId, LedgerError};

/// Monotonic id counter for one entity kind
#[derive(Debug, Clone)]
pub struct IdAllocator {
    domain: DomainKind,
    /// Highest id issued or reserved; `None` until the first one
    last: Option<EntityId>,
}

impl IdAllocator {
    /// Create an allocator with no ids issued
    pub fn new(domain: DomainKind) -> Self {
        IdAllocator { domain, last: None }
    }

    /// Issue the next id
    ///
    /// # Errors
    ///
    /// Returns `IdSpaceExhausted` if the counter is already at the maximum id.
    pub fn next(&mut self) -> Result<EntityId, LedgerError> {
        let id = match self.last {
            None => 0,
            Some(last) => last
                .checked_add(1)
                .ok_or(LedgerError::IdSpaceExhausted {
                    domain: self.domain,
                })?,
        };
        self.last = Some(id);
        Ok(id)
    }

    /// Advance the counter to `id` if it is ahead of the current one
    ///
    /// Never moves the counter backwards.
    pub fn reserve_at_least(&mut self, id: EntityId) {
        if self.last.map_or(true, |last| id > last) {
            self.last = Some(id);
        }
    }

    /// Highest id issued or reserved so far
    pub fn last_issued(&self) -> Option<EntityId> {
        self.last
    }

    /// Return to the "no ids issued" state
    pub fn reset(&mut self) {
        self.last = None;
    }
}
