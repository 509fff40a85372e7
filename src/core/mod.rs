//! Core business logic module
//!
//! This module contains the ledger's processing components:
//! - `traits` - Entity and repository abstractions
//! - `id_allocator` - Per-kind monotonic id counters
//! - `store` - In-memory collections for accounts, categories and operations
//! - `operation_engine` - The only path that changes account balances
//! - `timing` - Call timing for the statistics command
//! - `dispatcher` - Request validation and routing
//! - `facade` - Typed convenience calls over the dispatcher

pub mod dispatcher;
pub mod facade;
pub mod id_allocator;
pub mod operation_engine;
pub mod store;
pub mod timing;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use facade::LedgerFacade;
pub use id_allocator::IdAllocator;
pub use operation_engine::OperationEngine;
pub use store::{EntityCollection, LedgerStore};
pub use timing::TimingCollector;
pub use traits::{Entity, Repository};
