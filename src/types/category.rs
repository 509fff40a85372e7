//! Operation categories

use serde::Serialize;

/// Category identifier
pub type CategoryId = u32;

/// Classification attached to every operation
///
/// `is_positive` marks income versus expense categories for display. It does
/// not sign the operation amount; the operation type does that.
/// Categories are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    is_positive: bool,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, is_positive: bool) -> Self {
        Category {
            id,
            name: name.into(),
            is_positive,
        }
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is an income category
    pub fn is_positive(&self) -> bool {
        self.is_positive
    }
}
