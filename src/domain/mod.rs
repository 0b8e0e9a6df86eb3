// ============================================================================
// Domain Rules
// ============================================================================
//
// Validation, normalization and access rules for lists and items. The same
// rules run twice: in the gateway before a request is forwarded (failures
// become 400) and in the store before a write is applied (failures become
// 422). Neither side trusts the other to have validated.
//
// ============================================================================

pub mod items;
pub mod lists;
pub mod undo;

pub use items::{CreateItemRequest, TagsInput, UpdateItemRequest};
pub use undo::{UndoState, restorable_until, undo_state};

use tasklist_error::AppError;

/// A rule violation, mapped to a status by whoever ran the rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Rejected by the gateway before forwarding (400)
    pub fn into_bad_request(self) -> AppError {
        AppError::validation(self.0)
    }

    /// Rejected by the store on re-validation (422)
    pub fn into_unprocessable(self) -> AppError {
        AppError::unprocessable(self.0)
    }
}

/// Count characters, not bytes: limits are user-visible lengths.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
