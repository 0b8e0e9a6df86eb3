// ============================================================================
// Tasklist Types - Wire Data Types
// ============================================================================
//
// Data structures shared by the gateway and the backing store. Field names
// are the store's wire names (snake_case); the gateway translates them at
// its public boundary.
//
// Contents:
// - Caller identity (user id + optional email)
// - Lists and items, including soft-delete markers
// - Tri-state patch values for partial updates
//
// Dependencies:
// - serde (serialization only)
// - chrono (timestamps and calendar dates)
//
// ============================================================================

pub mod identity;
pub mod item;
pub mod list;
pub mod patch;

// Re-exports for convenience
pub use identity::*;
pub use item::*;
pub use list::*;
pub use patch::*;
