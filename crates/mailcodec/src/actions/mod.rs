//! Email actions module
//!
//! Bulk mutations (trash, delete, star, read/unread) over a provider's
//! per-message capability.

mod handler;

pub use handler::{ActionHandler, MessageModifier};
