//! Action handler for bulk message mutations
//!
//! Every action fans out one call per message through the batch dispatcher,
//! so a failing id never stops the rest.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::batch::BatchDispatcher;
use crate::models::MessageId;

/// Per-message mutations a provider transport exposes
///
/// Implementations must be shareable across the dispatcher's workers.
pub trait MessageModifier: Send + Sync {
    /// Move a message to the provider's trash
    fn trash(&self, id: &MessageId) -> Result<()>;

    /// Permanently delete a message
    fn delete(&self, id: &MessageId) -> Result<()>;

    fn set_read(&self, id: &MessageId, is_read: bool) -> Result<()>;

    fn set_starred(&self, id: &MessageId, is_starred: bool) -> Result<()>;
}

/// Handler for bulk actions like trash, delete, star and read/unread
pub struct ActionHandler {
    modifier: Arc<dyn MessageModifier>,
    dispatcher: BatchDispatcher,
}

impl ActionHandler {
    /// Create a handler dispatching sequentially
    pub fn new(modifier: Arc<dyn MessageModifier>) -> Self {
        Self::with_dispatcher(modifier, BatchDispatcher::new())
    }

    pub fn with_dispatcher(
        modifier: Arc<dyn MessageModifier>,
        dispatcher: BatchDispatcher,
    ) -> Self {
        Self {
            modifier,
            dispatcher,
        }
    }

    /// Move messages to trash
    pub fn trash_messages(&self, ids: &[MessageId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        info!("Trashing {} messages", ids.len());
        self.dispatcher
            .dispatch(ids, |id| self.modifier.trash(id), "trash")?;
        Ok(())
    }

    /// Permanently delete messages
    pub fn delete_messages(&self, ids: &[MessageId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        info!("Deleting {} messages", ids.len());
        self.dispatcher
            .dispatch(ids, |id| self.modifier.delete(id), "delete")?;
        Ok(())
    }

    /// Mark messages read or unread
    pub fn set_read(&self, ids: &[MessageId], is_read: bool) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let label = if is_read { "mark read" } else { "mark unread" };
        info!(
            "Marking {} messages as {}",
            ids.len(),
            if is_read { "read" } else { "unread" }
        );
        self.dispatcher
            .dispatch(ids, |id| self.modifier.set_read(id, is_read), label)?;
        Ok(())
    }

    /// Star or unstar messages
    pub fn set_starred(&self, ids: &[MessageId], is_starred: bool) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let label = if is_starred { "star" } else { "unstar" };
        info!(
            "Setting {} messages to {}",
            ids.len(),
            if is_starred { "starred" } else { "unstarred" }
        );
        self.dispatcher
            .dispatch(ids, |id| self.modifier.set_starred(id, is_starred), label)?;
        Ok(())
    }
}
