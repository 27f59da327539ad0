//! Read and send façade over provider transports
//!
//! [`Mailbox`] pairs a fetcher with the decoders; [`Outbox`] pairs a sender
//! with the validator and composer. Both return `anyhow::Result` so transport
//! errors keep their context.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::compose::Composer;
use crate::config::{ComposeOptions, DecodeOptions};
use crate::models::{Attachment, Draft, Email, MessageId};
use crate::transport::{
    AttachmentFetcher, MessageFetcher, MessageSender, ProviderAttachment, ProviderMessage,
};

/// A message that could not be listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMessage {
    pub id: MessageId,
    pub reason: String,
}

/// Result of decoding a list of ids: what decoded and what was skipped
#[derive(Debug, Default)]
pub struct Listing {
    pub emails: Vec<Email>,
    pub skipped: Vec<SkippedMessage>,
}

impl Listing {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Fetches and decodes messages from one provider
pub struct Mailbox<F> {
    fetcher: F,
    options: DecodeOptions,
}

impl<F: MessageFetcher> Mailbox<F> {
    pub fn new(fetcher: F, options: DecodeOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch and decode a single message
    pub fn get_email(&self, id: &MessageId) -> Result<Email> {
        let message = self
            .fetcher
            .fetch_message(id)
            .with_context(|| format!("Failed to fetch message {id}"))?;
        let email = message
            .into_email(&self.options)
            .with_context(|| format!("Failed to decode message {id}"))?;
        debug!(
            "Decoded message {} ({} attachments)",
            id,
            email.attachments.len()
        );
        Ok(email)
    }

    /// Fetch and decode each id, skipping (and reporting) any that fail
    pub fn list_emails(&self, ids: &[MessageId]) -> Listing {
        let mut listing = Listing::default();

        for id in ids {
            match self.get_email(id) {
                Ok(email) => listing.emails.push(email),
                Err(e) => {
                    warn!("Skipping message {}: {:#}", id, e);
                    listing.skipped.push(SkippedMessage {
                        id: id.clone(),
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        if !listing.is_complete() {
            info!(
                "Listed {} messages, skipped {}",
                listing.emails.len(),
                listing.skipped.len()
            );
        }
        listing
    }
}

impl<F: AttachmentFetcher> Mailbox<F> {
    /// Fetch content for an attachment listed on a decoded message
    pub fn get_attachment(
        &self,
        message_id: &MessageId,
        meta: &Attachment,
    ) -> Result<Attachment> {
        let attachment_id = meta
            .id
            .as_deref()
            .with_context(|| format!("Attachment {} has no id", meta.filename))?;
        let payload = self
            .fetcher
            .fetch_attachment(message_id, attachment_id)
            .with_context(|| {
                format!("Failed to fetch attachment {attachment_id} of message {message_id}")
            })?;
        payload
            .into_attachment(meta)
            .with_context(|| format!("Failed to decode attachment {}", meta.filename))
    }
}

/// Validates, composes and sends drafts
pub struct Outbox<S> {
    sender: S,
    composer: Composer,
}

impl<S: MessageSender> Outbox<S> {
    pub fn new(sender: S, options: ComposeOptions) -> Self {
        Self {
            sender,
            composer: Composer::new(options),
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Validate, compose and send a draft; nothing reaches the transport if
    /// validation fails
    pub fn send_draft(&self, draft: &Draft) -> Result<MessageId> {
        self.send_draft_with_headers(draft, &HashMap::new())
    }

    pub fn send_draft_with_headers(
        &self,
        draft: &Draft,
        headers: &HashMap<String, String>,
    ) -> Result<MessageId> {
        let message = self
            .composer
            .compose_with_headers(draft, headers)
            .context("Failed to compose message")?;

        let id = self
            .sender
            .send(&message)
            .with_context(|| format!("Failed to send message {}", message.message_id()))?;

        info!("Sent message {} as {}", message.message_id(), id);
        Ok(id)
    }
}
