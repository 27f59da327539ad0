//! Capability seams toward provider transports
//!
//! The codec never performs network calls. Transports implement these
//! traits; provider wire types implement [`ProviderMessage`] and
//! [`ProviderAttachment`] so the façade decodes either provider uniformly.

use crate::compose::ComposedMessage;
use crate::config::DecodeOptions;
use crate::error::Result;
use crate::gmail::api::{GmailMessage, MessagePartBody};
use crate::gmail::{attachment_from_gmail, normalize_message};
use crate::models::{Attachment, Email, MessageId};
use crate::outlook::api::{GraphFileAttachment, GraphMessage};
use crate::outlook::{attachment_from_graph, normalize_graph_message};

/// Fetches a single provider message by id
pub trait MessageFetcher {
    type Message: ProviderMessage;

    fn fetch_message(&self, id: &MessageId) -> anyhow::Result<Self::Message>;
}

/// Fetches attachment content by message id and attachment id
pub trait AttachmentFetcher {
    type Attachment: ProviderAttachment;

    fn fetch_attachment(
        &self,
        message_id: &MessageId,
        attachment_id: &str,
    ) -> anyhow::Result<Self::Attachment>;
}

/// Delivers a composed message, returning the provider's id for it
pub trait MessageSender {
    fn send(&self, message: &ComposedMessage) -> anyhow::Result<MessageId>;
}

/// A provider message that decodes to the canonical [`Email`]
pub trait ProviderMessage {
    fn into_email(self, options: &DecodeOptions) -> Result<Email>;
}

/// A provider attachment payload that fills in an [`Attachment`]'s data
pub trait ProviderAttachment {
    /// `meta` is the attachment as listed on the decoded message
    fn into_attachment(self, meta: &Attachment) -> Result<Attachment>;
}

impl ProviderMessage for GmailMessage {
    fn into_email(self, options: &DecodeOptions) -> Result<Email> {
        normalize_message(self, options)
    }
}

impl ProviderMessage for GraphMessage {
    fn into_email(self, options: &DecodeOptions) -> Result<Email> {
        normalize_graph_message(self, options)
    }
}

impl ProviderAttachment for MessagePartBody {
    fn into_attachment(self, meta: &Attachment) -> Result<Attachment> {
        attachment_from_gmail(meta, self)
    }
}

impl ProviderAttachment for GraphFileAttachment {
    /// Graph returns full metadata with the bytes; `meta` only fills gaps
    fn into_attachment(self, meta: &Attachment) -> Result<Attachment> {
        let mut attachment = attachment_from_graph(self)?;
        if attachment.filename.is_empty() {
            attachment.filename = meta.filename.clone();
        }
        if attachment.mime_type.is_empty() {
            attachment.mime_type = meta.mime_type.clone();
        }
        Ok(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::api::MessagePart;

    #[test]
    fn test_gmail_message_decodes() {
        let msg = GmailMessage {
            id: "g1".to_string(),
            thread_id: "t1".to_string(),
            payload: Some(MessagePart {
                mime_type: Some("text/plain".to_string()),
                body: Some(MessagePartBody {
                    data: Some("SGk".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let email = msg.into_email(&DecodeOptions::default()).unwrap();
        assert_eq!(email.body.text.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_graph_attachment_keeps_listed_name() {
        let meta = Attachment {
            id: Some("a1".to_string()),
            filename: "listed.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size: 2,
            data: None,
        };
        let payload = GraphFileAttachment {
            id: "a1".to_string(),
            content_bytes: Some("SGk=".to_string()),
            ..Default::default()
        };
        let att = payload.into_attachment(&meta).unwrap();
        assert_eq!(att.filename, "listed.txt");
        assert_eq!(att.mime_type, "text/plain");
        assert_eq!(att.data.as_deref(), Some(&b"Hi"[..]));
    }
}
