//! Canonical email model shared by every provider decoder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EmailAddress;

/// Unique identifier for a message (provider message ID)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a thread (Gmail thread ID, Graph conversation ID)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Message body renderings. Either, both or neither may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailBody {
    pub text: Option<String>,
    pub html: Option<String>,
}

impl EmailBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: None,
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            text: None,
            html: Some(html.into()),
        }
    }

    pub fn alternative(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: Some(html.into()),
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_html(&self) -> bool {
        self.html.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// Attachment metadata, with bytes only when explicitly fetched or attached
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Provider attachment handle; `None` for outbound attachments
    pub id: Option<String>,
    pub filename: String,
    pub mime_type: String,
    /// Size in bytes, populated even when `data` is withheld
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

impl Attachment {
    /// Create an outbound attachment carrying its bytes
    pub fn from_bytes(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            id: None,
            filename: filename.into(),
            mime_type: mime_type.into(),
            size: data.len() as u64,
            data: Some(data),
        }
    }
}

/// A decoded email message (read model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub subject: String,
    pub from: Option<EmailAddress>,
    /// Recipients in header order
    pub to: Vec<EmailAddress>,
    pub cc: Vec<EmailAddress>,
    pub bcc: Vec<EmailAddress>,
    pub reply_to: Vec<EmailAddress>,
    /// `None` when the provider date could not be parsed
    pub date: Option<DateTime<Utc>>,
    pub body: EmailBody,
    /// Provider-supplied preview text
    pub snippet: String,
    /// Provider labels; for Graph, the single parent folder id
    pub labels: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub is_read: bool,
    pub is_starred: bool,
    pub is_draft: bool,
}

impl Email {
    /// Create a new email builder
    pub fn builder(id: MessageId, thread_id: ThreadId) -> EmailBuilder {
        EmailBuilder::new(id, thread_id)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Builder for creating Email instances
pub struct EmailBuilder {
    email: Email,
}

impl EmailBuilder {
    fn new(id: MessageId, thread_id: ThreadId) -> Self {
        Self {
            email: Email {
                id,
                thread_id,
                subject: String::new(),
                from: None,
                to: Vec::new(),
                cc: Vec::new(),
                bcc: Vec::new(),
                reply_to: Vec::new(),
                date: None,
                body: EmailBody::default(),
                snippet: String::new(),
                labels: Vec::new(),
                attachments: Vec::new(),
                is_read: false,
                is_starred: false,
                is_draft: false,
            },
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.email.subject = subject.into();
        self
    }

    /// Set the sender; an empty address leaves it unset
    pub fn from(mut self, from: EmailAddress) -> Self {
        self.email.from = Some(from).filter(EmailAddress::is_present);
        self
    }

    pub fn to(mut self, to: Vec<EmailAddress>) -> Self {
        self.email.to = to;
        self
    }

    pub fn cc(mut self, cc: Vec<EmailAddress>) -> Self {
        self.email.cc = cc;
        self
    }

    pub fn bcc(mut self, bcc: Vec<EmailAddress>) -> Self {
        self.email.bcc = bcc;
        self
    }

    pub fn reply_to(mut self, reply_to: Vec<EmailAddress>) -> Self {
        self.email.reply_to = reply_to;
        self
    }

    pub fn date(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.email.date = date;
        self
    }

    pub fn body(mut self, body: EmailBody) -> Self {
        self.email.body = body;
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.email.snippet = snippet.into();
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.email.labels = labels;
        self
    }

    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.email.attachments = attachments;
        self
    }

    pub fn read(mut self, is_read: bool) -> Self {
        self.email.is_read = is_read;
        self
    }

    pub fn starred(mut self, is_starred: bool) -> Self {
        self.email.is_starred = is_starred;
        self
    }

    pub fn draft(mut self, is_draft: bool) -> Self {
        self.email.is_draft = is_draft;
        self
    }

    pub fn build(self) -> Email {
        self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let email = Email::builder(MessageId::new("m1"), ThreadId::new("t1")).build();
        assert_eq!(email.id.as_str(), "m1");
        assert_eq!(email.thread_id.as_str(), "t1");
        assert!(email.from.is_none());
        assert!(email.date.is_none());
        assert!(!email.is_read);
    }

    #[test]
    fn test_builder_drops_empty_sender() {
        let email = Email::builder(MessageId::new("m1"), ThreadId::new("t1"))
            .from(EmailAddress::default())
            .build();
        assert!(email.from.is_none());
    }

    #[test]
    fn test_body_presence() {
        let body = EmailBody {
            text: Some(String::new()),
            html: Some("<p>x</p>".to_string()),
        };
        assert!(!body.has_text());
        assert!(body.has_html());
    }

    #[test]
    fn test_attachment_from_bytes_sets_size() {
        let att = Attachment::from_bytes("a.txt", "text/plain", b"hello".to_vec());
        assert_eq!(att.size, 5);
        assert!(att.id.is_none());
    }
}
