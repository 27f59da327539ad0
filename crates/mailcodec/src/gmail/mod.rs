//! Gmail wire format
//!
//! This module provides:
//! - Gmail API message and attachment types (`users.messages.get`)
//! - Part-tree decoding into the canonical [`Email`](crate::models::Email)

pub(crate) mod normalize;

pub use normalize::{attachment_from_gmail, extract_content, normalize_message};

/// Gmail API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Full message from Gmail API (`format=full` or `format=raw`)
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub id: String,
        #[serde(default)]
        pub thread_id: String,
        pub label_ids: Option<Vec<String>>,
        #[serde(default)]
        pub snippet: String,
        pub internal_date: Option<String>,
        pub payload: Option<MessagePart>,
        /// Base64url RFC 2822 message, present for `format=raw`
        pub raw: Option<String>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    impl Header {
        pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                value: value.into(),
            }
        }
    }

    /// Part body: inline data, an attachment handle, or both.
    ///
    /// `users.messages.attachments.get` returns this same shape.
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePartBody {
        pub attachment_id: Option<String>,
        pub size: Option<u64>,
        pub data: Option<String>,
    }

    /// A node of the MIME part tree. The message payload is the root part.
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePart {
        pub part_id: Option<String>,
        pub mime_type: Option<String>,
        pub filename: Option<String>,
        pub headers: Option<Vec<Header>>,
        pub body: Option<MessagePartBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    impl MessagePart {
        /// Look up a header value by case-insensitive name
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .as_ref()?
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.as_str())
        }
    }
}
