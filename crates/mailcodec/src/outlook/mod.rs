//! Microsoft Graph (Outlook) wire format
//!
//! Graph delivers messages as flat JSON objects, so decoding is a field copy
//! through the shared address, date and byte parsers.

mod normalize;

pub use normalize::{attachment_from_graph, normalize_graph_message};

/// Graph API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// A message from `GET /me/messages/{id}`
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphMessage {
        pub id: String,
        pub conversation_id: Option<String>,
        pub subject: Option<String>,
        pub from: Option<Recipient>,
        #[serde(default)]
        pub to_recipients: Vec<Recipient>,
        #[serde(default)]
        pub cc_recipients: Vec<Recipient>,
        #[serde(default)]
        pub bcc_recipients: Vec<Recipient>,
        #[serde(default)]
        pub reply_to: Vec<Recipient>,
        pub received_date_time: Option<String>,
        pub sent_date_time: Option<String>,
        #[serde(default)]
        pub is_read: bool,
        #[serde(default)]
        pub is_draft: bool,
        pub body: Option<ItemBody>,
        #[serde(default)]
        pub body_preview: String,
        pub parent_folder_id: Option<String>,
        #[serde(default)]
        pub has_attachments: bool,
        pub flag: Option<FollowupFlag>,
    }

    /// Wrapper Graph uses around every address
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Recipient {
        pub email_address: GraphAddress,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    pub struct GraphAddress {
        pub name: Option<String>,
        #[serde(default)]
        pub address: String,
    }

    /// Message body; `content_type` is `"text"` or `"html"`
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ItemBody {
        pub content_type: String,
        #[serde(default)]
        pub content: String,
    }

    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FollowupFlag {
        pub flag_status: String,
    }

    /// A `#microsoft.graph.fileAttachment` with inline bytes
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphFileAttachment {
        pub id: String,
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub content_type: String,
        #[serde(default)]
        pub size: u64,
        /// Base64 (standard alphabet) file content
        pub content_bytes: Option<String>,
    }
}
