//! Mail codec - provider-neutral email encoding and decoding
//!
//! This crate provides:
//! - A canonical email model (Email, Draft, EmailAddress, Attachment)
//! - Decoders for Gmail part trees, raw RFC 2822 and Microsoft Graph messages
//! - Draft validation and RFC 2822 / MIME composition
//! - Batch dispatch of per-message actions with aggregated failures
//! - Capability traits for provider transports
//!
//! The crate performs no network I/O; transports plug in through
//! [`transport`].

pub mod actions;
pub mod batch;
pub mod compose;
pub mod config;
pub mod error;
pub mod gmail;
pub mod mailbox;
pub mod models;
pub mod outlook;
pub mod parse;
pub mod raw;
pub mod transport;

pub use actions::{ActionHandler, MessageModifier};
pub use batch::{BatchDispatcher, batch_operation};
pub use compose::{ComposedMessage, Composer, is_valid_address, validate_draft};
pub use config::{BatchOptions, CodecConfig, ComposeOptions, DecodeOptions, ProviderScopes};
pub use error::{BatchFailure, CodecError, Result};
pub use gmail::{attachment_from_gmail, normalize_message};
pub use mailbox::{Listing, Mailbox, Outbox, SkippedMessage};
pub use models::{
    Attachment, Draft, Email, EmailAddress, EmailBody, MessageId, ThreadId, parse_address,
    parse_address_list,
};
pub use outlook::{attachment_from_graph, normalize_graph_message};
pub use parse::{decode_mail_bytes, parse_date};
pub use raw::{decode_raw_message, parse_raw_message};
pub use transport::{
    AttachmentFetcher, MessageFetcher, MessageSender, ProviderAttachment, ProviderMessage,
};
