//! Outbound composition: draft validation and MIME serialization

mod encoding;
mod mime;
mod validate;

pub use mime::{ComposedMessage, Composer};
pub use validate::{is_valid_address, validate_draft};
