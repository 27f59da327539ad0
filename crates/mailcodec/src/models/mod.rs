//! Domain models for mail entities

mod address;
mod draft;
mod email;

pub use address::{EmailAddress, parse_address, parse_address_list};
pub use draft::Draft;
pub use email::{Attachment, Email, EmailBody, EmailBuilder, MessageId, ThreadId};
