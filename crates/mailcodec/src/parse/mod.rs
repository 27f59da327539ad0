//! Byte and date decoding shared by every provider path

mod bytes;
mod date;

pub use bytes::decode_mail_bytes;
pub use date::parse_date;
