//! Byte-level encoders for outbound messages: RFC 2047 Q words,
//! quoted-printable bodies, wrapped base64 and random tokens.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use rand::RngCore;

use crate::models::EmailAddress;

/// RFC 2045 line-length limit for encoded bodies
pub(crate) const MAX_LINE_LEN: usize = 76;

/// RFC 2047 limit for a single encoded word
const MAX_ENCODED_WORD_LEN: usize = 75;

const Q_PREFIX: &str = "=?UTF-8?Q?";
const Q_SUFFIX: &str = "?=";

/// Characters a Q-encoded word may carry literally in a phrase (RFC 2047 5(3)).
/// `.` is outside that set and is always escaped.
fn is_q_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'!' | b'*' | b'+' | b'-' | b'/')
}

fn needs_encoding(value: &str) -> bool {
    value.bytes().any(|b| !b.is_ascii() || (b.is_ascii_control() && b != b'\t'))
}

/// Split a value into Q-encoded words, never splitting a character.
fn q_encoded_words(value: &str) -> Vec<String> {
    let budget = MAX_ENCODED_WORD_LEN - Q_PREFIX.len() - Q_SUFFIX.len();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut buf = [0u8; 4];

    for c in value.chars() {
        let mut piece = String::new();
        for &b in c.encode_utf8(&mut buf).as_bytes() {
            match b {
                b' ' => piece.push('_'),
                b if is_q_safe(b) => piece.push(b as char),
                b => piece.push_str(&format!("={b:02X}")),
            }
        }
        if !current.is_empty() && current.len() + piece.len() > budget {
            words.push(format!("{Q_PREFIX}{current}{Q_SUFFIX}"));
            current.clear();
        }
        current.push_str(&piece);
    }
    if !current.is_empty() {
        words.push(format!("{Q_PREFIX}{current}{Q_SUFFIX}"));
    }
    words
}

/// Encode a header value (e.g. Subject) only when it carries non-ASCII text.
/// Multiple encoded words are folded onto continuation lines.
pub(crate) fn encode_header_value(value: &str) -> String {
    if !needs_encoding(value) {
        return value.to_string();
    }
    q_encoded_words(value).join("\r\n ")
}

/// Encode a quoted parameter value such as a filename, without the quotes.
pub(crate) fn encode_param_value(value: &str) -> String {
    if !needs_encoding(value) {
        return escape_quoted(value);
    }
    q_encoded_words(value).join(" ")
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Format an address for a header: `Name <addr>`, quoting names that carry
/// `,`, `;` or `"`, and encoding non-ASCII names.
pub(crate) fn format_address(address: &EmailAddress) -> String {
    let name = match address.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return address.email.clone(),
    };

    let display = if needs_encoding(name) {
        q_encoded_words(name).join(" ")
    } else if name.contains([',', ';', '"']) {
        format!("\"{}\"", escape_quoted(name))
    } else {
        name.to_string()
    };
    format!("{} <{}>", display, address.email)
}

pub(crate) fn format_address_list(addresses: &[EmailAddress]) -> String {
    addresses
        .iter()
        .map(format_address)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quoted-printable encode a text body with CRLF line endings.
pub(crate) fn quoted_printable_body(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\n', "\r\n");
    quoted_printable::encode_to_str(normalized)
}

/// Standard base64 wrapped to 76-character CRLF-terminated lines.
pub(crate) fn base64_wrapped(data: &[u8]) -> String {
    let encoded = BASE64_STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LEN * 2 + 2);
    // base64 output is ASCII, so byte chunks are valid str slices
    for line in encoded.as_bytes().chunks(MAX_LINE_LEN) {
        out.push_str(std::str::from_utf8(line).unwrap_or_default());
        out.push_str("\r\n");
    }
    out
}

/// Lowercase hex of `len` random bytes
pub(crate) fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
