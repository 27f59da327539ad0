//! Raw RFC 2822 messages
//!
//! Parses a complete message (Gmail `format=raw`, or composer output) into the
//! same part tree the Gmail API returns, so both go through one decoder.

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use log::debug;
use mailparse::{MailHeaderMap, ParsedMail};

use crate::config::DecodeOptions;
use crate::error::{CodecError, Result};
use crate::gmail::api::{Header, MessagePart, MessagePartBody};
use crate::gmail::normalize::decode_part_tree;
use crate::models::{Email, MessageId, ThreadId};

/// Nesting beyond this is dropped while converting; the tree decoder applies
/// its own, usually tighter, limit afterwards.
const MAX_CONVERT_DEPTH: usize = 256;

/// Parse raw message bytes into a part tree
pub fn parse_raw_message(bytes: &[u8]) -> Result<MessagePart> {
    let parsed = mailparse::parse_mail(bytes)
        .map_err(|e| CodecError::Encoding(format!("malformed raw message: {e}")))?;
    Ok(convert_part(&parsed, 0))
}

/// Decode raw message bytes straight to an [`Email`]
///
/// Raw messages carry no labels, so the flags keep their label-less values.
pub fn decode_raw_message(
    id: MessageId,
    thread_id: ThreadId,
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<Email> {
    let root = parse_raw_message(bytes)?;
    Ok(decode_part_tree(id, thread_id, &root, options)
        .read(true)
        .build())
}

fn convert_part(mail: &ParsedMail<'_>, depth: usize) -> MessagePart {
    let headers: Vec<Header> = mail
        .headers
        .iter()
        .map(|h| Header::new(h.get_key(), h.get_value()))
        .collect();
    let mime_type = mail.ctype.mimetype.to_ascii_lowercase();

    if mime_type.starts_with("multipart/") {
        let parts = if depth < MAX_CONVERT_DEPTH {
            mail.subparts
                .iter()
                .map(|sub| convert_part(sub, depth + 1))
                .collect()
        } else {
            debug!("Dropping multipart children beyond depth {}", MAX_CONVERT_DEPTH);
            Vec::new()
        };
        return MessagePart {
            mime_type: Some(mime_type),
            headers: Some(headers),
            parts: Some(parts),
            ..Default::default()
        };
    }

    let filename = part_filename(mail);

    // Inline text loses the wire's CRLF line endings; attachments keep their bytes
    let content = if mime_type.starts_with("text/") && filename.is_none() {
        mail.get_body().map(|text| text.replace("\r\n", "\n").into_bytes())
    } else {
        mail.get_body_raw()
    };
    let content = content.unwrap_or_else(|e| {
        debug!("Unreadable {} body: {}", mime_type, e);
        Vec::new()
    });

    MessagePart {
        filename,
        mime_type: Some(mime_type),
        headers: Some(headers),
        body: Some(MessagePartBody {
            attachment_id: None,
            size: Some(content.len() as u64),
            data: Some(BASE64_URL_SAFE_NO_PAD.encode(&content)),
        }),
        parts: None,
        part_id: None,
    }
}

/// Filename from Content-Disposition, falling back to the Content-Type name
fn part_filename(mail: &ParsedMail<'_>) -> Option<String> {
    let disposition = mail.get_content_disposition();
    let name = disposition
        .params
        .get("filename")
        .or_else(|| mail.ctype.params.get("name"))?;
    Some(decode_encoded_words(name))
}

/// Expand RFC 2047 encoded words in a parameter value
fn decode_encoded_words(value: &str) -> String {
    if !value.contains("=?") {
        return value.to_string();
    }
    let line = format!("X: {value}");
    match mailparse::parse_headers(line.as_bytes()) {
        Ok((headers, _)) => headers
            .get_first_value("X")
            .unwrap_or_else(|| value.to_string()),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "From: Alice <alice@example.com>\r\n\
To: bob@example.com\r\n\
Subject: Report\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
--outer\r\n\
Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
\r\n\
--inner\r\n\
Content-Type: text/plain; charset=\"UTF-8\"\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
\r\n\
Caf=C3=A9 menu\r\n\
--inner\r\n\
Content-Type: text/html; charset=\"UTF-8\"\r\n\
\r\n\
<p>Menu</p>\r\n\
--inner--\r\n\
--outer\r\n\
Content-Type: application/pdf; name=\"menu.pdf\"\r\n\
Content-Disposition: attachment; filename=\"menu.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
SGVsbG8gV29ybGQ=\r\n\
--outer--\r\n";

    #[test]
    fn test_parse_tree_shape() {
        let root = parse_raw_message(MIXED.as_bytes()).unwrap();
        assert_eq!(root.mime_type.as_deref(), Some("multipart/mixed"));
        assert_eq!(root.header("subject"), Some("Report"));

        let parts = root.parts.as_ref().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].mime_type.as_deref(), Some("multipart/alternative"));
        assert_eq!(parts[1].filename.as_deref(), Some("menu.pdf"));
        assert_eq!(parts[1].body.as_ref().unwrap().size, Some(11));
    }

    #[test]
    fn test_decode_raw_message() {
        let email = decode_raw_message(
            MessageId::new("raw-1"),
            ThreadId::new("raw-1"),
            MIXED.as_bytes(),
            &DecodeOptions::default(),
        )
        .unwrap();

        assert_eq!(email.subject, "Report");
        assert_eq!(email.body.text.as_deref().map(str::trim_end), Some("Café menu"));
        assert_eq!(email.body.html.as_deref().map(str::trim_end), Some("<p>Menu</p>"));
        assert_eq!(email.attachments.len(), 1);
        assert_eq!(email.attachments[0].filename, "menu.pdf");
        assert_eq!(email.attachments[0].mime_type, "application/pdf");
        assert_eq!(email.attachments[0].size, 11);
        assert!(email.attachments[0].id.is_none());
        assert!(email.is_read);
    }

    #[test]
    fn test_text_line_endings_normalized() {
        let raw = "Subject: Lines\r\n\
Content-Type: text/plain; charset=\"UTF-8\"\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
\r\n\
first=20\r\nsecond\r\n\r\nthird";
        let email = decode_raw_message(
            MessageId::new("lines"),
            ThreadId::new("lines"),
            raw.as_bytes(),
            &DecodeOptions::default(),
        )
        .unwrap();
        assert_eq!(email.body.text.as_deref(), Some("first \nsecond\n\nthird"));
    }

    #[test]
    fn test_encoded_filename() {
        assert_eq!(decode_encoded_words("=?UTF-8?Q?r=C3=A9sum=C3=A9=2Epdf?="), "résumé.pdf");
        assert_eq!(decode_encoded_words("plain.pdf"), "plain.pdf");
    }
}
