//! Gmail message normalization
//!
//! Converts Gmail API messages (part trees or raw RFC 2822) to the canonical
//! [`Email`] model.

use chrono::Utc;
use log::{debug, warn};

use super::api::{GmailMessage, MessagePart, MessagePartBody};
use crate::config::DecodeOptions;
use crate::error::{CodecError, Result};
use crate::models::{
    Attachment, Email, EmailAddress, EmailBody, EmailBuilder, MessageId, ThreadId,
    parse_address_list,
};
use crate::parse::{decode_mail_bytes, parse_date};
use crate::raw;

/// Normalize a Gmail API message to an [`Email`]
///
/// Uses the part tree when present and falls back to the `raw` payload.
/// Malformed headers and bodies degrade to empty values.
pub fn normalize_message(gmail_msg: GmailMessage, options: &DecodeOptions) -> Result<Email> {
    let id = MessageId::new(&gmail_msg.id);
    let thread_id = ThreadId::new(&gmail_msg.thread_id);

    let root = match (gmail_msg.payload, gmail_msg.raw.as_deref()) {
        (Some(payload), _) => payload,
        (None, Some(raw_data)) => raw::parse_raw_message(&decode_mail_bytes(raw_data)?)?,
        (None, None) => return Err(CodecError::MissingPayload(gmail_msg.id)),
    };

    let labels = gmail_msg.label_ids.unwrap_or_default();
    let has_label = |name: &str| labels.iter().any(|l| l == name);
    let is_read = !has_label(&options.unread_label);
    let is_starred = has_label(&options.starred_label);
    let is_draft = has_label(&options.draft_label);

    Ok(decode_part_tree(id, thread_id, &root, options)
        .snippet(gmail_msg.snippet)
        .read(is_read)
        .starred(is_starred)
        .draft(is_draft)
        .labels(labels)
        .build())
}

/// Read the root headers and walk the tree into an email builder
pub(crate) fn decode_part_tree(
    id: MessageId,
    thread_id: ThreadId,
    root: &MessagePart,
    options: &DecodeOptions,
) -> EmailBuilder {
    let header = |name: &str| root.header(name).unwrap_or_default();

    let date = match root.header("Date") {
        Some(raw_date) => match parse_date(raw_date) {
            Ok(date) => Some(date.with_timezone(&Utc)),
            Err(e) => {
                debug!("Leaving date unset for message {}: {}", id, e);
                None
            }
        },
        None => None,
    };

    let (body, attachments) = extract_content(root, options.max_part_depth);

    Email::builder(id, thread_id)
        .subject(header("Subject"))
        .from(EmailAddress::parse(header("From")))
        .to(parse_address_list(header("To")))
        .cc(parse_address_list(header("Cc")))
        .bcc(parse_address_list(header("Bcc")))
        .reply_to(parse_address_list(header("Reply-To")))
        .date(date)
        .body(body)
        .attachments(attachments)
}

/// Walk the part tree depth-first, pre-order, collecting bodies and attachments
///
/// The first `text/plain` and first `text/html` part win. Parts nested deeper
/// than `max_depth` are skipped; everything above them is still decoded.
pub fn extract_content(root: &MessagePart, max_depth: usize) -> (EmailBody, Vec<Attachment>) {
    let mut body = EmailBody::default();
    let mut attachments = Vec::new();
    let mut skipped = 0usize;

    let mut stack: Vec<(&MessagePart, usize)> = vec![(root, 0)];
    while let Some((part, depth)) = stack.pop() {
        if depth > max_depth {
            skipped += 1;
            continue;
        }

        visit_part(part, &mut body, &mut attachments);

        if let Some(children) = &part.parts {
            // Reversed so the first child is visited first
            stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} MIME parts nested deeper than {} levels",
            skipped, max_depth
        );
    }

    (body, attachments)
}

fn visit_part(part: &MessagePart, body: &mut EmailBody, attachments: &mut Vec<Attachment>) {
    let mime_type = base_mime_type(part);

    if mime_type == "text/plain" && !body.has_text() {
        if let Some(text) = decode_part_text(part) {
            body.text = Some(text);
        }
    } else if mime_type == "text/html" && !body.has_html() {
        if let Some(html) = decode_part_text(part) {
            body.html = Some(html);
        }
    }

    if let Some(filename) = part.filename.as_deref().filter(|f| !f.is_empty())
        && let Some(part_body) = &part.body
    {
        attachments.push(Attachment {
            id: part_body.attachment_id.clone(),
            filename: filename.to_string(),
            mime_type: part.mime_type.clone().unwrap_or_default(),
            size: part_body.size.unwrap_or_default(),
            data: None,
        });
    }
}

/// Lowercased MIME type without parameters
fn base_mime_type(part: &MessagePart) -> String {
    part.mime_type
        .as_deref()
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Decode inline part data as text; `None` when absent, empty or undecodable
fn decode_part_text(part: &MessagePart) -> Option<String> {
    let data = part.body.as_ref()?.data.as_deref()?;
    match decode_mail_bytes(data) {
        Ok(bytes) if !bytes.is_empty() => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Ok(_) => None,
        Err(e) => {
            debug!("Dropping undecodable {} part: {}", base_mime_type(part), e);
            None
        }
    }
}

/// Attach the bytes from an attachments.get response to known metadata
pub fn attachment_from_gmail(meta: &Attachment, response: MessagePartBody) -> Result<Attachment> {
    let data = decode_mail_bytes(response.data.as_deref().unwrap_or_default())?;
    Ok(Attachment {
        id: response.attachment_id.or_else(|| meta.id.clone()),
        filename: meta.filename.clone(),
        mime_type: meta.mime_type.clone(),
        size: response.size.unwrap_or(data.len() as u64),
        data: Some(data),
    })
}
