//! Graph message normalization

use chrono::Utc;
use log::debug;

use super::api::{GraphFileAttachment, GraphMessage, Recipient};
use crate::config::DecodeOptions;
use crate::error::Result;
use crate::models::{Attachment, Email, EmailAddress, EmailBody, MessageId, ThreadId};
use crate::parse::{decode_mail_bytes, parse_date};

/// Normalize a Graph message to an [`Email`]
///
/// The parent folder id is carried as the single label. The decode options
/// are accepted for symmetry with Gmail; Graph flags are explicit fields.
pub fn normalize_graph_message(msg: GraphMessage, _options: &DecodeOptions) -> Result<Email> {
    let id = MessageId::new(&msg.id);
    let thread_id = ThreadId::new(msg.conversation_id.as_deref().unwrap_or(&msg.id));

    let date = msg
        .received_date_time
        .as_deref()
        .or(msg.sent_date_time.as_deref())
        .and_then(|raw| match parse_date(raw) {
            Ok(date) => Some(date.with_timezone(&Utc)),
            Err(e) => {
                debug!("Leaving date unset for message {}: {}", id, e);
                None
            }
        });

    let body = match msg.body {
        Some(body) if body.content.is_empty() => EmailBody::default(),
        Some(body) if body.content_type.eq_ignore_ascii_case("html") => {
            EmailBody::html(body.content)
        }
        Some(body) => EmailBody::text(body.content),
        None => EmailBody::default(),
    };

    let is_starred = msg
        .flag
        .as_ref()
        .is_some_and(|f| f.flag_status.eq_ignore_ascii_case("flagged"));

    Ok(Email::builder(id, thread_id)
        .subject(msg.subject.unwrap_or_default())
        .from(msg.from.as_ref().map(to_address).unwrap_or_default())
        .to(to_addresses(&msg.to_recipients))
        .cc(to_addresses(&msg.cc_recipients))
        .bcc(to_addresses(&msg.bcc_recipients))
        .reply_to(to_addresses(&msg.reply_to))
        .date(date)
        .body(body)
        .snippet(msg.body_preview)
        .labels(msg.parent_folder_id.into_iter().collect())
        .read(msg.is_read)
        .starred(is_starred)
        .draft(msg.is_draft)
        .build())
}

/// Convert a Graph file attachment, decoding its inline bytes
pub fn attachment_from_graph(attachment: GraphFileAttachment) -> Result<Attachment> {
    let data = match attachment.content_bytes.as_deref() {
        Some(encoded) => Some(decode_mail_bytes(encoded)?),
        None => None,
    };
    let size = match (&data, attachment.size) {
        (Some(bytes), 0) => bytes.len() as u64,
        (_, size) => size,
    };

    Ok(Attachment {
        id: Some(attachment.id),
        filename: attachment.name,
        mime_type: attachment.content_type,
        size,
        data,
    })
}

fn to_address(recipient: &Recipient) -> EmailAddress {
    let address = &recipient.email_address;
    EmailAddress::from_parts(address.name.as_deref(), &address.address)
}

fn to_addresses(recipients: &[Recipient]) -> Vec<EmailAddress> {
    recipients
        .iter()
        .map(to_address)
        .filter(EmailAddress::is_present)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE_JSON: &str = r#"{
        "id": "AAMkAGI2",
        "conversationId": "AAQkAGI2",
        "subject": "Lunch?",
        "from": { "emailAddress": { "name": "Dana", "address": "dana@contoso.com" } },
        "toRecipients": [
            { "emailAddress": { "name": "Eli", "address": "eli@contoso.com" } },
            { "emailAddress": { "name": "", "address": "" } },
            { "emailAddress": { "address": "fay@contoso.com" } }
        ],
        "ccRecipients": [],
        "bccRecipients": [],
        "receivedDateTime": "2024-05-01T12:30:00Z",
        "sentDateTime": "2024-05-01T12:29:58Z",
        "isRead": false,
        "isDraft": false,
        "body": { "contentType": "html", "content": "<p>Noon?</p>" },
        "bodyPreview": "Noon?",
        "parentFolderId": "inbox-folder-id",
        "hasAttachments": true,
        "flag": { "flagStatus": "flagged" }
    }"#;

    fn decode(json: &str) -> Email {
        let msg: GraphMessage = serde_json::from_str(json).unwrap();
        normalize_graph_message(msg, &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn test_normalize_graph_message() {
        let email = decode(MESSAGE_JSON);

        assert_eq!(email.id.as_str(), "AAMkAGI2");
        assert_eq!(email.thread_id.as_str(), "AAQkAGI2");
        assert_eq!(email.subject, "Lunch?");
        assert_eq!(email.from, Some(EmailAddress::with_name("Dana", "dana@contoso.com")));
        assert_eq!(
            email.to,
            vec![
                EmailAddress::with_name("Eli", "eli@contoso.com"),
                EmailAddress::new("fay@contoso.com"),
            ]
        );
        assert_eq!(email.date.unwrap().to_rfc3339(), "2024-05-01T12:30:00+00:00");
        assert_eq!(email.body.html.as_deref(), Some("<p>Noon?</p>"));
        assert!(email.body.text.is_none());
        assert_eq!(email.snippet, "Noon?");
        assert_eq!(email.labels, vec!["inbox-folder-id"]);
        assert!(!email.is_read);
        assert!(email.is_starred);
        assert!(email.attachments.is_empty());
    }

    #[test]
    fn test_text_body_and_sent_date_fallback() {
        let email = decode(
            r#"{
                "id": "m2",
                "body": { "contentType": "text", "content": "plain words" },
                "sentDateTime": "2024-05-01T08:00:00Z",
                "isRead": true
            }"#,
        );

        assert_eq!(email.body.text.as_deref(), Some("plain words"));
        assert_eq!(email.thread_id.as_str(), "m2");
        assert!(email.date.is_some());
        assert!(email.from.is_none());
        assert!(email.labels.is_empty());
        assert!(email.is_read);
        assert!(!email.is_starred);
    }

    #[test]
    fn test_unparsable_date_left_unset() {
        let email = decode(r#"{ "id": "m3", "receivedDateTime": "sometime" }"#);
        assert!(email.date.is_none());
    }

    #[test]
    fn test_attachment_from_graph() {
        let attachment: GraphFileAttachment = serde_json::from_str(
            r##"{
                "@odata.type": "#microsoft.graph.fileAttachment",
                "id": "att-9",
                "name": "notes.txt",
                "contentType": "text/plain",
                "size": 0,
                "contentBytes": "SGVsbG8gV29ybGQ="
            }"##,
        )
        .unwrap();

        let att = attachment_from_graph(attachment).unwrap();
        assert_eq!(att.id.as_deref(), Some("att-9"));
        assert_eq!(att.filename, "notes.txt");
        assert_eq!(att.size, 11);
        assert_eq!(att.data.as_deref(), Some(&b"Hello World"[..]));
    }

    #[test]
    fn test_attachment_without_bytes() {
        let att = attachment_from_graph(GraphFileAttachment {
            id: "att-1".to_string(),
            name: "big.zip".to_string(),
            content_type: "application/zip".to_string(),
            size: 4096,
            content_bytes: None,
        })
        .unwrap();
        assert_eq!(att.size, 4096);
        assert!(att.data.is_none());
    }
}
