//! Draft precondition checks, run before any serialization or network call

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ComposeOptions;
use crate::error::{CodecError, Result};
use crate::models::Draft;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("address pattern is valid")
});

/// `type/subtype` made of RFC 2045 token characters
static MIME_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$&^_.+-]+/[A-Za-z0-9!#$&^_.+-]+$")
        .expect("MIME type pattern is valid")
});

/// Whether `email` matches `local-part@domain.tld`
pub fn is_valid_address(email: &str) -> bool {
    ADDRESS_RE.is_match(email)
}

/// Validate a draft, failing on the first violated rule.
///
/// Order: presence, recipients, address syntax, subject, body, attachments.
pub fn validate_draft(draft: Option<&Draft>, options: &ComposeOptions) -> Result<()> {
    let draft = draft.ok_or_else(|| CodecError::validation("draft is required"))?;

    if !draft.has_recipients() {
        return Err(CodecError::validation("at least one recipient required"));
    }

    if let Some(bad) = draft.all_addresses().find(|a| !is_valid_address(&a.email)) {
        return Err(CodecError::validation(format!(
            "invalid email address: {:?}",
            bad.email
        )));
    }

    if draft.subject.trim().is_empty() {
        return Err(CodecError::validation("subject is required"));
    }

    if !draft.body.has_text() && !draft.body.has_html() {
        return Err(CodecError::validation("body text or HTML is required"));
    }

    let limit_mb = options.max_attachment_bytes / (1024 * 1024);
    for (index, attachment) in draft.attachments.iter().enumerate() {
        if attachment.filename.is_empty() {
            return Err(CodecError::validation(format!(
                "attachment {index}: filename is required"
            )));
        }
        if attachment.mime_type.is_empty() {
            return Err(CodecError::validation(format!(
                "attachment {}: MIME type is required",
                attachment.filename
            )));
        }
        if !MIME_TYPE_RE.is_match(&attachment.mime_type) {
            return Err(CodecError::validation(format!(
                "attachment {}: invalid MIME type {:?}",
                attachment.filename, attachment.mime_type
            )));
        }
        let data = attachment.data.as_deref().unwrap_or_default();
        if data.is_empty() {
            return Err(CodecError::validation(format!(
                "attachment {}: data is required",
                attachment.filename
            )));
        }
        if data.len() > options.max_attachment_bytes {
            return Err(CodecError::validation(format!(
                "attachment {} exceeds {}MB limit ({} bytes)",
                attachment.filename,
                limit_mb,
                data.len()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, EmailAddress};

    fn valid_draft() -> Draft {
        Draft::new("Hello")
            .to(EmailAddress::new("bob@example.com"))
            .text("Hi Bob")
    }

    fn check(draft: &Draft) -> Result<()> {
        validate_draft(Some(draft), &ComposeOptions::default())
    }

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_draft() {
        assert!(check(&valid_draft()).is_ok());
    }

    #[test]
    fn test_missing_draft() {
        let err = validate_draft(None, &ComposeOptions::default()).unwrap_err();
        assert!(matches!(err, CodecError::Validation(_)));
    }

    #[test]
    fn test_requires_recipient() {
        let draft = Draft::new("Hello").text("Hi");
        assert!(message(check(&draft)).contains("at least one recipient required"));
    }

    #[test]
    fn test_bcc_only_is_enough() {
        let draft = Draft::new("Hello")
            .bcc(EmailAddress::new("hidden@example.com"))
            .text("Hi");
        assert!(check(&draft).is_ok());
    }

    #[test]
    fn test_invalid_address_named() {
        let draft = valid_draft().cc(EmailAddress::new("not-an-address"));
        assert!(message(check(&draft)).contains("not-an-address"));

        let draft = valid_draft().reply_to(EmailAddress::new("x@localhost"));
        assert!(message(check(&draft)).contains("x@localhost"));
    }

    #[test]
    fn test_address_grammar() {
        assert!(is_valid_address("first.last+tag@mail.example.co.uk"));
        assert!(is_valid_address("a_b%c@x-y.io"));
        assert!(!is_valid_address("@example.com"));
        assert!(!is_valid_address("user@example.c"));
        assert!(!is_valid_address("user name@example.com"));
        assert!(!is_valid_address("Bob <bob@example.com>"));
    }

    #[test]
    fn test_requires_subject() {
        let mut draft = valid_draft();
        draft.subject = "   ".to_string();
        assert!(message(check(&draft)).contains("subject is required"));
    }

    #[test]
    fn test_requires_body() {
        let mut draft = valid_draft();
        draft.body.text = Some(String::new());
        assert!(message(check(&draft)).contains("body"));

        let draft = valid_draft();
        let draft = Draft {
            body: crate::models::EmailBody::html("<p>Hi</p>"),
            ..draft
        };
        assert!(check(&draft).is_ok());
    }

    #[test]
    fn test_attachment_fields_required() {
        let mut att = Attachment::from_bytes("", "text/plain", b"x".to_vec());
        let draft = valid_draft().attach(att.clone());
        assert!(message(check(&draft)).contains("filename is required"));

        att.filename = "a.txt".to_string();
        att.mime_type.clear();
        let draft = valid_draft().attach(att.clone());
        assert!(message(check(&draft)).contains("MIME type is required"));

        att.mime_type = "text/plain".to_string();
        att.data = None;
        let draft = valid_draft().attach(att);
        assert!(message(check(&draft)).contains("data is required"));
    }

    #[test]
    fn test_attachment_mime_type_shape() {
        let att = Attachment::from_bytes("a.txt", "text/plain\r\nBcc: evil@x.com", b"x".to_vec());
        let msg = message(check(&valid_draft().attach(att)));
        assert!(msg.contains("invalid MIME type"));

        for bad in ["text", "text/plain; charset=utf-8", "text/ plain"] {
            let att = Attachment::from_bytes("a.txt", bad, b"x".to_vec());
            assert!(check(&valid_draft().attach(att)).is_err(), "{bad}");
        }

        for good in ["application/vnd.ms-excel", "image/svg+xml", "text/x-c++src"] {
            let att = Attachment::from_bytes("a.bin", good, b"x".to_vec());
            assert!(check(&valid_draft().attach(att)).is_ok(), "{good}");
        }
    }

    #[test]
    fn test_attachment_size_limit() {
        let oversized = vec![0u8; 26 * 1024 * 1024];
        let draft = valid_draft().attach(Attachment::from_bytes(
            "huge.bin",
            "application/octet-stream",
            oversized,
        ));
        let msg = message(check(&draft));
        assert!(msg.contains("exceeds 25MB limit"));
        assert!(msg.contains("huge.bin"));

        let exact = vec![0u8; 25 * 1024 * 1024];
        let draft = valid_draft().attach(Attachment::from_bytes(
            "edge.bin",
            "application/octet-stream",
            exact,
        ));
        assert!(check(&draft).is_ok());
    }

    #[test]
    fn test_recipient_check_precedes_address_check() {
        let draft = Draft::new("").reply_to(EmailAddress::new("bad"));
        assert!(message(check(&draft)).contains("at least one recipient required"));
    }
}
