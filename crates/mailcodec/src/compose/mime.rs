//! RFC 2822 / MIME serialization of validated drafts

use std::collections::HashMap;
use std::fmt::Write;

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use chrono::Utc;
use log::debug;

use super::encoding::{
    base64_wrapped, encode_header_value, encode_param_value, format_address_list,
    quoted_printable_body, random_hex,
};
use super::validate::validate_draft;
use crate::config::ComposeOptions;
use crate::error::{CodecError, Result};
use crate::models::{Attachment, Draft, EmailAddress, EmailBody};

/// A serialized outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    bytes: Vec<u8>,
    message_id: String,
}

impl ComposedMessage {
    /// Raw RFC 2822 bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The generated `Message-ID`, angle brackets included
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Unpadded base64url of the whole message, as Gmail's send call expects
    pub fn to_base64url(&self) -> String {
        BASE64_URL_SAFE_NO_PAD.encode(&self.bytes)
    }
}

/// Serializes drafts into transport-ready messages
#[derive(Debug, Clone, Default)]
pub struct Composer {
    options: ComposeOptions,
}

impl Composer {
    pub fn new(options: ComposeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Validate and serialize a draft
    pub fn compose(&self, draft: &Draft) -> Result<ComposedMessage> {
        self.compose_with_headers(draft, &HashMap::new())
    }

    /// Validate and serialize a draft, appending per-call headers after the
    /// draft's own headers
    pub fn compose_with_headers(
        &self,
        draft: &Draft,
        custom_headers: &HashMap<String, String>,
    ) -> Result<ComposedMessage> {
        validate_draft(Some(draft), &self.options)?;

        let message_id = self.generate_message_id();
        let mut out = String::new();

        self.write_envelope(&mut out, draft, &message_id, custom_headers)
            .map_err(CodecError::compose("headers"))?;

        let body = &draft.body;
        if draft.attachments.is_empty() && !(body.has_text() && body.has_html()) {
            write_single_part(&mut out, body).map_err(CodecError::compose("body"))?;
        } else {
            write_mixed(&mut out, body, &draft.attachments)
                .map_err(CodecError::compose("multipart body"))?;
        }

        debug!(
            "Composed message {} ({} bytes, {} attachments)",
            message_id,
            out.len(),
            draft.attachments.len()
        );

        Ok(ComposedMessage {
            bytes: out.into_bytes(),
            message_id,
        })
    }

    fn generate_message_id(&self) -> String {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!(
            "<{}.{}@{}>",
            random_hex(16),
            nanos,
            self.options.message_id_host
        )
    }

    fn write_envelope(
        &self,
        out: &mut String,
        draft: &Draft,
        message_id: &str,
        custom_headers: &HashMap<String, String>,
    ) -> std::fmt::Result {
        write_header(out, "From", &self.options.sender)?;
        write_address_header(out, "To", &draft.to)?;
        write_address_header(out, "Cc", &draft.cc)?;
        write_address_header(out, "Bcc", &draft.bcc)?;
        write_address_header(out, "Reply-To", &draft.reply_to)?;
        write_header(out, "Subject", &encode_header_value(&draft.subject))?;
        write_header(out, "Date", &Utc::now().to_rfc2822())?;
        write_header(out, "Message-ID", message_id)?;
        write_header(out, "MIME-Version", "1.0")?;

        for (name, value) in draft.headers.iter().chain(custom_headers) {
            write_header(out, name, value)?;
        }
        Ok(())
    }
}

fn write_header(out: &mut String, name: &str, value: &str) -> std::fmt::Result {
    write!(out, "{name}: {value}\r\n")
}

fn write_address_header(
    out: &mut String,
    name: &str,
    addresses: &[EmailAddress],
) -> std::fmt::Result {
    if addresses.is_empty() {
        return Ok(());
    }
    write_header(out, name, &format_address_list(addresses))
}

/// Top-level text or HTML body; continues the top-level header block
fn write_single_part(out: &mut String, body: &EmailBody) -> std::fmt::Result {
    match (&body.text, &body.html) {
        (Some(text), _) if body.has_text() => write_text_part(out, "plain", text, false),
        (_, Some(html)) => write_text_part(out, "html", html, false),
        _ => write_text_part(out, "plain", "", false),
    }
}

fn write_text_part(
    out: &mut String,
    subtype: &str,
    content: &str,
    nested: bool,
) -> std::fmt::Result {
    write_header(
        out,
        "Content-Type",
        &format!("text/{subtype}; charset=\"UTF-8\""),
    )?;
    write_header(out, "Content-Transfer-Encoding", "quoted-printable")?;
    out.write_str("\r\n")?;
    out.write_str(&quoted_printable_body(content))?;
    if nested {
        out.write_str("\r\n")?;
    }
    Ok(())
}

fn write_mixed(
    out: &mut String,
    body: &EmailBody,
    attachments: &[Attachment],
) -> std::fmt::Result {
    let boundary = random_hex(16);
    write_header(
        out,
        "Content-Type",
        &format!("multipart/mixed; boundary=\"{boundary}\""),
    )?;
    out.write_str("\r\n")?;

    write!(out, "--{boundary}\r\n")?;
    match (&body.text, &body.html) {
        (Some(text), Some(html)) if body.has_text() && body.has_html() => {
            write_alternative(out, text, html)?
        }
        (_, Some(html)) if body.has_html() => write_text_part(out, "html", html, true)?,
        (text, _) => {
            write_text_part(out, "plain", text.as_deref().unwrap_or_default(), true)?
        }
    }

    for attachment in attachments {
        write!(out, "--{boundary}\r\n")?;
        write_attachment(out, attachment)?;
    }

    write!(out, "--{boundary}--\r\n")
}

/// Text first, then HTML: least capable rendering leads
fn write_alternative(out: &mut String, text: &str, html: &str) -> std::fmt::Result {
    let boundary = random_hex(16);
    write_header(
        out,
        "Content-Type",
        &format!("multipart/alternative; boundary=\"{boundary}\""),
    )?;
    out.write_str("\r\n")?;

    write!(out, "--{boundary}\r\n")?;
    write_text_part(out, "plain", text, true)?;
    write!(out, "--{boundary}\r\n")?;
    write_text_part(out, "html", html, true)?;
    write!(out, "--{boundary}--\r\n")
}

fn write_attachment(out: &mut String, attachment: &Attachment) -> std::fmt::Result {
    let filename = encode_param_value(&attachment.filename);
    write_header(
        out,
        "Content-Type",
        &format!("{}; name=\"{}\"", attachment.mime_type, filename),
    )?;
    write_header(
        out,
        "Content-Disposition",
        &format!("attachment; filename=\"{filename}\""),
    )?;
    write_header(out, "Content-Transfer-Encoding", "base64")?;
    out.write_str("\r\n")?;
    out.write_str(&base64_wrapped(attachment.data.as_deref().unwrap_or_default()))
}
