//! Outbound draft model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Attachment, EmailAddress, EmailBody};

/// A caller-built outbound message, validated once and consumed by the composer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub to: Vec<EmailAddress>,
    pub cc: Vec<EmailAddress>,
    pub bcc: Vec<EmailAddress>,
    pub reply_to: Vec<EmailAddress>,
    pub subject: String,
    pub body: EmailBody,
    /// Every attachment must carry `data`
    pub attachments: Vec<Attachment>,
    /// Extra headers appended verbatim after the standard ones
    pub headers: HashMap<String, String>,
}

impl Draft {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn to(mut self, address: EmailAddress) -> Self {
        self.to.push(address);
        self
    }

    pub fn cc(mut self, address: EmailAddress) -> Self {
        self.cc.push(address);
        self
    }

    pub fn bcc(mut self, address: EmailAddress) -> Self {
        self.bcc.push(address);
        self
    }

    pub fn reply_to(mut self, address: EmailAddress) -> Self {
        self.reply_to.push(address);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body.text = Some(text.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.body.html = Some(html.into());
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// All recipient lists plus reply-to, in header order
    pub fn all_addresses(&self) -> impl Iterator<Item = &EmailAddress> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .chain(&self.reply_to)
    }

    pub fn has_recipients(&self) -> bool {
        !(self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty())
    }
}
