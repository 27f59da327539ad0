//! Email address model and header-value parsing

use serde::{Deserialize, Serialize};

/// An email address with optional display name
///
/// An address whose `email` is empty is treated as absent: the list parsers
/// never return one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name (e.g., "John Doe")
    pub name: Option<String>,
    /// Email address (e.g., "john@example.com")
    pub email: String,
}

impl EmailAddress {
    /// Create a new email address with just the email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Create a new email address with a display name
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Build an address from separately supplied parts, as structured
    /// providers deliver them. Blank names collapse to `None`.
    pub fn from_parts(name: Option<&str>, email: &str) -> Self {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        Self {
            name: name.map(str::to_string),
            email: email.trim().to_string(),
        }
    }

    /// Parse an address from a header value.
    ///
    /// Accepts `"Display Name" <local@domain>`, `Display Name <local@domain>`
    /// and bare `local@domain`. Empty input yields the default (empty) address.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return Self::default();
        }

        if let Some(angle_start) = s.rfind('<')
            && let Some(angle_end) = s.rfind('>')
            && angle_start < angle_end
        {
            let name = unquote(s[..angle_start].trim());
            let name = name.trim();
            let email = s[angle_start + 1..angle_end].trim();
            return Self {
                name: if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                },
                email: email.to_string(),
            };
        }

        Self {
            name: None,
            email: s.to_string(),
        }
    }

    /// Whether this address carries an email (empty addresses are "absent").
    pub fn is_present(&self) -> bool {
        !self.email.is_empty()
    }

    /// Format the email address for display
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// Parse a single address header value. See [`EmailAddress::parse`].
pub fn parse_address(raw: &str) -> EmailAddress {
    EmailAddress::parse(raw)
}

/// Parse a comma-separated address list, dropping empty entries.
///
/// Commas inside a quoted display name do not split the entry.
pub fn parse_address_list(raw: &str) -> Vec<EmailAddress> {
    split_unquoted(raw, ',')
        .into_iter()
        .map(|segment| EmailAddress::parse(segment.trim()))
        .filter(EmailAddress::is_present)
        .collect()
}

/// Strip one layer of surrounding double quotes and resolve `\"` and `\\`
/// escapes inside them. Unquoted input is returned as is.
fn unquote(s: &str) -> String {
    let Some(inner) = s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
        return s.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                segments.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(&s[start..]);
    segments
}
