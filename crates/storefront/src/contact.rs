//! Contact form validation.

use std::sync::LazyLock;

use jblinx_core::{Email, EmailError};
use regex::Regex;
use thiserror::Error;

use crate::notify::Notification;

/// Reasons a contact form submission is refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// One or more of name, email, message is blank.
    #[error("Please fill in all required fields")]
    MissingFields { fields: Vec<&'static str> },
    #[error("Please enter a valid email address")]
    InvalidEmail(#[source] EmailError),
}

/// Addresses the form accepts, matched against the lowercased input.
///
/// Local part: a quoted string, or dot-separated atoms free of whitespace and
/// `<>()[]\.,;:@"`. Domain: a bracketed IPv4 literal, or labels ending in an
/// alphabetic TLD of two or more letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("Invalid regex")
});

/// Check `email` against the accepted address pattern, then parse it.
fn parse_email(email: &str) -> Result<Email, EmailError> {
    if !EMAIL_RE.is_match(&email.to_lowercase()) {
        return Err(EmailError::Malformed);
    }
    Email::parse(email)
}

/// Raw form input.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: Email,
    pub message: String,
}

impl ContactSubmission {
    /// Confirmation shown once the message is accepted.
    #[must_use]
    pub fn confirmation(&self) -> Notification {
        Notification::new("Your message has been sent successfully!")
    }
}

impl ContactForm {
    /// Check required fields, then the email address.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingFields`] listing every blank field, or
    /// [`ContactError::InvalidEmail`] if the address is malformed.
    pub fn validate(&self) -> Result<ContactSubmission, ContactError> {
        let fields: Vec<&'static str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !fields.is_empty() {
            return Err(ContactError::MissingFields { fields });
        }

        let email = parse_email(self.email.trim()).map_err(ContactError::InvalidEmail)?;

        Ok(ContactSubmission {
            name: self.name.trim().to_string(),
            email,
            message: self.message.trim().to_string(),
        })
    }
}
