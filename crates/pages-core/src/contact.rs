//! Visitor contact form

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("static pattern"));

/// What the visitor typed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    /// Name, email and message are required; email must look like one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingContactField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingContactField("email"));
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingContactField("message"));
        }
        if !EMAIL.is_match(self.email.trim()) {
            return Err(ValidationError::InvalidEmail(self.email.trim().to_string()));
        }
        Ok(())
    }
}

/// A validated message addressed to a page owner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub page_owner_id: String,
    pub page_title: String,
    pub page_slug: String,
}

impl ContactMessage {
    /// Validate `form` and address it to the page
    pub fn new(
        form: ContactForm,
        page_owner_id: impl Into<String>,
        page_title: impl Into<String>,
        page_slug: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        form.validate()?;
        let phone = form.phone.trim();
        Ok(Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            message: form.message.trim().to_string(),
            page_owner_id: page_owner_id.into(),
            page_title: page_title.into(),
            page_slug: page_slug.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ana".into(),
            email: "ana@exemplo.pt".into(),
            phone: " ".into(),
            message: "Olá".into(),
        }
    }

    #[test]
    fn test_valid_form_builds_message() {
        let message = ContactMessage::new(form(), "user-1", "Loja", "loja-abc123").unwrap();
        assert_eq!(message.phone, None);
        assert_eq!(message.page_slug, "loja-abc123");
    }

    #[test]
    fn test_missing_fields() {
        let mut f = form();
        f.message = "  ".into();
        assert_eq!(f.validate(), Err(ValidationError::MissingContactField("message")));
    }

    #[test]
    fn test_bad_email() {
        let mut f = form();
        f.email = "ana@exemplo".into();
        assert!(matches!(f.validate(), Err(ValidationError::InvalidEmail(_))));
    }
}
