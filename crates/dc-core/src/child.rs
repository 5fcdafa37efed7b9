//! Validated drafts for the child directory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ValidationError> {
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidEmail {
            value: value.to_string(),
        }),
    }
}

/// A validated child profile to add to the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChild {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
}

impl NewChild {
    pub fn new(
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        guardian_name: impl Into<String>,
        guardian_phone: impl Into<String>,
        guardian_email: impl Into<String>,
        emergency_contact: impl Into<String>,
        emergency_phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let draft = Self {
            name: name.into(),
            date_of_birth,
            guardian_name: guardian_name.into(),
            guardian_phone: guardian_phone.into(),
            guardian_email: guardian_email.into(),
            emergency_contact: emergency_contact.into(),
            emergency_phone: emergency_phone.into(),
        };
        require("name", &draft.name)?;
        require("guardian name", &draft.guardian_name)?;
        require("guardian phone", &draft.guardian_phone)?;
        require("emergency contact", &draft.emergency_contact)?;
        require("emergency phone", &draft.emergency_phone)?;
        require_email(&draft.guardian_email)?;
        Ok(draft)
    }
}

/// A partial child-profile update; only provided fields change.
#[derive(Debug, Clone, Default)]
pub struct ChildUpdate {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub guardian_email: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
}

impl ChildUpdate {
    /// True when no field is provided.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date_of_birth.is_none()
            && self.guardian_name.is_none()
            && self.guardian_phone.is_none()
            && self.guardian_email.is_none()
            && self.emergency_contact.is_none()
            && self.emergency_phone.is_none()
    }

    /// Checks every provided field the way [`NewChild::new`] would.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(guardian_name) = &self.guardian_name {
            require("guardian name", guardian_name)?;
        }
        if let Some(guardian_phone) = &self.guardian_phone {
            require("guardian phone", guardian_phone)?;
        }
        if let Some(guardian_email) = &self.guardian_email {
            require_email(guardian_email)?;
        }
        if let Some(emergency_contact) = &self.emergency_contact {
            require("emergency contact", emergency_contact)?;
        }
        if let Some(emergency_phone) = &self.emergency_phone {
            require("emergency phone", emergency_phone)?;
        }
        Ok(())
    }
}
