//! Company and participant models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Language participants get when none is given.
pub const DEFAULT_LANGUAGE: &str = "de";

/// A customer organisation owning modules, catalogs and participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A person who answers a company's catalogs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub id: Uuid,

    pub company_id: Uuid,

    pub email: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Preferred language, ISO 639-1
    pub language: String,

    /// Inactive participants receive no tickets
    pub is_active: bool,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl Participant {
    /// Compares emails case-insensitively.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self.email.clone(),
        }
    }
}
