//! Patient models.

use serde::{Deserialize, Serialize};

/// A registered patient, supplied by the caller as a read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Backend record id (always positive for persisted patients)
    pub id: i64,
    /// Patient full name
    pub full_name: String,
    /// National identity number
    pub national_id_number: String,
}

impl Patient {
    /// Create a new patient snapshot entry.
    pub fn new(id: i64, full_name: impl Into<String>, national_id_number: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            national_id_number: national_id_number.into(),
        }
    }

    /// Canonical search/display label: `"{full name} - {national id}"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.full_name, self.national_id_number)
    }
}
