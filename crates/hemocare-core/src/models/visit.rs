//! Visit models: wire vocabularies, the canonical record, and the
//! submission payload handed to the save sink.

use serde::{Deserialize, Serialize};

/// How the visit took place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    TelephoneConsultation,
    CenterVisit,
}

impl VisitType {
    /// Backend wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TelephoneConsultation => "telephone_consultation",
            Self::CenterVisit => "center_visit",
        }
    }

    /// Parse a wire value, `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "telephone_consultation" => Some(Self::TelephoneConsultation),
            "center_visit" => Some(Self::CenterVisit),
            _ => None,
        }
    }
}

impl std::fmt::Display for VisitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the patient is being seen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisType {
    NewPatient,
    Followup,
    Admission,
}

impl DiagnosisType {
    /// Backend wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewPatient => "new_patient",
            Self::Followup => "followup",
            Self::Admission => "admission",
        }
    }

    /// Parse a wire value, `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new_patient" => Some(Self::NewPatient),
            "followup" => Some(Self::Followup),
            "admission" => Some(Self::Admission),
            _ => None,
        }
    }
}

impl Default for DiagnosisType {
    fn default() -> Self {
        Self::Followup
    }
}

impl std::fmt::Display for DiagnosisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ad-hoc medical test attached to a visit by callers other than the
/// entry form (the form itself submits none).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct MedicalTest {
    pub test_name: String,
    pub test_result: String,
    pub test_date: String,
}

/// The request payload handed to the save sink on submission.
///
/// Built only by the form controller; `visit_type` is omitted from JSON
/// entirely when unset rather than serialized as null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct VisitSubmission {
    pub patient_id: i64,
    /// RFC 3339 timestamp at UTC midnight of the visit's calendar date
    pub visit_date: String,
    /// Display name of the center's state, empty when unselected
    pub center_state: String,
    pub center_name: String,
    pub diagnosis_type: DiagnosisType,
    pub complaint: String,
    pub complaint_other: String,
    pub complaint_details: String,
    /// Effective notes, follow-up line already appended for admissions
    pub notes: String,
    pub entered_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<VisitType>,
    #[serde(default)]
    pub contact_relation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_medical_tests: Vec<MedicalTest>,
}

/// Canonical visit record as normalized by the records client.
///
/// Never constructed by the form controller; the form only reads one when
/// initialized in edit mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: i64,
    pub patient_id: i64,
    pub visit_date: String,
    pub center_state: String,
    pub center_name: String,
    #[serde(default)]
    pub visit_type: Option<VisitType>,
    #[serde(default)]
    pub diagnosis_type: Option<DiagnosisType>,
    pub complaint: String,
    pub complaint_other: String,
    pub complaint_details: String,
    pub notes: String,
    pub entered_by: String,
    #[serde(default)]
    pub factor_level_test_dates: Vec<String>,
    #[serde(default)]
    pub inhibitor_screening_dates: Vec<String>,
    #[serde(default)]
    pub viral_screening_dates: Vec<String>,
    #[serde(default)]
    pub other_test_dates: Vec<String>,
    #[serde(default)]
    pub hbsag_screen_dates: Vec<String>,
    pub created_at: String,
}
