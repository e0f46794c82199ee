//! The visit form controller.
//!
//! Owns the transient drafts of a single visit entry session: the visit
//! draft, the optional treatment draft, patient search state and the
//! submission guard. Every mutation goes through an explicit per-field
//! setter so each field's coercion rule (numeric parse, enum assignment,
//! literal passthrough) is statically checked instead of dispatched on a
//! field-name string.

mod search;
mod submit;

pub use submit::{StepOutcome, SubmissionOutcome, SubmissionState, SubmitError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::centers::CenterState;
use crate::models::{DiagnosisType, Factor, Patient, VisitRecord, VisitType};

/// Transient, not-yet-persisted visit fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct VisitDraft {
    /// Selected patient id, 0 while unselected
    pub patient_id: i64,
    /// Calendar date, `YYYY-MM-DD`
    pub visit_date: String,
    /// `None` is the one and only "no selection" representation
    pub center_state: Option<CenterState>,
    /// Constrained to the state's centers plus "Other"; cleared whenever
    /// the state changes
    pub center_name: String,
    pub visit_type: Option<VisitType>,
    pub diagnosis_type: DiagnosisType,
    /// One of [`crate::centers::COMPLAINT_OPTIONS`], empty while unselected
    pub complaint: String,
    /// Only meaningful when `complaint == "Other"`
    pub complaint_other: String,
    pub complaint_details: String,
    pub notes: String,
    pub entered_by: String,
}

impl VisitDraft {
    fn empty_for_today() -> Self {
        Self {
            patient_id: 0,
            visit_date: Utc::now().date_naive().to_string(),
            center_state: None,
            center_name: String::new(),
            visit_type: None,
            diagnosis_type: DiagnosisType::Followup,
            complaint: String::new(),
            complaint_other: String::new(),
            complaint_details: String::new(),
            notes: String::new(),
            entered_by: String::new(),
        }
    }
}

/// Transient treatment fields, relevant only for center visits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentDraft {
    /// Selected factor id, 0 while no factor is dispensed
    pub factor_id: i64,
    /// Lot number, auto-filled from the selected factor
    pub lot: String,
    /// Units to dispense, bounded by the factor's on-hand quantity
    pub quantity_lot: i64,
    pub indication_of_treatment: String,
}

impl TreatmentDraft {
    fn empty() -> Self {
        Self {
            factor_id: 0,
            lot: String::new(),
            quantity_lot: 0,
            indication_of_treatment: String::new(),
        }
    }
}

/// Controller state for one visit entry session.
#[derive(Debug)]
pub struct VisitForm {
    session_id: String,
    editing_id: Option<i64>,
    patients: Vec<Patient>,
    factors: Vec<Factor>,
    draft: VisitDraft,
    treatment: TreatmentDraft,
    follow_up_date: String,
    patient_search: String,
    dropdown_open: bool,
    submission: SubmissionState,
}

impl VisitForm {
    /// Start a blank entry session over the caller's snapshots.
    pub fn new(patients: Vec<Patient>, factors: Vec<Factor>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            editing_id: None,
            patients,
            factors,
            draft: VisitDraft::empty_for_today(),
            treatment: TreatmentDraft::empty(),
            follow_up_date: String::new(),
            patient_search: String::new(),
            dropdown_open: false,
            submission: SubmissionState::Idle,
        }
    }

    /// Start an edit session pre-filled from an existing record.
    pub fn for_record(record: &VisitRecord, patients: Vec<Patient>, factors: Vec<Factor>) -> Self {
        let mut form = Self::new(patients, factors);
        form.editing_id = Some(record.id);
        form.draft = VisitDraft {
            patient_id: record.patient_id,
            visit_date: calendar_date_of(&record.visit_date),
            center_state: CenterState::parse(&record.center_state),
            center_name: record.center_name.clone(),
            visit_type: record.visit_type,
            diagnosis_type: record.diagnosis_type.unwrap_or_default(),
            complaint: record.complaint.clone(),
            complaint_other: record.complaint_other.clone(),
            complaint_details: record.complaint_details.clone(),
            notes: record.notes.clone(),
            entered_by: record.entered_by.clone(),
        };
        if let Some(patient) = form.patients.iter().find(|p| p.id == record.patient_id) {
            form.patient_search = patient.label();
        }
        form
    }

    // ── Snapshots ───────────────────────────────────────────

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn draft(&self) -> &VisitDraft {
        &self.draft
    }

    pub fn treatment(&self) -> &TreatmentDraft {
        &self.treatment
    }

    pub fn follow_up_date(&self) -> &str {
        &self.follow_up_date
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    // ── Visit field setters ─────────────────────────────────

    pub fn set_visit_date(&mut self, value: impl Into<String>) {
        self.draft.visit_date = value.into();
    }

    /// Assigns the state and always resets the dependent center name.
    pub fn set_center_state(&mut self, state: Option<CenterState>) {
        self.draft.center_state = state;
        self.draft.center_name = String::new();
    }

    pub fn set_center_name(&mut self, value: impl Into<String>) {
        self.draft.center_name = value.into();
    }

    pub fn set_visit_type(&mut self, visit_type: Option<VisitType>) {
        self.draft.visit_type = visit_type;
    }

    pub fn set_diagnosis_type(&mut self, diagnosis_type: DiagnosisType) {
        self.draft.diagnosis_type = diagnosis_type;
    }

    pub fn set_complaint(&mut self, value: impl Into<String>) {
        self.draft.complaint = value.into();
    }

    pub fn set_complaint_other(&mut self, value: impl Into<String>) {
        self.draft.complaint_other = value.into();
    }

    pub fn set_complaint_details(&mut self, value: impl Into<String>) {
        self.draft.complaint_details = value.into();
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        self.draft.notes = value.into();
    }

    pub fn set_entered_by(&mut self, value: impl Into<String>) {
        self.draft.entered_by = value.into();
    }

    /// Used only when the diagnosis type is `Admission`.
    pub fn set_follow_up_date(&mut self, value: impl Into<String>) {
        self.follow_up_date = value.into();
    }

    // ── Treatment setters ───────────────────────────────────

    /// Select the factor to dispense; auto-fills the read-only lot from the
    /// snapshot. Id 0 (or an id missing from the snapshot) clears both.
    pub fn select_factor(&mut self, factor_id: i64) {
        match self.factors.iter().find(|f| f.id == factor_id) {
            Some(factor) => {
                self.treatment.factor_id = factor.id;
                self.treatment.lot = factor.lot_no.clone();
            }
            None => {
                self.treatment.factor_id = 0;
                self.treatment.lot = String::new();
            }
        }
    }

    pub fn set_quantity_lot(&mut self, units: i64) {
        self.treatment.quantity_lot = units;
    }

    /// Numeric-input coercion: empty or unparseable input becomes 0.
    pub fn set_quantity_lot_input(&mut self, raw: &str) {
        self.treatment.quantity_lot = raw.trim().parse().unwrap_or(0);
    }

    pub fn set_indication_of_treatment(&mut self, value: impl Into<String>) {
        self.treatment.indication_of_treatment = value.into();
    }

    // ── Derived values ──────────────────────────────────────

    /// Centers selectable for the chosen state, empty while unselected.
    /// "Other" is appended by presentation, not listed here.
    pub fn available_centers(&self) -> &'static [&'static str] {
        self.draft.center_state.map(|s| s.centers()).unwrap_or(&[])
    }

    pub fn selected_patient(&self) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == self.draft.patient_id)
    }

    pub fn selected_factor(&self) -> Option<&Factor> {
        self.factors.iter().find(|f| f.id == self.treatment.factor_id)
    }

    /// Factors offered by the dispensing picker: in-stock lots only.
    pub fn selectable_factors(&self) -> Vec<&Factor> {
        self.factors.iter().filter(|f| f.in_stock()).collect()
    }

    /// Upper bound for the quantity input, 0 while no factor is selected.
    pub fn quantity_bound(&self) -> i64 {
        self.selected_factor().map(|f| f.quantity).unwrap_or(0)
    }

    /// Submission is allowed only with a non-empty patient list and a
    /// resolved patient selection.
    pub fn can_submit(&self) -> bool {
        !self.patients.is_empty() && self.draft.patient_id > 0
    }
}

/// Reduce a stored timestamp to its `YYYY-MM-DD` calendar date. Unparseable
/// input yields an empty date, leaving the field blank for re-entry.
fn calendar_date_of(timestamp: &str) -> String {
    if let Ok(instant) = DateTime::parse_from_rfc3339(timestamp) {
        return instant.with_timezone(&Utc).date_naive().to_string();
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.date().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") {
        return date.to_string();
    }
    String::new()
}
