//! Patient search and selection for the visit form.

use crate::models::Patient;

use super::VisitForm;

/// Case-insensitive substring match against the patient's name, national
/// id, or combined label.
pub(crate) fn matches_query(patient: &Patient, query: &str) -> bool {
    let query = query.to_lowercase();
    patient.full_name.to_lowercase().contains(&query)
        || patient.national_id_number.to_lowercase().contains(&query)
        || patient.label().to_lowercase().contains(&query)
}

impl VisitForm {
    /// Update the search text. Typing opens the dropdown; clearing the
    /// text also clears the patient selection.
    pub fn set_patient_search(&mut self, text: impl Into<String>) {
        self.patient_search = text.into();
        self.dropdown_open = true;
        if self.patient_search.is_empty() {
            self.draft.patient_id = 0;
        }
    }

    pub fn patient_search(&self) -> &str {
        &self.patient_search
    }

    /// Patients matching the current search text; all of them while the
    /// text is empty.
    pub fn filtered_patients(&self) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| matches_query(p, &self.patient_search))
            .collect()
    }

    /// Select a patient from the dropdown. Sets the draft's patient id,
    /// replaces the search text with the canonical label and closes the
    /// dropdown. Returns `false` when the id is not in the snapshot.
    pub fn select_patient(&mut self, patient_id: i64) -> bool {
        let Some(patient) = self.patients.iter().find(|p| p.id == patient_id) else {
            return false;
        };
        self.draft.patient_id = patient.id;
        self.patient_search = patient.label();
        self.dropdown_open = false;
        true
    }

    /// Host calls this when the search input gains focus.
    pub fn open_dropdown(&mut self) {
        self.dropdown_open = true;
    }

    /// Host calls this (usually via the pointer bus) when a pointer-down
    /// lands outside the search control.
    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }
}
