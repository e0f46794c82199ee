//! Hemocare Core Library
//!
//! Visit entry core for a hemophilia treatment network's clinical
//! data-management app.
//!
//! # Architecture
//!
//! ```text
//! Host UI events → VisitForm (drafts, search, derived values)
//!                        │
//!                   submit()
//!                        │
//!        ┌───────────────┼──────────────────────┐
//!        ▼               ▼                      ▼
//!    VisitSink     TreatmentsGateway      FactorsGateway
//!  (visit save)   (on-demand record)    (stock decrement)
//!        │               └── best-effort ──────┘
//!        └── caller-owned persistence
//! ```
//!
//! # Core Principle
//!
//! **The visit save is primary.** Treatment creation and the stock
//! decrement are best-effort secondary effects: their failures are logged
//! and reported in the submission outcome, never raised against the visit.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Factor, VisitRecord, etc.)
//! - [`centers`]: State/center vocabulary and the complaint list
//! - [`form`]: The visit form controller and submission sequence
//! - [`gateway`]: Collaborator seams supplied by the host or HTTP clients
//! - [`dismiss`]: Scoped outside-click dismissal for the search dropdown

pub mod centers;
pub mod dismiss;
pub mod form;
pub mod gateway;
pub mod models;

// Re-export commonly used types
pub use centers::{CenterState, COMPLAINT_OPTIONS, OTHER_CENTER};
pub use dismiss::{DismissScope, PointerBus};
pub use form::{
    StepOutcome, SubmissionOutcome, SubmissionState, SubmitError, TreatmentDraft, VisitDraft,
    VisitForm,
};
pub use gateway::{FactorsGateway, GatewayError, TreatmentsGateway, VisitSink};
pub use models::{
    DiagnosisType, Factor, FactorUpdate, MedicalTest, Patient, TreatmentRecord, TreatmentRequest,
    VisitRecord, VisitSubmission, VisitType, ON_DEMAND_TREATMENT,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HemocareError {
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Submission refused: {0}")]
    Submission(String),
}

impl<T> From<std::sync::PoisonError<T>> for HemocareError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HemocareError::LockPoisoned(e.to_string())
    }
}

impl From<SubmitError> for HemocareError {
    fn from(e: SubmitError) -> Self {
        HemocareError::Submission(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Begin a blank visit entry session over the caller's snapshots.
#[uniffi::export]
pub fn begin_visit_entry(
    patients: Vec<Patient>,
    factors: Vec<Factor>,
    sink: Box<dyn VisitSink>,
    treatments: Box<dyn TreatmentsGateway>,
    inventory: Box<dyn FactorsGateway>,
) -> Arc<VisitEntry> {
    VisitEntry::create(VisitForm::new(patients, factors), sink, treatments, inventory)
}

/// Begin an edit session pre-filled from an existing visit record.
#[uniffi::export]
pub fn begin_visit_edit(
    record: VisitRecord,
    patients: Vec<Patient>,
    factors: Vec<Factor>,
    sink: Box<dyn VisitSink>,
    treatments: Box<dyn TreatmentsGateway>,
    inventory: Box<dyn FactorsGateway>,
) -> Arc<VisitEntry> {
    VisitEntry::create(
        VisitForm::for_record(&record, patients, factors),
        sink,
        treatments,
        inventory,
    )
}

/// States offered by the center-state selector, in presentation order.
#[uniffi::export]
pub fn center_states() -> Vec<CenterState> {
    CenterState::ALL.to_vec()
}

/// Complaints offered by the complaint selector.
#[uniffi::export]
pub fn complaint_options() -> Vec<String> {
    COMPLAINT_OPTIONS.iter().map(|c| c.to_string()).collect()
}

// =========================================================================
// Main API Object
// =========================================================================

/// One visit entry session, safe to drive from the host's event callbacks.
///
/// Wraps the form in a mutex and owns the injected collaborators plus the
/// dropdown-dismiss subscription, which is torn down with the session.
#[derive(uniffi::Object)]
pub struct VisitEntry {
    form: Arc<Mutex<VisitForm>>,
    sink: Box<dyn VisitSink>,
    treatments: Box<dyn TreatmentsGateway>,
    inventory: Box<dyn FactorsGateway>,
    bus: Arc<PointerBus>,
    _dismiss: DismissScope,
}

impl VisitEntry {
    fn create(
        form: VisitForm,
        sink: Box<dyn VisitSink>,
        treatments: Box<dyn TreatmentsGateway>,
        inventory: Box<dyn FactorsGateway>,
    ) -> Arc<Self> {
        let form = Arc::new(Mutex::new(form));
        let bus = PointerBus::new();
        let dismiss = {
            let form = Arc::clone(&form);
            bus.subscribe(Arc::new(move |inside_search| {
                if !inside_search {
                    if let Ok(mut form) = form.lock() {
                        form.close_dropdown();
                    }
                }
            }))
        };
        Arc::new(Self {
            form,
            sink,
            treatments,
            inventory,
            bus,
            _dismiss: dismiss,
        })
    }
}

#[uniffi::export]
impl VisitEntry {
    // =========================================================================
    // Visit Fields
    // =========================================================================

    pub fn set_visit_date(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_visit_date(value);
        Ok(())
    }

    /// Assigns the state and resets the dependent center name.
    pub fn set_center_state(&self, state: Option<CenterState>) -> Result<(), HemocareError> {
        self.form.lock()?.set_center_state(state);
        Ok(())
    }

    pub fn set_center_name(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_center_name(value);
        Ok(())
    }

    pub fn set_visit_type(&self, visit_type: Option<VisitType>) -> Result<(), HemocareError> {
        self.form.lock()?.set_visit_type(visit_type);
        Ok(())
    }

    pub fn set_diagnosis_type(&self, diagnosis_type: DiagnosisType) -> Result<(), HemocareError> {
        self.form.lock()?.set_diagnosis_type(diagnosis_type);
        Ok(())
    }

    pub fn set_complaint(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_complaint(value);
        Ok(())
    }

    pub fn set_complaint_other(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_complaint_other(value);
        Ok(())
    }

    pub fn set_complaint_details(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_complaint_details(value);
        Ok(())
    }

    pub fn set_notes(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_notes(value);
        Ok(())
    }

    pub fn set_entered_by(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_entered_by(value);
        Ok(())
    }

    pub fn set_follow_up_date(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_follow_up_date(value);
        Ok(())
    }

    // =========================================================================
    // Patient Search
    // =========================================================================

    pub fn set_patient_search(&self, text: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_patient_search(text);
        Ok(())
    }

    pub fn patient_search(&self) -> Result<String, HemocareError> {
        Ok(self.form.lock()?.patient_search().to_string())
    }

    pub fn filtered_patients(&self) -> Result<Vec<Patient>, HemocareError> {
        Ok(self
            .form
            .lock()?
            .filtered_patients()
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn select_patient(&self, patient_id: i64) -> Result<bool, HemocareError> {
        Ok(self.form.lock()?.select_patient(patient_id))
    }

    pub fn selected_patient(&self) -> Result<Option<Patient>, HemocareError> {
        Ok(self.form.lock()?.selected_patient().cloned())
    }

    pub fn open_dropdown(&self) -> Result<(), HemocareError> {
        self.form.lock()?.open_dropdown();
        Ok(())
    }

    pub fn dropdown_open(&self) -> Result<bool, HemocareError> {
        Ok(self.form.lock()?.dropdown_open())
    }

    /// Forward a global pointer-down with the host's hit test against the
    /// search control. Outside clicks close the dropdown.
    pub fn pointer_down(&self, inside_search: bool) {
        self.bus.pointer_down(inside_search);
    }

    // =========================================================================
    // Treatment Fields
    // =========================================================================

    /// Select the factor to dispense; 0 clears the selection.
    pub fn select_factor(&self, factor_id: i64) -> Result<(), HemocareError> {
        self.form.lock()?.select_factor(factor_id);
        Ok(())
    }

    pub fn set_quantity_lot(&self, units: i64) -> Result<(), HemocareError> {
        self.form.lock()?.set_quantity_lot(units);
        Ok(())
    }

    /// Numeric-input coercion: empty or unparseable input becomes 0.
    pub fn set_quantity_lot_input(&self, raw: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_quantity_lot_input(&raw);
        Ok(())
    }

    pub fn set_indication_of_treatment(&self, value: String) -> Result<(), HemocareError> {
        self.form.lock()?.set_indication_of_treatment(value);
        Ok(())
    }

    pub fn selectable_factors(&self) -> Result<Vec<Factor>, HemocareError> {
        Ok(self
            .form
            .lock()?
            .selectable_factors()
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn quantity_bound(&self) -> Result<i64, HemocareError> {
        Ok(self.form.lock()?.quantity_bound())
    }

    // =========================================================================
    // Derived State
    // =========================================================================

    pub fn draft(&self) -> Result<VisitDraft, HemocareError> {
        Ok(self.form.lock()?.draft().clone())
    }

    pub fn treatment_draft(&self) -> Result<TreatmentDraft, HemocareError> {
        Ok(self.form.lock()?.treatment().clone())
    }

    pub fn follow_up_date(&self) -> Result<String, HemocareError> {
        Ok(self.form.lock()?.follow_up_date().to_string())
    }

    pub fn available_centers(&self) -> Result<Vec<String>, HemocareError> {
        Ok(self
            .form
            .lock()?
            .available_centers()
            .iter()
            .map(|c| c.to_string())
            .collect())
    }

    pub fn can_submit(&self) -> Result<bool, HemocareError> {
        Ok(self.form.lock()?.can_submit())
    }

    pub fn is_editing(&self) -> Result<bool, HemocareError> {
        Ok(self.form.lock()?.is_editing())
    }

    pub fn submission_state(&self) -> Result<SubmissionState, HemocareError> {
        Ok(self.form.lock()?.submission_state())
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Run the submission sequence once. See [`VisitForm::submit`].
    pub fn submit(&self) -> Result<SubmissionOutcome, HemocareError> {
        let mut form = self.form.lock()?;
        Ok(form.submit(
            self.sink.as_ref(),
            self.treatments.as_ref(),
            self.inventory.as_ref(),
        )?)
    }

    /// Re-arm a completed session for another submission.
    pub fn reset_submission(&self) -> Result<(), HemocareError> {
        self.form.lock()?.reset_submission();
        Ok(())
    }
}
