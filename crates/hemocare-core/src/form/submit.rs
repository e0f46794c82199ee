//! Visit submission.
//!
//! One submission fans out into up to three calls: the visit payload goes
//! to the caller-supplied sink; for center visits with a factor selected,
//! a treatment record is then created and the factor's stock is
//! decremented. The two secondary effects are best-effort: their failures
//! are logged and recorded in the outcome but never invalidate the visit,
//! which the sink already owns by then.

use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::gateway::{FactorsGateway, TreatmentsGateway, VisitSink};
use crate::models::{
    DiagnosisType, TreatmentRequest, VisitSubmission, VisitType, ON_DEMAND_TREATMENT,
};

use super::VisitForm;

/// Where the form is in its submission lifecycle. Re-entrant submits are
/// rejected in both non-idle states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    InFlight,
    Completed,
}

/// Result of a single submission step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Handed to the caller-supplied sink; its result is the owner's.
    Dispatched,
    /// The collaborator accepted the call.
    Completed,
    /// The collaborator rejected the call or transport failed.
    Failed { reason: String },
}

/// Per-step outcomes of one submission. `None` means the step did not
/// apply or was never reached (e.g. inventory after a failed treatment).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct SubmissionOutcome {
    pub visit: StepOutcome,
    pub treatment: Option<StepOutcome>,
    pub inventory: Option<StepOutcome>,
}

/// Reasons a submission is refused before anything is dispatched.
#[derive(Debug, Error, uniffi::Error)]
pub enum SubmitError {
    #[error("No patient is selected")]
    NoPatientSelected,

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("This form was already submitted")]
    AlreadySubmitted,

    #[error("Not a valid calendar date: {0}")]
    InvalidVisitDate(String),
}

impl VisitForm {
    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    /// Re-arm a completed form for another submission.
    pub fn reset_submission(&mut self) {
        self.submission = SubmissionState::Idle;
    }

    /// Notes as they will be persisted: for admissions with a follow-up
    /// date set, the formatted follow-up line is appended on its own line.
    pub fn effective_notes(&self) -> String {
        let notes = self.draft.notes.clone();
        if self.draft.diagnosis_type != DiagnosisType::Admission {
            return notes;
        }
        match follow_up_line(&self.follow_up_date) {
            Some(line) if notes.is_empty() => line,
            Some(line) => format!("{notes}\n{line}"),
            None => notes,
        }
    }

    /// Build the visit payload from the draft without dispatching it.
    pub fn submission_payload(&self) -> Result<VisitSubmission, SubmitError> {
        let visit_date = normalize_visit_date(&self.draft.visit_date)
            .ok_or_else(|| SubmitError::InvalidVisitDate(self.draft.visit_date.clone()))?;
        Ok(VisitSubmission {
            patient_id: self.draft.patient_id,
            visit_date,
            center_state: self
                .draft
                .center_state
                .map(|s| s.name().to_string())
                .unwrap_or_default(),
            center_name: self.draft.center_name.clone(),
            diagnosis_type: self.draft.diagnosis_type,
            complaint: self.draft.complaint.clone(),
            complaint_other: self.draft.complaint_other.clone(),
            complaint_details: self.draft.complaint_details.clone(),
            notes: self.effective_notes(),
            entered_by: self.draft.entered_by.clone(),
            visit_type: self.draft.visit_type,
            contact_relation: String::new(),
            other_medical_tests: Vec::new(),
        })
    }

    /// Run the submission sequence once.
    ///
    /// The visit payload is handed to `sink` and the visit is considered
    /// saved from that point on. The treatment/inventory steps run only
    /// for a center visit with a factor selected; their failures are
    /// recorded in the returned outcome, not raised.
    pub fn submit(
        &mut self,
        sink: &dyn VisitSink,
        treatments: &dyn TreatmentsGateway,
        inventory: &dyn FactorsGateway,
    ) -> Result<SubmissionOutcome, SubmitError> {
        match self.submission {
            SubmissionState::InFlight => return Err(SubmitError::SubmissionInFlight),
            SubmissionState::Completed => return Err(SubmitError::AlreadySubmitted),
            SubmissionState::Idle => {}
        }
        if !self.can_submit() {
            return Err(SubmitError::NoPatientSelected);
        }
        let payload = self.submission_payload()?;
        self.submission = SubmissionState::InFlight;

        sink.save(payload.clone());
        debug!(session = %self.session_id, patient = payload.patient_id, "visit dispatched to sink");

        let mut outcome = SubmissionOutcome {
            visit: StepOutcome::Dispatched,
            treatment: None,
            inventory: None,
        };

        if payload.visit_type == Some(VisitType::CenterVisit) && self.treatment.factor_id > 0 {
            self.dispense_factor(treatments, inventory, &payload.visit_date, &mut outcome);
        }

        self.submission = SubmissionState::Completed;
        Ok(outcome)
    }

    /// Create the on-demand treatment record, then decrement the lot's
    /// stock from the snapshot quantity.
    fn dispense_factor(
        &self,
        treatments: &dyn TreatmentsGateway,
        inventory: &dyn FactorsGateway,
        note_date: &str,
        outcome: &mut SubmissionOutcome,
    ) {
        let request = TreatmentRequest {
            patient_id: self.draft.patient_id,
            treatment_center: self.draft.center_name.clone(),
            treatment_type: ON_DEMAND_TREATMENT.to_string(),
            indication_of_treatment: self.treatment.indication_of_treatment.clone(),
            lot: self.treatment.lot.clone(),
            note_date: note_date.to_string(),
            quantity_lot: self.treatment.quantity_lot,
        };

        match treatments.create(request) {
            Ok(record) => {
                debug!(session = %self.session_id, treatment = record.id, "on-demand treatment created");
                outcome.treatment = Some(StepOutcome::Completed);
            }
            Err(err) => {
                warn!(session = %self.session_id, error = %err, "treatment creation failed; visit already dispatched");
                outcome.treatment = Some(StepOutcome::Failed {
                    reason: err.to_string(),
                });
                return;
            }
        }

        if self.treatment.quantity_lot <= 0 {
            return;
        }
        let Some(factor) = self.selected_factor().cloned() else {
            return;
        };

        let update = factor
            .update_payload()
            .with_decremented_quantity(self.treatment.quantity_lot);
        match inventory.update(factor.id, update) {
            Ok(()) => outcome.inventory = Some(StepOutcome::Completed),
            Err(err) => {
                warn!(session = %self.session_id, factor = factor.id, error = %err, "stock decrement failed after treatment creation");
                outcome.inventory = Some(StepOutcome::Failed {
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Expand a `YYYY-MM-DD` calendar date into an RFC 3339 timestamp at UTC
/// midnight, e.g. `2024-03-15` → `2024-03-15T00:00:00.000Z`.
pub(crate) fn normalize_visit_date(calendar: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(calendar, "%Y-%m-%d").ok()?;
    Some(
        date.and_time(NaiveTime::MIN)
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Format the follow-up notes line, e.g. `Follow-up Date: 3/15/2024`.
/// Unparseable dates produce no line.
fn follow_up_line(calendar: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(calendar, "%Y-%m-%d").ok()?;
    Some(format!("Follow-up Date: {}", date.format("%-m/%-d/%Y")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::gateway::GatewayError;
    use crate::models::{Factor, FactorUpdate, Patient, TreatmentRecord};

    struct RecordingSink {
        saved: Mutex<Vec<VisitSubmission>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> VisitSubmission {
            self.saved.lock().unwrap().last().unwrap().clone()
        }

        fn count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }
    }

    impl VisitSink for RecordingSink {
        fn save(&self, payload: VisitSubmission) {
            self.saved.lock().unwrap().push(payload);
        }
    }

    struct MockTreatments {
        fail: bool,
        created: Mutex<Vec<TreatmentRequest>>,
    }

    impl MockTreatments {
        fn new() -> Self {
            Self {
                fail: false,
                created: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                created: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> TreatmentRequest {
            self.created.lock().unwrap().last().unwrap().clone()
        }

        fn count(&self) -> usize {
            self.created.lock().unwrap().len()
        }
    }

    impl TreatmentsGateway for MockTreatments {
        fn create(&self, request: TreatmentRequest) -> Result<TreatmentRecord, GatewayError> {
            if self.fail {
                return Err(GatewayError::Rejected {
                    status: 422,
                    detail: "rejected".into(),
                });
            }
            self.created.lock().unwrap().push(request.clone());
            Ok(TreatmentRecord {
                id: 77,
                patient_id: request.patient_id,
                treatment_center: request.treatment_center,
                treatment_type: request.treatment_type,
                indication_of_treatment: request.indication_of_treatment,
                lot: request.lot,
                note_date: request.note_date,
                quantity_lot: request.quantity_lot,
                created_at: "2024-03-15T00:00:01.000Z".into(),
            })
        }
    }

    struct MockFactors {
        fail: bool,
        updates: Mutex<Vec<(i64, FactorUpdate)>>,
    }

    impl MockFactors {
        fn new() -> Self {
            Self {
                fail: false,
                updates: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                updates: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> (i64, FactorUpdate) {
            self.updates.lock().unwrap().last().unwrap().clone()
        }

        fn count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }
    }

    impl FactorsGateway for MockFactors {
        fn update(&self, id: i64, factor: FactorUpdate) -> Result<(), GatewayError> {
            if self.fail {
                return Err(GatewayError::Transport("connection reset".into()));
            }
            self.updates.lock().unwrap().push((id, factor));
            Ok(())
        }
    }

    fn sample_factor() -> Factor {
        Factor {
            id: 7,
            name: "Octanate".into(),
            lot_no: "LOT-4421".into(),
            quantity: 10,
            expiry_date: "2027-01-31".into(),
            mg: 500,
            drug_type: "Factor VIII".into(),
            supplier_name: "NMSF".into(),
            company_name: "Octapharma".into(),
        }
    }

    fn ready_form() -> VisitForm {
        let mut form = VisitForm::new(
            vec![Patient::new(3, "Amna Hassan", "199-4471")],
            vec![sample_factor()],
        );
        form.select_patient(3);
        form.set_visit_date("2024-03-15");
        form.set_center_state(Some(crate::centers::CenterState::Khartoum));
        form.set_center_name("Khartoum Teaching Hospital");
        form.set_entered_by("Dr. Salma");
        form
    }

    #[test]
    fn test_effective_notes_appends_follow_up_for_admission() {
        let mut form = ready_form();
        form.set_diagnosis_type(DiagnosisType::Admission);
        form.set_notes("prior note");
        form.set_follow_up_date("2024-03-15");
        assert_eq!(form.effective_notes(), "prior note\nFollow-up Date: 3/15/2024");
    }

    #[test]
    fn test_effective_notes_alone_when_notes_empty() {
        let mut form = ready_form();
        form.set_diagnosis_type(DiagnosisType::Admission);
        form.set_follow_up_date("2024-12-01");
        assert_eq!(form.effective_notes(), "Follow-up Date: 12/1/2024");
    }

    #[test]
    fn test_effective_notes_untouched_for_other_diagnoses() {
        let mut form = ready_form();
        form.set_notes("prior note");
        form.set_follow_up_date("2024-03-15");
        assert_eq!(form.effective_notes(), "prior note");
    }

    #[test]
    fn test_payload_normalizes_date_and_omits_visit_type() {
        let form = ready_form();
        let payload = form.submission_payload().unwrap();
        assert_eq!(payload.visit_date, "2024-03-15T00:00:00.000Z");
        assert_eq!(payload.center_state, "Khartoum");
        assert_eq!(payload.visit_type, None);
    }

    #[test]
    fn test_payload_rejects_invalid_date() {
        let mut form = ready_form();
        form.set_visit_date("15/03/2024");
        assert!(matches!(
            form.submission_payload(),
            Err(SubmitError::InvalidVisitDate(_))
        ));
    }

    #[test]
    fn test_submit_without_patient_is_refused() {
        let mut form = VisitForm::new(vec![Patient::new(1, "A", "1")], Vec::new());
        form.set_visit_date("2024-03-15");
        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::new());
        assert!(matches!(
            form.submit(&sink, &treatments, &factors),
            Err(SubmitError::NoPatientSelected)
        ));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_plain_submit_dispatches_visit_only() {
        let mut form = ready_form();
        form.set_visit_type(Some(VisitType::TelephoneConsultation));
        form.select_factor(7);
        form.set_quantity_lot(3);

        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::new());
        let outcome = form.submit(&sink, &treatments, &factors).unwrap();

        assert_eq!(outcome.visit, StepOutcome::Dispatched);
        assert_eq!(outcome.treatment, None);
        assert_eq!(outcome.inventory, None);
        assert_eq!(sink.count(), 1);
        assert_eq!(treatments.count(), 0);
        assert_eq!(sink.last().visit_type, Some(VisitType::TelephoneConsultation));
    }

    #[test]
    fn test_center_visit_dispenses_and_decrements() {
        let mut form = ready_form();
        form.set_visit_type(Some(VisitType::CenterVisit));
        form.select_factor(7);
        form.set_quantity_lot(3);
        form.set_indication_of_treatment("Joint bleed");

        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::new());
        let outcome = form.submit(&sink, &treatments, &factors).unwrap();

        assert_eq!(outcome.treatment, Some(StepOutcome::Completed));
        assert_eq!(outcome.inventory, Some(StepOutcome::Completed));

        let request = treatments.last();
        assert_eq!(request.patient_id, 3);
        assert_eq!(request.treatment_center, "Khartoum Teaching Hospital");
        assert_eq!(request.treatment_type, "On-demand");
        assert_eq!(request.lot, "LOT-4421");
        assert_eq!(request.note_date, "2024-03-15T00:00:00.000Z");
        assert_eq!(request.quantity_lot, 3);

        let (factor_id, update) = factors.last();
        assert_eq!(factor_id, 7);
        assert_eq!(update.quantity, 7);
        assert_eq!(update.lot_no, "LOT-4421");
        assert_eq!(update.mg, 500);
    }

    #[test]
    fn test_overdraw_clamps_stock_at_zero() {
        let mut form = ready_form();
        form.set_visit_type(Some(VisitType::CenterVisit));
        form.select_factor(7);
        form.set_quantity_lot(25);

        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::new());
        form.submit(&sink, &treatments, &factors).unwrap();

        let (_, update) = factors.last();
        assert_eq!(update.quantity, 0);
    }

    #[test]
    fn test_no_factor_selected_skips_dispensing() {
        let mut form = ready_form();
        form.set_visit_type(Some(VisitType::CenterVisit));

        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::new());
        let outcome = form.submit(&sink, &treatments, &factors).unwrap();

        assert_eq!(outcome.treatment, None);
        assert_eq!(treatments.count(), 0);
        assert_eq!(factors.count(), 0);
    }

    #[test]
    fn test_zero_quantity_creates_treatment_but_skips_decrement() {
        let mut form = ready_form();
        form.set_visit_type(Some(VisitType::CenterVisit));
        form.select_factor(7);

        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::new());
        let outcome = form.submit(&sink, &treatments, &factors).unwrap();

        assert_eq!(outcome.treatment, Some(StepOutcome::Completed));
        assert_eq!(outcome.inventory, None);
        assert_eq!(factors.count(), 0);
    }

    #[test]
    fn test_treatment_failure_is_swallowed_and_recorded() {
        let mut form = ready_form();
        form.set_visit_type(Some(VisitType::CenterVisit));
        form.select_factor(7);
        form.set_quantity_lot(3);

        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::failing(), MockFactors::new());
        let outcome = form.submit(&sink, &treatments, &factors).unwrap();

        assert_eq!(sink.count(), 1);
        assert!(matches!(outcome.treatment, Some(StepOutcome::Failed { .. })));
        assert_eq!(outcome.inventory, None);
        assert_eq!(factors.count(), 0);
    }

    #[test]
    fn test_inventory_failure_is_swallowed_and_recorded() {
        let mut form = ready_form();
        form.set_visit_type(Some(VisitType::CenterVisit));
        form.select_factor(7);
        form.set_quantity_lot(3);

        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::failing());
        let outcome = form.submit(&sink, &treatments, &factors).unwrap();

        assert_eq!(outcome.treatment, Some(StepOutcome::Completed));
        assert!(matches!(outcome.inventory, Some(StepOutcome::Failed { .. })));
    }

    #[test]
    fn test_double_submit_is_rejected_until_reset() {
        let mut form = ready_form();
        let (sink, treatments, factors) = (RecordingSink::new(), MockTreatments::new(), MockFactors::new());

        form.submit(&sink, &treatments, &factors).unwrap();
        assert_eq!(form.submission_state(), SubmissionState::Completed);
        assert!(matches!(
            form.submit(&sink, &treatments, &factors),
            Err(SubmitError::AlreadySubmitted)
        ));
        assert_eq!(sink.count(), 1);

        form.reset_submission();
        form.submit(&sink, &treatments, &factors).unwrap();
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn test_normalize_visit_date() {
        assert_eq!(
            normalize_visit_date("2024-03-15").as_deref(),
            Some("2024-03-15T00:00:00.000Z")
        );
        assert_eq!(normalize_visit_date(""), None);
        assert_eq!(normalize_visit_date("2024-13-40"), None);
    }

    #[test]
    fn test_follow_up_line_strips_leading_zeros() {
        assert_eq!(
            follow_up_line("2024-03-05").as_deref(),
            Some("Follow-up Date: 3/5/2024")
        );
        assert_eq!(follow_up_line("soon"), None);
    }
}
