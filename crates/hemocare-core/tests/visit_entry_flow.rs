//! End-to-end tests for the visit entry session.
//!
//! Drives the FFI session object the way a host UI would: field edits,
//! patient search, dropdown dismissal and submission, with recording
//! collaborators standing in for the backend.

use std::sync::{Arc, Mutex};

use hemocare_core::{
    begin_visit_edit, begin_visit_entry, CenterState, DiagnosisType, Factor, FactorUpdate,
    FactorsGateway, GatewayError, Patient, StepOutcome, TreatmentRecord, TreatmentRequest,
    TreatmentsGateway, VisitRecord, VisitSink, VisitSubmission, VisitType,
};

#[derive(Default)]
struct Recorder {
    visits: Mutex<Vec<VisitSubmission>>,
    treatments: Mutex<Vec<TreatmentRequest>>,
    updates: Mutex<Vec<(i64, FactorUpdate)>>,
}

struct SinkHandle(Arc<Recorder>);

impl VisitSink for SinkHandle {
    fn save(&self, payload: VisitSubmission) {
        self.0.visits.lock().unwrap().push(payload);
    }
}

struct TreatmentsHandle(Arc<Recorder>);

impl TreatmentsGateway for TreatmentsHandle {
    fn create(&self, request: TreatmentRequest) -> Result<TreatmentRecord, GatewayError> {
        self.0.treatments.lock().unwrap().push(request.clone());
        Ok(TreatmentRecord {
            id: 501,
            patient_id: request.patient_id,
            treatment_center: request.treatment_center,
            treatment_type: request.treatment_type,
            indication_of_treatment: request.indication_of_treatment,
            lot: request.lot,
            note_date: request.note_date,
            quantity_lot: request.quantity_lot,
            created_at: "2024-03-15T08:00:00.000Z".into(),
        })
    }
}

struct FactorsHandle(Arc<Recorder>);

impl FactorsGateway for FactorsHandle {
    fn update(&self, id: i64, factor: FactorUpdate) -> Result<(), GatewayError> {
        self.0.updates.lock().unwrap().push((id, factor));
        Ok(())
    }
}

fn patients() -> Vec<Patient> {
    vec![
        Patient::new(1, "Amna Hassan", "199-4471"),
        Patient::new(2, "Omer Ali", "310-0021"),
    ]
}

fn factors() -> Vec<Factor> {
    vec![Factor {
        id: 7,
        name: "Octanate".into(),
        lot_no: "LOT-4421".into(),
        quantity: 10,
        expiry_date: "2027-01-31".into(),
        mg: 500,
        drug_type: "Factor VIII".into(),
        supplier_name: "NMSF".into(),
        company_name: "Octapharma".into(),
    }]
}

fn new_session(recorder: &Arc<Recorder>) -> Arc<hemocare_core::VisitEntry> {
    begin_visit_entry(
        patients(),
        factors(),
        Box::new(SinkHandle(Arc::clone(recorder))),
        Box::new(TreatmentsHandle(Arc::clone(recorder))),
        Box::new(FactorsHandle(Arc::clone(recorder))),
    )
}

/// Expected payload per form configuration.
struct GoldenCase {
    id: &'static str,
    diagnosis: DiagnosisType,
    follow_up_date: &'static str,
    notes: &'static str,
    visit_type: Option<VisitType>,
    expected_notes: &'static str,
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "followup-no-extras",
            diagnosis: DiagnosisType::Followup,
            follow_up_date: "",
            notes: "stable",
            visit_type: Some(VisitType::TelephoneConsultation),
            expected_notes: "stable",
        },
        GoldenCase {
            id: "admission-appends-follow-up",
            diagnosis: DiagnosisType::Admission,
            follow_up_date: "2024-03-15",
            notes: "prior note",
            visit_type: Some(VisitType::CenterVisit),
            expected_notes: "prior note\nFollow-up Date: 3/15/2024",
        },
        GoldenCase {
            id: "admission-follow-up-alone",
            diagnosis: DiagnosisType::Admission,
            follow_up_date: "2024-11-03",
            notes: "",
            visit_type: None,
            expected_notes: "Follow-up Date: 11/3/2024",
        },
        GoldenCase {
            id: "follow-up-date-ignored-outside-admission",
            diagnosis: DiagnosisType::NewPatient,
            follow_up_date: "2024-03-15",
            notes: "first contact",
            visit_type: None,
            expected_notes: "first contact",
        },
    ]
}

#[test]
fn test_golden_submission_payloads() -> anyhow::Result<()> {
    for case in golden_cases() {
        let recorder = Arc::new(Recorder::default());
        let session = new_session(&recorder);

        session.set_patient_search("Amna".into())?;
        assert!(session.select_patient(1)?, "case {}", case.id);
        session.set_visit_date("2024-03-15".into())?;
        session.set_diagnosis_type(case.diagnosis)?;
        session.set_follow_up_date(case.follow_up_date.into())?;
        session.set_notes(case.notes.into())?;
        session.set_visit_type(case.visit_type)?;

        session.submit()?;

        let visits = recorder.visits.lock().unwrap();
        assert_eq!(visits.len(), 1, "case {}", case.id);
        let payload = &visits[0];
        assert_eq!(payload.patient_id, 1, "case {}", case.id);
        assert_eq!(payload.visit_date, "2024-03-15T00:00:00.000Z", "case {}", case.id);
        assert_eq!(payload.notes, case.expected_notes, "case {}", case.id);
        assert_eq!(payload.visit_type, case.visit_type, "case {}", case.id);
    }
    Ok(())
}

#[test]
fn test_center_visit_dispenses_and_decrements() -> anyhow::Result<()> {
    let recorder = Arc::new(Recorder::default());
    let session = new_session(&recorder);

    session.select_patient(2)?;
    session.set_visit_date("2024-06-01".into())?;
    session.set_center_state(Some(CenterState::Khartoum))?;
    session.set_center_name("Omdurman Hospital".into())?;
    session.set_visit_type(Some(VisitType::CenterVisit))?;
    session.select_factor(7)?;
    session.set_quantity_lot_input("3".into())?;
    session.set_indication_of_treatment("Joint bleed".into())?;

    let outcome = session.submit()?;
    assert_eq!(outcome.visit, StepOutcome::Dispatched);
    assert_eq!(outcome.treatment, Some(StepOutcome::Completed));
    assert_eq!(outcome.inventory, Some(StepOutcome::Completed));

    let treatments = recorder.treatments.lock().unwrap();
    assert_eq!(treatments.len(), 1);
    assert_eq!(treatments[0].treatment_center, "Omdurman Hospital");
    assert_eq!(treatments[0].treatment_type, "On-demand");
    assert_eq!(treatments[0].note_date, "2024-06-01T00:00:00.000Z");

    let updates = recorder.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    let (factor_id, update) = &updates[0];
    assert_eq!(*factor_id, 7);
    assert_eq!(update.quantity, 7);
    assert_eq!(update.company_name, "Octapharma");
    Ok(())
}

#[test]
fn test_edit_session_prefills_from_record() -> anyhow::Result<()> {
    let record = VisitRecord {
        id: 42,
        patient_id: 2,
        visit_date: "2024-03-15T00:00:00.000Z".into(),
        center_state: "Red Sea".into(),
        center_name: "Port Sudan Teaching Hospital".into(),
        visit_type: Some(VisitType::CenterVisit),
        diagnosis_type: Some(DiagnosisType::Admission),
        complaint: "Epistaxis".into(),
        complaint_other: String::new(),
        complaint_details: String::new(),
        notes: "Seen before".into(),
        entered_by: "Dr. Salma".into(),
        factor_level_test_dates: Vec::new(),
        inhibitor_screening_dates: Vec::new(),
        viral_screening_dates: Vec::new(),
        other_test_dates: Vec::new(),
        hbsag_screen_dates: Vec::new(),
        created_at: "2024-03-15T09:12:44Z".into(),
    };

    let recorder = Arc::new(Recorder::default());
    let session = begin_visit_edit(
        record,
        patients(),
        factors(),
        Box::new(SinkHandle(Arc::clone(&recorder))),
        Box::new(TreatmentsHandle(Arc::clone(&recorder))),
        Box::new(FactorsHandle(Arc::clone(&recorder))),
    );

    assert!(session.is_editing()?);
    assert_eq!(session.patient_search()?, "Omer Ali - 310-0021");
    let draft = session.draft()?;
    assert_eq!(draft.visit_date, "2024-03-15");
    assert_eq!(draft.center_state, Some(CenterState::RedSea));
    assert_eq!(draft.diagnosis_type, DiagnosisType::Admission);
    assert_eq!(
        session.available_centers()?,
        vec!["Port Sudan Teaching Hospital".to_string()]
    );
    Ok(())
}

#[test]
fn test_outside_click_closes_dropdown() -> anyhow::Result<()> {
    let recorder = Arc::new(Recorder::default());
    let session = new_session(&recorder);

    session.set_patient_search("Om".into())?;
    assert!(session.dropdown_open()?);

    session.pointer_down(true);
    assert!(session.dropdown_open()?);

    session.pointer_down(false);
    assert!(!session.dropdown_open()?);
    Ok(())
}

#[test]
fn test_double_submit_is_refused() -> anyhow::Result<()> {
    let recorder = Arc::new(Recorder::default());
    let session = new_session(&recorder);

    session.select_patient(1)?;
    session.set_visit_date("2024-03-15".into())?;
    session.submit()?;
    assert!(session.submit().is_err());
    assert_eq!(recorder.visits.lock().unwrap().len(), 1);

    session.reset_submission()?;
    session.submit()?;
    assert_eq!(recorder.visits.lock().unwrap().len(), 2);
    Ok(())
}
