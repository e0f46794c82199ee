//! Wire-shape translation for visit records.
//!
//! The backend is not consistent about field-name conventions: the same
//! logical field can arrive as `PatientId`, `patient_id` or `patientId`
//! depending on which handler produced it. Reads resolve each field by
//! trying the conventions in that fixed priority order, treating null and
//! empty strings as absent. Writes are not symmetric: they always emit
//! PascalCase with explicit empty-string defaults.

use serde_json::{json, Map, Value};

use hemocare_core::{DiagnosisType, VisitRecord, VisitSubmission, VisitType};

/// Resolve the first present value among `keys`, in priority order.
fn pick<'a>(raw: &'a Value, keys: [&str; 3]) -> Option<&'a Value> {
    keys.iter().find_map(|key| match raw.get(*key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value),
    })
}

fn pick_str(raw: &Value, keys: [&str; 3]) -> String {
    pick(raw, keys)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn pick_i64(raw: &Value, keys: [&str; 3]) -> i64 {
    pick(raw, keys).and_then(Value::as_i64).unwrap_or(0)
}

fn pick_dates(raw: &Value, keys: [&str; 3]) -> Vec<String> {
    pick(raw, keys)
        .and_then(Value::as_array)
        .map(|dates| {
            dates
                .iter()
                .filter_map(|d| d.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Fold a raw backend object into the canonical visit record.
pub fn normalize(raw: &Value) -> VisitRecord {
    VisitRecord {
        id: pick_i64(raw, ["Id", "id", "id"]),
        patient_id: pick_i64(raw, ["PatientId", "patient_id", "patientId"]),
        visit_date: pick_str(raw, ["VisitDate", "visit_date", "visitDate"]),
        center_state: pick_str(raw, ["CenterState", "center_state", "centerState"]),
        center_name: pick_str(raw, ["CenterName", "center_name", "centerName"]),
        visit_type: VisitType::parse(&pick_str(raw, ["VisitType", "visit_type", "visitType"])),
        diagnosis_type: DiagnosisType::parse(&pick_str(
            raw,
            ["DiagnosisType", "diagnosis_type", "diagnosisType"],
        )),
        complaint: pick_str(raw, ["Complaint", "complaint", "complaint"]),
        complaint_other: pick_str(raw, ["ComplaintOther", "complaint_other", "complaintOther"]),
        complaint_details: pick_str(
            raw,
            ["ComplaintDetails", "complaint_details", "complaintDetails"],
        ),
        notes: pick_str(raw, ["Notes", "notes", "notes"]),
        entered_by: pick_str(raw, ["EnteredBy", "entered_by", "enteredBy"]),
        factor_level_test_dates: pick_dates(
            raw,
            [
                "FactorLevelTestDates",
                "factor_level_test_dates",
                "factorLevelTestDates",
            ],
        ),
        inhibitor_screening_dates: pick_dates(
            raw,
            [
                "InhibitorScreeningDates",
                "inhibitor_screening_dates",
                "inhibitorScreeningDates",
            ],
        ),
        viral_screening_dates: pick_dates(
            raw,
            [
                "ViralScreeningDates",
                "viral_screening_dates",
                "viralScreeningDates",
            ],
        ),
        other_test_dates: pick_dates(raw, ["OtherTestDates", "other_test_dates", "otherTestDates"]),
        hbsag_screen_dates: pick_dates(
            raw,
            ["HbsagScreenDates", "hbsag_screen_dates", "hbsagScreenDates"],
        ),
        created_at: pick_str(raw, ["CreatedAt", "created_at", "createdAt"]),
    }
}

/// Emit the backend's expected PascalCase shape for create/update.
///
/// `VisitType` is present only when set; `OtherMedicalTests` only when
/// non-empty. Every optional text field is emitted as an explicit empty
/// string.
pub fn to_wire(visit: &VisitSubmission) -> Value {
    let mut wire = Map::new();
    wire.insert("PatientId".into(), json!(visit.patient_id));
    wire.insert("VisitDate".into(), json!(visit.visit_date));
    wire.insert("DiagnosisType".into(), json!(visit.diagnosis_type.as_str()));
    wire.insert("ContactRelation".into(), json!(visit.contact_relation));
    wire.insert("CenterState".into(), json!(visit.center_state));
    wire.insert("CenterName".into(), json!(visit.center_name));
    wire.insert("Complaint".into(), json!(visit.complaint));
    wire.insert("ComplaintOther".into(), json!(visit.complaint_other));
    wire.insert("ComplaintDetails".into(), json!(visit.complaint_details));
    wire.insert("Notes".into(), json!(visit.notes));
    wire.insert("EnteredBy".into(), json!(visit.entered_by));

    if let Some(visit_type) = visit.visit_type {
        wire.insert("VisitType".into(), json!(visit_type.as_str()));
    }

    if !visit.other_medical_tests.is_empty() {
        let tests: Vec<Value> = visit
            .other_medical_tests
            .iter()
            .map(|test| {
                json!({
                    "TestName": test.test_name,
                    "TestResult": test.test_result,
                    "TestDate": test.test_date,
                })
            })
            .collect();
        wire.insert("OtherMedicalTests".into(), Value::Array(tests));
    }

    Value::Object(wire)
}

/// Normalize a list response. Anything that is not an array degrades to an
/// empty list instead of raising.
pub fn visit_list(raw: &Value) -> Vec<VisitRecord> {
    match raw.as_array() {
        Some(items) => items.iter().map(normalize).collect(),
        None => Vec::new(),
    }
}
