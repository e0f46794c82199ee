//! On-demand treatment models.

use serde::{Deserialize, Serialize};

/// Treatment type recorded for factor dispensed during a center visit.
pub const ON_DEMAND_TREATMENT: &str = "On-demand";

/// Request to create a treatment record alongside a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRequest {
    pub patient_id: i64,
    /// Center the factor was dispensed at (the visit's center name)
    pub treatment_center: String,
    /// Always [`ON_DEMAND_TREATMENT`] when created from the visit form
    pub treatment_type: String,
    pub indication_of_treatment: String,
    /// Lot number of the dispensed factor
    pub lot: String,
    /// RFC 3339 timestamp, the visit's normalized date
    pub note_date: String,
    /// Units dispensed from the lot
    pub quantity_lot: i64,
}

/// A persisted treatment record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecord {
    pub id: i64,
    pub patient_id: i64,
    pub treatment_center: String,
    pub treatment_type: String,
    pub indication_of_treatment: String,
    pub lot: String,
    pub note_date: String,
    pub quantity_lot: i64,
    #[serde(default)]
    pub created_at: String,
}
