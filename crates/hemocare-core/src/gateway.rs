//! Collaborator seams for the visit form.
//!
//! The form never talks to the backend itself. Persisting the visit is
//! delegated to a caller-supplied sink, and the two secondary effects go
//! through the treatments/factors gateways. Implementations come either
//! from the host UI (over the FFI callback interfaces) or from
//! `hemocare-client`'s HTTP clients.

use thiserror::Error;

use crate::models::{FactorUpdate, TreatmentRecord, TreatmentRequest, VisitSubmission};

/// Errors reported by gateway implementations.
#[derive(Debug, Error, uniffi::Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Callback failure: {0}")]
    Callback(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for GatewayError {
    fn from(err: uniffi::UnexpectedUniFFICallbackError) -> Self {
        GatewayError::Callback(err.reason)
    }
}

/// Owns visit persistence. Create-vs-update is the owner's concern, as is
/// error handling and any list refresh afterwards.
#[uniffi::export(callback_interface)]
pub trait VisitSink: Send + Sync {
    fn save(&self, payload: VisitSubmission);
}

/// Creates treatment records.
#[uniffi::export(callback_interface)]
pub trait TreatmentsGateway: Send + Sync {
    fn create(&self, request: TreatmentRequest) -> Result<TreatmentRecord, GatewayError>;
}

/// Updates factor inventory records.
#[uniffi::export(callback_interface)]
pub trait FactorsGateway: Send + Sync {
    fn update(&self, id: i64, factor: FactorUpdate) -> Result<(), GatewayError>;
}
