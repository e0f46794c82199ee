//! CRUD client for visit records.

use hemocare_core::{VisitRecord, VisitSubmission};

use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::wire;

/// REST client for `/patientVisits`.
pub struct VisitsClient {
    api: ApiClient,
}

impl VisitsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::with_base_url(base_url)?))
    }

    /// List all visit records. A non-list response degrades to an empty
    /// list rather than raising.
    pub fn fetch_all(&self) -> ApiResult<Vec<VisitRecord>> {
        let raw = self.api.get("/patientVisits")?;
        Ok(wire::visit_list(&raw))
    }

    /// Fetch one visit record by id.
    pub fn fetch_by_id(&self, id: i64) -> ApiResult<VisitRecord> {
        let raw = self.api.get(&format!("/patientVisits/{id}"))?;
        Ok(wire::normalize(&raw))
    }

    /// Create a visit record, returning the server's normalized echo.
    pub fn create(&self, visit: &VisitSubmission) -> ApiResult<VisitRecord> {
        let created = self.api.post("/patientVisits", &wire::to_wire(visit))?;
        Ok(wire::normalize(&created))
    }

    /// Update a visit record. Fire-and-forget: the response body is not
    /// inspected.
    pub fn update(&self, id: i64, visit: &VisitSubmission) -> ApiResult<()> {
        self.api
            .put(&format!("/patientVisits/{id}"), &wire::to_wire(visit))
    }

    /// Delete a visit record.
    pub fn delete(&self, id: i64) -> ApiResult<()> {
        self.api.delete(&format!("/patientVisits/{id}"))
    }
}
