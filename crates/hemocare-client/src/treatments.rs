//! HTTP-backed treatments gateway.

use hemocare_core::{GatewayError, TreatmentRecord, TreatmentRequest, TreatmentsGateway};

use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;

/// REST client for `/treatments`, usable directly or as the core's
/// [`TreatmentsGateway`].
pub struct TreatmentsClient {
    api: ApiClient,
}

impl TreatmentsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::with_base_url(base_url)?))
    }

    /// Create a treatment record, returning the server's echo.
    pub fn post_treatment(&self, request: &TreatmentRequest) -> ApiResult<TreatmentRecord> {
        let created = self.api.post("/treatments", request)?;
        serde_json::from_value(created).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TreatmentsGateway for TreatmentsClient {
    fn create(&self, request: TreatmentRequest) -> Result<TreatmentRecord, GatewayError> {
        self.post_treatment(&request).map_err(GatewayError::from)
    }
}
