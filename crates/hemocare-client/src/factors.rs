//! HTTP-backed factors gateway.

use hemocare_core::{FactorUpdate, FactorsGateway, GatewayError};

use crate::error::ApiResult;
use crate::http::ApiClient;

/// REST client for `/factors`, usable directly or as the core's
/// [`FactorsGateway`].
pub struct FactorsClient {
    api: ApiClient,
}

impl FactorsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Ok(Self::new(ApiClient::with_base_url(base_url)?))
    }

    /// Replace a factor record with the full update payload.
    pub fn put_factor(&self, id: i64, factor: &FactorUpdate) -> ApiResult<()> {
        self.api.put(&format!("/factors/{id}"), factor)
    }
}

impl FactorsGateway for FactorsClient {
    fn update(&self, id: i64, factor: FactorUpdate) -> Result<(), GatewayError> {
        self.put_factor(id, &factor).map_err(GatewayError::from)
    }
}
