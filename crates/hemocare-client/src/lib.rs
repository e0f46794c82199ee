//! Hemocare Records Client
//!
//! REST client for the visit records backend plus HTTP-backed
//! implementations of the core's collaborator gateways.
//!
//! The backend mixes PascalCase, snake_case and camelCase field names in
//! its responses; [`wire`] folds all three into the canonical record shape
//! on the way in and always emits PascalCase on the way out. Every call is
//! a single-shot request/response with no retry, batching or caching;
//! failures propagate to the caller unchanged.
//!
//! # Modules
//!
//! - [`http`]: Blocking JSON client with transport-error triage
//! - [`wire`]: Field-name normalization and PascalCase emission
//! - [`visits`]: CRUD over `/patientVisits`
//! - [`treatments`]: `TreatmentsGateway` over `/treatments`
//! - [`factors`]: `FactorsGateway` over `/factors`

pub mod error;
pub mod factors;
pub mod http;
pub mod treatments;
pub mod visits;
pub mod wire;

pub use error::{ApiError, ApiResult};
pub use factors::FactorsClient;
pub use http::ApiClient;
pub use treatments::TreatmentsClient;
pub use visits::VisitsClient;
