//! Query service over the record store and its HTTP routes.

pub mod error;
pub mod routes;
pub mod service;

pub use error::ServiceError;
pub use service::{FilterQuery, Health, HealthStatus, LevelFilter, QueryService, RefreshSummary};
