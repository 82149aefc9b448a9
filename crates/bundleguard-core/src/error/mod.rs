//! Error types for bundle validation and extraction.

pub mod messages;
pub mod types;

pub use messages::ErrorPayload;
pub use types::BundleError;
pub use types::ErrorCategory;
pub use types::QuotaResource;
pub use types::Result;
