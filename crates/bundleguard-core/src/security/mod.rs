//! Security validation modules.

pub mod path;
pub mod quota;
pub mod rules;
pub mod validator;

// Re-export public types and functions
pub use path::check_traversal;
pub use quota::QuotaTracker;
pub use rules::check_entry;
pub use validator::PolicyValidator;
