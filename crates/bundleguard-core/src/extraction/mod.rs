//! Safe on-disk materialization of bundles.

pub mod extractor;
pub mod guard;

pub use extractor::SafeExtractor;
pub use guard::SlotGuard;
