//! Type-safe wrappers for slot extraction.
//!
//! This module provides newtypes that enforce security validation at the type
//! level. All types are validated upon construction and cannot be created from
//! raw types without going through validation.
//!
//! # Design Principles
//!
//! - Type-driven security: Invalid states cannot be represented
//! - No `From<RawType>` implementations for security types
//! - All constructors perform validation

pub mod entry_kind;
pub mod safe_path;
pub mod slot_id;
pub mod storage_root;

pub use entry_kind::EntryKind;
pub use safe_path::SafePath;
pub use slot_id::SlotId;
pub use storage_root::StorageRoot;
