//! Validated storage slot identifier.

use std::fmt;

use serde::Serialize;

use crate::BundleError;
use crate::Result;

/// Number of random bytes behind a slot id (128 bits).
pub const SLOT_ID_BYTES: usize = 16;

/// Length of the hex-encoded slot id.
pub const SLOT_ID_LEN: usize = SLOT_ID_BYTES * 2;

/// Identifier of one extracted project's storage directory.
///
/// A `SlotId` is always exactly 32 lowercase hex characters. It is the only
/// value ever joined to the storage root, so it can never carry separators,
/// `..`, or any other path syntax.
///
/// # Security Properties
///
/// - Constructed only from random bytes or through [`SlotId::parse`]
/// - NO `From<String>` implementation
///
/// # Examples
///
/// ```
/// use bundleguard_core::types::SlotId;
///
/// let id = SlotId::parse("df26015b32025ec95e029d995e88a81c").unwrap();
/// assert_eq!(id.as_str(), "df26015b32025ec95e029d995e88a81c");
///
/// assert!(SlotId::parse("../../etc").is_err());
/// assert!(SlotId::parse("DF26015B32025EC95E029D995E88A81C").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    /// Builds a slot id from raw random bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; SLOT_ID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parses an externally supplied slot id.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::InvalidSlotId` unless the input is exactly 32
    /// lowercase hex characters.
    pub fn parse(input: &str) -> Result<Self> {
        let well_formed = input.len() == SLOT_ID_LEN
            && input
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if well_formed {
            Ok(Self(input.to_string()))
        } else {
            Err(BundleError::InvalidSlotId(input.to_string()))
        }
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SlotId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_is_lowercase_hex() {
        let id = SlotId::from_bytes([0xAB; SLOT_ID_BYTES]);
        assert_eq!(id.as_str(), "abababababababababababababababab");
        assert_eq!(id.as_str().len(), SLOT_ID_LEN);
    }

    #[test]
    fn test_parse_round_trips_generated_ids() {
        let id = SlotId::from_bytes([7; SLOT_ID_BYTES]);
        assert_eq!(SlotId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_path_syntax() {
        for input in [
            "",
            "..",
            "../../../../../../../../etc/passwd",
            "df26015b32025ec95e029d995e88a8/c",
            "df26015b32025ec95e029d995e88a81c/..",
            "df26015b32025ec95e029d995e88a81",
            "df26015b32025ec95e029d995e88a81cc",
            "xf26015b32025ec95e029d995e88a81c",
        ] {
            assert!(
                matches!(SlotId::parse(input), Err(BundleError::InvalidSlotId(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_and_serialize() {
        let id = SlotId::from_bytes([0; SLOT_ID_BYTES]);
        assert_eq!(id.to_string(), "0".repeat(SLOT_ID_LEN));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "0".repeat(SLOT_ID_LEN)));
    }
}
