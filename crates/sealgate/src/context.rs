use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OrgContextError;

/// A validated organization identity.
///
/// Construction goes through [`OrgId::parse`]; holding one means the raw
/// identifier already passed every org-context rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(Uuid);

impl OrgId {
    /// Parse a raw organization identifier, checking rules in order:
    /// non-empty, canonical 8-4-4-4-12 hex shape, not the nil UUID.
    ///
    /// The shape check is stricter than `Uuid::parse_str`, which also
    /// admits braced, URN, and undashed forms that must be rejected here.
    pub fn parse(raw: &str) -> Result<OrgId, OrgContextError> {
        if raw.is_empty() {
            return Err(OrgContextError::Missing);
        }
        if !has_canonical_shape(raw) {
            return Err(OrgContextError::Malformed(raw.to_string()));
        }
        let id =
            Uuid::parse_str(raw).map_err(|_| OrgContextError::Malformed(raw.to_string()))?;
        if id.is_nil() {
            return Err(OrgContextError::Nil);
        }
        Ok(OrgId(id))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn has_canonical_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        8 | 13 | 18 | 23 => *b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "3f1c9a2e-8d4b-4c6f-9e21-7b5a0d8c4f13";

    #[test]
    fn parses_canonical_uuid() {
        let org = OrgId::parse(VALID).unwrap();
        assert_eq!(org.to_string(), VALID);
    }

    #[test]
    fn accepts_uppercase_hex() {
        let org = OrgId::parse("3F1C9A2E-8D4B-4C6F-9E21-7B5A0D8C4F13").unwrap();
        assert_eq!(org.to_string(), VALID);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(OrgId::parse("").unwrap_err(), OrgContextError::Missing);
    }

    #[test]
    fn rejects_nil() {
        assert_eq!(
            OrgId::parse("00000000-0000-0000-0000-000000000000").unwrap_err(),
            OrgContextError::Nil
        );
    }

    #[test]
    fn rejects_non_canonical_forms() {
        // Uuid::parse_str would accept all of these; the bridge must not.
        for raw in [
            "3f1c9a2e8d4b4c6f9e217b5a0d8c4f13",
            "urn:uuid:3f1c9a2e-8d4b-4c6f-9e21-7b5a0d8c4f13",
            "{3f1c9a2e-8d4b-4c6f-9e21-7b5a0d8c4f13}",
            "not-a-uuid",
            "3f1c9a2e-8d4b-4c6f-9e21-7b5a0d8c4f1",
            "3f1c9a2e-8d4b-4c6f-9e21-7b5a0d8c4f133",
        ] {
            assert!(
                matches!(OrgId::parse(raw), Err(OrgContextError::Malformed(_))),
                "expected malformed rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn serde_is_transparent() {
        let org = OrgId::parse(VALID).unwrap();
        let json = serde_json::to_string(&org).unwrap();
        assert_eq!(json, format!("\"{VALID}\""));
        let restored: OrgId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, org);
    }
}
