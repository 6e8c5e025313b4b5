//! Catalog signatures.
//!
//! A [`Signature`] fingerprints the ordered document-id sequence of a
//! catalog snapshot. It answers exactly one question: same ids in the same
//! order? Editing a document's text without touching ids or order produces
//! the same signature, so the cached index is intentionally NOT rebuilt.

use std::fmt;

use blake3::Hasher;

use crate::catalog::DocumentDescriptor;

/// Order-sensitive fingerprint of a catalog snapshot's id sequence.
///
/// Used only as an equality token for cache invalidation; it carries no
/// information about document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 32]);

impl Signature {
    /// Fingerprints the ordered ids of `documents`.
    pub fn of(documents: &[DocumentDescriptor]) -> Self {
        Self::from_ids(documents.iter().map(|doc| doc.id.as_str()))
    }

    /// Fingerprints an ordered id sequence.
    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut hasher = Hasher::new();
        for id in ids {
            hasher.update(id.as_bytes());
            // Unit separator between ids so ["ab","c"] != ["a","bc"].
            hasher.update(b"\x1f");
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Returns the raw 32-byte fingerprint.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Locale, TranslationBundle};
    use std::collections::BTreeMap;

    fn doc(id: &str, name: &str) -> DocumentDescriptor {
        DocumentDescriptor {
            id: id.to_string(),
            translations: BTreeMap::from([(
                Locale::En,
                TranslationBundle {
                    name: name.to_string(),
                    ..Default::default()
                },
            )]),
            ..Default::default()
        }
    }

    #[test]
    fn test_signature_determinism() {
        let docs = vec![doc("poa", "Power of Attorney"), doc("bos", "Bill of Sale")];
        assert_eq!(Signature::of(&docs), Signature::of(&docs));
    }

    #[test]
    fn test_signature_order_sensitivity() {
        let forward = vec![doc("poa", "a"), doc("bos", "b")];
        let reversed = vec![doc("bos", "b"), doc("poa", "a")];
        assert_ne!(Signature::of(&forward), Signature::of(&reversed));
    }

    #[test]
    fn test_signature_id_set_sensitivity() {
        let two = vec![doc("poa", "a"), doc("bos", "b")];
        let three = vec![doc("poa", "a"), doc("bos", "b"), doc("nda", "c")];
        assert_ne!(Signature::of(&two), Signature::of(&three));
    }

    #[test]
    fn test_signature_ignores_document_content() {
        let before = vec![doc("poa", "Power of Attorney")];
        let after = vec![doc("poa", "Power of Attorney (Durable)")];
        assert_eq!(Signature::of(&before), Signature::of(&after));
    }

    #[test]
    fn test_signature_separator_prevents_ambiguity() {
        assert_ne!(
            Signature::from_ids(["ab", "c"]),
            Signature::from_ids(["a", "bc"])
        );
    }

    #[test]
    fn test_signature_empty_catalog() {
        assert_eq!(Signature::of(&[]), Signature::from_ids(std::iter::empty::<&str>()));
    }

    #[test]
    fn test_signature_display_is_hex() {
        let sig = Signature::from_ids(["poa"]);
        let hex = sig.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
