//! Canonical byte encoding
//!
//! Commitments and binding tags must be deterministic functions of their
//! logical inputs, so everything hashed goes through a fixed-order,
//! length-prefixed encoding first. Field order is part of the format, never
//! a property of the in-memory representation.

use proofpass_core::CredentialAttributes;

/// Append one length-prefixed field: `len(u32 LE) || bytes`.
pub(crate) fn put_field(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
}

/// Append an optional field; absence is encoded distinctly from "empty".
fn put_opt(out: &mut Vec<u8>, value: Option<&str>) {
    match value {
        Some(v) => {
            out.push(1);
            put_field(out, v.as_bytes());
        }
        None => out.push(0),
    }
}

/// Canonical encoding of credential attributes.
///
/// Known fields in fixed order, then the extra map in key order (it is a
/// `BTreeMap`, so iteration order is sorted regardless of insertion order).
pub fn canonical_attribute_bytes(attrs: &CredentialAttributes) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    out.extend_from_slice(b"proofpass.attrs.v1");

    put_field(&mut out, attrs.name.as_bytes());
    put_field(&mut out, attrs.credential_type.as_bytes());
    put_opt(&mut out, attrs.issuer.as_deref());
    put_opt(
        &mut out,
        attrs
            .date_issued
            .map(|d| d.format("%Y-%m-%d").to_string())
            .as_deref(),
    );
    put_opt(&mut out, attrs.notes.as_deref());

    out.extend_from_slice(&(attrs.extra.len() as u32).to_le_bytes());
    for (key, value) in &attrs.extra {
        put_field(&mut out, key.as_bytes());
        put_field(&mut out, value.as_bytes());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_attrs() -> CredentialAttributes {
        let mut attrs = CredentialAttributes::new("Alice", "age");
        attrs.issuer = Some("DMV".to_string());
        attrs.date_issued = NaiveDate::from_ymd_opt(2020, 6, 1);
        attrs
    }

    #[test]
    fn test_encoding_deterministic() {
        assert_eq!(
            canonical_attribute_bytes(&base_attrs()),
            canonical_attribute_bytes(&base_attrs())
        );
    }

    #[test]
    fn test_extra_map_order_independent() {
        let mut a = base_attrs();
        a.extra.insert("b".into(), "2".into());
        a.extra.insert("a".into(), "1".into());

        let mut b = base_attrs();
        b.extra.insert("a".into(), "1".into());
        b.extra.insert("b".into(), "2".into());

        assert_eq!(canonical_attribute_bytes(&a), canonical_attribute_bytes(&b));
    }

    #[test]
    fn test_absent_and_empty_differ() {
        let mut absent = base_attrs();
        absent.notes = None;
        let mut empty = base_attrs();
        empty.notes = Some(String::new());

        assert_ne!(
            canonical_attribute_bytes(&absent),
            canonical_attribute_bytes(&empty)
        );
    }

    #[test]
    fn test_field_boundaries_unambiguous() {
        // "ab" + "c" must not encode identically to "a" + "bc".
        let mut a = CredentialAttributes::new("ab", "c");
        let mut b = CredentialAttributes::new("a", "bc");
        a.extra.clear();
        b.extra.clear();
        assert_ne!(canonical_attribute_bytes(&a), canonical_attribute_bytes(&b));
    }
}
