// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Reads and writes the plain attributes of `EncryptedData`, and enforces
//! the `CipherValue`/`CipherReference` exclusivity invariant on
//! `CipherData`.

use crate::error::XmlEncError;
use crate::namespaces::*;
use crate::xml::Element;

/// The four top-level attributes carried on `EncryptedData` and copied
/// onto the `EncryptionResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptedDataAttrs {
    pub id: Option<String>,
    pub type_: Option<String>,
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
}

impl EncryptedDataAttrs {
    pub fn read(e: &Element) -> Self {
        Self {
            id: e.attr(ATTR_ID).map(str::to_string),
            type_: e.attr(ATTR_TYPE).map(str::to_string),
            mime_type: e.attr(ATTR_MIME_TYPE).map(str::to_string),
            encoding: e.attr(ATTR_ENCODING).map(str::to_string),
        }
    }

    pub fn write(&self, e: &mut Element) {
        if let Some(id) = &self.id {
            e.set_attr(ATTR_ID, id.clone());
        }
        if let Some(t) = &self.type_ {
            e.set_attr(ATTR_TYPE, t.clone());
        }
        if let Some(m) = &self.mime_type {
            e.set_attr(ATTR_MIME_TYPE, m.clone());
        }
        if let Some(enc) = &self.encoding {
            e.set_attr(ATTR_ENCODING, enc.clone());
        }
    }
}

/// The unique child of `CipherData`: inline ciphertext or a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherDataChild<'a> {
    Value(&'a Element),
    Reference(&'a Element),
}

/// Reads `CipherData`'s unique child, enforcing sibling exclusivity
/// (exactly one of the two may be present at a time).
pub fn cipher_data_child(cipher_data: &Element) -> Result<CipherDataChild<'_>, XmlEncError> {
    let value = cipher_data.find_child(TAG_CIPHER_VALUE);
    let reference = cipher_data.find_child(TAG_CIPHER_REFERENCE);
    match (value, reference) {
        (Some(v), None) => Ok(CipherDataChild::Value(v)),
        (None, Some(r)) => Ok(CipherDataChild::Reference(r)),
        (None, None) => Err(XmlEncError::node_not_found(TAG_CIPHER_VALUE)),
        (Some(_), Some(_)) => Err(XmlEncError::invalid_node("CipherValue xor CipherReference")),
    }
}

/// Writes ciphertext into `CipherData`, following the "CipherData
/// writer": creates `CipherValue` if no element child exists yet,
/// overwrites it if it already exists, and is a no-op if `CipherReference`
/// is present (ciphertext lives remotely in that case).
///
/// `encoded_bytes` is the already base64-encoded ciphertext -- the
/// encrypt-only pipeline tail runs a base64-encode
/// transform before the memory sink, so by the time this is called the
/// bytes are ASCII text ready to drop straight into the element's text
/// content.
pub fn write_cipher_data(cipher_data: &mut Element, encoded_bytes: &[u8]) -> Result<(), XmlEncError> {
    let body = format!("\n{}\n", String::from_utf8_lossy(encoded_bytes));
    if let Some(existing) = cipher_data.find_child_mut(TAG_CIPHER_VALUE) {
        existing.set_text(body);
        return Ok(());
    }
    if cipher_data.find_child(TAG_CIPHER_REFERENCE).is_some() {
        return Ok(());
    }
    match cipher_data.first_element_child() {
        None => {
            let mut cv = Element::new(TAG_CIPHER_VALUE, Some(ENC_NS));
            cv.set_text(body);
            cipher_data.append_child(cv);
            Ok(())
        }
        Some(other) => Err(XmlEncError::invalid_node(other.name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cipher_data_rejects_both_children() {
        let mut cd = Element::new(TAG_CIPHER_DATA, Some(ENC_NS));
        cd.append_child(Element::new(TAG_CIPHER_VALUE, Some(ENC_NS)));
        cd.append_child(Element::new(TAG_CIPHER_REFERENCE, Some(ENC_NS)));
        assert!(cipher_data_child(&cd).is_err());
    }

    #[test]
    fn write_cipher_data_creates_then_overwrites_value() {
        let mut cd = Element::new(TAG_CIPHER_DATA, Some(ENC_NS));
        write_cipher_data(&mut cd, b"aGVsbG8=").unwrap();
        let v = cd.find_child(TAG_CIPHER_VALUE).unwrap();
        assert!(v.text_content().contains("aGVsbG8="));

        write_cipher_data(&mut cd, b"d29ybGQ=").unwrap();
        let v = cd.find_child(TAG_CIPHER_VALUE).unwrap();
        assert!(v.text_content().contains("d29ybGQ="));
        assert_eq!(cd.element_child_count(), 1);
    }

    #[test]
    fn write_cipher_data_is_noop_when_reference_present() {
        let mut cd = Element::new(TAG_CIPHER_DATA, Some(ENC_NS));
        cd.append_child(Element::new(TAG_CIPHER_REFERENCE, Some(ENC_NS)));
        write_cipher_data(&mut cd, b"aGVsbG8=").unwrap();
        assert!(cd.find_child(TAG_CIPHER_VALUE).is_none());
    }
}
