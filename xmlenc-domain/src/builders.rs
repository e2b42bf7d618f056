// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Template builders for assembling `EncryptedData` fragments.
//!
//! Each builder is order-preserving and idempotent-by-failure: calling it
//! twice returns `NodeAlreadyPresent` on the second call without mutating
//! the tree further. Builders that
//! create a brand-new node build it fully before attaching it, so a
//! failure partway through never leaves a half-built child wired into the
//! document.

use crate::error::XmlEncError;
use crate::namespaces::*;
use crate::xml::Element;

/// Creates a fresh `EncryptedData` skeleton with an empty `CipherData`.
pub fn create(id: Option<&str>, type_: Option<&str>, mime_type: Option<&str>, encoding: Option<&str>) -> Element {
    let mut e = Element::new(TAG_ENCRYPTED_DATA, Some(ENC_NS));
    if let Some(v) = id {
        e.set_attr(ATTR_ID, v);
    }
    if let Some(v) = type_ {
        e.set_attr(ATTR_TYPE, v);
    }
    if let Some(v) = mime_type {
        e.set_attr(ATTR_MIME_TYPE, v);
    }
    if let Some(v) = encoding {
        e.set_attr(ATTR_ENCODING, v);
    }
    e.append_child(Element::new(TAG_CIPHER_DATA, Some(ENC_NS)));
    e
}

/// Inserts `EncryptionMethod` as the first element child.
pub fn add_encryption_method(enc: &mut Element, method_id: &str) -> Result<(), XmlEncError> {
    if enc.find_child(TAG_ENCRYPTION_METHOD).is_some() {
        return Err(XmlEncError::node_already_present(TAG_ENCRYPTION_METHOD));
    }
    let mut method = Element::new(TAG_ENCRYPTION_METHOD, Some(ENC_NS));
    method.set_attr(ATTR_ALGORITHM, method_id);
    let index = enc.nth_element_child_index(0).unwrap_or(enc.children.len());
    enc.insert_child(index, method);
    Ok(())
}

/// Inserts `KeyInfo` after `EncryptionMethod` if present, else first.
pub fn add_key_info(enc: &mut Element) -> Result<(), XmlEncError> {
    if enc.find_child(TAG_KEY_INFO).is_some() {
        return Err(XmlEncError::node_already_present(TAG_KEY_INFO));
    }
    let after_method = enc.find_child(TAG_ENCRYPTION_METHOD).is_some();
    let slot = if after_method { 1 } else { 0 };
    let index = enc.nth_element_child_index(slot).unwrap_or(enc.children.len());
    enc.insert_child(index, Element::new(TAG_KEY_INFO, Some(DSIG_NS)));
    Ok(())
}

/// Appends (or reuses) `EncryptionProperties` at the end of `enc`.
pub fn add_encryption_properties<'a>(enc: &'a mut Element, id: Option<&str>) -> Result<&'a mut Element, XmlEncError> {
    if enc.find_child(TAG_ENCRYPTION_PROPERTIES).is_some() {
        return Err(XmlEncError::node_already_present(TAG_ENCRYPTION_PROPERTIES));
    }
    let mut props = Element::new(TAG_ENCRYPTION_PROPERTIES, Some(ENC_NS));
    if let Some(v) = id {
        props.set_attr(ATTR_ID, v);
    }
    enc.append_child(props);
    Ok(enc.find_child_mut(TAG_ENCRYPTION_PROPERTIES).expect("just inserted"))
}

/// Appends an `EncryptionProperty`, creating the parent
/// `EncryptionProperties` container on demand.
pub fn add_encryption_property(
    enc: &mut Element,
    id: Option<&str>,
    target: Option<&str>,
) -> Result<(), XmlEncError> {
    if enc.find_child(TAG_ENCRYPTION_PROPERTIES).is_none() {
        enc.append_child(Element::new(TAG_ENCRYPTION_PROPERTIES, Some(ENC_NS)));
    }
    let props = enc.find_child_mut(TAG_ENCRYPTION_PROPERTIES).expect("just ensured");
    let mut prop = Element::new(TAG_ENCRYPTION_PROPERTY, Some(ENC_NS));
    if let Some(v) = id {
        prop.set_attr(ATTR_ID, v);
    }
    if let Some(v) = target {
        prop.set_attr("Target", v);
    }
    props.append_child(prop);
    Ok(())
}

fn cipher_data_mut<'a>(enc: &'a mut Element) -> Result<&'a mut Element, XmlEncError> {
    enc.find_child_mut(TAG_CIPHER_DATA)
        .ok_or_else(|| XmlEncError::node_not_found(TAG_CIPHER_DATA))
}

/// Inserts an empty `CipherValue` under `CipherData`; fails if either
/// sibling already exists.
pub fn add_cipher_value(enc: &mut Element) -> Result<(), XmlEncError> {
    let cd = cipher_data_mut(enc)?;
    if cd.find_child(TAG_CIPHER_VALUE).is_some() {
        return Err(XmlEncError::node_already_present(TAG_CIPHER_VALUE));
    }
    if cd.find_child(TAG_CIPHER_REFERENCE).is_some() {
        return Err(XmlEncError::node_already_present(TAG_CIPHER_REFERENCE));
    }
    cd.append_child(Element::new(TAG_CIPHER_VALUE, Some(ENC_NS)));
    Ok(())
}

/// Inserts `CipherReference` under `CipherData`; fails if either sibling
/// already exists.
pub fn add_cipher_reference(enc: &mut Element, uri: Option<&str>) -> Result<(), XmlEncError> {
    let cd = cipher_data_mut(enc)?;
    if cd.find_child(TAG_CIPHER_REFERENCE).is_some() {
        return Err(XmlEncError::node_already_present(TAG_CIPHER_REFERENCE));
    }
    if cd.find_child(TAG_CIPHER_VALUE).is_some() {
        return Err(XmlEncError::node_already_present(TAG_CIPHER_VALUE));
    }
    let mut reference = Element::new(TAG_CIPHER_REFERENCE, Some(ENC_NS));
    if let Some(u) = uri {
        reference.set_attr(ATTR_URI, u);
    }
    cd.append_child(reference);
    Ok(())
}

/// Appends a `Transform` under `CipherReference/Transforms`, creating
/// `Transforms` on demand.
pub fn add_cipher_reference_transform(enc: &mut Element, transform_id: &str) -> Result<(), XmlEncError> {
    let cd = cipher_data_mut(enc)?;
    let reference = cd
        .find_child_mut(TAG_CIPHER_REFERENCE)
        .ok_or_else(|| XmlEncError::node_not_found(TAG_CIPHER_REFERENCE))?;
    if reference.find_child(TAG_TRANSFORMS).is_none() {
        reference.append_child(Element::new(TAG_TRANSFORMS, Some(ENC_NS)));
    }
    let transforms = reference.find_child_mut(TAG_TRANSFORMS).expect("just ensured");
    let mut transform = Element::new(TAG_TRANSFORM, Some(ENC_NS));
    transform.set_attr(ATTR_ALGORITHM, transform_id);
    transforms.append_child(transform);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_encryption_method_twice_fails_without_mutating() {
        let mut e = create(None, None, None, None);
        add_encryption_method(&mut e, "alg-1").unwrap();
        let before = e.clone();
        let err = add_encryption_method(&mut e, "alg-2").unwrap_err();
        assert!(matches!(err, XmlEncError::NodeAlreadyPresent(_)));
        assert_eq!(e, before);
    }

    #[test]
    fn key_info_lands_after_encryption_method() {
        let mut e = create(None, None, None, None);
        add_encryption_method(&mut e, "alg-1").unwrap();
        add_key_info(&mut e).unwrap();
        let names: Vec<&str> = e.element_children().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![TAG_ENCRYPTION_METHOD, TAG_KEY_INFO, TAG_CIPHER_DATA]);
    }

    #[test]
    fn cipher_value_and_reference_are_mutually_exclusive() {
        let mut e = create(None, None, None, None);
        add_cipher_value(&mut e).unwrap();
        let err = add_cipher_reference(&mut e, Some("data.bin")).unwrap_err();
        assert!(matches!(err, XmlEncError::NodeAlreadyPresent(_)));
    }

    #[test]
    fn cipher_reference_transform_creates_transforms_container() {
        let mut e = create(None, None, None, None);
        add_cipher_reference(&mut e, Some("data.bin")).unwrap();
        add_cipher_reference_transform(&mut e, "base64").unwrap();
        let cd = e.find_child(TAG_CIPHER_DATA).unwrap();
        let reference = cd.find_child(TAG_CIPHER_REFERENCE).unwrap();
        let transforms = reference.find_child(TAG_TRANSFORMS).unwrap();
        assert_eq!(transforms.element_child_count(), 1);
    }

    proptest::proptest! {
        /// Idempotence holds no matter what the two calls' algorithm
        /// identifiers actually are.
        #[test]
        fn add_encryption_method_never_mutates_on_its_second_call(
            first in "[a-zA-Z0-9:/#.-]{1,40}",
            second in "[a-zA-Z0-9:/#.-]{1,40}",
        ) {
            let mut e = create(None, None, None, None);
            add_encryption_method(&mut e, &first).unwrap();
            let before = e.clone();
            let err = add_encryption_method(&mut e, &second).unwrap_err();
            proptest::prop_assert!(matches!(err, XmlEncError::NodeAlreadyPresent(_)));
            proptest::prop_assert_eq!(e, before);
        }

        /// `CipherValue`/`CipherReference` exclusivity holds in either
        /// insertion order.
        #[test]
        fn cipher_data_children_are_exclusive_either_order(value_first in proptest::bool::ANY, uri in "[a-z0-9./-]{1,20}") {
            let mut e = create(None, None, None, None);
            if value_first {
                add_cipher_value(&mut e).unwrap();
                let err = add_cipher_reference(&mut e, Some(&uri)).unwrap_err();
                proptest::prop_assert!(matches!(err, XmlEncError::NodeAlreadyPresent(_)));
            } else {
                add_cipher_reference(&mut e, Some(&uri)).unwrap();
                let err = add_cipher_value(&mut e).unwrap_err();
                proptest::prop_assert!(matches!(err, XmlEncError::NodeAlreadyPresent(_)));
            }
        }
    }
}
