// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The decrypt driver: resolves `CipherValue` or `CipherReference`, then
//! (unless suppressed) splices the recovered plaintext back into the
//! document the way its `Type` attribute says it was encrypted.

use tracing::instrument;

use xmlenc_domain::entities::encrypted_data::{cipher_data_child, CipherDataChild};
use xmlenc_domain::namespaces::{ATTR_ALGORITHM, ATTR_URI, TAG_TRANSFORM, TAG_TRANSFORMS, TYPE_CONTENT, TYPE_ELEMENT};
use xmlenc_domain::transform::Pipeline;
use xmlenc_domain::{read_encrypted_data_grammar, Element, EncryptionResult, Key, ProcessingContext, XmlEncError};

use crate::infrastructure::xml_dom;

/// Decrypts the `EncryptedData` element at `encrypted_data_path` within
/// `document_root`, returning the recovered plaintext in `result.buffer`
/// and, when `ctx.ignore_type` is false, splicing it back into the tree.
#[instrument(skip(document_root, ctx, preset_key))]
pub fn decrypt(
    document_root: &mut Element,
    encrypted_data_path: &[usize],
    ctx: &ProcessingContext,
    preset_key: Option<Key>,
) -> Result<EncryptionResult, XmlEncError> {
    let mut pipeline = Pipeline::new();
    let encrypted_data = xml_dom::locate_mut(document_root, encrypted_data_path)
        .ok_or_else(|| XmlEncError::node_not_found("EncryptedData"))?;
    let (state, mut result) = read_encrypted_data_grammar(encrypted_data, ctx, false, preset_key, &mut pipeline)?;

    let cipher_data = encrypted_data
        .children
        .get(state.cipher_data_index)
        .and_then(|n| n.as_element())
        .ok_or_else(|| XmlEncError::node_not_found("CipherData"))?;

    let buffer = match cipher_data_child(cipher_data)? {
        CipherDataChild::Value(cipher_value) => {
            let text = cipher_value.text_content();
            pipeline.prepend(ctx.transform_factory.base64_decode())?;
            pipeline.append(ctx.transform_factory.memory_sink())?;
            pipeline.write(text.as_bytes())?;
            pipeline.flush()?;
            pipeline.read_to_end()?
        }
        CipherDataChild::Reference(reference) => {
            let uri = reference
                .attr(ATTR_URI)
                .ok_or_else(|| XmlEncError::invalid_data("CipherReference missing URI"))?
                .to_string();
            let mut ref_pipeline = Pipeline::new();
            ref_pipeline.append(ctx.transform_factory.input_uri(&uri)?)?;
            if let Some(transforms) = reference.find_child(TAG_TRANSFORMS) {
                for t in transforms.element_children() {
                    if t.name == TAG_TRANSFORM {
                        if let Some(alg) = t.attr(ATTR_ALGORITHM) {
                            if alg.contains("base64") {
                                ref_pipeline.append(ctx.transform_factory.base64_decode())?;
                            }
                        }
                    }
                }
            }
            pipeline.transfer_into(&mut ref_pipeline);
            ref_pipeline.pull_through()?;
            ref_pipeline.read_to_end()?
        }
    };
    result.buffer = Some(buffer.clone());

    if !ctx.ignore_type {
        if let Some(type_) = result.attrs.type_.clone() {
            let text = String::from_utf8(buffer).map_err(|e| XmlEncError::invalid_data(format!("recovered plaintext is not UTF-8: {e}")))?;
            if type_ == TYPE_ELEMENT {
                let fragment_root = xml_dom::parse_document(&text)?;
                xml_dom::replace_element(document_root, encrypted_data_path, fragment_root)?;
                result.replaced = true;
            } else if type_ == TYPE_CONTENT {
                let fragment = xml_dom::parse_fragment(&text)?;
                xml_dom::splice_children_in_place(document_root, encrypted_data_path, fragment)?;
                result.replaced = true;
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlenc_domain::namespaces::TYPE_ELEMENT;
    use xmlenc_domain::value_objects::KeyOrigin;

    use crate::application::services::encrypt_service::encrypt_node;
    use crate::infrastructure::transform_factory::StandardTransformFactory;

    struct FixedKeyManager(Vec<u8>);
    impl xmlenc_domain::services::KeyManager for FixedKeyManager {
        fn get_key(&self, _key_info: Option<&Element>, _request: &xmlenc_domain::value_objects::KeyRequest) -> Option<Key> {
            Some(Key::new(self.0.clone(), KeyOrigin::Supplied))
        }
    }

    #[test]
    fn round_trips_element_encryption_through_the_document() {
        let key_manager = FixedKeyManager(vec![7u8; 16]);
        let factory = StandardTransformFactory::new();
        let ctx = ProcessingContext::new(&key_manager, &factory)
            .with_default_method("http://www.w3.org/2001/04/xmlenc#aes128-cbc");

        let mut root = Element::new("Envelope", None);
        let mut secret = Element::new("Secret", None);
        secret.set_text("classified payload");
        root.append_child(secret);

        let mut template = xmlenc_domain::builders::create(None, Some(TYPE_ELEMENT), None, None);
        xmlenc_domain::builders::add_encryption_method(&mut template, "http://www.w3.org/2001/04/xmlenc#aes128-cbc").unwrap();
        encrypt_node(&mut root, &[0], template, &ctx, None).unwrap();

        let result = decrypt(&mut root, &[0], &ctx, None).unwrap();
        assert!(result.replaced);
        let recovered = root.first_element_child().unwrap();
        assert_eq!(recovered.name, "Secret");
        assert_eq!(recovered.text_content(), "classified payload");
    }
}
