// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The three encrypt entry points: memory, URI, and XML-node. They share
//! steps 1-2 (build the pipeline off the `EncryptedData` template) and step
//! 5 (write the ciphertext back into `CipherData`); only how the plaintext
//! bytes are sourced, and whether/how the DOM gets spliced, differs.

use tracing::instrument;

use xmlenc_domain::entities::encrypted_data::write_cipher_data;
use xmlenc_domain::namespaces::{ATTR_TYPE, TYPE_CONTENT, TYPE_ELEMENT};
use xmlenc_domain::transform::Pipeline;
use xmlenc_domain::{read_encrypted_data_grammar, Element, EncryptionResult, GrammarState, Key, Node, ProcessingContext, XmlEncError};

use crate::infrastructure::xml_dom;

fn finish(
    template: &mut Element,
    state: &GrammarState,
    pipeline: &mut Pipeline,
    result: &mut EncryptionResult,
) -> Result<(), XmlEncError> {
    let buffer = pipeline.read_to_end()?;
    let cipher_data = template
        .children
        .get_mut(state.cipher_data_index)
        .and_then(Node::as_element_mut)
        .ok_or_else(|| XmlEncError::node_not_found("CipherData"))?;
    write_cipher_data(cipher_data, &buffer)?;
    result.buffer = Some(buffer);
    Ok(())
}

/// Encrypts a caller-supplied byte buffer into `template`.
#[instrument(skip(template, ctx, preset_key, data))]
pub fn encrypt_memory(
    template: &mut Element,
    ctx: &ProcessingContext,
    preset_key: Option<Key>,
    data: &[u8],
) -> Result<EncryptionResult, XmlEncError> {
    let mut pipeline = Pipeline::new();
    let (state, mut result) = read_encrypted_data_grammar(template, ctx, true, preset_key, &mut pipeline)?;
    pipeline.write(data)?;
    pipeline.flush()?;
    finish(template, &state, &mut pipeline, &mut result)?;
    Ok(result)
}

/// Encrypts the bytes a local file or `data:` URI resolves to. The
/// pipeline runs read-driven: `InputUri` is the source, pulled from rather
/// than written to.
#[instrument(skip(template, ctx, preset_key))]
pub fn encrypt_uri(
    template: &mut Element,
    ctx: &ProcessingContext,
    preset_key: Option<Key>,
    uri: &str,
) -> Result<EncryptionResult, XmlEncError> {
    let mut pipeline = Pipeline::new();
    let (state, mut result) = read_encrypted_data_grammar(template, ctx, true, preset_key, &mut pipeline)?;
    pipeline.prepend(ctx.transform_factory.input_uri(uri)?)?;
    pipeline.pull_through()?;
    finish(template, &state, &mut pipeline, &mut result)?;
    Ok(result)
}

/// Encrypts a subtree of `document_root` named by `src_path`, serializing
/// it according to `template`'s `Type` attribute, then -- unless
/// `ctx.ignore_type` is set -- splices the result back into the document
/// in `src`'s place.
#[instrument(skip(document_root, template, ctx, preset_key))]
pub fn encrypt_node(
    document_root: &mut Element,
    src_path: &[usize],
    mut template: Element,
    ctx: &ProcessingContext,
    preset_key: Option<Key>,
) -> Result<EncryptionResult, XmlEncError> {
    let type_ = template.attr(ATTR_TYPE).map(str::to_string);
    let src = xml_dom::locate(document_root, src_path).ok_or_else(|| XmlEncError::node_not_found("source node"))?;
    let serialized = match type_.as_deref() {
        Some(TYPE_CONTENT) => xml_dom::dump_children(src, src.namespace.as_deref())?,
        Some(TYPE_ELEMENT) | None => xml_dom::dump_element(src)?,
        Some(other) => return Err(XmlEncError::InvalidType(other.to_string())),
    };

    let mut pipeline = Pipeline::new();
    let (state, mut result) = read_encrypted_data_grammar(&mut template, ctx, true, preset_key, &mut pipeline)?;
    pipeline.write(serialized.as_bytes())?;
    pipeline.flush()?;
    finish(&mut template, &state, &mut pipeline, &mut result)?;

    if !ctx.ignore_type {
        match type_.as_deref() {
            Some(TYPE_CONTENT) => {
                xml_dom::replace_children(document_root, src_path, vec![Node::Element(template)])?;
                result.replaced = true;
            }
            Some(TYPE_ELEMENT) | None => {
                xml_dom::replace_element(document_root, src_path, template)?;
                result.replaced = true;
            }
            Some(_) => {}
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlenc_domain::services::{KeyInfoWriter, KeyManager};
    use xmlenc_domain::value_objects::KeyOrigin;

    use crate::infrastructure::transform_factory::StandardTransformFactory;

    struct FixedKeyManager(Vec<u8>);
    impl KeyManager for FixedKeyManager {
        fn get_key(&self, _key_info: Option<&Element>, _request: &xmlenc_domain::value_objects::KeyRequest) -> Option<Key> {
            Some(Key::new(self.0.clone(), KeyOrigin::Supplied))
        }
    }

    struct NoopWriter;
    impl KeyInfoWriter for NoopWriter {
        fn write(
            &self,
            _key_info: &mut Element,
            _request: &xmlenc_domain::value_objects::KeyRequest,
            _key: &Key,
        ) {
        }
    }

    #[test]
    fn encrypt_memory_fills_cipher_value() {
        let key_manager = FixedKeyManager(vec![0u8; 16]);
        let factory = StandardTransformFactory::new();
        let ctx = ProcessingContext::new(&key_manager, &factory)
            .with_default_method("http://www.w3.org/2001/04/xmlenc#aes128-cbc");
        let mut template = xmlenc_domain::builders::create(None, None, None, None);
        let result = encrypt_memory(&mut template, &ctx, None, b"secret payload").unwrap();
        assert!(result.buffer.is_some());
        let cipher_data = template.find_child("CipherData").unwrap();
        assert!(cipher_data.find_child("CipherValue").unwrap().text_content().trim().len() > 0);
    }

    #[test]
    fn encrypt_node_element_replaces_source_with_encrypted_data() {
        let key_manager = FixedKeyManager(vec![0u8; 16]);
        let factory = StandardTransformFactory::new();
        let ctx = ProcessingContext::new(&key_manager, &factory)
            .with_default_method("http://www.w3.org/2001/04/xmlenc#aes128-cbc");
        let mut root = Element::new("Envelope", None);
        let mut secret = Element::new("Secret", None);
        secret.set_text("classified");
        root.append_child(secret);

        let mut template = xmlenc_domain::builders::create(None, Some(TYPE_ELEMENT), None, None);
        xmlenc_domain::builders::add_encryption_method(&mut template, "http://www.w3.org/2001/04/xmlenc#aes128-cbc").unwrap();

        let result = encrypt_node(&mut root, &[0], template, &ctx, None).unwrap();
        assert!(result.replaced);
        let child = root.first_element_child().unwrap();
        assert_eq!(child.name, "EncryptedData");
    }
}
