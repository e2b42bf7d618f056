// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The `EncryptedData` grammar reader.
//!
//! This is the largest single piece of the engine: it walks the fixed,
//! mostly-optional child sequence of `EncryptedData` with a single cursor,
//! builds the method transform, resolves the key, and leaves the pipeline
//! ready for the driver (encrypt or decrypt) to feed bytes through.

use crate::entities::encrypted_data::EncryptedDataAttrs;
use crate::entities::{EncryptionResult, ProcessingContext};
use crate::error::XmlEncError;
use crate::namespaces::*;
use crate::transform::Pipeline;
use crate::value_objects::{Key, KeyRequest, KeyUsage};
use crate::xml::Element;

/// Which child slots the grammar reader located, so the driver can come
/// back and mutate `CipherData`/`KeyInfo` without re-walking the tree.
#[derive(Debug, Clone, Copy)]
pub struct GrammarState {
    pub cipher_data_index: usize,
    pub key_info_index: Option<usize>,
}

/// Looks up the `p`th element-only child, given the cursor's precomputed
/// index list. A free function rather than a closure over `encrypted_data`
/// so each lookup borrows it only for the call itself, instead of holding
/// an immutable borrow alive across the key-resolution step's mutable
/// borrow of the same tree.
fn element_at<'a>(encrypted_data: &'a Element, element_indices: &[usize], p: usize) -> Option<&'a Element> {
    element_indices.get(p).and_then(|&i| encrypted_data.children[i].as_element())
}

/// Runs the 8-step algorithm against `encrypted_data`,
/// appending the method transform (and, on encrypt, the base64-encode +
/// memory-sink tail) to `pipeline`.
///
/// `preset_key`, when given, skips key-manager resolution entirely: the
/// caller already supplied key bytes directly.
pub fn read_encrypted_data_grammar(
    encrypted_data: &mut Element,
    ctx: &ProcessingContext,
    encrypt: bool,
    preset_key: Option<Key>,
    pipeline: &mut Pipeline,
) -> Result<(GrammarState, EncryptionResult), XmlEncError> {
    let mut result = EncryptionResult::new(encrypt);
    result.attrs = EncryptedDataAttrs::read(encrypted_data);

    // Cursor over element-only children, in document order.
    let element_indices: Vec<usize> = encrypted_data
        .children
        .iter()
        .enumerate()
        .filter(|(_, n)| n.as_element().is_some())
        .map(|(i, _)| i)
        .collect();
    let mut pos = 0usize;

    // --- Step 1: EncryptionMethod -------------------------------------
    let method_id = if let Some(e) = element_at(encrypted_data, &element_indices, pos) {
        if e.name == TAG_ENCRYPTION_METHOD {
            let id = e
                .attr(ATTR_ALGORITHM)
                .ok_or_else(|| XmlEncError::invalid_data("EncryptionMethod missing Algorithm"))?
                .to_string();
            pos += 1;
            id
        } else if let Some(default) = &ctx.default_method {
            default.clone()
        } else {
            return Err(XmlEncError::invalid_data("encryption method not specified"));
        }
    } else if let Some(default) = &ctx.default_method {
        default.clone()
    } else {
        return Err(XmlEncError::invalid_data("encryption method not specified"));
    };

    let mut method_transform = ctx.transform_factory.create_method_transform(&method_id)?;
    method_transform.set_direction(encrypt);
    pipeline.append(method_transform)?;
    result.method = Some(method_id);

    // --- Step 2: KeyInfo (record position, don't consume semantics) ---
    let key_info_index = match element_at(encrypted_data, &element_indices, pos) {
        Some(e) if e.name == TAG_KEY_INFO => {
            let idx = element_indices[pos];
            pos += 1;
            Some(idx)
        }
        _ => None,
    };

    // --- Step 3: key resolution -----------------------------------------
    let resolved_key = match preset_key {
        Some(key) => key,
        None => {
            let (key_type, key_id) = {
                let t = pipeline.head().expect("method transform just appended");
                let kt = if encrypt { t.enc_key_type() } else { t.dec_key_type() };
                (kt.unwrap_or_default().to_string(), t.key_id().map(str::to_string))
            };
            let request = KeyRequest {
                key_type,
                key_usage: if encrypt { KeyUsage::Encrypt } else { KeyUsage::Decrypt },
                key_id,
            };
            let key_info_elem = key_info_index.and_then(|idx| encrypted_data.children[idx].as_element());
            let key = ctx
                .key_manager
                .get_key(key_info_elem, &request)
                .ok_or(XmlEncError::KeyNotFound)?;
            if encrypt {
                if let (Some(idx), Some(writer)) = (key_info_index, ctx.key_info_writer) {
                    if let Some(key_info_mut) = encrypted_data.children[idx].as_element_mut() {
                        writer.write(key_info_mut, &request, &key);
                    }
                }
            }
            key
        }
    };
    pipeline.set_key_at(0, resolved_key.bytes())?;
    result.key = Some(resolved_key);

    // --- Step 4: CipherData (required, exactly one) --------------------
    let cipher_data_index = match element_at(encrypted_data, &element_indices, pos) {
        Some(e) if e.name == TAG_CIPHER_DATA => {
            let idx = element_indices[pos];
            pos += 1;
            idx
        }
        _ => return Err(XmlEncError::invalid_node(TAG_CIPHER_DATA)),
    };

    // --- Step 5: EncryptionProperties (optional, ignored) ---------------
    if let Some(e) = element_at(encrypted_data, &element_indices, pos) {
        if e.name == TAG_ENCRYPTION_PROPERTIES {
            pos += 1;
        }
    }
    let _ = pos; // grammar fully consumed; nothing legal can follow

    // --- Step 6: encrypt-only tail ---------------------------------------
    if encrypt {
        pipeline.append(ctx.transform_factory.base64_encode())?;
        pipeline.append(ctx.transform_factory.memory_sink())?;
    }

    Ok((
        GrammarState {
            cipher_data_index,
            key_info_index,
        },
        result,
    ))
}
