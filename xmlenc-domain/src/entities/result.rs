// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The caller-facing result of a completed encrypt/decrypt call.

use crate::entities::encrypted_data::EncryptedDataAttrs;
use crate::value_objects::Key;

/// Output of one encrypt or decrypt call. Ownership is unconditional: the
/// value is either returned to the caller or dropped by the driver on an
/// error path -- Rust's ownership model makes "never leave it half-built"
/// automatic rather than a discipline to maintain by hand.
#[derive(Debug, Clone)]
pub struct EncryptionResult {
    pub encrypt: bool,
    /// Whether the target document was mutated to splice in the
    /// plaintext/ciphertext (element/content replace, or template ->
    /// document attachment).
    pub replaced: bool,
    pub key: Option<Key>,
    pub method: Option<String>,
    pub buffer: Option<Vec<u8>>,
    pub attrs: EncryptedDataAttrs,
}

impl EncryptionResult {
    pub fn new(encrypt: bool) -> Self {
        Self {
            encrypt,
            replaced: false,
            key: None,
            method: None,
            buffer: None,
            attrs: EncryptedDataAttrs::default(),
        }
    }
}
