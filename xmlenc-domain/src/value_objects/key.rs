// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Key material and its provenance.
//!
//! Keys are duplicated when a caller supplies one, with `origin` preserved
//! verbatim -- callers rely on this to distinguish statically-configured
//! keys from keys resolved via `KeyInfo`.

use zeroize::Zeroizing;

/// Where a resolved key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Supplied directly by the caller, bypassing `KeyInfo` resolution.
    Supplied,
    /// Resolved via the `KeyManager` callback, keyed by the identifier the
    /// manager reported (if any).
    KeyManager { key_id: Option<String> },
}

/// Resolved key bytes plus provenance. Bytes are zeroized on drop.
#[derive(Debug, Clone)]
pub struct Key {
    bytes: Zeroizing<Vec<u8>>,
    pub origin: KeyOrigin,
}

impl Key {
    pub fn new(bytes: impl Into<Vec<u8>>, origin: KeyOrigin) -> Self {
        Self {
            bytes: Zeroizing::new(bytes.into()),
            origin,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}
impl Eq for Key {}

/// Which direction a `KeyManager` lookup is being made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
}

/// Parameters the engine hands to `KeyManager::get_key` immediately before
/// invoking it -- an explicit argument rather than a mutable shared
/// context field.
#[derive(Debug, Clone)]
pub struct KeyRequest {
    pub key_type: String,
    pub key_usage: KeyUsage,
    pub key_id: Option<String>,
}
