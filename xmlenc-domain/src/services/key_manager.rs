// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The key manager / `KeyInfo` callback collaborators.

use crate::value_objects::{Key, KeyRequest};
use crate::xml::Element;

/// Resolves key material, optionally consulting a `KeyInfo` element.
///
/// Behavior is entirely up to the implementation; this trait only
/// constrains how `request` is populated before the call.
pub trait KeyManager {
    fn get_key(&self, key_info: Option<&Element>, request: &KeyRequest) -> Option<Key>;
}

/// Rewrites a `KeyInfo` subtree to describe the chosen key, on the encrypt
/// path, when a `KeyInfo` element was present in the template.
pub trait KeyInfoWriter {
    fn write(&self, key_info: &mut Element, request: &KeyRequest, key: &Key);
}
