// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Per-call execution context.

use crate::services::{KeyInfoWriter, KeyManager};
use crate::transform::TransformFactory;

/// Carries the collaborators and policy flags an encrypt/decrypt call
/// needs. May be shared across non-overlapping calls; each
/// call borrows it with its own `KeyRequest` scratch value rather than
/// mutating shared state, so the borrow checker -- not documentation --
/// enforces "don't drive one context concurrently."
pub struct ProcessingContext<'a> {
    pub key_manager: &'a dyn KeyManager,
    pub key_info_writer: Option<&'a dyn KeyInfoWriter>,
    pub transform_factory: &'a dyn TransformFactory,
    /// Used when a template has no `EncryptionMethod` child.
    pub default_method: Option<String>,
    /// When `true`, splicing is suppressed regardless of `Type`.
    pub ignore_type: bool,
}

impl<'a> ProcessingContext<'a> {
    pub fn new(key_manager: &'a dyn KeyManager, transform_factory: &'a dyn TransformFactory) -> Self {
        Self {
            key_manager,
            key_info_writer: None,
            transform_factory,
            default_method: None,
            ignore_type: false,
        }
    }

    pub fn with_key_info_writer(mut self, writer: &'a dyn KeyInfoWriter) -> Self {
        self.key_info_writer = Some(writer);
        self
    }

    pub fn with_default_method(mut self, method: impl Into<String>) -> Self {
        self.default_method = Some(method.into());
        self
    }

    pub fn with_ignore_type(mut self, ignore_type: bool) -> Self {
        self.ignore_type = ignore_type;
        self
    }
}
