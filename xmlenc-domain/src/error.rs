// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Error System
//!
//! Error *kinds* for the XML Encryption processing engine: one `thiserror`
//! enum, constructor helpers for the variants call sites build most often,
//! and a `category()` for structured logging.

use thiserror::Error;

/// Errors raised by the XML Encryption engine.
///
/// Every internal failure propagates as one of these variants; `?`
/// propagation means each stack frame only has to drop what it owns, so
/// there is no separate teardown step to get wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlEncError {
    #[error("allocation failure")]
    Malloc,

    #[error("xml failure: {0}")]
    XmlFailure(String),

    #[error("invalid node: expected {0}")]
    InvalidNode(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("node already present: {0}")]
    NodeAlreadyPresent(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid type: {0}")]
    InvalidType(String),

    #[error("transform lacks Binary capability")]
    InvalidTransform,

    #[error("key not found")]
    KeyNotFound,

    #[error("transform failure: {0}")]
    TransformFailure(String),

    #[error("internal error: no transform at index {0}")]
    InternalMissingTransform(usize),
}

impl XmlEncError {
    pub fn invalid_node(name: impl Into<String>) -> Self {
        Self::InvalidNode(name.into())
    }

    pub fn node_not_found(name: impl Into<String>) -> Self {
        Self::NodeNotFound(name.into())
    }

    pub fn node_already_present(name: impl Into<String>) -> Self {
        Self::NodeAlreadyPresent(name.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    pub fn transform_failure(msg: impl Into<String>) -> Self {
        Self::TransformFailure(msg.into())
    }

    /// Whether retrying the same call with corrected inputs could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, XmlEncError::KeyNotFound | XmlEncError::TransformFailure(_))
    }

    /// Coarse category for structured logging.
    pub fn category(&self) -> &'static str {
        match self {
            XmlEncError::Malloc => "resource",
            XmlEncError::XmlFailure(_) => "xml",
            XmlEncError::InvalidNode(_) => "grammar",
            XmlEncError::NodeNotFound(_) => "grammar",
            XmlEncError::NodeAlreadyPresent(_) => "grammar",
            XmlEncError::InvalidData(_) => "data",
            XmlEncError::InvalidType(_) => "data",
            XmlEncError::InvalidTransform => "transform",
            XmlEncError::KeyNotFound => "key",
            XmlEncError::TransformFailure(_) => "transform",
            XmlEncError::InternalMissingTransform(_) => "internal",
        }
    }
}
