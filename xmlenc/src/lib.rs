// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # xmlenc
//!
//! Infrastructure and application layers for the XML Encryption processing
//! engine: `quick-xml`-backed DOM parsing/serialization, AEAD cipher and
//! codec transforms, a local-file key manager, and the encrypt/decrypt
//! drivers that assemble them around `xmlenc_domain`'s grammar reader.

pub mod application;
pub mod infrastructure;

pub use application::{decrypt, encrypt_memory, encrypt_node, encrypt_uri};
pub use infrastructure::{KeyNameWriter, StandardTransformFactory, StaticKeyManager};

pub use xmlenc_domain::{
    Element, EncryptionResult, Key, KeyOrigin, KeyRequest, KeyUsage, Node, ProcessingContext, XmlEncError,
};
