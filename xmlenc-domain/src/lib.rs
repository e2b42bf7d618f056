// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # xmlenc-domain
//!
//! Pure domain layer for the XML Encryption processing engine: value
//! objects, the `BinaryTransform`/`Pipeline` abstraction, the collaborator
//! traits (`KeyManager`, `KeyInfoWriter`, `TransformFactory`) infrastructure
//! implements, the `EncryptedData` grammar reader, and template builders.
//!
//! Deliberately free of any XML-parsing or cryptography crate: this crate
//! only ever navigates an already-built [`xml::Element`] tree and drives
//! transforms through a trait object, leaving every concrete format and
//! cipher to `xmlenc`.

pub mod builders;
pub mod entities;
pub mod error;
pub mod grammar;
pub mod namespaces;
pub mod services;
pub mod transform;
pub mod value_objects;
pub mod xml;

pub use entities::{CipherDataChild, EncryptedDataAttrs, EncryptionResult, ProcessingContext};
pub use error::XmlEncError;
pub use grammar::{read_encrypted_data_grammar, GrammarState};
pub use services::{KeyInfoWriter, KeyManager};
pub use transform::{BinaryTransform, Pipeline, TransformCapability, TransformFactory};
pub use value_objects::{Key, KeyOrigin, KeyRequest, KeyUsage};
pub use xml::{Element, Node};
