// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Pluggable creation of concrete transforms.
//!
//! The grammar reader needs to create a method transform, a base64 codec,
//! a memory sink, and (on the encrypt-URI path) a source -- but the
//! concrete cipher/codec implementations are infrastructure collaborators.
//! This trait is the seam between them: domain code calls through it, and
//! an infrastructure adapter supplies the concrete transform.

use crate::error::XmlEncError;
use crate::transform::binary_transform::BinaryTransform;

pub trait TransformFactory {
    /// Builds the transform for an `EncryptionMethod` algorithm URI (e.g.
    /// `http://www.w3.org/2001/04/xmlenc#aes128-cbc`).
    fn create_method_transform(&self, algorithm_uri: &str) -> Result<Box<dyn BinaryTransform>, XmlEncError>;

    fn base64_encode(&self) -> Box<dyn BinaryTransform>;
    fn base64_decode(&self) -> Box<dyn BinaryTransform>;
    fn memory_sink(&self) -> Box<dyn BinaryTransform>;

    /// Builds a source transform that reads from `uri` (local file path or
    /// `data:` URI -- no network I/O).
    fn input_uri(&self, uri: &str) -> Result<Box<dyn BinaryTransform>, XmlEncError>;
}
