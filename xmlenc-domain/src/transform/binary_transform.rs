// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The `BinaryTransform` contract.
//!
//! Concrete transforms (ciphers, base64 codec, memory sink, URI source)
//! are infrastructure collaborators that implement this trait; domain code
//! only ever drives them through it.

use crate::error::XmlEncError;

/// Capability a transform must advertise to be chainable in a
/// [`crate::transform::Pipeline`]. Kept as an enum in case a non-binary
/// (e.g. node-set) transform kind is ever added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformCapability {
    Binary,
}

/// A streaming byte processor: cipher, codec, sink, or source.
///
/// Data flows through a chain of these via [`crate::transform::Pipeline`]:
/// `write` pushes input and the transform computes whatever output it can;
/// `flush` is the end-of-stream barrier; `read` pulls already-computed
/// output, appending into a growable buffer instead of a fixed scratch
/// slice, and returning `0` once drained.
pub trait BinaryTransform: std::fmt::Debug {
    fn capability(&self) -> TransformCapability {
        TransformCapability::Binary
    }

    /// `true` for encrypt/encode direction, `false` for decrypt/decode.
    fn set_direction(&mut self, _encrypt: bool) {}

    /// Installs key material. Codec/sink transforms ignore this (default
    /// no-op); cipher transforms must override it.
    fn add_key(&mut self, _key: &[u8]) -> Result<(), XmlEncError> {
        Ok(())
    }

    /// Pushes input bytes for processing.
    fn write(&mut self, data: &[u8]) -> Result<(), XmlEncError>;

    /// Signals end-of-stream; the transform finalizes any buffered state
    /// (padding, authentication tag, trailing base64 group).
    fn flush(&mut self) -> Result<(), XmlEncError>;

    /// Appends whatever output is ready to `buf`, returning how many bytes
    /// were appended. Returns `Ok(0)` once the transform is drained.
    fn read(&mut self, buf: &mut Vec<u8>) -> Result<usize, XmlEncError>;

    /// Key type URI this transform requires when used for encryption, if
    /// any (used by grammar-step key resolution).
    fn enc_key_type(&self) -> Option<&str> {
        None
    }

    /// Key type URI this transform requires when used for decryption.
    fn dec_key_type(&self) -> Option<&str> {
        None
    }

    /// Key identifier hint the transform can supply toward `KeyRequest`.
    fn key_id(&self) -> Option<&str> {
        None
    }
}
