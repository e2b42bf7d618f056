// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Concrete `BinaryTransform` implementations.

pub mod base64_transform;
pub mod cipher_transform;
pub mod input_uri;
pub mod memory_sink;

pub use base64_transform::{Base64DecodeTransform, Base64EncodeTransform};
pub use cipher_transform::AeadCipherTransform;
pub use input_uri::InputUriTransform;
pub use memory_sink::MemorySinkTransform;
