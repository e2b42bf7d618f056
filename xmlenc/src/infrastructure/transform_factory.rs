// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The concrete [`TransformFactory`] wiring method URIs to cipher transforms
//! and providing the codec/sink/source transforms the grammar reader and
//! application services attach around them.

use xmlenc_domain::error::XmlEncError;
use xmlenc_domain::transform::{BinaryTransform, TransformFactory};

use crate::infrastructure::transforms::{
    AeadCipherTransform, Base64DecodeTransform, Base64EncodeTransform, InputUriTransform, MemorySinkTransform,
};

#[derive(Debug, Default)]
pub struct StandardTransformFactory;

impl StandardTransformFactory {
    pub fn new() -> Self {
        Self
    }
}

impl TransformFactory for StandardTransformFactory {
    fn create_method_transform(&self, algorithm_uri: &str) -> Result<Box<dyn BinaryTransform>, XmlEncError> {
        Ok(Box::new(AeadCipherTransform::new(algorithm_uri)?))
    }

    fn base64_encode(&self) -> Box<dyn BinaryTransform> {
        Box::new(Base64EncodeTransform::new())
    }

    fn base64_decode(&self) -> Box<dyn BinaryTransform> {
        Box::new(Base64DecodeTransform::new())
    }

    fn memory_sink(&self) -> Box<dyn BinaryTransform> {
        Box::new(MemorySinkTransform::new())
    }

    fn input_uri(&self, uri: &str) -> Result<Box<dyn BinaryTransform>, XmlEncError> {
        Ok(Box::new(InputUriTransform::new(uri)?))
    }
}
