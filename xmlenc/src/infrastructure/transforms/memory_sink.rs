// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The tail-of-pipeline memory sink: accumulates everything written to it
//! and hands the buffer back on demand.

use xmlenc_domain::error::XmlEncError;
use xmlenc_domain::transform::BinaryTransform;

#[derive(Debug, Default)]
pub struct MemorySinkTransform {
    buffer: Vec<u8>,
    taken: bool,
}

impl MemorySinkTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the accumulated bytes, leaving the sink empty. Mirrors the
    /// "1-arg flavor that removes the buffer from the sink" the encrypt
    /// driver uses so the sink doesn't also try to own/free it.
    pub fn take_buffer(&mut self) -> Vec<u8> {
        self.taken = true;
        std::mem::take(&mut self.buffer)
    }
}

impl BinaryTransform for MemorySinkTransform {
    fn write(&mut self, data: &[u8]) -> Result<(), XmlEncError> {
        if !self.taken {
            self.buffer.extend_from_slice(data);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), XmlEncError> {
        Ok(())
    }

    /// Drains the accumulated buffer the same way the codec transforms
    /// drain their output: a `Pipeline::read_to_end()` against a pipeline
    /// whose tail is this sink is how the driver recovers the sink's bytes
    /// without needing to downcast the trait object.
    fn read(&mut self, buf: &mut Vec<u8>) -> Result<usize, XmlEncError> {
        if self.taken || self.buffer.is_empty() {
            return Ok(0);
        }
        let n = self.buffer.len();
        buf.extend_from_slice(&self.buffer);
        self.take_buffer();
        Ok(n)
    }
}
