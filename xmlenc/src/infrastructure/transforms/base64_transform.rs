// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Base64 codec transforms. Unlike the cipher, these really are streaming:
//! `write` encodes/decodes as much of the buffered input as divides evenly
//! into a codec group, leaving the remainder for the next `write` or for
//! `flush` to finish off.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use xmlenc_domain::error::XmlEncError;
use xmlenc_domain::transform::BinaryTransform;

#[derive(Debug, Default)]
pub struct Base64EncodeTransform {
    pending: Vec<u8>,
    output: Vec<u8>,
    output_pos: usize,
}

impl Base64EncodeTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BinaryTransform for Base64EncodeTransform {
    fn write(&mut self, data: &[u8]) -> Result<(), XmlEncError> {
        self.pending.extend_from_slice(data);
        let whole_groups = (self.pending.len() / 3) * 3;
        if whole_groups > 0 {
            let rest = self.pending.split_off(whole_groups);
            self.output.extend(STANDARD.encode(&self.pending).into_bytes());
            self.pending = rest;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), XmlEncError> {
        if !self.pending.is_empty() {
            self.output.extend(STANDARD.encode(&self.pending).into_bytes());
            self.pending.clear();
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> Result<usize, XmlEncError> {
        if self.output_pos >= self.output.len() {
            return Ok(0);
        }
        let n = self.output.len() - self.output_pos;
        buf.extend_from_slice(&self.output[self.output_pos..]);
        self.output_pos = self.output.len();
        Ok(n)
    }
}

#[derive(Debug, Default)]
pub struct Base64DecodeTransform {
    pending: Vec<u8>,
    output: Vec<u8>,
    output_pos: usize,
}

impl Base64DecodeTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BinaryTransform for Base64DecodeTransform {
    fn write(&mut self, data: &[u8]) -> Result<(), XmlEncError> {
        self.pending.extend(data.iter().copied().filter(|b| !b.is_ascii_whitespace()));
        let whole_groups = (self.pending.len() / 4) * 4;
        if whole_groups > 0 {
            let rest = self.pending.split_off(whole_groups);
            let decoded = STANDARD
                .decode(&self.pending)
                .map_err(|e| XmlEncError::transform_failure(format!("base64 decode failed: {e}")))?;
            self.output.extend(decoded);
            self.pending = rest;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), XmlEncError> {
        if !self.pending.is_empty() {
            let decoded = STANDARD
                .decode(&self.pending)
                .map_err(|e| XmlEncError::transform_failure(format!("base64 decode failed: {e}")))?;
            self.output.extend(decoded);
            self.pending.clear();
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> Result<usize, XmlEncError> {
        if self.output_pos >= self.output.len() {
            return Ok(0);
        }
        let n = self.output.len() - self.output_pos;
        buf.extend_from_slice(&self.output[self.output_pos..]);
        self.output_pos = self.output.len();
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_recovers_input_across_writes() {
        let mut enc = Base64EncodeTransform::new();
        enc.write(b"hel").unwrap();
        enc.write(b"lo world").unwrap();
        enc.flush().unwrap();
        let mut encoded = Vec::new();
        while enc.read(&mut encoded).unwrap() != 0 {}

        let mut dec = Base64DecodeTransform::new();
        dec.write(&encoded[..5]).unwrap();
        dec.write(&encoded[5..]).unwrap();
        dec.flush().unwrap();
        let mut decoded = Vec::new();
        while dec.read(&mut decoded).unwrap() != 0 {}
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let mut dec = Base64DecodeTransform::new();
        dec.write(b"not-valid-base64!!!!").unwrap();
        assert!(dec.flush().is_err());
    }
}
