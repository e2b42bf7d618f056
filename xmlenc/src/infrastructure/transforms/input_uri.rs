// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The `InputUri` source transform: the one transform that is a reader
//! rather than a writer. Prepended onto the head of an encrypt pipeline so
//! the driver can pull bytes from a local file or an inline `data:` URI
//! instead of a caller-supplied buffer.

use std::fs::File;
use std::io::Read as _;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use xmlenc_domain::error::XmlEncError;
use xmlenc_domain::transform::BinaryTransform;

const READ_CHUNK: usize = 1024;

#[derive(Debug)]
enum Source {
    File(File),
    Memory { bytes: Vec<u8>, pos: usize },
}

/// Resolves a `CipherReference/@URI` or encrypt-by-URI argument to bytes.
///
/// Supports `file://` and bare paths (read from local disk) and `data:`
/// URIs with a `;base64,` payload (decoded inline, no I/O at all). No other
/// scheme is supported -- this engine never reaches across the network
/// for a reference.
#[derive(Debug)]
pub struct InputUriTransform {
    source: Source,
}

impl InputUriTransform {
    pub fn new(uri: &str) -> Result<Self, XmlEncError> {
        let source = if let Some(data) = uri.strip_prefix("data:") {
            let (_mime, payload) = data
                .split_once(',')
                .ok_or_else(|| XmlEncError::invalid_data(format!("malformed data URI: {uri}")))?;
            if !data.contains(";base64,") {
                return Err(XmlEncError::invalid_data(format!("unsupported data URI encoding: {uri}")));
            }
            let bytes = STANDARD
                .decode(payload)
                .map_err(|e| XmlEncError::invalid_data(format!("malformed base64 data URI: {e}")))?;
            Source::Memory { bytes, pos: 0 }
        } else {
            let path = uri.strip_prefix("file://").unwrap_or(uri);
            let file = File::open(path)
                .map_err(|e| XmlEncError::invalid_data(format!("cannot open InputUri target {path}: {e}")))?;
            Source::File(file)
        };
        Ok(Self { source })
    }
}

impl BinaryTransform for InputUriTransform {
    fn write(&mut self, _data: &[u8]) -> Result<(), XmlEncError> {
        Err(XmlEncError::transform_failure("InputUri is a source transform and cannot be written to"))
    }

    fn flush(&mut self) -> Result<(), XmlEncError> {
        Ok(())
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> Result<usize, XmlEncError> {
        match &mut self.source {
            Source::File(file) => {
                let mut chunk = vec![0u8; READ_CHUNK];
                let n = file
                    .read(&mut chunk)
                    .map_err(|e| XmlEncError::transform_failure(format!("InputUri read failed: {e}")))?;
                buf.extend_from_slice(&chunk[..n]);
                Ok(n)
            }
            Source::Memory { bytes, pos } => {
                if *pos >= bytes.len() {
                    return Ok(0);
                }
                let end = (*pos + READ_CHUNK).min(bytes.len());
                buf.extend_from_slice(&bytes[*pos..end]);
                let n = end - *pos;
                *pos = end;
                Ok(n)
            }
        }
    }
}
