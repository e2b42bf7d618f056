// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The cipher transform: the one `BinaryTransform` the engine cannot do
//! without. AEAD (AES-GCM / ChaCha20-Poly1305) stands in for the block
//! ciphers the wire algorithm URIs name -- see [`AeadAlgorithm::from_uri`]
//! for the substitution table.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::ChaCha20Poly1305;

use xmlenc_domain::error::XmlEncError;
use xmlenc_domain::transform::BinaryTransform;

/// The concrete AEAD algorithm a method URI resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeadAlgorithm {
    Aes128Gcm,
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl AeadAlgorithm {
    /// Resolves an `EncryptionMethod/@Algorithm` URI to a concrete AEAD
    /// cipher. The W3C URIs name block ciphers (AES-CBC); this engine has no
    /// block-cipher/MAC-then-encrypt implementation of its own, so it
    /// substitutes the AEAD construction with the matching key size and
    /// keeps the original URI as the method identifier on the wire.
    pub fn from_uri(uri: &str) -> Result<Self, XmlEncError> {
        if uri.ends_with("aes128-cbc") || uri.ends_with("aes128-gcm") {
            Ok(Self::Aes128Gcm)
        } else if uri.ends_with("aes256-cbc") || uri.ends_with("aes256-gcm") {
            Ok(Self::Aes256Gcm)
        } else if uri.ends_with("chacha20-poly1305") {
            Ok(Self::ChaCha20Poly1305)
        } else {
            Err(XmlEncError::invalid_data(format!("unsupported EncryptionMethod algorithm: {uri}")))
        }
    }

    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128Gcm => 16,
            Self::Aes256Gcm | Self::ChaCha20Poly1305 => 32,
        }
    }

    const NONCE_LEN: usize = 12;
}

fn encrypt_aes128_gcm(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, XmlEncError> {
    let cipher = Aes128Gcm::new_from_slice(key).map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    let nonce = Aes128Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    let mut out = nonce.to_vec();
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn decrypt_aes128_gcm(key: &[u8], data: &[u8]) -> Result<Vec<u8>, XmlEncError> {
    if data.len() < AeadAlgorithm::NONCE_LEN {
        return Err(XmlEncError::transform_failure("ciphertext shorter than nonce"));
    }
    let (nonce, ciphertext) = data.split_at(AeadAlgorithm::NONCE_LEN);
    let cipher = Aes128Gcm::new_from_slice(key).map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    cipher
        .decrypt(nonce.into(), ciphertext)
        .map_err(|e| XmlEncError::transform_failure(e.to_string()))
}

fn encrypt_aes256_gcm(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, XmlEncError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    let mut out = nonce.to_vec();
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn decrypt_aes256_gcm(key: &[u8], data: &[u8]) -> Result<Vec<u8>, XmlEncError> {
    if data.len() < AeadAlgorithm::NONCE_LEN {
        return Err(XmlEncError::transform_failure("ciphertext shorter than nonce"));
    }
    let (nonce, ciphertext) = data.split_at(AeadAlgorithm::NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    cipher
        .decrypt(nonce.into(), ciphertext)
        .map_err(|e| XmlEncError::transform_failure(e.to_string()))
}

fn encrypt_chacha20_poly1305(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, XmlEncError> {
    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    let mut out = nonce.to_vec();
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn decrypt_chacha20_poly1305(key: &[u8], data: &[u8]) -> Result<Vec<u8>, XmlEncError> {
    if data.len() < AeadAlgorithm::NONCE_LEN {
        return Err(XmlEncError::transform_failure("ciphertext shorter than nonce"));
    }
    let (nonce, ciphertext) = data.split_at(AeadAlgorithm::NONCE_LEN);
    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|e| XmlEncError::transform_failure(e.to_string()))?;
    cipher
        .decrypt(nonce.into(), ciphertext)
        .map_err(|e| XmlEncError::transform_failure(e.to_string()))
}

/// `BinaryTransform` adapter over the AEAD ciphers. Buffers input in full
/// (AEAD is not incremental the way a CBC transform would be) and produces
/// output on `flush`: `nonce || ciphertext` on encrypt, recovered plaintext
/// on decrypt.
#[derive(Debug)]
pub struct AeadCipherTransform {
    algorithm: AeadAlgorithm,
    method_uri: String,
    encrypt: bool,
    key: Vec<u8>,
    input: Vec<u8>,
    output: Vec<u8>,
    output_pos: usize,
    flushed: bool,
}

impl AeadCipherTransform {
    pub fn new(method_uri: impl Into<String>) -> Result<Self, XmlEncError> {
        let method_uri = method_uri.into();
        let algorithm = AeadAlgorithm::from_uri(&method_uri)?;
        Ok(Self {
            algorithm,
            method_uri,
            encrypt: true,
            key: Vec::new(),
            input: Vec::new(),
            output: Vec::new(),
            output_pos: 0,
            flushed: false,
        })
    }
}

impl BinaryTransform for AeadCipherTransform {
    fn set_direction(&mut self, encrypt: bool) {
        self.encrypt = encrypt;
    }

    fn add_key(&mut self, key: &[u8]) -> Result<(), XmlEncError> {
        if key.len() != self.algorithm.key_len() {
            return Err(XmlEncError::transform_failure(format!(
                "{} requires a {}-byte key, got {}",
                self.method_uri,
                self.algorithm.key_len(),
                key.len()
            )));
        }
        self.key = key.to_vec();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), XmlEncError> {
        self.input.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), XmlEncError> {
        if self.flushed {
            return Ok(());
        }
        self.flushed = true;
        if self.key.is_empty() {
            return Err(XmlEncError::transform_failure("no key installed"));
        }
        self.output = match (self.algorithm, self.encrypt) {
            (AeadAlgorithm::Aes128Gcm, true) => encrypt_aes128_gcm(&self.key, &self.input)?,
            (AeadAlgorithm::Aes128Gcm, false) => decrypt_aes128_gcm(&self.key, &self.input)?,
            (AeadAlgorithm::Aes256Gcm, true) => encrypt_aes256_gcm(&self.key, &self.input)?,
            (AeadAlgorithm::Aes256Gcm, false) => decrypt_aes256_gcm(&self.key, &self.input)?,
            (AeadAlgorithm::ChaCha20Poly1305, true) => encrypt_chacha20_poly1305(&self.key, &self.input)?,
            (AeadAlgorithm::ChaCha20Poly1305, false) => decrypt_chacha20_poly1305(&self.key, &self.input)?,
        };
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

    fn enc_key_type(&self) -> Option<&str> {
        Some(&self.method_uri)
    }

    fn dec_key_type(&self) -> Option<&str> {
        Some(&self.method_uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes128_gcm_round_trips() {
        let mut enc = AeadCipherTransform::new("http://www.w3.org/2001/04/xmlenc#aes128-cbc").unwrap();
        enc.set_direction(true);
        enc.add_key(&[0u8; 16]).unwrap();
        enc.write(b"hello world").unwrap();
        enc.flush().unwrap();
        let mut ciphertext = Vec::new();
        while enc.read(&mut ciphertext).unwrap() != 0 {}

        let mut dec = AeadCipherTransform::new("http://www.w3.org/2001/04/xmlenc#aes128-cbc").unwrap();
        dec.set_direction(false);
        dec.add_key(&[0u8; 16]).unwrap();
        dec.write(&ciphertext).unwrap();
        dec.flush().unwrap();
        let mut plaintext = Vec::new();
        while dec.read(&mut plaintext).unwrap() != 0 {}
        assert_eq!(plaintext, b"hello world");
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let mut enc = AeadCipherTransform::new("http://www.w3.org/2001/04/xmlenc#aes128-cbc").unwrap();
        enc.set_direction(true);
        enc.add_key(&[0u8; 16]).unwrap();
        enc.write(b"hello world").unwrap();
        enc.flush().unwrap();
        let mut ciphertext = Vec::new();
        while enc.read(&mut ciphertext).unwrap() != 0 {}

        let mut dec = AeadCipherTransform::new("http://www.w3.org/2001/04/xmlenc#aes128-cbc").unwrap();
        dec.set_direction(false);
        dec.add_key(&[1u8; 16]).unwrap();
        dec.write(&ciphertext).unwrap();
        assert!(dec.flush().is_err());
    }

    #[test]
    fn rejects_wrong_key_length() {
        let mut enc = AeadCipherTransform::new("http://www.w3.org/2001/04/xmlenc#aes256-cbc").unwrap();
        assert!(enc.add_key(&[0u8; 16]).is_err());
    }

    #[test]
    fn unsupported_algorithm_uri_is_rejected() {
        assert!(AeadCipherTransform::new("http://www.w3.org/2001/04/xmlenc#rsa-oaep-mgf1p").is_err());
    }
}
