// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Key resolution backed by a local key file rather than a PKI or HSM. Keys
//! are looked up by `KeyRequest::key_id`; a key file with no id keyed to it
//! serves as the default used when the caller asks to encrypt without
//! naming a `KeyInfo`.

use std::collections::HashMap;
use std::fs;

use xmlenc_domain::namespaces::DSIG_NS;
use xmlenc_domain::services::{KeyInfoWriter, KeyManager};
use xmlenc_domain::value_objects::{Key, KeyOrigin, KeyRequest};
use xmlenc_domain::xml::Element;

const DEFAULT_KEY_ID: &str = "default";

/// Loads hex-encoded `key-id=hex-bytes` lines from a key file into memory.
#[derive(Debug, Default)]
pub struct StaticKeyManager {
    keys: HashMap<String, Vec<u8>>,
}

impl StaticKeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.keys.insert(key_id.into(), bytes);
        self
    }

    /// Parses a key file of `key_id=hex` lines (blank lines and `#` comments
    /// ignored). A line with no `=` is treated as the bare default key.
    pub fn from_file(path: &str) -> Result<Self, xmlenc_domain::error::XmlEncError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            xmlenc_domain::error::XmlEncError::invalid_data(format!("cannot read key file {path}: {e}"))
        })?;
        let mut manager = Self::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key_id, hex_str) = line.split_once('=').unwrap_or((DEFAULT_KEY_ID, line));
            let bytes = hex::decode(hex_str.trim()).map_err(|e| {
                xmlenc_domain::error::XmlEncError::invalid_data(format!("malformed hex key for {key_id}: {e}"))
            })?;
            manager = manager.with_key(key_id.trim(), bytes);
        }
        Ok(manager)
    }
}

impl KeyManager for StaticKeyManager {
    fn get_key(&self, key_info: Option<&Element>, request: &KeyRequest) -> Option<Key> {
        let key_id = request
            .key_id
            .clone()
            .or_else(|| key_info.and_then(key_name_from_key_info))
            .unwrap_or_else(|| DEFAULT_KEY_ID.to_string());
        let bytes = self.keys.get(&key_id)?.clone();
        Some(Key::new(bytes, KeyOrigin::KeyManager { key_id: Some(key_id) }))
    }
}

fn key_name_from_key_info(key_info: &Element) -> Option<String> {
    key_info.find_child("KeyName").map(|e| e.text_content())
}

/// Records which key id served a request by writing a `dsig:KeyName` child
/// into `KeyInfo`, so a later decrypt can look the same key up again.
#[derive(Debug, Default)]
pub struct KeyNameWriter;

impl KeyNameWriter {
    pub fn new() -> Self {
        Self
    }
}

impl KeyInfoWriter for KeyNameWriter {
    fn write(&self, key_info: &mut Element, request: &KeyRequest, key: &Key) {
        let key_id = request
            .key_id
            .clone()
            .or_else(|| match &key.origin {
                KeyOrigin::KeyManager { key_id } => key_id.clone(),
                KeyOrigin::Supplied => None,
            })
            .unwrap_or_else(|| DEFAULT_KEY_ID.to_string());
        let mut key_name = Element::new("KeyName", Some(DSIG_NS));
        key_name.set_text(key_id);
        key_info.append_child(key_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlenc_domain::value_objects::KeyUsage;

    #[test]
    fn resolves_default_key_when_request_names_none() {
        let manager = StaticKeyManager::new().with_key(DEFAULT_KEY_ID, vec![1, 2, 3]);
        let request = KeyRequest { key_type: "aes".into(), key_usage: KeyUsage::Encrypt, key_id: None };
        let key = manager.get_key(None, &request).unwrap();
        assert_eq!(key.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn resolves_named_key_from_key_info() {
        let manager = StaticKeyManager::new().with_key("alice", vec![9, 9]);
        let mut key_info = Element::new("KeyInfo", Some(DSIG_NS));
        let mut key_name = Element::new("KeyName", Some(DSIG_NS));
        key_name.set_text("alice");
        key_info.append_child(key_name);
        let request = KeyRequest { key_type: "aes".into(), key_usage: KeyUsage::Decrypt, key_id: None };
        let key = manager.get_key(Some(&key_info), &request).unwrap();
        assert_eq!(key.bytes(), &[9, 9]);
    }

    #[test]
    fn missing_key_id_resolves_to_none() {
        let manager = StaticKeyManager::new();
        let request = KeyRequest { key_type: "aes".into(), key_usage: KeyUsage::Encrypt, key_id: Some("nope".into()) };
        assert!(manager.get_key(None, &request).is_none());
    }

    #[test]
    fn writer_records_key_id_as_key_name() {
        let writer = KeyNameWriter::new();
        let mut key_info = Element::new("KeyInfo", Some(DSIG_NS));
        let key = Key::new(vec![1], KeyOrigin::KeyManager { key_id: Some("bob".into()) });
        let request = KeyRequest { key_type: "aes".into(), key_usage: KeyUsage::Encrypt, key_id: None };
        writer.write(&mut key_info, &request, &key);
        assert_eq!(key_info.find_child("KeyName").unwrap().text_content(), "bob");
    }
}
