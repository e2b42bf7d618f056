// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end encrypt/decrypt scenarios against real documents: a memory
//! round trip, a `CipherReference` pointing at a file on disk, element and
//! content splicing, and the two required failure paths (missing method,
//! wrong key).

use std::io::Write as _;

use xmlenc::infrastructure::transform_factory::StandardTransformFactory;
use xmlenc::{decrypt, encrypt_memory, encrypt_node, Element, Key, KeyOrigin, ProcessingContext, XmlEncError};
use xmlenc_domain::builders;
use xmlenc_domain::namespaces::TYPE_ELEMENT;
use xmlenc_domain::services::KeyManager;
use xmlenc_domain::value_objects::KeyRequest;

const AES128_CBC: &str = "http://www.w3.org/2001/04/xmlenc#aes128-cbc";

/// Never consulted in these scenarios: every key arrives as `preset_key`,
/// which bypasses key-manager resolution entirely.
struct UnusedKeyManager;
impl KeyManager for UnusedKeyManager {
    fn get_key(&self, _key_info: Option<&Element>, _request: &KeyRequest) -> Option<Key> {
        None
    }
}

fn zero_key() -> Key {
    Key::new(vec![0u8; 16], KeyOrigin::Supplied)
}

#[test]
fn s1_aes128_cbc_memory_round_trip() {
    let key_manager = UnusedKeyManager;
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory);

    let mut template = builders::create(None, None, None, None);
    builders::add_encryption_method(&mut template, AES128_CBC).unwrap();

    let encrypted = encrypt_memory(&mut template, &ctx, Some(zero_key()), b"hello world").unwrap();
    assert!(encrypted.buffer.is_some());
    let cipher_value = template.find_child("CipherData").unwrap().find_child("CipherValue").unwrap();
    assert!(!cipher_value.text_content().trim().is_empty());

    let mut decrypt_tree = template.clone();
    let result = decrypt(&mut decrypt_tree, &[], &ctx, Some(zero_key())).unwrap();
    assert_eq!(result.buffer.as_deref(), Some(b"hello world".as_slice()));
}

#[test]
fn s2_uri_cipher_reference_decrypt() {
    let key_manager = UnusedKeyManager;
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory);

    // Produce the base64-encoded, IV-prefixed ciphertext the same way S1
    // does; that text is exactly what a CipherReference target holds.
    let mut source = builders::create(None, None, None, None);
    builders::add_encryption_method(&mut source, AES128_CBC).unwrap();
    let encrypted = encrypt_memory(&mut source, &ctx, Some(zero_key()), b"hello world").unwrap();

    let mut data_file = tempfile::NamedTempFile::new().unwrap();
    data_file.write_all(&encrypted.buffer.unwrap()).unwrap();
    let data_path = data_file.path().to_str().unwrap().to_string();

    let mut template = builders::create(None, None, None, None);
    builders::add_encryption_method(&mut template, AES128_CBC).unwrap();
    builders::add_cipher_reference(&mut template, Some(&data_path)).unwrap();
    builders::add_cipher_reference_transform(&mut template, "http://www.w3.org/2000/09/xmldsig#base64").unwrap();

    let result = decrypt(&mut template, &[], &ctx, Some(zero_key())).unwrap();
    assert_eq!(result.buffer.as_deref(), Some(b"hello world".as_slice()));
}

#[test]
fn s3_element_splice_round_trip() {
    let key_manager = UnusedKeyManager;
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory);

    let mut root = Element::new("root", None);
    let mut secret = Element::new("secret", None);
    secret.set_text("42");
    root.append_child(secret);

    let mut template = builders::create(None, Some(TYPE_ELEMENT), None, None);
    builders::add_encryption_method(&mut template, AES128_CBC).unwrap();
    let encrypt_result = encrypt_node(&mut root, &[0], template, &ctx, Some(zero_key())).unwrap();
    assert!(encrypt_result.replaced);
    let encrypted_child = root.first_element_child().unwrap();
    assert_eq!(encrypted_child.name, "EncryptedData");

    let decrypt_result = decrypt(&mut root, &[0], &ctx, Some(zero_key())).unwrap();
    assert!(decrypt_result.replaced);
    let recovered = root.first_element_child().unwrap();
    assert_eq!(recovered.name, "secret");
    assert_eq!(recovered.text_content(), "42");
}

#[test]
fn s4_content_splice_round_trip() {
    let key_manager = UnusedKeyManager;
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory);

    let mut root = Element::new("root", None);
    let mut secret = Element::new("secret", None);
    secret.set_text("42");
    root.append_child(secret);

    let mut template = builders::create(None, Some(xmlenc_domain::namespaces::TYPE_CONTENT), None, None);
    builders::add_encryption_method(&mut template, AES128_CBC).unwrap();
    let encrypt_result = encrypt_node(&mut root, &[0], template, &ctx, Some(zero_key())).unwrap();
    assert!(encrypt_result.replaced);

    let secret_after_encrypt = root.first_element_child().unwrap();
    assert_eq!(secret_after_encrypt.name, "secret");
    let wrapped = secret_after_encrypt.first_element_child().unwrap();
    assert_eq!(wrapped.name, "EncryptedData");

    let decrypt_result = decrypt(&mut root, &[0, 0], &ctx, Some(zero_key())).unwrap();
    assert!(decrypt_result.replaced);
    let secret_after_decrypt = root.first_element_child().unwrap();
    assert_eq!(secret_after_decrypt.name, "secret");
    assert_eq!(secret_after_decrypt.text_content(), "42");
}

#[test]
fn s5_missing_method_and_no_default_is_invalid_data() {
    let key_manager = UnusedKeyManager;
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory);

    let mut template = builders::create(None, None, None, None);
    let err = encrypt_memory(&mut template, &ctx, Some(zero_key()), b"hello world").unwrap_err();
    assert!(matches!(err, XmlEncError::InvalidData(_)));
}

#[test]
fn s6_wrong_key_fails_transform() {
    let key_manager = UnusedKeyManager;
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory);

    let mut template = builders::create(None, None, None, None);
    builders::add_encryption_method(&mut template, AES128_CBC).unwrap();
    encrypt_memory(&mut template, &ctx, Some(zero_key()), b"hello world").unwrap();

    let wrong_key = Key::new(vec![1u8; 16], KeyOrigin::Supplied);
    let err = decrypt(&mut template, &[], &ctx, Some(wrong_key)).unwrap_err();
    assert!(matches!(err, XmlEncError::TransformFailure(_)));
}
