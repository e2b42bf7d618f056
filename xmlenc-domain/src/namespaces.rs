// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Protocol constants for XML Encryption: namespace URIs, element tag
//! names, and attribute names shared by the grammar reader, builders, and
//! writers.

/// `http://www.w3.org/2001/04/xmlenc#`
pub const ENC_NS: &str = "http://www.w3.org/2001/04/xmlenc#";

/// `http://www.w3.org/2000/09/xmldsig#`
pub const DSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// `Type` URI meaning "plaintext is a well-formed element subtree".
pub const TYPE_ELEMENT: &str = "http://www.w3.org/2001/04/xmlenc#Element";

/// `Type` URI meaning "plaintext is a sequence of children".
pub const TYPE_CONTENT: &str = "http://www.w3.org/2001/04/xmlenc#Content";

pub const TAG_ENCRYPTED_DATA: &str = "EncryptedData";
pub const TAG_ENCRYPTION_METHOD: &str = "EncryptionMethod";
pub const TAG_KEY_INFO: &str = "KeyInfo";
pub const TAG_CIPHER_DATA: &str = "CipherData";
pub const TAG_CIPHER_VALUE: &str = "CipherValue";
pub const TAG_CIPHER_REFERENCE: &str = "CipherReference";
pub const TAG_TRANSFORMS: &str = "Transforms";
pub const TAG_TRANSFORM: &str = "Transform";
pub const TAG_ENCRYPTION_PROPERTIES: &str = "EncryptionProperties";
pub const TAG_ENCRYPTION_PROPERTY: &str = "EncryptionProperty";

pub const ATTR_ID: &str = "Id";
pub const ATTR_TYPE: &str = "Type";
pub const ATTR_MIME_TYPE: &str = "MimeType";
pub const ATTR_ENCODING: &str = "Encoding";
pub const ATTR_ALGORITHM: &str = "Algorithm";
pub const ATTR_URI: &str = "URI";
