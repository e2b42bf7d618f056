// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Encrypt/decrypt drivers built on top of the domain's grammar reader and
//! this crate's concrete transforms and XML adapter.

pub mod decrypt_service;
pub mod encrypt_service;

pub use decrypt_service::decrypt;
pub use encrypt_service::{encrypt_memory, encrypt_node, encrypt_uri};
