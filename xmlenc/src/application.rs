// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Application layer: the encrypt/decrypt drivers that orchestrate the
//! domain's grammar reader against infrastructure collaborators.

pub mod services;

pub use services::{decrypt, encrypt_memory, encrypt_node, encrypt_uri};
