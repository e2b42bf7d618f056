// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Infrastructure layer: everything that touches the outside world -- XML
//! parsing/serialization, ciphers, files -- behind the domain's ports.

pub mod key_manager;
pub mod transform_factory;
pub mod transforms;
pub mod xml_dom;

pub use key_manager::{KeyNameWriter, StaticKeyManager};
pub use transform_factory::StandardTransformFactory;
