// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

mod key;

pub use key::{Key, KeyOrigin, KeyRequest, KeyUsage};
