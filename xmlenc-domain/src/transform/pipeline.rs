// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! An owned, index-addressed chain of transforms.
//!
//! Backed by a plain `Vec<Box<dyn BinaryTransform>>` rather than an
//! intrusive linked list: "transfer a transform to another owner" (the
//! `CipherReference` case in the decrypt driver) is just `Vec::drain` into
//! the destination's vector.

use crate::error::XmlEncError;
use crate::transform::binary_transform::{BinaryTransform, TransformCapability};

/// A non-empty-by-convention chain of transforms, driven either
/// write-at-head (encrypt, `CipherValue` decrypt) or read-at-tail
/// (`InputUri` encrypt).
#[derive(Debug, Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn BinaryTransform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { transforms: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Links `t` after the current tail. Fails if `t` isn't `Binary`.
    pub fn append(&mut self, t: Box<dyn BinaryTransform>) -> Result<(), XmlEncError> {
        Self::check_binary(&*t)?;
        self.transforms.push(t);
        Ok(())
    }

    /// Links `t` before the current head. Fails if `t` isn't `Binary`.
    pub fn prepend(&mut self, t: Box<dyn BinaryTransform>) -> Result<(), XmlEncError> {
        Self::check_binary(&*t)?;
        self.transforms.insert(0, t);
        Ok(())
    }

    fn check_binary(t: &dyn BinaryTransform) -> Result<(), XmlEncError> {
        match t.capability() {
            TransformCapability::Binary => Ok(()),
        }
    }

    pub fn head(&self) -> Option<&dyn BinaryTransform> {
        self.transforms.first().map(|b| b.as_ref())
    }

    pub fn head_mut(&mut self) -> Option<&mut (dyn BinaryTransform + 'static)> {
        self.transforms.first_mut().map(|b| b.as_mut())
    }

    /// Installs key material on the transform at `index` (the method
    /// transform is always index 0 per the grammar reader).
    pub fn set_key_at(&mut self, index: usize, key: &[u8]) -> Result<(), XmlEncError> {
        match self.transforms.get_mut(index) {
            Some(t) => t.add_key(key),
            None => Err(XmlEncError::InternalMissingTransform(index)),
        }
    }

    pub fn set_direction_at(&mut self, index: usize, encrypt: bool) {
        if let Some(t) = self.transforms.get_mut(index) {
            t.set_direction(encrypt);
        }
    }

    /// Pushes `data` through the head, letting each transform's output
    /// feed the next transform's input in turn.
    pub fn write(&mut self, data: &[u8]) -> Result<(), XmlEncError> {
        self.write_from(0, data)
    }

    /// Pushes the end-of-stream marker through the head; a totally ordered
    /// barrier -- no transform may emit output depending on
    /// later input once this returns.
    pub fn flush(&mut self) -> Result<(), XmlEncError> {
        self.flush_from(0)
    }

    fn write_from(&mut self, start: usize, data: &[u8]) -> Result<(), XmlEncError> {
        let mut current = data.to_vec();
        let len = self.transforms.len();
        for i in start..len {
            self.transforms[i].write(&current)?;
            if i + 1 < len {
                current = Self::drain(self.transforms[i].as_mut())?;
            }
        }
        Ok(())
    }

    fn flush_from(&mut self, start: usize) -> Result<(), XmlEncError> {
        let len = self.transforms.len();
        for i in start..len {
            self.transforms[i].flush()?;
            if i + 1 < len {
                let out = Self::drain(self.transforms[i].as_mut())?;
                self.transforms[i + 1].write(&out)?;
            }
        }
        Ok(())
    }

    /// Read-driven mode for the `InputUri` encrypt path: the head is a
    /// source, not a writer, so bytes originate by pulling from it rather
    /// than being pushed in. Pulls chunks from the head until it reports
    /// end-of-stream, forwarding each chunk into the rest of the chain, then
    /// flushes everything downstream of the head.
    pub fn pull_through(&mut self) -> Result<(), XmlEncError> {
        loop {
            let mut chunk = Vec::new();
            let n = match self.transforms.first_mut() {
                Some(head) => head.read(&mut chunk)?,
                None => 0,
            };
            if n == 0 {
                break;
            }
            self.write_from(1, &chunk)?;
        }
        self.flush_from(1)
    }

    /// Pulls from the tail, appending to `buf`. Returns `0` when drained.
    pub fn read(&mut self, buf: &mut Vec<u8>) -> Result<usize, XmlEncError> {
        match self.transforms.last_mut() {
            Some(t) => t.read(buf),
            None => Ok(0),
        }
    }

    /// Loops `read` until drained; the `InputUri` encrypt path relies on
    /// reading to EOF rather than a single bounded read.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>, XmlEncError> {
        let mut out = Vec::new();
        loop {
            if self.read(&mut out)? == 0 {
                break;
            }
        }
        Ok(out)
    }

    fn drain(t: &mut dyn BinaryTransform) -> Result<Vec<u8>, XmlEncError> {
        let mut out = Vec::new();
        loop {
            if t.read(&mut out)? == 0 {
                break;
            }
        }
        Ok(out)
    }

    /// Moves every transform from `self` onto the end of `dest`, front to
    /// back, the way a decrypt-by-reference handoff gives a freshly built
    /// `InputUri`/codec chain to the caller's own pipeline.
    pub fn transfer_into(&mut self, dest: &mut Pipeline) {
        dest.transforms.extend(self.transforms.drain(..));
    }

    /// Drops every owned transform. Rust's ownership already guarantees
    /// this on scope exit; this method exists so error paths can release
    /// transforms (and whatever state/memory they hold) before surfacing
    /// the error.
    pub fn destroy(&mut self) {
        self.transforms.clear();
    }
}
