//! Narrow keyed-hash capability used by every KDF in this crate.
//!
//! An engine is created already keyed (see `Algorithm::engine`).  After
//! `finalize` the engine is reset to its freshly keyed state so it can
//! be reused for the next message under the same key.

use hmac::digest::{FixedOutputReset, OutputSizeUser};
use hmac::Mac;

/// A keyed HMAC instance: feed bytes in, take a tag out.
pub trait HmacEngine: Send {
    /// Absorb `data` into the running MAC state.
    fn update(&mut self, data: &[u8]);

    /// Produce the tag for everything absorbed so far and reset.
    fn finalize(&mut self) -> Vec<u8>;

    /// Size of the tags this engine produces, in bytes.
    fn tag_len(&self) -> usize;
}

impl<M> HmacEngine for M
where
    M: Mac + FixedOutputReset + Send,
{
    fn update(&mut self, data: &[u8]) {
        Mac::update(self, data);
    }

    fn finalize(&mut self) -> Vec<u8> {
        Mac::finalize_reset(self).into_bytes().to_vec()
    }

    fn tag_len(&self) -> usize {
        <M as OutputSizeUser>::output_size()
    }
}
