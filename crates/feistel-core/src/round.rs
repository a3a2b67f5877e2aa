//! Feistel round function.

use sha2::Digest;

use crate::block::HalfBlock;
use crate::hash::fit_digest;
use crate::key::RoundKey;
use crate::HALF_BLOCK;

/// Computes `F(right, key)`: the hash of `right || key`, truncated to a half
/// block.
#[inline]
pub fn round_function<H: Digest>(right: &HalfBlock, key: &RoundKey) -> HalfBlock {
    let mut hasher = H::new();
    hasher.update(right);
    hasher.update(key);
    let digest = hasher.finalize();
    let mut out = [0u8; HALF_BLOCK];
    fit_digest(&digest, &mut out);
    out
}
