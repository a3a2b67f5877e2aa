//! Block representation helpers.

use crate::{BLOCK_SIZE, HALF_BLOCK};

/// Cipher block of 16 bytes.
pub type Block = [u8; BLOCK_SIZE];

/// One Feistel half of a block.
pub type HalfBlock = [u8; HALF_BLOCK];

/// XORs `rhs` into `dst`, stopping at the shorter of the two.
#[inline]
pub fn xor_in_place(dst: &mut [u8], rhs: &[u8]) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Splits a block into its left and right halves.
#[inline]
pub(crate) fn split(block: &Block) -> (HalfBlock, HalfBlock) {
    let mut left = [0u8; HALF_BLOCK];
    let mut right = [0u8; HALF_BLOCK];
    left.copy_from_slice(&block[..HALF_BLOCK]);
    right.copy_from_slice(&block[HALF_BLOCK..]);
    (left, right)
}

/// Joins two halves into a block, `first` occupying the low indices.
#[inline]
pub(crate) fn join(first: &HalfBlock, second: &HalfBlock) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    block[..HALF_BLOCK].copy_from_slice(first);
    block[HALF_BLOCK..].copy_from_slice(second);
    block
}
