//! Round-key schedule and the Feistel block transform.

use sha2::Digest;
use zeroize::Zeroize;

use crate::block::{join, split, xor_in_place, Block};
use crate::error::{CipherError, Result};
use crate::hash::fit_digest;
use crate::key::{MasterKey, RoundKeys};
use crate::round::round_function;
use crate::{ROUNDS, ROUND_KEY_SIZE};

/// Expands a master key into [`ROUNDS`] round keys by hash chaining.
///
/// Round `r` hashes the running chain value with `r` as a big-endian `u32`.
/// The round key is the first [`ROUND_KEY_SIZE`] bytes of that digest and the
/// full digest becomes the next chain value, so every key depends on all
/// earlier rounds.
pub fn expand_key<H: Digest>(key: &MasterKey) -> RoundKeys {
    let mut chain = key.as_bytes().to_vec();
    let mut round_keys = [[0u8; ROUND_KEY_SIZE]; ROUNDS];

    for (round, slot) in round_keys.iter_mut().enumerate() {
        let mut hasher = H::new();
        hasher.update(&chain);
        hasher.update((round as u32).to_be_bytes());
        let digest = hasher.finalize();
        fit_digest(&digest, slot);
        chain.clear();
        chain.extend_from_slice(&digest);
    }
    chain.zeroize();

    RoundKeys(round_keys)
}

/// Runs the Feistel network over one block.
///
/// Passing the schedule from [`expand_key`] encrypts; passing
/// [`RoundKeys::reversed`] decrypts. The halves are swapped once after the
/// last round on every call, which is what makes the reversed schedule
/// invert the forward one.
pub fn transform<H: Digest>(block: &Block, round_keys: &RoundKeys) -> Block {
    let (mut left, mut right) = split(block);

    for key in round_keys.iter() {
        let mut next_right = left;
        xor_in_place(&mut next_right, &round_function::<H>(&right, key));
        left = right;
        right = next_right;
    }

    join(&right, &left)
}

/// Slice-checked form of [`transform`].
///
/// # Errors
/// Returns [`CipherError::InvalidBlockSize`] unless `block` is exactly 16
/// bytes long.
pub fn transform_block<H: Digest>(block: &[u8], round_keys: &RoundKeys) -> Result<Block> {
    let block: &Block = block
        .try_into()
        .map_err(|_| CipherError::InvalidBlockSize { len: block.len() })?;
    Ok(transform::<H>(block, round_keys))
}
