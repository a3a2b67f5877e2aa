//! Hash-based Feistel block cipher primitive.
//!
//! This crate provides the single-block layer of the cipher:
//! - Password key derivation behind the [`KeyDerivation`] trait.
//! - A hash-chained round-key schedule.
//! - A 16-round Feistel transform whose round function is a truncated hash.
//!
//! The same transform encrypts and decrypts; direction is selected purely by
//! the order of the round keys handed to it.
//!
//! This is a teaching construction. Each round injects only
//! [`ROUND_KEY_SIZE`] bytes of key material and the default key derivation is
//! plain iterated hashing; neither should be relied upon for real secrecy.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
mod hash;
mod kdf;
mod key;
mod round;

pub use crate::block::{xor_in_place, Block, HalfBlock};
pub use crate::cipher::{expand_key, transform, transform_block};
pub use crate::error::{CipherError, Result};
pub use crate::hash::fit_digest;
pub use crate::kdf::{Argon2Kdf, IteratedHash, KdfParams, KeyDerivation};
pub use crate::key::{MasterKey, RoundKey, RoundKeys, Salt};
pub use crate::round::round_function;

/// Re-exported so callers can name alternative hash primitives.
pub use sha2::{Digest, Sha256, Sha512};

/// Block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Size of each Feistel half in bytes.
pub const HALF_BLOCK: usize = BLOCK_SIZE / 2;

/// Master key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// Number of Feistel rounds.
pub const ROUNDS: usize = 16;

/// Bytes of key material per round.
pub const ROUND_KEY_SIZE: usize = KEY_SIZE / ROUNDS;

/// Default number of re-hash iterations applied by [`IteratedHash`].
pub const KDF_ITERATIONS: u32 = 10_000;

const _: () = assert!(BLOCK_SIZE % 2 == 0);
const _: () = assert!(ROUND_KEY_SIZE == 2);
