//! Password key derivation.
//!
//! [`IteratedHash`] is the cipher's native derivation: one hash over
//! `password || salt` followed by repeated re-hashing of the digest. It has no
//! memory hardness and no per-iteration salting, so it is cheap to attack
//! offline. [`Argon2Kdf`] implements the same trait with Argon2id and can be
//! substituted without touching the block cipher.

use std::marker::PhantomData;

use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};

use crate::error::{CipherError, Result};
use crate::hash::fit_digest;
use crate::key::{MasterKey, Salt};
use crate::{KDF_ITERATIONS, KEY_SIZE};

/// Turns a password and salt into a master key.
pub trait KeyDerivation {
    /// Derives the key for `password` under `salt`.
    fn derive(&self, password: &str, salt: &Salt) -> Result<MasterKey>;

    /// Draws a fresh salt and derives a key under it.
    ///
    /// The salt is handed back because the key cannot be re-derived without
    /// it; callers must store or transmit it alongside the ciphertext.
    fn derive_with_random_salt(&self, password: &str) -> Result<(MasterKey, Salt)> {
        let salt = Salt::generate();
        let key = self.derive(password, &salt)?;
        Ok((key, salt))
    }
}

/// Chained hashing: `h0 = H(password || salt)`, `h(i+1) = H(h(i))`, resized
/// to [`KEY_SIZE`] bytes.
pub struct IteratedHash<H = Sha256> {
    iterations: u32,
    _hash: PhantomData<fn() -> H>,
}

impl IteratedHash {
    /// Iterated SHA-256 with the default [`KDF_ITERATIONS`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H> IteratedHash<H> {
    /// Overrides the number of re-hash iterations.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Number of re-hash iterations applied after the initial hash.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl<H> Default for IteratedHash<H> {
    fn default() -> Self {
        Self {
            iterations: KDF_ITERATIONS,
            _hash: PhantomData,
        }
    }
}

impl<H> Clone for IteratedHash<H> {
    fn clone(&self) -> Self {
        Self {
            iterations: self.iterations,
            _hash: PhantomData,
        }
    }
}

impl<H> std::fmt::Debug for IteratedHash<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IteratedHash")
            .field("iterations", &self.iterations)
            .finish()
    }
}

impl<H: Digest> KeyDerivation for IteratedHash<H> {
    fn derive(&self, password: &str, salt: &Salt) -> Result<MasterKey> {
        let mut hasher = H::new();
        hasher.update(password.as_bytes());
        hasher.update(salt.as_bytes());
        let mut digest = hasher.finalize();
        for _ in 0..self.iterations {
            digest = H::digest(&digest);
        }

        let mut key = [0u8; KEY_SIZE];
        fit_digest(&digest, &mut key);
        tracing::debug!(iterations = self.iterations, "derived master key");
        Ok(MasterKey::from_bytes(key))
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub mem_cost_kib: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Argon2id key derivation.
#[derive(Debug, Clone, Default)]
pub struct Argon2Kdf {
    params: KdfParams,
}

impl Argon2Kdf {
    /// Creates the derivation with explicit cost parameters.
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }
}

impl KeyDerivation for Argon2Kdf {
    fn derive(&self, password: &str, salt: &Salt) -> Result<MasterKey> {
        let params = Params::new(
            self.params.mem_cost_kib,
            self.params.time_cost,
            self.params.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CipherError::KeyDerivation(format!("invalid Argon2id params: {e}")))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let mut key = [0u8; KEY_SIZE];
        argon2
            .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut key)
            .map_err(|e| CipherError::KeyDerivation(format!("Argon2id failed: {e}")))?;

        tracing::debug!(
            mem_cost_kib = self.params.mem_cost_kib,
            time_cost = self.params.time_cost,
            "derived master key with Argon2id"
        );
        Ok(MasterKey::from_bytes(key))
    }
}
