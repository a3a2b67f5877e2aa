//! Key material types.

use rand::{rngs::OsRng, CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::{KEY_SIZE, ROUNDS, ROUND_KEY_SIZE, SALT_SIZE};

/// 256-bit master key. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey {
    bytes: [u8; KEY_SIZE],
}

impl MasterKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Borrows the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl From<[u8; KEY_SIZE]> for MasterKey {
    fn from(value: [u8; KEY_SIZE]) -> Self {
        Self::from_bytes(value)
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Random salt mixed into key derivation. Not secret, but required to
/// re-derive a key from its password.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Salt(pub [u8; SALT_SIZE]);

impl Salt {
    /// Draws a salt from `rng`.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Draws a salt from the operating system RNG.
    pub fn generate() -> Self {
        Self::random(&mut OsRng)
    }

    /// Borrows the raw salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

impl From<[u8; SALT_SIZE]> for Salt {
    fn from(value: [u8; SALT_SIZE]) -> Self {
        Self(value)
    }
}

/// Key material injected in a single round.
pub type RoundKey = [u8; ROUND_KEY_SIZE];

/// Ordered round keys. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct RoundKeys(pub [RoundKey; ROUNDS]);

impl RoundKeys {
    /// Returns the round key at the requested position (0..ROUNDS).
    #[inline]
    pub fn get(&self, round: usize) -> &RoundKey {
        &self.0[round]
    }

    /// Iterates the keys in application order.
    pub fn iter(&self) -> impl Iterator<Item = &RoundKey> {
        self.0.iter()
    }

    /// Returns the same keys in opposite order, which turns the block
    /// transform into its inverse.
    pub fn reversed(&self) -> Self {
        let mut keys = self.0;
        keys.reverse();
        Self(keys)
    }
}

impl Drop for RoundKeys {
    fn drop(&mut self) {
        for key in self.0.iter_mut() {
            key.zeroize();
        }
    }
}

impl std::fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RoundKeys").field(&"[REDACTED]").finish()
    }
}
