//! Cipher parameters and the persisted key header.
//!
//! The cipher never embeds its salt in the envelope, so a key can only be
//! re-derived if the salt is kept elsewhere. [`KeyHeader`] is that
//! elsewhere: salt, mode and key-derivation settings serialized with
//! `bincode`.

use feistel_core::{
    Argon2Kdf, IteratedHash, KdfParams, KeyDerivation, Salt, BLOCK_SIZE, KDF_ITERATIONS,
    KEY_SIZE, ROUNDS, SALT_SIZE,
};
use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Current header version.
pub const HEADER_VERSION: u32 = 1;

/// Largest iterated-hash count a header may request.
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Largest Argon2id memory cost a header may request (1 GiB).
pub const MAX_ARGON2_MEM_KIB: u32 = 1 << 20;

/// Largest Argon2id time cost a header may request.
pub const MAX_ARGON2_TIME_COST: u32 = 64;

/// Largest Argon2id lane count a header may request.
pub const MAX_ARGON2_PARALLELISM: u32 = 64;

/// Key-derivation function identifier with its cost settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdfId {
    /// Chained SHA-256.
    IteratedSha256 {
        /// Re-hash iterations after the first hash.
        iterations: u32,
    },
    /// Argon2id.
    Argon2id {
        /// Memory cost in KiB.
        mem_cost_kib: u32,
        /// Time cost.
        time_cost: u32,
        /// Lanes.
        parallelism: u32,
    },
}

impl Default for KdfId {
    fn default() -> Self {
        KdfId::IteratedSha256 {
            iterations: KDF_ITERATIONS,
        }
    }
}

impl KdfId {
    /// Whether the cost settings stay within the header limits.
    pub fn within_limits(&self) -> bool {
        match *self {
            KdfId::IteratedSha256 { iterations } => iterations <= MAX_ITERATIONS,
            KdfId::Argon2id {
                mem_cost_kib,
                time_cost,
                parallelism,
            } => {
                mem_cost_kib <= MAX_ARGON2_MEM_KIB
                    && time_cost <= MAX_ARGON2_TIME_COST
                    && parallelism <= MAX_ARGON2_PARALLELISM
            }
        }
    }

    /// Builds the derivation this identifier names.
    pub fn build(&self) -> Box<dyn KeyDerivation> {
        match *self {
            KdfId::IteratedSha256 { iterations } => {
                Box::new(IteratedHash::new().with_iterations(iterations))
            }
            KdfId::Argon2id {
                mem_cost_kib,
                time_cost,
                parallelism,
            } => Box::new(Argon2Kdf::new(KdfParams {
                mem_cost_kib,
                time_cost,
                parallelism,
            })),
        }
    }
}

/// Static parameters describing a cipher configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    /// Number of Feistel rounds (16).
    pub rounds: usize,
    /// Block size in bytes (16).
    pub block_bytes: usize,
    /// Master key size in bytes (32).
    pub key_bytes: usize,
    /// Mode of operation.
    pub mode: Mode,
    /// Key derivation.
    pub kdf: KdfId,
    /// Version tag for future compatibility changes.
    pub version: u32,
}

impl Default for CipherParams {
    fn default() -> Self {
        Self::with_mode(Mode::default())
    }
}

impl CipherParams {
    /// Default parameters for `mode`.
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            rounds: ROUNDS,
            block_bytes: BLOCK_SIZE,
            key_bytes: KEY_SIZE,
            mode,
            kdf: KdfId::default(),
            version: HEADER_VERSION,
        }
    }

    /// Whether these parameters describe the cipher this crate implements
    /// with key-derivation costs inside the header limits.
    pub fn is_supported(&self) -> bool {
        self.rounds == ROUNDS
            && self.block_bytes == BLOCK_SIZE
            && self.key_bytes == KEY_SIZE
            && self.version == HEADER_VERSION
            && self.kdf.within_limits()
    }
}

/// Everything besides the password needed to rebuild a cipher instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyHeader {
    /// Cipher configuration.
    pub params: CipherParams,
    /// Key-derivation salt.
    pub salt: [u8; SALT_SIZE],
}

impl KeyHeader {
    /// Pairs parameters with a salt.
    pub fn new(params: CipherParams, salt: Salt) -> Self {
        Self {
            params,
            salt: salt.0,
        }
    }

    /// The stored salt.
    pub fn salt(&self) -> Salt {
        Salt(self.salt)
    }

    /// Serializes the header with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a header with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_roundtrip() {
        let header = KeyHeader::new(
            CipherParams {
                kdf: KdfId::Argon2id {
                    mem_cost_kib: 1024,
                    time_cost: 2,
                    parallelism: 1,
                },
                ..CipherParams::with_mode(Mode::Ctr)
            },
            Salt([9u8; SALT_SIZE]),
        );
        let bytes = header.to_bytes().expect("serialize");
        let decoded = KeyHeader::from_bytes(&bytes).expect("deserialize");
        assert_eq!(decoded, header);
        assert_eq!(decoded.salt(), Salt([9u8; SALT_SIZE]));
        assert!(decoded.params.is_supported());
    }

    #[test]
    fn truncated_header_is_rejected() {
        let bytes = KeyHeader::new(CipherParams::default(), Salt([1u8; SALT_SIZE]))
            .to_bytes()
            .expect("serialize");
        assert!(KeyHeader::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn defaults_describe_this_cipher() {
        let params = CipherParams::default();
        assert_eq!(params.mode, Mode::Cbc);
        assert_eq!(
            params.kdf,
            KdfId::IteratedSha256 {
                iterations: KDF_ITERATIONS
            }
        );
        assert!(params.is_supported());
        assert!(!CipherParams { rounds: 8, ..params }.is_supported());
    }

    #[test]
    fn excessive_kdf_costs_are_unsupported() {
        let params = CipherParams::default();
        let at_limit = CipherParams {
            kdf: KdfId::IteratedSha256 {
                iterations: MAX_ITERATIONS,
            },
            ..params
        };
        assert!(at_limit.is_supported());

        let hostile = [
            KdfId::IteratedSha256 {
                iterations: u32::MAX,
            },
            KdfId::Argon2id {
                mem_cost_kib: u32::MAX,
                time_cost: 3,
                parallelism: 4,
            },
            KdfId::Argon2id {
                mem_cost_kib: 65536,
                time_cost: MAX_ARGON2_TIME_COST + 1,
                parallelism: 4,
            },
            KdfId::Argon2id {
                mem_cost_kib: 65536,
                time_cost: 3,
                parallelism: MAX_ARGON2_PARALLELISM + 1,
            },
        ];
        for kdf in hostile {
            assert!(!kdf.within_limits(), "{kdf:?}");
            assert!(!CipherParams { kdf, ..params }.is_supported(), "{kdf:?}");
        }
    }

    #[test]
    fn kdf_id_builds_matching_derivation() {
        let salt = Salt([3u8; SALT_SIZE]);
        let built = KdfId::IteratedSha256 { iterations: 5 }
            .build()
            .derive("pw", &salt)
            .unwrap();
        let direct = IteratedHash::new()
            .with_iterations(5)
            .derive("pw", &salt)
            .unwrap();
        assert_eq!(built.as_bytes(), direct.as_bytes());
    }
}
