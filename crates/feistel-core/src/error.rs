//! Error types shared by the cipher crates.

use thiserror::Error;

/// Convenience alias for results carrying [`CipherError`].
pub type Result<T> = std::result::Result<T, CipherError>;

/// Errors produced by the cipher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// A block, or a block-mode ciphertext, is not a whole number of blocks.
    #[error("invalid block size: {len} bytes")]
    InvalidBlockSize {
        /// Length of the rejected input.
        len: usize,
    },

    /// Trailing padding bytes disagree with the padding length byte.
    #[error("invalid padding")]
    InvalidPadding,

    /// The transport envelope could not be parsed.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Decryption failed; the cause is deliberately not reported.
    #[error("decryption failed")]
    DecryptionFailed,

    /// The hash primitive produces digests too short for the round function.
    #[error("unsupported digest: {size} bytes is shorter than a half block")]
    UnsupportedDigest {
        /// Output size of the rejected hash.
        size: usize,
    },

    /// The key derivation function rejected its parameters or input.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            CipherError::InvalidBlockSize { len: 15 }.to_string(),
            "invalid block size: 15 bytes"
        );
        assert_eq!(CipherError::InvalidPadding.to_string(), "invalid padding");
        assert_eq!(
            CipherError::MalformedEnvelope("too short".into()).to_string(),
            "malformed envelope: too short"
        );
        assert_eq!(
            CipherError::DecryptionFailed.to_string(),
            "decryption failed"
        );
    }
}
