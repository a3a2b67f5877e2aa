//! Transport envelope: `base64(IV || ciphertext)`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use feistel_core::{Block, CipherError, Result, BLOCK_SIZE};

use crate::mode::Mode;

/// IV and raw ciphertext of one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Initialization vector, or initial counter under CTR.
    pub iv: Block,
    /// Raw ciphertext.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Pairs an IV with its ciphertext.
    pub fn new(iv: Block, ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }

    /// `IV || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOCK_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Base64 of [`Envelope::to_bytes`].
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Splits raw `IV || ciphertext` bytes.
    ///
    /// # Errors
    /// [`CipherError::MalformedEnvelope`] if `bytes` is shorter than the IV,
    /// or if `mode` is a block mode and the ciphertext is not block aligned.
    pub fn from_bytes(bytes: &[u8], mode: Mode) -> Result<Self> {
        if bytes.len() < BLOCK_SIZE {
            return Err(CipherError::MalformedEnvelope(format!(
                "{} bytes is shorter than the {BLOCK_SIZE}-byte IV",
                bytes.len()
            )));
        }
        let (iv, ciphertext) = bytes.split_at(BLOCK_SIZE);
        if mode.is_block_mode() && ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::MalformedEnvelope(format!(
                "{} ciphertext bytes is not a multiple of {BLOCK_SIZE}",
                ciphertext.len()
            )));
        }
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(iv);
        Ok(Self::new(block, ciphertext.to_vec()))
    }

    /// Decodes a base64 envelope. Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// [`CipherError::MalformedEnvelope`] for invalid base64 or any
    /// [`Envelope::from_bytes`] failure.
    pub fn decode(encoded: &str, mode: Mode) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CipherError::MalformedEnvelope(format!("invalid base64: {e}")))?;
        Self::from_bytes(&bytes, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_prefixes_iv() {
        let env = Envelope::new([0u8; BLOCK_SIZE], vec![0xff; 3]);
        assert_eq!(env.to_bytes().len(), BLOCK_SIZE + 3);
        assert_eq!(env.encode(), "AAAAAAAAAAAAAAAAAAAAAP///w==");
    }

    #[test]
    fn decode_inverts_encode() {
        let env = Envelope::new([7u8; BLOCK_SIZE], vec![1u8; 32]);
        let decoded = Envelope::decode(&format!("{}\n", env.encode()), Mode::Cbc).unwrap();
        assert_eq!(decoded, env);
    }

    #[test]
    fn rejects_short_envelope() {
        let encoded = STANDARD.encode([0u8; BLOCK_SIZE - 1]);
        assert!(matches!(
            Envelope::decode(&encoded, Mode::Ctr),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn alignment_only_enforced_for_block_modes() {
        let bytes = [0u8; BLOCK_SIZE + 5];
        assert!(matches!(
            Envelope::from_bytes(&bytes, Mode::Ecb),
            Err(CipherError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            Envelope::from_bytes(&bytes, Mode::Cbc),
            Err(CipherError::MalformedEnvelope(_))
        ));
        let env = Envelope::from_bytes(&bytes, Mode::Ctr).unwrap();
        assert_eq!(env.ciphertext.len(), 5);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            Envelope::decode("not base64!", Mode::Ctr),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }
}
