//! Length-prefixed framing of a hybrid (asymmetric + AEAD) envelope.
//!
//! Wire format, each length a big-endian `u32`:
//! ```text
//! [len][ciphertext][len][wrapped session key][len][iv][len][tag]
//! ```
//! Only the framing lives here; producing or opening the AEAD ciphertext and
//! the wrapped key is the job of whichever library created them.

use thiserror::Error;

const LEN_BYTES: usize = 4;

/// Field names in wire order, used in error messages.
const FIELDS: [&str; 4] = ["ciphertext", "wrapped key", "iv", "tag"];

/// Errors produced while parsing a hybrid envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The input ended inside a length prefix or payload.
    #[error("truncated {field}: need {needed} bytes, {available} available")]
    Truncated {
        /// Field being read.
        field: &'static str,
        /// Bytes the field requires.
        needed: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// Bytes remain after the fourth field.
    #[error("{0} trailing bytes after tag")]
    TrailingBytes(usize),

    /// A field is too long for a `u32` length prefix.
    #[error("{field} is too long to frame ({len} bytes)")]
    FieldTooLong {
        /// Field being written.
        field: &'static str,
        /// Its length.
        len: usize,
    },
}

/// The four opaque fields of a hybrid envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HybridEnvelope {
    /// AEAD ciphertext.
    pub ciphertext: Vec<u8>,
    /// Session key wrapped by the recipient's public key.
    pub wrapped_key: Vec<u8>,
    /// AEAD nonce.
    pub iv: Vec<u8>,
    /// AEAD authentication tag.
    pub tag: Vec<u8>,
}

impl HybridEnvelope {
    fn fields(&self) -> [&[u8]; 4] {
        [
            self.ciphertext.as_slice(),
            self.wrapped_key.as_slice(),
            self.iv.as_slice(),
            self.tag.as_slice(),
        ]
    }

    /// Frames the four fields.
    ///
    /// # Errors
    /// [`FrameError::FieldTooLong`] if a field exceeds `u32::MAX` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
        let fields = self.fields();
        let total = fields.iter().map(|f| LEN_BYTES + f.len()).sum();
        let mut out = Vec::with_capacity(total);
        for (name, field) in FIELDS.into_iter().zip(fields) {
            let len = u32::try_from(field.len()).map_err(|_| FrameError::FieldTooLong {
                field: name,
                len: field.len(),
            })?;
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(field);
        }
        Ok(out)
    }

    /// Parses a framed envelope, rejecting truncation and trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let mut rest = bytes;
        let mut parsed: [Vec<u8>; 4] = Default::default();
        for (name, slot) in FIELDS.into_iter().zip(parsed.iter_mut()) {
            let (field, tail) = read_field(rest, name)?;
            *slot = field.to_vec();
            rest = tail;
        }
        if !rest.is_empty() {
            return Err(FrameError::TrailingBytes(rest.len()));
        }
        let [ciphertext, wrapped_key, iv, tag] = parsed;
        tracing::trace!(
            ciphertext = ciphertext.len(),
            wrapped_key = wrapped_key.len(),
            "parsed hybrid envelope"
        );
        Ok(Self {
            ciphertext,
            wrapped_key,
            iv,
            tag,
        })
    }
}

fn read_field<'a>(
    input: &'a [u8],
    field: &'static str,
) -> Result<(&'a [u8], &'a [u8]), FrameError> {
    if input.len() < LEN_BYTES {
        return Err(FrameError::Truncated {
            field,
            needed: LEN_BYTES,
            available: input.len(),
        });
    }
    let (prefix, rest) = input.split_at(LEN_BYTES);
    let mut len_bytes = [0u8; LEN_BYTES];
    len_bytes.copy_from_slice(prefix);
    let len = u32::from_be_bytes(len_bytes) as usize;
    if rest.len() < len {
        return Err(FrameError::Truncated {
            field,
            needed: len,
            available: rest.len(),
        });
    }
    Ok(rest.split_at(len))
}
