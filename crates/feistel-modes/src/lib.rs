//! Message-level encryption on top of `feistel-core`.
//!
//! This crate extends the single-block Feistel transform to arbitrary-length
//! messages:
//! - Block padding and its verified removal.
//! - ECB, CBC and CTR chaining.
//! - The `base64(IV || ciphertext)` transport envelope.
//! - [`FeistelCipher`], a password-keyed instance with a fixed mode.
//! - [`KeyHeader`], a `bincode` record of the salt and parameters needed to
//!   rebuild an instance.
//!
//! ```
//! use feistel_modes::{FeistelCipher, Mode};
//!
//! let cipher = FeistelCipher::new("correct horse", Mode::Cbc).unwrap();
//! let envelope = cipher.encrypt(b"attack at dawn");
//! assert_eq!(cipher.decrypt(&envelope).unwrap(), b"attack at dawn");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod counter;
mod envelope;
mod mode;
mod modes;
mod padding;
mod params;

pub use crate::cipher::FeistelCipher;
pub use crate::counter::increment_counter;
pub use crate::envelope::Envelope;
pub use crate::mode::{Mode, ParseModeError};
pub use crate::modes::{
    decrypt_message, decrypt_with_schedule, encrypt_message, encrypt_with_schedule, KeySchedule,
};
pub use crate::padding::{pad, unpad};
pub use crate::params::{
    CipherParams, KdfId, KeyHeader, HEADER_VERSION, MAX_ARGON2_MEM_KIB, MAX_ARGON2_PARALLELISM,
    MAX_ARGON2_TIME_COST, MAX_ITERATIONS,
};
