//! Mode-of-operation selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mode of operation applied uniformly to every message of a cipher instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Electronic code book. Equal plaintext blocks give equal ciphertext blocks.
    Ecb,
    /// Cipher block chaining.
    #[default]
    Cbc,
    /// Counter mode; no padding, keystream from the forward transform.
    Ctr,
}

impl Mode {
    /// All supported modes.
    pub const ALL: [Mode; 3] = [Mode::Ecb, Mode::Cbc, Mode::Ctr];

    /// Whether the mode pads and works on whole blocks.
    pub fn is_block_mode(self) -> bool {
        matches!(self, Mode::Ecb | Mode::Cbc)
    }

    /// Lowercase name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ecb => "ecb",
            Mode::Cbc => "cbc",
            Mode::Ctr => "ctr",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode `{0}` (expected ecb, cbc or ctr)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ecb" => Ok(Mode::Ecb),
            "cbc" => Ok(Mode::Cbc),
            "ctr" => Ok(Mode::Ctr),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
