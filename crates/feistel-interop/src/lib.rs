//! Formats at the edge of the Feistel cipher.
//! The cryptography behind these formats lives in other libraries; this crate
//! only frames and scores.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod hybrid;
pub mod strength;

pub use hybrid::{FrameError, HybridEnvelope};
pub use strength::{score_password, Strength};
