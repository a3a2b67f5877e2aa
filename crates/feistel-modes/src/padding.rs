//! Block padding: every appended byte holds the number of appended bytes.

use feistel_core::{CipherError, Result, BLOCK_SIZE};

/// Pads `data` to a whole number of blocks.
///
/// Already aligned input gains a full block of padding, so the result is
/// always strictly longer than `data`.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let fill = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(data.len() + fill);
    padded.extend_from_slice(data);
    padded.resize(data.len() + fill, fill as u8);
    padded
}

/// Strips padding added by [`pad`].
///
/// The last byte `n` must be non-zero, no larger than the buffer, and equal
/// to each of the last `n` bytes.
///
/// # Errors
/// Returns [`CipherError::InvalidPadding`] otherwise, including for empty
/// input.
pub fn unpad(padded: &[u8]) -> Result<&[u8]> {
    let &n = padded.last().ok_or(CipherError::InvalidPadding)?;
    let n = n as usize;
    if n == 0 || n > padded.len() {
        return Err(CipherError::InvalidPadding);
    }
    let (data, tail) = padded.split_at(padded.len() - n);
    if tail.iter().any(|&b| b as usize != n) {
        return Err(CipherError::InvalidPadding);
    }
    Ok(data)
}
