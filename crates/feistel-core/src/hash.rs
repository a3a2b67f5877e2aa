//! Digest resizing shared by key derivation, the schedule and the round function.

/// Fills `out` from `digest`, truncating a longer digest and repeating a
/// shorter one cyclically.
///
/// An empty digest leaves `out` untouched.
#[inline]
pub fn fit_digest(digest: &[u8], out: &mut [u8]) {
    for (dst, src) in out.iter_mut().zip(digest.iter().cycle()) {
        *dst = *src;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_digest() {
        let mut out = [0u8; 3];
        fit_digest(&[1, 2, 3, 4, 5], &mut out);
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn tiles_short_digest() {
        let mut out = [0u8; 7];
        fit_digest(&[1, 2, 3], &mut out);
        assert_eq!(out, [1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn empty_digest_is_noop() {
        let mut out = [9u8; 2];
        fit_digest(&[], &mut out);
        assert_eq!(out, [9, 9]);
    }
}
