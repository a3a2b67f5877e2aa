//! Big-endian counter arithmetic for CTR mode.

use feistel_core::Block;

/// Adds one to `counter` read as a big-endian integer, carrying leftward.
/// All-`0xff` wraps to all-zero.
#[inline]
pub fn increment_counter(counter: &mut Block) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}
