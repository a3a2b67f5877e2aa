//! ECB, CBC and CTR over the Feistel block transform.
//!
//! Block decryption runs the same transform with the schedule reversed. CTR
//! only ever runs the forward schedule because it encrypts the counter to
//! form a keystream in both directions.

use feistel_core::{
    expand_key, transform, xor_in_place, Block, CipherError, Digest, MasterKey, Result,
    RoundKeys, BLOCK_SIZE,
};

use crate::counter::increment_counter;
use crate::mode::Mode;
use crate::padding::{pad, unpad};

/// Forward round keys together with their reversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySchedule {
    forward: RoundKeys,
    inverse: RoundKeys,
}

impl KeySchedule {
    /// Expands `key` with hash `H`.
    pub fn new<H: Digest>(key: &MasterKey) -> Self {
        Self::from_round_keys(expand_key::<H>(key))
    }

    /// Wraps an already expanded schedule.
    pub fn from_round_keys(forward: RoundKeys) -> Self {
        let inverse = forward.reversed();
        Self { forward, inverse }
    }

    /// Keys in encryption order.
    pub fn forward(&self) -> &RoundKeys {
        &self.forward
    }

    /// Keys in decryption order.
    pub fn inverse(&self) -> &RoundKeys {
        &self.inverse
    }
}

/// Encrypts `plaintext` under `key`, expanding the schedule for this call.
pub fn encrypt_message<H: Digest>(
    plaintext: &[u8],
    key: &MasterKey,
    iv: &Block,
    mode: Mode,
) -> Vec<u8> {
    encrypt_with_schedule::<H>(plaintext, &KeySchedule::new::<H>(key), iv, mode)
}

/// Decrypts `ciphertext` under `key`, expanding the schedule for this call.
///
/// # Errors
/// See [`decrypt_with_schedule`].
pub fn decrypt_message<H: Digest>(
    ciphertext: &[u8],
    key: &MasterKey,
    iv: &Block,
    mode: Mode,
) -> Result<Vec<u8>> {
    decrypt_with_schedule::<H>(ciphertext, &KeySchedule::new::<H>(key), iv, mode)
}

/// Encrypts with a pre-expanded schedule. The IV is copied; the caller's
/// buffer is never mutated.
pub fn encrypt_with_schedule<H: Digest>(
    plaintext: &[u8],
    schedule: &KeySchedule,
    iv: &Block,
    mode: Mode,
) -> Vec<u8> {
    match mode {
        Mode::Ecb => ecb::<H>(&pad(plaintext), schedule.forward()),
        Mode::Cbc => cbc_encrypt::<H>(&pad(plaintext), schedule.forward(), iv),
        Mode::Ctr => ctr::<H>(plaintext, schedule.forward(), iv),
    }
}

/// Decrypts with a pre-expanded schedule.
///
/// # Errors
/// - [`CipherError::InvalidBlockSize`] if an ECB/CBC ciphertext is not a
///   whole number of blocks.
/// - [`CipherError::InvalidPadding`] if the recovered padding is inconsistent.
pub fn decrypt_with_schedule<H: Digest>(
    ciphertext: &[u8],
    schedule: &KeySchedule,
    iv: &Block,
    mode: Mode,
) -> Result<Vec<u8>> {
    if mode.is_block_mode() && ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::InvalidBlockSize {
            len: ciphertext.len(),
        });
    }
    match mode {
        Mode::Ecb => {
            let padded = ecb::<H>(ciphertext, schedule.inverse());
            Ok(unpad(&padded)?.to_vec())
        }
        Mode::Cbc => {
            let padded = cbc_decrypt::<H>(ciphertext, schedule.inverse(), iv);
            Ok(unpad(&padded)?.to_vec())
        }
        Mode::Ctr => Ok(ctr::<H>(ciphertext, schedule.forward(), iv)),
    }
}

fn to_block(chunk: &[u8]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(chunk);
    block
}

/// `data` must be block aligned.
fn ecb<H: Digest>(data: &[u8], round_keys: &RoundKeys) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(BLOCK_SIZE) {
        out.extend_from_slice(&transform::<H>(&to_block(chunk), round_keys));
    }
    out
}

fn cbc_encrypt<H: Digest>(padded: &[u8], round_keys: &RoundKeys, iv: &Block) -> Vec<u8> {
    let mut out = Vec::with_capacity(padded.len());
    let mut previous = *iv;
    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = to_block(chunk);
        xor_in_place(&mut block, &previous);
        previous = transform::<H>(&block, round_keys);
        out.extend_from_slice(&previous);
    }
    out
}

fn cbc_decrypt<H: Digest>(ciphertext: &[u8], inverse: &RoundKeys, iv: &Block) -> Vec<u8> {
    let mut out = Vec::with_capacity(ciphertext.len());
    let mut previous = *iv;
    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let block = to_block(chunk);
        let mut plain = transform::<H>(&block, inverse);
        xor_in_place(&mut plain, &previous);
        out.extend_from_slice(&plain);
        previous = block;
    }
    out
}

/// Encryption and decryption are the same keystream XOR.
fn ctr<H: Digest>(data: &[u8], forward: &RoundKeys, iv: &Block) -> Vec<u8> {
    let mut out = data.to_vec();
    let mut counter = *iv;
    for chunk in out.chunks_mut(BLOCK_SIZE) {
        let keystream = transform::<H>(&counter, forward);
        xor_in_place(chunk, &keystream);
        increment_counter(&mut counter);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use feistel_core::Sha256;

    const IV: Block = [0x24; BLOCK_SIZE];

    fn key() -> MasterKey {
        MasterKey::from([0x42u8; 32])
    }

    #[test]
    fn round_trip_all_modes() {
        let msg = b"The quick brown fox jumps over the lazy dog";
        for mode in Mode::ALL {
            let ct = encrypt_message::<Sha256>(msg, &key(), &IV, mode);
            let pt = decrypt_message::<Sha256>(&ct, &key(), &IV, mode).unwrap();
            assert_eq!(pt, msg, "mode {mode}");
        }
    }

    #[test]
    fn output_lengths() {
        let msg = [7u8; 20];
        assert_eq!(encrypt_message::<Sha256>(&msg, &key(), &IV, Mode::Ecb).len(), 32);
        assert_eq!(encrypt_message::<Sha256>(&msg, &key(), &IV, Mode::Cbc).len(), 32);
        assert_eq!(encrypt_message::<Sha256>(&msg, &key(), &IV, Mode::Ctr).len(), 20);
        assert!(encrypt_message::<Sha256>(b"", &key(), &IV, Mode::Ctr).is_empty());
    }

    #[test]
    fn ecb_block_is_plain_transform() {
        let schedule = KeySchedule::new::<Sha256>(&key());
        let block = *b"exactly16bytes!!";
        let ct = encrypt_with_schedule::<Sha256>(&block, &schedule, &IV, Mode::Ecb);
        assert_eq!(ct[..BLOCK_SIZE], transform::<Sha256>(&block, schedule.forward()));
    }

    #[test]
    fn cbc_first_block_chains_iv() {
        let schedule = KeySchedule::new::<Sha256>(&key());
        let block = *b"exactly16bytes!!";
        let ct = encrypt_with_schedule::<Sha256>(&block, &schedule, &IV, Mode::Cbc);
        let mut mixed = block;
        xor_in_place(&mut mixed, &IV);
        assert_eq!(ct[..BLOCK_SIZE], transform::<Sha256>(&mixed, schedule.forward()));
    }

    #[test]
    fn ctr_keystream_uses_forward_keys_and_counter() {
        let schedule = KeySchedule::new::<Sha256>(&key());
        let zeros = [0u8; 2 * BLOCK_SIZE];
        let ks = encrypt_with_schedule::<Sha256>(&zeros, &schedule, &IV, Mode::Ctr);
        let mut next = IV;
        increment_counter(&mut next);
        assert_eq!(ks[..BLOCK_SIZE], transform::<Sha256>(&IV, schedule.forward()));
        assert_eq!(ks[BLOCK_SIZE..], transform::<Sha256>(&next, schedule.forward()));
    }

    #[test]
    fn ctr_handles_partial_final_block() {
        let msg = [0x11u8; BLOCK_SIZE + 3];
        let ct = encrypt_message::<Sha256>(&msg, &key(), &IV, Mode::Ctr);
        assert_eq!(ct.len(), msg.len());
        let pt = decrypt_message::<Sha256>(&ct, &key(), &IV, Mode::Ctr).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn caller_iv_is_not_mutated() {
        let iv = IV;
        let _ = encrypt_message::<Sha256>(&[0u8; 64], &key(), &iv, Mode::Ctr);
        assert_eq!(iv, IV);
    }

    #[test]
    fn block_modes_reject_misaligned_ciphertext() {
        for mode in [Mode::Ecb, Mode::Cbc] {
            assert_eq!(
                decrypt_message::<Sha256>(&[0u8; 17], &key(), &IV, mode),
                Err(CipherError::InvalidBlockSize { len: 17 })
            );
        }
    }

    #[test]
    fn empty_block_ciphertext_is_bad_padding() {
        assert_eq!(
            decrypt_message::<Sha256>(&[], &key(), &IV, Mode::Cbc),
            Err(CipherError::InvalidPadding)
        );
    }

    #[test]
    fn wrong_key_fails_or_differs() {
        let msg = b"attack at dawn";
        let ct = encrypt_message::<Sha256>(msg, &key(), &IV, Mode::Cbc);
        let other = MasterKey::from([0x43u8; 32]);
        match decrypt_message::<Sha256>(&ct, &other, &IV, Mode::Cbc) {
            Ok(pt) => assert_ne!(pt, msg),
            Err(err) => assert_eq!(err, CipherError::InvalidPadding),
        }
    }
}
