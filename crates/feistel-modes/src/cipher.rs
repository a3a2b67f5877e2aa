//! Password-keyed cipher instance.

use std::marker::PhantomData;

use feistel_core::{
    Block, CipherError, Digest, IteratedHash, KeyDerivation, MasterKey, Result, Salt, Sha256,
    BLOCK_SIZE, HALF_BLOCK,
};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::envelope::Envelope;
use crate::mode::Mode;
use crate::modes::{decrypt_with_schedule, encrypt_with_schedule, KeySchedule};

/// A master key, its salt, its expanded schedule and a fixed mode.
///
/// Key material is read-only after construction, so one instance may be
/// shared by reference across threads. Each call to an `encrypt` method
/// works on its own IV/counter buffer.
pub struct FeistelCipher<H = Sha256> {
    key: MasterKey,
    salt: Salt,
    mode: Mode,
    schedule: KeySchedule,
    _hash: PhantomData<fn() -> H>,
}

impl FeistelCipher {
    /// Derives a key from `password` under a fresh random salt with the
    /// default iterated SHA-256 derivation.
    ///
    /// The salt is only reachable through [`FeistelCipher::salt`]; it is not
    /// part of the envelopes this instance produces.
    pub fn new(password: &str, mode: Mode) -> Result<Self> {
        let (key, salt) = IteratedHash::new().derive_with_random_salt(password)?;
        Self::from_key(key, salt, mode)
    }

    /// Derives a key from `password` under a known salt with the default
    /// iterated SHA-256 derivation.
    pub fn with_salt(password: &str, salt: Salt, mode: Mode) -> Result<Self> {
        Self::from_kdf(&IteratedHash::new(), password, salt, mode)
    }
}

impl<H: Digest> FeistelCipher<H> {
    /// Derives the key with an arbitrary [`KeyDerivation`].
    pub fn from_kdf<K: KeyDerivation + ?Sized>(
        kdf: &K,
        password: &str,
        salt: Salt,
        mode: Mode,
    ) -> Result<Self> {
        let key = kdf.derive(password, &salt)?;
        Self::from_key(key, salt, mode)
    }

    /// Builds an instance around existing key material.
    ///
    /// # Errors
    /// [`CipherError::UnsupportedDigest`] if `H` produces fewer than
    /// [`HALF_BLOCK`] bytes.
    pub fn from_key(key: MasterKey, salt: Salt, mode: Mode) -> Result<Self> {
        let size = <H as Digest>::output_size();
        if size < HALF_BLOCK {
            return Err(CipherError::UnsupportedDigest { size });
        }
        let schedule = KeySchedule::new::<H>(&key);
        tracing::debug!(%mode, digest_bytes = size, "cipher instance ready");
        Ok(Self {
            key,
            salt,
            mode,
            schedule,
            _hash: PhantomData,
        })
    }

    /// Mode applied to every message.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Salt the key was derived under.
    pub fn salt(&self) -> Salt {
        self.salt
    }

    /// The derived master key.
    pub fn master_key(&self) -> &MasterKey {
        &self.key
    }

    /// Encrypts under a fresh IV from the operating system RNG and returns
    /// the base64 envelope.
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        self.encrypt_with_rng(plaintext, &mut OsRng)
    }

    /// Encrypts under a fresh IV drawn from `rng`.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(&self, plaintext: &[u8], rng: &mut R) -> String {
        let mut iv = [0u8; BLOCK_SIZE];
        rng.fill_bytes(&mut iv);
        self.encrypt_with_iv(plaintext, &iv)
    }

    /// Encrypts under a caller-chosen IV. Reusing an IV under one key
    /// defeats CBC and CTR.
    pub fn encrypt_with_iv(&self, plaintext: &[u8], iv: &Block) -> String {
        self.seal(plaintext, iv).encode()
    }

    /// Encrypts into an [`Envelope`] without encoding it.
    pub fn seal(&self, plaintext: &[u8], iv: &Block) -> Envelope {
        let ciphertext = encrypt_with_schedule::<H>(plaintext, &self.schedule, iv, self.mode);
        Envelope::new(*iv, ciphertext)
    }

    /// Decrypts a base64 envelope.
    ///
    /// # Errors
    /// - [`CipherError::MalformedEnvelope`] if the envelope cannot be parsed.
    /// - [`CipherError::DecryptionFailed`] for any failure after parsing,
    ///   including bad padding, without saying which.
    pub fn decrypt(&self, envelope: &str) -> Result<Vec<u8>> {
        let envelope = Envelope::decode(envelope, self.mode)?;
        self.open(&envelope)
    }

    /// Decrypts an already parsed [`Envelope`].
    ///
    /// # Errors
    /// See [`FeistelCipher::decrypt`].
    pub fn open(&self, envelope: &Envelope) -> Result<Vec<u8>> {
        decrypt_with_schedule::<H>(&envelope.ciphertext, &self.schedule, &envelope.iv, self.mode)
            .map_err(|_| {
                tracing::debug!(mode = %self.mode, "decryption failed");
                CipherError::DecryptionFailed
            })
    }
}

impl<H> std::fmt::Debug for FeistelCipher<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeistelCipher")
            .field("mode", &self.mode)
            .field("salt", &self.salt)
            .finish_non_exhaustive()
    }
}
