//! CipherState: an AEAD keyed-or-uninitialized cipher with a strict 64-bit
//! nonce and a rekey rule.
//!
//! Grounded on `nyx-crypto`'s `AeadSession` (per-record sequence number,
//! `rekey()` deriving a fresh key via HKDF, `Drop` zeroizing the key) but
//! trimmed to the bidirectional, single-party semantics Noise actually
//! specifies: one nonce counter, no direction-id mixing, and `Rekey`
//! derived by re-encrypting an all-zero block at the reserved max nonce
//! rather than from an arbitrary HKDF label.

use tracing::{debug, warn};

use crate::cipher::{CipherChoice, CipherKey};
use crate::{NoiseError, Result, TAG_LEN};

const MAX_NONCE: u64 = u64::MAX;

/// An AEAD cipher state: unkeyed (pass-through) or keyed with a strictly
/// increasing nonce counter.
pub struct CipherState {
    suite: CipherChoice,
    key: Option<CipherKey>,
    n: u64,
}

impl CipherState {
    /// A fresh, unkeyed cipher state for the given suite.
    pub fn new(suite: CipherChoice) -> Self {
        Self { suite, key: None, n: 0 }
    }

    /// `InitializeKey(key)`.
    pub fn initialize_key(&mut self, key: [u8; 32]) {
        self.key = Some(CipherKey(key));
        self.n = 0;
    }

    /// `HasKey()`.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Current nonce value (next nonce to be used).
    pub fn nonce(&self) -> u64 {
        self.n
    }

    /// `EncryptWithAd(ad, plaintext)`.
    pub fn encrypt_with_ad(&mut self, ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let Some(key) = &self.key else {
            return Ok(plaintext.to_vec());
        };
        if self.n == MAX_NONCE {
            return Err(NoiseError::MaxNonce);
        }
        let ct = self.suite.encrypt(key, self.n, ad, plaintext)?;
        self.n += 1;
        Ok(ct)
    }

    /// `DecryptWithAd(ad, ciphertext)`. On a MAC failure `n` is left
    /// unchanged so a caller that resynchronizes may retry, though Noise
    /// transport sessions are expected to terminate on any failure.
    pub fn decrypt_with_ad(&mut self, ad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let Some(key) = &self.key else {
            return Ok(ciphertext.to_vec());
        };
        if self.n == MAX_NONCE {
            return Err(NoiseError::MaxNonce);
        }
        match self.suite.decrypt(key, self.n, ad, ciphertext) {
            Ok(pt) => {
                self.n += 1;
                Ok(pt)
            }
            Err(e) => {
                warn!(nonce = self.n, "AEAD decrypt failed");
                Err(e)
            }
        }
    }

    /// `Rekey()`: `k <- first 32 bytes of ENCRYPT(k, maxnonce, zerolen, zeros32)`.
    /// `n` is left unchanged.
    pub fn rekey(&mut self) -> Result<()> {
        let Some(key) = &self.key else {
            return Err(NoiseError::NotApplicable("rekey on unkeyed cipher state"));
        };
        let zeros = [0u8; 32];
        let out = self.suite.encrypt(key, MAX_NONCE, &[], &zeros)?;
        let mut new_key = [0u8; 32];
        new_key.copy_from_slice(&out[..32]);
        debug!("cipher state rekeyed");
        self.key = Some(CipherKey(new_key));
        Ok(())
    }

    /// Minimum ciphertext length for a keyed cipher state (tag only, empty
    /// plaintext).
    pub fn min_ciphertext_len(&self) -> usize {
        if self.has_key() {
            TAG_LEN
        } else {
            0
        }
    }

    /// The AEAD suite this state was constructed with, so a `Split()` can
    /// hand the pair of derived states the same cipher choice.
    pub fn suite_for_split(&self) -> CipherChoice {
        self.suite
    }
}
