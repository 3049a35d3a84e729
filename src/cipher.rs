//! AEAD cipher registry: ChaCha20-Poly1305 and AES-256-GCM.
//!
//! Nonce layout: 32 bits of zero
//! followed by the 64-bit counter, little-endian for ChaCha20-Poly1305 and
//! big-endian for AES-GCM. Grounded on `nyx-crypto`'s `AeadCipher` (which
//! wrapped a single suite) generalized to both ciphers the way `snow`'s
//! `CipherChoice` dispatches to `CipherChaChaPoly`/`CipherAESGCM`.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use zeroize::Zeroize;

use crate::{NoiseError, Result, TAG_LEN};

/// The two AEAD ciphers named by the Noise protocol name grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CipherChoice {
    ChaChaPoly,
    Aes256Gcm,
}

/// A 32-byte AEAD key, zeroized on drop.
#[derive(Clone)]
pub struct CipherKey(pub [u8; 32]);

impl Drop for CipherKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

fn nonce_bytes(choice: CipherChoice, n: u64) -> [u8; 12] {
    let mut out = [0u8; 12];
    match choice {
        // 32 zero bits, then the counter little-endian.
        CipherChoice::ChaChaPoly => out[4..12].copy_from_slice(&n.to_le_bytes()),
        // 32 zero bits, then the counter big-endian.
        CipherChoice::Aes256Gcm => out[4..12].copy_from_slice(&n.to_be_bytes()),
    }
    out
}

impl CipherChoice {
    /// `encrypt(k, n, ad, plaintext) -> ciphertext || tag`.
    pub fn encrypt(self, key: &CipherKey, n: u64, ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = nonce_bytes(self, n);
        let payload = Payload { msg: plaintext, aad: ad };
        match self {
            CipherChoice::ChaChaPoly => {
                let cipher = ChaCha20Poly1305::new((&key.0).into());
                cipher
                    .encrypt((&nonce).into(), payload)
                    .map_err(|_| NoiseError::MacFailure)
            }
            CipherChoice::Aes256Gcm => {
                let cipher = Aes256Gcm::new((&key.0).into());
                cipher
                    .encrypt((&nonce).into(), payload)
                    .map_err(|_| NoiseError::MacFailure)
            }
        }
    }

    /// `decrypt(k, n, ad, ciphertext) -> plaintext`; fails with
    /// [`NoiseError::MacFailure`] on tag mismatch.
    pub fn decrypt(self, key: &CipherKey, n: u64, ad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < TAG_LEN {
            return Err(NoiseError::InvalidLength("ciphertext shorter than tag"));
        }
        let nonce = nonce_bytes(self, n);
        let payload = Payload { msg: ciphertext, aad: ad };
        match self {
            CipherChoice::ChaChaPoly => {
                let cipher = ChaCha20Poly1305::new((&key.0).into());
                cipher
                    .decrypt((&nonce).into(), payload)
                    .map_err(|_| NoiseError::MacFailure)
            }
            CipherChoice::Aes256Gcm => {
                let cipher = Aes256Gcm::new((&key.0).into());
                cipher
                    .decrypt((&nonce).into(), payload)
                    .map_err(|_| NoiseError::MacFailure)
            }
        }
    }
}
