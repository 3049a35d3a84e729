//! SymmetricState: the running handshake hash `h` and chaining key `ck`,
//! plus the inner [`CipherState`] they key.
//!
//! Grounded on `nyx-crypto`'s `HandshakeHash`/`SymmetricState` pairing in
//! `nyx-crypto::noise` (`mix_hash`/`mix_key` updating a running SHA-256
//! digest and chaining key together) generalized over the hash registry
//! and extended with `MixKeyAndHash` and `Split` for full pattern support.

use zeroize::Zeroize;

use crate::cipher::CipherChoice;
use crate::cipher_state::CipherState;
use crate::hash::HashChoice;
use crate::Result;

/// `SymmetricState`: `h`, `ck`, and an inner `CipherState` that
/// is keyed only once a DH or PSK token has been mixed in.
pub struct SymmetricState {
    hash: HashChoice,
    h: Vec<u8>,
    ck: Vec<u8>,
    cipher: CipherState,
}

impl SymmetricState {
    /// `InitializeSymmetric(protocol_name)`.
    pub fn initialize(protocol_name: &str, hash: HashChoice, cipher: CipherChoice) -> Self {
        let name_bytes = protocol_name.as_bytes();
        let h = if name_bytes.len() <= hash.hash_len() {
            let mut buf = vec![0u8; hash.hash_len()];
            buf[..name_bytes.len()].copy_from_slice(name_bytes);
            buf
        } else {
            hash.hash(name_bytes)
        };
        let ck = h.clone();
        Self { hash, h, ck, cipher: CipherState::new(cipher) }
    }

    /// `MixKey(input_key_material)`.
    pub fn mix_key(&mut self, ikm: &[u8]) -> Result<()> {
        let mut outputs = self.hash.hkdf(&self.ck, ikm, 2)?;
        self.ck.zeroize();
        self.ck = outputs[0].clone();
        let mut temp_k = outputs[1].clone();
        let key = truncate_key(&temp_k);
        self.cipher.initialize_key(key);
        temp_k.zeroize();
        for o in outputs.iter_mut() {
            o.zeroize();
        }
        Ok(())
    }

    /// `MixHash(data)`.
    pub fn mix_hash(&mut self, data: &[u8]) {
        let mut input = self.h.clone();
        input.extend_from_slice(data);
        self.h = self.hash.hash(&input);
        input.zeroize();
    }

    /// `MixKeyAndHash(input_key_material)` (used only by `psk` tokens).
    pub fn mix_key_and_hash(&mut self, ikm: &[u8]) -> Result<()> {
        let mut outputs = self.hash.hkdf(&self.ck, ikm, 3)?;
        self.ck.zeroize();
        self.ck = outputs[0].clone();
        self.mix_hash(&outputs[1]);
        let key = truncate_key(&outputs[2]);
        self.cipher.initialize_key(key);
        for o in outputs.iter_mut() {
            o.zeroize();
        }
        Ok(())
    }

    /// The running handshake hash, used as associated data by transport
    /// messages' channel binding and as the basis for `GetHandshakeHash`.
    pub fn handshake_hash(&self) -> &[u8] {
        &self.h
    }

    /// Bytes added to a DH public key's width when an `s` token is
    /// ciphertext rather than plaintext, i.e. the AEAD tag once a key has
    /// been mixed in.
    pub fn cipher_min_ciphertext_overhead(&self) -> usize {
        self.cipher.min_ciphertext_len()
    }

    /// `EncryptAndHash(plaintext)`.
    pub fn encrypt_and_hash(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let ct = self.cipher.encrypt_with_ad(&self.h, plaintext)?;
        self.mix_hash(&ct);
        Ok(ct)
    }

    /// `DecryptAndHash(ciphertext)`.
    pub fn decrypt_and_hash(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let pt = self.cipher.decrypt_with_ad(&self.h, ciphertext)?;
        self.mix_hash(ciphertext);
        Ok(pt)
    }

    /// `Split()`: derive the pair of transport `CipherState`s.
    pub fn split(&self) -> Result<(CipherState, CipherState)> {
        let suite = self.cipher_suite();
        let outputs = self.hash.hkdf(&self.ck, &[], 2)?;
        let mut cs1 = CipherState::new(suite);
        let mut cs2 = CipherState::new(suite);
        cs1.initialize_key(truncate_key(&outputs[0]));
        cs2.initialize_key(truncate_key(&outputs[1]));
        for mut o in outputs {
            o.zeroize();
        }
        Ok((cs1, cs2))
    }

    fn cipher_suite(&self) -> CipherChoice {
        self.cipher.suite_for_split()
    }
}

impl Drop for SymmetricState {
    fn drop(&mut self) {
        self.h.zeroize();
        self.ck.zeroize();
    }
}

/// HKDF outputs are `hash_len` bytes; AEAD keys are always 32 bytes, so
/// SHA-512/BLAKE2b outputs are truncated to the first 32 bytes.
fn truncate_key(material: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    key.copy_from_slice(&material[..32]);
    key
}
