//! Hash-function registry and Noise-HKDF.
//!
//! `hkdf` implements Noise's own domain-separated chained-HMAC construction
//! directly (not the `hkdf` crate's RFC 5869
//! extract/expand, which the chaining-key update does not match token for
//! token) — grounded on `nyx-crypto`'s `SymmetricState::mix_key`, which did
//! the same chained-HMAC derivation for a single fixed hash (SHA-256) and
//! is generalized here over the four registered hash choices.

use blake2::{Blake2b512, Blake2s256};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroize;

use crate::NoiseError;

/// The four hash functions named by the Noise protocol name grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashChoice {
    Sha256,
    Sha512,
    Blake2s,
    Blake2b,
}

impl HashChoice {
    /// Digest width in bytes.
    pub const fn hash_len(self) -> usize {
        match self {
            HashChoice::Sha256 => 32,
            HashChoice::Sha512 => 64,
            HashChoice::Blake2s => 32,
            HashChoice::Blake2b => 64,
        }
    }

    /// `hash(data) -> bytes[hash_len]`.
    pub fn hash(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashChoice::Sha256 => Sha256::digest(data).to_vec(),
            HashChoice::Sha512 => Sha512::digest(data).to_vec(),
            HashChoice::Blake2s => Blake2s256::digest(data).to_vec(),
            HashChoice::Blake2b => Blake2b512::digest(data).to_vec(),
        }
    }

    /// `HMAC-HASH(key, data)`.
    pub fn hmac(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            HashChoice::Sha256 => hmac_with::<Hmac<Sha256>>(key, data),
            HashChoice::Sha512 => hmac_with::<Hmac<Sha512>>(key, data),
            HashChoice::Blake2s => hmac_with::<Hmac<Blake2s256>>(key, data),
            HashChoice::Blake2b => hmac_with::<Hmac<Blake2b512>>(key, data),
        }
    }

    /// Noise-HKDF: `HKDF(chaining_key, input_key_material, num_outputs)`.
    ///
    /// `num_outputs` must be 2 or 3. Returns `num_outputs`
    /// buffers of `hash_len` bytes each.
    pub fn hkdf(self, chaining_key: &[u8], ikm: &[u8], num_outputs: usize) -> crate::Result<Vec<Vec<u8>>> {
        if !(2..=3).contains(&num_outputs) {
            return Err(NoiseError::InvalidLength("hkdf num_outputs must be 2 or 3"));
        }
        let mut temp_key = self.hmac(chaining_key, ikm);
        let output1 = self.hmac(&temp_key, &[0x01]);
        let mut info2 = output1.clone();
        info2.push(0x02);
        let output2 = self.hmac(&temp_key, &info2);
        info2.zeroize();
        let mut outputs = vec![output1, output2];
        if num_outputs == 3 {
            let mut info3 = outputs[1].clone();
            info3.push(0x03);
            let output3 = self.hmac(&temp_key, &info3);
            info3.zeroize();
            outputs.push(output3);
        }
        temp_key.zeroize();
        Ok(outputs)
    }
}

fn hmac_with<M: Mac + hmac::digest::KeyInit>(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
