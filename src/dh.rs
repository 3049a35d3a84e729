//! DH group registry: Curve25519 and Curve448.
//!
//! Grounded on `nyx-crypto`'s `StaticKeypair` wrapper around
//! `x25519-dalek` (see `ik_demo::StaticKeypair` in the prior revision of
//! this crate) and generalized to a second curve selected by
//! [`DhGroup`], the way `snow`'s `CryptoResolver::resolve_dh` dispatches on
//! a `DHChoice` to a concrete `Dh` implementation.

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::{NoiseError, Result};

/// The two DH groups named by the Noise protocol name grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DhGroup {
    Curve25519,
    Curve448,
}

impl DhGroup {
    /// Private and public key length in bytes (equal for both groups).
    pub const fn key_len(self) -> usize {
        match self {
            DhGroup::Curve25519 => 32,
            DhGroup::Curve448 => 56,
        }
    }

    /// Generate a fresh keypair from a cryptographically strong RNG.
    pub fn generate<R: RngCore + CryptoRng>(self, rng: &mut R) -> KeyPair {
        match self {
            DhGroup::Curve25519 => {
                let mut seed = [0u8; 32];
                rng.fill_bytes(&mut seed);
                let kp = curve25519::keypair_from_seed(&seed);
                seed.zeroize();
                kp
            }
            DhGroup::Curve448 => {
                let mut seed = [0u8; 56];
                rng.fill_bytes(&mut seed);
                let kp = curve448::keypair_from_seed(&seed);
                seed.zeroize();
                kp
            }
        }
    }

    /// Derive the public key for a raw private-key byte string, clamping it
    /// per the group's rules first.
    pub fn derive_public(self, private: &[u8]) -> Result<PublicKey> {
        match self {
            DhGroup::Curve25519 => curve25519::derive_public(private),
            DhGroup::Curve448 => curve448::derive_public(private),
        }
    }

    /// Diffie-Hellman: `DH(private, public) -> shared secret`.
    ///
    /// An invalid (e.g. all-zero / low-order) output is returned as-is:
    /// Noise does not reject small-order DH results at this layer.
    pub fn dh(self, private: &[u8], public: &[u8]) -> Result<SharedSecret> {
        match self {
            DhGroup::Curve25519 => curve25519::dh(private, public),
            DhGroup::Curve448 => curve448::dh(private, public),
        }
    }
}

/// A local keypair. Present or absent as a whole.
#[derive(Clone)]
pub struct KeyPair {
    private: Vec<u8>,
    public: PublicKey,
}

impl KeyPair {
    pub fn from_parts(private: Vec<u8>, public: PublicKey) -> Self {
        Self { private, public }
    }

    pub fn private(&self) -> &[u8] {
        &self.private
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private.zeroize();
    }
}

/// A remote (or derived-local) public key. Not secret, but fixed width.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(pub Vec<u8>);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// The output of a DH operation; zeroized on drop like any other secret.
pub struct SharedSecret(pub Vec<u8>);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

mod curve25519 {
    use super::*;
    use x25519_dalek::{PublicKey as XPublic, StaticSecret as XSecret};

    pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
        let secret = XSecret::from(*seed);
        let public = XPublic::from(&secret);
        KeyPair::from_parts(secret.to_bytes().to_vec(), PublicKey(public.to_bytes().to_vec()))
    }

    pub fn derive_public(private: &[u8]) -> Result<PublicKey> {
        let bytes: [u8; 32] = private
            .try_into()
            .map_err(|_| NoiseError::InvalidPrivateKey)?;
        let secret = XSecret::from(bytes);
        let public = XPublic::from(&secret);
        Ok(PublicKey(public.to_bytes().to_vec()))
    }

    pub fn dh(private: &[u8], public: &[u8]) -> Result<SharedSecret> {
        let priv_bytes: [u8; 32] = private
            .try_into()
            .map_err(|_| NoiseError::InvalidPrivateKey)?;
        let pub_bytes: [u8; 32] = public
            .try_into()
            .map_err(|_| NoiseError::InvalidPublicKey)?;
        let secret = XSecret::from(priv_bytes);
        let public = XPublic::from(pub_bytes);
        Ok(SharedSecret(secret.diffie_hellman(&public).to_bytes().to_vec()))
    }
}

mod curve448 {
    use super::*;
    use ed448_goldilocks::x448::{PublicKey as X448Public, Secret as X448Secret};

    pub fn keypair_from_seed(seed: &[u8; 56]) -> KeyPair {
        let secret = X448Secret::from(*seed);
        let public = X448Public::from(&secret);
        KeyPair::from_parts(secret.to_bytes().to_vec(), PublicKey(public.to_bytes().to_vec()))
    }

    pub fn derive_public(private: &[u8]) -> Result<PublicKey> {
        let bytes: [u8; 56] = private
            .try_into()
            .map_err(|_| NoiseError::InvalidPrivateKey)?;
        let secret = X448Secret::from(bytes);
        let public = X448Public::from(&secret);
        Ok(PublicKey(public.to_bytes().to_vec()))
    }

    pub fn dh(private: &[u8], public: &[u8]) -> Result<SharedSecret> {
        let priv_bytes: [u8; 56] = private
            .try_into()
            .map_err(|_| NoiseError::InvalidPrivateKey)?;
        let pub_bytes: [u8; 56] = public
            .try_into()
            .map_err(|_| NoiseError::InvalidPublicKey)?;
        let secret = X448Secret::from(priv_bytes);
        let public = X448Public::from(pub_bytes);
        Ok(SharedSecret(secret.diffie_hellman(&public).to_bytes().to_vec()))
    }
}
