//! Name/id registry for DH groups, ciphers, hashes and the protocol-name
//! prefix, closing out the primitive taxonomy with string round-trips.
//!
//! Grounded on `snow`'s `DHChoice`/`CipherChoice`/`HashChoice` string
//! parsing in `params.rs`, generalized into one small lookup
//! table per category instead of one `FromStr` impl per enum.

use crate::cipher::CipherChoice;
use crate::dh::DhGroup;
use crate::hash::HashChoice;
use crate::NoiseError;

/// The `Noise`/`NoisePSK` name prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamePrefix {
    Standard,
    Psk,
}

pub fn prefix_to_name(prefix: NamePrefix) -> &'static str {
    match prefix {
        NamePrefix::Standard => "Noise",
        NamePrefix::Psk => "NoisePSK",
    }
}

pub fn name_to_prefix(s: &str) -> crate::Result<NamePrefix> {
    match s {
        "Noise" => Ok(NamePrefix::Standard),
        "NoisePSK" => Ok(NamePrefix::Psk),
        other => Err(NoiseError::UnknownName(other.to_string())),
    }
}

pub fn dh_to_name(dh: DhGroup) -> &'static str {
    match dh {
        DhGroup::Curve25519 => "25519",
        DhGroup::Curve448 => "448",
    }
}

pub fn name_to_dh(s: &str) -> crate::Result<DhGroup> {
    match s {
        "25519" => Ok(DhGroup::Curve25519),
        "448" => Ok(DhGroup::Curve448),
        other => Err(NoiseError::UnknownId(other.to_string())),
    }
}

pub fn cipher_to_name(cipher: CipherChoice) -> &'static str {
    match cipher {
        CipherChoice::ChaChaPoly => "ChaChaPoly",
        CipherChoice::Aes256Gcm => "AESGCM",
    }
}

pub fn name_to_cipher(s: &str) -> crate::Result<CipherChoice> {
    match s {
        "ChaChaPoly" => Ok(CipherChoice::ChaChaPoly),
        "AESGCM" => Ok(CipherChoice::Aes256Gcm),
        other => Err(NoiseError::UnknownId(other.to_string())),
    }
}

pub fn hash_to_name(hash: HashChoice) -> &'static str {
    match hash {
        HashChoice::Sha256 => "SHA256",
        HashChoice::Sha512 => "SHA512",
        HashChoice::Blake2s => "BLAKE2s",
        HashChoice::Blake2b => "BLAKE2b",
    }
}

pub fn name_to_hash(s: &str) -> crate::Result<HashChoice> {
    match s {
        "SHA256" => Ok(HashChoice::Sha256),
        "SHA512" => Ok(HashChoice::Sha512),
        "BLAKE2s" => Ok(HashChoice::Blake2s),
        "BLAKE2b" => Ok(HashChoice::Blake2b),
        other => Err(NoiseError::UnknownId(other.to_string())),
    }
}
