//! Protocol-name codec: `Noise_<pattern>_<DH>_<cipher>_<hash>`.
//!
//! Grounded on `snow::NoiseParams`'s `FromStr`/`Display` round-trip (parsed
//! via `"...".parse().unwrap()` in caller code) but closed over
//! our own registry instead of trait objects.

use std::fmt;
use std::str::FromStr;

use crate::cipher::CipherChoice;
use crate::dh::DhGroup;
use crate::hash::HashChoice;
use crate::identifiers::{
    cipher_to_name, dh_to_name, hash_to_name, name_to_cipher, name_to_dh, name_to_hash,
    name_to_prefix, prefix_to_name, NamePrefix,
};
use crate::pattern::Pattern;
use crate::NoiseError;

/// A fully-resolved Noise protocol identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolId {
    pub prefix: NamePrefix,
    pub pattern_name: String,
    pub dh: DhGroup,
    pub cipher: CipherChoice,
    pub hash: HashChoice,
}

impl ProtocolId {
    /// Resolve the [`Pattern`] named by this identifier. When `prefix` is
    /// the legacy [`NamePrefix::Psk`] form, a `psk0` modifier is applied
    /// implicitly since the legacy grammar predates the `psk<N>` suffix
    /// and only ever meant "PSK mixed in before the first message".
    pub fn pattern(&self) -> crate::Result<Pattern> {
        match self.prefix {
            NamePrefix::Standard => Pattern::lookup(&self.pattern_name),
            NamePrefix::Psk => Pattern::lookup(&format!("{}psk0", self.pattern_name)),
        }
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}",
            prefix_to_name(self.prefix),
            self.pattern_name,
            dh_to_name(self.dh),
            cipher_to_name(self.cipher),
            hash_to_name(self.hash),
        )
    }
}

impl FromStr for ProtocolId {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('_').collect();
        let [prefix, pattern_name, dh, cipher, hash] = parts[..] else {
            return Err(NoiseError::UnknownName(s.to_string()));
        };
        Ok(ProtocolId {
            prefix: name_to_prefix(prefix)?,
            pattern_name: pattern_name.to_string(),
            dh: name_to_dh(dh)?,
            cipher: name_to_cipher(cipher)?,
            hash: name_to_hash(hash)?,
        })
    }
}

/// `protocol_name_to_id(name) -> id`.
pub fn protocol_name_to_id(name: &str) -> crate::Result<ProtocolId> {
    name.parse()
}

/// `id_to_protocol_name(id) -> name`.
pub fn id_to_protocol_name(id: &ProtocolId) -> String {
    id.to_string()
}
