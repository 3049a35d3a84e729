//! Noise Protocol Framework core: symmetric state, cipher state and a
//! token-driven handshake state machine over a pluggable primitive registry.
//!
//! - DH: Curve25519 (`x25519-dalek`), Curve448 (`ed448-goldilocks`)
//! - AEAD: ChaCha20-Poly1305, AES-256-GCM
//! - Hash: SHA-256, SHA-512, BLAKE2s, BLAKE2b
//! - Secrets (`k`, `ck`, private keys, PSKs) are zeroized on drop.
//!
//! Transport framing, on-disk key storage, and TLS/X.509 integration are
//! out of scope; callers build those on top of [`HandshakeState`] and
//! [`CipherState`].
#![forbid(unsafe_code)]

pub mod cipher;
pub mod cipher_state;
pub mod dh;
pub mod handshake_state;
pub mod hash;
pub mod identifiers;
pub mod pattern;
pub mod protocol_id;
pub mod symmetric_state;

pub use cipher_state::CipherState;
pub use handshake_state::{Action, HandshakeState, Role};
pub use pattern::Pattern;
pub use protocol_id::ProtocolId;

/// Noise messages (handshake or transport) may not exceed this many bytes.
pub const MAX_MESSAGE_LEN: usize = 65535;
/// AEAD authentication tag length used by every cipher in the registry.
pub const TAG_LEN: usize = 16;
/// Width of a pre-shared key.
pub const PSK_LEN: usize = 32;

/// Closed error taxonomy for the Noise core.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NoiseError {
    #[error("unknown primitive identifier: {0}")]
    UnknownId(String),
    #[error("unknown protocol name: {0}")]
    UnknownName(String),
    #[error("AEAD authentication failed")]
    MacFailure,
    #[error("operation not applicable to this pattern: {0}")]
    NotApplicable(&'static str),
    #[error("required key not installed before start(): {0}")]
    MissingKey(&'static str),
    #[error("invalid length: {0}")]
    InvalidLength(&'static str),
    #[error("nonce counter exhausted")]
    MaxNonce,
    #[error("operation violates the handshake action sequence")]
    InvalidState,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid signature")]
    InvalidSignature,
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, NoiseError>;
