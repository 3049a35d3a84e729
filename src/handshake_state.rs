//! HandshakeState: the token-driven handshake state machine.
//!
//! Grounded on `al-net`'s `HandshakeState` in `handshake_state.rs` (a
//! message-index cursor stepping through a pattern's token lists,
//! an explicit action/result enum, and per-token DH dispatch keyed on
//! initiator/responder role) generalized from its fixed XX pattern to the
//! full registry in [`crate::pattern`], and composed over our own
//! [`SymmetricState`] rather than that crate's.

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::cipher_state::CipherState;
use crate::dh::{DhGroup, KeyPair, PublicKey};
use crate::pattern::{Pattern, PreToken, Token};
use crate::protocol_id::ProtocolId;
use crate::symmetric_state::SymmetricState;
use crate::{NoiseError, Result, MAX_MESSAGE_LEN};

/// Which side of the handshake this state machine plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

/// The single action a caller must take next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    NoAction,
    WriteMessage,
    ReadMessage,
    Split,
    Failed,
}

/// A live Noise handshake: key material, running symmetric state, and a
/// cursor into the pattern's message list.
pub struct HandshakeState {
    role: Role,
    dh: DhGroup,
    pattern: Pattern,
    symmetric: SymmetricState,
    message_index: usize,
    started: bool,
    failed: bool,
    prologue: Vec<u8>,
    local_static: Option<KeyPair>,
    local_ephemeral: Option<KeyPair>,
    remote_static: Option<PublicKey>,
    remote_ephemeral: Option<PublicKey>,
    psk: Option<[u8; 32]>,
}

impl HandshakeState {
    /// Construct a handshake for `protocol` playing `role`. Local/remote
    /// keys and the prologue must still be supplied before [`Self::start`].
    pub fn new(protocol: &ProtocolId, role: Role) -> Result<Self> {
        let pattern = protocol.pattern()?;
        let symmetric = SymmetricState::initialize(&protocol.to_string(), protocol.hash, protocol.cipher);
        Ok(Self {
            role,
            dh: protocol.dh,
            pattern,
            symmetric,
            message_index: 0,
            started: false,
            failed: false,
            prologue: Vec::new(),
            local_static: None,
            local_ephemeral: None,
            remote_static: None,
            remote_ephemeral: None,
            psk: None,
        })
    }

    /// Must be called, if at all, before [`Self::start`].
    pub fn set_prologue(&mut self, prologue: &[u8]) -> Result<()> {
        if self.started {
            return Err(NoiseError::InvalidState);
        }
        self.prologue = prologue.to_vec();
        Ok(())
    }

    pub fn set_local_static(&mut self, keypair: KeyPair) -> Result<()> {
        if self.started {
            return Err(NoiseError::InvalidState);
        }
        self.local_static = Some(keypair);
        Ok(())
    }

    pub fn set_remote_static(&mut self, public: PublicKey) -> Result<()> {
        if self.started {
            return Err(NoiseError::InvalidState);
        }
        self.remote_static = Some(public);
        Ok(())
    }

    pub fn set_pre_shared_key(&mut self, psk: [u8; 32]) -> Result<()> {
        if self.started {
            return Err(NoiseError::InvalidState);
        }
        if !self.pattern.requires_psk() {
            return Err(NoiseError::NotApplicable("pattern has no psk token"));
        }
        self.psk = Some(psk);
        Ok(())
    }

    /// Pin the local ephemeral keypair instead of generating one at the
    /// first `e` token. Test-only: production callers should let
    /// [`Self::write_message`] draw a fresh ephemeral from a CSPRNG.
    pub fn set_fixed_ephemeral_for_testing(&mut self, keypair: KeyPair) {
        self.local_ephemeral = Some(keypair);
    }

    /// The local static public key, if one has been installed. Lets a
    /// caller hand its own static public key to a peer out-of-band before
    /// either side calls [`Self::start`], as patterns with a static
    /// pre-message require.
    pub fn local_static_public(&self) -> Option<PublicKey> {
        self.local_static.as_ref().map(|kp| kp.public().clone())
    }

    /// The peer's static public key, once learned via a pre-message or a
    /// `Token::S` read during the handshake. This is how a caller running
    /// `XX`/`IK`/etc. retrieves the authenticated identity the handshake
    /// just established.
    pub fn get_remote_public_key(&self) -> Option<&PublicKey> {
        self.remote_static.as_ref()
    }

    pub fn needs_local_static_keypair(&self) -> bool {
        let pre = match self.role {
            Role::Initiator => &self.pattern.premessages_initiator,
            Role::Responder => &self.pattern.premessages_responder,
        };
        if pre.contains(&PreToken::S) {
            return true;
        }
        self.pattern
            .messages
            .iter()
            .enumerate()
            .any(|(i, toks)| self.writes_at(i) && toks.contains(&Token::S))
    }

    /// Whether an ephemeral keypair must be installed before [`Self::start`]
    /// rather than generated at the first `e` token — true only when `e`
    /// appears in this side's own pre-message, which is rare; the ordinary
    /// case draws a fresh ephemeral from the CSPRNG inside
    /// [`Self::write_message`].
    pub fn needs_local_ephemeral_keypair(&self) -> bool {
        let pre = match self.role {
            Role::Initiator => &self.pattern.premessages_initiator,
            Role::Responder => &self.pattern.premessages_responder,
        };
        pre.contains(&PreToken::E)
    }

    pub fn needs_remote_static_public_key(&self) -> bool {
        let pre = match self.role {
            Role::Initiator => &self.pattern.premessages_responder,
            Role::Responder => &self.pattern.premessages_initiator,
        };
        pre.contains(&PreToken::S)
    }

    fn writes_at(&self, message_index: usize) -> bool {
        let initiator_turn = message_index % 2 == 0;
        match self.role {
            Role::Initiator => initiator_turn,
            Role::Responder => !initiator_turn,
        }
    }

    /// `Initialize`'s prologue/pre-message mixing.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(NoiseError::InvalidState);
        }
        if self.needs_local_static_keypair() && self.local_static.is_none() {
            return Err(NoiseError::MissingKey("local static keypair required by pattern"));
        }
        if self.needs_remote_static_public_key() && self.remote_static.is_none() {
            return Err(NoiseError::MissingKey("remote static public key required by pattern"));
        }
        if self.pattern.requires_psk() && self.psk.is_none() {
            return Err(NoiseError::MissingKey("pre-shared key required by pattern"));
        }
        let prologue = std::mem::take(&mut self.prologue);
        self.symmetric.mix_hash(&prologue);
        for tok in self.pattern.premessages_initiator.clone() {
            let bytes = self.premessage_bytes(Role::Initiator, tok)?;
            self.symmetric.mix_hash(&bytes);
        }
        for tok in self.pattern.premessages_responder.clone() {
            let bytes = self.premessage_bytes(Role::Responder, tok)?;
            self.symmetric.mix_hash(&bytes);
        }
        self.started = true;
        debug!(pattern = %self.pattern.name, role = ?self.role, "handshake started");
        Ok(())
    }

    fn premessage_bytes(&self, owner: Role, tok: PreToken) -> Result<Vec<u8>> {
        let is_local = owner == self.role;
        match (tok, is_local) {
            (PreToken::S, true) => self
                .local_static
                .as_ref()
                .map(|kp| kp.public().as_bytes().to_vec())
                .ok_or(NoiseError::MissingKey("local static premessage key")),
            (PreToken::S, false) => self
                .remote_static
                .as_ref()
                .map(|pk| pk.as_bytes().to_vec())
                .ok_or(NoiseError::MissingKey("remote static premessage key")),
            (PreToken::E, true) => self
                .local_ephemeral
                .as_ref()
                .map(|kp| kp.public().as_bytes().to_vec())
                .ok_or(NoiseError::MissingKey("local ephemeral premessage key")),
            (PreToken::E, false) => self
                .remote_ephemeral
                .as_ref()
                .map(|pk| pk.as_bytes().to_vec())
                .ok_or(NoiseError::MissingKey("remote ephemeral premessage key")),
        }
    }

    /// The single action the caller must perform next.
    pub fn get_action(&self) -> Action {
        if self.failed {
            return Action::Failed;
        }
        if !self.started {
            return Action::NoAction;
        }
        if self.message_index >= self.pattern.messages.len() {
            return Action::Split;
        }
        if self.writes_at(self.message_index) {
            Action::WriteMessage
        } else {
            Action::ReadMessage
        }
    }

    fn check_action(&self, expected: Action) -> Result<()> {
        if !self.started {
            return Err(NoiseError::InvalidState);
        }
        if self.get_action() != expected {
            return Err(NoiseError::InvalidState);
        }
        Ok(())
    }

    /// Write the next handshake message, encrypting `payload` under the
    /// accumulated handshake hash.
    pub fn write_message<R: RngCore + CryptoRng>(&mut self, rng: &mut R, payload: &[u8]) -> Result<Vec<u8>> {
        self.check_action(Action::WriteMessage)?;
        match self.write_message_inner(rng, payload) {
            Ok(buf) => {
                self.message_index += 1;
                Ok(buf)
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    fn write_message_inner<R: RngCore + CryptoRng>(&mut self, rng: &mut R, payload: &[u8]) -> Result<Vec<u8>> {
        let tokens = self.pattern.messages[self.message_index].clone();
        let mut buf = Vec::new();
        for tok in tokens {
            match tok {
                Token::E => {
                    let kp = match self.local_ephemeral.take() {
                        Some(kp) => kp,
                        None => self.dh.generate(rng),
                    };
                    trace!("writing e");
                    self.symmetric.mix_hash(kp.public().as_bytes());
                    buf.extend_from_slice(kp.public().as_bytes());
                    self.local_ephemeral = Some(kp);
                }
                Token::S => {
                    trace!("writing s");
                    let kp = self
                        .local_static
                        .as_ref()
                        .ok_or(NoiseError::MissingKey("s"))?;
                    let ct = self.symmetric.encrypt_and_hash(kp.public().as_bytes())?;
                    buf.extend_from_slice(&ct);
                }
                Token::Ee => self.mix_ee()?,
                Token::Es => self.mix_es()?,
                Token::Se => self.mix_se()?,
                Token::Ss => self.mix_ss()?,
                Token::Psk => self.mix_psk()?,
            }
        }
        let ct = self.symmetric.encrypt_and_hash(payload)?;
        buf.extend_from_slice(&ct);
        if buf.len() > MAX_MESSAGE_LEN {
            return Err(NoiseError::InvalidLength("handshake message exceeds MAX_MESSAGE_LEN"));
        }
        Ok(buf)
    }

    /// Read and decrypt the next handshake message, returning its payload.
    pub fn read_message(&mut self, message: &[u8]) -> Result<Vec<u8>> {
        self.check_action(Action::ReadMessage)?;
        if message.len() > MAX_MESSAGE_LEN {
            self.failed = true;
            return Err(NoiseError::InvalidLength("handshake message exceeds MAX_MESSAGE_LEN"));
        }
        match self.read_message_inner(message) {
            Ok(pt) => {
                self.message_index += 1;
                Ok(pt)
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    fn read_message_inner(&mut self, message: &[u8]) -> Result<Vec<u8>> {
        let tokens = self.pattern.messages[self.message_index].clone();
        let mut cursor = 0usize;
        for tok in tokens {
            match tok {
                Token::E => {
                    let len = self.dh.key_len();
                    let bytes = message
                        .get(cursor..cursor + len)
                        .ok_or(NoiseError::InvalidLength("message too short for e"))?;
                    cursor += len;
                    trace!("reading e");
                    self.symmetric.mix_hash(bytes);
                    self.remote_ephemeral = Some(PublicKey(bytes.to_vec()));
                }
                Token::S => {
                    let len = self.dh.key_len() + self.symmetric.cipher_min_ciphertext_overhead();
                    let bytes = message
                        .get(cursor..cursor + len)
                        .ok_or(NoiseError::InvalidLength("message too short for s"))?;
                    cursor += len;
                    trace!("reading s");
                    let pt = self.symmetric.decrypt_and_hash(bytes)?;
                    self.remote_static = Some(PublicKey(pt));
                }
                Token::Ee => self.mix_ee()?,
                Token::Es => self.mix_es()?,
                Token::Se => self.mix_se()?,
                Token::Ss => self.mix_ss()?,
                Token::Psk => self.mix_psk()?,
            }
        }
        let ct = message
            .get(cursor..)
            .ok_or(NoiseError::InvalidLength("message shorter than its token prefix"))?;
        self.symmetric.decrypt_and_hash(ct)
    }

    fn mix_ee(&mut self) -> Result<()> {
        let local = self.local_ephemeral.as_ref().ok_or(NoiseError::MissingKey("e"))?;
        let remote = self.remote_ephemeral.as_ref().ok_or(NoiseError::MissingKey("re"))?;
        let ss = self.dh.dh(local.private(), remote.as_bytes())?;
        self.symmetric.mix_key(ss.as_bytes())
    }

    fn mix_es(&mut self) -> Result<()> {
        let ss = match self.role {
            Role::Initiator => {
                let local = self.local_ephemeral.as_ref().ok_or(NoiseError::MissingKey("e"))?;
                let remote = self.remote_static.as_ref().ok_or(NoiseError::MissingKey("rs"))?;
                self.dh.dh(local.private(), remote.as_bytes())?
            }
            Role::Responder => {
                let local = self.local_static.as_ref().ok_or(NoiseError::MissingKey("s"))?;
                let remote = self.remote_ephemeral.as_ref().ok_or(NoiseError::MissingKey("re"))?;
                self.dh.dh(local.private(), remote.as_bytes())?
            }
        };
        self.symmetric.mix_key(ss.as_bytes())
    }

    fn mix_se(&mut self) -> Result<()> {
        let ss = match self.role {
            Role::Initiator => {
                let local = self.local_static.as_ref().ok_or(NoiseError::MissingKey("s"))?;
                let remote = self.remote_ephemeral.as_ref().ok_or(NoiseError::MissingKey("re"))?;
                self.dh.dh(local.private(), remote.as_bytes())?
            }
            Role::Responder => {
                let local = self.local_ephemeral.as_ref().ok_or(NoiseError::MissingKey("e"))?;
                let remote = self.remote_static.as_ref().ok_or(NoiseError::MissingKey("rs"))?;
                self.dh.dh(local.private(), remote.as_bytes())?
            }
        };
        self.symmetric.mix_key(ss.as_bytes())
    }

    fn mix_ss(&mut self) -> Result<()> {
        let local = self.local_static.as_ref().ok_or(NoiseError::MissingKey("s"))?;
        let remote = self.remote_static.as_ref().ok_or(NoiseError::MissingKey("rs"))?;
        let ss = self.dh.dh(local.private(), remote.as_bytes())?;
        self.symmetric.mix_key(ss.as_bytes())
    }

    fn mix_psk(&mut self) -> Result<()> {
        let psk = self.psk.ok_or(NoiseError::MissingKey("psk"))?;
        self.symmetric.mix_key_and_hash(&psk)
    }

    /// `Split()`: available once [`Self::get_action`] reports
    /// [`Action::Split`]. One-way patterns (`N`, `K`, `X`) only ever use
    /// the initiator-to-responder direction, so the reverse cipher state
    /// is returned as `None`.
    pub fn split(mut self) -> Result<(CipherState, Option<CipherState>)> {
        if self.get_action() != Action::Split {
            return Err(NoiseError::InvalidState);
        }
        let (cs1, cs2) = self.symmetric.split()?;
        debug!(pattern = %self.pattern.name, "handshake split into transport cipher states");
        if self.pattern.is_one_way() {
            Ok((cs1, None))
        } else {
            Ok((cs1, Some(cs2)))
        }
    }

    /// The accumulated handshake hash, usable as a channel-binding value
    /// once the handshake has reached [`Action::Split`].
    pub fn handshake_hash(&self) -> &[u8] {
        self.symmetric.handshake_hash()
    }
}

impl Drop for HandshakeState {
    fn drop(&mut self) {
        self.psk.zeroize();
    }
}
