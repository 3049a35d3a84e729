//! Universal property 2: every fundamental pattern reaches `Split` after
//! exactly `pattern.messages.len()` messages, with both sides agreeing on
//! the final handshake hash and producing compatible transport ciphers.

use noise_protocol_core::dh::DhGroup;
use noise_protocol_core::{Action, HandshakeState, ProtocolId, Role};
use rand::rngs::OsRng;

const PATTERNS: &[&str] = &[
    "N", "K", "X", "NN", "NK", "NX", "KN", "KK", "KX", "XN", "XK", "XX", "IN", "IK", "IX",
];

#[test]
fn every_fundamental_pattern_reaches_split_with_matching_hash() {
    let mut rng = OsRng;
    for base in PATTERNS {
        let name = format!("Noise_{base}_25519_ChaChaPoly_SHA256");
        let id: ProtocolId = name.parse().unwrap_or_else(|e| panic!("{name}: {e}"));
        let mut init = HandshakeState::new(&id, Role::Initiator).unwrap();
        let mut resp = HandshakeState::new(&id, Role::Responder).unwrap();

        if init.needs_local_static_keypair() {
            init.set_local_static(DhGroup::Curve25519.generate(&mut rng)).unwrap();
        }
        if resp.needs_local_static_keypair() {
            resp.set_local_static(DhGroup::Curve25519.generate(&mut rng)).unwrap();
        }
        if init.needs_remote_static_public_key() {
            let resp_static = resp
                .local_static_public()
                .expect("responder must carry the static key this pattern requires in advance");
            init.set_remote_static(resp_static).unwrap();
        }
        if resp.needs_remote_static_public_key() {
            let init_static = init
                .local_static_public()
                .expect("initiator must carry the static key this pattern requires in advance");
            resp.set_remote_static(init_static).unwrap();
        }

        init.start().unwrap_or_else(|e| panic!("{name} init.start: {e}"));
        resp.start().unwrap_or_else(|e| panic!("{name} resp.start: {e}"));

        let expected_messages = id.pattern().unwrap().messages.len();
        let mut driven = 0;
        loop {
            match (init.get_action(), resp.get_action()) {
                (Action::WriteMessage, Action::ReadMessage) => {
                    let m = init.write_message(&mut rng, b"").unwrap_or_else(|e| panic!("{name}: {e}"));
                    resp.read_message(&m).unwrap_or_else(|e| panic!("{name}: {e}"));
                    driven += 1;
                }
                (Action::ReadMessage, Action::WriteMessage) => {
                    let m = resp.write_message(&mut rng, b"").unwrap_or_else(|e| panic!("{name}: {e}"));
                    init.read_message(&m).unwrap_or_else(|e| panic!("{name}: {e}"));
                    driven += 1;
                }
                (Action::Split, Action::Split) => break,
                other => panic!("{name}: mismatched actions {other:?}"),
            }
        }
        assert_eq!(driven, expected_messages, "{name}: message count");
        assert_eq!(init.handshake_hash(), resp.handshake_hash(), "{name}: handshake hash mismatch");

        let (mut i1, i2) = init.split().unwrap();
        let (mut r1, r2) = resp.split().unwrap();
        let ct = i1.encrypt_with_ad(b"", b"x").unwrap();
        if let Some(mut r2) = r2 {
            assert_eq!(r2.decrypt_with_ad(b"", &ct).unwrap(), b"x", "{name}: i1/r2 mismatch");
        } else {
            // One-way pattern: r1 is the responder's only (receive) cipher.
            assert_eq!(r1.decrypt_with_ad(b"", &ct).unwrap(), b"x", "{name}: i1/r1 mismatch");
        }
        let _ = i2;
    }
}
