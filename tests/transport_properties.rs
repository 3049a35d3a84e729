//! Universal properties 3, 4, 6: transport symmetry, tag-forgery
//! detection, and the nonce ceiling.

use noise_protocol_core::dh::DhGroup;
use noise_protocol_core::{HandshakeState, NoiseError, ProtocolId, Role};
use rand::rngs::OsRng;

fn split_nn_session() -> (noise_protocol_core::CipherState, noise_protocol_core::CipherState) {
    let mut rng = OsRng;
    let id: ProtocolId = "Noise_NN_25519_ChaChaPoly_SHA256".parse().unwrap();
    let mut init = HandshakeState::new(&id, Role::Initiator).unwrap();
    let mut resp = HandshakeState::new(&id, Role::Responder).unwrap();
    init.start().unwrap();
    resp.start().unwrap();
    let m1 = init.write_message(&mut rng, b"").unwrap();
    resp.read_message(&m1).unwrap();
    let m2 = resp.write_message(&mut rng, b"").unwrap();
    init.read_message(&m2).unwrap();
    let (send, recv) = init.split().unwrap();
    let (send2, recv2) = resp.split().unwrap();
    // NN is interactive: both directions are present.
    let _ = (&recv, &send2);
    (send, recv2)
}

#[test]
fn transport_symmetry_over_many_messages() {
    let (mut a_send, mut b_recv) = split_nn_session();
    for n in 0..50u64 {
        let payload = format!("message {n}");
        let ct = a_send.encrypt_with_ad(b"associated", payload.as_bytes()).unwrap();
        let pt = b_recv.decrypt_with_ad(b"associated", &ct).unwrap();
        assert_eq!(pt, payload.as_bytes());
        assert_eq!(a_send.nonce(), n + 1);
        assert_eq!(b_recv.nonce(), n + 1);
    }
}

#[test]
fn tag_forgery_is_detected_in_transport() {
    let (mut a_send, mut b_recv) = split_nn_session();
    let ct = a_send.encrypt_with_ad(b"", b"payload").unwrap();
    for bit in 0..ct.len() {
        let mut tampered = ct.clone();
        tampered[bit] ^= 0x01;
        let nonce_before = b_recv.nonce();
        let err = b_recv.decrypt_with_ad(b"", &tampered).unwrap_err();
        assert_eq!(err, NoiseError::MacFailure);
        // A failed decrypt must not advance the receiver's nonce.
        assert_eq!(b_recv.nonce(), nonce_before);
    }
    // The untampered ciphertext still decrypts correctly afterwards.
    assert_eq!(b_recv.decrypt_with_ad(b"", &ct).unwrap(), b"payload");
}

#[test]
fn tag_forgery_is_detected_during_handshake() {
    let mut rng = OsRng;
    let id: ProtocolId = "Noise_NN_25519_ChaChaPoly_SHA256".parse().unwrap();
    let mut init = HandshakeState::new(&id, Role::Initiator).unwrap();
    let mut resp = HandshakeState::new(&id, Role::Responder).unwrap();
    init.start().unwrap();
    resp.start().unwrap();
    let mut m1 = init.write_message(&mut rng, b"payload").unwrap();
    let last = m1.len() - 1;
    m1[last] ^= 0x01;
    assert_eq!(resp.read_message(&m1).unwrap_err(), NoiseError::MacFailure);
}

// The nonce-ceiling property (n == 2^64 - 1 rejects with MaxNonce) is
// exercised in `src/cipher_state.rs`'s unit tests, which can reach into
// the private counter directly; there is no public API to drive it there
// from outside the crate without 2^64 real encrypts.

mod proptest_transport {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn arbitrary_payloads_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..256), ad in proptest::collection::vec(any::<u8>(), 0..64)) {
            let (mut a_send, mut b_recv) = split_nn_session();
            let ct = a_send.encrypt_with_ad(&ad, &payload).unwrap();
            prop_assert_eq!(b_recv.decrypt_with_ad(&ad, &ct).unwrap(), payload);
        }
    }
}
