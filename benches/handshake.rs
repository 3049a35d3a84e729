//! Criterion benchmarks for handshake throughput and transport cost.

use criterion::{criterion_group, criterion_main, Criterion};
use noise_protocol_core::{Action, HandshakeState, ProtocolId, Role};
use rand::rngs::OsRng;

fn run_xx_handshake() {
    let mut rng = OsRng;
    let id: ProtocolId = "Noise_XX_25519_ChaChaPoly_SHA256".parse().unwrap();
    let mut init = HandshakeState::new(&id, Role::Initiator).unwrap();
    let mut resp = HandshakeState::new(&id, Role::Responder).unwrap();
    init.set_local_static(noise_protocol_core::dh::DhGroup::Curve25519.generate(&mut rng)).unwrap();
    resp.set_local_static(noise_protocol_core::dh::DhGroup::Curve25519.generate(&mut rng)).unwrap();
    init.start().unwrap();
    resp.start().unwrap();

    let m1 = init.write_message(&mut rng, b"").unwrap();
    resp.read_message(&m1).unwrap();
    let m2 = resp.write_message(&mut rng, b"").unwrap();
    init.read_message(&m2).unwrap();
    let m3 = init.write_message(&mut rng, b"").unwrap();
    resp.read_message(&m3).unwrap();

    assert_eq!(init.get_action(), Action::Split);
    let _ = init.split().unwrap();
    let _ = resp.split().unwrap();
}

fn bench_xx_handshake(c: &mut Criterion) {
    c.bench_function("xx_handshake_full", |b| b.iter(run_xx_handshake));
}

fn bench_transport_message(c: &mut Criterion) {
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
    let (mut send, _recv) = init.split().unwrap();
    let recv = _recv.unwrap();
    let _ = recv;

    c.bench_function("transport_encrypt_1kb", |b| {
        let payload = vec![0u8; 1024];
        b.iter(|| send.encrypt_with_ad(b"", &payload).unwrap())
    });
}

criterion_group!(benches, bench_xx_handshake, bench_transport_message);
criterion_main!(benches);
