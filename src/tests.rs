// Runs a suite of end-to-end tests over the proof engine

use crate::sig::SigScheme;
use crate::*;
use blsful::inner_types::*;
use std::io::Cursor;

// Drives the full prover-to-verifier exchange over a serialized message:
// public values, commitments, public claim, response.
fn exchange(
    proof: &Proof,
    prover: &Instance,
    public_vars: &[Var],
    challenge: &Scalar,
) -> (Instance, Payload, Payload) {
    let (claim_secret, claim_public) = proof.claim_gen(prover).unwrap();
    let response = proof.response_gen(prover, &claim_secret, challenge).unwrap();

    let mut message = Vec::new();
    for &var in public_vars {
        prover.write_var(var, &mut message).unwrap();
    }
    prover.write_commitments(&mut message).unwrap();
    claim_public.write(&mut message).unwrap();
    response.write(&mut message).unwrap();

    let mut stream = Cursor::new(message);
    let mut verifier = Instance::verifier(proof);
    for &var in public_vars {
        verifier.read_var(proof, var, &mut stream).unwrap();
    }
    verifier.read_commitments(&mut stream).unwrap();
    verifier.update(proof).unwrap();
    let claim_public = Payload::read(&proof.claim_public_layout(), &mut stream).unwrap();
    let response = Payload::read(&proof.response_layout(), &mut stream).unwrap();
    (verifier, claim_public, response)
}

// Proves m = p * q with a public product, end to end over the wire
#[test]
fn product_proof() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let p = proof.var_secret();
    let q = proof.var_secret();
    let m = proof.var_public();
    proof.require_mul(m, p, q);

    let challenge = Scalar::from(1_000_001u64);

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, p, -2).unwrap();
    prover.set_var_i64(&proof, q, -2).unwrap();
    prover.set_var_i64(&proof, m, 4).unwrap();
    prover.update(&proof).unwrap();

    let (verifier, claim_public, response) = exchange(&proof, &prover, &[m], &challenge);
    assert!(proof.response_verify(&verifier, &claim_public, &challenge, &response));
}

// Proves m = p * q and m + p + q = 0 in one circuit
#[test]
fn product_and_sum_proof() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let p = proof.var_secret();
    let q = proof.var_secret();
    let m = proof.var_secret();
    proof.require_mul(m, p, q);
    proof.require_wsum_zero(&[(1, m), (1, p), (1, q)]);

    let challenge = Scalar::from(1_000_001u64);

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, p, -2).unwrap();
    prover.set_var_i64(&proof, q, -2).unwrap();
    prover.set_var_i64(&proof, m, 4).unwrap();
    prover.update(&proof).unwrap();

    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(proof.response_verify(&verifier, &claim_public, &challenge, &response));
}

// A prover with inconsistent values must be rejected
#[test]
fn inconsistent_product_rejected() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let p = proof.var_secret();
    let q = proof.var_secret();
    let m = proof.var_secret();
    proof.require_mul(m, p, q);

    let challenge = Scalar::from(1_000_001u64);

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, p, 3).unwrap();
    prover.set_var_i64(&proof, q, 5).unwrap();
    prover.set_var_i64(&proof, m, 14).unwrap();
    prover.update(&proof).unwrap();

    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(!proof.response_verify(&verifier, &claim_public, &challenge, &response));
}

// Equality of a secret and a public value, both honest and dishonest
#[test]
fn equals_public_proof() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let s = proof.var_secret();
    let v = proof.var_public();
    proof.require_equal(&[s, v]);

    let challenge = Scalar::random(rand::rngs::OsRng);

    let mut prover = Instance::prover(&proof);
    prover.set_var_u64(&proof, s, 42).unwrap();
    prover.set_var_u64(&proof, v, 42).unwrap();
    prover.update(&proof).unwrap();
    let (verifier, claim_public, response) = exchange(&proof, &prover, &[v], &challenge);
    assert!(proof.response_verify(&verifier, &claim_public, &challenge, &response));

    let mut prover = Instance::prover(&proof);
    prover.set_var_u64(&proof, s, 42).unwrap();
    prover.set_var_u64(&proof, v, 43).unwrap();
    prover.update(&proof).unwrap();
    let (verifier, claim_public, response) = exchange(&proof, &prover, &[v], &challenge);
    assert!(!proof.response_verify(&verifier, &claim_public, &challenge, &response));
}

// A chain of three equal secrets, and rejection when one differs
#[test]
fn equality_chain_proof() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let a = proof.var_secret();
    let b = proof.var_secret();
    let c = proof.var_secret();
    proof.require_equal(&[a, b, c]);

    let challenge = Scalar::random(rand::rngs::OsRng);

    let mut prover = Instance::prover(&proof);
    prover.set_var_u64(&proof, a, 7).unwrap();
    prover.set_var_u64(&proof, b, 7).unwrap();
    prover.set_var_u64(&proof, c, 7).unwrap();
    prover.update(&proof).unwrap();
    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(proof.response_verify(&verifier, &claim_public, &challenge, &response));

    prover.set_var_u64(&proof, b, 8).unwrap();
    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(!proof.response_verify(&verifier, &claim_public, &challenge, &response));
}

// Sum and difference conveniences over committed values
#[test]
fn sum_and_dif_proofs() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let a = proof.var_secret();
    let b = proof.var_secret();
    let s = proof.var_secret();
    let d = proof.var_secret();
    proof.require_sum(s, a, b);
    proof.require_dif(d, a, b);

    let challenge = Scalar::random(rand::rngs::OsRng);

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, a, 30).unwrap();
    prover.set_var_i64(&proof, b, 12).unwrap();
    prover.set_var_i64(&proof, s, 42).unwrap();
    prover.set_var_i64(&proof, d, 18).unwrap();
    prover.update(&proof).unwrap();
    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(proof.response_verify(&verifier, &claim_public, &challenge, &response));

    prover.set_var_i64(&proof, d, 17).unwrap();
    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(!proof.response_verify(&verifier, &claim_public, &challenge, &response));
}

// Possession of a CL signature over committed values tied into a product
// relation, with rejection when the signed tuple does not match
#[test]
fn signature_possession_proof() {
    let ProofParams { g, h } = ProofParams::default();
    let scheme = SigScheme::new(3);
    let (secret_key, public_key) = scheme.keygen();
    let messages = [
        Scalar::from(3u64),
        Scalar::from(4u64),
        Scalar::from(12u64),
    ];
    let sig = scheme.sign(&secret_key, &messages);
    assert!(scheme.verify(&public_key, &sig, &messages));

    let mut proof = Proof::new(g, h);
    let p = proof.var_secret();
    let q = proof.var_secret();
    let m = proof.var_secret();
    proof.require_mul(m, p, q);
    let slot = proof.require_sig(&scheme, &public_key, &[p, q, m]);

    let challenge = Scalar::random(rand::rngs::OsRng);

    let mut prover = Instance::prover(&proof);
    prover.set_var_u64(&proof, p, 3).unwrap();
    prover.set_var_u64(&proof, q, 4).unwrap();
    prover.set_var_u64(&proof, m, 12).unwrap();
    prover.update(&proof).unwrap();
    prover.load_signature(&proof, slot, &sig).unwrap();

    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(proof.response_verify(&verifier, &claim_public, &challenge, &response));

    // A signature over a different tuple must not pass for these values.
    let other = scheme.sign(
        &secret_key,
        &[Scalar::from(3u64), Scalar::from(4u64), Scalar::from(13u64)],
    );
    prover.load_signature(&proof, slot, &other).unwrap();
    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(!proof.response_verify(&verifier, &claim_public, &challenge, &response));
}

// Completeness holds for arbitrary challenges over one claim
#[test]
fn any_challenge_accepts() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let p = proof.var_secret();
    let q = proof.var_secret();
    let m = proof.var_secret();
    proof.require_mul(m, p, q);

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, p, -11).unwrap();
    prover.set_var_i64(&proof, q, 5).unwrap();
    prover.set_var_i64(&proof, m, -55).unwrap();
    prover.update(&proof).unwrap();

    let (claim_secret, claim_public) = proof.claim_gen(&prover).unwrap();
    for _ in 0..5 {
        let challenge = Scalar::random(rand::rngs::OsRng);
        let response = proof
            .response_gen(&prover, &claim_secret, &challenge)
            .unwrap();
        assert!(proof.response_verify(&prover, &claim_public, &challenge, &response));
    }
}

// A tampered response must be rejected
#[test]
fn tampered_response_rejected() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let a = proof.var_secret();
    let b = proof.var_secret();
    proof.require_equal(&[a, b]);

    let challenge = Scalar::random(rand::rngs::OsRng);

    let mut prover = Instance::prover(&proof);
    prover.set_var_u64(&proof, a, 5).unwrap();
    prover.set_var_u64(&proof, b, 5).unwrap();
    prover.update(&proof).unwrap();

    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    let mut bytes = response.to_bytes();
    // Flip one bit inside the first response scalar.
    bytes[20] ^= 1;
    let tampered = Payload::read(&proof.response_layout(), &mut Cursor::new(&bytes)).unwrap();
    assert!(!proof.response_verify(&verifier, &claim_public, &challenge, &tampered));
}

// The commitment invariant C = g^s * h^o holds after every setter call
#[test]
fn commitment_integrity() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let s = proof.var_secret();
    let mut inst = Instance::prover(&proof);
    for value in [0i64, 1, -5, 42, i64::MAX] {
        inst.set_var_i64(&proof, s, value).unwrap();
        let state = inst.secrets.as_ref().unwrap();
        let expected = g * state.values[0].0 + h * state.openings[0].0;
        assert_eq!(inst.secret_commitments[0], expected);
    }
}

// Instance variables survive a write/read cycle bit-exactly
#[test]
fn instance_var_roundtrip() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let s = proof.var_secret();
    let v = proof.var_public();

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, s, -123).unwrap();
    prover.set_var_u64(&proof, v, 456).unwrap();

    let mut bytes = Vec::new();
    prover.write_var(s, &mut bytes).unwrap();
    prover.write_var(v, &mut bytes).unwrap();

    let mut other = Instance::prover(&proof);
    let mut stream = Cursor::new(bytes);
    other.read_var(&proof, s, &mut stream).unwrap();
    other.read_var(&proof, v, &mut stream).unwrap();
    assert_eq!(other.var(s).unwrap(), prover.var(s).unwrap());
    assert_eq!(other.var(v).unwrap(), prover.var(v).unwrap());
}

// Both sides derive the same Fiat-Shamir challenge, and the proof verifies
// under it
#[test]
fn fiat_shamir_flow() {
    let ProofParams { g, h } = ProofParams::default();
    let mut proof = Proof::new(g, h);
    let p = proof.var_secret();
    let q = proof.var_secret();
    let m = proof.var_secret();
    proof.require_mul(m, p, q);

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, p, 6).unwrap();
    prover.set_var_i64(&proof, q, 7).unwrap();
    prover.set_var_i64(&proof, m, 42).unwrap();
    prover.update(&proof).unwrap();

    let (claim_secret, claim_public) = proof.claim_gen(&prover).unwrap();
    let challenge = proof.derive_challenge(&prover, &claim_public);
    let response = proof
        .response_gen(&prover, &claim_secret, &challenge)
        .unwrap();

    let mut message = Vec::new();
    prover.write_commitments(&mut message).unwrap();
    let mut stream = Cursor::new(message);
    let mut verifier = Instance::verifier(&proof);
    verifier.read_commitments(&mut stream).unwrap();
    verifier.update(&proof).unwrap();

    let rederived = proof.derive_challenge(&verifier, &claim_public);
    assert_eq!(challenge, rederived);
    assert!(proof.response_verify(&verifier, &claim_public, &rederived, &response));
}

// A verifier that assembled the same relations in a different order does
// not accept the prover's transcript
#[test]
fn insertion_order_must_match() {
    let ProofParams { g, h } = ProofParams::default();

    let mut proof = Proof::new(g, h);
    let p = proof.var_secret();
    let q = proof.var_secret();
    let m = proof.var_secret();
    proof.require_mul(m, p, q);
    proof.require_wsum_zero(&[(1, m), (1, p), (1, q)]);

    let mut swapped = Proof::new(g, h);
    let p2 = swapped.var_secret();
    let q2 = swapped.var_secret();
    let m2 = swapped.var_secret();
    swapped.require_wsum_zero(&[(1, m2), (1, p2), (1, q2)]);
    swapped.require_mul(m2, p2, q2);

    let challenge = Scalar::from(1_000_001u64);

    let mut prover = Instance::prover(&proof);
    prover.set_var_i64(&proof, p, -2).unwrap();
    prover.set_var_i64(&proof, q, -2).unwrap();
    prover.set_var_i64(&proof, m, 4).unwrap();
    prover.update(&proof).unwrap();

    let (verifier, claim_public, response) = exchange(&proof, &prover, &[], &challenge);
    assert!(proof.response_verify(&verifier, &claim_public, &challenge, &response));
    assert!(!swapped.response_verify(&verifier, &claim_public, &challenge, &response));
}

// Claim and response payloads round-trip through their wire form
#[test]
fn payload_roundtrip_matches_layout() {
    let ProofParams { g, h } = ProofParams::default();
    let scheme = SigScheme::new(2);
    let (secret_key, public_key) = scheme.keygen();
    let messages = [Scalar::from(8u64), Scalar::from(64u64)];
    let sig = scheme.sign(&secret_key, &messages);

    let mut proof = Proof::new(g, h);
    let a = proof.var_secret();
    let b = proof.var_secret();
    let slot = proof.require_sig(&scheme, &public_key, &[a, b]);

    let mut prover = Instance::prover(&proof);
    prover.set_var_u64(&proof, a, 8).unwrap();
    prover.set_var_u64(&proof, b, 64).unwrap();
    prover.update(&proof).unwrap();
    prover.load_signature(&proof, slot, &sig).unwrap();

    let (_, claim_public) = proof.claim_gen(&prover).unwrap();
    let bytes = claim_public.to_bytes();
    let restored =
        Payload::read(&proof.claim_public_layout(), &mut Cursor::new(&bytes)).unwrap();
    assert_eq!(claim_public, restored);
}
