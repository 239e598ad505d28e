use blsful::inner_types::*;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};
use zeroize::DefaultIsZeroes;

/// Salt for scalars drawn by this crate
pub(crate) const SALT: &[u8] = b"AGORA-SIGMA-SCALAR-SALT-";

/// Hash to a uniform scalar.
///
/// With `data` present the output is a deterministic digest of
/// `salt || data`; otherwise 32 fresh bytes from `rng` are expanded instead.
pub fn generate_fr(salt: &[u8], data: Option<&[u8]>, mut rng: impl RngCore + CryptoRng) -> Scalar {
    let mut hasher = Shake256::default();
    hasher.update(salt);
    match data {
        Some(d) => hasher.update(d),
        None => {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            hasher.update(&seed);
        }
    }
    let mut okm = [0u8; 64];
    hasher.finalize_xof().read(&mut okm);
    Scalar::from_bytes_wide(&okm)
}

// Every piece of protocol randomness (openings, claim randomizers, blinding
// exponents) comes through here.
pub(crate) fn random_scalar() -> Scalar {
    generate_fr(SALT, None, rand::rngs::OsRng)
}

/// The bilinear pairing `e: G1 x G2 -> Gt`.
pub(crate) fn pair(p: G1Projective, q: G2Projective) -> Gt {
    multi_miller_loop(&[(&p.to_affine(), &G2Prepared::from(q.to_affine()))])
        .final_exponentiation()
}

// e(p1, q1) == e(p2, q2), checked with a single Miller loop.
pub(crate) fn pair_eq(
    p1: G1Projective,
    q1: G2Projective,
    p2: G1Projective,
    q2: G2Projective,
) -> bool {
    multi_miller_loop(&[
        (&p1.to_affine(), &G2Prepared::from(q1.to_affine())),
        (&p2.to_affine(), &G2Prepared::from((-q2).to_affine())),
    ])
    .final_exponentiation()
    .is_identity()
    .into()
}

// Signed coefficients map into the field through the absolute value.
pub(crate) fn scalar_from_i64(value: i64) -> Scalar {
    if value < 0 {
        -Scalar::from(value.unsigned_abs())
    } else {
        Scalar::from(value as u64)
    }
}

/// Squeeze a challenge scalar out of a transcript.
pub fn challenge_scalar(label: &'static [u8], transcript: &mut Transcript) -> Scalar {
    let mut okm = [0u8; 64];
    transcript.challenge_bytes(label, &mut okm);
    Scalar::from_bytes_wide(&okm)
}

/// A secret scalar that is wiped when zeroized.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SecretScalar(pub(crate) Scalar);

impl DefaultIsZeroes for SecretScalar {}

/// Commitment bases shared between the prover and verifier of a proof.
///
/// Callers with an existing trusted setup can build the struct directly;
/// [`ProofParams::default`] derives bases by hashing to the curve, so no
/// party knows the discrete log of `h` with respect to `g`.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct ProofParams {
    /// The base that carries committed values.
    pub g: G1Projective,
    /// The base that carries openings.
    pub h: G1Projective,
}

pub(crate) const DST_G1: &[u8] = b"BLS12381G1_XMD:SHA-256_SSWU_RO_";
pub(crate) const DST_G2: &[u8] = b"BLS12381G2_XMD:SHA-256_SSWU_RO_";

impl Default for ProofParams {
    fn default() -> ProofParams {
        let mut array = [0xFFu8; 32];
        let g = G1Projective::hash::<ExpandMsgXmd<sha2::Sha256>>(&array, DST_G1);
        array[0] = 0xFE;
        let h = G1Projective::hash::<ExpandMsgXmd<sha2::Sha256>>(&array, DST_G1);
        ProofParams { g, h }
    }
}

impl ProofParams {
    /// Add the commitment bases to a transcript.
    pub fn add_to_transcript(&self, transcript: &mut Transcript) {
        transcript.append_message(b"Commitment Base G", self.g.to_compressed().as_ref());
        transcript.append_message(b"Commitment Base H", self.h.to_compressed().as_ref());
    }
}
