//! Camenisch-Lysyanskaya signatures on tuples of scalars.
//!
//! Signature components live in `G1` and public keys in `G2`, so the scheme
//! slots into the BLS12-381 pairing. Signatures are re-randomizable: raising
//! every component to one exponent yields another valid signature on the
//! same messages, which is what the signature-possession block exploits.

use crate::payload::{set_point, Slot};
use crate::utils::{pair, pair_eq, random_scalar, SecretScalar, DST_G1, DST_G2};
use blsful::inner_types::*;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A CL signature scheme: the message tuple length and the generators used
/// for signing and pairing checks.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct SigScheme {
    n: usize,
    g: G1Projective,
    g_hat: G2Projective,
}

impl SigScheme {
    /// A scheme for `n`-message signatures over hash-derived generators.
    pub fn new(n: usize) -> Self {
        let mut array = [0xFDu8; 32];
        let g = G1Projective::hash::<ExpandMsgXmd<sha2::Sha256>>(&array, DST_G1);
        array[0] = 0xFC;
        let g_hat = G2Projective::hash::<ExpandMsgXmd<sha2::Sha256>>(&array, DST_G2);
        Self::with_generators(n, g, g_hat)
    }

    /// A scheme over caller-supplied generators.
    pub fn with_generators(n: usize, g: G1Projective, g_hat: G2Projective) -> Self {
        assert!(n >= 1, "a signature covers at least one message");
        SigScheme { n, g, g_hat }
    }

    /// The number of messages covered by one signature.
    pub fn message_len(&self) -> usize {
        self.n
    }

    pub(crate) fn g_hat(&self) -> G2Projective {
        self.g_hat
    }

    /// Create a random key pair.
    pub fn keygen(&self) -> (SigSecretKey, SigPublicKey) {
        let secret_key = SigSecretKey {
            x: SecretScalar(random_scalar()),
            y: SecretScalar(random_scalar()),
            z: (1..self.n).map(|_| SecretScalar(random_scalar())).collect(),
        };
        let public_key = secret_key.public_key(self);
        (secret_key, public_key)
    }

    /// Sign a message tuple.
    pub fn sign(&self, secret_key: &SigSecretKey, messages: &[Scalar]) -> Signature {
        assert_eq!(messages.len(), self.n, "message tuple length mismatch");
        let x = secret_key.x.0;
        let y = secret_key.y.0;
        let xy = x * y;

        // b = a ^ y
        let a = self.g * random_scalar();
        let b = a * y;

        // c = a ^ (x + x * y * m_0) * A_1 ^ (x * y * m_1) * ...
        let mut c = a * (x + xy * messages[0]);
        let mut a_caps = Vec::with_capacity(self.n - 1);
        let mut b_caps = Vec::with_capacity(self.n - 1);
        for (i, z) in secret_key.z.iter().enumerate() {
            // A_# = a ^ z_#, B_# = A_# ^ y
            let a_cap = a * z.0;
            c += a_cap * (xy * messages[1 + i]);
            b_caps.push(a_cap * y);
            a_caps.push(a_cap);
        }

        Signature {
            a,
            b,
            c,
            a_caps,
            b_caps,
        }
    }

    /// Verify a signature on a message tuple.
    pub fn verify(
        &self,
        public_key: &SigPublicKey,
        sig: &Signature,
        messages: &[Scalar],
    ) -> bool {
        if messages.len() != self.n
            || public_key.z.len() != self.n - 1
            || sig.a_caps.len() != self.n - 1
            || sig.b_caps.len() != self.n - 1
        {
            return false;
        }

        // Verify <a, Y> = <b, ĝ>
        if !pair_eq(sig.a, public_key.y, sig.b, self.g_hat) {
            return false;
        }

        for i in 0..self.n - 1 {
            // Verify <a, Z_#> = <A_#, ĝ>
            if !pair_eq(sig.a, public_key.z[i], sig.a_caps[i], self.g_hat) {
                return false;
            }
            // Verify <A_#, Y> = <B_#, ĝ>
            if !pair_eq(sig.a_caps[i], public_key.y, sig.b_caps[i], self.g_hat) {
                return false;
            }
        }

        // Verify <a, X> * <b, X> ^ m_0 * <B_1, X> ^ m_1 * ... = <c, ĝ>
        let mut left = pair(sig.a, public_key.x) + pair(sig.b, public_key.x) * messages[0];
        for i in 0..self.n - 1 {
            left += pair(sig.b_caps[i], public_key.x) * messages[1 + i];
        }
        left == pair(sig.c, self.g_hat)
    }
}

/// A CL signing key `(x, y, z_1..z_{n-1})`. Wiped on drop.
#[derive(Clone, Debug)]
pub struct SigSecretKey {
    pub(crate) x: SecretScalar,
    pub(crate) y: SecretScalar,
    pub(crate) z: Vec<SecretScalar>,
}

impl Drop for SigSecretKey {
    fn drop(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.z.zeroize();
    }
}

impl SigSecretKey {
    /// The public key `(X, Y, Z_1..Z_{n-1}) = (ĝ^x, ĝ^y, ĝ^{z_#})`.
    pub fn public_key(&self, scheme: &SigScheme) -> SigPublicKey {
        SigPublicKey {
            x: scheme.g_hat * self.x.0,
            y: scheme.g_hat * self.y.0,
            z: self.z.iter().map(|z| scheme.g_hat * z.0).collect(),
        }
    }
}

/// A CL verification key `(X, Y, Z_1..Z_{n-1})`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct SigPublicKey {
    pub(crate) x: G2Projective,
    pub(crate) y: G2Projective,
    pub(crate) z: Vec<G2Projective>,
}

impl SigPublicKey {
    pub(crate) fn x(&self) -> G2Projective {
        self.x
    }

    pub(crate) fn y(&self) -> G2Projective {
        self.y
    }

    pub(crate) fn z(&self, index: usize) -> G2Projective {
        self.z[index]
    }

    pub(crate) fn tail_len(&self) -> usize {
        self.z.len()
    }
}

/// A CL signature `(a, b, c, A_1..A_{n-1}, B_1..B_{n-1})`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Signature {
    pub(crate) a: G1Projective,
    pub(crate) b: G1Projective,
    pub(crate) c: G1Projective,
    pub(crate) a_caps: Vec<G1Projective>,
    pub(crate) b_caps: Vec<G1Projective>,
}

impl Signature {
    // Supplement slots consumed in wire order: a, b, c, A_#.., B_#..
    pub(crate) fn slot_count(&self) -> usize {
        3 + self.a_caps.len() + self.b_caps.len()
    }

    pub(crate) fn store(&self, slots: &mut [Slot]) {
        set_point(slots, 0, self.a);
        set_point(slots, 1, self.b);
        set_point(slots, 2, self.c);
        let l = self.a_caps.len();
        for i in 0..l {
            set_point(slots, 3 + i, self.a_caps[i]);
            set_point(slots, 3 + l + i, self.b_caps[i]);
        }
    }
}
