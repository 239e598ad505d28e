//! Signature-possession block.
//!
//! Proves knowledge of a CL signature on a tuple of committed values without
//! revealing the signature or the values. The held signature sits in the
//! instance supplement; every claim re-randomizes it with fresh blinding
//! exponents before publishing it, so transcripts are unlinkable.

use crate::error::Error;
use crate::instance::Instance;
use crate::payload::{
    point_at, scalar_at, set_point, set_scalar, set_target, target_at, Layout, Slot, SlotKind,
};
use crate::proof::Proof;
use crate::sig::{SigPublicKey, SigScheme};
use crate::utils::{pair, pair_eq, random_scalar};
use blsful::inner_types::Scalar;

// e = challenge, <x, y> = bilinear pairing, ĝ = scheme G2 generator
// X, Y, Z_# = public key
//
// q, p fresh per claim
// a = (a in sig) ^ q, b = (b in sig) ^ q, A_# = (A_# in sig) ^ q,
// B_# = (B_# in sig) ^ q, c = (c in sig) ^ (q * p)
//
// m_#, o_m_#, C_m_# = value / opening / commitment at indices[#]
//
// Vx    = <a, X>
// Vxy   = <b, X>
// Vxy_# = <B_#, X>
// Vq    = Vx * Vxy ^ m_0 * Vxy_1 ^ m_1 * ...
// Vs    = <c, ĝ> = Vq ^ p
//
// [r_p, r_0, r'_0, r_1, r'_1, ...] =
//     (Vq ^ r_p, Vxy ^ r_0 * Vxy_1 ^ r_1 * ..., g ^ r_0 * h ^ r'_0, ...)
// [p, m_0, o_m_0, m_1, o_m_1, ...] = (Vs, Vq / Vx, C_m_0, C_m_1, ...)
#[derive(Clone, Debug)]
pub(crate) struct SignatureBlock {
    scheme: SigScheme,
    public_key: SigPublicKey,
    indices: Vec<usize>,
    slot_id: u32,
}

impl SignatureBlock {
    pub(crate) fn new(
        scheme: SigScheme,
        public_key: SigPublicKey,
        indices: Vec<usize>,
        slot_id: u32,
    ) -> Self {
        SignatureBlock {
            scheme,
            public_key,
            indices,
            slot_id,
        }
    }

    pub(crate) fn slot_id(&self) -> u32 {
        self.slot_id
    }

    // Signature components in wire order: a, b, c, A_1.., B_1..
    fn sig_len(&self) -> usize {
        2 * self.scheme.message_len() + 1
    }

    pub(crate) fn supplement_layout(&self) -> Layout {
        Layout::array(SlotKind::Point, self.sig_len())
    }

    pub(crate) fn claim_secret_layout(&self) -> Layout {
        // p, r_p, then r_# and r'_# for every message
        Layout::concat([
            Layout::array(SlotKind::Scalar, 2),
            Layout::array(SlotKind::Scalar, 2 * self.scheme.message_len()),
        ])
    }

    pub(crate) fn claim_public_layout(&self) -> Layout {
        // Vq, the blinded signature, R_Vs, R_Vq, then R_# per message
        Layout::concat([
            Layout::element(SlotKind::Target),
            Layout::array(SlotKind::Point, self.sig_len()),
            Layout::array(SlotKind::Target, 2),
            Layout::array(SlotKind::Point, self.scheme.message_len()),
        ])
    }

    pub(crate) fn response_layout(&self) -> Layout {
        // x_p, then x_# and o_x_# for every message
        Layout::array(SlotKind::Scalar, 1 + 2 * self.scheme.message_len())
    }

    pub(crate) fn claim_gen(
        &self,
        proof: &Proof,
        inst: &Instance,
        supplement: &[Slot],
        claim_secret: &mut [Slot],
        claim_public: &mut [Slot],
    ) -> Result<(), Error> {
        let n = self.scheme.message_len();
        let l = n - 1;
        let sig_len = self.sig_len();

        // Blind the held signature by raising every component to q, then
        // raise c to p on top: c ends up (c in sig) ^ (q * p).
        let q = random_scalar();
        for i in 0..sig_len {
            set_point(claim_public, 1 + i, point_at(supplement, i) * q);
        }
        let p = random_scalar();
        set_scalar(claim_secret, 0, p);
        let c = point_at(claim_public, 3);
        set_point(claim_public, 3, c * p);

        // R_# = g ^ r_# * h ^ r'_#
        for i in 0..n {
            let r = random_scalar();
            let o_r = random_scalar();
            set_scalar(claim_secret, 2 + i, r);
            set_scalar(claim_secret, 2 + n + i, o_r);
            set_point(
                claim_public,
                3 + sig_len + i,
                proof.g() * r + proof.h() * o_r,
            );
        }

        // Vq   = Vx * Vxy ^ m_0 * Vxy_1 ^ m_1 * ...
        // R_Vq = Vxy ^ r_0 * Vxy_1 ^ r_1 * ...
        let x_key = self.public_key.x();
        let v_x = pair(point_at(claim_public, 1), x_key);
        let v_xy = pair(point_at(claim_public, 2), x_key);
        let mut r_vq = v_xy * scalar_at(claim_secret, 2);
        let mut v_q = v_x + v_xy * inst.secret_value(self.indices[0])?;
        for i in 0..l {
            let v_xy_i = pair(point_at(claim_public, 4 + l + i), x_key);
            r_vq += v_xy_i * scalar_at(claim_secret, 2 + 1 + i);
            v_q += v_xy_i * inst.secret_value(self.indices[1 + i])?;
        }
        set_target(claim_public, 0, v_q);
        set_target(claim_public, 2 + sig_len, r_vq);

        // R_Vs = Vq ^ r_p
        let r_p = random_scalar();
        set_scalar(claim_secret, 1, r_p);
        set_target(claim_public, 1 + sig_len, v_q * r_p);
        Ok(())
    }

    pub(crate) fn response_gen(
        &self,
        inst: &Instance,
        claim_secret: &[Slot],
        challenge: &Scalar,
        response: &mut [Slot],
    ) -> Result<(), Error> {
        let n = self.scheme.message_len();
        let e = *challenge;

        // x_p = e * p + r_p
        set_scalar(
            response,
            0,
            e * scalar_at(claim_secret, 0) + scalar_at(claim_secret, 1),
        );

        for (i, &index) in self.indices.iter().enumerate() {
            // x_# = e * m_# + r_#
            set_scalar(
                response,
                1 + i,
                e * inst.secret_value(index)? + scalar_at(claim_secret, 2 + i),
            );
            // o_x_# = e * o_m_# + r'_#
            set_scalar(
                response,
                1 + n + i,
                e * inst.opening(index)? + scalar_at(claim_secret, 2 + n + i),
            );
        }
        Ok(())
    }

    pub(crate) fn response_verify(
        &self,
        proof: &Proof,
        inst: &Instance,
        claim_public: &[Slot],
        challenge: &Scalar,
        response: &[Slot],
    ) -> bool {
        let n = self.scheme.message_len();
        let l = n - 1;
        let sig_len = self.sig_len();
        let e = *challenge;

        // Verify g ^ x_# * h ^ o_x_# = C_m_# ^ e * R_#
        for (i, &index) in self.indices.iter().enumerate() {
            let left =
                proof.g() * scalar_at(response, 1 + i) + proof.h() * scalar_at(response, 1 + n + i);
            let right = inst.commitment(index) * e + point_at(claim_public, 3 + sig_len + i);
            if left != right {
                return false;
            }
        }

        let v_q = target_at(claim_public, 0);
        let a = point_at(claim_public, 1);
        let b = point_at(claim_public, 2);
        let c = point_at(claim_public, 3);
        let g_hat = self.scheme.g_hat();

        // Verify Vq ^ x_p = Vs ^ e * R_Vs
        let left = v_q * scalar_at(response, 0);
        let right = pair(c, g_hat) * e + target_at(claim_public, 1 + sig_len);
        if left != right {
            return false;
        }

        // Verify <a, Z_#> = <A_#, ĝ>
        for i in 0..l {
            if !pair_eq(a, self.public_key.z(i), point_at(claim_public, 4 + i), g_hat) {
                return false;
            }
        }

        // Verify <a, Y> = <b, ĝ>
        if !pair_eq(a, self.public_key.y(), b, g_hat) {
            return false;
        }

        // Verify <A_#, Y> = <B_#, ĝ>
        for i in 0..l {
            if !pair_eq(
                point_at(claim_public, 4 + i),
                self.public_key.y(),
                point_at(claim_public, 4 + l + i),
                g_hat,
            ) {
                return false;
            }
        }

        // Verify Vx ^ e * Vxy ^ x_0 * Vxy_1 ^ x_1 * ... = Vq ^ e * R_Vq
        let x_key = self.public_key.x();
        let mut left = pair(a, x_key) * e + pair(b, x_key) * scalar_at(response, 1);
        for i in 0..l {
            left += pair(point_at(claim_public, 4 + l + i), x_key) * scalar_at(response, 2 + i);
        }
        let right = v_q * e + target_at(claim_public, 2 + sig_len);
        left == right
    }
}
