//! Weighted-sum-zero block.

use crate::error::Error;
use crate::instance::Instance;
use crate::payload::{point_at, scalar_at, set_point, set_scalar, Layout, Slot, SlotKind};
use crate::proof::Proof;
use crate::utils::{random_scalar, scalar_from_i64};
use blsful::inner_types::*;

/// Proves that the weighted sum of a set of committed values is zero.
///
/// The verification equation carries no `g` term, which is exactly what
/// reveals that the weighted sum of the committed values vanishes.
// e = challenge
// k_# = coefficient, o_s_# / C_s_# = opening / commitment at indices[#]
//
// [r] = h ^ r = R
// [r - e(o_s_1 * k_1 + o_s_2 * k_2 + ...)] * (C_s_1) ^ ek_1 * (C_s_2) ^ ek_2 * ... = R
#[derive(Clone, Debug)]
pub(crate) struct WsumZeroBlock {
    terms: Vec<(i64, usize)>,
}

impl WsumZeroBlock {
    pub(crate) fn new(terms: Vec<(i64, usize)>) -> Self {
        WsumZeroBlock { terms }
    }

    pub(crate) fn claim_secret_layout(&self) -> Layout {
        Layout::element(SlotKind::Scalar)
    }

    pub(crate) fn claim_public_layout(&self) -> Layout {
        Layout::element(SlotKind::Point)
    }

    pub(crate) fn response_layout(&self) -> Layout {
        Layout::element(SlotKind::Scalar)
    }

    pub(crate) fn claim_gen(
        &self,
        proof: &Proof,
        claim_secret: &mut [Slot],
        claim_public: &mut [Slot],
    ) -> Result<(), Error> {
        let r = random_scalar();
        set_scalar(claim_secret, 0, r);
        // R = h ^ r
        set_point(claim_public, 0, proof.h() * r);
        Ok(())
    }

    pub(crate) fn response_gen(
        &self,
        inst: &Instance,
        claim_secret: &[Slot],
        challenge: &Scalar,
        response: &mut [Slot],
    ) -> Result<(), Error> {
        // z = r - e(o_s_1 * k_1 + o_s_2 * k_2 + ...)
        let mut weighted = Scalar::ZERO;
        for &(coeff, index) in &self.terms {
            weighted += inst.opening(index)? * scalar_from_i64(coeff);
        }
        let z = scalar_at(claim_secret, 0) - *challenge * weighted;
        set_scalar(response, 0, z);
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
        // Verify h ^ z * (C_s_1) ^ (e * k_1) * (C_s_2) ^ (e * k_2) * ... = R
        let mut weighted = G1Projective::IDENTITY;
        for &(coeff, index) in &self.terms {
            weighted += inst.commitment(index) * scalar_from_i64(coeff);
        }
        let left = proof.h() * scalar_at(response, 0) + weighted * *challenge;
        left == point_at(claim_public, 0)
    }
}
