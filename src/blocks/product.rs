//! Product block.

use crate::error::Error;
use crate::instance::Instance;
use crate::payload::{point_at, scalar_at, set_point, set_scalar, Layout, Slot, SlotKind};
use crate::proof::Proof;
use crate::utils::random_scalar;
use blsful::inner_types::Scalar;

/// Proves that the product of two committed values equals a third, by
/// running two sigma-protocols bound through the shared randomness `r_1`.
///
/// The second protocol re-uses the commitment to the second factor as a
/// base, which is what forces the multiplicative relationship.
// e = challenge
// f_1, o_f_1, C_f_1 = first factor; o_f_2, C_f_2 = second factor
// o_p, C_p = product
//
// [(r_1, r_2, r_3)]                 = (g ^ r_1 * h ^ r_2, C_f_2 ^ r_1 * h ^ r_3) = (R_1, R_2)
// [(f_1, o_f_1, o_p - o_f_2 * f_1)] = (C_f_1, C_p)
#[derive(Clone, Debug)]
pub(crate) struct ProductBlock {
    product_index: usize,
    factor_1_index: usize,
    factor_2_index: usize,
}

impl ProductBlock {
    pub(crate) fn new(product_index: usize, factor_1_index: usize, factor_2_index: usize) -> Self {
        ProductBlock {
            product_index,
            factor_1_index,
            factor_2_index,
        }
    }

    pub(crate) fn claim_secret_layout(&self) -> Layout {
        Layout::array(SlotKind::Scalar, 3)
    }

    pub(crate) fn claim_public_layout(&self) -> Layout {
        Layout::array(SlotKind::Point, 2)
    }

    pub(crate) fn response_layout(&self) -> Layout {
        Layout::array(SlotKind::Scalar, 3)
    }

    pub(crate) fn claim_gen(
        &self,
        proof: &Proof,
        inst: &Instance,
        claim_secret: &mut [Slot],
        claim_public: &mut [Slot],
    ) -> Result<(), Error> {
        let r_1 = random_scalar();
        let r_2 = random_scalar();
        let r_3 = random_scalar();
        set_scalar(claim_secret, 0, r_1);
        set_scalar(claim_secret, 1, r_2);
        set_scalar(claim_secret, 2, r_3);

        // R_1 = g ^ r_1 * h ^ r_2
        set_point(claim_public, 0, proof.g() * r_1 + proof.h() * r_2);

        // R_2 = C_f_2 ^ r_1 * h ^ r_3
        set_point(
            claim_public,
            1,
            inst.commitment(self.factor_2_index) * r_1 + proof.h() * r_3,
        );
        Ok(())
    }

    pub(crate) fn response_gen(
        &self,
        inst: &Instance,
        claim_secret: &[Slot],
        challenge: &Scalar,
        response: &mut [Slot],
    ) -> Result<(), Error> {
        let e = *challenge;
        let f_1 = inst.secret_value(self.factor_1_index)?;

        // z_1 = e * f_1 + r_1
        set_scalar(response, 0, e * f_1 + scalar_at(claim_secret, 0));

        // z_2 = e * o_f_1 + r_2
        set_scalar(
            response,
            1,
            e * inst.opening(self.factor_1_index)? + scalar_at(claim_secret, 1),
        );

        // z_3 = e(o_p - o_f_2 * f_1) + r_3
        let bound = inst.opening(self.product_index)? - inst.opening(self.factor_2_index)? * f_1;
        set_scalar(response, 2, e * bound + scalar_at(claim_secret, 2));
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
        let e = *challenge;
        let z_1 = scalar_at(response, 0);
        let z_2 = scalar_at(response, 1);
        let z_3 = scalar_at(response, 2);

        // Verify g ^ z_1 * h ^ z_2 = C_f_1 ^ e * R_1
        let left = proof.g() * z_1 + proof.h() * z_2;
        let right = inst.commitment(self.factor_1_index) * e + point_at(claim_public, 0);
        if left != right {
            return false;
        }

        // Verify C_f_2 ^ z_1 * h ^ z_3 = C_p ^ e * R_2
        let left = inst.commitment(self.factor_2_index) * z_1 + proof.h() * z_3;
        let right = inst.commitment(self.product_index) * e + point_at(claim_public, 1);
        left == right
    }
}
