//! Equality blocks: a secret tied to a public value, and a chain of secrets
//! tied to one another.

use crate::error::Error;
use crate::instance::Instance;
use crate::payload::{point_at, scalar_at, set_point, set_scalar, Layout, Slot, SlotKind};
use crate::proof::Proof;
use crate::utils::random_scalar;
use blsful::inner_types::Scalar;

/// Ties a secret variable to a public variable.
///
/// Inserted automatically whenever a relation needs a secret operand but the
/// caller supplied a public variable.
// e   = challenge
// s   = secret value, o_s its opening, C_s its commitment
// p   = public value
//
// [r]                        = h ^ r = R
// [e * o_s + r] * g ^ (e * p) = (C_s) ^ e * R
#[derive(Clone, Debug)]
pub(crate) struct EqualsPublicBlock {
    secret_index: usize,
    public_index: usize,
}

impl EqualsPublicBlock {
    pub(crate) fn new(secret_index: usize, public_index: usize) -> Self {
        EqualsPublicBlock {
            secret_index,
            public_index,
        }
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
        let r = scalar_at(claim_secret, 0);
        // z = e * o_s + r
        let z = *challenge * inst.opening(self.secret_index)? + r;
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
        let e = *challenge;
        let big_r = point_at(claim_public, 0);
        let z = scalar_at(response, 0);
        // Verify g ^ (e * p) * h ^ z = (C_s) ^ e * R
        let left = proof.g() * (e * inst.public_value(self.public_index)) + proof.h() * z;
        let right = inst.commitment(self.secret_index) * e + big_r;
        left == right
    }
}

/// Proves that a list of secret variables all hold the same value, by
/// sharing one boxed value across every commitment.
// e = challenge
// s_#, o_s_#, C_s_# = value / opening / commitment at indices[#]
//
// [(r, r'_1, r'_2, ...)]        = (g ^ r * h ^ r'_1, g ^ r * h ^ r'_2, ...) = R_#
// [e * s_1 + r], [e * o_s_# + r'_#]
// g ^ z * h ^ z'_# = C_s_# ^ e * R_#
#[derive(Clone, Debug)]
pub(crate) struct EqualsBlock {
    indices: Vec<usize>,
}

impl EqualsBlock {
    pub(crate) fn new(indices: Vec<usize>) -> Self {
        EqualsBlock { indices }
    }

    fn count(&self) -> usize {
        self.indices.len()
    }

    pub(crate) fn claim_secret_layout(&self) -> Layout {
        Layout::array(SlotKind::Scalar, 1 + self.count())
    }

    pub(crate) fn claim_public_layout(&self) -> Layout {
        Layout::array(SlotKind::Point, self.count())
    }

    pub(crate) fn response_layout(&self) -> Layout {
        Layout::array(SlotKind::Scalar, 1 + self.count())
    }

    pub(crate) fn claim_gen(
        &self,
        proof: &Proof,
        claim_secret: &mut [Slot],
        claim_public: &mut [Slot],
    ) -> Result<(), Error> {
        let r = random_scalar();
        set_scalar(claim_secret, 0, r);
        for k in 0..self.count() {
            // R_# = g ^ r * h ^ r'_#
            let o_r = random_scalar();
            set_scalar(claim_secret, 1 + k, o_r);
            set_point(claim_public, k, proof.g() * r + proof.h() * o_r);
        }
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
        // z = e * s_1 + r, shared across the whole chain
        let z = e * inst.secret_value(self.indices[0])? + scalar_at(claim_secret, 0);
        set_scalar(response, 0, z);
        for (k, &index) in self.indices.iter().enumerate() {
            // z'_# = e * o_s_# + r'_#
            let z_opening = e * inst.opening(index)? + scalar_at(claim_secret, 1 + k);
            set_scalar(response, 1 + k, z_opening);
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
        let e = *challenge;
        let z = scalar_at(response, 0);
        for (k, &index) in self.indices.iter().enumerate() {
            // Verify g ^ z * h ^ z'_# = C_s_# ^ e * R_#
            let left = proof.g() * z + proof.h() * scalar_at(response, 1 + k);
            let right = inst.commitment(index) * e + point_at(claim_public, k);
            if left != right {
                return false;
            }
        }
        true
    }
}
