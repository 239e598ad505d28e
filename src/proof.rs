//! Proof descriptions: variables, computations, and relation blocks.

use crate::blocks::{
    Block, EqualsBlock, EqualsPublicBlock, ProductBlock, SignatureBlock, WsumZeroBlock,
};
use crate::computation::Computation;
use crate::instance::Instance;
use crate::payload::{Layout, Payload};
use crate::sig::{SigPublicKey, SigScheme};
use crate::utils::challenge_scalar;
use blsful::inner_types::*;
use merlin::Transcript;
use serde::{Deserialize, Serialize};

const SECRET_FLAG: u32 = 0x8000_0000;
const INDEX_MASK: u32 = 0x7FFF_FFFF;

/// A handle to a proof variable.
///
/// One word packs the kind tag (high bit set for secret variables) and the
/// dense index within that kind. Handles are only meaningful for the
/// description that allocated them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Var(u32);

impl Var {
    /// Whether the variable is secret.
    pub fn is_secret(self) -> bool {
        self.0 & SECRET_FLAG != 0
    }

    /// Whether the variable is public.
    pub fn is_public(self) -> bool {
        !self.is_secret()
    }

    pub(crate) fn index(self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }
}

/// A handle to the block-owned region of the instance supplement where a
/// prover loads auxiliary data, such as the signature a signature block
/// blinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SupplementSlot(pub(crate) u32);

/// A zero-knowledge proof description.
///
/// The description aggregates the commitment bases, the declared variables,
/// the computations that fill dependent variables, and the relation blocks.
/// It must be complete before any [`Instance`] or claim is produced from it.
#[derive(Clone, Debug)]
pub struct Proof {
    g: G1Projective,
    h: G1Projective,
    num_secret: u32,
    num_public: u32,
    computations: Vec<Computation>,
    blocks: Vec<Block>,
    next_slot_id: u32,
}

impl Proof {
    /// Create an empty description over the given commitment bases.
    pub fn new(g: G1Projective, h: G1Projective) -> Self {
        Proof {
            g,
            h,
            num_secret: 0,
            num_public: 0,
            computations: Vec::new(),
            blocks: Vec::new(),
            next_slot_id: 0,
        }
    }

    pub(crate) fn g(&self) -> G1Projective {
        self.g
    }

    pub(crate) fn h(&self) -> G1Projective {
        self.h
    }

    /// Declare a fresh secret variable.
    pub fn var_secret(&mut self) -> Var {
        let var = Var(SECRET_FLAG | self.num_secret);
        self.num_secret += 1;
        var
    }

    /// Declare a fresh public variable.
    pub fn var_public(&mut self) -> Var {
        let var = Var(self.num_public);
        self.num_public += 1;
        var
    }

    /// Declare a public variable assigned a constant on both sides.
    pub fn var_const(&mut self, value: Scalar) -> Var {
        let var = self.var_public();
        self.computations.push(Computation::SetConst { var, value });
        var
    }

    /// [`Proof::var_const`] for signed integers.
    pub fn var_const_i64(&mut self, value: i64) -> Var {
        self.var_const(crate::utils::scalar_from_i64(value))
    }

    /// [`Proof::var_const`] for unsigned integers.
    pub fn var_const_u64(&mut self, value: u64) -> Var {
        self.var_const(Scalar::from(value))
    }

    /// The number of declared secret variables.
    pub fn num_secret(&self) -> usize {
        self.num_secret as usize
    }

    /// The number of declared public variables.
    pub fn num_public(&self) -> usize {
        self.num_public as usize
    }

    pub(crate) fn computations(&self) -> &[Computation] {
        &self.computations
    }

    pub(crate) fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    // The secret twin of `var`: `var` itself when already secret, otherwise a
    // fresh secret mirror bound by a mov computation and an equals-public
    // block.
    pub(crate) fn var_secret_for(&mut self, var: Var) -> Var {
        if var.is_secret() {
            return var;
        }
        let mirror = self.var_secret();
        self.computations.push(Computation::Mov {
            dst: mirror,
            src: var,
        });
        self.insert(Block::EqualsPublic(EqualsPublicBlock::new(
            mirror.index(),
            var.index(),
        )));
        mirror
    }

    // New blocks go to the head of the list; the payload tapes are laid out
    // in this same order on both sides.
    pub(crate) fn insert(&mut self, block: Block) {
        self.blocks.insert(0, block);
    }

    /// Require `product = factor_1 * factor_2`.
    pub fn require_mul(&mut self, product: Var, factor_1: Var, factor_2: Var) {
        let product = self.var_secret_for(product).index();
        let factor_1 = self.var_secret_for(factor_1).index();
        let factor_2 = self.var_secret_for(factor_2).index();
        self.insert(Block::Product(ProductBlock::new(
            product, factor_1, factor_2,
        )));
    }

    /// Require that all the given variables hold the same value.
    pub fn require_equal(&mut self, vars: &[Var]) {
        assert!(vars.len() >= 2, "require_equal needs at least two variables");
        let indices = vars
            .iter()
            .map(|&var| self.var_secret_for(var).index())
            .collect();
        self.insert(Block::Equals(EqualsBlock::new(indices)));
    }

    /// Require `sum = addend_1 + addend_2`.
    pub fn require_sum(&mut self, sum: Var, addend_1: Var, addend_2: Var) {
        self.require_wsum_zero(&[(-1, sum), (1, addend_1), (1, addend_2)]);
    }

    /// Require `dif = minuend - subtrahend`.
    pub fn require_dif(&mut self, dif: Var, minuend: Var, subtrahend: Var) {
        self.require_wsum_zero(&[(-1, dif), (1, minuend), (-1, subtrahend)]);
    }

    /// Require the weighted sum of the given `(coefficient, variable)` terms
    /// to be zero.
    pub fn require_wsum_zero(&mut self, terms: &[(i64, Var)]) {
        let terms = terms
            .iter()
            .map(|&(coeff, var)| (coeff, self.var_secret_for(var).index()))
            .collect();
        self.insert(Block::WsumZero(WsumZeroBlock::new(terms)));
    }

    /// Require possession of a CL signature on the given variables.
    ///
    /// Returns the supplement slot the prover must load the held signature
    /// into before generating a claim.
    pub fn require_sig(
        &mut self,
        scheme: &SigScheme,
        public_key: &SigPublicKey,
        vars: &[Var],
    ) -> SupplementSlot {
        assert_eq!(
            vars.len(),
            scheme.message_len(),
            "require_sig needs one variable per signed message"
        );
        assert_eq!(
            public_key.tail_len() + 1,
            scheme.message_len(),
            "public key does not fit the signature scheme"
        );
        let indices = vars
            .iter()
            .map(|&var| self.var_secret_for(var).index())
            .collect();
        let slot = SupplementSlot(self.next_slot_id);
        self.next_slot_id += 1;
        self.insert(Block::Signature(Box::new(SignatureBlock::new(
            scheme.clone(),
            public_key.clone(),
            indices,
            slot.0,
        ))));
        slot
    }

    // Supplement spans are resolved against the final block order, so slots
    // stay valid no matter how many blocks are inserted after them.
    pub(crate) fn supplement_span(&self, slot: SupplementSlot) -> Option<std::ops::Range<usize>> {
        let mut offset = 0;
        for block in &self.blocks {
            let len = block.supplement_layout().len();
            if let Block::Signature(sig) = block {
                if sig.slot_id() == slot.0 {
                    return Some(offset..offset + len);
                }
            }
            offset += len;
        }
        None
    }

    /// The layout of the instance supplement tape.
    pub fn supplement_layout(&self) -> Layout {
        Layout::concat(self.blocks.iter().map(|b| b.supplement_layout()))
    }

    /// The layout of the prover-local claim tape.
    pub fn claim_secret_layout(&self) -> Layout {
        Layout::concat(self.blocks.iter().map(|b| b.claim_secret_layout()))
    }

    /// The layout of the public claim tape.
    pub fn claim_public_layout(&self) -> Layout {
        Layout::concat(self.blocks.iter().map(|b| b.claim_public_layout()))
    }

    /// The layout of the response tape.
    pub fn response_layout(&self) -> Layout {
        Layout::concat(self.blocks.iter().map(|b| b.response_layout()))
    }

    /// Derive a Fiat-Shamir challenge from everything the verifier sees:
    /// the commitment bases, the instance, and the public claim.
    ///
    /// Both sides must call this with identically constructed descriptions
    /// and instances to obtain the same scalar.
    pub fn derive_challenge(&self, inst: &Instance, claim_public: &Payload) -> Scalar {
        let mut transcript = Transcript::new(b"agora sigma proof");
        transcript.append_message(b"Commitment Base G", self.g.to_compressed().as_ref());
        transcript.append_message(b"Commitment Base H", self.h.to_compressed().as_ref());
        for value in inst.public_values() {
            transcript.append_message(b"Public Value", &value.to_be_bytes());
        }
        for commitment in inst.commitments() {
            transcript.append_message(b"Commitment", &commitment.to_compressed());
        }
        transcript.append_message(b"Claim", &claim_public.to_bytes());
        challenge_scalar(b"challenge", &mut transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ProofParams;

    #[test]
    fn variable_tagging() {
        let ProofParams { g, h } = ProofParams::default();
        let mut proof = Proof::new(g, h);
        let s0 = proof.var_secret();
        let s1 = proof.var_secret();
        let p0 = proof.var_public();
        assert!(s0.is_secret() && s1.is_secret());
        assert!(p0.is_public());
        assert_eq!(s0.index(), 0);
        assert_eq!(s1.index(), 1);
        assert_eq!(p0.index(), 0);
    }

    #[test]
    fn secret_mirror_binds_public_operand() {
        let ProofParams { g, h } = ProofParams::default();
        let mut proof = Proof::new(g, h);
        let a = proof.var_secret();
        let b = proof.var_secret();
        let m = proof.var_public();
        proof.require_mul(m, a, b);
        // The public product gains a secret mirror: one extra secret, one mov
        // computation, and an equals-public block next to the product block.
        assert_eq!(proof.num_secret(), 3);
        assert_eq!(proof.computations().len(), 1);
        assert_eq!(proof.blocks().len(), 2);
    }

    #[test]
    fn secret_operands_stay_untouched() {
        let ProofParams { g, h } = ProofParams::default();
        let mut proof = Proof::new(g, h);
        let a = proof.var_secret();
        let b = proof.var_secret();
        let c = proof.var_secret();
        proof.require_mul(c, a, b);
        assert_eq!(proof.num_secret(), 3);
        assert!(proof.computations().is_empty());
        assert_eq!(proof.blocks().len(), 1);
    }

    #[test]
    fn constants_record_a_computation() {
        let ProofParams { g, h } = ProofParams::default();
        let mut proof = Proof::new(g, h);
        let c = proof.var_const_i64(-7);
        assert!(c.is_public());
        assert_eq!(proof.computations().len(), 1);
    }
}
