//! Relation blocks and the engine that drives them through the
//! claim / response / verify protocol.
//!
//! Each block contributes a fixed window to the four payload tapes; the
//! engine walks the block list in its stable order, handing every block its
//! own slices. A verifier must assemble the identical block sequence, or the
//! tapes will not line up and verification fails.

mod equality;
mod product;
mod signature;
mod wsum;

pub(crate) use equality::{EqualsBlock, EqualsPublicBlock};
pub(crate) use product::ProductBlock;
pub(crate) use signature::SignatureBlock;
pub(crate) use wsum::WsumZeroBlock;

use crate::error::Error;
use crate::instance::Instance;
use crate::payload::{Layout, Payload, Slot};
use crate::proof::Proof;
use crate::utils::SecretScalar;
use blsful::inner_types::Scalar;
use zeroize::Zeroize;

/// One relation fragment contributing a sigma-protocol to the proof.
#[derive(Clone, Debug)]
pub(crate) enum Block {
    EqualsPublic(EqualsPublicBlock),
    Equals(EqualsBlock),
    WsumZero(WsumZeroBlock),
    Product(ProductBlock),
    Signature(Box<SignatureBlock>),
}

impl Block {
    pub(crate) fn supplement_layout(&self) -> Layout {
        match self {
            Block::Signature(block) => block.supplement_layout(),
            _ => Layout::empty(),
        }
    }

    pub(crate) fn claim_secret_layout(&self) -> Layout {
        match self {
            Block::EqualsPublic(block) => block.claim_secret_layout(),
            Block::Equals(block) => block.claim_secret_layout(),
            Block::WsumZero(block) => block.claim_secret_layout(),
            Block::Product(block) => block.claim_secret_layout(),
            Block::Signature(block) => block.claim_secret_layout(),
        }
    }

    pub(crate) fn claim_public_layout(&self) -> Layout {
        match self {
            Block::EqualsPublic(block) => block.claim_public_layout(),
            Block::Equals(block) => block.claim_public_layout(),
            Block::WsumZero(block) => block.claim_public_layout(),
            Block::Product(block) => block.claim_public_layout(),
            Block::Signature(block) => block.claim_public_layout(),
        }
    }

    pub(crate) fn response_layout(&self) -> Layout {
        match self {
            Block::EqualsPublic(block) => block.response_layout(),
            Block::Equals(block) => block.response_layout(),
            Block::WsumZero(block) => block.response_layout(),
            Block::Product(block) => block.response_layout(),
            Block::Signature(block) => block.response_layout(),
        }
    }

    fn claim_gen(
        &self,
        proof: &Proof,
        inst: &Instance,
        supplement: &[Slot],
        claim_secret: &mut [Slot],
        claim_public: &mut [Slot],
    ) -> Result<(), Error> {
        match self {
            Block::EqualsPublic(block) => block.claim_gen(proof, claim_secret, claim_public),
            Block::Equals(block) => block.claim_gen(proof, claim_secret, claim_public),
            Block::WsumZero(block) => block.claim_gen(proof, claim_secret, claim_public),
            Block::Product(block) => block.claim_gen(proof, inst, claim_secret, claim_public),
            Block::Signature(block) => {
                block.claim_gen(proof, inst, supplement, claim_secret, claim_public)
            }
        }
    }

    fn response_gen(
        &self,
        inst: &Instance,
        claim_secret: &[Slot],
        challenge: &Scalar,
        response: &mut [Slot],
    ) -> Result<(), Error> {
        match self {
            Block::EqualsPublic(block) => {
                block.response_gen(inst, claim_secret, challenge, response)
            }
            Block::Equals(block) => block.response_gen(inst, claim_secret, challenge, response),
            Block::WsumZero(block) => block.response_gen(inst, claim_secret, challenge, response),
            Block::Product(block) => block.response_gen(inst, claim_secret, challenge, response),
            Block::Signature(block) => block.response_gen(inst, claim_secret, challenge, response),
        }
    }

    fn response_verify(
        &self,
        proof: &Proof,
        inst: &Instance,
        claim_public: &[Slot],
        challenge: &Scalar,
        response: &[Slot],
    ) -> bool {
        match self {
            Block::EqualsPublic(block) => {
                block.response_verify(proof, inst, claim_public, challenge, response)
            }
            Block::Equals(block) => {
                block.response_verify(proof, inst, claim_public, challenge, response)
            }
            Block::WsumZero(block) => {
                block.response_verify(proof, inst, claim_public, challenge, response)
            }
            Block::Product(block) => {
                block.response_verify(proof, inst, claim_public, challenge, response)
            }
            Block::Signature(block) => {
                block.response_verify(proof, inst, claim_public, challenge, response)
            }
        }
    }
}

/// The prover-local half of a claim: the randomness every block drew during
/// [`Proof::claim_gen`]. Never transmitted, and wiped on drop.
#[derive(Clone, Debug)]
pub struct ClaimSecret {
    pub(crate) payload: Payload,
}

impl Drop for ClaimSecret {
    fn drop(&mut self) {
        for slot in self.payload.slots_mut() {
            if let Slot::Scalar(value) = slot {
                let mut wiped = SecretScalar(*value);
                wiped.zeroize();
                *value = wiped.0;
            }
        }
    }
}

impl Proof {
    /// Walk every block, producing the secret and public halves of a claim
    /// for a prover instance.
    pub fn claim_gen(&self, inst: &Instance) -> Result<(ClaimSecret, Payload), Error> {
        if !inst.is_prover() {
            return Err(Error::ProverOnly);
        }
        let supplement_len = self.supplement_layout().len();
        if inst.supplement_slots().len() != supplement_len {
            return Err(Error::DescriptionMismatch);
        }
        let mut claim_secret = Payload::new(&self.claim_secret_layout());
        let mut claim_public = Payload::new(&self.claim_public_layout());
        let mut supp = 0;
        let mut cs = 0;
        let mut cp = 0;
        for block in self.blocks() {
            let supp_len = block.supplement_layout().len();
            let cs_len = block.claim_secret_layout().len();
            let cp_len = block.claim_public_layout().len();
            block.claim_gen(
                self,
                inst,
                &inst.supplement_slots()[supp..supp + supp_len],
                &mut claim_secret.slots_mut()[cs..cs + cs_len],
                &mut claim_public.slots_mut()[cp..cp + cp_len],
            )?;
            supp += supp_len;
            cs += cs_len;
            cp += cp_len;
        }
        Ok((
            ClaimSecret {
                payload: claim_secret,
            },
            claim_public,
        ))
    }

    /// Walk every block, producing the response tape for a challenge.
    pub fn response_gen(
        &self,
        inst: &Instance,
        claim_secret: &ClaimSecret,
        challenge: &Scalar,
    ) -> Result<Payload, Error> {
        if !inst.is_prover() {
            return Err(Error::ProverOnly);
        }
        if !claim_secret.payload.matches(&self.claim_secret_layout()) {
            return Err(Error::DescriptionMismatch);
        }
        let mut response = Payload::new(&self.response_layout());
        let mut cs = 0;
        let mut rs = 0;
        for block in self.blocks() {
            let cs_len = block.claim_secret_layout().len();
            let rs_len = block.response_layout().len();
            block.response_gen(
                inst,
                &claim_secret.payload.slots()[cs..cs + cs_len],
                challenge,
                &mut response.slots_mut()[rs..rs + rs_len],
            )?;
            cs += cs_len;
            rs += rs_len;
        }
        Ok(response)
    }

    /// Walk every block, verifying the response against the public claim and
    /// the challenge. Returns `false` on the first failing block and on any
    /// tape that does not fit this description.
    pub fn response_verify(
        &self,
        inst: &Instance,
        claim_public: &Payload,
        challenge: &Scalar,
        response: &Payload,
    ) -> bool {
        if !claim_public.matches(&self.claim_public_layout())
            || !response.matches(&self.response_layout())
        {
            return false;
        }
        let mut cp = 0;
        let mut rs = 0;
        for block in self.blocks() {
            let cp_len = block.claim_public_layout().len();
            let rs_len = block.response_layout().len();
            if !block.response_verify(
                self,
                inst,
                &claim_public.slots()[cp..cp + cp_len],
                challenge,
                &response.slots()[rs..rs + rs_len],
            ) {
                return false;
            }
            cp += cp_len;
            rs += rs_len;
        }
        true
    }
}
