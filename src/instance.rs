//! Per-run values, openings, and commitments for a proof description.

use crate::error::Error;
use crate::payload::{self, Payload, Slot};
use crate::proof::{Proof, SupplementSlot, Var};
use crate::sig::Signature;
use crate::utils::{random_scalar, SecretScalar};
use blsful::inner_types::*;
use std::io::{Read, Write};
use zeroize::Zeroize;

// The prover-only half of an instance. Wiped on drop.
#[derive(Clone, Debug)]
pub(crate) struct SecretState {
    pub(crate) values: Vec<SecretScalar>,
    pub(crate) openings: Vec<SecretScalar>,
}

impl Drop for SecretState {
    fn drop(&mut self) {
        self.values.zeroize();
        self.openings.zeroize();
    }
}

/// A specific instance of a proof, containing the values of all known
/// variables.
///
/// The prover variant holds secret values and their openings; the verifier
/// variant holds only the commitments it received and the public values.
/// For every secret index `i` the invariant
/// `secret_commitments[i] = g^{values[i]} * h^{openings[i]}` holds; the
/// secret setter redraws the opening and rewrites the commitment in one
/// step, so the commitment is never observable between the two writes.
#[derive(Clone, Debug)]
pub struct Instance {
    pub(crate) secrets: Option<SecretState>,
    pub(crate) secret_commitments: Vec<G1Projective>,
    pub(crate) public_values: Vec<Scalar>,
    pub(crate) supplement: Payload,
}

impl Instance {
    /// Create a prover instance with every variable zeroed.
    pub fn prover(proof: &Proof) -> Self {
        Instance {
            secrets: Some(SecretState {
                values: vec![SecretScalar::default(); proof.num_secret()],
                openings: vec![SecretScalar::default(); proof.num_secret()],
            }),
            secret_commitments: vec![G1Projective::IDENTITY; proof.num_secret()],
            public_values: vec![Scalar::ZERO; proof.num_public()],
            supplement: Payload::new(&proof.supplement_layout()),
        }
    }

    /// Create a verifier instance; commitments and public values are filled
    /// in from the prover's message.
    pub fn verifier(proof: &Proof) -> Self {
        Instance {
            secrets: None,
            secret_commitments: vec![G1Projective::IDENTITY; proof.num_secret()],
            public_values: vec![Scalar::ZERO; proof.num_public()],
            supplement: Payload::new(&proof.supplement_layout()),
        }
    }

    /// Whether this instance holds secret values.
    pub fn is_prover(&self) -> bool {
        self.secrets.is_some()
    }

    /// Set the value of a variable.
    ///
    /// For a secret variable a fresh uniform opening is drawn and the
    /// commitment is rewritten atomically; setting a secret on a verifier
    /// instance is refused.
    pub fn set_var(&mut self, proof: &Proof, var: Var, value: Scalar) -> Result<(), Error> {
        if var.is_secret() {
            let index = var.index();
            let state = self.secrets.as_mut().ok_or(Error::ProverOnly)?;
            let opening = random_scalar();
            state.values[index] = SecretScalar(value);
            state.openings[index] = SecretScalar(opening);
            // C_x = g ^ x * h ^ o_x
            self.secret_commitments[index] = proof.g() * value + proof.h() * opening;
        } else {
            self.public_values[var.index()] = value;
        }
        Ok(())
    }

    /// [`Instance::set_var`] for signed integers.
    pub fn set_var_i64(&mut self, proof: &Proof, var: Var, value: i64) -> Result<(), Error> {
        self.set_var(proof, var, crate::utils::scalar_from_i64(value))
    }

    /// [`Instance::set_var`] for unsigned integers.
    pub fn set_var_u64(&mut self, proof: &Proof, var: Var, value: u64) -> Result<(), Error> {
        self.set_var(proof, var, Scalar::from(value))
    }

    /// Retrieve the value of a variable; secret values exist only on the
    /// prover.
    pub fn var(&self, var: Var) -> Result<Scalar, Error> {
        if var.is_secret() {
            let state = self.secrets.as_ref().ok_or(Error::ProverOnly)?;
            Ok(state.values[var.index()].0)
        } else {
            Ok(self.public_values[var.index()])
        }
    }

    pub(crate) fn secret_value(&self, index: usize) -> Result<Scalar, Error> {
        let state = self.secrets.as_ref().ok_or(Error::ProverOnly)?;
        Ok(state.values[index].0)
    }

    pub(crate) fn opening(&self, index: usize) -> Result<Scalar, Error> {
        let state = self.secrets.as_ref().ok_or(Error::ProverOnly)?;
        Ok(state.openings[index].0)
    }

    pub(crate) fn commitment(&self, index: usize) -> G1Projective {
        self.secret_commitments[index]
    }

    pub(crate) fn public_value(&self, index: usize) -> Scalar {
        self.public_values[index]
    }

    pub(crate) fn commitments(&self) -> &[G1Projective] {
        &self.secret_commitments
    }

    pub(crate) fn public_values(&self) -> &[Scalar] {
        &self.public_values
    }

    pub(crate) fn supplement_slots(&self) -> &[Slot] {
        self.supplement.slots()
    }

    /// Replay the recorded computations in insertion order. The verifier
    /// skips computations that touch secret variables.
    pub fn update(&mut self, proof: &Proof) -> Result<(), Error> {
        for computation in proof.computations() {
            if computation.is_secret() && self.secrets.is_none() {
                continue;
            }
            computation.apply(proof, self)?;
        }
        Ok(())
    }

    /// Write the value of a variable to a stream.
    pub fn write_var<W: Write>(&self, var: Var, stream: &mut W) -> Result<(), Error> {
        let value = self.var(var)?;
        payload::write_framed(stream, &value.to_be_bytes())
    }

    /// Read the value of a variable from a stream.
    ///
    /// Reading a secret variable is a prover-side operation; it refreshes the
    /// opening and commitment like any other set.
    pub fn read_var<R: Read>(
        &mut self,
        proof: &Proof,
        var: Var,
        stream: &mut R,
    ) -> Result<(), Error> {
        let bytes = payload::read_framed(stream, 32)?;
        let value = payload::sc(&bytes)?;
        self.set_var(proof, var, value)
    }

    /// Write all secret commitments to a stream in index order.
    pub fn write_commitments<W: Write>(&self, stream: &mut W) -> Result<(), Error> {
        for commitment in &self.secret_commitments {
            payload::write_framed(stream, &commitment.to_compressed())?;
        }
        Ok(())
    }

    /// Read all secret commitments from a stream in index order.
    pub fn read_commitments<R: Read>(&mut self, stream: &mut R) -> Result<(), Error> {
        for commitment in self.secret_commitments.iter_mut() {
            let bytes = payload::read_framed(stream, 48)?;
            *commitment = payload::g1(&bytes)?;
        }
        Ok(())
    }

    /// The block-owned supplement region for `slot`.
    pub fn supplement(&self, proof: &Proof, slot: SupplementSlot) -> Result<&[Slot], Error> {
        let span = proof
            .supplement_span(slot)
            .ok_or(Error::UnknownSupplement)?;
        self.supplement
            .slots()
            .get(span)
            .ok_or(Error::DescriptionMismatch)
    }

    /// Copy a held signature into the supplement region for a signature
    /// block, making it available to [`Proof::claim_gen`].
    pub fn load_signature(
        &mut self,
        proof: &Proof,
        slot: SupplementSlot,
        sig: &Signature,
    ) -> Result<(), Error> {
        let span = proof
            .supplement_span(slot)
            .ok_or(Error::UnknownSupplement)?;
        if sig.slot_count() != span.len() || span.end > self.supplement.len() {
            return Err(Error::DescriptionMismatch);
        }
        sig.store(&mut self.supplement.slots_mut()[span]);
        Ok(())
    }
}
