//! Deterministic assignments that populate dependent variables.

use crate::error::Error;
use crate::instance::Instance;
use crate::proof::{Proof, Var};
use blsful::inner_types::Scalar;

/// A recorded assignment, replayed in order by [`Instance::update`].
///
/// A computation that touches a secret variable can only run on the prover;
/// the verifier skips it and learns the result through the commitment
/// instead.
#[derive(Clone, Debug)]
pub(crate) enum Computation {
    /// `var <- value`
    SetConst { var: Var, value: Scalar },
    /// `dst <- src`
    Mov { dst: Var, src: Var },
}

impl Computation {
    pub(crate) fn is_secret(&self) -> bool {
        match self {
            Computation::SetConst { var, .. } => var.is_secret(),
            Computation::Mov { dst, src } => dst.is_secret() || src.is_secret(),
        }
    }

    pub(crate) fn apply(&self, proof: &Proof, inst: &mut Instance) -> Result<(), Error> {
        match self {
            Computation::SetConst { var, value } => inst.set_var(proof, *var, *value),
            Computation::Mov { dst, src } => {
                let value = inst.var(*src)?;
                inst.set_var(proof, *dst, value)
            }
        }
    }
}
