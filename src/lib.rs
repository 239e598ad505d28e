/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Composable zero-knowledge proofs of arithmetic relations over values
//! hidden inside Pedersen commitments, with support for proving possession
//! of a Camenisch-Lysyanskaya signature on a committed tuple.
//!
//! A caller declares variables and relations on a [`Proof`] description,
//! fills a prover [`Instance`] with values, and then drives the three-move
//! protocol: [`Proof::claim_gen`] produces a public claim, a challenge scalar
//! is agreed on (or derived via [`Proof::derive_challenge`]), and
//! [`Proof::response_gen`] / [`Proof::response_verify`] close the exchange.
#![deny(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_parens,
    unused_lifetimes,
    unconditional_recursion,
    unused_extern_crates,
    trivial_casts,
    trivial_numeric_casts
)]
mod blocks;
mod computation;
mod error;
mod instance;
mod payload;
mod proof;
mod utils;

#[cfg(test)]
mod tests;

pub mod sig;

pub use blocks::ClaimSecret;
pub use error::*;
pub use instance::Instance;
pub use payload::{Layout, Payload, Slot, SlotKind};
pub use proof::*;
pub use utils::{challenge_scalar, generate_fr, ProofParams};
