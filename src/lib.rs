//! Group operations for the Ristretto group and the twisted Edwards form of
//! Curve25519.
//!
//! The crate is organized around two public element types, [`scalar::Scalar`]
//! (integers mod the group order \\( \ell \\)) and
//! [`ristretto::RistrettoPoint`] (the prime-order group), with the underlying
//! [`edwards::EdwardsPoint`] arithmetic also exposed for protocols that need
//! the curve itself.  Machine-level limb arithmetic lives in the `backend`
//! module and should not be used directly.

#![allow(non_snake_case)]

// Internal macros. Must come first!
#[macro_use]
pub(crate) mod macros;

pub mod backend;
pub mod constants;
pub mod edwards;
pub mod errors;
pub mod field;
pub mod ristretto;
pub mod scalar;
pub mod traits;
pub mod window;
