// -*- mode: rust; -*-
//
// This file is part of ristretto255.
// Portions derived from curve25519-dalek:
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2019 Henry de Valence
// See LICENSE for licensing information.

//! Various constants, such as the Ristretto and Ed25519 basepoints.
//!
//! Most of the constants are given with
//! `LONG_DESCRIPTIVE_UPPER_CASE_NAMES`, but they can be brought into
//! scope using a `let` binding:
//!
//! ```
//! use ristretto255::constants;
//! use ristretto255::traits::IsIdentity;
//!
//! let B = &*constants::RISTRETTO_BASEPOINT_TABLE;
//! let l = &constants::BASEPOINT_ORDER;
//!
//! let A = l * B;
//! assert!(A.is_identity());
//! ```
//!
//! The two basepoint tables and the table of odd multiples of the
//! basepoint are built lazily on first use, from the hardcoded basepoint.

#![allow(non_snake_case)]

use lazy_static::lazy_static;

use crate::backend::serial::curve_models::AffineNielsPoint;
use crate::edwards::CompressedEdwardsY;
use crate::edwards::EdwardsBasepointTable;
use crate::ristretto::CompressedRistretto;
use crate::ristretto::RistrettoBasepointTable;
use crate::ristretto::RistrettoPoint;
use crate::scalar::Scalar;
use crate::traits::BasepointTable;
use crate::window::NafLookupTable8;

pub use crate::backend::serial::u32::constants::{ED25519_BASEPOINT_POINT, EIGHT_TORSION};

/// The Ed25519 basepoint, in `CompressedEdwardsY` format.
///
/// This is the little-endian byte encoding of \\( 4/5 \pmod p \\),
/// which is the \\(y\\)-coordinate of the Ed25519 basepoint.
///
/// The sign bit is 0 since the basepoint has \\(x\\) chosen to be positive.
pub const ED25519_BASEPOINT_COMPRESSED: CompressedEdwardsY = CompressedEdwardsY([
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
]);

/// The Ristretto basepoint, in `CompressedRistretto` format.
pub const RISTRETTO_BASEPOINT_COMPRESSED: CompressedRistretto = CompressedRistretto([
    0xe2, 0xf2, 0xae, 0x0a, 0x6a, 0xbc, 0x4e, 0x71,
    0xa8, 0x84, 0xa9, 0x61, 0xc5, 0x00, 0x51, 0x5f,
    0x58, 0xe3, 0x0b, 0x6a, 0xa5, 0x82, 0xdd, 0x8d,
    0xb6, 0xa6, 0x59, 0x45, 0xe0, 0x8d, 0x2d, 0x76,
]);

/// The Ristretto basepoint, as a `RistrettoPoint`.
///
/// This is called `_POINT` to distinguish it from `_TABLE`, which
/// provides fast scalar multiplication.
pub const RISTRETTO_BASEPOINT_POINT: RistrettoPoint = RistrettoPoint(ED25519_BASEPOINT_POINT);

/// `BASEPOINT_ORDER` is the order of the Ristretto group and of the Ed25519 basepoint, i.e.,
/// $$
/// \ell = 2^\{252\} + 27742317777372353535851937790883648493.
/// $$
pub const BASEPOINT_ORDER: Scalar = Scalar {
    bytes: [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58,
        0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
    ],
};

lazy_static! {
    /// The Ed25519 basepoint, as an `EdwardsBasepointTable` for scalar
    /// multiplication, built once from `ED25519_BASEPOINT_POINT`.
    pub static ref ED25519_BASEPOINT_TABLE: EdwardsBasepointTable =
        EdwardsBasepointTable::create(&ED25519_BASEPOINT_POINT);

    /// The Ristretto basepoint, as a `RistrettoBasepointTable` for scalar
    /// multiplication.
    pub static ref RISTRETTO_BASEPOINT_TABLE: RistrettoBasepointTable =
        RistrettoBasepointTable(ED25519_BASEPOINT_TABLE.clone());

    /// Odd multiples `[B, 3B, 5B, ..., 127B]` of the Ed25519 basepoint, in
    /// affine Niels coordinates, used by the width-8 NAF half of the
    /// double-base scalar multiplication.
    pub(crate) static ref AFFINE_ODD_MULTIPLES_OF_BASEPOINT: NafLookupTable8<AffineNielsPoint> =
        NafLookupTable8::from(&ED25519_BASEPOINT_POINT);
}
