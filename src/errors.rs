//! Errors returned by the fallible decoding entry points.
//!
//! There are exactly two user-visible failure kinds: a compressed point that
//! does not decode ([`InvalidEncoding`]), and scalar bytes that are not the
//! canonical representative of an integer mod \\( \ell \\)
//! ([`InvalidRepresentation`]).  Everything else in the crate is either
//! infallible or a programmer error that panics.

use core::fmt;

/// A 32-byte string was not the canonical encoding of a curve point.
///
/// Returned by `CompressedEdwardsY::decompress` when the y-coordinate has no
/// corresponding x on the curve, and by `CompressedRistretto::decompress`
/// when any of the Ristretto validity checks fail (non-canonical bytes,
/// negative s, negative t, or y = 0).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InvalidEncoding;

impl fmt::Display for InvalidEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not the canonical encoding of a group element")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidEncoding {}

/// A 32-byte string was not the canonical representative of a scalar.
///
/// Returned by `Scalar::from_canonical_bytes` when the high bit is set or
/// the value is \\( \geq \ell \\).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InvalidRepresentation;

impl fmt::Display for InvalidRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not the canonical representative of a scalar mod l")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidRepresentation {}
