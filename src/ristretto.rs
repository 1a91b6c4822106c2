// -*- mode: rust; -*-
//
// This file is part of ristretto255.
// Portions derived from curve25519-dalek:
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2020 Henry de Valence
// See LICENSE for licensing information.

//! An implementation of [Ristretto][ristretto_main], which provides a
//! prime-order group.
//!
//! Ristretto is a modification of Mike Hamburg's Decaf scheme to work with
//! cofactor-\\(8\\) curves, such as Curve25519.  Instead of a group of prime
//! order with incomplete formulas, or a fast complete group of order
//! \\(8\ell\\), it constructs a prime-order group as a *quotient* of the
//! Edwards curve by its torsion, changing only
//!
//! 1. the function for equality checking (so that two representatives
//!    of the same coset are considered equal);
//! 2. the function for encoding (so that two representatives of the
//!    same coset are encoded as identical bitstrings);
//! 3. the function for decoding (so that only the canonical encoding of
//!    a coset is accepted).
//!
//! Internally, a [`RistrettoPoint`] is a wrapper type around
//! [`EdwardsPoint`], so the group operations are carried out with no
//! overhead using Edwards formulas.
//!
//! Notes on the details of the encoding can be found in the
//! [Details][ristretto_notes] section of the Ristretto website.
//!
//! [ristretto_notes]: https://ristretto.group/details/index.html
//! [ristretto_main]: https://ristretto.group/

#![allow(non_snake_case)]

use core::borrow::Borrow;
use core::fmt::Debug;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Neg, Sub, SubAssign};

use rand_core::{CryptoRng, RngCore};

use digest::generic_array::typenum::U64;
use digest::Digest;

use subtle::Choice;
use subtle::ConditionallyNegatable;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

use zeroize::Zeroize;

use crate::backend::serial::curve_models::CompletedPoint;
use crate::backend::serial::u32::constants;
use crate::edwards::EdwardsBasepointTable;
use crate::edwards::EdwardsPoint;
use crate::errors::InvalidEncoding;
use crate::field::FieldElement;
use crate::scalar::Scalar;
use crate::traits::BasepointTable;
use crate::traits::Identity;
use crate::traits::{MultiscalarMul, VartimeMultiscalarMul};

// ------------------------------------------------------------------------
// Compressed points
// ------------------------------------------------------------------------

/// A Ristretto point, in compressed wire format.
///
/// The Ristretto encoding is canonical, so two points are equal if and
/// only if their encodings are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct CompressedRistretto(pub [u8; 32]);

impl ConstantTimeEq for CompressedRistretto {
    fn ct_eq(&self, other: &CompressedRistretto) -> Choice {
        self.as_bytes().ct_eq(other.as_bytes())
    }
}

impl Debug for CompressedRistretto {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "CompressedRistretto: {:?}", self.as_bytes())
    }
}

impl CompressedRistretto {
    /// Copy the bytes of this `CompressedRistretto`.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// View this `CompressedRistretto` as an array of bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Construct a `CompressedRistretto` from a slice of bytes.
    ///
    /// # Panics
    ///
    /// If the input `bytes` slice does not have a length of 32.
    pub fn from_slice(bytes: &[u8]) -> CompressedRistretto {
        let mut tmp = [0u8; 32];

        tmp.copy_from_slice(bytes);

        CompressedRistretto(tmp)
    }

    /// Attempt to decompress to an `RistrettoPoint`.
    ///
    /// # Return
    ///
    /// - `Ok(RistrettoPoint)` if `self` was the canonical encoding of a
    ///   point;
    ///
    /// - `Err(InvalidEncoding)` if `self` was not the canonical encoding
    ///   of a point.
    pub fn decompress(&self) -> Result<RistrettoPoint, InvalidEncoding> {
        // Step 1. Check s for validity:
        // 1.a) s must be 32 bytes (we get this from the type system)
        // 1.b) s < p
        // 1.c) s is nonnegative
        //
        // Our decoding routine ignores the high bit, so the only
        // possible failure for 1.b) is if someone encodes s in 0..18
        // as s+p in 2^255-19..2^255-1.  We can check this by
        // converting back to bytes, and checking that we get the
        // original input, since our encoding routine is canonical.

        let s = FieldElement::from_bytes(self.as_bytes());
        let s_bytes_check = s.to_bytes();
        let s_encoding_is_canonical = s_bytes_check[..].ct_eq(self.as_bytes());
        let s_is_negative = s.is_negative();

        if s_encoding_is_canonical.unwrap_u8() == 0u8 || s_is_negative.unwrap_u8() == 1u8 {
            return Err(InvalidEncoding);
        }

        // Step 2.  Compute (X:Y:Z:T).
        let one = FieldElement::one();
        let ss = s.square();
        let u1 = &one - &ss; //  1 + as²
        let u2 = &one + &ss; //  1 - as²    where a=-1
        let u2_sqr = u2.square(); // (1 - as²)²

        // v == ad(1+as²)² - (1-as²)²            where d=-121665/121666
        let v = &(&(-&constants::EDWARDS_D) * &u1.square()) - &u2_sqr;

        let (ok, I) = (&v * &u2_sqr).invsqrt(); // 1/sqrt(v*u_2²)

        let Dx = &I * &u2; // 1/sqrt(v)
        let Dy = &I * &(&Dx * &v); // 1/u2

        // x == | 2s/sqrt(v) | == + sqrt(4s²/(ad(1+as²)² - (1-as²)²))
        let mut x = &(&s + &s) * &Dx;
        let x_neg = x.is_negative();
        x.conditional_negate(x_neg);

        // y == (1-as²)/(1+as²)
        let y = &u1 * &Dy;

        // t == ((1+as²) sqrt(4s²/(ad(1+as²)² - (1-as²)²)))/(1-as²)
        let t = &x * &y;

        if ok.unwrap_u8() == 0u8
            || t.is_negative().unwrap_u8() == 1u8
            || y.is_zero().unwrap_u8() == 1u8
        {
            Err(InvalidEncoding)
        } else {
            Ok(RistrettoPoint(EdwardsPoint {
                X: x,
                Y: y,
                Z: one,
                T: t,
            }))
        }
    }
}

impl Identity for CompressedRistretto {
    fn identity() -> CompressedRistretto {
        CompressedRistretto([0u8; 32])
    }
}

impl Default for CompressedRistretto {
    fn default() -> CompressedRistretto {
        CompressedRistretto::identity()
    }
}

impl Zeroize for CompressedRistretto {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

// ------------------------------------------------------------------------
// Serde support
// ------------------------------------------------------------------------
// Serializes to and from `RistrettoPoint` directly, doing compression
// and decompression internally.  This means that users can create
// structs containing `RistrettoPoint`s and use Serde's derived
// serializers to serialize those structures.

#[cfg(feature = "serde")]
use serde::de::Visitor;
#[cfg(feature = "serde")]
use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "serde")]
impl Serialize for RistrettoPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tup = serializer.serialize_tuple(32)?;
        for byte in self.compress().as_bytes().iter() {
            tup.serialize_element(byte)?;
        }
        tup.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RistrettoPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RistrettoPointVisitor;

        impl<'de> Visitor<'de> for RistrettoPointVisitor {
            type Value = RistrettoPoint;

            fn expecting(&self, formatter: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                formatter.write_str("a valid point in Ristretto format")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<RistrettoPoint, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = [0u8; 32];
                for i in 0..32 {
                    bytes[i] = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &"expected 32 bytes"))?;
                }
                CompressedRistretto(bytes)
                    .decompress()
                    .map_err(|_| serde::de::Error::custom(&"decompression failed"))
            }
        }

        deserializer.deserialize_tuple(32, RistrettoPointVisitor)
    }
}

// ------------------------------------------------------------------------
// Internal point representations
// ------------------------------------------------------------------------

/// A `RistrettoPoint` represents a point in the Ristretto group for
/// Curve25519.  Ristretto, a variant of Decaf, constructs a
/// prime-order group as a quotient group of a subgroup of (the
/// Edwards form of) Curve25519.
///
/// Internally, a `RistrettoPoint` is implemented as a wrapper type
/// around `EdwardsPoint`, with custom equality, compression, and
/// decompression routines to account for the quotient.  This means that
/// operations on `RistrettoPoint`s are exactly as fast as operations on
/// `EdwardsPoint`s.
///
#[derive(Copy, Clone)]
pub struct RistrettoPoint(pub(crate) EdwardsPoint);

impl RistrettoPoint {
    /// Compress this point using the Ristretto encoding.
    pub fn compress(&self) -> CompressedRistretto {
        let mut X = self.0.X;
        let mut Y = self.0.Y;
        let Z = &self.0.Z;
        let T = &self.0.T;

        let u1 = &(Z + &Y) * &(Z - &Y);
        let u2 = &X * &Y;
        // Ignore return value since this is always square
        let (_, invsqrt) = (&u1 * &u2.square()).invsqrt();
        let i1 = &invsqrt * &u1;
        let i2 = &invsqrt * &u2;
        let z_inv = &i1 * &(&i2 * T);
        let mut den_inv = i2;

        let iX = &X * &constants::SQRT_M1;
        let iY = &Y * &constants::SQRT_M1;
        let ristretto_magic = &constants::INVSQRT_A_MINUS_D;
        let enchanted_denominator = &i1 * ristretto_magic;

        let rotate = (T * &z_inv).is_negative();

        X.conditional_assign(&iY, rotate);
        Y.conditional_assign(&iX, rotate);
        den_inv.conditional_assign(&enchanted_denominator, rotate);

        Y.conditional_negate((&X * &z_inv).is_negative());

        let mut s = &den_inv * &(Z - &Y);
        let s_is_negative = s.is_negative();
        s.conditional_negate(s_is_negative);

        CompressedRistretto(s.to_bytes())
    }

    /// Double this point.
    pub fn double(&self) -> RistrettoPoint {
        RistrettoPoint(self.0.double())
    }

    /// Return a `RistrettoPoint` chosen uniformly at random using a
    /// user-provided RNG.
    ///
    /// # Inputs
    ///
    /// * `rng`: any RNG which implements the `RngCore + CryptoRng` interface.
    ///
    /// # Returns
    ///
    /// A random element of the Ristretto group.
    ///
    /// # Implementation
    ///
    /// Uses the Ristretto-flavoured Elligator 2 map, so that the discrete
    /// log of the output point with respect to any other point should be
    /// unknown.  The map is applied twice and the results are added, as in
    /// the hash-to-group case.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut uniform_bytes = [0u8; 64];
        rng.fill_bytes(&mut uniform_bytes);

        RistrettoPoint::from_uniform_bytes(&uniform_bytes)
    }

    /// Hash a slice of bytes into a `RistrettoPoint`.
    ///
    /// Takes a type parameter `D`, which is any `Digest` producing 64
    /// bytes of output.
    ///
    /// Convenience wrapper around `from_hash`.
    ///
    /// # Implementation
    ///
    /// Uses the Ristretto-flavoured Elligator 2 map, so that the discrete
    /// log of the output point with respect to any other point should be
    /// unknown.  The map is applied twice and the results are added, to
    /// ensure a uniform distribution.
    pub fn hash_from_bytes<D>(input: &[u8]) -> RistrettoPoint
    where
        D: Digest<OutputSize = U64> + Default,
    {
        let mut hash = D::default();
        hash.update(input);
        RistrettoPoint::from_hash(hash)
    }

    /// Construct a `RistrettoPoint` from an existing `Digest` instance.
    ///
    /// Use this instead of `hash_from_bytes` if it is more convenient
    /// to stream data into the `Digest` than to pass a single byte
    /// slice.
    pub fn from_hash<D>(hash: D) -> RistrettoPoint
    where
        D: Digest<OutputSize = U64>,
    {
        // dealing with generic arrays is clumsy, until const generics land
        let output = hash.finalize();
        let mut output_bytes = [0u8; 64];
        output_bytes.copy_from_slice(output.as_slice());

        RistrettoPoint::from_uniform_bytes(&output_bytes)
    }

    /// Construct a `RistrettoPoint` from 64 bytes of data.
    ///
    /// If the input bytes are uniformly distributed, the resulting point
    /// will be uniformly distributed over the group, and its discrete log
    /// with respect to other points should be unknown.
    ///
    /// # Implementation
    ///
    /// This function splits the input array into two 32-byte halves, takes
    /// the low 255 bits of each half mod p, applies the Ristretto-flavoured
    /// Elligator map to each, and adds the results.
    pub fn from_uniform_bytes(bytes: &[u8; 64]) -> RistrettoPoint {
        let mut r_1_bytes = [0u8; 32];
        r_1_bytes.copy_from_slice(&bytes[0..32]);
        let r_1 = FieldElement::from_bytes(&r_1_bytes);
        let R_1 = RistrettoPoint::elligator_ristretto_flavor(&r_1);

        let mut r_2_bytes = [0u8; 32];
        r_2_bytes.copy_from_slice(&bytes[32..64]);
        let r_2 = FieldElement::from_bytes(&r_2_bytes);
        let R_2 = RistrettoPoint::elligator_ristretto_flavor(&r_2);

        // Applying Elligator twice and adding the results ensures a
        // uniform distribution.
        RistrettoPoint(&R_1.0 + &R_2.0)
    }

    /// Computes the Ristretto Elligator map.
    ///
    /// # Note
    ///
    /// This method is not public because it's just used for hashing
    /// to a point -- proper elligator support is deferred for now.
    pub(crate) fn elligator_ristretto_flavor(r_0: &FieldElement) -> RistrettoPoint {
        let i = &constants::SQRT_M1;
        let d = &constants::EDWARDS_D;
        let one_minus_d_sq = &constants::ONE_MINUS_EDWARDS_D_SQUARED;
        let d_minus_one_sq = &constants::EDWARDS_D_MINUS_ONE_SQUARED;
        let mut c = constants::MINUS_ONE;

        let one = FieldElement::one();

        let r = i * &r_0.square();
        let N_s = &(&r + &one) * one_minus_d_sq;
        let D = &(&c - &(d * &r)) * &(&r + d);

        let (Ns_D_is_sq, mut s) = FieldElement::sqrt_ratio_i(&N_s, &D);
        let mut s_prime = &s * r_0;
        let s_prime_is_pos = !s_prime.is_negative();
        s_prime.conditional_negate(s_prime_is_pos);

        s.conditional_assign(&s_prime, !Ns_D_is_sq);
        c.conditional_assign(&r, !Ns_D_is_sq);

        let N_t = &(&(&c * &(&r - &one)) * d_minus_one_sq) - &D;
        let s_sq = s.square();

        // The conversion from W_i is exactly the conversion from P1xP1.
        RistrettoPoint(
            CompletedPoint {
                X: &(&s + &s) * &D,
                Z: &N_t * &constants::SQRT_AD_MINUS_ONE,
                Y: &one - &s_sq,
                T: &one + &s_sq,
            }
            .to_extended(),
        )
    }
}

impl Identity for RistrettoPoint {
    fn identity() -> RistrettoPoint {
        RistrettoPoint(EdwardsPoint::identity())
    }
}

impl Default for RistrettoPoint {
    fn default() -> RistrettoPoint {
        RistrettoPoint::identity()
    }
}

impl Zeroize for RistrettoPoint {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

// ------------------------------------------------------------------------
// Equality
// ------------------------------------------------------------------------

impl PartialEq for RistrettoPoint {
    fn eq(&self, other: &RistrettoPoint) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}

impl ConstantTimeEq for RistrettoPoint {
    /// Test equality between two `RistrettoPoint`s.
    ///
    /// # Returns
    ///
    /// * `Choice(1)` if the two `RistrettoPoint`s are equal;
    /// * `Choice(0)` otherwise.
    fn ct_eq(&self, other: &RistrettoPoint) -> Choice {
        // The cross-multiplication X1*Y2 == Y1*X2 identifies P and -P (and
        // their 4-isogeny rotations); the second clause catches the pairs
        // that the rotation by i maps onto each other, where X or Y is
        // exchanged rather than negated.  Together they test equality in
        // the quotient without computing the encoding.
        let X1Y2 = &self.0.X * &other.0.Y;
        let Y1X2 = &self.0.Y * &other.0.X;
        let X1X2 = &self.0.X * &other.0.X;
        let Y1Y2 = &self.0.Y * &other.0.Y;

        X1Y2.ct_eq(&Y1X2) | X1X2.ct_eq(&Y1Y2)
    }
}

impl Eq for RistrettoPoint {}

// ------------------------------------------------------------------------
// Arithmetic
// ------------------------------------------------------------------------

impl<'a, 'b> Add<&'b RistrettoPoint> for &'a RistrettoPoint {
    type Output = RistrettoPoint;

    fn add(self, other: &'b RistrettoPoint) -> RistrettoPoint {
        RistrettoPoint(&self.0 + &other.0)
    }
}

define_add_variants!(LHS = RistrettoPoint, RHS = RistrettoPoint, Output = RistrettoPoint);

impl<'b> AddAssign<&'b RistrettoPoint> for RistrettoPoint {
    fn add_assign(&mut self, _rhs: &'b RistrettoPoint) {
        *self = &*self + _rhs;
    }
}

define_add_assign_variants!(LHS = RistrettoPoint, RHS = RistrettoPoint);

impl<'a, 'b> Sub<&'b RistrettoPoint> for &'a RistrettoPoint {
    type Output = RistrettoPoint;

    fn sub(self, other: &'b RistrettoPoint) -> RistrettoPoint {
        RistrettoPoint(&self.0 - &other.0)
    }
}

define_sub_variants!(LHS = RistrettoPoint, RHS = RistrettoPoint, Output = RistrettoPoint);

impl<'b> SubAssign<&'b RistrettoPoint> for RistrettoPoint {
    fn sub_assign(&mut self, _rhs: &'b RistrettoPoint) {
        *self = &*self - _rhs;
    }
}

define_sub_assign_variants!(LHS = RistrettoPoint, RHS = RistrettoPoint);

impl<T> Sum<T> for RistrettoPoint
where
    T: Borrow<RistrettoPoint>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(RistrettoPoint::identity(), |acc, item| acc + item.borrow())
    }
}

impl<'a> Neg for &'a RistrettoPoint {
    type Output = RistrettoPoint;

    fn neg(self) -> RistrettoPoint {
        RistrettoPoint(-&self.0)
    }
}

impl Neg for RistrettoPoint {
    type Output = RistrettoPoint;

    fn neg(self) -> RistrettoPoint {
        -&self
    }
}

impl<'b> MulAssign<&'b Scalar> for RistrettoPoint {
    fn mul_assign(&mut self, scalar: &'b Scalar) {
        let result = &*self * scalar;
        *self = result;
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a RistrettoPoint {
    type Output = RistrettoPoint;
    /// Scalar multiplication: compute `scalar * self`, in constant time.
    fn mul(self, scalar: &'b Scalar) -> RistrettoPoint {
        RistrettoPoint(&self.0 * scalar)
    }
}

impl<'a, 'b> Mul<&'b RistrettoPoint> for &'a Scalar {
    type Output = RistrettoPoint;

    /// Scalar multiplication: compute `self * scalar`, in constant time.
    fn mul(self, point: &'b RistrettoPoint) -> RistrettoPoint {
        RistrettoPoint(self * &point.0)
    }
}

define_mul_assign_variants!(LHS = RistrettoPoint, RHS = Scalar);

define_mul_variants!(LHS = RistrettoPoint, RHS = Scalar, Output = RistrettoPoint);
define_mul_variants!(LHS = Scalar, RHS = RistrettoPoint, Output = RistrettoPoint);

// ------------------------------------------------------------------------
// Multiscalar Multiplication impls
// ------------------------------------------------------------------------

// These use iterator combinators to unwrap the underlying points and
// forward to the EdwardsPoint implementations.

impl MultiscalarMul for RistrettoPoint {
    type Point = RistrettoPoint;

    fn multiscalar_mul<I, J>(scalars: I, points: J) -> RistrettoPoint
    where
        I: IntoIterator,
        I::Item: Borrow<Scalar>,
        J: IntoIterator,
        J::Item: Borrow<RistrettoPoint>,
    {
        let extended_points = points.into_iter().map(|P| P.borrow().0);
        RistrettoPoint(EdwardsPoint::multiscalar_mul(scalars, extended_points))
    }
}

impl VartimeMultiscalarMul for RistrettoPoint {
    type Point = RistrettoPoint;

    fn vartime_multiscalar_mul<I, J>(scalars: I, points: J) -> RistrettoPoint
    where
        I: IntoIterator,
        I::Item: Borrow<Scalar>,
        J: IntoIterator,
        J::Item: Borrow<RistrettoPoint>,
    {
        let extended_points = points.into_iter().map(|P| P.borrow().0);
        RistrettoPoint(EdwardsPoint::vartime_multiscalar_mul(
            scalars,
            extended_points,
        ))
    }
}

// ------------------------------------------------------------------------
// Constant-time conditional selection
// ------------------------------------------------------------------------

impl ConditionallySelectable for RistrettoPoint {
    /// Conditionally select between `self` and `other`.
    fn conditional_select(
        a: &RistrettoPoint,
        b: &RistrettoPoint,
        choice: Choice,
    ) -> RistrettoPoint {
        RistrettoPoint(EdwardsPoint::conditional_select(&a.0, &b.0, choice))
    }
}

// ------------------------------------------------------------------------
// Precomputed tables
// ------------------------------------------------------------------------

/// A precomputed table of multiples of a basepoint, used to accelerate
/// scalar multiplication.
///
/// A precomputed table of multiples of the Ristretto basepoint is
/// available in the [`constants`](crate::constants) module.
#[derive(Clone)]
#[repr(transparent)]
pub struct RistrettoBasepointTable(pub(crate) EdwardsBasepointTable);

impl BasepointTable for RistrettoBasepointTable {
    type Point = RistrettoPoint;

    fn create(basepoint: &RistrettoPoint) -> RistrettoBasepointTable {
        RistrettoBasepointTable(EdwardsBasepointTable::create(&basepoint.0))
    }

    fn basepoint(&self) -> RistrettoPoint {
        RistrettoPoint(self.0.basepoint())
    }

    fn mul_base(&self, scalar: &Scalar) -> RistrettoPoint {
        RistrettoPoint(self.0.mul_base(scalar))
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a RistrettoBasepointTable {
    type Output = RistrettoPoint;

    fn mul(self, scalar: &'b Scalar) -> RistrettoPoint {
        self.mul_base(scalar)
    }
}

impl<'a, 'b> Mul<&'a RistrettoBasepointTable> for &'b Scalar {
    type Output = RistrettoPoint;

    fn mul(self, basepoint_table: &'a RistrettoBasepointTable) -> RistrettoPoint {
        basepoint_table.mul_base(self)
    }
}

// ------------------------------------------------------------------------
// Debug traits
// ------------------------------------------------------------------------

impl Debug for RistrettoPoint {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        let coset = [
            self.0,
            &self.0 + &constants::EIGHT_TORSION[2],
            &self.0 + &constants::EIGHT_TORSION[4],
            &self.0 + &constants::EIGHT_TORSION[6],
        ];
        write!(
            f,
            "RistrettoPoint: coset \n{:?}\n{:?}\n{:?}\n{:?}",
            coset[0], coset[1], coset[2], coset[3]
        )
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants as crate_constants;

    #[test]
    fn identity_encodes_to_zero() {
        assert_eq!(
            RistrettoPoint::identity().compress(),
            CompressedRistretto::identity()
        );
    }

    #[test]
    fn decompress_zero_is_identity() {
        let id = CompressedRistretto([0u8; 32]).decompress().unwrap();
        assert_eq!(id, RistrettoPoint::identity());
    }

    #[test]
    fn basepoint_compresses_to_known_encoding() {
        assert_eq!(
            crate_constants::RISTRETTO_BASEPOINT_POINT.compress(),
            crate_constants::RISTRETTO_BASEPOINT_COMPRESSED
        );
    }

    #[test]
    fn encodings_of_small_multiples_of_basepoint() {
        // Table of encodings of i*basepoint, from the Ristretto test vectors.
        let compressed = [
            CompressedRistretto::from_slice(
                &hex::decode("0000000000000000000000000000000000000000000000000000000000000000")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("e2f2ae0a6abc4e71a884a961c500515f58e30b6aa582dd8db6a65945e08d2d76")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("6a493210f7499cd17fecb510ae0cea23a110e8d5b901f8acadd3095c73a3b919")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("94741f5d5d52755ece4f23f044ee27d5d1ea1e2bd196b462166b16152a9d0259")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("da80862773358b466ffadfe0b3293ab3d9fd53c5ea6c955358f568322daf6a57")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("e882b131016b52c1d3337080187cf768423efccbb517bb495ab812c4160ff44e")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("f64746d3c92b13050ed8d80236a7f0007c3b3f962f5ba793d19a601ebb1df403")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("44f53520926ec81fbd5a387845beb7df85a96a24ece18738bdcfa6a7822a176d")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("903293d8f2287ebe10e2374dc1a53e0bc887e592699f02d077d5263cdd55601c")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("02622ace8f7303a31cafc63f8fc48fdc16e1c8c8d234b2f0d6685282a9076031")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("20706fd788b2720a1ed2a5dad4952b01f413bcf0e7564de8cdc816689e2db95f")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("bce83f8ba5dd2fa572864c24ba1810f9522bc6004afe95877ac73241cafdab42")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("e4549ee16b9aa03099ca208c67adafcafa4c3f3e4e5303de6026e3ca8ff84460")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("aa52e000df2e16f55fb1032fc33bc42742dad6bd5a8fc0be0167436c5948501f")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("46376b80f409b29dc2b5f6f0c52591990896e5716f41477cd30085ab7f10301e")
                    .unwrap(),
            ),
            CompressedRistretto::from_slice(
                &hex::decode("e0c418f7c8d9c4cdd7395b93ea124f3ad99021bb681dfc3302a9d99a2e53e64e")
                    .unwrap(),
            ),
        ];

        let mut bp = RistrettoPoint::identity();
        for point in compressed.iter() {
            assert_eq!(bp.compress(), *point);
            bp = &bp + &crate_constants::RISTRETTO_BASEPOINT_POINT;
        }
    }

    #[test]
    fn four_torsion_diff() {
        // Two points on the Edwards curve that differ by 4-torsion are the
        // same Ristretto point, both under ct_eq and under the encoding.
        let P = crate_constants::RISTRETTO_BASEPOINT_POINT;
        for i in (0..8).filter(|i| i % 2 == 0) {
            let Q = RistrettoPoint(&P.0 + &crate_constants::EIGHT_TORSION[i]);
            assert_eq!(P, Q);
            assert_eq!(P.compress(), Q.compress());
        }
    }

    #[test]
    fn compress_decompress_roundtrip() {
        let mut P = crate_constants::RISTRETTO_BASEPOINT_POINT;
        for _ in 0..16 {
            let compressed = P.compress();
            let Q = compressed.decompress().unwrap();
            assert_eq!(P, Q);
            assert_eq!(compressed, Q.compress());
            P = P.double();
        }
    }

    #[test]
    fn decode_double_recompress_matches_two_b() {
        // Decode the canonical encoding of B, double, recompress: must be
        // the canonical encoding of [2]B.
        let b_enc = crate_constants::RISTRETTO_BASEPOINT_COMPRESSED;
        let two_b_enc = CompressedRistretto::from_slice(
            &hex::decode("6a493210f7499cd17fecb510ae0cea23a110e8d5b901f8acadd3095c73a3b919")
                .unwrap(),
        );
        let B = b_enc.decompress().unwrap();
        assert_eq!(B.double().compress(), two_b_enc);
    }

    #[test]
    fn scalarmult_ristrettopoint_works_both_ways() {
        let P = crate_constants::RISTRETTO_BASEPOINT_POINT;
        let s = Scalar::from(999u64);

        let P1 = &P * &s;
        let P2 = &s * &P;

        assert!(P1.compress().as_bytes() == P2.compress().as_bytes());
    }

    #[test]
    fn basepoint_table_matches_constant_time_mul() {
        let s = Scalar::from(8128u64);
        let P1 = &crate_constants::RISTRETTO_BASEPOINT_POINT * &s;
        let P2 = &s * &*crate_constants::RISTRETTO_BASEPOINT_TABLE;

        assert_eq!(P1.compress(), P2.compress());
    }

    #[test]
    fn elligator_outputs_are_on_the_curve() {
        // The map must land on the curve and be deterministic for
        // arbitrary field inputs; the known-answer coverage comes from
        // `hash_to_group_kats` below.
        let bytes: [[u8; 32]; 16] = [
            [
                184, 249, 135, 49, 253, 123, 89, 113, 67, 160, 6, 239, 7, 105, 211, 41, 192, 249,
                185, 57, 9, 102, 70, 198, 15, 127, 7, 26, 160, 102, 134, 71,
            ],
            [
                229, 14, 241, 227, 75, 9, 118, 60, 128, 153, 226, 21, 183, 217, 91, 136, 98, 0,
                231, 156, 124, 77, 82, 139, 142, 134, 164, 169, 169, 62, 250, 52,
            ],
            [
                115, 109, 36, 220, 180, 223, 99, 6, 204, 169, 19, 29, 169, 68, 84, 23, 21, 109,
                189, 149, 127, 205, 91, 102, 172, 35, 112, 35, 134, 69, 186, 34,
            ],
            [
                16, 49, 96, 107, 171, 199, 164, 9, 129, 16, 64, 62, 241, 63, 132, 173, 209, 160,
                112, 215, 105, 50, 157, 81, 253, 105, 1, 154, 229, 25, 120, 83,
            ],
            [
                156, 131, 161, 162, 236, 251, 5, 187, 167, 171, 17, 72, 115, 88, 4, 212, 203, 181,
                22, 132, 226, 59, 4, 5, 73, 112, 212, 233, 105, 18, 103, 101,
            ],
            [
                167, 84, 19, 184, 181, 69, 24, 77, 217, 138, 153, 27, 53, 57, 67, 63, 17, 2, 92,
                101, 228, 36, 124, 27, 190, 204, 107, 126, 110, 133, 233, 89,
            ],
            [
                215, 41, 158, 42, 247, 26, 138, 204, 77, 41, 150, 24, 210, 9, 82, 19, 71, 51, 8,
                65, 4, 20, 246, 133, 41, 113, 41, 131, 152, 100, 32, 16,
            ],
            [
                27, 3, 67, 115, 27, 13, 69, 212, 13, 218, 22, 11, 159, 16, 4, 225, 144, 135, 141,
                190, 103, 233, 23, 1, 147, 183, 54, 204, 225, 221, 228, 39,
            ],
            [
                163, 88, 191, 29, 113, 62, 103, 4, 250, 191, 213, 187, 120, 143, 196, 188, 181,
                162, 66, 54, 60, 72, 143, 123, 205, 181, 201, 100, 33, 40, 142, 33,
            ],
            [
                4, 143, 12, 122, 174, 103, 54, 85, 99, 195, 241, 179, 24, 201, 251, 36, 162, 198,
                246, 6, 62, 58, 89, 170, 226, 4, 69, 95, 12, 254, 166, 120,
            ],
            [
                210, 207, 166, 93, 63, 158, 88, 19, 64, 146, 159, 227, 223, 164, 14, 182, 55, 10,
                207, 177, 185, 101, 7, 74, 179, 182, 100, 84, 57, 116, 45, 109,
            ],
            [
                113, 51, 209, 30, 165, 190, 207, 67, 15, 54, 142, 87, 251, 32, 161, 47, 6, 52,
                108, 198, 43, 90, 56, 59, 82, 252, 10, 25, 67, 62, 17, 90,
            ],
            [
                248, 242, 200, 174, 88, 170, 11, 87, 219, 188, 2, 179, 157, 231, 12, 193, 102,
                240, 82, 191, 68, 180, 127, 242, 43, 182, 217, 19, 139, 75, 193, 85,
            ],
            [
                2, 77, 183, 69, 48, 48, 19, 186, 86, 113, 46, 71, 49, 49, 64, 166, 78, 53, 103,
                191, 183, 103, 244, 191, 51, 92, 216, 87, 195, 100, 235, 79,
            ],
            [
                41, 225, 16, 113, 81, 241, 183, 74, 253, 27, 124, 119, 230, 103, 195, 193, 60, 114,
                66, 53, 153, 160, 35, 225, 75, 182, 213, 61, 244, 228, 71, 22,
            ],
            [
                135, 160, 11, 239, 176, 108, 194, 180, 10, 123, 89, 157, 12, 229, 14, 44, 209, 79,
                59, 89, 129, 125, 94, 178, 232, 117, 82, 94, 130, 1, 67, 80,
            ],
        ];
        // Check that the elligator map at least lands on the curve for
        // arbitrary inputs and is deterministic.
        for bytes_i in bytes.iter() {
            let r_0 = FieldElement::from_bytes(bytes_i);
            let Q = RistrettoPoint::elligator_ristretto_flavor(&r_0);
            use crate::traits::ValidityCheck;
            assert!(Q.0.is_valid());
            let Q2 = RistrettoPoint::elligator_ristretto_flavor(&r_0);
            assert_eq!(Q.compress(), Q2.compress());
        }
    }

    #[test]
    fn hash_to_group_kats() {
        // The uniform-bytestring inputs and encodings of their outputs,
        // from the Ristretto hash-to-group test vectors.
        let vectors: [(&str, &str); 7] = [
            (
                "5d1be09e3d0c82fc538112490e35701979d99e06ca3e2b5b54bffe8b4dc772c1\
                 4d98b696a1bbfb5ca32c436cc61c16563790306c79eaca7705668b47dffe5bb6",
                "3066f82a1a747d45120d1740f14358531a8f04bbffe6a819f86dfe50f44a0a46",
            ),
            (
                "f116b34b8f17ceb56e8732a60d913dd10cce47a6d53bee9204be8b44f6678b27\
                 0102a56902e2488c46120e9276cfe54638286b9e4b3cdb470b542d46c2068d38",
                "f26e5b6f7d362d2d2a94c5d0e7602cb4773c95a2e5c31a64f133189fa76ed61b",
            ),
            (
                "8422e1bbdaab52938b81fd602effb6f89110e1e57208ad12d9ad767e2e25510c\
                 27140775f9337088b982d83d7fcf0b2fa1edffe51952cbe7365e95c86eaf325c",
                "006ccd2a9e6867e6a2c5cea83d3302cc9de128dd2a9a57dd8ee7b9d7ffe02826",
            ),
            (
                "ac22415129b61427bf464e17baee8db65940c233b98afce8d17c57beeb7876c2\
                 150d15af1cb1fb824bbd14955f2b57d08d388aab431a391cfc33d5bafb5dbbaf",
                "f8f0c87cf237953c5890aec3998169005dae3eca1fbb04548c635953c817f92a",
            ),
            (
                "165d697a1ef3d5cf3c38565beefcf88c0f282b8e7dbd28544c483432f1cec767\
                 5debea8ebb4e5fe7d6f6e5db15f15587ac4d4d4a1de7191e0c1ca6664abcc413",
                "ae81e7dedf20a497e10c304a765c1767a42d6e06029758d2d7e8ef7cc4c41179",
            ),
            (
                "a836e6c9a9ca9f1e8d486273ad56a78c70cf18f0ce10abb1c7172ddd605d7fd2\
                 979854f47ae1ccf204a33102095b4200e5befc0465accc263175485f0e17ea5c",
                "e2705652ff9f5e44d3e841bf1c251cf7dddb77d140870d1ab2ed64f1a9ce8628",
            ),
            (
                "2cdc11eaeb95daf01189417cdddbf95952993aa9cb9c640eb5058d09702c7462\
                 2c9965a697a3b345ec24ee56335b556e677b30e6f90ac77d781064f866a3c982",
                "80bd07262511cdde4863f8a7434cef696750681cb9510eea557088f76d9e5065",
            ),
        ];

        for (input_hex, output_hex) in vectors.iter() {
            let mut input = [0u8; 64];
            input.copy_from_slice(&hex::decode(input_hex).unwrap());
            let expected = CompressedRistretto::from_slice(&hex::decode(output_hex).unwrap());
            let P = RistrettoPoint::from_uniform_bytes(&input);
            assert_eq!(P.compress(), expected);
        }
    }

    #[test]
    fn bad_encodings_are_rejected() {
        // Known-bad encodings: non-canonical field encodings, negative
        // field elements, nonsquare x^2, negative xy, and s = -1 (y = 0).
        let bad_encodings = [
            // These are all bad because they're non-canonical field encodings.
            "00ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
            "f3ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
            "edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
            // These are all bad because they're negative field elements.
            "0100000000000000000000000000000000000000000000000000000000000000",
            "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
            "ed57ffd8c914fb201471d1c3d245ce3c746fcbe63a3679d51b6a516ebebe0e20",
            "c34c4e1826e5d403b78e246e88aa051c36ccf0aafebffe137d148a2bf9104562",
            "c940e5a4404157cfb1628b108db051a8d439e1a421394ec4ebccb9ec92a8ac78",
            "47cfc5497c53dc8e61c91d17fd626ffb1c49e2bca94eed052281b510b1117a24",
            "f1c6165d33367351b0da8f6e4511010c68174a03b6581212c71c0e1d026c3c72",
            "87260f7a2f12495118360f02c26a470f450dadf34a413d21042b43b9d93e1309",
            // These are all bad because they give a nonsquare x^2.
            "26948d35ca62e643e26a83177332e6b6afeb9d08e4268b650f1f5bbd8d81d371",
            "4eac077a713c57b4f4397629a4145982c661f48044dd3f96427d40b147d9742f",
            "de6a7b00deadc788eb6b6c8d20c0ae96c2f2019078fa604fee5b87d6e989ad7b",
            "bcab477be20861e01e4a0e295284146a510150d9817763caf1a6f4b422d67042",
            "2a292df7e32cababbd9de088d1d1abec9fc0440f637ed2fba145094dc14bea08",
            "f4a9e534fc0d216c44b218fa0c42d99635a0127ee2e53c712f70609649fdff22",
            "8268436f8c4126196cf64b3c7ddbda90746a378625f9813dd9b8457077256731",
            "2810e5cbc2cc4d4eece54f61c6f69758e289aa7ab440b3cbeaa21995c2f4232b",
            // These are all bad because they give a negative xy value.
            "3eb858e78f5a7254d8c9731174a94f76755fd3941c0ac93735c07ba14579630e",
            "a45fdc55c76448c049a1ab33f17023edfb2be3581e9c7aade8a6125215e04220",
            "d483fe813c6ba647ebbfd3ec41adca1c6130c2beeee9d9bf065c8d151c5f396e",
            "8a2e1d30050198c65a54483123960ccc38aef6848e1ec8f5f780e8523769ba32",
            "32888462f8b486c68ad7dd9610be5192bbeaf3b443951ac1a8118419d9fa097b",
            "227142501b9d4355ccba290404bde41575b037693cef1f438c47f8fbf35d1165",
            "5c37cc491da847cfeb9281d407efc41e15144c876e0170b499a96a22ed31e01e",
            "445425117cb8c90edcbc7c1cc0e74f747f2c1efa5630a967c64f287792a48a4b",
            // This is s = -1, which causes y = 0.
            "ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
        ];

        for bad_hex in bad_encodings.iter() {
            let bad = CompressedRistretto::from_slice(&hex::decode(bad_hex).unwrap());
            assert_eq!(bad.decompress(), Err(InvalidEncoding), "{}", bad_hex);
        }
    }

    #[test]
    fn random_roundtrip() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(0x52697374);
        let B = &*crate_constants::RISTRETTO_BASEPOINT_TABLE;
        for _ in 0..100 {
            let P = B.mul_base(&Scalar::random(&mut rng));
            let compressed_P = P.compress();
            let Q = compressed_P.decompress().unwrap();
            assert_eq!(P, Q);
        }
    }

    #[test]
    fn random_is_valid() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(0x52697374);
        for _ in 0..10 {
            let P = RistrettoPoint::random(&mut rng);
            use crate::traits::ValidityCheck;
            assert!(P.0.is_valid());
        }
    }
}
