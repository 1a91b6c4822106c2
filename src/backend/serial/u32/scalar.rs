// -*- mode: rust; -*-
//
// This file is part of ristretto255.
// See LICENSE for licensing information.

//! Arithmetic mod \\( \ell = 2\^{252} + 27742317777372353535851937790883648493 \\)
//! on 32-bit targets.
//!
//! Two limb shapes are used.  Addition and subtraction work on nine 29-bit
//! limbs (`Scalar29`), where a single conditional add or subtract of
//! \\( \ell \\) finishes the reduction.  Multiplication and wide reduction
//! work on signed 21-bit limbs in 64-bit accumulators, folding the high limbs
//! down with the precomputed expansion of \\( -(\ell - 2\^{252}) \\) in base
//! \\( 2\^{21} \\).

use core::fmt::Debug;

use zeroize::Zeroize;

use crate::backend::serial::u32::constants;

/// The `Scalar29` struct represents an element in \\( \mathbb Z / \ell \mathbb Z \\)
/// as nine 29-bit limbs.
#[derive(Copy, Clone)]
pub struct Scalar29(pub [u32; 9]);

impl Debug for Scalar29 {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Scalar29: {:?}", &self.0[..])
    }
}

impl Zeroize for Scalar29 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Scalar29 {
    /// Return the zero scalar.
    pub fn zero() -> Scalar29 {
        Scalar29([0; 9])
    }

    /// Unpack a 32 byte / 256 bit scalar into 9 29-bit limbs.
    pub fn from_bytes(bytes: &[u8; 32]) -> Scalar29 {
        let mask = (1u32 << 29) - 1;
        let mut s = Scalar29::zero();

        for i in 0..9 {
            // Limb i holds bits [29*i, 29*i + 29); gather the (up to five)
            // bytes it straddles.
            let bit = 29 * i;
            let mut window: u64 = 0;
            for k in 0..5 {
                let idx = bit / 8 + k;
                if idx < 32 {
                    window |= (bytes[idx] as u64) << (8 * k);
                }
            }
            s.0[i] = ((window >> (bit % 8)) as u32) & mask;
        }

        s
    }

    /// Pack the limbs of this `Scalar29` into 32 bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut s = [0u8; 32];

        for i in 0..9 {
            let bit = 29 * i;
            let limb = (self.0[i] as u64) << (bit % 8);
            for k in 0..5 {
                let idx = bit / 8 + k;
                if idx < 32 {
                    s[idx] |= (limb >> (8 * k)) as u8;
                }
            }
        }

        s
    }

    /// Compute `a + b` (mod l).
    pub fn add(a: &Scalar29, b: &Scalar29) -> Scalar29 {
        let mut sum = Scalar29::zero();
        let mask = (1u32 << 29) - 1;

        // a + b
        let mut carry: u32 = 0;
        for i in 0..9 {
            carry = a.0[i] + b.0[i] + (carry >> 29);
            sum.0[i] = carry & mask;
        }

        // subtract l if the sum is >= l
        Scalar29::sub(&sum, &constants::L)
    }

    /// Compute `a - b` (mod l).
    pub fn sub(a: &Scalar29, b: &Scalar29) -> Scalar29 {
        let mut difference = Scalar29::zero();
        let mask = (1u32 << 29) - 1;

        // a - b
        let mut borrow: u32 = 0;
        for i in 0..9 {
            borrow = a.0[i].wrapping_sub(b.0[i] + (borrow >> 31));
            difference.0[i] = borrow & mask;
        }

        // conditionally add l if the difference is negative
        let underflow_mask = ((borrow >> 31) ^ 1).wrapping_sub(1);
        let mut carry: u32 = 0;
        for i in 0..9 {
            carry = (carry >> 29) + difference.0[i] + (constants::L.0[i] & underflow_mask);
            difference.0[i] = carry & mask;
        }

        difference
    }
}

// ------------------------------------------------------------------------
// Multiplication and wide reduction on 21-bit limbs
// ------------------------------------------------------------------------

/// The limbs of \\( -(\ell - 2\^{252}) \\) in base \\( 2\^{21} \\); folding
/// limb `s[k]` (worth \\( 2\^{21k} \\), \\( k \geq 12 \\)) down multiplies it
/// by these and accumulates into `s[k-12..k-6]`.
const FOLD: [i64; 6] = [666643, 470296, 654183, -997805, 136657, -683901];

#[inline]
fn load3(b: &[u8]) -> i64 {
    (b[0] as i64) | ((b[1] as i64) << 8) | ((b[2] as i64) << 16)
}

#[inline]
fn load4(b: &[u8]) -> i64 {
    (b[0] as i64) | ((b[1] as i64) << 8) | ((b[2] as i64) << 16) | ((b[3] as i64) << 24)
}

/// Split a 32-byte scalar into twelve 21-bit limbs.
fn load_limbs(data: &[u8; 32]) -> [i64; 12] {
    let mask = 0x1f_ffffi64;
    [
        load3(&data[0..]) & mask,
        (load4(&data[2..]) >> 5) & mask,
        (load3(&data[5..]) >> 2) & mask,
        (load4(&data[7..]) >> 7) & mask,
        (load4(&data[10..]) >> 4) & mask,
        (load3(&data[13..]) >> 1) & mask,
        (load4(&data[15..]) >> 6) & mask,
        (load3(&data[18..]) >> 3) & mask,
        load3(&data[21..]) & mask,
        (load4(&data[23..]) >> 5) & mask,
        (load3(&data[26..]) >> 2) & mask,
        load4(&data[28..]) >> 7,
    ]
}

/// Fold limb `s[k]` down twelve positions using the precomputed multipliers.
#[inline]
fn fold(s: &mut [i64; 24], k: usize) {
    for j in 0..6 {
        s[k - 12 + j] += s[k] * FOLD[j];
    }
    s[k] = 0;
}

/// Signed centered carry from limb `i` into limb `i+1`, leaving
/// `s[i]` in \\( [-2\^{20}, 2\^{20}) \\).
#[inline]
fn carry_center(s: &mut [i64; 24], i: usize) {
    let carry = (s[i] + (1 << 20)) >> 21;
    s[i + 1] += carry;
    s[i] -= carry << 21;
}

/// Plain carry from limb `i` into limb `i+1`, leaving `s[i]` in
/// \\( [0, 2\^{21}) \\).
#[inline]
fn carry_plain(s: &mut [i64; 24], i: usize) {
    let carry = s[i] >> 21;
    s[i + 1] += carry;
    s[i] -= carry << 21;
}

/// Shared reduction tail: fold the high limbs of `s` down in five sweeps and
/// repack the canonical twelve 21-bit limbs into bytes.  The output is the
/// unique representative in \\( [0, \ell) \\).
fn reduce_limbs(s: &mut [i64; 24]) -> [u8; 32] {
    for k in (18..24).rev() {
        fold(s, k);
    }

    for &i in &[6, 8, 10, 12, 14, 16] {
        carry_center(s, i);
    }
    for &i in &[7, 9, 11, 13, 15] {
        carry_center(s, i);
    }

    for k in (12..18).rev() {
        fold(s, k);
    }

    for &i in &[0, 2, 4, 6, 8, 10] {
        carry_center(s, i);
    }
    for &i in &[1, 3, 5, 7, 9, 11] {
        carry_center(s, i);
    }

    // The centered carry out of s[11] landed in s[12]; fold it back, let the
    // plain carries normalize, and repeat once for the final carry bit.
    fold(s, 12);
    for i in 0..12 {
        carry_plain(s, i);
    }
    fold(s, 12);
    for i in 0..11 {
        carry_plain(s, i);
    }

    let mut out = [0u8; 32];
    out[0] = s[0] as u8;
    out[1] = (s[0] >> 8) as u8;
    out[2] = ((s[0] >> 16) | (s[1] << 5)) as u8;
    out[3] = (s[1] >> 3) as u8;
    out[4] = (s[1] >> 11) as u8;
    out[5] = ((s[1] >> 19) | (s[2] << 2)) as u8;
    out[6] = (s[2] >> 6) as u8;
    out[7] = ((s[2] >> 14) | (s[3] << 7)) as u8;
    out[8] = (s[3] >> 1) as u8;
    out[9] = (s[3] >> 9) as u8;
    out[10] = ((s[3] >> 17) | (s[4] << 4)) as u8;
    out[11] = (s[4] >> 4) as u8;
    out[12] = (s[4] >> 12) as u8;
    out[13] = ((s[4] >> 20) | (s[5] << 1)) as u8;
    out[14] = (s[5] >> 7) as u8;
    out[15] = ((s[5] >> 15) | (s[6] << 6)) as u8;
    out[16] = (s[6] >> 2) as u8;
    out[17] = (s[6] >> 10) as u8;
    out[18] = ((s[6] >> 18) | (s[7] << 3)) as u8;
    out[19] = (s[7] >> 5) as u8;
    out[20] = (s[7] >> 13) as u8;
    out[21] = s[8] as u8;
    out[22] = (s[8] >> 8) as u8;
    out[23] = ((s[8] >> 16) | (s[9] << 5)) as u8;
    out[24] = (s[9] >> 3) as u8;
    out[25] = (s[9] >> 11) as u8;
    out[26] = ((s[9] >> 19) | (s[10] << 2)) as u8;
    out[27] = (s[10] >> 6) as u8;
    out[28] = ((s[10] >> 14) | (s[11] << 7)) as u8;
    out[29] = (s[11] >> 1) as u8;
    out[30] = (s[11] >> 9) as u8;
    out[31] = (s[11] >> 17) as u8;

    out
}

/// Reduce a 512-bit little-endian integer mod \\( \ell \\).
pub(crate) fn reduce_wide(wide: &[u8; 64]) -> [u8; 32] {
    let mask = 0x1f_ffffi64;
    let mut s = [
        load3(&wide[0..]) & mask,
        (load4(&wide[2..]) >> 5) & mask,
        (load3(&wide[5..]) >> 2) & mask,
        (load4(&wide[7..]) >> 7) & mask,
        (load4(&wide[10..]) >> 4) & mask,
        (load3(&wide[13..]) >> 1) & mask,
        (load4(&wide[15..]) >> 6) & mask,
        (load3(&wide[18..]) >> 3) & mask,
        load3(&wide[21..]) & mask,
        (load4(&wide[23..]) >> 5) & mask,
        (load3(&wide[26..]) >> 2) & mask,
        (load4(&wide[28..]) >> 7) & mask,
        (load4(&wide[31..]) >> 4) & mask,
        (load3(&wide[34..]) >> 1) & mask,
        (load4(&wide[36..]) >> 6) & mask,
        (load3(&wide[39..]) >> 3) & mask,
        load3(&wide[42..]) & mask,
        (load4(&wide[44..]) >> 5) & mask,
        (load3(&wide[47..]) >> 2) & mask,
        (load4(&wide[49..]) >> 7) & mask,
        (load4(&wide[52..]) >> 4) & mask,
        (load3(&wide[55..]) >> 1) & mask,
        (load4(&wide[57..]) >> 6) & mask,
        load4(&wide[60..]) >> 3,
    ];

    reduce_limbs(&mut s)
}

/// Compute `(a * b) + c` mod \\( \ell \\), on canonical 32-byte encodings.
pub(crate) fn mul_add(a: &[u8; 32], b: &[u8; 32], c: &[u8; 32]) -> [u8; 32] {
    let x = load_limbs(a);
    let y = load_limbs(b);
    let z = load_limbs(c);

    let mut s = [0i64; 24];
    for i in 0..12 {
        s[i] = z[i];
    }
    for i in 0..12 {
        for j in 0..12 {
            s[i + j] += x[i] * y[j];
        }
    }

    // One centered sweep keeps the fold inputs within the bounds the
    // reduction tail assumes.
    for &i in &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22] {
        carry_center(&mut s, i);
    }
    for &i in &[1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21] {
        carry_center(&mut s, i);
    }

    reduce_limbs(&mut s)
}

/// Compute `a^2` mod \\( \ell \\), doubling the off-diagonal products.
pub(crate) fn square(a: &[u8; 32]) -> [u8; 32] {
    let x = load_limbs(a);

    let mut s = [0i64; 24];
    for i in 0..12 {
        s[i + i] += x[i] * x[i];
        for j in (i + 1)..12 {
            s[i + j] += 2 * x[i] * x[j];
        }
    }

    for &i in &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22] {
        carry_center(&mut s, i);
    }
    for &i in &[1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21] {
        carry_center(&mut s, i);
    }

    reduce_limbs(&mut s)
}

#[cfg(test)]
mod test {
    use super::*;

    /// l, the group order, in bytes.
    static L_BYTES: [u8; 32] = [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58,
        0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
    ];

    #[test]
    fn limb_constant_matches_bytes() {
        assert_eq!(Scalar29::from_bytes(&L_BYTES).0, constants::L.0);
        assert_eq!(constants::L.to_bytes(), L_BYTES);
    }

    #[test]
    fn bytes_roundtrip_through_limbs() {
        let mut bytes = [0u8; 32];
        for i in 0..32 {
            bytes[i] = (i as u8).wrapping_mul(0x37).wrapping_add(1);
        }
        bytes[31] &= 0x7f;
        assert_eq!(Scalar29::from_bytes(&bytes).to_bytes(), bytes);
    }

    #[test]
    fn add_then_sub_is_identity() {
        let a = Scalar29::from_bytes(&[7u8; 32]);
        let b = {
            let mut bytes = [0u8; 32];
            bytes[0] = 250;
            bytes[20] = 99;
            Scalar29::from_bytes(&bytes)
        };
        let sum = Scalar29::add(&a, &b);
        let diff = Scalar29::sub(&sum, &b);
        assert_eq!(diff.to_bytes(), a.to_bytes());
    }

    #[test]
    fn sub_wraps_mod_l() {
        // 0 - 1 == l - 1
        let one = {
            let mut bytes = [0u8; 32];
            bytes[0] = 1;
            Scalar29::from_bytes(&bytes)
        };
        let minus_one = Scalar29::sub(&Scalar29::zero(), &one);
        let mut expected = L_BYTES;
        expected[0] -= 1;
        assert_eq!(minus_one.to_bytes(), expected);
    }

    #[test]
    fn reduce_wide_of_l_is_zero() {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&L_BYTES);
        assert_eq!(reduce_wide(&wide), [0u8; 32]);
    }

    #[test]
    fn mul_add_one_is_identity() {
        let mut a = [0u8; 32];
        for i in 0..32 {
            a[i] = (i as u8).wrapping_mul(17);
        }
        a[31] &= 0x0f;
        let one = {
            let mut bytes = [0u8; 32];
            bytes[0] = 1;
            bytes
        };
        assert_eq!(mul_add(&a, &one, &[0u8; 32]), a);
    }
}
