// -*- mode: rust; -*-
//
// This file is part of ristretto255.
// Portions derived from curve25519-dalek:
// Copyright (c) 2019 Oleg Andreev
// See LICENSE for licensing information.

//! Implementation of a variant of Pippenger's algorithm.

#![allow(non_snake_case)]

use core::borrow::Borrow;

use crate::edwards::EdwardsPoint;
use crate::scalar::Scalar;
use crate::traits::Identity;
use crate::traits::VartimeMultiscalarMul;

/// Implements a version of Pippenger's algorithm.
///
/// See the documentation in the [`VartimeMultiscalarMul`] impl below.
/// The algorithm is variable time with respect to the scalars and must
/// never be used with secret inputs.
pub struct Pippenger;

impl VartimeMultiscalarMul for Pippenger {
    type Point = EdwardsPoint;

    /// Let `n` be the number of point-scalar pairs and `w` a window of bits
    /// (6..8, chosen based on `n`).
    ///
    /// 1. Prepare `2^(w-1)` buckets with indices `[1..2^(w-1)]` initialized
    ///    with identity points.  Bucket 0 is not needed as it would contain
    ///    points multiplied by 0.
    /// 2. Convert scalars to a radix-`2^w` representation with signed digits
    ///    in `[-2^w/2, 2^w/2]`.  Only the last digit may equal `2^w/2`.
    /// 3. Starting with the last window, for each point `i=[0..n)` add it to
    ///    the bucket indexed by the point's scalar's digit in that window.
    /// 4. Once all points are sorted into buckets, sum the buckets weighted
    ///    by their index.  The efficient way is to start with the last
    ///    bucket and keep two running sums: an intermediate sum from the
    ///    last to the first bucket, and the full sum of intermediate sums,
    ///    giving `Σ (j+1)·bucket[j]`.
    /// 5. Shift the accumulated result by `w` bits using `w` doublings, add
    ///    the bucket sum, and repeat for the next window.
    ///
    /// For large `n` the dominant cost is `n*256/w` additions; if `w` is too
    /// big and `n` too small the `2^w/2` bucket additions dominate, so the
    /// optimal `w` grows slowly with `n`.
    ///
    /// This algorithm is adapted from section 4 of
    /// <https://eprint.iacr.org/2012/549.pdf>.
    fn vartime_multiscalar_mul<I, J>(scalars: I, points: J) -> EdwardsPoint
    where
        I: IntoIterator,
        I::Item: Borrow<Scalar>,
        J: IntoIterator,
        J::Item: Borrow<EdwardsPoint>,
    {
        let mut scalars = scalars.into_iter();
        let size = scalars.by_ref().size_hint().0;

        // Digit width in bits. As digit width grows,
        // number of point additions goes down, but amount of
        // buckets and bucket additions grows exponentially.
        let w = if size < 500 {
            6
        } else if size < 800 {
            7
        } else {
            8
        };

        let max_digit: usize = 1 << w;
        let digits_count: usize = Scalar::to_radix_2w_size_hint(w);
        let buckets_count: usize = max_digit / 2; // digits are signed+centered hence 2^w/2, excluding 0-th bucket

        // Collect digitized scalars and Niels points in buffers for repeated
        // access (the whole set is scanned once per digit position).
        let scalars = scalars.map(|s| s.borrow().to_radix_2w(w));

        let points = points.into_iter().map(|p| p.borrow().to_projective_niels());

        let scalars_points = scalars.zip(points).collect::<Vec<_>>();

        // Prepare 2^w/2 buckets.
        // buckets[i] corresponds to a multiplication factor (i+1).
        let mut buckets: Vec<_> = (0..buckets_count)
            .map(|_| EdwardsPoint::identity())
            .collect();

        let mut columns = (0..digits_count).rev().map(|digit_index| {
            // Clear the buckets when processing another digit.
            for bucket in buckets.iter_mut() {
                *bucket = EdwardsPoint::identity();
            }

            // Iterate over pairs of (point, scalar)
            // and add/sub the point to the corresponding bucket.
            // Note: if we add support for precomputed lookup tables,
            // we'll be adding/subtracting point premultiplied by `digits[i]` to buckets[0].
            for (digits, pt) in scalars_points.iter() {
                // Widen digit so that we don't run into edge cases when w=8.
                let digit = digits[digit_index] as i16;
                if digit > 0 {
                    let b = (digit - 1) as usize;
                    buckets[b] = (&buckets[b] + pt).to_extended();
                } else if digit < 0 {
                    let b = (-digit - 1) as usize;
                    buckets[b] = (&buckets[b] - pt).to_extended();
                }
            }

            // Add the buckets applying the multiplication factor to each bucket.
            // The most efficient way to do that is to have a single sum with two running sums:
            // an intermediate sum from last bucket to the first, and a sum of intermediate sums.
            //
            // For example, to add buckets 1*A, 2*B, 3*C we need to add these points:
            //   C
            //   C B
            //   C B A   Sum = C + (C+B) + (C+B+A)
            let mut buckets_intermediate_sum = buckets[buckets_count - 1];
            let mut buckets_sum = buckets[buckets_count - 1];
            for i in (0..(buckets_count - 1)).rev() {
                buckets_intermediate_sum += buckets[i];
                buckets_sum += buckets_intermediate_sum;
            }

            buckets_sum
        });

        // Take the high column as an initial value to avoid wasting time
        // doubling the identity element in `fold()`.
        // `unwrap()` always succeeds because we know we have more than zero digits.
        let hi_column = columns.next().unwrap();

        columns.fold(hi_column, |total, p| total.mul_by_pow_2(w as u32) + p)
    }
}
