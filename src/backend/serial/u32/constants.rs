// -*- mode: rust; -*-
//
// This file is part of ristretto255.
// See LICENSE for licensing information.

//! This module contains backend-specific constant values, such as the 32-bit
//! limbs of the curve constants.

use crate::backend::serial::u32::field::FieldElement2625;
use crate::backend::serial::u32::scalar::Scalar29;
use crate::edwards::EdwardsPoint;

/// The value of minus one, equal to `-&FieldElement::one()`.
pub(crate) const MINUS_ONE: FieldElement2625 = FieldElement2625([
    67108844, 33554431, 67108863, 33554431, 67108863,
    33554431, 67108863, 33554431, 67108863, 33554431,
]);

/// Edwards `d` value, equal to `-121665/121666 mod p`.
pub(crate) const EDWARDS_D: FieldElement2625 = FieldElement2625([
    56195235, 13857412, 51736253, 6949390, 114729,
    24766616, 60832955, 30306712, 48412415, 21499315,
]);

/// Edwards `2*d` value, equal to `2*(-121665/121666) mod p`.
pub(crate) const EDWARDS_D2: FieldElement2625 = FieldElement2625([
    45281625, 27714825, 36363642, 13898781, 229458,
    15978800, 54557047, 27058993, 29715967, 9444199,
]);

/// One minus edwards `d` value squared, equal to `1 - d^2 mod p`.
pub(crate) const ONE_MINUS_EDWARDS_D_SQUARED: FieldElement2625 = FieldElement2625([
    6275446, 16937061, 44170319, 29780721, 11667076,
    7397348, 39186143, 1766194, 42675006, 672202,
]);

/// Edwards `d` value minus one squared, equal to `(d - 1)^2 mod p`.
pub(crate) const EDWARDS_D_MINUS_ONE_SQUARED: FieldElement2625 = FieldElement2625([
    15551776, 22456977, 53683765, 23429360, 55212328,
    10178283, 40474537, 4729243, 61826754, 23438029,
]);

/// `= sqrt(a*d - 1)`, where `a = -1 (mod p)`, `d` are the Edwards curve
/// parameters.  This is the odd root; the Ristretto hash-to-group map is
/// defined in terms of this choice of sign.
pub(crate) const SQRT_AD_MINUS_ONE: FieldElement2625 = FieldElement2625([
    24849947, 33400850, 43495378, 6347714, 46036536,
    32887293, 41837720, 18186727, 66238516, 14525638,
]);

/// `= 1/sqrt(a - d)`, where `a = -1 (mod p)`, `d` are the Edwards curve
/// parameters.
pub(crate) const INVSQRT_A_MINUS_D: FieldElement2625 = FieldElement2625([
    6111466, 4156064, 39310137, 12243467, 41204824,
    120896, 20826367, 26493656, 6093567, 31568420,
]);

/// Precomputed value of one of the square roots of -1 (mod p).
pub(crate) const SQRT_M1: FieldElement2625 = FieldElement2625([
    34513072, 25610706, 9377949, 3500415, 12389472,
    33281959, 41962654, 31548777, 326685, 11406482,
]);

/// `L` is the order of base point, i.e. \\( 2\^{252} +
/// 27742317777372353535851937790883648493 \\), as nine 29-bit limbs.
pub(crate) const L: Scalar29 = Scalar29([
    485872621, 9640146, 501691798, 502512965, 333, 0, 0, 0, 1048576,
]);

/// The Ed25519 basepoint, as an `EdwardsPoint`.
///
/// This is kept away from the public `constants` module so that
/// it can be used as the seed for the runtime-built lookup tables.
pub const ED25519_BASEPOINT_POINT: EdwardsPoint = EdwardsPoint {
    X: FieldElement2625([
        52811034, 25909283, 16144682, 17082669, 27570973,
        30858332, 40966398, 8378388, 20764389, 8758491,
    ]),
    Y: FieldElement2625([
        40265304, 26843545, 13421772, 20132659, 26843545,
        6710886, 53687091, 13421772, 40265318, 26843545,
    ]),
    Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    T: FieldElement2625([
        28827043, 27438313, 39759291, 244362, 8635006,
        11264893, 19351346, 13413597, 16611511, 27139452,
    ]),
};

/// The 8-torsion subgroup \\(\mathcal E \[8\]\\).
///
/// In the case of Curve25519, it is cyclic; the \\(i\\)-th element of the
/// array is \\([i]P\\), where \\(P\\) is a point of order \\(8\\).
pub const EIGHT_TORSION: [EdwardsPoint; 8] = [
    EdwardsPoint {
        X: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        Y: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement2625([
            45756067, 28208718, 62448683, 8347856, 42965774,
            18986308, 36923107, 12247769, 33528939, 25209113,
        ]),
        Y: FieldElement2625([
            6952903, 1265500, 60246523, 7057497, 4037696,
            5447722, 35427965, 15325401, 19365852, 31985330,
        ]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([
            25262188, 11972680, 55392862, 5869611, 18193162,
            17256693, 46438198, 8559097, 63567321, 5011180,
        ]),
    },
    EdwardsPoint {
        X: FieldElement2625([
            34513072, 25610706, 9377949, 3500415, 12389472,
            33281959, 41962654, 31548777, 326685, 11406482,
        ]),
        Y: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement2625([
            45756067, 28208718, 62448683, 8347856, 42965774,
            18986308, 36923107, 12247769, 33528939, 25209113,
        ]),
        Y: FieldElement2625([
            60155942, 32288931, 6862340, 26496934, 63071167,
            28106709, 31680898, 18229030, 47743011, 1569101,
        ]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([
            41846657, 21581751, 11716001, 27684820, 48915701,
            16297738, 20670665, 24995334, 3541542, 28543251,
        ]),
    },
    EdwardsPoint {
        X: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        Y: FieldElement2625([
            67108844, 33554431, 67108863, 33554431, 67108863,
            33554431, 67108863, 33554431, 67108863, 33554431,
        ]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement2625([
            21352778, 5345713, 4660180, 25206575, 24143089,
            14568123, 30185756, 21306662, 33579924, 8345318,
        ]),
        Y: FieldElement2625([
            60155942, 32288931, 6862340, 26496934, 63071167,
            28106709, 31680898, 18229030, 47743011, 1569101,
        ]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([
            25262188, 11972680, 55392862, 5869611, 18193162,
            17256693, 46438198, 8559097, 63567321, 5011180,
        ]),
    },
    EdwardsPoint {
        X: FieldElement2625([
            32595773, 7943725, 57730914, 30054016, 54719391,
            272472, 25146209, 2005654, 66782178, 22147949,
        ]),
        Y: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement2625([
            21352778, 5345713, 4660180, 25206575, 24143089,
            14568123, 30185756, 21306662, 33579924, 8345318,
        ]),
        Y: FieldElement2625([
            6952903, 1265500, 60246523, 7057497, 4037696,
            5447722, 35427965, 15325401, 19365852, 31985330,
        ]),
        Z: FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        T: FieldElement2625([
            41846657, 21581751, 11716001, 27684820, 48915701,
            16297738, 20670665, 24995334, 3541542, 28543251,
        ]),
    },
];
