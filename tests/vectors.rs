//! End-to-end tests exercising the public API against known answers.

use sha2::Sha512;

use ristretto255::constants;
use ristretto255::edwards::{CompressedEdwardsY, EdwardsPoint};
use ristretto255::errors::InvalidEncoding;
use ristretto255::ristretto::{CompressedRistretto, RistrettoPoint};
use ristretto255::scalar::Scalar;
use ristretto255::traits::{BasepointTable, Identity, IsIdentity, MultiscalarMul, VartimeMultiscalarMul};

fn scalar_from_hex(s: &str) -> Scalar {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hex::decode(s).unwrap());
    Scalar::from_canonical_bytes(bytes).unwrap()
}

/// Reducing all-ones inputs mod l, 256-bit and 512-bit wide.
#[test]
fn wide_reduction_of_all_ones() {
    let narrow = Scalar::from_bytes_mod_order([0xff; 32]);
    assert_eq!(
        hex::encode(narrow.to_bytes()),
        "1c95988d7431ecd670cf7d73f45befc6feffffffffffffffffffffffffffff0f"
    );

    let wide = Scalar::from_bytes_mod_order_wide(&[0xff; 64]);
    assert_eq!(
        hex::encode(wide.to_bytes()),
        "000f9c44e31106a447938568a71b0ed065bef517d273ecce3d9a307c1b419903"
    );
}

/// A known scalar times the Ed25519 basepoint.
#[test]
fn scalar_mul_basepoint_matches_known_answer() {
    let a = scalar_from_hex("1a0e978a90f6622d3747023f8ad8264da758aa1b88e040d1589e7b7f2376ef09");

    let a_times_b_ladder = (&constants::ED25519_BASEPOINT_POINT * &a).compress();
    let a_times_b_table = constants::ED25519_BASEPOINT_TABLE.mul_base(&a).compress();

    let expected = CompressedEdwardsY::from_slice(
        &hex::decode("ea27e26053df1b5956f14d5dec3c34c384a269b74cc3803ea8e2e7c9425e40a5").unwrap(),
    );
    assert_eq!(a_times_b_ladder, expected);
    assert_eq!(a_times_b_table, expected);
}

/// a(aB) + (-a^2)B cancels to the identity via the double-base method.
#[test]
fn double_scalar_mul_basepoint_cancellation() {
    let a = scalar_from_hex("1a0e978a90f6622d3747023f8ad8264da758aa1b88e040d1589e7b7f2376ef09");
    let aB = CompressedEdwardsY::from_slice(
        &hex::decode("ea27e26053df1b5956f14d5dec3c34c384a269b74cc3803ea8e2e7c9425e40a5").unwrap(),
    )
    .decompress()
    .unwrap();
    let b = -&(&a * &a);

    let result = EdwardsPoint::vartime_double_scalar_mul_basepoint(&a, &aB, &b);
    assert!(result.is_identity());
}

/// Decode the Ristretto basepoint encoding, double it, recompress; the
/// result must be the [2]B vector.
#[test]
fn ristretto_decode_double_recompress() {
    let b_encoding = constants::RISTRETTO_BASEPOINT_COMPRESSED;
    let two_b_encoding = CompressedRistretto::from_slice(
        &hex::decode("6a493210f7499cd17fecb510ae0cea23a110e8d5b901f8acadd3095c73a3b919").unwrap(),
    );

    let B = b_encoding.decompress().unwrap();
    let two_B = B.double();
    assert_eq!(two_B.compress(), two_b_encoding);
}

/// Valid encodings round-trip bit-for-bit; invalid ones are typed errors.
#[test]
fn ristretto_roundtrip_or_invalid_encoding() {
    // A valid random-looking encoding: the hash-to-group output of a fixed
    // seed is a uniformly distributed valid element.
    let P = RistrettoPoint::hash_from_bytes::<Sha512>(b"roundtrip seed");
    let encoding = P.compress();
    let Q = encoding.decompress().unwrap();
    assert_eq!(Q.compress().as_bytes(), encoding.as_bytes());

    // s = -1 is one of the invalid encodings.
    let mut bad = [0xffu8; 32];
    bad[0] = 0xec;
    bad[31] = 0x7f;
    assert_eq!(
        CompressedRistretto(bad).decompress(),
        Err(InvalidEncoding)
    );
}

/// Straus and Pippenger agree with the naive sum at the dispatch boundary.
#[test]
fn straus_vs_pippenger_at_dispatch_boundary() {
    let B = constants::RISTRETTO_BASEPOINT_POINT;

    let scalars: Vec<Scalar> = (0..30)
        .map(|i| Scalar::hash_from_bytes::<Sha512>(&[i as u8]))
        .collect();
    let points: Vec<RistrettoPoint> = scalars.iter().map(|s| &B * s).collect();

    let naive: RistrettoPoint = scalars
        .iter()
        .zip(points.iter())
        .map(|(s, P)| P * s)
        .sum();

    // n = 30 dispatches to Pippenger; one fewer pair dispatches to Straus.
    let pippenger = RistrettoPoint::vartime_multiscalar_mul(&scalars, &points);
    let straus = RistrettoPoint::vartime_multiscalar_mul(&scalars[..29], &points[..29]);
    let straus_full = RistrettoPoint::multiscalar_mul(&scalars, &points);

    assert_eq!(naive.compress(), pippenger.compress());
    assert_eq!(naive.compress(), straus_full.compress());

    let naive_29: RistrettoPoint = scalars[..29]
        .iter()
        .zip(points[..29].iter())
        .map(|(s, P)| P * s)
        .sum();
    assert_eq!(naive_29.compress(), straus.compress());
}

/// Hashing to the group and to scalars through the digest seam.
#[test]
fn hash_seams_are_deterministic_and_valid() {
    let s1 = Scalar::hash_from_bytes::<Sha512>(b"test scalar");
    let s2 = Scalar::hash_from_bytes::<Sha512>(b"test scalar");
    assert_eq!(s1, s2);
    assert!(s1.is_canonical());

    let P1 = RistrettoPoint::hash_from_bytes::<Sha512>(b"test point");
    let P2 = RistrettoPoint::hash_from_bytes::<Sha512>(b"test point");
    assert_eq!(P1, P2);
    // The hash output must interact correctly with the group structure.
    assert_eq!(&(&P1 + &P2) - &P2, P1);
}

/// The Edwards and Ristretto layers agree about scalar arithmetic.
#[test]
fn scalar_ring_and_group_are_compatible() {
    let a = Scalar::hash_from_bytes::<Sha512>(b"a");
    let b = Scalar::hash_from_bytes::<Sha512>(b"b");
    let B = constants::RISTRETTO_BASEPOINT_POINT;

    // (a + b)B == aB + bB
    assert_eq!(&B * &(&a + &b), &(&B * &a) + &(&B * &b));
    // (a * b)B == a(bB)
    assert_eq!(&B * &(&a * &b), &(&B * &b) * &a);
    // a * a^-1 * B == B
    assert_eq!(&(&B * &a) * &a.invert(), B);
}

/// The identity element encodes as 32 zero bytes and decodes back.
#[test]
fn identity_encoding() {
    let id = RistrettoPoint::identity();
    assert_eq!(id.compress().as_bytes(), &[0u8; 32]);
    assert!(CompressedRistretto([0u8; 32]).decompress().unwrap().is_identity());
}
