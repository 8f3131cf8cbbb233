//! secp256k1 arithmetic adapter.
//!
//! Child derivation needs only a handful of curve operations. They are exposed
//! through [`CurveArithmetic`] so the rest of the crate never touches `k256` types
//! for point math directly.

use k256::elliptic_curve::PrimeField;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, Scalar};

use crate::error::{Error, Result};

/// Curve operations consumed by key derivation.
pub trait CurveArithmetic {
    /// Non-zero scalar in `[1, n)`.
    type Scalar;
    /// Curve point other than the identity.
    type Point;

    /// `d·G`
    fn scalar_base_mul(scalar: &Self::Scalar) -> Self::Point;

    /// `P + Q`, failing if the sum is the point at infinity.
    fn point_add(p: &Self::Point, q: &Self::Point) -> Result<Self::Point>;

    /// Parse a SEC1 encoding (33 or 65 bytes).
    fn point_from_bytes(bytes: &[u8]) -> Result<Self::Point>;

    /// SEC1 encoding, compressed or uncompressed.
    fn point_to_bytes(point: &Self::Point, compressed: bool) -> Vec<u8>;

    /// `(a + b) mod n`, or `None` if the sum is zero.
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Option<Self::Scalar>;

    /// Parse a big-endian 256-bit integer, or `None` if it is zero or `>= n`.
    fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar>;
}

/// A validated secp256k1 point. Never the point at infinity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point(k256::PublicKey);

impl Point {
    /// Parse a SEC1-encoded point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Secp256k1::point_from_bytes(bytes)
    }

    /// 33-byte compressed encoding.
    pub fn to_compressed(&self) -> [u8; 33] {
        let encoded = self.0.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// 65-byte uncompressed encoding.
    pub fn to_uncompressed(&self) -> [u8; 65] {
        let encoded = self.0.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(encoded.as_bytes());
        out
    }
}

/// The secp256k1 curve, backed by `k256`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1;

impl CurveArithmetic for Secp256k1 {
    type Scalar = NonZeroScalar;
    type Point = Point;

    fn scalar_base_mul(scalar: &NonZeroScalar) -> Point {
        Point(k256::PublicKey::from_secret_scalar(scalar))
    }

    fn point_add(p: &Point, q: &Point) -> Result<Point> {
        let sum: ProjectivePoint = p.0.to_projective() + q.0.to_projective();
        k256::PublicKey::from_affine(sum.to_affine())
            .map(Point)
            .map_err(|_| Error::InvalidPoint)
    }

    fn point_from_bytes(bytes: &[u8]) -> Result<Point> {
        if bytes.len() != 33 && bytes.len() != 65 {
            return Err(Error::InvalidPoint);
        }
        // Rejects the identity encoding, unknown prefixes and off-curve coordinates
        k256::PublicKey::from_sec1_bytes(bytes)
            .map(Point)
            .map_err(|_| Error::InvalidPoint)
    }

    fn point_to_bytes(point: &Point, compressed: bool) -> Vec<u8> {
        if compressed {
            point.to_compressed().to_vec()
        } else {
            point.to_uncompressed().to_vec()
        }
    }

    fn scalar_add(a: &NonZeroScalar, b: &NonZeroScalar) -> Option<NonZeroScalar> {
        let sum: Scalar = **a + **b;
        Option::from(NonZeroScalar::new(sum))
    }

    fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<NonZeroScalar> {
        let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();
        scalar.and_then(|s| Option::from(NonZeroScalar::new(s)))
    }
}
