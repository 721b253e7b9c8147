use core::ops::{Add, AddAssign, Neg};

use k256::{
    elliptic_curve::{
        sec1::{EncodedPoint, FromEncodedPoint, ToEncodedPoint},
        Field, PrimeField,
    },
    AffinePoint, FieldBytes, FieldElement, NonZeroScalar, Secp256k1,
};
use zeroize::DefaultIsZeroes;

use crate::error::CurveError;

pub(crate) type BackendScalar = k256::Scalar;
pub(crate) type BackendPoint = k256::ProjectivePoint;

/// Generator for secp256k1, value `G` defined in "Standards for Efficient Cryptography" (SEC2) 2.4.1,
/// in uncompressed SEC1 form.
pub const SECP256K1_GENERATOR: [u8; 65] = [
    0x04, 0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B, 0x07, 0x02, 0x9B,
    0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17, 0x98, 0x48, 0x3A, 0xDA, 0x77, 0x26,
    0xA3, 0xC4, 0x65, 0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08, 0xA8, 0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19,
    0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10, 0xD4, 0xB8,
];

/// The field prime `p` of secp256k1.
pub const SECP256K1_P: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// The group order `n` of secp256k1.
pub const SECP256K1_N: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xba, 0xae, 0xdc,
    0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// `(p + 1) / 4`, big-endian. Since `p ≡ 3 (mod 4)`, `c^((p + 1) / 4)` is a square root of `c`
/// whenever `c` is a quadratic residue.
pub const SECP256K1_SQRT_EXPONENT: [u8; 32] = [
    0x3f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xbf, 0xff, 0xff, 0x0c,
];

// `SECP256K1_SQRT_EXPONENT` as little-endian 64-bit limbs, the form `pow_vartime` takes.
const SQRT_EXPONENT_LIMBS: [u64; 4] = [
    0xffff_ffff_bfff_ff0c,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
    0x3fff_ffff_ffff_ffff,
];

const CURVE_EQUATION_B: u64 = 7;

/// Returns `true` if the big-endian integer `value` is strictly smaller than the curve order.
pub fn is_below_order(value: &[u8; 32]) -> bool {
    // Lexicographic comparison of equal-length big-endian arrays is numeric comparison.
    value < &SECP256K1_N
}

/// Parses a derivation tweak (BIP32 `I_L` or a BIP341 `TapTweak` hash),
/// failing with [`CurveError::InvalidTweak`] unless it is below the curve order.
pub(crate) fn tweak_scalar(hash: &[u8; 32]) -> Result<Scalar, CurveError> {
    Scalar::from_be_bytes(hash).ok_or(CurveError::InvalidTweak)
}

/// An integer modulo the curve order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Scalar(BackendScalar);

impl Scalar {
    /// The additive identity.
    pub const ZERO: Self = Self(BackendScalar::ZERO);

    /// Parses a big-endian integer, returning `None` if it is not smaller than the curve order.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
        Option::from(BackendScalar::from_repr(FieldBytes::from(*bytes))).map(Self)
    }

    /// Parses a private key: a big-endian integer in `[1, n)`.
    pub fn private_key_from_be_bytes(bytes: &[u8; 32]) -> Result<Self, CurveError> {
        Self::from_be_bytes(bytes)
            .filter(|scalar| !scalar.is_zero())
            .ok_or(CurveError::InvalidScalar)
    }

    /// The big-endian encoding.
    pub fn to_be_bytes(self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    /// Whether the scalar is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero().into()
    }

    /// Computes `self * G`.
    pub fn mul_by_generator(&self) -> Point {
        Point(BackendPoint::GENERATOR * self.0)
    }

    pub(crate) fn to_nonzero(self) -> Option<NonZeroScalar> {
        Option::from(NonZeroScalar::new(self.0))
    }
}

impl DefaultIsZeroes for Scalar {}

impl Neg for Scalar {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        Scalar(self.0 + other.0)
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar(self.0 + other.0)
    }
}

impl AddAssign<&Scalar> for Scalar {
    fn add_assign(&mut self, other: &Scalar) {
        self.0 += &other.0;
    }
}

/// A point on secp256k1, possibly the point at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point(BackendPoint);

impl Point {
    /// The generator `G`.
    pub const GENERATOR: Self = Self(BackendPoint::GENERATOR);

    /// The point at infinity.
    pub const IDENTITY: Self = Self(BackendPoint::IDENTITY);

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        self == &Self::IDENTITY
    }

    /// Builds a point from affine coordinates, checking that it lies on the curve.
    pub(crate) fn from_affine_coordinates(x: &[u8; 32], y: &[u8; 32]) -> Result<Self, CurveError> {
        let encoded = EncodedPoint::<Secp256k1>::from_affine_coordinates(&(*x).into(), &(*y).into(), false);
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(|affine| Self(affine.into()))
            .ok_or(CurveError::NotOnCurve)
    }

    /// Returns the affine coordinates, or an error for the point at infinity.
    pub(crate) fn to_affine_coordinates(self) -> Result<([u8; 32], [u8; 32]), CurveError> {
        let encoded = self.0.to_affine().to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Ok(((*x).into(), (*y).into())),
            _ => Err(CurveError::PointAtInfinity),
        }
    }

    /// Unwraps into the point type of the backend crate.
    pub fn to_backend(self) -> k256::ProjectivePoint {
        self.0
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point(self.0 + other.0)
    }
}

/// Computes a square root of `x^3 + 7 (mod p)`, i.e. a `y` such that `(x, y)` lies on the curve.
///
/// The root is found with the `(p + 1) / 4` exponent and then verified explicitly:
/// exponentiation succeeds for non-residues too, producing a value that is not a root.
/// The parity of the returned root is unspecified, see [`select_parity`].
pub(crate) fn y_from_x(x: &[u8; 32]) -> Result<FieldElement, CurveError> {
    let x = Option::<FieldElement>::from(FieldElement::from_bytes(&FieldBytes::from(*x))).ok_or(CurveError::NotOnCurve)?;

    let c = (x.square() * x + FieldElement::from_u64(CURVE_EQUATION_B)).normalize();
    let y = c.pow_vartime(SQRT_EXPONENT_LIMBS).normalize();

    if y.square().normalize().to_bytes() != c.to_bytes() {
        return Err(CurveError::NotOnCurve);
    }
    Ok(y)
}

/// Returns the big-endian encoding of `y` or `p - y`, whichever has the requested parity.
pub(crate) fn select_parity(y: FieldElement, odd: bool) -> [u8; 32] {
    let bytes: [u8; 32] = y.normalize().to_bytes().into();
    if (bytes[31] & 1 == 1) == odd {
        bytes
    } else {
        y.negate(1).normalize().to_bytes().into()
    }
}

#[cfg(test)]
mod tests {
    use rand_core::{OsRng, RngCore};

    use super::{
        is_below_order, select_parity, tweak_scalar, y_from_x, Point, Scalar, SECP256K1_GENERATOR, SECP256K1_N,
        SECP256K1_P,
    };
    use crate::error::CurveError;

    fn random_scalar() -> Scalar {
        let mut bytes = [0u8; 32];
        loop {
            OsRng.fill_bytes(&mut bytes);
            if let Ok(scalar) = Scalar::private_key_from_be_bytes(&bytes) {
                return scalar;
            }
        }
    }

    #[test]
    fn order_bound() {
        let mut below = SECP256K1_N;
        below[31] -= 1;
        assert!(is_below_order(&below));
        assert!(!is_below_order(&SECP256K1_N));
        assert!(!is_below_order(&[0xff; 32]));

        assert!(Scalar::from_be_bytes(&SECP256K1_N).is_none());
        assert_eq!(
            Scalar::private_key_from_be_bytes(&[0u8; 32]),
            Err(CurveError::InvalidScalar)
        );
    }

    #[test]
    fn generator_coordinates() {
        let (x, y) = Point::GENERATOR.to_affine_coordinates().unwrap();
        assert_eq!(x, SECP256K1_GENERATOR[1..33]);
        assert_eq!(y, SECP256K1_GENERATOR[33..]);
    }

    #[test]
    fn identity_has_no_coordinates() {
        assert_eq!(
            Point::IDENTITY.to_affine_coordinates(),
            Err(CurveError::PointAtInfinity)
        );
        assert!(Scalar::ZERO.mul_by_generator().is_identity());
    }

    #[test]
    fn square_root_recovers_y_up_to_sign() {
        for _ in 0..8 {
            let (x, y) = random_scalar().mul_by_generator().to_affine_coordinates().unwrap();
            let root = y_from_x(&x).unwrap();
            let y_is_odd = y[31] & 1 == 1;
            assert_eq!(select_parity(root, y_is_odd), y);
            assert!(Point::from_affine_coordinates(&x, &select_parity(root, !y_is_odd)).is_ok());
        }
    }

    #[test]
    fn rejects_x_without_a_root() {
        // An x-coordinate with no matching point (BIP340 verification vector 5)
        let x: [u8; 32] = hex::decode("eefdea4cdb677750a420fee807eacf21eb9898ae79b9768766e4faa04a2d4a34")
            .unwrap()
            .try_into()
            .unwrap();
        assert!(matches!(y_from_x(&x), Err(CurveError::NotOnCurve)));
        assert!(matches!(y_from_x(&SECP256K1_P), Err(CurveError::NotOnCurve)));
    }

    #[test]
    fn rejects_coordinates_off_the_curve() {
        let (x, mut y) = Point::GENERATOR.to_affine_coordinates().unwrap();
        y[31] ^= 1;
        assert_eq!(Point::from_affine_coordinates(&x, &y), Err(CurveError::NotOnCurve));
    }

    #[test]
    fn scalar_negation_negates_the_point() {
        let scalar = random_scalar();
        assert!((scalar.mul_by_generator() + (-scalar).mul_by_generator()).is_identity());
        assert!((scalar + -scalar).is_zero());
    }

    #[test]
    fn tweaks_must_be_below_the_order() {
        assert_eq!(tweak_scalar(&SECP256K1_N), Err(CurveError::InvalidTweak));
        assert_eq!(tweak_scalar(&[0xff; 32]), Err(CurveError::InvalidTweak));

        let mut largest = SECP256K1_N;
        largest[31] -= 1;
        let tweak = tweak_scalar(&largest).unwrap();
        assert_eq!(tweak.to_be_bytes(), largest);

        let mut one = [0u8; 32];
        one[31] = 1;
        let mut sum = tweak;
        sum += &Scalar::from_be_bytes(&one).unwrap();
        assert!(sum.is_zero());
    }
}
