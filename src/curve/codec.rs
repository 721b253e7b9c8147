use alloc::boxed::Box;
use core::fmt;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_encoded_bytes::{Hex, SliceLike};

use super::arithmetic::{select_parity, y_from_x, Point, Scalar};
use crate::{error::CurveError, tools::Secret};

const UNCOMPRESSED_TAG: u8 = 0x04;
const EVEN_PREFIX: u8 = 0x02;
const ODD_PREFIX: u8 = 0x03;

/// A public key in the 33-byte compressed SEC1 form: a parity prefix (`0x02` for even `y`,
/// `0x03` for odd `y`) followed by the big-endian `x` coordinate.
///
/// Construction does not validate the bytes; [`decompress`] does.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedKey([u8; 33]);

impl CompressedKey {
    /// The length of the encoding in bytes.
    pub const LEN: usize = 33;

    /// Wraps raw bytes without validating them.
    pub const fn from_bytes(bytes: [u8; 33]) -> Self {
        Self(bytes)
    }

    /// Wraps raw bytes, failing only if the length is wrong.
    pub fn try_from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    /// The raw 33 bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// The parity prefix byte.
    pub fn prefix(&self) -> u8 {
        self.0[0]
    }

    /// The big-endian `x` coordinate.
    pub fn x(&self) -> [u8; 32] {
        let mut x = [0u8; 32];
        x.copy_from_slice(self.0.split_at(1).1);
        x
    }
}

impl fmt::Debug for CompressedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompressedKey(")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl Serialize for CompressedKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SliceLike::<Hex>::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for CompressedKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Box<[u8]> = SliceLike::<Hex>::deserialize(deserializer)?;
        let key = Self::try_from_slice(&bytes).ok_or_else(|| D::Error::custom("Invalid compressed key length"))?;
        decompress(&key).map_err(D::Error::custom)?;
        Ok(key)
    }
}

/// A point in the 65-byte uncompressed SEC1 form `0x04 ‖ x ‖ y`,
/// the internal representation the curve operations work on.
///
/// Construction from raw bytes does not validate them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct UncompressedKey([u8; 65]);

impl UncompressedKey {
    /// The length of the encoding in bytes.
    pub const LEN: usize = 65;

    /// Wraps raw bytes without validating them.
    pub const fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Assembles `0x04 ‖ x ‖ y`.
    pub fn from_coordinates(x: &[u8; 32], y: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 65];
        let (tag, coordinates) = bytes.split_at_mut(1);
        let (x_out, y_out) = coordinates.split_at_mut(32);
        tag.copy_from_slice(&[UNCOMPRESSED_TAG]);
        x_out.copy_from_slice(x);
        y_out.copy_from_slice(y);
        Self(bytes)
    }

    /// The raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The leading tag byte, `0x04` for a well-formed key.
    pub fn tag(&self) -> u8 {
        self.0[0]
    }

    /// The big-endian `x` coordinate.
    pub fn x(&self) -> [u8; 32] {
        self.coordinates().0
    }

    /// The big-endian `y` coordinate.
    pub fn y(&self) -> [u8; 32] {
        self.coordinates().1
    }

    /// Whether `y` is odd.
    pub fn is_y_odd(&self) -> bool {
        self.0[64] & 1 == 1
    }

    fn coordinates(&self) -> ([u8; 32], [u8; 32]) {
        let (x_bytes, y_bytes) = self.0.split_at(1).1.split_at(32);
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(x_bytes);
        y.copy_from_slice(y_bytes);
        (x, y)
    }

    pub(crate) fn from_point(point: &Point) -> Result<Self, CurveError> {
        let (x, y) = point.to_affine_coordinates()?;
        Ok(Self::from_coordinates(&x, &y))
    }

    pub(crate) fn to_point(self) -> Result<Point, CurveError> {
        if self.tag() != UNCOMPRESSED_TAG {
            return Err(CurveError::InvalidPointEncoding);
        }
        let (x, y) = self.coordinates();
        Point::from_affine_coordinates(&x, &y)
    }
}

impl fmt::Debug for UncompressedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UncompressedKey(")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// Recovers the full point from a compressed key, honoring the parity carried by its prefix.
pub fn decompress(compressed: &CompressedKey) -> Result<UncompressedKey, CurveError> {
    let prefix = compressed.prefix();
    if prefix != EVEN_PREFIX && prefix != ODD_PREFIX {
        return Err(CurveError::InvalidPrefix);
    }
    let x = compressed.x();
    let y = y_from_x(&x)?;
    Ok(UncompressedKey::from_coordinates(&x, &select_parity(y, prefix == ODD_PREFIX)))
}

/// Compresses a point given in the uncompressed form.
///
/// Only the encoding is checked, not whether the point lies on the curve.
pub fn compress(uncompressed: &UncompressedKey) -> Result<CompressedKey, CurveError> {
    if uncompressed.tag() != UNCOMPRESSED_TAG {
        return Err(CurveError::InvalidPointEncoding);
    }
    let mut bytes = [0u8; 33];
    let (prefix, x) = bytes.split_at_mut(1);
    prefix.copy_from_slice(&[if uncompressed.is_y_odd() { ODD_PREFIX } else { EVEN_PREFIX }]);
    x.copy_from_slice(&uncompressed.x());
    Ok(CompressedKey(bytes))
}

/// Adds two points. The identity is not a valid result: no child key or tweaked key can be it.
pub fn point_add(p: &UncompressedKey, q: &UncompressedKey) -> Result<UncompressedKey, CurveError> {
    let sum = p.to_point()? + q.to_point()?;
    UncompressedKey::from_point(&sum)
}

/// Computes `k * G`.
///
/// Fails if `k` is not smaller than the curve order, or if `k` is zero (the result would be the identity).
pub fn scalar_mult_generator(k: &[u8; 32]) -> Result<UncompressedKey, CurveError> {
    let scalar = Secret::try_init_with(|| Scalar::from_be_bytes(k).ok_or(CurveError::InvalidScalar))?;
    UncompressedKey::from_point(&scalar.expose_secret().mul_by_generator())
}
