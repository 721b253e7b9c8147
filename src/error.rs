/// Failures of the curve arithmetic and of public child derivation.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// The coordinates do not describe a point on secp256k1.
    NotOnCurve,
    /// The compressed key prefix is neither `0x02` nor `0x03`.
    InvalidPrefix,
    /// The point is not in the uncompressed SEC1 form (`0x04 ‖ x ‖ y`).
    InvalidPointEncoding,
    /// The result is the point at infinity.
    PointAtInfinity,
    /// The scalar is zero or not smaller than the curve order.
    InvalidScalar,
    /// The derived tweak is not smaller than the curve order.
    InvalidTweak,
    /// Hardened children cannot be derived from a public parent.
    HardenedIndexRejected,
    /// The parent key is already at the maximum derivation depth.
    DepthOverflow,
    /// ECDSA signing failed.
    SigningFailed,
}

/// Reasons a serialized extended public key is rejected.
///
/// The variants are listed in the order the checks are performed.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKeyError {
    /// Invalid function argument
    InvalidArgument,
    /// Invalid Base58 encoding
    InvalidBase58Code,
    /// Invalid checksum
    InvalidChecksum,
    /// Invalid version bytes
    InvalidVersion,
    /// Invalid depth (derivation level)
    InvalidDepth,
    /// Invalid child number
    InvalidChildNumber,
    /// Invalid parent's key fingerprint
    InvalidParentFingerprint,
    /// Invalid public key prefix
    InvalidPrefix,
}

impl ExtendedKeyError {
    /// The status code reported to the host for this failure (`0` is reserved for a valid key).
    pub fn code(&self) -> i8 {
        match self {
            Self::InvalidArgument => -1,
            Self::InvalidBase58Code => -2,
            Self::InvalidChecksum => -3,
            Self::InvalidVersion => -4,
            Self::InvalidDepth => -5,
            Self::InvalidChildNumber => -6,
            Self::InvalidParentFingerprint => -7,
            Self::InvalidPrefix => -8,
        }
    }
}

/// Failures reported at the boundary of the protected seed-derivation oracle.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The oracle refused the derivation request.
    Refused,
    /// The oracle returned material that is not a valid key.
    Fault,
}

/// The top-level error type of the crate.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Malformed argument: {0}
    Argument(&'static str),
    /// Base58 encoding failed
    Encoding,
    /// Curve arithmetic failed: {0}
    Curve(CurveError),
    /// Extended public key rejected: {0}
    ExtendedKey(ExtendedKeyError),
    /// Seed-derivation oracle failure: {0}
    Hardware(HardwareError),
}

impl From<CurveError> for Error {
    fn from(error: CurveError) -> Self {
        Self::Curve(error)
    }
}

impl From<ExtendedKeyError> for Error {
    fn from(error: ExtendedKeyError) -> Self {
        Self::ExtendedKey(error)
    }
}

impl From<HardwareError> for Error {
    fn from(error: HardwareError) -> Self {
        Self::Hardware(error)
    }
}

impl core::error::Error for CurveError {}
impl core::error::Error for ExtendedKeyError {}
impl core::error::Error for HardwareError {}
impl core::error::Error for Error {}
