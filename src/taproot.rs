//! BIP340 tagged hashes and the BIP341 key-path tweak.

use digest::Digest;
use sha2::Sha256;
use tracing::debug;

use crate::{
    curve::{point_add, scalar_mult_generator, select_parity, tweak_scalar, y_from_x, Scalar, UncompressedKey},
    error::CurveError,
    tools::Secret,
};

/// The tag of the BIP341 key-path tweak.
pub const TAP_TWEAK_TAG: &[u8] = b"TapTweak";

/// Returns a hasher primed with `SHA256(tag) ‖ SHA256(tag)`.
///
/// Feed it the message (see [`Chain`](crate::Chain) for integer encodings) and finalize to get the tagged hash.
pub fn tagged_hash_init(tag: &[u8]) -> Sha256 {
    let tag_hash = Sha256::digest(tag);
    Sha256::new().chain_update(tag_hash).chain_update(tag_hash)
}

/// `SHA256(SHA256(tag) ‖ SHA256(tag) ‖ data)`.
pub fn tagged_hash(tag: &[u8], data: &[u8]) -> [u8; 32] {
    tagged_hash_init(tag).chain_update(data).finalize().into()
}

/// Returns the point with x-coordinate `x` and an even `y`.
///
/// Unlike [`decompress`](crate::decompress) there is no parity to honor: x-only keys always denote the even point.
pub fn lift_x(x: &[u8; 32]) -> Result<UncompressedKey, CurveError> {
    let y = y_from_x(x)?;
    Ok(UncompressedKey::from_coordinates(x, &select_parity(y, false)))
}

fn tap_tweak(x_only_pubkey: &[u8; 32]) -> Result<Scalar, CurveError> {
    tweak_scalar(&tagged_hash(TAP_TWEAK_TAG, x_only_pubkey)).map_err(|err| {
        debug!("TapTweak hash is not below the curve order");
        err
    })
}

/// Tweaks an x-only internal key with its own `TapTweak` hash (no script tree).
///
/// Returns the x-coordinate of the output key and whether its `y` is odd.
pub fn tweak_pubkey(x_only_pubkey: &[u8; 32]) -> Result<([u8; 32], bool), CurveError> {
    let tweak = tap_tweak(x_only_pubkey)?;
    let internal_key = lift_x(x_only_pubkey)?;
    let tweak_point = scalar_mult_generator(&tweak.to_be_bytes())?;
    let output_key = point_add(&internal_key, &tweak_point)?;
    Ok((output_key.x(), output_key.is_y_odd()))
}

/// Tweaks a private key so that it signs for the output key [`tweak_pubkey`] produces
/// from the x-coordinate of its public key.
///
/// The key is negated first if its public key has an odd `y`.
pub fn tweak_seckey(seckey: &Secret<[u8; 32]>) -> Result<Secret<[u8; 32]>, CurveError> {
    let mut scalar = Secret::try_init_with(|| Scalar::private_key_from_be_bytes(seckey.expose_secret()))?;
    let pubkey = UncompressedKey::from_point(&scalar.expose_secret().mul_by_generator())?;
    if pubkey.is_y_odd() {
        scalar = -scalar;
    }

    scalar += &tap_tweak(&pubkey.x())?;
    if scalar.expose_secret().is_zero() {
        debug!("Tweaked private key is zero");
        return Err(CurveError::InvalidTweak);
    }
    Ok(Secret::init_with(|| scalar.expose_secret().to_be_bytes()))
}
