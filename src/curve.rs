//! This module is an adapter to the ECC backend.
//! Everything that touches `k256` types lives here; the rest of the crate
//! works with byte encodings and the wrappers defined below.

mod arithmetic;
mod codec;
mod ecdsa;

pub use arithmetic::{is_below_order, Point, Scalar, SECP256K1_GENERATOR, SECP256K1_N, SECP256K1_P, SECP256K1_SQRT_EXPONENT};
pub use codec::{compress, decompress, point_add, scalar_mult_generator, CompressedKey, UncompressedKey};
pub use ecdsa::RecoverableSignature;

pub(crate) use arithmetic::{select_parity, tweak_scalar, y_from_x};
