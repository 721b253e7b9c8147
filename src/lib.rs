#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    missing_docs,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::indexing_slicing))]

/*!
## Features

`dev`: exposes [`dev::SoftwareSeed`], a seed oracle that keeps the seed in memory. For tests only.
*/

extern crate alloc;

mod address;
mod bip32;
mod curve;
mod error;
mod keychain;
mod oracle;
mod taproot;
mod tools;

pub mod params;

#[cfg(any(test, feature = "dev"))]
pub mod dev;

pub use address::{encode_address, encode_base58check};
pub use bip32::{
    ckd_pub, derive_private, derive_public, extended_pubkey_at_path, validate_serialized_extended_pubkey, Bip32Path,
    SerializedExtendedKey, ValidationResult,
};
pub use curve::{
    compress, decompress, is_below_order, point_add, scalar_mult_generator, CompressedKey, Point, RecoverableSignature,
    Scalar, UncompressedKey, SECP256K1_GENERATOR, SECP256K1_N, SECP256K1_P, SECP256K1_SQRT_EXPONENT,
};
pub use error::{CurveError, Error, ExtendedKeyError, HardwareError};
pub use keychain::Keychain;
pub use oracle::{ChainCode, DerivedNode, SeedOracle};
pub use taproot::{lift_x, tagged_hash, tagged_hash_init, tweak_pubkey, tweak_seckey, TAP_TWEAK_TAG};
pub use tools::{
    hashing::{checksum, fingerprint, hash160, ripemd160, Chain},
    Secret,
};
