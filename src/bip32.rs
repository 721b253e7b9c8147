//! BIP32 hierarchical derivation: private derivation through the seed oracle,
//! public-parent to public-child derivation, and the extended public key record.

mod extended_key;
mod path;

use tracing::{debug, trace};

pub use extended_key::{validate_serialized_extended_pubkey, SerializedExtendedKey, ValidationResult};
pub use path::Bip32Path;

use crate::{
    curve::{compress, decompress, point_add, scalar_mult_generator, tweak_scalar, CompressedKey, Scalar, UncompressedKey},
    error::{CurveError, Error, HardwareError},
    oracle::{ChainCode, SeedOracle},
    tools::{
        hashing::{fingerprint, hmac_sha512},
        Secret,
    },
};

/// Derives the private key and chain code at `path` through the oracle.
///
/// The oracle's raw output is validated as a private key; material that is zero or not
/// below the curve order is reported as [`HardwareError::Fault`].
pub fn derive_private<O: SeedOracle>(oracle: &O, path: &[u32]) -> Result<(Secret<Scalar>, Secret<ChainCode>), Error> {
    trace!("Deriving a private node at depth {}", path.len());
    let node = oracle.derive(path).inspect_err(|err| debug!("Seed oracle failed: {err}"))?;

    let private_key = Secret::try_init_with(|| Scalar::private_key_from_be_bytes(node.private_key.expose_secret()))
        .map_err(|_| {
            debug!("Seed oracle returned an invalid private key");
            HardwareError::Fault
        })?;
    Ok((private_key, node.chain_code))
}

/// Derives the compressed public key and the chain code at `path`.
pub fn derive_public<O: SeedOracle>(oracle: &O, path: &[u32]) -> Result<(CompressedKey, ChainCode), Error> {
    let (private_key, chain_code) = derive_private(oracle, path)?;
    let point = UncompressedKey::from_point(&private_key.expose_secret().mul_by_generator())?;
    Ok((compress(&point)?, *chain_code.expose_secret()))
}

/// Builds the extended public key record for the node at `path`.
///
/// The parent fingerprint and the child number come from the parent path and the last step;
/// both are zero for the master key.
pub fn extended_pubkey_at_path<O: SeedOracle>(
    oracle: &O,
    path: &[u32],
    version: u32,
) -> Result<SerializedExtendedKey, Error> {
    let depth = u8::try_from(path.len()).map_err(|_| Error::Argument("derivation path is too long"))?;

    let (parent_fingerprint, child_number) = match path.split_last() {
        Some((&child_number, parent_path)) => {
            let (parent_pubkey, _) = derive_public(oracle, parent_path)?;
            (fingerprint(parent_pubkey.as_bytes()), child_number)
        }
        None => (0, 0),
    };
    let (compressed_pubkey, chain_code) = derive_public(oracle, path)?;

    Ok(SerializedExtendedKey {
        version,
        depth,
        parent_fingerprint,
        child_number,
        chain_code,
        compressed_pubkey,
    })
}

/// Public parent key to public child key derivation (CKDpub).
///
/// No private material is involved, so only non-hardened children can be derived.
pub fn ckd_pub(parent: &SerializedExtendedKey, index: u32) -> Result<SerializedExtendedKey, Error> {
    if Bip32Path::is_hardened(index) {
        debug!("Refusing to derive hardened child {index:#x} from a public key");
        return Err(CurveError::HardenedIndexRejected.into());
    }
    let depth = parent.depth.checked_add(1).ok_or_else(|| {
        debug!("Parent key is at the maximum depth");
        CurveError::DepthOverflow
    })?;
    trace!("Deriving public child {index} at depth {depth}");

    let parent_pubkey = parent.compressed_pubkey.as_bytes();
    let (tweak, chain_code) = hmac_sha512(&parent.chain_code, &[parent_pubkey.as_slice(), index.to_be_bytes().as_slice()])?;
    let tweak = tweak_scalar(tweak.expose_secret()).map_err(|err| {
        debug!("Child {index} has an out-of-range tweak");
        err
    })?;

    let tweak_point = scalar_mult_generator(&tweak.to_be_bytes())?;
    let child_point = point_add(&tweak_point, &decompress(&parent.compressed_pubkey)?)?;

    Ok(SerializedExtendedKey {
        version: parent.version,
        depth,
        parent_fingerprint: fingerprint(parent_pubkey),
        child_number: index,
        chain_code: *chain_code.expose_secret(),
        compressed_pubkey: compress(&child_point)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{ckd_pub, derive_private, derive_public, extended_pubkey_at_path, SerializedExtendedKey};
    use crate::{
        curve::CompressedKey,
        dev::SoftwareSeed,
        error::{CurveError, Error, HardwareError},
        oracle::{DerivedNode, SeedOracle},
        params::BITCOIN,
        tools::Secret,
    };

    const H: u32 = 0x8000_0000;

    fn vector_1_seed() -> SoftwareSeed {
        SoftwareSeed::new(&hex::decode("000102030405060708090a0b0c0d0e0f").unwrap())
    }

    struct ZeroKeyOracle;

    impl SeedOracle for ZeroKeyOracle {
        fn derive(&self, _path: &[u32]) -> Result<DerivedNode, HardwareError> {
            Ok(DerivedNode {
                private_key: Secret::init_with(|| [0u8; 32]),
                chain_code: Secret::init_with(|| [1u8; 32]),
            })
        }

        fn derive_slip21(&self, _label: &[u8]) -> Result<Secret<[u8; 32]>, HardwareError> {
            Err(HardwareError::Refused)
        }
    }

    #[test]
    fn master_node_of_vector_1() {
        let (private_key, chain_code) = derive_private(&vector_1_seed(), &[]).unwrap();
        assert_eq!(
            hex::encode(private_key.expose_secret().to_be_bytes()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(chain_code.expose_secret()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn invalid_oracle_output_is_a_fault() {
        assert_eq!(
            derive_private(&ZeroKeyOracle, &[]).map(|_| ()),
            Err(Error::Hardware(HardwareError::Fault))
        );
    }

    #[test]
    fn public_derivation_matches_private_derivation() {
        let oracle = vector_1_seed();
        let parent = extended_pubkey_at_path(&oracle, &[H, 1], BITCOIN.bip32_pubkey_version).unwrap();
        let child = ckd_pub(&parent, 7).unwrap();
        let expected = extended_pubkey_at_path(&oracle, &[H, 1, 7], BITCOIN.bip32_pubkey_version).unwrap();
        assert_eq!(child, expected);
    }

    #[test]
    fn hardened_children_are_rejected() {
        let parent = extended_pubkey_at_path(&vector_1_seed(), &[], BITCOIN.bip32_pubkey_version).unwrap();
        assert_eq!(
            ckd_pub(&parent, H),
            Err(Error::Curve(CurveError::HardenedIndexRejected))
        );
        assert_eq!(
            ckd_pub(&parent, u32::MAX),
            Err(Error::Curve(CurveError::HardenedIndexRejected))
        );
    }

    #[test]
    fn depth_is_capped() {
        let (compressed_pubkey, chain_code) = derive_public(&vector_1_seed(), &[]).unwrap();
        let parent = SerializedExtendedKey {
            version: BITCOIN.bip32_pubkey_version,
            depth: 255,
            parent_fingerprint: 1,
            child_number: 1,
            chain_code,
            compressed_pubkey,
        };
        assert_eq!(ckd_pub(&parent, 0), Err(Error::Curve(CurveError::DepthOverflow)));

        let parent = SerializedExtendedKey { depth: 254, ..parent };
        assert_eq!(ckd_pub(&parent, 0).unwrap().depth, 255);
    }

    #[test]
    fn parent_key_must_be_on_the_curve() {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x04;
        let parent = SerializedExtendedKey {
            version: BITCOIN.bip32_pubkey_version,
            depth: 0,
            parent_fingerprint: 0,
            child_number: 0,
            chain_code: [7u8; 32],
            compressed_pubkey: CompressedKey::from_bytes(bytes),
        };
        assert_eq!(ckd_pub(&parent, 0), Err(Error::Curve(CurveError::InvalidPrefix)));
    }
}
