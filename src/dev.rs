//! A software stand-in for the protected seed-derivation oracle, for tests and tooling.
//!
//! The seed is kept in memory, so this must never be used where the seed has to stay protected.

use alloc::vec::Vec;

use tracing::trace;

use crate::{
    bip32::Bip32Path,
    curve::{compress, scalar_mult_generator, tweak_scalar, Scalar},
    error::HardwareError,
    oracle::{DerivedNode, SeedOracle},
    tools::{hashing::hmac_sha512, Secret},
};

const BIP32_SEED_KEY: &[u8] = b"Bitcoin seed";
const SLIP21_SEED_KEY: &[u8] = b"Symmetric key seed";

/// A [`SeedOracle`] deriving BIP32 and SLIP-0021 keys from a raw seed held in memory.
#[derive(Debug, Clone)]
pub struct SoftwareSeed {
    seed: Secret<Vec<u8>>,
}

impl SoftwareSeed {
    /// Wraps a copy of `seed`.
    pub fn new(seed: &[u8]) -> Self {
        Self {
            seed: Secret::init_with(|| seed.to_vec()),
        }
    }

    fn master_node(&self) -> Result<(Secret<[u8; 32]>, Secret<[u8; 32]>), HardwareError> {
        let (private_key, chain_code) =
            hmac_sha512(BIP32_SEED_KEY, &[self.seed.expose_secret().as_slice()]).map_err(|_| HardwareError::Fault)?;
        Scalar::private_key_from_be_bytes(private_key.expose_secret()).map_err(|_| HardwareError::Fault)?;
        Ok((private_key, chain_code))
    }
}

// `parse256(I_L) + k_par (mod n)`, rejecting an out-of-range `I_L` and a zero child.
fn child_private_key(parent: &Secret<[u8; 32]>, tweak: &Secret<[u8; 32]>) -> Result<Secret<[u8; 32]>, HardwareError> {
    let mut child = Secret::try_init_with(|| Scalar::private_key_from_be_bytes(parent.expose_secret()))
        .map_err(|_| HardwareError::Fault)?;
    let tweak = Secret::try_init_with(|| tweak_scalar(tweak.expose_secret())).map_err(|_| HardwareError::Fault)?;
    child += &tweak;
    if child.expose_secret().is_zero() {
        return Err(HardwareError::Fault);
    }
    Ok(Secret::init_with(|| child.expose_secret().to_be_bytes()))
}

impl SeedOracle for SoftwareSeed {
    fn derive(&self, path: &[u32]) -> Result<DerivedNode, HardwareError> {
        let (mut private_key, mut chain_code) = self.master_node()?;

        for &index in path {
            trace!("Private derivation step {index:#x}");
            let index_bytes = index.to_be_bytes();
            let (tweak, child_chain_code) = if Bip32Path::is_hardened(index) {
                hmac_sha512(
                    chain_code.expose_secret(),
                    &[[0u8].as_slice(), private_key.expose_secret().as_slice(), index_bytes.as_slice()],
                )
            } else {
                let pubkey = scalar_mult_generator(private_key.expose_secret())
                    .and_then(|point| compress(&point))
                    .map_err(|_| HardwareError::Fault)?;
                hmac_sha512(chain_code.expose_secret(), &[pubkey.as_bytes().as_slice(), index_bytes.as_slice()])
            }
            .map_err(|_| HardwareError::Fault)?;

            private_key = child_private_key(&private_key, &tweak)?;
            chain_code = child_chain_code;
        }

        Ok(DerivedNode {
            private_key,
            chain_code,
        })
    }

    /// The label is the full SLIP-0021 label, including its leading zero byte.
    fn derive_slip21(&self, label: &[u8]) -> Result<Secret<[u8; 32]>, HardwareError> {
        let (master_derivation_key, _) =
            hmac_sha512(SLIP21_SEED_KEY, &[self.seed.expose_secret().as_slice()]).map_err(|_| HardwareError::Fault)?;
        let (_, key) = hmac_sha512(master_derivation_key.expose_secret(), &[label]).map_err(|_| HardwareError::Fault)?;
        Ok(key)
    }
}
