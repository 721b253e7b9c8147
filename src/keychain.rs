use alloc::string::String;

use tracing::{debug, trace};

use crate::{
    bip32::{self, SerializedExtendedKey},
    curve::{CompressedKey, RecoverableSignature, Scalar},
    error::{Error, HardwareError},
    oracle::{ChainCode, SeedOracle},
    params::MAX_SLIP21_LABEL_LENGTH,
    tools::{hashing::fingerprint, Secret},
};

/// The key operations a signing command needs, on top of a seed-derivation oracle.
///
/// Every call derives what it needs from scratch: nothing is cached between calls,
/// and private keys are wiped before the call returns.
#[derive(Debug, Clone)]
pub struct Keychain<O: SeedOracle> {
    oracle: O,
}

impl<O: SeedOracle> Keychain<O> {
    /// Creates a keychain over the given oracle.
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Returns the underlying oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Derives the private key and chain code at `path`.
    pub fn derive_private(&self, path: &[u32]) -> Result<(Secret<Scalar>, Secret<ChainCode>), Error> {
        bip32::derive_private(&self.oracle, path)
    }

    /// Derives the compressed public key and chain code at `path`.
    pub fn derive_compressed_pubkey_at_path(&self, path: &[u32]) -> Result<(CompressedKey, ChainCode), Error> {
        bip32::derive_public(&self.oracle, path)
    }

    /// Returns the extended public key record at `path` with the given version bytes.
    pub fn extended_pubkey_at_path(&self, path: &[u32], version: u32) -> Result<SerializedExtendedKey, Error> {
        bip32::extended_pubkey_at_path(&self.oracle, path, version)
    }

    /// Returns the Base58Check-encoded extended public key at `path`.
    pub fn get_serialized_extended_pubkey_at_path(&self, path: &[u32], version: u32) -> Result<String, Error> {
        Ok(self.extended_pubkey_at_path(path, version)?.to_base58())
    }

    /// The fingerprint of the master public key.
    pub fn master_key_fingerprint(&self) -> Result<u32, Error> {
        let (master_pubkey, _) = self.derive_compressed_pubkey_at_path(&[])?;
        Ok(fingerprint(master_pubkey.as_bytes()))
    }

    /// Signs a 32-byte hash with the key at `path`.
    pub fn sign_hash_with_key_at_path(&self, path: &[u32], hash: &[u8; 32]) -> Result<RecoverableSignature, Error> {
        trace!("Signing with the key at depth {}", path.len());
        let (private_key, _) = self.derive_private(path)?;
        Ok(RecoverableSignature::sign_prehash(&private_key, hash)?)
    }

    /// Derives the SLIP-0021 key for `label` (including its leading zero byte).
    pub fn derive_symmetric_key(&self, label: &[u8]) -> Result<Secret<[u8; 32]>, Error> {
        if label.len() > MAX_SLIP21_LABEL_LENGTH {
            return Err(Error::Argument("SLIP-0021 label must be at most 32 bytes long"));
        }
        self.oracle.derive_slip21(label).map_err(|err: HardwareError| {
            debug!("Seed oracle failed: {err}");
            err.into()
        })
    }
}
