use crate::{error::HardwareError, tools::Secret};

/// A BIP32 chain code.
pub type ChainCode = [u8; 32];

/// The private node the oracle returns for a derivation path.
///
/// Both halves are secret: the chain code of a node together with any non-hardened
/// child private key is enough to recover the node's private key.
#[derive(Debug, Clone)]
pub struct DerivedNode {
    /// The raw private key bytes, not yet validated as a scalar.
    pub private_key: Secret<[u8; 32]>,
    /// The chain code of the node.
    pub chain_code: Secret<ChainCode>,
}

/// The protected seed-derivation capability.
///
/// Implementations hold the master secret behind a boundary this crate never crosses:
/// only derived nodes and SLIP-0021 keys come out. Calls are blocking and cannot be
/// cancelled; a call either answers or reports a [`HardwareError`].
pub trait SeedOracle {
    /// Derives the BIP32 private node at `path` (indices `>= 2^31` are hardened).
    fn derive(&self, path: &[u32]) -> Result<DerivedNode, HardwareError>;

    /// Derives the SLIP-0021 symmetric key for `label`.
    fn derive_slip21(&self, label: &[u8]) -> Result<Secret<[u8; 32]>, HardwareError>;
}

impl<T: SeedOracle + ?Sized> SeedOracle for &T {
    fn derive(&self, path: &[u32]) -> Result<DerivedNode, HardwareError> {
        (**self).derive(path)
    }

    fn derive_slip21(&self, label: &[u8]) -> Result<Secret<[u8; 32]>, HardwareError> {
        (**self).derive_slip21(label)
    }
}
