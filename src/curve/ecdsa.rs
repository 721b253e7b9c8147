use k256::ecdsa::{DerSignature, RecoveryId, Signature as BackendSignature, SigningKey};

use super::arithmetic::Scalar;
use crate::{error::CurveError, tools::Secret};

/// A wrapper for a signature and public key recovery info.
#[derive(Debug, Clone, Copy)]
pub struct RecoverableSignature {
    signature: BackendSignature,
    recovery_id: RecoveryId,
}

impl RecoverableSignature {
    /// Signs a 32-byte message hash with deterministic (RFC6979) ECDSA.
    ///
    /// The `s` component is normalized to the lower half of the order.
    pub(crate) fn sign_prehash(secret_key: &Secret<Scalar>, prehash: &[u8; 32]) -> Result<Self, CurveError> {
        let nonzero = secret_key
            .expose_secret()
            .to_nonzero()
            .ok_or(CurveError::InvalidScalar)?;
        // `SigningKey` zeroizes itself on drop.
        let signing_key = SigningKey::from(nonzero);
        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(prehash)
            .map_err(|_| CurveError::SigningFailed)?;
        Ok(Self {
            signature,
            recovery_id,
        })
    }

    /// The DER encoding of the signature.
    pub fn to_der(&self) -> DerSignature {
        self.signature.to_der()
    }

    /// Whether the `y` coordinate of the nonce point `R` is odd.
    pub fn is_y_odd(&self) -> bool {
        self.recovery_id.is_y_odd()
    }

    /// Unwraps into the signature and recovery info objects from the backend crate.
    pub fn to_backend(self) -> (BackendSignature, RecoveryId) {
        (self.signature, self.recovery_id)
    }
}
