use digest::{Digest, Update};
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Sha256, Sha512};
use zeroize::Zeroize;

use super::Secret;
use crate::error::Error;

type HmacSha512 = Hmac<Sha512>;

/// A digest object that takes the fixed-width integers and padding used by Bitcoin serialization.
///
/// Implemented for every [`Update`], so the helpers work on `Sha256`, tagged hashes and HMACs alike.
pub trait Chain: Sized {
    /// Hash raw bytes.
    fn chain_raw_bytes(self, bytes: &[u8]) -> Self;

    /// Hash a single byte.
    fn chain_u8(self, value: u8) -> Self {
        self.chain_raw_bytes(&[value])
    }

    /// Hash a big-endian `u16`.
    fn chain_u16_be(self, value: u16) -> Self {
        self.chain_raw_bytes(&value.to_be_bytes())
    }

    /// Hash a big-endian `u32`.
    fn chain_u32_be(self, value: u32) -> Self {
        self.chain_raw_bytes(&value.to_be_bytes())
    }

    /// Hash `value` as a Bitcoin CompactSize integer.
    fn chain_varint(self, value: u64) -> Self {
        match value {
            0..=0xfc => self.chain_u8(value as u8),
            0xfd..=0xffff => self.chain_u8(0xfd).chain_raw_bytes(&(value as u16).to_le_bytes()),
            0x1_0000..=0xffff_ffff => self.chain_u8(0xfe).chain_raw_bytes(&(value as u32).to_le_bytes()),
            _ => self.chain_u8(0xff).chain_raw_bytes(&value.to_le_bytes()),
        }
    }

    /// Hash `count` zero bytes.
    fn chain_zeros(self, count: usize) -> Self {
        const ZEROS: [u8; 8] = [0; 8];
        let mut digest = self;
        for _ in 0..(count >> 3) {
            digest = digest.chain_raw_bytes(&ZEROS);
        }
        for _ in 0..(count & 7) {
            digest = digest.chain_raw_bytes(&[0]);
        }
        digest
    }
}

impl<D: Update> Chain for D {
    fn chain_raw_bytes(mut self, bytes: &[u8]) -> Self {
        self.update(bytes);
        self
    }
}

/// First 4 bytes of `SHA256(SHA256(data))`, the Base58Check checksum.
pub fn checksum(data: &[u8]) -> [u8; 4] {
    let digest: [u8; 32] = Sha256::digest(Sha256::digest(data)).into();
    [digest[0], digest[1], digest[2], digest[3]]
}

/// `RIPEMD160(data)`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// `RIPEMD160(SHA256(data))`.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&Sha256::digest(data))
}

/// The BIP32 fingerprint of a compressed public key: the first 4 bytes of its `hash160`, big-endian.
pub fn fingerprint(compressed_pubkey: &[u8; 33]) -> u32 {
    let hash = hash160(compressed_pubkey);
    u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]])
}

/// `HMAC-SHA512(key, parts[0] ‖ parts[1] ‖ ...)`, split into its left and right 32-byte halves.
///
/// Both halves are returned as secrets and the stack copy of the output is wiped.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<(Secret<[u8; 32]>, Secret<[u8; 32]>), Error> {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key).map_err(|_| Error::Argument("HMAC key length"))?;
    for part in parts {
        Mac::update(&mut mac, part);
    }
    let mut output = mac.finalize().into_bytes();
    let (left_bytes, right_bytes) = output.split_at(32);
    let left = Secret::<[u8; 32]>::init_with_mut(|left| left.copy_from_slice(left_bytes));
    let right = Secret::<[u8; 32]>::init_with_mut(|right| right.copy_from_slice(right_bytes));
    output.as_mut_slice().zeroize();
    Ok((left, right))
}
