use alloc::{string::String, vec::Vec};

use crate::tools::hashing::checksum;

/// Base58Check: `payload ‖ checksum(payload)`, Base58-encoded.
pub fn encode_base58check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    bs58::encode(data).into_string()
}

/// Encodes a legacy (P2PKH or P2SH) address for a 20-byte hash.
///
/// The version takes as few big-endian bytes as it fits in: one, two or four.
pub fn encode_address(hash: &[u8; 20], version: u32) -> String {
    let version_bytes = version.to_be_bytes();
    let version_len = match version {
        0..=0xff => 1,
        0x100..=0xffff => 2,
        _ => 4,
    };
    let (_, version_bytes) = version_bytes.split_at(4 - version_len);

    let mut payload = Vec::with_capacity(version_len + hash.len());
    payload.extend_from_slice(version_bytes);
    payload.extend_from_slice(hash);
    encode_base58check(&payload)
}
