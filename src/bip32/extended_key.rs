use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    address::encode_base58check,
    curve::CompressedKey,
    error::ExtendedKeyError,
    oracle::ChainCode,
    params::{MAX_BIP32_PATH_STEPS, MAX_SERIALIZED_PUBKEY_LENGTH},
    tools::hashing::checksum,
};

const RECORD_LEN: usize = 78;
const CHECKSUM_LEN: usize = 4;

/// The outcome of [`validate_serialized_extended_pubkey`]; `Ok(())` means the key is valid.
pub type ValidationResult = Result<(), ExtendedKeyError>;

/// A BIP32 extended public key: the fixed 78-byte record
/// `version ‖ depth ‖ parent fingerprint ‖ child number ‖ chain code ‖ compressed key`.
///
/// Decoding through [`FromStr`] checks the Base58Check framing and the key prefix;
/// use [`validate_serialized_extended_pubkey`] to also check the version and the position in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializedExtendedKey {
    /// Version bytes, identifying the network and the key type.
    pub version: u32,
    /// The number of derivation steps from the master key.
    pub depth: u8,
    /// Fingerprint of the parent's public key, zero for the master key.
    pub parent_fingerprint: u32,
    /// The index of the last derivation step, zero for the master key.
    pub child_number: u32,
    /// Extra entropy mixed into child derivation.
    pub chain_code: ChainCode,
    /// The public key, `0x02`/`0x03` prefix followed by `x`.
    pub compressed_pubkey: CompressedKey,
}

impl SerializedExtendedKey {
    /// The length of the serialized record, without the checksum.
    pub const LEN: usize = RECORD_LEN;

    /// Whether this is a master key.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Serializes the record, without the checksum.
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut bytes = [0u8; RECORD_LEN];
        let fields: [&[u8]; 6] = [
            &self.version.to_be_bytes(),
            &[self.depth],
            &self.parent_fingerprint.to_be_bytes(),
            &self.child_number.to_be_bytes(),
            &self.chain_code,
            self.compressed_pubkey.as_bytes(),
        ];
        let mut cursor = bytes.as_mut_slice();
        for field in fields {
            let (head, tail) = core::mem::take(&mut cursor).split_at_mut(field.len());
            head.copy_from_slice(field);
            cursor = tail;
        }
        bytes
    }

    /// Parses the 78-byte record. The key prefix is not checked.
    pub fn from_bytes(bytes: &[u8; RECORD_LEN]) -> Self {
        let (version, rest) = split_chunk::<4>(bytes);
        let (depth, rest) = split_chunk::<1>(rest);
        let (parent_fingerprint, rest) = split_chunk::<4>(rest);
        let (child_number, rest) = split_chunk::<4>(rest);
        let (chain_code, rest) = split_chunk::<32>(rest);
        let (compressed_pubkey, _) = split_chunk::<33>(rest);
        Self {
            version: u32::from_be_bytes(version),
            depth: u8::from_be_bytes(depth),
            parent_fingerprint: u32::from_be_bytes(parent_fingerprint),
            child_number: u32::from_be_bytes(child_number),
            chain_code,
            compressed_pubkey: CompressedKey::from_bytes(compressed_pubkey),
        }
    }

    /// Base58Check encoding of the record.
    pub fn to_base58(&self) -> String {
        encode_base58check(&self.to_bytes())
    }

    /// Decodes the Base58Check string and verifies its checksum.
    fn decode_checked(text: &str) -> Result<Self, ExtendedKeyError> {
        if text.is_empty() || text.len() > MAX_SERIALIZED_PUBKEY_LENGTH {
            return Err(ExtendedKeyError::InvalidArgument);
        }
        let decoded: Vec<u8> = bs58::decode(text)
            .into_vec()
            .map_err(|_| ExtendedKeyError::InvalidBase58Code)?;
        let (record, expected_checksum) = decoded
            .split_last_chunk::<CHECKSUM_LEN>()
            .ok_or(ExtendedKeyError::InvalidBase58Code)?;
        let record: &[u8; RECORD_LEN] = record.try_into().map_err(|_| ExtendedKeyError::InvalidBase58Code)?;
        if &checksum(record) != expected_checksum {
            return Err(ExtendedKeyError::InvalidChecksum);
        }
        Ok(Self::from_bytes(record))
    }

    fn check_prefix(&self) -> ValidationResult {
        match self.compressed_pubkey.prefix() {
            0x02 | 0x03 => Ok(()),
            _ => Err(ExtendedKeyError::InvalidPrefix),
        }
    }
}

// Splits a fixed-size chunk off the front of a slice, zero-padding if the slice is short.
// Callers only pass slices of the exact record layout.
fn split_chunk<const N: usize>(bytes: &[u8]) -> ([u8; N], &[u8]) {
    let mut chunk = [0u8; N];
    let (head, tail) = bytes.split_at(N.min(bytes.len()));
    chunk.iter_mut().zip(head).for_each(|(dst, src)| *dst = *src);
    (chunk, tail)
}

impl fmt::Display for SerializedExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for SerializedExtendedKey {
    type Err = ExtendedKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = Self::decode_checked(s)?;
        key.check_prefix()?;
        Ok(key)
    }
}

/// Validates a Base58Check-encoded extended public key.
///
/// The checks run in a fixed order and the first failure is reported:
/// argument shape, Base58 framing, checksum, version, root key invariants,
/// depth and child number against `path` (if given), key prefix.
pub fn validate_serialized_extended_pubkey(text: &str, path: Option<&[u32]>, version: u32) -> ValidationResult {
    let result = validate(text, path, version);
    if let Err(err) = result {
        debug!("Extended public key rejected with status {}: {err}", err.code());
    }
    result
}

fn validate(text: &str, path: Option<&[u32]>, version: u32) -> ValidationResult {
    if path.is_some_and(|path| path.len() > MAX_BIP32_PATH_STEPS) {
        return Err(ExtendedKeyError::InvalidArgument);
    }

    let key = SerializedExtendedKey::decode_checked(text)?;

    if key.version != version {
        return Err(ExtendedKeyError::InvalidVersion);
    }

    if key.is_root() {
        if key.child_number != 0 {
            return Err(ExtendedKeyError::InvalidChildNumber);
        }
        if key.parent_fingerprint != 0 {
            return Err(ExtendedKeyError::InvalidParentFingerprint);
        }
    }

    if let Some(path) = path {
        if usize::from(key.depth) != path.len() {
            return Err(ExtendedKeyError::InvalidDepth);
        }
        if key.child_number != path.last().copied().unwrap_or(0) {
            return Err(ExtendedKeyError::InvalidChildNumber);
        }
    }

    key.check_prefix()
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::{validate_serialized_extended_pubkey, SerializedExtendedKey};
    use crate::{
        address::encode_base58check,
        error::ExtendedKeyError,
        params::{BITCOIN, BITCOIN_TESTNET},
    };

    const MASTER: &str =
        "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";
    const CHILD: &str =
        "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";
    const H: u32 = 0x8000_0000;

    fn decode_raw(text: &str) -> Vec<u8> {
        bs58::decode(text).into_vec().unwrap()
    }

    // Re-encodes a modified record with a correct checksum.
    fn reencode(text: &str, modify: impl FnOnce(&mut [u8; 78])) -> alloc::string::String {
        let raw = decode_raw(text);
        let mut record: [u8; 78] = raw[..78].try_into().unwrap();
        modify(&mut record);
        encode_base58check(&record)
    }

    #[test]
    fn record_layout() {
        let key: SerializedExtendedKey = MASTER.parse().unwrap();
        assert_eq!(key.version, BITCOIN.bip32_pubkey_version);
        assert_eq!(key.depth, 0);
        assert_eq!(key.parent_fingerprint, 0);
        assert_eq!(key.child_number, 0);
        assert_eq!(
            hex::encode(key.chain_code),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        assert_eq!(
            hex::encode(key.compressed_pubkey.as_bytes()),
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2"
        );
        assert_eq!(key.to_bytes().as_slice(), &decode_raw(MASTER)[..78]);
        assert_eq!(key.to_string(), MASTER);

        let child: SerializedExtendedKey = CHILD.parse().unwrap();
        assert_eq!(child.depth, 1);
        assert_eq!(child.parent_fingerprint, 0x3442193e);
        assert_eq!(child.child_number, H);
    }

    #[test]
    fn accepts_valid_keys() {
        let version = BITCOIN.bip32_pubkey_version;
        assert_eq!(validate_serialized_extended_pubkey(MASTER, Some(&[]), version), Ok(()));
        assert_eq!(validate_serialized_extended_pubkey(MASTER, None, version), Ok(()));
        assert_eq!(validate_serialized_extended_pubkey(CHILD, Some(&[H]), version), Ok(()));
        assert_eq!(validate_serialized_extended_pubkey(CHILD, None, version), Ok(()));
    }

    #[test]
    fn rejects_bad_arguments() {
        let version = BITCOIN.bip32_pubkey_version;
        assert_eq!(
            validate_serialized_extended_pubkey("", None, version),
            Err(ExtendedKeyError::InvalidArgument)
        );
        let too_long = "1".repeat(114);
        assert_eq!(
            validate_serialized_extended_pubkey(&too_long, None, version),
            Err(ExtendedKeyError::InvalidArgument)
        );
        // The argument check precedes decoding.
        assert_eq!(
            validate_serialized_extended_pubkey("0OIl", Some(&[0; 11]), version),
            Err(ExtendedKeyError::InvalidArgument)
        );
    }

    #[test]
    fn rejects_bad_base58() {
        let version = BITCOIN.bip32_pubkey_version;
        // `0` is not in the Base58 alphabet.
        let mut bad_char = MASTER.to_string();
        bad_char.replace_range(10..11, "0");
        assert_eq!(
            validate_serialized_extended_pubkey(&bad_char, None, version),
            Err(ExtendedKeyError::InvalidBase58Code)
        );
        assert_eq!(
            validate_serialized_extended_pubkey(&MASTER[..100], None, version),
            Err(ExtendedKeyError::InvalidBase58Code)
        );
        let short = encode_base58check(&[0u8; 77]);
        assert_eq!(
            validate_serialized_extended_pubkey(&short, None, version),
            Err(ExtendedKeyError::InvalidBase58Code)
        );
    }

    #[test]
    fn every_checksum_bit_matters() {
        let raw = decode_raw(MASTER);
        for bit in 0..32 {
            let mut corrupted = raw.clone();
            corrupted[78 + bit / 8] ^= 1 << (bit % 8);
            let text = bs58::encode(corrupted).into_string();
            assert_eq!(
                validate_serialized_extended_pubkey(&text, Some(&[]), BITCOIN.bip32_pubkey_version),
                Err(ExtendedKeyError::InvalidChecksum)
            );
        }
    }

    #[test]
    fn version_must_match() {
        assert_eq!(
            validate_serialized_extended_pubkey(MASTER, Some(&[]), BITCOIN_TESTNET.bip32_pubkey_version),
            Err(ExtendedKeyError::InvalidVersion)
        );
        let flipped = reencode(MASTER, |record| record[3] ^= 1);
        assert_eq!(
            validate_serialized_extended_pubkey(&flipped, Some(&[]), BITCOIN.bip32_pubkey_version),
            Err(ExtendedKeyError::InvalidVersion)
        );
    }

    #[test]
    fn root_key_invariants() {
        let version = BITCOIN.bip32_pubkey_version;
        let with_child_number = reencode(MASTER, |record| record[12] = 1);
        assert_eq!(
            validate_serialized_extended_pubkey(&with_child_number, None, version),
            Err(ExtendedKeyError::InvalidChildNumber)
        );
        let with_fingerprint = reencode(MASTER, |record| record[5] = 1);
        assert_eq!(
            validate_serialized_extended_pubkey(&with_fingerprint, None, version),
            Err(ExtendedKeyError::InvalidParentFingerprint)
        );
        // The child number is checked before the fingerprint.
        let with_both = reencode(MASTER, |record| {
            record[5] = 1;
            record[12] = 1;
        });
        assert_eq!(
            validate_serialized_extended_pubkey(&with_both, None, version),
            Err(ExtendedKeyError::InvalidChildNumber)
        );
    }

    #[test]
    fn position_must_match_the_path() {
        let version = BITCOIN.bip32_pubkey_version;
        assert_eq!(
            validate_serialized_extended_pubkey(CHILD, Some(&[]), version),
            Err(ExtendedKeyError::InvalidDepth)
        );
        assert_eq!(
            validate_serialized_extended_pubkey(CHILD, Some(&[H, 1]), version),
            Err(ExtendedKeyError::InvalidDepth)
        );
        assert_eq!(
            validate_serialized_extended_pubkey(CHILD, Some(&[0]), version),
            Err(ExtendedKeyError::InvalidChildNumber)
        );
        assert_eq!(
            validate_serialized_extended_pubkey(MASTER, Some(&[H]), version),
            Err(ExtendedKeyError::InvalidDepth)
        );
    }

    #[test]
    fn prefix_is_checked_last() {
        let version = BITCOIN.bip32_pubkey_version;
        let bad_prefix = reencode(MASTER, |record| record[45] = 0x04);
        assert_eq!(
            validate_serialized_extended_pubkey(&bad_prefix, None, version),
            Err(ExtendedKeyError::InvalidPrefix)
        );
        assert_eq!(
            bad_prefix.parse::<SerializedExtendedKey>(),
            Err(ExtendedKeyError::InvalidPrefix)
        );
        assert_eq!(
            validate_serialized_extended_pubkey(&bad_prefix, Some(&[H]), version),
            Err(ExtendedKeyError::InvalidDepth)
        );
    }
}
