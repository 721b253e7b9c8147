//! Network parameters and hard limits of the key-derivation core.

/// The first hardened BIP32 child index.
pub const BIP32_FIRST_HARDENED_CHILD: u32 = 0x8000_0000;

/// The maximum number of derivation steps accepted when validating against a path.
pub const MAX_BIP32_PATH_STEPS: usize = 10;

/// The maximum length of a Base58-encoded extended public key.
pub const MAX_SERIALIZED_PUBKEY_LENGTH: usize = 113;

/// The maximum length of a SLIP-0021 label passed to the oracle.
pub const MAX_SLIP21_LABEL_LENGTH: usize = 32;

/// Version prefixes used when serializing keys and addresses for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    /// BIP32 version bytes of extended public keys.
    pub bip32_pubkey_version: u32,
    /// Base58Check version of pay-to-pubkey-hash addresses.
    pub p2pkh_version: u32,
    /// Base58Check version of pay-to-script-hash addresses.
    pub p2sh_version: u32,
}

/// Bitcoin mainnet (`xpub`, `1...`, `3...`).
pub const BITCOIN: NetworkParams = NetworkParams {
    bip32_pubkey_version: 0x0488_b21e,
    p2pkh_version: 0x00,
    p2sh_version: 0x05,
};

/// Bitcoin testnet and regtest (`tpub`, `m...`/`n...`, `2...`).
pub const BITCOIN_TESTNET: NetworkParams = NetworkParams {
    bip32_pubkey_version: 0x0435_87cf,
    p2pkh_version: 0x6f,
    p2sh_version: 0xc4,
};

/// Liquid mainnet.
pub const LIQUID: NetworkParams = NetworkParams {
    bip32_pubkey_version: 0x0488_b21e,
    p2pkh_version: 57,
    p2sh_version: 39,
};

/// Liquid testnet and Elements regtest.
pub const LIQUID_TESTNET: NetworkParams = NetworkParams {
    bip32_pubkey_version: 0x0435_87cf,
    p2pkh_version: 235,
    p2sh_version: 75,
};
