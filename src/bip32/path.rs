use alloc::vec::Vec;
use core::{fmt, str::FromStr};

use crate::{error::Error, params::BIP32_FIRST_HARDENED_CHILD};

/// A BIP32 derivation path: an ordered sequence of child indices,
/// where indices `>= 2^31` denote hardened steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bip32Path(Vec<u32>);

impl Bip32Path {
    /// The empty path, denoting the master key `m`.
    pub fn master() -> Self {
        Self(Vec::new())
    }

    /// The child indices, from the master key down.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// The number of derivation steps, which is also the depth of the derived key.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the master key path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path without its last step, or `None` for the master key.
    pub fn parent(&self) -> Option<&[u32]> {
        self.0.split_last().map(|(_, parent)| parent)
    }

    /// The index of the last step, or `0` for the master key.
    pub fn last_index(&self) -> u32 {
        self.0.last().copied().unwrap_or(0)
    }

    /// Returns this path extended by one step.
    pub fn child(&self, index: u32) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    /// Whether `index` denotes a hardened step.
    pub fn is_hardened(index: u32) -> bool {
        index >= BIP32_FIRST_HARDENED_CHILD
    }
}

impl From<Vec<u32>> for Bip32Path {
    fn from(steps: Vec<u32>) -> Self {
        Self(steps)
    }
}

impl From<&[u32]> for Bip32Path {
    fn from(steps: &[u32]) -> Self {
        Self(steps.to_vec())
    }
}

impl AsRef<[u32]> for Bip32Path {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for Bip32Path {
    type Err = Error;

    /// Parses the `m/44'/1'/0'/0/7` notation; `h` and `H` are accepted as hardened markers too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = s.split('/');
        if components.next() != Some("m") {
            return Err(Error::Argument("derivation path must start with `m`"));
        }

        components
            .map(|component| {
                let (digits, hardened) = match component.strip_suffix(['\'', 'h', 'H']) {
                    Some(digits) => (digits, true),
                    None => (component, false),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::Argument("derivation path step is not a number"));
                }
                let index: u32 = digits
                    .parse()
                    .map_err(|_| Error::Argument("derivation path step is out of range"))?;
                if Self::is_hardened(index) {
                    return Err(Error::Argument("derivation path step is out of range"));
                }
                Ok(if hardened {
                    index | BIP32_FIRST_HARDENED_CHILD
                } else {
                    index
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for Bip32Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for &index in &self.0 {
            if Self::is_hardened(index) {
                write!(f, "/{}'", index & !BIP32_FIRST_HARDENED_CHILD)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}
