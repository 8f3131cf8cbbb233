//! Bitcoin network parameters.
//!
//! Version bytes are resolved from an immutable table keyed by network and key kind.

use std::fmt;
use std::str::FromStr;

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Bitcoin mainnet.
    #[default]
    Mainnet,
    /// Bitcoin testnet.
    Testnet,
}

/// Whether an extended key carries private or public key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// `xprv` / `tprv`
    Private,
    /// `xpub` / `tpub`
    Public,
}

/// Per-network constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    /// Pay-to-pubkey-hash address version.
    pub p2pkh: u8,
    /// Pay-to-script-hash address version.
    pub p2sh: u8,
    /// Wallet import format version.
    pub wif: u8,
    /// Bech32 human-readable part.
    pub bech32_hrp: &'static str,
    /// Extended private key version.
    pub xprv: [u8; 4],
    /// Extended public key version.
    pub xpub: [u8; 4],
}

const MAINNET: NetworkParams = NetworkParams {
    p2pkh: 0x00,
    p2sh: 0x05,
    wif: 0x80,
    bech32_hrp: "bc",
    xprv: [0x04, 0x88, 0xad, 0xe4],
    xpub: [0x04, 0x88, 0xb2, 0x1e],
};

const TESTNET: NetworkParams = NetworkParams {
    p2pkh: 0x6f,
    p2sh: 0xc4,
    wif: 0xef,
    bech32_hrp: "tb",
    xprv: [0x04, 0x35, 0x83, 0x94],
    xpub: [0x04, 0x35, 0x87, 0xcf],
};

impl Network {
    /// All supported networks.
    pub const ALL: [Self; 2] = [Self::Mainnet, Self::Testnet];

    /// Constant table for this network.
    #[inline]
    #[must_use]
    pub const fn params(self) -> &'static NetworkParams {
        match self {
            Self::Mainnet => &MAINNET,
            Self::Testnet => &TESTNET,
        }
    }

    /// P2PKH address version byte.
    #[inline]
    #[must_use]
    pub const fn p2pkh_version(self) -> u8 {
        self.params().p2pkh
    }

    /// P2SH address version byte.
    #[inline]
    #[must_use]
    pub const fn p2sh_version(self) -> u8 {
        self.params().p2sh
    }

    /// WIF version byte.
    #[inline]
    #[must_use]
    pub const fn wif_version(self) -> u8 {
        self.params().wif
    }

    /// Bech32 human-readable part.
    #[inline]
    #[must_use]
    pub const fn bech32_hrp(self) -> &'static str {
        self.params().bech32_hrp
    }

    /// Extended key version for the given kind.
    #[inline]
    #[must_use]
    pub const fn extended_version(self, kind: KeyKind) -> [u8; 4] {
        match kind {
            KeyKind::Private => self.params().xprv,
            KeyKind::Public => self.params().xpub,
        }
    }

    /// Look up the network and key kind of an extended key version.
    #[must_use]
    pub fn from_extended_version(version: [u8; 4]) -> Option<(Self, KeyKind)> {
        Self::ALL.into_iter().find_map(|network| {
            let params = network.params();
            if params.xprv == version {
                Some((network, KeyKind::Private))
            } else if params.xpub == version {
                Some((network, KeyKind::Public))
            } else {
                None
            }
        })
    }

    /// Look up the network of a WIF version byte.
    #[must_use]
    pub fn from_wif_version(version: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.wif_version() == version)
    }

    /// Get network name as string.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
        }
    }
}

/// Error returned when parsing an invalid network name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNetworkError(String);

impl fmt::Display for ParseNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid network '{}', expected: mainnet, bitcoin, testnet or bitcoin_testnet",
            self.0
        )
    }
}

impl std::error::Error for ParseNetworkError {}

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" | "bitcoin_testnet" => Ok(Self::Testnet),
            _ => Err(ParseNetworkError(s.to_string())),
        }
    }
}
