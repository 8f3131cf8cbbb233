//! Error types for HD key derivation and import.

use std::fmt;

/// Errors that can occur during key derivation, serialization and import.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Private material was requested from a public-only node.
    PrivatePublicMismatch,
    /// Malformed or unrecognized extended key.
    Import(ImportError),
    /// Base58Check, Bech32 or hex decoding failure.
    Encoding(arbor_core::Error),
    /// Invalid point encoding, point at infinity, or point off the curve.
    InvalidPoint,
    /// Secret scalar is zero or not below the group order.
    InvalidPrivateKey,
    /// A derivation step could not produce a child.
    Derivation(DerivationError),
    /// Derivation path does not follow the grammar.
    InvalidDerivationPath(String),
    /// Seed length outside 16..=64 bytes.
    InvalidSeedLength(usize),
    /// Version byte not known for any network.
    UnknownNetworkPrefix(u8),
}

/// Reasons an extended key is rejected on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    /// The 4-byte version is not in the network table.
    UnknownVersion([u8; 4]),
    /// Payload is not 78 bytes.
    InvalidLength(usize),
    /// Key byte does not match the version kind (private needs `00`, public needs `02`/`03`).
    InvalidKeyPrefix(u8),
    /// Private key is zero or not below the group order.
    InvalidPrivateKey,
    /// Depth is zero but the parent fingerprint is not.
    ZeroDepthParentFingerprint,
    /// Depth is zero but the child index is not.
    ZeroDepthIndex,
}

/// Reasons a single derivation step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DerivationError {
    /// Hardened child requested from a public-only node.
    HardenedFromPublic {
        /// Requested child index.
        index: u32,
    },
    /// `I_L >= n` or the resulting key is zero / infinity for this index.
    InvalidChild(u32),
    /// The seed hashed to an unusable master secret.
    InvalidMasterKey,
    /// Depth would exceed 255.
    MaxDepthExceeded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrivatePublicMismatch => {
                write!(f, "private key material is not available on this node")
            }
            Self::Import(e) => write!(f, "extended key import error: {e}"),
            Self::Encoding(e) => write!(f, "encoding error: {e}"),
            Self::InvalidPoint => write!(f, "invalid secp256k1 point"),
            Self::InvalidPrivateKey => write!(f, "private key out of range"),
            Self::Derivation(e) => write!(f, "derivation error: {e}"),
            Self::InvalidDerivationPath(p) => write!(f, "invalid derivation path: {p}"),
            Self::InvalidSeedLength(n) => {
                write!(f, "invalid seed length {n}, must be between 16 and 64 bytes")
            }
            Self::UnknownNetworkPrefix(b) => write!(f, "unknown network prefix 0x{b:02x}"),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVersion(v) => write!(f, "unknown version {}", hex::encode(v)),
            Self::InvalidLength(n) => write!(f, "expected 78 bytes, got {n}"),
            Self::InvalidKeyPrefix(b) => write!(f, "invalid key prefix 0x{b:02x}"),
            Self::InvalidPrivateKey => write!(f, "private key out of range"),
            Self::ZeroDepthParentFingerprint => {
                write!(f, "zero depth with non-zero parent fingerprint")
            }
            Self::ZeroDepthIndex => write!(f, "zero depth with non-zero index"),
        }
    }
}

impl fmt::Display for DerivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardenedFromPublic { index } => {
                write!(f, "cannot derive hardened child {index} from a public key")
            }
            Self::InvalidChild(index) => write!(f, "child {index} is invalid, use the next index"),
            Self::InvalidMasterKey => write!(f, "seed produced an invalid master key"),
            Self::MaxDepthExceeded => write!(f, "maximum derivation depth exceeded"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Import(e) => Some(e),
            Self::Encoding(e) => Some(e),
            Self::Derivation(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ImportError {}

impl std::error::Error for DerivationError {}

impl From<arbor_core::Error> for Error {
    fn from(err: arbor_core::Error) -> Self {
        Self::Encoding(err)
    }
}

impl From<ImportError> for Error {
    fn from(err: ImportError) -> Self {
        Self::Import(err)
    }
}

impl From<DerivationError> for Error {
    fn from(err: DerivationError) -> Self {
        Self::Derivation(err)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Self {
        Self::Encoding(arbor_core::Error::InvalidHex)
    }
}

/// A convenient Result type alias for arbor operations.
pub type Result<T> = core::result::Result<T, Error>;
