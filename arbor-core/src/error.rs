//! Error types for codec and hashing operations.

use core::fmt;

/// Errors that can occur while encoding or decoding keys and addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Input contains characters outside the Base58 alphabet.
    InvalidBase58,
    /// Base58Check checksum does not match the payload.
    InvalidChecksum,
    /// Decoded data has an unexpected length.
    InvalidLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },
    /// Malformed Bech32 string, wrong checksum, or invalid witness program.
    InvalidBech32,
    /// Malformed hexadecimal string.
    InvalidHex,
    /// HMAC rejected its key.
    Hmac,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBase58 => write!(f, "invalid base58 character"),
            Self::InvalidChecksum => write!(f, "base58check checksum mismatch"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected} bytes, got {actual}")
            }
            Self::InvalidBech32 => write!(f, "invalid bech32 encoding"),
            Self::InvalidHex => write!(f, "invalid hex encoding"),
            Self::Hmac => write!(f, "HMAC key rejected"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<bs58::decode::Error> for Error {
    fn from(_: bs58::decode::Error) -> Self {
        Self::InvalidBase58
    }
}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Self {
        Self::InvalidHex
    }
}

/// A convenient Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, Error>;
