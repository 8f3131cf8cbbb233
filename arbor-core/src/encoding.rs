//! Base58Check and Bech32 (SegWit) codecs for keys and addresses.

#[cfg(feature = "alloc")]
use alloc::string::{String, ToString};
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::hash::double_sha256;

/// Number of checksum bytes appended by Base58Check.
pub const CHECKSUM_LEN: usize = 4;

/// Encode `version ++ payload` to Base58Check.
///
/// The intermediate buffer is zeroized because WIF and xprv payloads carry secrets.
#[cfg(feature = "alloc")]
pub fn base58check_encode(version: &[u8], payload: &[u8]) -> String {
    let mut data = Zeroizing::new(Vec::with_capacity(
        version.len() + payload.len() + CHECKSUM_LEN,
    ));
    data.extend_from_slice(version);
    data.extend_from_slice(payload);

    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(data.as_slice()).into_string()
}

/// Decode a Base58Check string and verify its checksum.
///
/// Returns the checked bytes (version prefix included, checksum stripped).
/// Callers split off the version themselves since its width differs between
/// addresses (1 byte) and extended keys (4 bytes).
#[cfg(feature = "alloc")]
pub fn base58check_decode(encoded: &str) -> Result<Zeroizing<Vec<u8>>> {
    let mut data = Zeroizing::new(bs58::decode(encoded).into_vec()?);

    if data.len() <= CHECKSUM_LEN {
        return Err(Error::InvalidLength {
            expected: CHECKSUM_LEN + 1,
            actual: data.len(),
        });
    }

    let split = data.len() - CHECKSUM_LEN;
    let computed = double_sha256(&data[..split]);
    if data[split..] != computed[..CHECKSUM_LEN] {
        return Err(Error::InvalidChecksum);
    }

    data.truncate(split);
    Ok(data)
}

/// Encode a SegWit witness program.
///
/// Bech32 is used for witness version 0 and Bech32m for version 1 and above.
#[cfg(feature = "alloc")]
pub fn bech32_encode(hrp: &str, version: u8, program: &[u8]) -> Result<String> {
    use bech32::Hrp;

    let hrp = Hrp::parse(hrp).map_err(|_| Error::InvalidBech32)?;
    let witness_version = bech32::Fe32::try_from(version).map_err(|_| Error::InvalidBech32)?;

    bech32::segwit::encode(hrp, witness_version, program).map_err(|_| Error::InvalidBech32)
}

/// Decode a SegWit address.
///
/// Returns (hrp, witness_version, witness_program).
#[cfg(feature = "alloc")]
pub fn bech32_decode(encoded: &str) -> Result<(String, u8, Vec<u8>)> {
    let (hrp, version, program) =
        bech32::segwit::decode(encoded).map_err(|_| Error::InvalidBech32)?;

    Ok((hrp.to_string().to_ascii_lowercase(), version.to_u8(), program))
}
