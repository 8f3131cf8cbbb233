//! Bitcoin address kinds and their string encodings.

use core::fmt;
use core::str::FromStr;

use arbor_core::encoding::{base58check_decode, base58check_encode, bech32_decode, bech32_encode};

use crate::error::{Error, Result};
use crate::network::Network;

/// Witness version used for P2WPKH.
const WITNESS_V0: u8 = 0x00;
/// `OP_0` followed by a 20-byte push.
const P2WPKH_SCRIPT_PREFIX: [u8; 2] = [0x00, 0x14];

/// Bitcoin address types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressType {
    /// Pay to Public Key Hash (Legacy) - starts with 1 or m/n
    P2pkh,
    /// Pay to Script Hash wrapping P2WPKH - starts with 3 or 2
    P2shP2wpkh,
    /// Pay to Witness Public Key Hash (Native SegWit) - starts with bc1q or tb1q
    #[default]
    P2wpkh,
}

impl AddressType {
    /// All supported address types.
    pub const ALL: [Self; 3] = [Self::P2pkh, Self::P2shP2wpkh, Self::P2wpkh];

    /// Get address type name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::P2pkh => "P2PKH (Legacy)",
            Self::P2shP2wpkh => "P2SH-P2WPKH (SegWit)",
            Self::P2wpkh => "P2WPKH (Native SegWit)",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when parsing an invalid address type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseAddressTypeError;

impl fmt::Display for ParseAddressTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid address type, expected: p2pkh, p2sh or p2wpkh")
    }
}

impl std::error::Error for ParseAddressTypeError {}

impl FromStr for AddressType {
    type Err = ParseAddressTypeError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p2pkh" | "legacy" => Ok(Self::P2pkh),
            "p2sh" | "p2sh-p2wpkh" | "segwit" | "nested-segwit" => Ok(Self::P2shP2wpkh),
            "p2wpkh" | "native-segwit" | "bech32" => Ok(Self::P2wpkh),
            _ => Err(ParseAddressTypeError),
        }
    }
}

/// Encode a public key hash as a P2PKH address.
pub fn encode_p2pkh(pubkey_hash: &[u8; 20], network: Network) -> String {
    base58check_encode(&[network.p2pkh_version()], pubkey_hash)
}

/// Encode a script hash as a P2SH address.
pub fn encode_p2sh(script_hash: &[u8; 20], network: Network) -> String {
    base58check_encode(&[network.p2sh_version()], script_hash)
}

/// Encode a public key hash as a native SegWit v0 address.
pub fn encode_p2wpkh(pubkey_hash: &[u8; 20], network: Network) -> Result<String> {
    Ok(bech32_encode(network.bech32_hrp(), WITNESS_V0, pubkey_hash)?)
}

/// Redeem script `OP_0 <20-byte hash>` committed to by a nested-segwit address.
pub fn p2wpkh_redeem_script(pubkey_hash: &[u8; 20]) -> [u8; 22] {
    let mut script = [0u8; 22];
    script[..2].copy_from_slice(&P2WPKH_SCRIPT_PREFIX);
    script[2..].copy_from_slice(pubkey_hash);
    script
}

/// Encode a 20-byte hash as an address of the given type.
///
/// For [`AddressType::P2shP2wpkh`] the hash is the redeem script hash.
pub fn encode(address_type: AddressType, hash: &[u8; 20], network: Network) -> Result<String> {
    match address_type {
        AddressType::P2pkh => Ok(encode_p2pkh(hash, network)),
        AddressType::P2shP2wpkh => Ok(encode_p2sh(hash, network)),
        AddressType::P2wpkh => encode_p2wpkh(hash, network),
    }
}

/// Decode an address for `network` into its type and 20-byte hash.
///
/// P2SH addresses decode as [`AddressType::P2shP2wpkh`] since the script
/// behind a script hash is not recoverable.
pub fn decode(address: &str, network: Network) -> Result<(AddressType, [u8; 20])> {
    let address = address.trim();
    let lower = address.to_ascii_lowercase();
    let is_segwit = Network::ALL
        .iter()
        .any(|n| lower.starts_with(&format!("{}1", n.bech32_hrp())));

    if is_segwit {
        return decode_segwit(address, network);
    }

    let data = base58check_decode(address)?;
    if data.len() != 21 {
        return Err(Error::Encoding(arbor_core::Error::InvalidLength {
            expected: 21,
            actual: data.len(),
        }));
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&data[1..]);

    match data[0] {
        v if v == network.p2pkh_version() => Ok((AddressType::P2pkh, hash)),
        v if v == network.p2sh_version() => Ok((AddressType::P2shP2wpkh, hash)),
        v => Err(Error::UnknownNetworkPrefix(v)),
    }
}

fn decode_segwit(address: &str, network: Network) -> Result<(AddressType, [u8; 20])> {
    let (hrp, version, program) = bech32_decode(address)?;
    if hrp != network.bech32_hrp() || version != WITNESS_V0 {
        return Err(Error::Encoding(arbor_core::Error::InvalidBech32));
    }
    let hash: [u8; 20] = program.as_slice().try_into().map_err(|_| {
        Error::Encoding(arbor_core::Error::InvalidLength {
            expected: 20,
            actual: program.len(),
        })
    })?;
    Ok((AddressType::P2wpkh, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const HASH: [u8; 20] = hex!("751e76e8199196d454941c45d1b3a323f1433bd6");

    #[test]
    fn test_address_type_from_str() {
        assert_eq!("p2pkh".parse::<AddressType>().unwrap(), AddressType::P2pkh);
        assert_eq!("legacy".parse::<AddressType>().unwrap(), AddressType::P2pkh);
        assert_eq!("P2SH".parse::<AddressType>().unwrap(), AddressType::P2shP2wpkh);
        assert_eq!("bech32".parse::<AddressType>().unwrap(), AddressType::P2wpkh);
        assert!("p2tr".parse::<AddressType>().is_err());
    }

    #[test]
    fn test_redeem_script() {
        let script = p2wpkh_redeem_script(&HASH);
        assert_eq!(script[0], 0x00);
        assert_eq!(script[1], 0x14);
        assert_eq!(&script[2..], &HASH);
    }

    #[test]
    fn test_encode_decode_each_type() {
        for network in Network::ALL {
            for address_type in AddressType::ALL {
                let encoded = encode(address_type, &HASH, network).unwrap();
                assert_eq!(decode(&encoded, network).unwrap(), (address_type, HASH));
            }
        }
    }

    #[test]
    fn test_decode_known_addresses() {
        assert_eq!(
            decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", Network::Mainnet).unwrap(),
            (AddressType::P2pkh, HASH)
        );
        assert_eq!(
            decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", Network::Mainnet).unwrap(),
            (AddressType::P2wpkh, HASH)
        );
    }

    #[test]
    fn test_decode_wrong_network() {
        assert_eq!(
            decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", Network::Testnet).unwrap_err(),
            Error::UnknownNetworkPrefix(0x00)
        );
        assert_eq!(
            decode("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx", Network::Mainnet).unwrap_err(),
            Error::Encoding(arbor_core::Error::InvalidBech32)
        );
    }

    #[test]
    fn test_decode_corrupted() {
        assert!(decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5", Network::Mainnet).is_err());
        assert_eq!(
            decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMJ", Network::Mainnet).unwrap_err(),
            Error::Encoding(arbor_core::Error::InvalidChecksum)
        );
    }

    #[test]
    fn test_decode_rejects_p2wsh() {
        let p2wsh = "bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qccfmv3";
        assert!(matches!(
            decode(p2wsh, Network::Mainnet),
            Err(Error::Encoding(arbor_core::Error::InvalidLength { expected: 20, actual: 32 }))
        ));
    }
}
