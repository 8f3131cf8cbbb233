//! secp256k1 private key with WIF and hex encodings.

use arbor_core::encoding::{base58check_decode, base58check_encode};
use k256::NonZeroScalar;
use k256::elliptic_curve::rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::curve::{CurveArithmetic, Secp256k1};
use crate::error::{Error, Result};
use crate::network::Network;
use crate::public_key::PublicKey;

/// WIF compression flag appended after the secret.
const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// A secret scalar `d` with `1 <= d < n`.
///
/// The scalar is wiped when the key is dropped. The `compressed` flag only
/// records the preference carried by an imported WIF string.
#[derive(Clone)]
pub struct PrivateKey {
    inner: k256::SecretKey,
    compressed: bool,
}

impl PrivateKey {
    /// Create from a raw 32-byte big-endian secret.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::Encoding(arbor_core::Error::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            }));
        }
        let inner = k256::SecretKey::from_slice(bytes).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self {
            inner,
            compressed: true,
        })
    }

    /// Create from 64 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = Zeroizing::new(hex::decode(hex_str.trim())?);
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_scalar(scalar: NonZeroScalar) -> Self {
        Self {
            inner: k256::SecretKey::from(scalar),
            compressed: true,
        }
    }

    /// Create a new random private key.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            inner: k256::SecretKey::random(rng),
            compressed: true,
        }
    }

    /// Create a new random private key from the operating system RNG.
    #[cfg(feature = "rand")]
    pub fn generate() -> Self {
        Self::random(&mut rand_core::OsRng)
    }

    /// Import from WIF (Wallet Import Format).
    ///
    /// A 33-byte payload is uncompressed, a 34-byte payload ending in `0x01` is compressed.
    pub fn from_wif(wif: &str) -> Result<(Self, Network)> {
        let data = base58check_decode(wif.trim())?;

        let compressed = match data.len() {
            33 => false,
            34 if data[33] == WIF_COMPRESSED_FLAG => true,
            34 => return Err(Error::InvalidPrivateKey),
            n => {
                return Err(Error::Encoding(arbor_core::Error::InvalidLength {
                    expected: 34,
                    actual: n,
                }));
            }
        };

        let network =
            Network::from_wif_version(data[0]).ok_or(Error::UnknownNetworkPrefix(data[0]))?;
        let mut key = Self::from_bytes(&data[1..33])?;
        key.compressed = compressed;
        Ok((key, network))
    }

    /// Export as WIF.
    pub fn to_wif(&self, network: Network, compressed: bool) -> Zeroizing<String> {
        let secret = self.to_bytes();
        let mut payload = Zeroizing::new([0u8; 33]);
        payload[..32].copy_from_slice(&secret[..]);
        payload[32] = WIF_COMPRESSED_FLAG;

        let len = if compressed { 33 } else { 32 };
        Zeroizing::new(base58check_encode(
            &[network.wif_version()],
            &payload[..len],
        ))
    }

    /// Whether the key was imported from (or defaults to) a compressed WIF.
    pub const fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Override the compression preference.
    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Serialize to the raw 32-byte secret.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Serialize to 64 lowercase hex characters.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.to_bytes()[..]))
    }

    /// Derive the public key `d·G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(Secp256k1::scalar_base_mul(&self.scalar()))
    }

    pub(crate) fn scalar(&self) -> NonZeroScalar {
        self.inner.to_nonzero_scalar()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        // k256 compares secrets in constant time
        self.inner == other.inner
    }
}

impl Eq for PrivateKey {}

impl core::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PrivateKey([REDACTED], compressed={})", self.compressed)
    }
}

impl core::str::FromStr for PrivateKey {
    type Err = Error;

    /// Parse from 64 hex characters or WIF. The WIF network is discarded.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::from_hex(s);
        }
        Self::from_wif(s).map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const KEY: [u8; 32] = hex!("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d");
    const WIF_COMPRESSED: &str = "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617";
    const WIF_UNCOMPRESSED: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";

    #[test]
    fn test_to_wif() {
        let key = PrivateKey::from_bytes(&KEY).unwrap();
        assert_eq!(key.to_wif(Network::Mainnet, true).as_str(), WIF_COMPRESSED);
        assert_eq!(key.to_wif(Network::Mainnet, false).as_str(), WIF_UNCOMPRESSED);
    }

    #[test]
    fn test_from_wif_infers_compression() {
        let (key, network) = PrivateKey::from_wif(WIF_COMPRESSED).unwrap();
        assert_eq!(network, Network::Mainnet);
        assert!(key.is_compressed());
        assert_eq!(*key.to_bytes(), KEY);

        let (key, _) = PrivateKey::from_wif(WIF_UNCOMPRESSED).unwrap();
        assert!(!key.is_compressed());
        assert_eq!(*key.to_bytes(), KEY);
    }

    #[test]
    fn test_wif_testnet_roundtrip() {
        let key = PrivateKey::from_bytes(&KEY).unwrap();
        let wif = key.to_wif(Network::Testnet, true);
        assert!(wif.starts_with('c'));
        let (decoded, network) = PrivateKey::from_wif(&wif).unwrap();
        assert_eq!(network, Network::Testnet);
        assert_eq!(decoded.to_hex(), key.to_hex());
    }

    #[test]
    fn test_from_wif_bad_checksum() {
        let mut corrupted = WIF_COMPRESSED.to_string();
        corrupted.pop();
        corrupted.push('8');
        assert_eq!(
            PrivateKey::from_wif(&corrupted).unwrap_err(),
            Error::Encoding(arbor_core::Error::InvalidChecksum)
        );
    }

    #[test]
    fn test_from_wif_unknown_version() {
        let wif = base58check_encode(&[0x00], &KEY);
        assert_eq!(
            PrivateKey::from_wif(&wif).unwrap_err(),
            Error::UnknownNetworkPrefix(0x00)
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32]).unwrap_err(),
            Error::InvalidPrivateKey
        );
        let n = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        assert_eq!(PrivateKey::from_bytes(&n).unwrap_err(), Error::InvalidPrivateKey);
        assert!(PrivateKey::from_bytes(&KEY[..31]).is_err());
    }

    #[test]
    fn test_from_str_hex_and_wif() {
        let from_hex: PrivateKey = hex::encode(KEY).parse().unwrap();
        let from_wif: PrivateKey = WIF_COMPRESSED.parse().unwrap();
        assert_eq!(from_hex, from_wif);
        assert!("not a key".parse::<PrivateKey>().is_err());
    }

    #[test]
    fn test_debug_redacted() {
        let key = PrivateKey::from_bytes(&KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("0c28fca3"));
    }

    #[test]
    fn test_public_key_of_one_is_generator() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let key = PrivateKey::from_bytes(&one).unwrap();
        assert_eq!(
            key.public_key().to_hex(true),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    #[cfg(feature = "rand")]
    fn test_random_keys_differ() {
        let mut rng = rand_core::OsRng;
        let a = PrivateKey::random(&mut rng);
        let b = PrivateKey::random(&mut rng);
        assert_ne!(a, b);
    }
}
