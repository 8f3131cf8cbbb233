//! secp256k1 public key and the addresses derived from it.

use arbor_core::hash::hash160;

use crate::address::{self, AddressType};
use crate::curve::Point;
use crate::error::Result;
use crate::network::Network;

/// A public curve point `K`.
///
/// Every address format is computed from the same point, so the legacy,
/// nested-segwit and bech32 forms always describe one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
}

impl PublicKey {
    pub(crate) const fn from_point(point: Point) -> Self {
        Self { point }
    }

    /// Parse a SEC1 encoding (33-byte compressed or 65-byte uncompressed).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Point::from_bytes(bytes).map(Self::from_point)
    }

    /// Parse a hex-encoded SEC1 point.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())?;
        Self::from_bytes(&bytes)
    }

    pub(crate) const fn point(&self) -> &Point {
        &self.point
    }

    /// 33-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; 33] {
        self.point.to_compressed()
    }

    /// 65-byte uncompressed encoding.
    pub fn to_uncompressed_bytes(&self) -> [u8; 65] {
        self.point.to_uncompressed()
    }

    /// Hex encoding in the requested form.
    pub fn to_hex(&self, compressed: bool) -> String {
        if compressed {
            hex::encode(self.to_bytes())
        } else {
            hex::encode(self.to_uncompressed_bytes())
        }
    }

    /// HASH160 of the requested serialization.
    pub fn hash160(&self, compressed: bool) -> [u8; 20] {
        if compressed {
            hash160(&self.to_bytes())
        } else {
            hash160(&self.to_uncompressed_bytes())
        }
    }

    /// HASH160 of the compressed key.
    pub fn identifier(&self) -> [u8; 20] {
        self.hash160(true)
    }

    /// First four bytes of the identifier.
    pub fn fingerprint(&self) -> [u8; 4] {
        let id = self.identifier();
        [id[0], id[1], id[2], id[3]]
    }

    /// Legacy pay-to-pubkey-hash address.
    pub fn to_address(&self, network: Network, compressed: bool) -> String {
        address::encode_p2pkh(&self.hash160(compressed), network)
    }

    /// P2WPKH nested in P2SH.
    pub fn to_p2wpkh_p2sh(&self, network: Network) -> String {
        let script = address::p2wpkh_redeem_script(&self.identifier());
        address::encode_p2sh(&hash160(&script), network)
    }

    /// Native SegWit v0 address.
    pub fn to_bech32(&self, network: Network) -> Result<String> {
        address::encode_p2wpkh(&self.identifier(), network)
    }

    /// Address of the given type, always from the compressed key.
    pub fn address(&self, address_type: AddressType, network: Network) -> Result<String> {
        match address_type {
            AddressType::P2pkh => Ok(self.to_address(network, true)),
            AddressType::P2shP2wpkh => Ok(self.to_p2wpkh_p2sh(network)),
            AddressType::P2wpkh => self.to_bech32(network),
        }
    }
}

impl core::str::FromStr for PublicKey {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}
