//! Extended key serialization.
//!
//! ```text
//! version(4) | depth(1) | parent_fingerprint(4) | index(4) | chain_code(32) | key(33)
//! ```
//!
//! `key` is `0x00 || d` for private keys and the compressed point for public keys.

use tracing::debug;
use zeroize::Zeroizing;

use arbor_core::encoding::{base58check_decode, base58check_encode};

use crate::error::{Error, ImportError, Result};
use crate::network::{KeyKind, Network};
use crate::node::{ChainCode, Node, NodeKey};
use crate::private_key::PrivateKey;
use crate::public_key::PublicKey;

/// Serialized extended key length, without checksum.
pub const EXTENDED_KEY_LEN: usize = 78;

const DEPTH: usize = 4;
const PARENT_FINGERPRINT: core::ops::Range<usize> = 5..9;
const INDEX: core::ops::Range<usize> = 9..13;
const CHAIN_CODE: core::ops::Range<usize> = 13..45;
const KEY: usize = 45;

/// Serialize `node` in the 78-byte layout.
///
/// Fails with [`Error::PrivatePublicMismatch`] when a private serialization is
/// requested from a public-only node.
pub fn serialize(
    node: &Node,
    kind: KeyKind,
    network: Network,
) -> Result<Zeroizing<[u8; EXTENDED_KEY_LEN]>> {
    let mut out = Zeroizing::new([0u8; EXTENDED_KEY_LEN]);
    out[..DEPTH].copy_from_slice(&network.extended_version(kind));
    out[DEPTH] = node.depth();
    out[PARENT_FINGERPRINT].copy_from_slice(&node.parent_fingerprint());
    out[INDEX].copy_from_slice(&node.index().to_be_bytes());
    out[CHAIN_CODE].copy_from_slice(node.chain_code());

    match kind {
        KeyKind::Private => {
            let private_key = node.private_key().ok_or(Error::PrivatePublicMismatch)?;
            out[KEY] = 0x00;
            out[KEY + 1..].copy_from_slice(&private_key.to_bytes()[..]);
        }
        KeyKind::Public => out[KEY..].copy_from_slice(&node.public_key().to_bytes()),
    }

    Ok(out)
}

/// Base58Check-encode `node`.
pub fn encode(node: &Node, kind: KeyKind, network: Network) -> Result<Zeroizing<String>> {
    let bytes = serialize(node, kind, network)?;
    Ok(Zeroizing::new(base58check_encode(&bytes[..DEPTH], &bytes[DEPTH..])))
}

/// Base58Check-encode the public form of `node`.
pub fn encode_public(node: &Node, network: Network) -> String {
    let mut out = [0u8; EXTENDED_KEY_LEN];
    out[..DEPTH].copy_from_slice(&network.extended_version(KeyKind::Public));
    out[DEPTH] = node.depth();
    out[PARENT_FINGERPRINT].copy_from_slice(&node.parent_fingerprint());
    out[INDEX].copy_from_slice(&node.index().to_be_bytes());
    out[CHAIN_CODE].copy_from_slice(node.chain_code());
    out[KEY..].copy_from_slice(&node.public_key().to_bytes());
    base58check_encode(&out[..DEPTH], &out[DEPTH..])
}

/// Parse the 78-byte layout.
///
/// Returns the node and the network its version belongs to.
pub fn deserialize(bytes: &[u8]) -> Result<(Node, Network)> {
    if bytes.len() != EXTENDED_KEY_LEN {
        return Err(ImportError::InvalidLength(bytes.len()).into());
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[..DEPTH]);
    let (network, kind) =
        Network::from_extended_version(version).ok_or(ImportError::UnknownVersion(version))?;

    let depth = bytes[DEPTH];
    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&bytes[PARENT_FINGERPRINT]);
    let mut index = [0u8; 4];
    index.copy_from_slice(&bytes[INDEX]);
    let index = u32::from_be_bytes(index);

    if depth == 0 && parent_fingerprint != [0u8; 4] {
        return Err(ImportError::ZeroDepthParentFingerprint.into());
    }
    if depth == 0 && index != 0 {
        return Err(ImportError::ZeroDepthIndex.into());
    }

    let chain_code = ChainCode::from_slice(&bytes[CHAIN_CODE])
        .ok_or(ImportError::InvalidLength(bytes.len()))?;

    let prefix = bytes[KEY];
    let key = match kind {
        KeyKind::Private => {
            if prefix != 0x00 {
                return Err(ImportError::InvalidKeyPrefix(prefix).into());
            }
            let private_key = PrivateKey::from_bytes(&bytes[KEY + 1..])
                .map_err(|_| ImportError::InvalidPrivateKey)?;
            let public_key = private_key.public_key();
            NodeKey::Private {
                private_key,
                public_key,
            }
        }
        KeyKind::Public => {
            if prefix != 0x02 && prefix != 0x03 {
                return Err(ImportError::InvalidKeyPrefix(prefix).into());
            }
            NodeKey::Public(PublicKey::from_bytes(&bytes[KEY..])?)
        }
    };

    debug!(%network, %kind, depth, index, "imported extended key");
    Ok((
        Node::from_parts(depth, index, parent_fingerprint, chain_code, key),
        network,
    ))
}

/// Decode a Base58Check extended key string.
pub fn decode(encoded: &str) -> Result<(Node, Network)> {
    let bytes = base58check_decode(encoded.trim())?;
    deserialize(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DerivationError;
    use crate::node::Master;

    const XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

    fn master() -> Master {
        Master::from_seed_hex("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_encode_master() {
        let master = master();
        assert_eq!(
            encode(&master, KeyKind::Private, Network::Mainnet).unwrap().as_str(),
            XPRV
        );
        assert_eq!(encode_public(&master, Network::Mainnet), XPUB);
        assert_eq!(
            encode(&master, KeyKind::Public, Network::Mainnet).unwrap().as_str(),
            XPUB
        );
    }

    #[test]
    fn test_serialized_layout() {
        let bytes = serialize(&master(), KeyKind::Public, Network::Mainnet).unwrap();
        assert_eq!(&bytes[..4], &[0x04, 0x88, 0xb2, 0x1e]);
        assert_eq!(bytes[4], 0);
        assert_eq!(&bytes[5..13], &[0u8; 8]);
        assert_eq!(bytes[45], 0x03);
    }

    #[test]
    fn test_roundtrip_anywhere_in_tree() {
        let master = master();
        for path in ["m", "m/0'", "m/0'/1", "m/0'/1/2'/2/1000000000", "M/0'/1"] {
            let node = master.node_for_path(path).unwrap();
            for network in Network::ALL {
                let public = encode(&node, KeyKind::Public, network).unwrap();
                let (decoded, decoded_network) = decode(&public).unwrap();
                assert_eq!(decoded, node.to_public());
                assert_eq!(decoded_network, network);

                if node.has_private_key() {
                    let private = encode(&node, KeyKind::Private, network).unwrap();
                    assert_eq!(decode(&private).unwrap().0, node);
                }
            }
        }
    }

    #[test]
    fn test_public_only_private_serialization_fails() {
        let public = master().to_public();
        assert_eq!(
            serialize(&public, KeyKind::Private, Network::Mainnet).unwrap_err(),
            Error::PrivatePublicMismatch
        );
        assert!(serialize(&public, KeyKind::Public, Network::Mainnet).is_ok());
    }

    #[test]
    fn test_corrupted_checksum() {
        let mut corrupted = XPRV.to_string();
        corrupted.pop();
        corrupted.push('L');
        assert_eq!(
            decode(&corrupted).unwrap_err(),
            Error::Encoding(arbor_core::Error::InvalidChecksum)
        );
    }

    #[test]
    fn test_deserialize_wrong_length() {
        assert_eq!(
            deserialize(&[0u8; 77]).unwrap_err(),
            Error::Import(ImportError::InvalidLength(77))
        );
    }

    #[test]
    fn test_deserialize_unknown_version() {
        let mut bytes = *serialize(&master(), KeyKind::Public, Network::Mainnet).unwrap();
        bytes[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(
            deserialize(&bytes).unwrap_err(),
            Error::Import(ImportError::UnknownVersion([0xde, 0xad, 0xbe, 0xef]))
        );
    }

    #[test]
    fn test_deserialize_kind_mismatch() {
        let mut bytes = *serialize(&master(), KeyKind::Public, Network::Mainnet).unwrap();
        bytes[..4].copy_from_slice(&Network::Mainnet.extended_version(KeyKind::Private));
        assert_eq!(
            deserialize(&bytes).unwrap_err(),
            Error::Import(ImportError::InvalidKeyPrefix(0x03))
        );
    }

    #[test]
    fn test_deserialize_zero_depth_checks() {
        let mut bytes = *serialize(&master(), KeyKind::Public, Network::Mainnet).unwrap();
        bytes[5] = 1;
        assert_eq!(
            deserialize(&bytes).unwrap_err(),
            Error::Import(ImportError::ZeroDepthParentFingerprint)
        );
        bytes[5] = 0;
        bytes[12] = 1;
        assert_eq!(
            deserialize(&bytes).unwrap_err(),
            Error::Import(ImportError::ZeroDepthIndex)
        );
    }

    #[test]
    fn test_deserialize_private_key_out_of_range() {
        let mut bytes = *serialize(&master(), KeyKind::Private, Network::Mainnet).unwrap();
        bytes[46..].copy_from_slice(&[0u8; 32]);
        assert_eq!(
            deserialize(&bytes).unwrap_err(),
            Error::Import(ImportError::InvalidPrivateKey)
        );
    }

    #[test]
    fn test_imported_public_cannot_harden() {
        let node = Node::from_bip32(XPUB).unwrap();
        assert!(!node.has_private_key());
        assert_eq!(
            node.derive_child(0x8000_0000).unwrap_err(),
            Error::Derivation(DerivationError::HardenedFromPublic { index: 0x8000_0000 })
        );
    }
}
