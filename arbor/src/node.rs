//! Key nodes and child key derivation (BIP-32).
//!
//! A [`Node`] is immutable. Every derivation returns a fresh node and leaves the
//! parent untouched, so one ancestor can be shared freely between threads.

use core::fmt;
use core::ops::Deref;

use arbor_core::Secret32;
use arbor_core::hash::hmac_sha512;
use k256::elliptic_curve::rand_core::CryptoRngCore;
use tracing::{debug, error, instrument, warn};
use zeroize::Zeroizing;

use crate::curve::{CurveArithmetic, Secp256k1};
use crate::error::{DerivationError, Error, Result};
use crate::extended;
use crate::network::{KeyKind, Network};
use crate::path::{ChildNumber, DerivationPath};
use crate::private_key::PrivateKey;
use crate::public_key::PublicKey;

/// HMAC key for master key generation.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";
/// Accepted seed lengths in bytes.
const SEED_LEN_RANGE: core::ops::RangeInclusive<usize> = 16..=64;
/// Length of a freshly generated seed.
const GENERATED_SEED_LEN: usize = 32;

/// Chain code mixed into every derivation step.
pub type ChainCode = Secret32;

/// Key material held by a node.
#[derive(Clone, PartialEq, Eq)]
pub enum NodeKey {
    /// Private scalar plus its public point.
    Private {
        /// Secret scalar `d`.
        private_key: PrivateKey,
        /// `d·G`
        public_key: PublicKey,
    },
    /// Public point only. Hardened children and private serialization are unavailable.
    Public(PublicKey),
}

impl NodeKey {
    fn from_private(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self::Private {
            private_key,
            public_key,
        }
    }

    fn public_key(&self) -> &PublicKey {
        match self {
            Self::Private { public_key, .. } | Self::Public(public_key) => public_key,
        }
    }
}

/// One node of the derivation tree.
#[derive(Clone, PartialEq, Eq)]
pub struct Node {
    depth: u8,
    index: u32,
    parent_fingerprint: [u8; 4],
    chain_code: ChainCode,
    key: NodeKey,
}

impl Node {
    pub(crate) fn from_parts(
        depth: u8,
        index: u32,
        parent_fingerprint: [u8; 4],
        chain_code: ChainCode,
        key: NodeKey,
    ) -> Self {
        Self {
            depth,
            index,
            parent_fingerprint,
            chain_code,
            key,
        }
    }

    /// Import a serialized extended key (`xprv`, `xpub`, `tprv` or `tpub`).
    pub fn from_bip32(encoded: &str) -> Result<Self> {
        extended::decode(encoded).map(|(node, _)| node)
    }

    /// Depth in the tree, 0 for a master node.
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Child index that produced this node.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Whether this node is a hardened child (`index >= 2^31`).
    pub const fn is_hardened(&self) -> bool {
        self.index >= ChildNumber::HARDENED_OFFSET
    }

    /// Fingerprint of the parent, zero for a master node.
    pub const fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Parent fingerprint as hex.
    pub fn parent_fingerprint_hex(&self) -> String {
        hex::encode(self.parent_fingerprint)
    }

    /// Chain code bytes.
    pub fn chain_code(&self) -> &[u8; 32] {
        self.chain_code.as_bytes()
    }

    /// Chain code as hex.
    pub fn chain_code_hex(&self) -> String {
        hex::encode(self.chain_code.as_bytes())
    }

    /// Key material.
    pub const fn key(&self) -> &NodeKey {
        &self.key
    }

    /// Private key, if this node has one.
    pub const fn private_key(&self) -> Option<&PrivateKey> {
        match &self.key {
            NodeKey::Private { private_key, .. } => Some(private_key),
            NodeKey::Public(_) => None,
        }
    }

    /// Whether private key material is present.
    pub const fn has_private_key(&self) -> bool {
        matches!(self.key, NodeKey::Private { .. })
    }

    /// Public key, always present.
    pub fn public_key(&self) -> &PublicKey {
        self.key.public_key()
    }

    /// HASH160 of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        self.public_key().identifier()
    }

    /// Identifier as hex.
    pub fn identifier_hex(&self) -> String {
        hex::encode(self.identifier())
    }

    /// First four bytes of the identifier.
    pub fn fingerprint(&self) -> [u8; 4] {
        self.public_key().fingerprint()
    }

    /// Fingerprint as hex.
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint())
    }

    /// A copy of this node without private material.
    pub fn to_public(&self) -> Self {
        Self {
            key: NodeKey::Public(self.public_key().clone()),
            chain_code: self.chain_code.clone(),
            ..*self
        }
    }

    /// Derive the child at raw index `index`.
    ///
    /// Indices `>= 2^31` are hardened and need a private key. A child whose
    /// `I_L` is not below the curve order, or whose key would be zero or the
    /// point at infinity, is reported as [`DerivationError::InvalidChild`];
    /// the next index is never tried silently.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        if self.depth == u8::MAX {
            return Err(DerivationError::MaxDepthExceeded.into());
        }

        let hardened = index >= ChildNumber::HARDENED_OFFSET;
        debug!(depth = self.depth + 1, index, hardened, "deriving child");

        // 0x00 || ser256(d) || ser32(i) or serP(K) || ser32(i)
        let mut data = Zeroizing::new([0u8; 37]);
        match (&self.key, hardened) {
            (NodeKey::Private { private_key, .. }, true) => {
                data[1..33].copy_from_slice(&private_key.to_bytes()[..]);
            }
            (NodeKey::Public(_), true) => {
                return Err(DerivationError::HardenedFromPublic { index }.into());
            }
            (key, false) => data[..33].copy_from_slice(&key.public_key().to_bytes()),
        }
        data[33..].copy_from_slice(&index.to_be_bytes());

        let i = hmac_sha512(self.chain_code.as_bytes(), &[data.as_slice()])?;
        let (il, chain_code) = split_hmac(&i);

        let invalid_child = || {
            warn!(index, "derived key is invalid for this index");
            Error::from(DerivationError::InvalidChild(index))
        };

        let tweak = Secp256k1::scalar_from_bytes(&il).ok_or_else(invalid_child)?;

        let key = match &self.key {
            NodeKey::Private { private_key, .. } => {
                let child = Secp256k1::scalar_add(&tweak, &private_key.scalar())
                    .ok_or_else(invalid_child)?;
                NodeKey::from_private(PrivateKey::from_scalar(child))
            }
            NodeKey::Public(public_key) => {
                let tweak_point = Secp256k1::scalar_base_mul(&tweak);
                let child = Secp256k1::point_add(&tweak_point, public_key.point())
                    .map_err(|_| {
                        error!(index, "public derivation reached the point at infinity");
                        invalid_child()
                    })?;
                NodeKey::Public(PublicKey::from_point(child))
            }
        };

        Ok(Self {
            depth: self.depth + 1,
            index,
            parent_fingerprint: self.fingerprint(),
            chain_code,
            key,
        })
    }

    /// Walk a parsed path from this node.
    ///
    /// The result is stripped of private material when the path asks for a
    /// public result; intermediate steps are unaffected.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let node = path
            .segments()
            .iter()
            .try_fold(self.clone(), |node, segment| node.derive_child(segment.index()))?;

        if path.wants_public() {
            Ok(node.to_public())
        } else {
            Ok(node)
        }
    }

    /// Parse `path` and walk it from this node.
    ///
    /// Accepts `m/...`, `M/...`, relative paths like `1/1/1`, the `.pub` suffix,
    /// and the hardening markers `'`, `p` and `h`.
    #[instrument(level = "debug", skip(self), err)]
    pub fn node_for_path(&self, path: &str) -> Result<Self> {
        let path = DerivationPath::parse(path)?;
        self.derive_path(&path)
    }

    /// The 78-byte extended key layout, hex-encoded.
    pub fn to_serialized_hex(&self, kind: KeyKind, network: Network) -> Result<Zeroizing<String>> {
        let bytes = extended::serialize(self, kind, network)?;
        Ok(Zeroizing::new(hex::encode(bytes.as_slice())))
    }

    /// Base58Check extended key.
    pub fn to_bip32(&self, kind: KeyKind, network: Network) -> Result<Zeroizing<String>> {
        extended::encode(self, kind, network)
    }

    /// Extended public key, always available.
    pub fn to_xpub(&self, network: Network) -> String {
        extended::encode_public(self, network)
    }

    /// Legacy address of the public key.
    pub fn to_address(&self, network: Network, compressed: bool) -> String {
        self.public_key().to_address(network, compressed)
    }

    /// P2WPKH-in-P2SH address of the public key.
    pub fn to_p2wpkh_p2sh(&self, network: Network) -> String {
        self.public_key().to_p2wpkh_p2sh(network)
    }

    /// Native SegWit address of the public key.
    pub fn to_bech32(&self, network: Network) -> Result<String> {
        self.public_key().to_bech32(network)
    }
}

/// Split `I` into `I_L` and the chain code `I_R`.
fn split_hmac(i: &[u8; 64]) -> (Zeroizing<[u8; 32]>, ChainCode) {
    let mut il = Zeroizing::new([0u8; 32]);
    il.copy_from_slice(&i[..32]);
    let mut ir = [0u8; 32];
    ir.copy_from_slice(&i[32..]);
    (il, ChainCode::new(ir))
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("depth", &self.depth)
            .field("index", &self.index)
            .field("parent_fingerprint", &self.parent_fingerprint_hex())
            .field("fingerprint", &self.fingerprint_hex())
            .field("chain_code", &"[REDACTED]")
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private { public_key, .. } => f
                .debug_struct("Private")
                .field("private_key", &"[REDACTED]")
                .field("public_key", &public_key.to_hex(true))
                .finish(),
            Self::Public(public_key) => f
                .debug_tuple("Public")
                .field(&public_key.to_hex(true))
                .finish(),
        }
    }
}

/// Root of a derivation tree.
///
/// Derefs to its [`Node`], so every node operation is available directly.
#[derive(Clone)]
pub struct Master {
    seed: Option<Zeroizing<Vec<u8>>>,
    node: Node,
}

impl Master {
    /// Create a master node from a seed of 16 to 64 bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if !SEED_LEN_RANGE.contains(&seed.len()) {
            return Err(Error::InvalidSeedLength(seed.len()));
        }

        let i = hmac_sha512(MASTER_HMAC_KEY, &[seed])?;
        let (il, chain_code) = split_hmac(&i);
        let private_key = PrivateKey::from_bytes(&il[..])
            .map_err(|_| Error::from(DerivationError::InvalidMasterKey))?;

        debug!(seed_len = seed.len(), "created master node from seed");
        Ok(Self {
            seed: Some(Zeroizing::new(seed.to_vec())),
            node: Self::root(NodeKey::from_private(private_key), chain_code),
        })
    }

    /// Create a master node from a hex-encoded seed.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self> {
        let seed = Zeroizing::new(hex::decode(seed_hex.trim())?);
        Self::from_seed(&seed)
    }

    /// Create a master node from a random 32-byte seed.
    pub fn random(rng: &mut impl CryptoRngCore) -> Result<Self> {
        let mut seed = Zeroizing::new([0u8; GENERATED_SEED_LEN]);
        rng.fill_bytes(&mut seed[..]);
        Self::from_seed(&seed[..])
    }

    /// Create a master node from a random seed drawn from the operating system RNG.
    #[cfg(feature = "rand")]
    pub fn generate() -> Result<Self> {
        Self::random(&mut rand_core::OsRng)
    }

    /// Create a master node from an existing private key and chain code.
    pub fn from_private_key(private_key: PrivateKey, chain_code: [u8; 32]) -> Self {
        Self {
            seed: None,
            node: Self::root(NodeKey::from_private(private_key), ChainCode::new(chain_code)),
        }
    }

    /// Create a public-only master node from a public key and chain code.
    pub fn from_public_key(public_key: PublicKey, chain_code: [u8; 32]) -> Self {
        Self {
            seed: None,
            node: Self::root(NodeKey::Public(public_key), ChainCode::new(chain_code)),
        }
    }

    fn root(key: NodeKey, chain_code: ChainCode) -> Node {
        Node::from_parts(0, 0, [0u8; 4], chain_code, key)
    }

    /// Seed bytes, if the master was built from a seed.
    pub fn seed(&self) -> Option<&[u8]> {
        self.seed.as_deref().map(Vec::as_slice)
    }

    /// Seed as hex, if the master was built from a seed.
    pub fn seed_hex(&self) -> Option<Zeroizing<String>> {
        self.seed().map(|seed| Zeroizing::new(hex::encode(seed)))
    }

    /// The master node.
    pub const fn node(&self) -> &Node {
        &self.node
    }

    /// Consume the master and keep only its node.
    pub fn into_node(self) -> Node {
        self.node
    }
}

impl Deref for Master {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

impl fmt::Debug for Master {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Master")
            .field("seed", &self.seed.as_ref().map(|_| "[REDACTED]"))
            .field("node", &self.node)
            .finish()
    }
}
