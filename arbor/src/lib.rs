//! Hierarchical-deterministic key derivation for Bitcoin.
//!
//! Turns a seed into a tree of secp256k1 key pairs (BIP-32) and renders any
//! node as an extended key, WIF, legacy address, nested-segwit address or
//! bech32 address.
//!
//! # Features
//!
//! - `std` (default): Enable standard library support in dependencies
//! - `rand` (default): Random seed and key generation from the OS RNG
//!
//! # Usage
//!
//! ```
//! use arbor::{KeyKind, Master, Network};
//!
//! let master = Master::from_seed_hex("000102030405060708090a0b0c0d0e0f").unwrap();
//! let node = master.node_for_path("m/0'/1/2'/2/1000000000").unwrap();
//!
//! assert_eq!(node.depth(), 5);
//! println!("{}", node.to_bip32(KeyKind::Private, Network::Mainnet).unwrap().as_str());
//! println!("{}", node.to_address(Network::Mainnet, true));
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::uninlined_format_args,
    clippy::return_self_not_must_use
)]
#![forbid(unsafe_code)]

pub mod address;
pub mod curve;
mod error;
pub mod extended;
mod network;
mod node;
pub mod path;
mod private_key;
mod public_key;

pub use address::{AddressType, ParseAddressTypeError};
pub use error::{DerivationError, Error, ImportError, Result};
pub use network::{KeyKind, Network, NetworkParams, ParseNetworkError};
pub use node::{ChainCode, Master, Node, NodeKey};
pub use path::{ChildNumber, DerivationPath, Root};
pub use private_key::PrivateKey;
pub use public_key::PublicKey;
