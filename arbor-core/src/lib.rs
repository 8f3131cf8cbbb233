//! # arbor-core
//!
//! Primitives shared by the arbor HD key engine: hash functions, the
//! Base58Check and Bech32 codecs, and zeroizing secret containers.
//!
//! ## Features
//!
//! - **no_std compatible**: `alloc` is enough for every codec
//! - **Audited primitives**: RustCrypto `sha2`, `ripemd` and `hmac`
//! - **Secret hygiene**: decoded payloads and HMAC output are zeroized on drop

#![cfg_attr(not(feature = "std"), no_std)]
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
    clippy::uninlined_format_args
)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod encoding;
pub mod error;
pub mod hash;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
