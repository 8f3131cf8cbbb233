//! CLI command definitions and handlers.

mod derive;
mod key;
mod new;

use arbor::{ChildNumber, KeyKind, Network, Node};
use clap::{Parser, Subcommand};
use colored::Colorize;
pub use derive::DeriveCommand;
pub use key::KeyCommand;
pub use new::NewCommand;

/// Arbor - hierarchical-deterministic key derivation for Bitcoin.
#[derive(Parser)]
#[command(name = "arbor")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log derivation steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a master node from a random or supplied seed.
    New(NewCommand),

    /// Import an extended key and derive along a path.
    Derive(DeriveCommand),

    /// Import a single private key (WIF or hex) and print its addresses.
    Key(KeyCommand),
}

const fn network(testnet: bool) -> Network {
    if testnet {
        Network::Testnet
    } else {
        Network::Mainnet
    }
}

fn index_label(index: u32) -> String {
    if index >= ChildNumber::HARDENED_OFFSET {
        format!("{}'", index - ChildNumber::HARDENED_OFFSET)
    } else {
        index.to_string()
    }
}

#[rustfmt::skip]
fn print_node(path: &str, node: &Node, network: Network) -> Result<(), Box<dyn std::error::Error>> {
    println!("      {}          {}", "Path".cyan().bold(), path);
    println!("      {}         {}", "Depth".cyan().bold(), node.depth());
    println!("      {}         {}", "Index".cyan().bold(), index_label(node.index()));
    println!("      {}   {}", "Fingerprint".cyan().bold(), node.fingerprint_hex());
    println!("      {}     {}", "Parent FP".cyan().bold(), node.parent_fingerprint_hex().dimmed());
    println!("      {}    {}", "Chain Code".cyan().bold(), node.chain_code_hex().dimmed());
    println!("      {}    {}", "Public Key".cyan().bold(), node.public_key().to_hex(true).dimmed());
    println!("      {}          {}", "xpub".cyan().bold(), node.to_xpub(network));
    if node.has_private_key() {
        println!("      {}          {}", "xprv".cyan().bold(), node.to_bip32(KeyKind::Private, network)?.as_str());
    }
    println!("      {}        {}", "Legacy".cyan().bold(), node.to_address(network, true).green());
    println!("      {}        {}", "SegWit".cyan().bold(), node.to_p2wpkh_p2sh(network).green());
    println!("      {} {}", "Native SegWit".cyan().bold(), node.to_bech32(network)?.green());
    println!();

    Ok(())
}
