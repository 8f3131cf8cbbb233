//! `arbor new`: create a master node.

use arbor::Master;
use clap::Args;
use colored::Colorize;
use tracing::debug;

use super::{network, print_node};

/// Create a master node from a random or supplied seed.
#[derive(Args)]
pub struct NewCommand {
    /// Use testnet instead of mainnet.
    #[arg(short, long)]
    testnet: bool,

    /// Hex-encoded seed of 16 to 64 bytes. A random 32-byte seed is used when omitted.
    #[arg(short, long)]
    seed_hex: Option<String>,

    /// Derivation path to print below the master, e.g. `m/0'/1` or `M/0/1`.
    #[arg(short, long)]
    path: Option<String>,
}

impl NewCommand {
    /// Execute the command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let network = network(self.testnet);
        let master = match self.seed_hex.as_deref() {
            Some(seed_hex) => Master::from_seed_hex(seed_hex)?,
            None => {
                debug!("no seed supplied, generating one");
                Master::generate()?
            }
        };

        print_master(&master, network);
        print_node("m", &master, network)?;

        if let Some(path) = self.path {
            let node = master.node_for_path(&path)?;
            print_node(&path, &node, network)?;
        }

        Ok(())
    }
}

#[rustfmt::skip]
fn print_master(master: &Master, network: arbor::Network) {
    println!();
    println!("      {}       {}", "Network".cyan().bold(), network);
    if let Some(seed_hex) = master.seed_hex() {
        println!("      {}          {}", "Seed".cyan().bold(), seed_hex.as_str());
    }
    println!();
}
