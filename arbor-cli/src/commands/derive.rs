//! `arbor derive`: walk a path from an imported extended key.

use arbor::extended;
use clap::Args;
use colored::Colorize;

use super::print_node;

/// Import an extended key and derive along a path.
#[derive(Args)]
pub struct DeriveCommand {
    /// Extended key (xprv, xpub, tprv or tpub).
    #[arg(short, long)]
    key: String,

    /// Path from the imported node. Relative paths like `0/1` are accepted.
    #[arg(short, long, default_value = "m")]
    path: String,
}

impl DeriveCommand {
    /// Execute the command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let (node, network) = extended::decode(&self.key)?;
        let derived = node.node_for_path(&self.path)?;

        println!();
        println!("      {}       {}", "Network".cyan().bold(), network);
        println!();
        print_node(&self.path, &derived, network)?;

        Ok(())
    }
}
