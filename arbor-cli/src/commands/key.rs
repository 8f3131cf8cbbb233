//! `arbor key`: inspect a single private key.

use arbor::{AddressType, Network, PrivateKey};
use clap::{Args, ValueEnum};
use colored::Colorize;

use super::network;

/// Import a single private key and print its addresses.
#[derive(Args)]
pub struct KeyCommand {
    /// Private key in WIF format or as 64 hex characters.
    #[arg(short, long)]
    key: String,

    /// Network for a hex key. A WIF key carries its own network.
    #[arg(short, long)]
    testnet: bool,

    /// Use the uncompressed public key for the legacy address and WIF.
    #[arg(short, long)]
    uncompressed: bool,

    /// Address type to print.
    #[arg(short, long, value_enum, default_value = "native-segwit")]
    address_type: CliAddressType,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliAddressType {
    /// Legacy P2PKH (starts with 1)
    Legacy,
    /// `SegWit` P2SH-P2WPKH (starts with 3)
    Segwit,
    /// Native `SegWit` P2WPKH (starts with bc1q)
    NativeSegwit,
}

impl From<CliAddressType> for AddressType {
    fn from(val: CliAddressType) -> Self {
        match val {
            CliAddressType::Legacy => Self::P2pkh,
            CliAddressType::Segwit => Self::P2shP2wpkh,
            CliAddressType::NativeSegwit => Self::P2wpkh,
        }
    }
}

impl KeyCommand {
    /// Execute the command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let input = self.key.trim();
        let (key, network) = if input.len() == 64 && input.bytes().all(|b| b.is_ascii_hexdigit())
        {
            (PrivateKey::from_hex(input)?, network(self.testnet))
        } else {
            PrivateKey::from_wif(input)?
        };
        let compressed = key.is_compressed() && !self.uncompressed;
        let address_type = AddressType::from(self.address_type);

        let public_key = key.public_key();
        let address = match address_type {
            AddressType::P2pkh => public_key.to_address(network, compressed),
            other => public_key.address(other, network)?,
        };

        print_key(&key, network, address_type, &address, compressed);
        Ok(())
    }
}

#[rustfmt::skip]
fn print_key(key: &PrivateKey, network: Network, address_type: AddressType, address: &str, compressed: bool) {
    println!();
    println!("      {}      {}", "Network".cyan().bold(), network);
    println!("      {} {}", "Address Type".cyan().bold(), address_type.name());
    println!("      {}      {}", "Address".cyan().bold(), address.green());
    println!("      {}  {}", "Private Key".cyan().bold(), key.to_wif(network, compressed).as_str());
    println!("      {}   {}", "Public Key".cyan().bold(), key.public_key().to_hex(compressed).dimmed());
    println!();
}
