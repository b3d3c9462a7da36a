//! Thin demo CLI: exercises the codec and registry end to end so the crate
//! ships something runnable alongside the library surface.

use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "channels-core")]
#[command(about = "Channels protocol codec demo CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a secp256k1 keypair for signing demo messages
    Keygen(commands::keygen::KeygenCommand),
    /// Encode a demo body into a wrapped, optionally-signed envelope
    Encode(commands::encode::EncodeCommand),
    /// Decode a hex-encoded wire message back into its typed parts
    Decode(commands::decode::DecodeCommand),
}

pub fn run() -> anyhow::Result<()> {
    crate::logging::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Keygen(command) => command.run(),
        Commands::Encode(command) => command.run(),
        Commands::Decode(command) => command.run(),
    }
}
