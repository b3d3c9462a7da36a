//! Core codec and protocol stack for the Channels peer-to-peer signed
//! messaging protocol: a transport-agnostic, storage-agnostic library that
//! turns typed messages into signed, wrapped, bitcoin-script envelopes and
//! back. The peer-channel HTTP transport, wallet/UTXO engine, and
//! blockchain integration are external collaborators — see
//! [`transport::PeerChannelClient`] for the one boundary this crate defines
//! against them.

pub mod script;
pub mod sor;
pub mod envelope;
pub mod signing;
pub mod wrappers;
pub mod bodies;
pub mod registry;
pub mod value;
pub mod expanded_tx;
pub mod errors;
pub mod transport;
pub mod config;
pub mod logging;
pub mod cli;

pub use envelope::Envelope;
pub use errors::{ChannelsError, ChannelsResult};
pub use registry::{ProtocolRegistry, RegistryError, WrappedMessage};
