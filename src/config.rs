//! Crate-level tunables (ambient): envelope magic bytes and envelope
//! version byte. Loaded via a `config::Config` builder with defaults,
//! optionally overridden by `config.toml` and environment variables.

use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Envelope and signing tunables. The defaults match the wire values
/// [`crate::envelope`] and [`crate::signing`] use when no config is loaded;
/// a non-default config only matters for a host that wants to namespace its
/// own private dialect away from the standard one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelsConfig {
    pub envelope: EnvelopeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// The 2-byte magic following `OP_FALSE OP_RETURN`.
    pub magic: [u8; 2],
    /// The envelope framing version opcode.
    pub version: u8,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        EnvelopeConfig {
            magic: crate::envelope::PROTOCOL_MAGIC,
            version: crate::envelope::ENVELOPE_VERSION,
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        ChannelsConfig { envelope: EnvelopeConfig::default() }
    }
}

impl ChannelsConfig {
    /// Loads configuration from `config.toml` (if present) and `CHANNELS_*`
    /// environment variables, falling back to the crate's own wire defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ChannelsConfig::default();
        let config = Config::builder()
            .set_default(
                "envelope.magic",
                defaults.envelope.magic.iter().map(|&b| b as i64).collect::<Vec<_>>(),
            )?
            .set_default("envelope.version", defaults.envelope.version as i64)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CHANNELS").separator("_"))
            .build()?;

        config.try_deserialize()
    }
}
