//! Configuration module for environment variable parsing.
//!
//! The one required value is the platform application's public key; a
//! gateway without it cannot authenticate anything, so its absence is a
//! startup error.

use std::env;

use ed25519_dalek::VerifyingKey;
use thiserror::Error;

/// Environment variable holding the application's hex-encoded public key.
pub const PUBLIC_KEY_VAR: &str = "DISCORD_PUBLIC_KEY";

/// Environment variable holding the development server port.
pub const PORT_VAR: &str = "PORT";

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The public key environment variable is not set.
    #[error("DISCORD_PUBLIC_KEY is not set")]
    MissingPublicKey,

    /// The public key value is not valid hex.
    #[error("public key is not valid hex: {0}")]
    PublicKeyNotHex(#[from] hex::FromHexError),

    /// The public key decoded to the wrong number of bytes.
    #[error("public key must be 32 bytes, got {0}")]
    PublicKeyLength(usize),

    /// The public key bytes are not a valid Ed25519 point.
    #[error("public key is not a valid Ed25519 key")]
    InvalidPublicKey,
}

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Verifying key for envelope signatures, as published by the platform
    /// for this application.
    pub public_key: VerifyingKey,

    /// Port for the local development server to listen on.
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var(PUBLIC_KEY_VAR).map_err(|_| ConfigError::MissingPublicKey)?;
        let public_key = parse_public_key(&raw)?;

        let port = env::var(PORT_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        Ok(Self { public_key, port })
    }
}

/// Parse a hex-encoded Ed25519 verifying key as published by the platform.
pub fn parse_public_key(raw: &str) -> Result<VerifyingKey, ConfigError> {
    let bytes = hex::decode(raw.trim())?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| ConfigError::PublicKeyLength(bytes.len()))?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| ConfigError::InvalidPublicKey)
}
