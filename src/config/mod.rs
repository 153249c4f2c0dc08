//! Configuration for the Sova STT provider
//!
//! The only host-facing option is the recognition server base URL. It can
//! come from a YAML file, from the `SOVA_STT_SERVER` environment variable or
//! from a `.env` file (loaded into the environment by `main.rs`).
//!
//! Priority (highest to lowest):
//! 1. Explicit value (the `--server` CLI flag)
//! 2. YAML file `server` key
//! 3. Environment variables (actual ENV vars override .env values)
//!
//! # Example
//! ```rust,no_run
//! use sova_stt::config::SovaConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = SovaConfig::from_env()?;
//!
//! // Load from YAML file with environment variable fallback
//! let config_path = PathBuf::from("config.yaml");
//! let config = SovaConfig::from_file(&config_path)?;
//!
//! println!("Recognizing via {}", config.server);
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::Path;

mod yaml;

pub use yaml::{PlatformYaml, YamlConfig};

use crate::core::stt::{STTError, SovaSTTConfig};
use crate::utils::validate_server_url;

/// Environment variable holding the recognition server base URL
pub const SERVER_ENV_VAR: &str = "SOVA_STT_SERVER";

/// Host configuration for the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SovaConfig {
    /// Normalized server base URL (no trailing slash)
    pub server: String,
}

impl SovaConfig {
    /// Build a configuration from an explicit server URL
    pub fn new(server: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let server = validate_server_url(server)
            .map_err(|e| format!("Invalid server URL '{}': {e}", server.trim()))?;
        Ok(Self { server })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::resolve(None, None)
    }

    /// Load configuration from a YAML file, falling back to the environment
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Neither the file nor the environment names a server
    /// - The resulting URL is not a valid server base URL
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::resolve(None, Some(path))
    }

    /// Resolve the server from every source in priority order
    pub fn resolve(
        explicit: Option<&str>,
        path: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(server) = explicit {
            return Self::new(server);
        }

        if let Some(path) = path {
            let yaml_config = YamlConfig::from_file(path)?;
            if let Some(server) = yaml_config.server() {
                return Self::new(server);
            }
        }

        match env::var(SERVER_ENV_VAR) {
            Ok(server) if !server.trim().is_empty() => Self::new(&server),
            _ => Err(format!(
                "No recognition server configured. Set `server` in the YAML file or {SERVER_ENV_VAR}"
            )
            .into()),
        }
    }

    /// Provider configuration with default request budget
    pub fn provider_config(&self) -> Result<SovaSTTConfig, STTError> {
        SovaSTTConfig::new(&self.server)
    }
}
