use serde::Deserialize;
use std::path::Path;

use crate::core::stt::STTProvider;

/// YAML configuration structure
///
/// Two layouts are accepted. A bare key:
///
/// ```yaml
/// server: "http://192.168.1.10:8888"
/// ```
///
/// or a host-style platform list, where the first entry whose `platform`
/// names the Sova provider (any alias [`STTProvider`] accepts) wins:
///
/// ```yaml
/// stt:
///   - platform: sova_stt
///     server: "http://192.168.1.10:8888"
/// ```
///
/// The top-level `server` key takes precedence when both are present.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<String>,
    pub stt: Vec<PlatformYaml>,
}

/// One entry of the `stt:` platform list
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PlatformYaml {
    pub platform: String,
    pub server: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }

    /// Server URL declared in this file, if any
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref().or_else(|| {
            self.stt
                .iter()
                .find(|entry| entry.platform.parse::<STTProvider>().is_ok())
                .and_then(|entry| entry.server.as_deref())
        })
    }
}
