use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Deserialize, Default)]
pub struct SettingsFile {
    #[serde(default)]
    pub client: ClientSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn settings_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/rancher-tools/config.toml"))
}

pub fn load_settings() -> anyhow::Result<SettingsFile> {
    let path = match settings_path() {
        Ok(p) => p,
        Err(_) => return Ok(SettingsFile::default()),
    };
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_client_table_keeps_other_defaults() {
        let s: SettingsFile = toml::from_str("[client]\npoll_interval_ms = 50\n").unwrap();
        assert_eq!(s.client.poll_interval(), Duration::from_millis(50));
        assert_eq!(s.client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let s: SettingsFile = toml::from_str("").unwrap();
        assert_eq!(s.client, ClientSettings::default());
    }
}
