//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Listening socket settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// External renderer settings.
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// Listening socket settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, IPv4 or IPv6.
    pub listen: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen: "::1".to_string(), port: 5000 }
    }
}

/// External renderer settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Program invoked to draw images.
    pub program: String,
    /// Seconds before a render is abandoned.
    pub timeout_secs: u64,
    /// Answer renderer failures with 502 instead of an empty 200.
    pub strict: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self { program: "convert".to_string(), timeout_secs: 10, strict: false }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Renderer program, preferring the `PLACEHOLDER_CONVERT` environment variable.
    #[must_use]
    pub fn renderer_program(&self) -> String {
        std::env::var("PLACEHOLDER_CONVERT").unwrap_or_else(|_| self.renderer.program.clone())
    }

    /// Renderer timeout as a [`Duration`].
    #[must_use]
    pub fn renderer_timeout(&self) -> Duration {
        Duration::from_secs(self.renderer.timeout_secs)
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `PLACEHOLDER_CONFIG` environment variable
/// 3. `~/.config/placeholder/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PLACEHOLDER_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/placeholder/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/placeholder/config.toml")
    } else {
        PathBuf::from("placeholder.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.server.listen, "::1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.renderer.program, "convert");
        assert_eq!(config.renderer.timeout_secs, 10);
        assert!(!config.renderer.strict);
        assert_eq!(config.renderer_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("placeholder_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
listen = "0.0.0.0"
port = 8080

[renderer]
program = "/usr/local/bin/magick"
timeout_secs = 3
strict = true
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.renderer.program, "/usr/local/bin/magick");
        assert_eq!(config.renderer.timeout_secs, 3);
        assert!(config.renderer.strict);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.listen, "::1");
        assert_eq!(config.renderer.program, "convert");
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("placeholder_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
