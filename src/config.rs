//! Configuration loading.
//!
//! Settings come from an optional TOML file, `scim2-cli.toml` in the current
//! working directory by default. Command-line options override the file.
//!
//! ```toml
//! url = "https://scim.example.com/scim/v2"
//! timeout_secs = 10
//! discover = false
//! schemas = "schemas.json"
//!
//! [headers]
//! Authorization = "Bearer xxxx"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "scim2-cli.toml";

/// Main configuration. Every field has a default so the file can be
/// omitted entirely.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// SCIM server base URL.
    pub url: Option<String>,
    /// Extra request headers, by name.
    pub headers: BTreeMap<String, String>,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Build the resource registry from the server's discovery endpoints.
    pub discover: bool,
    /// JSON file with schema documents to build the registry from.
    pub schemas: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: None,
            headers: BTreeMap::new(),
            timeout_secs: 30,
            discover: false,
            schemas: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try [`DEFAULT_CONFIG_FILE`] in the current
    ///    directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use scim2_cli::config::Config;
    ///
    /// let config = Config::load(None)?;
    /// # Ok::<(), String>(())
    /// ```
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let config: Config = toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// Headers from the file followed by `extra`; later entries win.
    pub fn merged_headers(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, value) in extra {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        headers
    }
}
