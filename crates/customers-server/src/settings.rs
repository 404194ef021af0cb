//! Runtime server configuration.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Runtime server configuration, deserialised from defaults, an optional
/// `config.toml`, and `CUSTOMERS_*` environment variables, in that order.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer the configuration sources. A missing file is not an error.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "customers.db")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("CUSTOMERS"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
