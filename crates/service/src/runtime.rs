//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the data directory exists; warn on a missing config file.
pub async fn ensure_env(config_path: &str, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(config_path, data_dir).await
}
