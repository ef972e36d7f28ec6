use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the three record maps are persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_items_file")]
    pub items_file: String,
    #[serde(default = "default_slots_file")]
    pub slots_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            items_file: default_items_file(),
            slots_file: default_slots_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_users_file() -> String { "users.json".into() }
fn default_items_file() -> String { "items.json".into() }
fn default_slots_file() -> String { "slots.json".into() }
fn default_log_format() -> String { "compact".into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.logging.normalize()?;
        Ok(())
    }
}

impl StorageConfig {
    /// A blank `data_dir` is filled from `SLOTKEEPER_DATA_DIR`, then the default.
    pub fn normalize_from_env(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = std::env::var("SLOTKEEPER_DATA_DIR")
                .ok()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(default_data_dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let files = [
            ("storage.users_file", &self.users_file),
            ("storage.items_file", &self.items_file),
            ("storage.slots_file", &self.slots_file),
        ];
        for (key, name) in files {
            if name.trim().is_empty() {
                return Err(anyhow!("{key} must not be empty"));
            }
            if !name.ends_with(".json") {
                return Err(anyhow!("{key} must end with .json"));
            }
        }
        if self.users_file == self.items_file
            || self.users_file == self.slots_file
            || self.items_file == self.slots_file
        {
            return Err(anyhow!("storage file names must be distinct"));
        }
        Ok(())
    }

    pub fn users_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.users_file)
    }

    pub fn items_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.items_file)
    }

    pub fn slots_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.slots_file)
    }
}

impl LoggingConfig {
    fn normalize(&mut self) -> Result<()> {
        let format = self.format.trim().to_ascii_lowercase();
        match format.as_str() {
            "" => self.format = default_log_format(),
            "compact" | "json" => self.format = format,
            other => return Err(anyhow!("logging.format must be compact or json, got {other}")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() -> Result<()> {
        let mut cfg = load_from_str("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.storage.users_file, "users.json");
        assert_eq!(cfg.storage.slots_file, "slots.json");
        assert_eq!(cfg.logging.format, "compact");
        assert!(!cfg.storage.data_dir.is_empty());
        Ok(())
    }

    #[test]
    fn paths_join_data_dir() -> Result<()> {
        let cfg = load_from_str(
            r#"
            [storage]
            data_dir = "/var/lib/slotkeeper"
            items_file = "stuff.json"
            "#,
        )?;
        assert_eq!(cfg.storage.items_path(), std::path::PathBuf::from("/var/lib/slotkeeper/stuff.json"));
        assert_eq!(cfg.storage.users_path(), std::path::PathBuf::from("/var/lib/slotkeeper/users.json"));
        Ok(())
    }

    #[test]
    fn rejects_duplicate_file_names() -> Result<()> {
        let mut cfg = load_from_str(
            r#"
            [storage]
            data_dir = "data"
            users_file = "records.json"
            items_file = "records.json"
            "#,
        )?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn rejects_non_json_file_and_unknown_format() -> Result<()> {
        let mut cfg = load_from_str("[storage]\nslots_file = \"slots.db\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[logging]\nformat = \"pretty\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[logging]\nformat = \"JSON\"\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.logging.format, "json");
        Ok(())
    }

    #[test]
    fn builtin_defaults_always_validate() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.logging.format, "compact");
        Ok(())
    }
}
