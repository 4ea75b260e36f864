use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::domain::error::{AppError, Result};
use crate::domain::sync_config::SyncConfig;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "catalog-sync.toml";

/// Prefix of environment overrides, e.g. `CATALOG_SYNC_DEST_LANG=de`
pub const ENV_PREFIX: &str = "CATALOG_SYNC_";

pub struct ConfigService {
    config_file: PathBuf,
}

impl ConfigService {
    pub fn new(config_file: Option<&Path>) -> Self {
        Self {
            config_file: config_file
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Defaults, then the TOML file (if present), then the environment
    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(SyncConfig::default()))
            .merge(Toml::file(&self.config_file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(&self) -> Result<SyncConfig> {
        let config: SyncConfig = self.figment().extract()?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid sync config: {}", e)))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let service = ConfigService::new(Some(Path::new("/nonexistent/catalog-sync.toml")));
        let config: SyncConfig = service.figment().extract().unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "dest_lang = \"de\"\ndelimiter = \",\"\ndry_run = true").unwrap();

        let service = ConfigService::new(Some(file.path()));
        let config: SyncConfig = service.figment().extract().unwrap();

        assert_eq!(config.dest_lang, "de");
        assert_eq!(config.delimiter, ',');
        assert!(config.dry_run);
        assert_eq!(config.source_lang, "bg");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "dest_lang = \"bg\"").unwrap();

        let result = ConfigService::new(Some(file.path())).load();
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
