use anyhow::{Context, Result};
use portfolio_catalog::{BuiltinCatalog, Catalog};
use portfolio_forms::FormConfig;
use portfolio_protocol::Theme;
use portfolio_view::ProjectorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "portfolio.toml";
pub const STORE_DIR_ENV: &str = "PORTFOLIO_STORE_DIR";

/// `portfolio.toml`. Every field is optional.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store_dir: Option<PathBuf>,
    pub search_debounce_ms: u64,
    pub draft_debounce_ms: u64,
    pub message_max_chars: usize,
    pub checklist_catalog: Option<PathBuf>,
    pub resources_catalog: Option<PathBuf>,
    pub os_theme: Option<Theme>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            search_debounce_ms: 200,
            draft_debounce_ms: 400,
            message_max_chars: 300,
            checklist_catalog: None,
            resources_catalog: None,
            os_theme: None,
        }
    }
}

impl Config {
    /// Load from `explicit` if given (it must exist), else the first of
    /// `./portfolio.toml` and the user config file that exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE_NAME)),
            dirs::config_dir().map(|dir| dir.join("portfolio").join("config.toml")),
        ];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                match Self::load(&path) {
                    Ok(config) => return Ok(config),
                    Err(err) => log::warn!("Ignoring unreadable config {}: {err:#}", path.display()),
                }
            }
        }
        Ok(Self::default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        // relative catalog paths are relative to the config file
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for catalog in [&mut config.checklist_catalog, &mut config.resources_catalog] {
            if let Some(p) = catalog.as_mut().filter(|p| p.is_relative()) {
                *p = base.join(&*p);
            }
        }
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `$PORTFOLIO_STORE_DIR`, then `store_dir`, then the user data dir.
    pub fn store_dir(&self) -> PathBuf {
        if let Some(dir) = std::env::var_os(STORE_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.store_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("portfolio")
    }

    pub fn projector(&self) -> ProjectorConfig {
        ProjectorConfig {
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }

    pub fn form(&self) -> FormConfig {
        FormConfig {
            draft_debounce: Duration::from_millis(self.draft_debounce_ms),
            max_message_chars: self.message_max_chars,
        }
    }

    pub fn catalog(&self, which: BuiltinCatalog) -> Result<Catalog> {
        let custom = match which {
            BuiltinCatalog::Checklist => self.checklist_catalog.as_deref(),
            BuiltinCatalog::Resources => self.resources_catalog.as_deref(),
        };
        let catalog = match custom {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load {} catalog", which.name()))?,
            None => which
                .load()
                .with_context(|| format!("Built-in {} catalog is invalid", which.name()))?,
        };
        log::debug!("{} catalog: {} entries", which.name(), catalog.len());
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            search_debounce_ms = 50
            message_max_chars = 120
            os_theme = "dark"
            "#,
        )
        .unwrap();
        assert_eq!(config.projector().search_debounce, Duration::from_millis(50));
        assert_eq!(config.form().max_message_chars, 120);
        assert_eq!(config.form().draft_debounce, Duration::from_millis(400));
        assert_eq!(config.os_theme, Some(Theme::Dark));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("search_debounce = 5").is_err());
    }

    #[test]
    fn relative_catalog_paths_follow_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.toml");
        std::fs::write(&path, "checklist_catalog = \"lists/steps.json\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.checklist_catalog,
            Some(dir.path().join("lists/steps.json"))
        );
    }
}
