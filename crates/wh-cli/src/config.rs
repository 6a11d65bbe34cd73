//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wh_core::{EntryPolicy, UserId, ValidationError};

/// User assumed when neither `--user` nor the config names one.
pub const DEFAULT_USER: &str = "local";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Default user for commands run without `--user`.
    #[serde(default)]
    pub user: Option<String>,

    /// Refuse entry while the previous laborable day is incomplete.
    pub enforce_previous_day_check: bool,

    /// Require `--yes` to record on a weekend.
    pub confirm_weekend_entry: bool,

    /// Base URL of the public holiday API.
    pub holidays_api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("user", &self.user)
            .field(
                "enforce_previous_day_check",
                &self.enforce_previous_day_check,
            )
            .field("confirm_weekend_entry", &self.confirm_weekend_entry)
            .field("holidays_api_url", &self.holidays_api_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let policy = EntryPolicy::default();
        Self {
            database_path: data_dir.join("wh.db"),
            user: None,
            enforce_previous_day_check: policy.enforce_previous_day_check,
            confirm_weekend_entry: policy.confirm_weekend_entry,
            holidays_api_url: wh_holidays::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // WH_DATABASE_PATH, WH_USER, ...
        figment = figment.merge(Env::prefixed("WH_"));

        figment.extract()
    }

    /// Entry-opening checks configured for this installation.
    pub const fn policy(&self) -> EntryPolicy {
        EntryPolicy {
            enforce_previous_day_check: self.enforce_previous_day_check,
            confirm_weekend_entry: self.confirm_weekend_entry,
        }
    }

    /// Resolves the acting user: `--user`, then the configured user, then
    /// [`DEFAULT_USER`].
    pub fn resolve_user(&self, cli_user: Option<&str>) -> Result<UserId, ValidationError> {
        let name = cli_user
            .or(self.user.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_USER);
        UserId::new(name)
    }
}

/// Returns the platform-specific config directory for wh.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wh"))
}

/// Returns the platform-specific data directory for wh.
///
/// On Linux: `~/.local/share/wh`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("wh"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_dirs_data_path_ends_with_wh() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "wh");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("wh.db"));
    }

    #[test]
    fn test_default_policy_warns_and_confirms_weekends() {
        let config = Config::default();
        assert_eq!(config.policy(), EntryPolicy::default());
        assert!(!config.policy().enforce_previous_day_check);
        assert!(config.policy().confirm_weekend_entry);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
database_path = "/tmp/wh-test.db"
user = "ana"
enforce_previous_day_check = true
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/wh-test.db"));
        assert_eq!(config.user.as_deref(), Some("ana"));
        assert!(config.enforce_previous_day_check);
        assert!(config.confirm_weekend_entry);
    }

    #[test]
    fn test_resolve_user_precedence() {
        let mut config = Config::default();
        assert_eq!(config.resolve_user(None).unwrap().as_str(), DEFAULT_USER);

        config.user = Some("ana".to_string());
        assert_eq!(config.resolve_user(None).unwrap().as_str(), "ana");
        assert_eq!(config.resolve_user(Some("luis")).unwrap().as_str(), "luis");
    }

    #[test]
    fn test_debug_lists_every_field() {
        let debug = format!("{:?}", Config::default());
        assert!(debug.contains("holidays_api_url"));
        assert!(debug.contains("confirm_weekend_entry"));
    }
}
