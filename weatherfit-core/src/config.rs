use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Service configuration, constructed once at startup and passed explicitly
/// to the clients and the dispatcher. Loaded from a TOML file under the
/// platform config directory; environment variables override file values,
/// which is how hosted deployments inject secrets.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub openweather_api_key: Option<String>,

    /// Telegram bot token.
    pub telegram_bot_token: Option<String>,

    /// Public base URL for wardrobe images; item paths are joined onto it.
    pub media_base_url: Option<String>,

    /// Postgres connection string.
    pub database_url: Option<String>,
}

impl Config {
    /// Load config from disk (empty default if the file doesn't exist yet),
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherfit", "weatherfit")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply_env_overrides(&mut self) {
        for (var, field) in [
            ("OPENWEATHER_API_KEY", &mut self.openweather_api_key),
            ("TELEGRAM_BOT_TOKEN", &mut self.telegram_bot_token),
            ("MEDIA_BASE_URL", &mut self.media_base_url),
            ("DATABASE_URL", &mut self.database_url),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *field = Some(value);
                }
            }
        }
    }

    pub fn openweather_api_key(&self) -> Result<&str> {
        require(
            self.openweather_api_key.as_deref(),
            "openweather_api_key",
            "OPENWEATHER_API_KEY",
        )
    }

    pub fn telegram_bot_token(&self) -> Result<&str> {
        require(
            self.telegram_bot_token.as_deref(),
            "telegram_bot_token",
            "TELEGRAM_BOT_TOKEN",
        )
    }

    pub fn media_base_url(&self) -> Result<&str> {
        require(self.media_base_url.as_deref(), "media_base_url", "MEDIA_BASE_URL")
    }

    pub fn database_url(&self) -> Result<&str> {
        require(self.database_url.as_deref(), "database_url", "DATABASE_URL")
    }
}

fn require<'a>(value: Option<&'a str>, field: &str, env_var: &str) -> Result<&'a str> {
    value.ok_or_else(|| {
        anyhow!(
            "Missing '{field}' in configuration.\n\
             Hint: set it in {path} or export {env_var}.",
            path = Config::config_file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_values_error_with_a_hint() {
        let cfg = Config::default();

        for err in [
            cfg.openweather_api_key().unwrap_err(),
            cfg.telegram_bot_token().unwrap_err(),
            cfg.media_base_url().unwrap_err(),
            cfg.database_url().unwrap_err(),
        ] {
            assert!(err.to_string().contains("Missing"));
            assert!(err.to_string().contains("Hint"));
        }
    }

    #[test]
    fn present_values_are_returned() {
        let cfg = Config {
            openweather_api_key: Some("OW_KEY".to_string()),
            telegram_bot_token: Some("BOT_TOKEN".to_string()),
            media_base_url: Some("https://cdn.example/public".to_string()),
            database_url: Some("postgres://localhost/weatherfit".to_string()),
        };

        assert_eq!(cfg.openweather_api_key().unwrap(), "OW_KEY");
        assert_eq!(cfg.telegram_bot_token().unwrap(), "BOT_TOKEN");
        assert_eq!(cfg.media_base_url().unwrap(), "https://cdn.example/public");
        assert_eq!(cfg.database_url().unwrap(), "postgres://localhost/weatherfit");
    }

    #[test]
    fn toml_roundtrip_preserves_fields() {
        let cfg = Config {
            openweather_api_key: Some("OW_KEY".to_string()),
            telegram_bot_token: None,
            media_base_url: Some("https://cdn.example/public".to_string()),
            database_url: None,
        };

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.openweather_api_key.as_deref(), Some("OW_KEY"));
        assert!(parsed.telegram_bot_token.is_none());
        assert_eq!(parsed.media_base_url.as_deref(), Some("https://cdn.example/public"));
    }
}
