use log::Level;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            log_level: Level::Info,
        }
    }
}

impl AppConfig {
    /// Builds the configuration from variables captured at compile time.
    ///
    /// The browser has no process environment, so `BACKEND_URL` and
    /// `LOG_LEVEL` are baked into the binary (see `build.rs` for `.env`
    /// support).
    pub fn from_env() -> Self {
        Self::from_values(option_env!("BACKEND_URL"), option_env!("LOG_LEVEL"))
    }

    fn from_values(backend_url: Option<&str>, log_level: Option<&str>) -> Self {
        let defaults = Self::default();

        let backend_url = backend_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.backend_url);

        let log_level = log_level
            .and_then(|level| level.trim().parse::<Level>().ok())
            .unwrap_or(defaults.log_level);

        Self {
            backend_url,
            log_level,
        }
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::AppConfig;

    #[test]
    fn falls_back_to_defaults() {
        let config = AppConfig::from_values(None, None);

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn strips_trailing_slash_from_backend_url() {
        let config = AppConfig::from_values(Some("https://api.example.com/"), None);

        assert_eq!(config.backend_url, "https://api.example.com");
    }

    #[test]
    fn blank_backend_url_uses_default() {
        let config = AppConfig::from_values(Some("   "), Some("debug"));

        assert_eq!(config.backend_url, AppConfig::default().backend_url);
        assert_eq!(config.log_level, Level::Debug);
    }

    #[test]
    fn unknown_log_level_uses_default() {
        let config = AppConfig::from_values(None, Some("loud"));

        assert_eq!(config.log_level, Level::Info);
    }
}
