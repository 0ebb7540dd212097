//! General application settings.

use crate::config::EnvSource;
use crate::error::ConfigError;

pub const USE_MOCK_GREETING_KEYS: &[&str] = &["GREETING_API_USE_MOCK_GREETING", "USE_MOCK_GREETING"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSettings {
    pub app_name: String,
    pub app_version: String,
    /// Selects the mock greeter instead of the production one.
    pub use_mock_greeting: bool,
    pub host: String,
    pub port: u16,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            app_name: "Greeting API".into(),
            app_version: "0.1.0".into(),
            use_mock_greeting: false,
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

impl AppSettings {
    pub fn from_source(source: &EnvSource) -> Result<Self, ConfigError> {
        let defaults = AppSettings::default();
        Ok(AppSettings {
            app_name: source.string(&["APP_NAME"], &defaults.app_name),
            app_version: source.string(&["APP_VERSION"], &defaults.app_version),
            use_mock_greeting: source.flag(USE_MOCK_GREETING_KEYS, defaults.use_mock_greeting)?,
            host: source.string(&["APP_HOST"], &defaults.host),
            port: source.parse(&["APP_PORT"], defaults.port)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let settings = AppSettings::from_source(&EnvSource::default()).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn reads_toggle_through_alias() {
        let source = EnvSource::from_pairs([("USE_MOCK_GREETING", "true"), ("APP_NAME", "demo")]);
        let settings = AppSettings::from_source(&source).unwrap();
        assert!(settings.use_mock_greeting);
        assert_eq!(settings.app_name, "demo");
    }

    #[test]
    fn rejects_non_integer_port() {
        let source = EnvSource::from_pairs([("APP_PORT", "eighty")]);
        assert!(matches!(
            AppSettings::from_source(&source),
            Err(ConfigError::Invalid { key: "APP_PORT", .. })
        ));
    }
}
