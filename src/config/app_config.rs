use std::path::Path;
use std::time::Duration;

use ::config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub page: PageConfig,
    pub notifier: NotifierConfig,
    pub price: PriceConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub results: ResultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub template: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    pub lifetime_ms: u64,
    pub fade_ms: u64,
    pub alert_dismiss_ms: u64,
}

impl NotifierConfig {
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn alert_dismiss(&self) -> Duration {
        Duration::from_millis(self.alert_dismiss_ms)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: 3000,
            fade_ms: 600,
            alert_dismiss_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceConfig {
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub busy_label: String,
    pub debounce_ms: u64,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            busy_label: "Searching...".to_string(),
            debounce_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipboardConfig {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsConfig {
    pub source_data: Option<String>,
}

/// Loads `Settings.toml` from the working directory, then `APP_*` overrides.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(SETTINGS_FILE)
}

/// Loads settings from `path` on top of the built-in defaults.
///
/// The file is optional: every key has a default, so a bare checkout runs
/// without one. Environment variables prefixed with `APP` win over both,
/// nested keys separated by a double underscore (`APP_NOTIFIER__LIFETIME_MS`).
pub fn load_config_from(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref().to_string_lossy().into_owned();

    let settings = Config::builder()
        .set_default("base.name", "price-compare-ui")?
        .set_default("base.version", env!("CARGO_PKG_VERSION"))?
        .set_default("page.template", "templates/index.html")?
        .set_default("notifier.lifetime_ms", 3000)?
        .set_default("notifier.fade_ms", 600)?
        .set_default("notifier.alert_dismiss_ms", 5000)?
        .set_default("price.currency", "$")?
        .set_default("search.busy_label", "Searching...")?
        .set_default("search.debounce_ms", 300)?
        .set_default("clipboard.args", Vec::<String>::new())?
        .add_source(File::new(&path, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix("APP").prefix_separator("_").separator("__"))
        .build()?;

    settings.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_apply_without_a_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("missing.toml")).unwrap();

        assert_eq!(config.notifier.lifetime(), Duration::from_millis(3000));
        assert_eq!(config.notifier.alert_dismiss(), Duration::from_millis(5000));
        assert_eq!(config.price.currency, "$");
        assert_eq!(config.search.busy_label, "Searching...");
        assert!(config.clipboard.command.is_none());
        assert!(config.results.source_data.is_none());
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[notifier]
lifetime_ms = 1500

[price]
currency = "Rs. "

[clipboard]
command = "wl-copy"
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.notifier.lifetime_ms, 1500);
        assert_eq!(config.notifier.fade_ms, 600);
        assert_eq!(config.price.currency, "Rs. ");
        assert_eq!(config.clipboard.command.as_deref(), Some("wl-copy"));
    }
}
