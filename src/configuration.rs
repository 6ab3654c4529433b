use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub store: StoreSettings,
    pub scraper: ScraperSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StoreSettings {
    pub csv_path: PathBuf,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScraperSettings {
    pub webdriver_url: String,
    pub listing_url: String,
    pub headless: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub listing_wait_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub detail_wait_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_pause_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_scroll_rounds: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub profile_settle_secs: u64,
    pub marker_phrase: String,
}

impl ScraperSettings {
    pub fn listing_wait(&self) -> Duration {
        Duration::from_secs(self.listing_wait_secs)
    }

    pub fn detail_wait(&self) -> Duration {
        Duration::from_secs(self.detail_wait_secs)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn profile_settle(&self) -> Duration {
        Duration::from_secs(self.profile_settle_secs)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // APP_APPLICATION__PORT=5001 sets `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
