use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ratehawk: RatehawkConfig,
    pub tbo: TboConfig,
    pub duffel: DuffelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_hotels_table")]
    pub hotels_table: String,
}

fn default_hotels_table() -> String {
    "hotels".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RatehawkConfig {
    pub base_url: String,
    pub key_id: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TboConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DuffelConfig {
    pub base_url: String,
    pub token: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Base configuration, then the per-environment file (optional),
            // then an uncommitted local override.
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Credentials come in via CARAVAN__<SECTION>__<KEY> variables.
            .add_source(config::Environment::with_prefix("CARAVAN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
