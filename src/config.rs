use config::{Config, ConfigError, File, FileFormat};

#[derive(Clone, Debug, serde::Deserialize)]
pub struct TellerServerConfig {
    pub http: HttpConfig,
    pub debug: bool,
}

impl TellerServerConfig {
    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::new(config_path, FileFormat::Toml));

        let config: TellerServerConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

/// Configuration for the load-generating client binary. It reads the same
/// file as the server, plus the traffic mix knobs.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct TellerClientConfig {
    pub http: HttpConfig,
    pub debug: bool,
    pub tasks: u32,
    pub create_chance: u32,
    pub topup_chance: u32,
}

impl TellerClientConfig {
    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::new(config_path, FileFormat::Toml));

        let config: TellerClientConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }
}
