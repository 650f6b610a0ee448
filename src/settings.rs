use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DESCRIPTION: &str = "Pagamento via PIX - ApaeOn";

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPago {
    pub url: String,
    pub access_token: String,
    pub description: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub mercadopago: MercadoPago,
}

impl Settings {
    /// Loads settings from defaults, an optional TOML file, `PIX_*` variables and
    /// the plain `MP_ACCESS_TOKEN` / `PORT` variables, in increasing precedence.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("mercadopago.url", "https://api.mercadopago.com")?
            .set_default("mercadopago.access_token", "")?
            .set_default("mercadopago.description", DEFAULT_DESCRIPTION)?
            .set_default("mercadopago.timeout_secs", 30)?
            .set_default("mercadopago.connect_timeout_secs", 10)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("PIX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("mercadopago.access_token", std::env::var("MP_ACCESS_TOKEN").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        config.try_deserialize()
    }
}
