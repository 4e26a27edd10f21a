use std::env;

use crate::constants::*;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: String,
    pub frontend_origin: String,
    pub token_expiry_days: i64,
}

impl Config {
    /// Reads `HOST`, `PORT`, `DATA_PATH`, `FRONTEND_ORIGIN` and
    /// `TOKEN_EXPIRY_DAYS`, falling back to defaults for unset variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port_raw = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let port = port_raw
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", port_raw, e))?;

        let data_path = env::var("DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
        if data_path.trim().is_empty() {
            anyhow::bail!("DATA_PATH cannot be empty");
        }

        let frontend_origin =
            env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string());

        let token_expiry_days = match env::var("TOKEN_EXPIRY_DAYS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or_else(|| anyhow::anyhow!("Invalid TOKEN_EXPIRY_DAYS '{}'", raw))?,
            Err(_) => DEFAULT_TOKEN_EXPIRY_DAYS,
        };

        Ok(Config {
            host,
            port,
            data_path,
            frontend_origin,
            token_expiry_days,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
