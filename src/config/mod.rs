//! Relay configuration.
//!
//! Listener settings come from optional `configuration` files and
//! `APP__`-prefixed environment variables; secrets and paths are read from
//! the environment directly. In production every value must be explicit.

use std::env;

use anyhow::Context;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub http: HttpConfig,
    pub gemini_api_key: String,
    pub static_dir: String,
}

impl RelayConfig {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let http = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()
            .context("failed to load configuration")?
            .try_deserialize::<HttpConfig>()
            .context("failed to deserialize configuration")?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(RelayConfig {
            http,
            gemini_api_key: get_env("GEMINI_API_KEY", None, is_prod)?,
            static_dir: get_env("STATIC_DIR", Some("public"), is_prod)?,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> anyhow::Result<String> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                ))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(anyhow::anyhow!("{} is required but not set", key))
            }
        }
    }
}
