use anyhow::Result;
use std::env;
use crate::constants::{is_truthy, DEFAULT_MAX_FIRST_DEGREE_FRIENDS, DEFAULT_SERVER_PORT};
use crate::services::{EngineSettings, LifecyclePolicy};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_first_degree_friends: usize,
    /// Whether a host may still cancel once everyone has accepted
    pub allow_cancel_confirmed: bool,
    pub allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            max_first_degree_friends: env::var("MAX_FIRST_DEGREE_FRIENDS")
                .unwrap_or_else(|_| DEFAULT_MAX_FIRST_DEGREE_FRIENDS.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_FIRST_DEGREE_FRIENDS),
            allow_cancel_confirmed: env::var("ALLOW_CANCEL_CONFIRMED")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            allowed_origins: env::var("ALLOWED_ORIGINS").ok(),
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            max_first_degree_friends: self.max_first_degree_friends,
            lifecycle: LifecyclePolicy {
                allow_cancel_confirmed: self.allow_cancel_confirmed,
            },
        }
    }
}
