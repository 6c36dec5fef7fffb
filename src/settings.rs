//! Process settings from the environment (call `dotenvy::dotenv()` first to pick up `.env`).

use crate::error::ConfigError;
use std::str::FromStr;

const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    /// Database schema whose tables are exposed.
    pub schema: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `DATABASE_URL` wins; otherwise the URL is composed from the `DB_*` parts.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => compose_database_url(&lookup)?,
        };
        Ok(Settings {
            database_url,
            schema: lookup("DB_SCHEMA").unwrap_or_else(|| "public".into()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 3000)?,
            body_limit: parse_or(&lookup, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn compose_database_url(lookup: &impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    let database = lookup("DB_DATABASE").ok_or(ConfigError::Missing("DATABASE_URL or DB_DATABASE"))?;
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".into());
    let port: u16 = parse_or(lookup, "DB_PORT", 5432)?;
    let credentials = match (lookup("DB_USER"), lookup("DB_PASSWORD")) {
        (Some(user), Some(password)) => format!("{}:{}@", user, password),
        (Some(user), None) => format!("{}@", user),
        _ => String::new(),
    };
    Ok(format!("postgres://{}{}:{}/{}", credentials, host, port, database))
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
