use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_MAX_CARDS_PER_COLUMN: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origin: String,
    pub max_cards_per_column: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or unparsable optional
    /// settings keep their defaults; an invalid column limit is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_max_connections),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            max_cards_per_column: match lookup("MAX_CARDS_PER_COLUMN") {
                Some(v) => parse_card_limit(&v)?,
                None => defaults.max_cards_per_column,
            },
        })
    }
}

fn parse_card_limit(value: &str) -> Result<usize, anyhow::Error> {
    let limit: usize = value.trim().parse().with_context(|| {
        format!("MAX_CARDS_PER_COLUMN must be a positive integer, got '{}'", value)
    })?;
    if limit == 0 {
        anyhow::bail!("MAX_CARDS_PER_COLUMN must be a positive integer, got 0");
    }
    Ok(limit)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 21547,
            database_url: "sqlite:board.db".into(),
            db_max_connections: 5,
            cors_origin: "http://localhost:21548,http://127.0.0.1:21548".into(),
            max_cards_per_column: DEFAULT_MAX_CARDS_PER_COLUMN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 21547);
        assert_eq!(config.database_url, "sqlite:board.db");
        assert_eq!(config.max_cards_per_column, DEFAULT_MAX_CARDS_PER_COLUMN);
    }

    #[test]
    fn settings_are_read_together() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite:/data/prod.db"),
            ("PORT", "8080"),
            ("MAX_CARDS_PER_COLUMN", "25"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite:/data/prod.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_cards_per_column, 25);
    }

    #[test]
    fn invalid_card_limit_is_an_error() {
        let err = config_from(&[
            ("DATABASE_URL", "sqlite:/data/prod.db"),
            ("MAX_CARDS_PER_COLUMN", "abc"),
        ])
        .unwrap_err();

        assert!(err.to_string().contains("MAX_CARDS_PER_COLUMN"));
    }

    #[test]
    fn zero_card_limit_is_rejected() {
        assert!(config_from(&[("MAX_CARDS_PER_COLUMN", "0")]).is_err());
        assert!(config_from(&[("MAX_CARDS_PER_COLUMN", "-3")]).is_err());
    }

    #[test]
    fn unparsable_port_keeps_default() {
        let config = config_from(&[("PORT", "not-a-port")]).unwrap();
        assert_eq!(config.port, 21547);
    }
}
