use std::env;
use std::net::SocketAddr;

use crate::error::Error;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub remote_store_url: Option<String>,
    pub admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| optional(key).ok_or_else(|| Error::config_error(key));

        let database_max_connections: u32 = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .map_err(|_| Error::config_error("DATABASE_MAX_CONNECTIONS"))?,
            None => 5,
        };

        let bind_addr: SocketAddr = optional("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".into())
            .parse()
            .map_err(|_| Error::config_error("BIND_ADDR"))?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            bind_addr,
            google_maps_api_base: optional("GOOGLE_MAPS_API_BASE")
                .unwrap_or_else(|| "maps.googleapis.com".into()),
            google_maps_api_key: required("GOOGLE_MAPS_API_KEY")?,
            remote_store_url: optional("REMOTE_STORE_URL"),
            admin_email: optional("ADMIN_EMAIL"),
        })
    }
}

#[cfg(test)]
fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply() {
    let config = Config::from_lookup(lookup_from(&[
        ("DATABASE_URL", "postgresql://localhost/courier"),
        ("GOOGLE_MAPS_API_KEY", "key"),
        ("REMOTE_STORE_URL", ""),
    ]))
    .unwrap();

    assert_eq!(config.database_max_connections, 5);
    assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
    assert_eq!(config.google_maps_api_base, "maps.googleapis.com");
    assert_eq!(config.remote_store_url, None);
    assert_eq!(config.admin_email, None);
}

#[test]
fn missing_and_malformed_values() {
    let err = Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "key")])).unwrap_err();
    assert_eq!(err.message, "invalid configuration value for DATABASE_URL");

    let err = Config::from_lookup(lookup_from(&[
        ("DATABASE_URL", "postgresql://localhost/courier"),
        ("GOOGLE_MAPS_API_KEY", "key"),
        ("BIND_ADDR", "not an address"),
    ]))
    .unwrap_err();
    assert_eq!(err.message, "invalid configuration value for BIND_ADDR");

    let err = Config::from_lookup(lookup_from(&[
        ("DATABASE_URL", "postgresql://localhost/courier"),
        ("GOOGLE_MAPS_API_KEY", "key"),
        ("DATABASE_MAX_CONNECTIONS", "many"),
    ]))
    .unwrap_err();
    assert_eq!(err.code, 2);
}
