//! Server configuration from the environment
//!
//! | Variable                   | Default                  |
//! |----------------------------|--------------------------|
//! | `DATABASE_URL`             | unset: in-memory stores  |
//! | `DATABASE_MAX_CONNECTIONS` | `5`                      |
//! | `JWT_SECRET`               | required in release      |
//! | `PASSWORD_PEPPER`          | unset                    |
//! | `BIND_ADDR`                | `0.0.0.0`                |
//! | `PORT`                     | `5000`                   |
//! | `FRONTEND_ORIGINS`         | local Vite dev server    |

use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use auth::AuthConfig;
use orders::OrderConfig;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub orders: OrderConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let auth = match get("JWT_SECRET") {
            Some(secret) => AuthConfig::new(secret.into_bytes()),
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using a random secret");
                AuthConfig::with_random_secret()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        }
        .with_pepper(get("PASSWORD_PEPPER").map(String::into_bytes));

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            bind_addr: parse_or(
                "BIND_ADDR",
                get("BIND_ADDR"),
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            )?,
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            frontend_origins,
            auth,
            orders: OrderConfig::default(),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
