use std::net::SocketAddr;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[cfg(feature = "logging")]
use tracing_subscriber::filter::LevelFilter;

/// Database configuration.
#[derive(Deserialize)]
pub struct Database {
    /// Database URL string.
    pub url: String,
}

/// HTTP server configuration.
#[derive(Deserialize)]
pub struct Server {
    /// Address, that HTTP server will listen on.
    pub address: SocketAddr,
}

/// Implementation of [`serde`]'s deserializer for [`FromStr`] types.
#[cfg(feature = "logging")]
fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error,
    D: serde::de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
}

/// Logging configuration.
#[cfg(feature = "logging")]
#[derive(Deserialize)]
pub struct Logging {
    /// Log level.
    #[serde(deserialize_with = "deserialize_from_str")]
    pub level: LevelFilter,
}

#[cfg(feature = "logging")]
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
        }
    }
}

/// Payment processor configuration.
#[derive(Deserialize)]
pub struct Payments {
    /// Secret API key used for outbound checkout session calls.
    pub secret_key: String,

    /// Signing secret used to verify inbound webhook notifications.
    pub webhook_secret: String,
}

/// Outbound mail configuration.
#[derive(Deserialize)]
pub struct Mail {
    /// SendGrid API key.
    pub api_key: String,

    /// Verified sender address.
    pub sender: String,
}

/// Frontend integration configuration.
///
/// Password reset links are rendered against the frontend base URL,
/// since reset tokens are consumed by a frontend form.
#[derive(Deserialize)]
pub struct Frontend {
    /// Base URL of the frontend deployment.
    pub base_url: String,
}

/// General configuration.
#[derive(Deserialize)]
pub struct Config {
    /// General database configuration.
    pub database: Database,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: Option<Server>,

    /// Logging configuration.
    #[cfg(feature = "logging")]
    #[serde(default)]
    pub logging: Logging,

    /// Payment processor configuration.
    #[serde(default)]
    pub payments: Option<Payments>,

    /// Outbound mail configuration.
    #[serde(default)]
    pub mail: Option<Mail>,

    /// Frontend integration configuration.
    #[serde(default)]
    pub frontend: Option<Frontend>,
}

impl Config {
    /// Create new config using default configuration file or environment variables.
    ///
    /// See [`Env`] for more details on how to use environment variables configuration.
    ///
    /// [`Env`]: figment::providers::Env
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("Config.toml"))
            .merge(Env::prefixed("CONFIG_").split("_"))
            .extract()
    }

    /// Create new config suitable for running unit tests.
    #[cfg(feature = "test-utils")]
    pub fn for_tests() -> Self {
        Self {
            database: Database {
                url: String::from("sqlite::memory:"),
            },
            server: Some(Server {
                address: "127.0.0.1:3000".parse().unwrap(),
            }),
            #[cfg(feature = "logging")]
            logging: Logging::default(),
            payments: None,
            mail: None,
            frontend: Some(Frontend {
                base_url: String::from("http://localhost:5173"),
            }),
        }
    }
}
