//! Receiver configuration.
//!
//! | Variable                                   | Default          |
//! |--------------------------------------------|------------------|
//! | `RISKIFIED_NOTIFICATIONS_HOST`             | `127.0.0.1`      |
//! | `RISKIFIED_NOTIFICATIONS_PORT`             | `8370`           |
//! | `RISKIFIED_NOTIFICATIONS_PATH`             | `/notifications` |
//! | `RISKIFIED_NOTIFICATIONS_WORKERS`          | number of cores  |
//! | `RISKIFIED_NOTIFICATIONS_SHUTDOWN_TIMEOUT` | `30` seconds     |
//! | `RISKIFIED_AUTH_TOKEN`                     | none             |
//!
//! The auth token is the shared secret used to verify the signature on every notification.

use std::{env, time::Duration};

use log::*;
use rsk_common::{helpers::parse_seconds, Secret};
use url::Url;

use crate::errors::ServerError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8370;
const DEFAULT_PATH: &str = "/notifications";
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct ReceiverConfig {
    pub host: String,
    pub port: u16,
    /// The only path the receiver answers on. Always starts with `/`.
    pub path: String,
    pub auth_token: Secret<String>,
    /// Number of actix worker threads. `None` uses one per physical core.
    pub workers: Option<usize>,
    /// How long in-flight requests are given to complete once the receiver is stopped.
    pub shutdown_timeout: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            auth_token: Secret::default(),
            workers: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl ReceiverConfig {
    pub fn new(host: &str, port: u16, path: &str, auth_token: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            path: normalize_path(path),
            auth_token: Secret::from(auth_token),
            ..Default::default()
        }
    }

    /// Listens on the host, port and path of the webhook URL that is registered with Riskified.
    pub fn from_webhook_url(url: &Url, auth_token: &str) -> Result<Self, ServerError> {
        Self { auth_token: Secret::from(auth_token), ..Default::default() }.listen_on(url)
    }

    /// Replaces the host, port and path with those of `url`. The token, worker count and shutdown timeout are kept.
    pub fn listen_on(self, url: &Url) -> Result<Self, ServerError> {
        let host = url
            .host_str()
            .ok_or_else(|| ServerError::ConfigurationError(format!("Webhook URL {url} does not have a host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ServerError::ConfigurationError(format!("Webhook URL {url} does not have a port")))?;
        Ok(Self { host: host.to_string(), port, path: normalize_path(url.path()), ..self })
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RISKIFIED_NOTIFICATIONS_HOST").ok().unwrap_or_else(|| DEFAULT_HOST.into());
        let port = env::var("RISKIFIED_NOTIFICATIONS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RISKIFIED_NOTIFICATIONS_PORT. {e} Using the default, \
                         {DEFAULT_PORT}, instead."
                    );
                    DEFAULT_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PORT);
        let path = env::var("RISKIFIED_NOTIFICATIONS_PATH").map(|s| normalize_path(&s)).unwrap_or_else(|_| {
            info!("🪛️ RISKIFIED_NOTIFICATIONS_PATH is not set. Listening on {DEFAULT_PATH}");
            DEFAULT_PATH.into()
        });
        let auth_token = env::var("RISKIFIED_AUTH_TOKEN").ok().unwrap_or_else(|| {
            error!(
                "🪛️ RISKIFIED_AUTH_TOKEN is not set. Every notification will fail authentication until it is set to \
                 the merchant auth token."
            );
            String::default()
        });
        let workers = env::var("RISKIFIED_NOTIFICATIONS_WORKERS").ok().and_then(|s| match s.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                warn!("🪛️ Ignoring invalid RISKIFIED_NOTIFICATIONS_WORKERS value '{s}'");
                None
            },
        });
        let shutdown_timeout = env::var("RISKIFIED_NOTIFICATIONS_SHUTDOWN_TIMEOUT")
            .ok()
            .and_then(|s| {
                let timeout = parse_seconds(&s);
                if timeout.is_none() {
                    warn!("🪛️ {s} is not a valid RISKIFIED_NOTIFICATIONS_SHUTDOWN_TIMEOUT. Using the default.");
                }
                timeout
            })
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT);
        Self { host, port, path, auth_token: Secret::new(auth_token), workers, shutdown_timeout }
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
