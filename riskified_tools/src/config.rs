use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::*;
use rsk_common::{helpers::parse_seconds, Secret};
use url::Url;

use crate::{orders::ValidationMode, GatewayError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SANDBOX_URL: &str = "https://sandbox.riskified.com";
const STAGING_URL: &str = "https://s.riskified.com";
const PRODUCTION_URL: &str = "https://wh.riskified.com";

/// The Riskified deployment that orders are sent to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Sandbox,
    Staging,
    Production,
    /// Any other base URL, e.g. a local stub server.
    Custom(Url),
}

impl Environment {
    pub fn base_url(&self) -> Result<Url, GatewayError> {
        let url = match self {
            Self::Sandbox => SANDBOX_URL,
            Self::Staging => STAGING_URL,
            Self::Production => PRODUCTION_URL,
            Self::Custom(url) => return Ok(url.clone()),
        };
        Url::parse(url).map_err(|e| GatewayError::Initialization(format!("Invalid environment URL {url}. {e}")))
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Url::parse(s.trim()).map(Self::Custom).map_err(|e| format!("{s} is not an environment or URL. {e}")),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Staging => f.write_str("staging"),
            Self::Production => f.write_str("production"),
            Self::Custom(url) => write!(f, "{url}"),
        }
    }
}

/// Immutable configuration shared by every call made through a gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub environment: Environment,
    /// The merchant's auth token. It is the HMAC key for every request and is never sent in the clear.
    pub auth_token: Secret<String>,
    pub shop_domain: String,
    /// The rule set applied to historical orders. Live orders are always validated strictly.
    pub historical_validation: ValidationMode,
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            auth_token: Secret::default(),
            shop_domain: String::default(),
            historical_validation: ValidationMode::Weak,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    pub fn new(environment: Environment, auth_token: &str, shop_domain: &str) -> Self {
        Self {
            environment,
            auth_token: Secret::from(auth_token),
            shop_domain: shop_domain.to_string(),
            ..Default::default()
        }
    }

    pub fn new_from_env_or_default() -> Self {
        let environment = env::var("RISKIFIED_ENVIRONMENT")
            .map_err(|_| warn!("RISKIFIED_ENVIRONMENT not set, using the sandbox environment"))
            .and_then(|s| {
                s.parse::<Environment>().map_err(|e| warn!("🪛️ Invalid RISKIFIED_ENVIRONMENT. {e}. Using sandbox."))
            })
            .unwrap_or_default();
        let auth_token = Secret::new(env::var("RISKIFIED_AUTH_TOKEN").unwrap_or_else(|_| {
            error!("🪛️ RISKIFIED_AUTH_TOKEN is not set. Requests will not authenticate.");
            String::default()
        }));
        let shop_domain = env::var("RISKIFIED_SHOP_DOMAIN").unwrap_or_else(|_| {
            warn!("RISKIFIED_SHOP_DOMAIN not set, using (probably useless) default");
            "example.com".to_string()
        });
        let historical_validation = env::var("RISKIFIED_HISTORICAL_VALIDATION")
            .ok()
            .and_then(|s| {
                s.parse::<ValidationMode>()
                    .map_err(|e| warn!("🪛️ Invalid RISKIFIED_HISTORICAL_VALIDATION. {e}. Using weak validation."))
                    .ok()
            })
            .unwrap_or(ValidationMode::Weak);
        let request_timeout = env::var("RISKIFIED_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| {
                let timeout = parse_seconds(&s);
                if timeout.is_none() {
                    warn!("🪛️ {s} is not a valid RISKIFIED_REQUEST_TIMEOUT. Using {DEFAULT_REQUEST_TIMEOUT:?}.");
                }
                timeout
            })
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        Self { environment, auth_token, shop_domain, historical_validation, request_timeout }
    }
}
