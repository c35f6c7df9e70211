use std::{future::Future, sync::Arc};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE},
    Client,
};
use rsk_common::headers::{
    ACCEPT_ENCODING_VALUE,
    ACCEPT_VALUE,
    HMAC_HEADER,
    JSON_CONTENT_TYPE,
    SHOP_DOMAIN_HEADER,
    SUBMIT_HEADER,
    SUBMIT_HEADER_VALUE,
};
use url::Url;

use crate::{config::GatewayConfig, GatewayError, TransactionError};

pub const USER_AGENT: &str = concat!("riskified_tools/", env!("CARGO_PKG_VERSION"));

/// A serialized, signed request, ready to go out on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: Url,
    pub body: String,
    /// Hex-encoded HMAC-SHA256 of `body`.
    pub signature: String,
    /// Set for submit-for-analysis requests only.
    pub submit: bool,
}

/// Issues one signed JSON POST and hands back the raw response body.
///
/// Implementations must surface every failure (connection, timeout, non-2xx status) as a [`TransactionError`].
pub trait Transport {
    fn post(&self, request: SignedRequest) -> impl Future<Output = Result<String, TransactionError>> + Send;
}

/// The reqwest-backed transport used against real Riskified environments.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING_VALUE));
        let domain = HeaderValue::from_str(&config.shop_domain)
            .map_err(|e| GatewayError::Initialization(format!("Invalid shop domain. {e}")))?;
        headers.insert(SHOP_DOMAIN_HEADER, domain);
        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;
        Ok(Self { client: Arc::new(client) })
    }
}

impl Transport for HttpTransport {
    async fn post(&self, request: SignedRequest) -> Result<String, TransactionError> {
        let SignedRequest { url, body, signature, submit } = request;
        trace!("📡️ POST {url} ({} bytes, submit: {submit})", body.len());
        let mut req = self.client.post(url.clone()).header(HMAC_HEADER, signature).body(body);
        if submit {
            req = req.header(SUBMIT_HEADER, SUBMIT_HEADER_VALUE);
        }
        let response = req.send().await.map_err(|e| {
            warn!("📡️ Request to {url} failed. {e}");
            TransactionError::from(e)
        })?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            trace!("📡️ {url} responded with {status}");
            Ok(text)
        } else {
            debug!("📡️ {url} responded with {status}. {text}");
            Err(TransactionError::Status { status: status.as_u16(), message: text })
        }
    }
}
