use log::*;
use rsk_common::{calculate_hmac, Secret};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    transport::{SignedRequest, Transport},
    TransactionError,
};

/// Serializes, signs and posts request bodies, then decodes the responses.
#[derive(Clone)]
pub struct RiskifiedClient<T> {
    base_url: Url,
    auth_token: Secret<String>,
    transport: T,
}

impl<T: Transport> RiskifiedClient<T> {
    pub fn new(mut base_url: Url, auth_token: Secret<String>, transport: T) -> Self {
        // Keeps a path prefix such as `/riskified` when routes are joined onto it
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { base_url, auth_token, transport }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url(&self, route: &str) -> Result<Url, TransactionError> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .map_err(|e| TransactionError::InvalidUrl(format!("{}{route}. {e}", self.base_url)))
    }

    pub async fn post_json<B, R>(&self, route: &str, body: &B, submit: bool) -> Result<R, TransactionError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(route)?;
        let body = serde_json::to_string(body).map_err(|e| TransactionError::Serialization(e.to_string()))?;
        let signature = calculate_hmac(self.auth_token.reveal(), body.as_bytes());
        let response = self.transport.post(SignedRequest { url, body, signature, submit }).await?;
        if response.trim().is_empty() {
            warn!("📡️ Empty response to {route}");
            return Err(TransactionError::EmptyResponse);
        }
        trace!("📡️ Response to {route}: {response}");
        serde_json::from_str(&response).map_err(|e| TransactionError::Json(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use rsk_common::verify_hmac;
    use serde_json::{json, Value};

    use super::*;
    use crate::test_utils::ScriptedTransport;

    fn client(transport: ScriptedTransport) -> RiskifiedClient<ScriptedTransport> {
        let url = Url::parse("http://riskified.test").unwrap();
        RiskifiedClient::new(url, Secret::from("s3cr3t"), transport)
    }

    #[tokio::test]
    async fn signs_the_exact_body_sent() {
        let client = client(ScriptedTransport::with_responses(vec![Ok(r#"{"ok": true}"#.into())]));
        let result: Value = client.post_json("/api/create", &json!({"order": {"id": "1"}}), false).await.unwrap();
        assert_eq!(result, json!({"ok": true}));
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.url.as_str(), "http://riskified.test/api/create");
        assert!(!req.submit);
        assert!(verify_hmac("s3cr3t", req.body.as_bytes(), &req.signature));
        assert!(!verify_hmac("other", req.body.as_bytes(), &req.signature));
    }

    #[test]
    fn routes_keep_the_base_path_prefix() {
        let transport = ScriptedTransport::default();
        let base = Url::parse("http://proxy.test/riskified").unwrap();
        let client = RiskifiedClient::new(base, Secret::from("k"), transport.clone());
        assert_eq!(client.url("/api/create").unwrap().as_str(), "http://proxy.test/riskified/api/create");
        let base = Url::parse("http://proxy.test/riskified/").unwrap();
        let client = RiskifiedClient::new(base, Secret::from("k"), transport);
        assert_eq!(client.url("webhooks/register").unwrap().as_str(), "http://proxy.test/riskified/webhooks/register");
    }

    #[tokio::test]
    async fn empty_and_garbled_responses() {
        let client =
            client(ScriptedTransport::with_responses(vec![Ok("  \n".into()), Ok("<html>oops</html>".into())]));
        let err = client.post_json::<_, Value>("/api/update", &json!({}), false).await.unwrap_err();
        assert_eq!(err, TransactionError::EmptyResponse);
        let err = client.post_json::<_, Value>("/api/update", &json!({}), false).await.unwrap_err();
        assert!(matches!(err, TransactionError::Json(_)));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let client = client(ScriptedTransport::with_responses(vec![Err(TransactionError::Network("refused".into()))]));
        let err = client.post_json::<_, Value>("/api/submit", &json!({}), true).await.unwrap_err();
        assert_eq!(err, TransactionError::Network("refused".into()));
        assert!(client.transport().requests()[0].submit);
    }
}
