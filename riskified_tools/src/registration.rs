use log::*;
use rsk_common::Secret;
use url::Url;

use crate::{
    client::RiskifiedClient,
    config::GatewayConfig,
    data_objects::{NotificationWebhook, RegistrationResult, WebhookWrapper},
    transport::{HttpTransport, Transport},
    GatewayError,
    TransactionError,
};

const REGISTER_ROUTE: &str = "/webhooks/register";
const UNREGISTER_ROUTE: &str = "/webhooks/unregister";

/// Tells Riskified where to deliver decision notifications for this shop.
#[derive(Clone)]
pub struct WebhookRegistrar<T = HttpTransport> {
    shop_domain: String,
    auth_token: Secret<String>,
    client: RiskifiedClient<T>,
}

impl WebhookRegistrar<HttpTransport> {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> WebhookRegistrar<T> {
    pub fn with_transport(config: &GatewayConfig, transport: T) -> Result<Self, GatewayError> {
        let base_url = config.environment.base_url()?;
        let client = RiskifiedClient::new(base_url, config.auth_token.clone(), transport);
        Ok(Self { shop_domain: config.shop_domain.clone(), auth_token: config.auth_token.clone(), client })
    }

    pub fn client(&self) -> &RiskifiedClient<T> {
        &self.client
    }

    /// Registers `webhook` as the notification endpoint. A refusal from Riskified is returned as
    /// [`RegistrationResult::Failure`], not as an error.
    pub async fn register(&self, webhook: &Url) -> Result<RegistrationResult, TransactionError> {
        let body = self.body(Some(webhook.as_str()));
        let result = self.client.post_json::<_, RegistrationResult>(REGISTER_ROUTE, &body, false).await?;
        log_result("register", &result);
        Ok(result)
    }

    /// Removes every notification webhook registered for this shop.
    pub async fn unregister(&self) -> Result<RegistrationResult, TransactionError> {
        let body = self.body(None);
        let result = self.client.post_json::<_, RegistrationResult>(UNREGISTER_ROUTE, &body, false).await?;
        log_result("unregister", &result);
        Ok(result)
    }

    fn body<'a>(&'a self, url: Option<&'a str>) -> WebhookWrapper<'a> {
        WebhookWrapper {
            notification_webhook: NotificationWebhook {
                url,
                shop_domain: &self.shop_domain,
                auth_token: self.auth_token.reveal(),
            },
        }
    }
}

fn log_result(action: &str, result: &RegistrationResult) {
    match result {
        RegistrationResult::Success { message } => info!("🔔️ Webhook {action} succeeded. {message}"),
        RegistrationResult::Failure { message } => warn!("🔔️ Webhook {action} failed. {message}"),
    }
}

#[cfg(test)]
mod test {
    use serde_json::{json, Value};

    use super::*;
    use crate::{config::Environment, test_utils::ScriptedTransport};

    fn registrar(responses: Vec<Result<String, TransactionError>>) -> WebhookRegistrar<ScriptedTransport> {
        let config = GatewayConfig::new(Environment::Staging, "token", "shop.example.com");
        WebhookRegistrar::with_transport(&config, ScriptedTransport::with_responses(responses)).unwrap()
    }

    #[tokio::test]
    async fn register_posts_url_domain_and_token() {
        let reg = registrar(vec![Ok(r#"{"registration_result": {"message": "ok"}}"#.into())]);
        let hook = Url::parse("https://shop.example.com/notifications").unwrap();
        let result = reg.register(&hook).await.unwrap();
        assert!(result.is_successful());
        let req = &reg.client().transport().requests()[0];
        assert_eq!(req.url.as_str(), "https://s.riskified.com/webhooks/register");
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(
            body,
            json!({"notification_webhook": {
                "url": "https://shop.example.com/notifications",
                "shop_domain": "shop.example.com",
                "auth_token": "token"
            }})
        );
        assert!(rsk_common::verify_hmac("token", req.body.as_bytes(), &req.signature));
    }

    #[tokio::test]
    async fn unregister_reports_refusal() {
        let reg = registrar(vec![Ok(r#"{"error": {"message": "No webhook registered"}}"#.into())]);
        let result = reg.unregister().await.unwrap();
        assert_eq!(result, RegistrationResult::Failure { message: "No webhook registered".into() });
        let req = &reg.client().transport().requests()[0];
        assert_eq!(req.url.path(), "/webhooks/unregister");
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body, json!({"notification_webhook": {"shop_domain": "shop.example.com", "auth_token": "token"}}));
    }

    #[tokio::test]
    async fn transport_problems_are_errors() {
        let reg = registrar(vec![Err(TransactionError::Timeout("30s".into()))]);
        assert_eq!(reg.unregister().await.unwrap_err(), TransactionError::Timeout("30s".into()));
    }
}
