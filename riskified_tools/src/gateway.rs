use log::*;

use crate::{
    client::RiskifiedClient,
    config::GatewayConfig,
    data_objects::{OrderWrapper, TransactionResult, TransactionStatus},
    orders::{Order, OrderCancellation, OrderPartialRefund, RiskOrder, ValidationMode},
    transport::{HttpTransport, Transport},
    GatewayError,
    TransactionError,
};

/// The order lifecycle events Riskified accepts, each on its own fixed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Submit,
    Cancel,
    Refund,
    Historical,
}

impl Operation {
    pub fn route(&self) -> &'static str {
        match self {
            Self::Create => "/api/create",
            Self::Update => "/api/update",
            Self::Submit => "/api/submit",
            Self::Cancel => "/api/cancel",
            Self::Refund => "/api/refund",
            Self::Historical => "/api/historical",
        }
    }

    /// Only submit requests ask Riskified to analyse the order immediately.
    pub fn is_submit(&self) -> bool {
        matches!(self, Self::Submit)
    }
}

/// What Riskified acknowledged for a single order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    /// Riskified's own id for the order.
    pub id: i64,
    pub status: TransactionStatus,
    pub description: Option<String>,
}

/// Validates, signs and sends order events to Riskified.
///
/// A gateway holds only immutable configuration, so one instance can be shared between any number of concurrent
/// callers.
#[derive(Clone)]
pub struct OrdersGateway<T = HttpTransport> {
    pub(crate) config: GatewayConfig,
    pub(crate) client: RiskifiedClient<T>,
}

impl OrdersGateway<HttpTransport> {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> OrdersGateway<T> {
    pub fn with_transport(config: GatewayConfig, transport: T) -> Result<Self, GatewayError> {
        let base_url = config.environment.base_url()?;
        info!("🛡️ Orders gateway configured for {} ({base_url})", config.environment);
        let client = RiskifiedClient::new(base_url, config.auth_token.clone(), transport);
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn client(&self) -> &RiskifiedClient<T> {
        &self.client
    }

    /// Records a new order without requesting analysis.
    pub async fn create(&self, order: &Order) -> Result<OrderReceipt, GatewayError> {
        self.send_order(order, Operation::Create).await
    }

    pub async fn update(&self, order: &Order) -> Result<OrderReceipt, GatewayError> {
        self.send_order(order, Operation::Update).await
    }

    /// Records the order and asks Riskified to analyse it now.
    pub async fn submit(&self, order: &Order) -> Result<OrderReceipt, GatewayError> {
        self.send_order(order, Operation::Submit).await
    }

    pub async fn cancel(&self, cancellation: &OrderCancellation) -> Result<OrderReceipt, GatewayError> {
        self.send_order(cancellation, Operation::Cancel).await
    }

    pub async fn partly_refund(&self, refund: &OrderPartialRefund) -> Result<OrderReceipt, GatewayError> {
        self.send_order(refund, Operation::Refund).await
    }

    async fn send_order<O: RiskOrder>(&self, order: &O, op: Operation) -> Result<OrderReceipt, GatewayError> {
        let order_id = order.order_id();
        order.validate(ValidationMode::Strict).map_err(|e| {
            debug!("🛡️ {op:?} for order {order_id} not sent. {e}");
            e
        })?;
        let body = OrderWrapper { order };
        let result = self.client.post_json::<_, TransactionResult>(op.route(), &body, op.is_submit()).await?;
        let receipt = interpret_result(result)?;
        info!("🛡️ {op:?} for order {order_id} accepted. Riskified id {}, status {}", receipt.id, receipt.status);
        Ok(receipt)
    }
}

/// A response only counts as a success if it is the success arm, carries a known status and an id.
pub fn interpret_result(result: TransactionResult) -> Result<OrderReceipt, TransactionError> {
    match result {
        TransactionResult::Failure(failure) => {
            warn!("🛡️ Riskified rejected the request. {}", failure.message);
            Err(TransactionError::Rejected(failure.message))
        },
        TransactionResult::Success(success) => {
            let status = success.status.parse::<TransactionStatus>().map_err(TransactionError::UnexpectedStatus)?;
            let id = success.id.ok_or(TransactionError::MissingOrderId)?;
            Ok(OrderReceipt { id, status, description: success.description })
        },
    }
}

#[cfg(test)]
mod test {
    use serde_json::Value;

    use super::*;
    use crate::{config::Environment, orders::test::complete_order, test_utils::ScriptedTransport};

    fn gateway(responses: Vec<Result<String, TransactionError>>) -> OrdersGateway<ScriptedTransport> {
        let _ = env_logger::try_init();
        let config = GatewayConfig::new(Environment::Sandbox, "token", "shop.example.com");
        OrdersGateway::with_transport(config, ScriptedTransport::with_responses(responses)).unwrap()
    }

    fn ok(status: &str) -> Result<String, TransactionError> {
        Ok(format!(r#"{{"order": {{"id": 4321, "status": "{status}", "description": "Under review"}}}}"#))
    }

    #[tokio::test]
    async fn create_sends_wrapped_order() {
        let gw = gateway(vec![ok("created")]);
        let receipt = gw.create(&complete_order("1001")).await.unwrap();
        assert_eq!(receipt, OrderReceipt {
            id: 4321,
            status: TransactionStatus::Created,
            description: Some("Under review".into())
        });
        let requests = gw.client().transport().requests();
        assert_eq!(requests[0].url.as_str(), "https://sandbox.riskified.com/api/create");
        assert!(!requests[0].submit);
        let body: Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["order"]["id"], "1001");
    }

    #[tokio::test]
    async fn submit_sets_submit_flag() {
        let gw = gateway(vec![ok("submitted")]);
        let receipt = gw.submit(&complete_order("1002")).await.unwrap();
        assert_eq!(receipt.status, TransactionStatus::Submitted);
        let requests = gw.client().transport().requests();
        assert!(requests[0].submit);
        assert!(requests[0].url.as_str().ends_with("/api/submit"));
    }

    #[tokio::test]
    async fn invalid_orders_are_never_sent() {
        let gw = gateway(vec![ok("created")]);
        let err = gw.update(&Order::new("1003")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(ref e) if e.order_id.as_str() == "1003"));
        assert!(gw.client().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn unexpected_status_is_a_failure() {
        let gw = gateway(vec![ok("deleted")]);
        let err = gw.create(&complete_order("1004")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transaction(TransactionError::UnexpectedStatus(ref s)) if s == "deleted"));
    }

    #[tokio::test]
    async fn missing_id_is_a_failure() {
        let gw = gateway(vec![Ok(r#"{"order": {"status": "updated"}}"#.into())]);
        let err = gw.update(&complete_order("1005")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transaction(TransactionError::MissingOrderId)));
    }

    #[tokio::test]
    async fn rejections_and_ambiguity() {
        let gw = gateway(vec![
            Ok(r#"{"error": {"message": "Order already exists"}}"#.into()),
            Ok(r#"{"order": {"id": 1, "status": "created"}, "error": {"message": "x"}}"#.into()),
        ]);
        let err = gw.create(&complete_order("1006")).await.unwrap_err();
        assert!(
            matches!(err, GatewayError::Transaction(TransactionError::Rejected(ref m)) if m == "Order already exists")
        );
        let err = gw.create(&complete_order("1006")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transaction(TransactionError::Json(_))));
    }

    #[tokio::test]
    async fn cancel_and_refund_use_their_routes() {
        use chrono::Utc;

        use crate::orders::{OrderCancellation, OrderPartialRefund, PartialRefundDetails};

        let gw = gateway(vec![ok("updated"), ok("updated")]);
        gw.cancel(&OrderCancellation::new("1007", Utc::now(), "fraud")).await.unwrap();
        let refund = OrderPartialRefund::new("1007", vec![PartialRefundDetails {
            refund_id: "r1".into(),
            refunded_at: Utc::now(),
            amount: 5.0,
            currency: "USD".into(),
            reason: "Late delivery".into(),
        }]);
        gw.partly_refund(&refund).await.unwrap();
        let routes = gw.client().transport().requests().iter().map(|r| r.url.path().to_string()).collect::<Vec<_>>();
        assert_eq!(routes, vec!["/api/cancel", "/api/refund"]);
    }

    #[test]
    fn routes() {
        assert_eq!(Operation::Historical.route(), "/api/historical");
        assert!(Operation::Submit.is_submit());
        assert!(!Operation::Create.is_submit());
    }
}
