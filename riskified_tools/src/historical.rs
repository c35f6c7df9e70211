//! Bulk import of historical orders.
//!
//! Orders are pulled lazily from the caller's source and sent [`HISTORICAL_BATCH_SIZE`] validated orders at a time,
//! so at most one batch is ever held in memory. Nothing in here fails the whole call: invalid orders and failed
//! batches are recorded per order in a [`FailedOrders`] map and the remaining orders are still sent.

use std::collections::{hash_map, HashMap};

use log::*;
use rsk_common::OrderId;

use crate::{
    data_objects::{HistoricalBatchResult, OrdersWrapper},
    gateway::{Operation, OrdersGateway},
    orders::{Order, RiskOrder},
    transport::Transport,
    TransactionError,
};

pub const HISTORICAL_BATCH_SIZE: usize = 10;

/// Failure messages keyed by order id.
///
/// Merchant ids should be unique, but if one turns up twice every message is kept rather than overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailedOrders {
    failures: HashMap<OrderId, Vec<String>>,
}

impl FailedOrders {
    pub fn record<S: Into<String>>(&mut self, order_id: OrderId, message: S) {
        self.failures.entry(order_id).or_default().push(message.into());
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&[String]> {
        self.failures.get(order_id).map(Vec::as_slice)
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.failures.contains_key(order_id)
    }

    /// The number of distinct order ids that failed.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, OrderId, Vec<String>> {
        self.failures.iter()
    }
}

/// The outcome of [`OrdersGateway::send_historical_orders`].
#[derive(Debug, Clone, Default)]
pub struct HistoricalReport {
    /// The size of every batch that Riskified accepted, in the order they were sent.
    pub batches: Vec<usize>,
    pub failed: FailedOrders,
}

impl HistoricalReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn sent_count(&self) -> usize {
        self.batches.iter().sum()
    }

    /// `None` when every order was sent.
    pub fn failed_orders(&self) -> Option<&FailedOrders> {
        if self.is_success() {
            None
        } else {
            Some(&self.failed)
        }
    }
}

impl<T: Transport> OrdersGateway<T> {
    /// Validates historical orders in the configured historical mode and sends them in batches.
    ///
    /// Each order's `financial_status` should carry its final state (paid, cancelled, chargeback, etc.).
    pub async fn send_historical_orders<I>(&self, orders: I) -> HistoricalReport
    where I: IntoIterator<Item = Order> {
        let mode = self.config.historical_validation;
        let mut orders = orders.into_iter().peekable();
        let mut batch = Vec::with_capacity(HISTORICAL_BATCH_SIZE);
        let mut report = HistoricalReport::default();
        loop {
            batch.clear();
            while batch.len() < HISTORICAL_BATCH_SIZE {
                let Some(order) = orders.next() else { break };
                match order.validate(mode) {
                    Ok(()) => batch.push(order),
                    Err(e) => {
                        debug!("📜️ Historical order {} skipped. {}", e.order_id, e.message);
                        report.failed.record(e.order_id, e.message);
                    },
                }
            }
            if !batch.is_empty() {
                match self.send_batch(&batch).await {
                    Ok(()) => report.batches.push(batch.len()),
                    Err(e) => {
                        warn!("📜️ A batch of {} historical orders failed. {e}", batch.len());
                        let message = e.to_string();
                        for order in &batch {
                            report.failed.record(order.order_id().clone(), message.clone());
                        }
                    },
                }
            }
            if batch.len() < HISTORICAL_BATCH_SIZE || orders.peek().is_none() {
                break;
            }
        }
        info!(
            "📜️ Historical import complete. {} orders sent in {} batches, {} failed",
            report.sent_count(),
            report.batches.len(),
            report.failed.len()
        );
        report
    }

    async fn send_batch(&self, batch: &[Order]) -> Result<(), TransactionError> {
        let op = Operation::Historical;
        let body = OrdersWrapper { orders: batch };
        match self.client.post_json::<_, HistoricalBatchResult>(op.route(), &body, op.is_submit()).await? {
            HistoricalBatchResult::Accepted(_) => {
                trace!("📜️ Batch of {} accepted", batch.len());
                Ok(())
            },
            HistoricalBatchResult::Rejected(e) => Err(TransactionError::Rejected(e.message)),
        }
    }
}
