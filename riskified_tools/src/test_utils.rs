//! A [`Transport`] that replays canned responses and records what it was asked to send.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    transport::{SignedRequest, Transport},
    TransactionError,
};

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<String, TransactionError>>>>,
    fallback: Option<Result<String, TransactionError>>,
    requests: Arc<Mutex<Vec<SignedRequest>>>,
}

impl ScriptedTransport {
    pub fn with_responses(responses: Vec<Result<String, TransactionError>>) -> Self {
        Self { responses: Arc::new(Mutex::new(responses.into())), ..Default::default() }
    }

    /// Every request that is not covered by a scripted response gets this one.
    pub fn with_fallback(mut self, response: Result<String, TransactionError>) -> Self {
        self.fallback = Some(response);
        self
    }

    pub fn requests(&self) -> Vec<SignedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn post(&self, request: SignedRequest) -> Result<String, TransactionError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Err(TransactionError::Network("No scripted response left".into())))
    }
}
