#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine;
use serde_json::Value;
use serum_client::core::config::TransportKind;
use serum_client::core::errors::SerumError;
use serum_client::core::kernel::{
    KeypairSigner, StreamOperation, Subscription, Transport, UnaryOperation,
};
use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One call seen by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub params: Value,
}

/// In-memory transport with canned responses per method
///
/// Responses are queued per JSON-RPC method name and consumed in order.
/// Every call is recorded with its JSON params.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<&'static str, VecDeque<Result<Value, SerumError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &'static str, response: Value) -> &Self {
        self.push(method, Ok(response))
    }

    pub fn fail(&self, method: &'static str, error: SerumError) -> &Self {
        self.push(method, Err(error))
    }

    fn push(&self, method: &'static str, response: Result<Value, SerumError>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .map(|call| call.params)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn unary<O: UnaryOperation>(
        &self,
        request: O::Request,
    ) -> Result<O::Response, SerumError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: O::METHOD,
            params: serde_json::to_value(&request).unwrap(),
        });

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(O::METHOD)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Ok(value)) => {
                serde_json::from_value(value).map_err(|e| SerumError::Decode(e.to_string()))
            }
            Some(Err(error)) => Err(error),
            None => panic!("no canned response for {}", O::METHOD),
        }
    }

    async fn stream<O: StreamOperation>(
        &self,
        _request: O::Request,
        _cancel: CancellationToken,
    ) -> Result<Subscription<O::Response>, SerumError> {
        Err(SerumError::StreamingUnsupported("mock"))
    }
}

/// Key used by every signing test
pub fn test_signer() -> KeypairSigner {
    KeypairSigner::from_bytes(&[7u8; 32])
}

/// Base58 keypair string for [`test_signer`]
pub fn test_private_key() -> String {
    let signer = test_signer();
    let mut keypair = vec![7u8; 32];
    keypair.extend_from_slice(&signer.public_key_bytes());
    bs58::encode(keypair).into_string()
}

/// Base64 legacy transaction with `fee_payer` and the test key as required signers
pub fn unsigned_transaction(fee_payer: [u8; 32]) -> String {
    let signer = test_signer();
    let mut message = vec![2u8, 0, 1, 3];
    message.extend_from_slice(&fee_payer);
    message.extend_from_slice(&signer.public_key_bytes());
    message.extend_from_slice(&[9u8; 32]);
    message.extend_from_slice(&[3u8; 32]);
    message.extend_from_slice(&[1, 2, 1, 1, 0]);

    let mut tx = vec![2u8];
    tx.extend_from_slice(&[0u8; 128]);
    tx.extend_from_slice(&message);
    general_purpose::STANDARD.encode(tx)
}

/// Test configuration utilities
pub struct TestConfig;

impl TestConfig {
    /// Check if live API tests should run against the public testnet
    pub fn should_run_live_tests() -> bool {
        env::var("RUN_LIVE_TESTS").unwrap_or_default() == "true"
    }

    /// Get test timeout duration
    pub fn test_timeout() -> Duration {
        Duration::from_secs(
            env::var("TEST_TIMEOUT_SECONDS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(30),
        )
    }
}
