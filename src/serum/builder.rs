use crate::core::{
    config::{ClientConfig, TransportKind},
    errors::SerumError,
    kernel::{
        GrpcConfig, GrpcTransport, HttpConfig, HttpTransport, HttpTransportBuilder, WsConfig,
        WsTransport,
    },
};
use crate::serum::connector::SerumClient;

pub type HttpClient = SerumClient<HttpTransport>;
pub type WsClient = SerumClient<WsTransport>;
pub type GrpcClient = SerumClient<GrpcTransport>;

/// Mainnet endpoint with the signing key from `PRIVATE_KEY`, if set
fn mainnet_opts(kind: TransportKind) -> ClientConfig {
    with_env_key(ClientConfig::mainnet(kind))
}

fn testnet_opts(kind: TransportKind) -> ClientConfig {
    with_env_key(ClientConfig::testnet(kind))
}

fn with_env_key(config: ClientConfig) -> ClientConfig {
    match std::env::var(crate::core::config::PRIVATE_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => config.with_private_key(key),
        _ => config,
    }
}

/// HTTP client on mainnet
pub fn new_http_client() -> Result<HttpClient, SerumError> {
    new_http_client_with_opts(mainnet_opts(TransportKind::Http))
}

/// HTTP client on testnet
pub fn new_http_testnet() -> Result<HttpClient, SerumError> {
    new_http_client_with_opts(testnet_opts(TransportKind::Http))
}

pub fn new_http_client_with_opts(config: ClientConfig) -> Result<HttpClient, SerumError> {
    let signer = config.signer()?;
    let transport = HttpTransport::new(http_config(&config))?;
    Ok(SerumClient::new(transport, signer))
}

/// HTTP client over a caller-supplied reqwest client
pub fn new_http_client_with_client(
    client: reqwest::Client,
    config: ClientConfig,
) -> Result<HttpClient, SerumError> {
    let signer = config.signer()?;
    let transport = HttpTransportBuilder::new(http_config(&config))
        .with_client(client)
        .build()?;
    Ok(SerumClient::new(transport, signer))
}

fn http_config(config: &ClientConfig) -> HttpConfig {
    HttpConfig::new(config.endpoint.clone()).with_timeout(config.timeout)
}

/// WebSocket client on mainnet; connects before returning
pub async fn new_ws_client() -> Result<WsClient, SerumError> {
    new_ws_client_with_opts(mainnet_opts(TransportKind::WebSocket)).await
}

pub async fn new_ws_testnet() -> Result<WsClient, SerumError> {
    new_ws_client_with_opts(testnet_opts(TransportKind::WebSocket)).await
}

pub async fn new_ws_client_with_opts(config: ClientConfig) -> Result<WsClient, SerumError> {
    let signer = config.signer()?;
    let ws_config = WsConfig::new(config.endpoint.clone())
        .with_timeout(config.timeout)
        .with_connect_timeout(config.timeout);
    let transport = WsTransport::connect(ws_config).await?;
    Ok(SerumClient::new(transport, signer))
}

/// gRPC client on mainnet; the channel connects on first call
pub fn new_grpc_client() -> Result<GrpcClient, SerumError> {
    new_grpc_client_with_opts(mainnet_opts(TransportKind::Grpc))
}

pub fn new_grpc_testnet() -> Result<GrpcClient, SerumError> {
    new_grpc_client_with_opts(testnet_opts(TransportKind::Grpc))
}

pub fn new_grpc_client_with_opts(config: ClientConfig) -> Result<GrpcClient, SerumError> {
    let signer = config.signer()?;
    let transport =
        GrpcTransport::connect_lazy(GrpcConfig::new(config.endpoint.clone()).with_timeout(config.timeout))?;
    Ok(SerumClient::new(transport, signer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TESTNET_HTTP_ENDPOINT;
    use crate::core::traits::OrderSubmitter;
    use std::time::Duration;

    #[test]
    fn test_http_client_with_opts() {
        let config = ClientConfig::new(TESTNET_HTTP_ENDPOINT).with_timeout(Duration::from_secs(2));
        let client = new_http_client_with_opts(config).unwrap();

        assert!(!client.has_signer());
        assert_eq!(client.transport().config().timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_bad_key_fails_at_construction() {
        let config = ClientConfig::new(TESTNET_HTTP_ENDPOINT).with_private_key("0OIl");
        assert!(matches!(
            new_http_client_with_opts(config),
            Err(SerumError::Signing(_))
        ));
    }

    #[tokio::test]
    async fn test_grpc_client_without_key_rejects_writes() {
        let client = new_grpc_client_with_opts(ClientConfig::new("127.0.0.1:1")).unwrap();
        let err = client
            .sign_and_submit("AQ==", false)
            .await
            .unwrap_err();
        assert!(matches!(err, SerumError::PrivateKeyNotFound));
    }
}
