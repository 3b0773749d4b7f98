use crate::core::errors::SerumError;
use base64::engine::general_purpose;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tonic::Code;

pub const JSONRPC_VERSION: &str = "2.0";

/// Outgoing JSON-RPC call
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a P,
}

/// Encode a JSON-RPC request frame
pub fn encode_rpc_request<P: Serialize>(
    id: u64,
    method: &str,
    params: &P,
) -> Result<String, SerumError> {
    let request = RpcRequest {
        jsonrpc: JSONRPC_VERSION,
        id,
        method,
        params,
    };
    serde_json::to_string(&request).map_err(|e| {
        SerumError::Serialization(format!("Failed to encode {} request: {}", method, e))
    })
}

/// First decoding stage of a WebSocket frame
///
/// `result` is kept as raw JSON so that a frame can be routed by `id`
/// before its payload type is known.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcEnvelope {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Error body returned by the HTTP gateway on any non-200 status
#[derive(Debug, Deserialize)]
struct HttpErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

/// Decode an HTTP response body
///
/// Exactly one shape is tried per status: 200 is parsed as `T` only, and
/// every other status is parsed as the gateway error body only. The remote
/// message and details are passed through as sent; a body without a code
/// takes the HTTP status as its code.
pub fn decode_http<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, SerumError> {
    if status == 200 {
        return serde_json::from_str(body).map_err(|e| {
            SerumError::Decode(format!("Failed to parse response body: {}", e))
        });
    }

    let error: HttpErrorBody = serde_json::from_str(body).map_err(|e| {
        SerumError::Decode(format!(
            "HTTP {} with unparsable error body ({}): {}",
            status,
            e,
            truncate(body, 256)
        ))
    })?;

    Err(SerumError::Remote {
        code: error.code.unwrap_or_else(|| i64::from(status)),
        message: error.message.unwrap_or_default(),
        details: error.details.filter(|d| !d.is_null()),
    })
}

/// Stage one: parse the generic envelope of a WebSocket frame
pub fn decode_envelope(frame: &str) -> Result<RpcEnvelope, SerumError> {
    serde_json::from_str(frame)
        .map_err(|e| SerumError::Decode(format!("Malformed JSON-RPC frame: {}", e)))
}

/// Stage two: turn an envelope into the typed result or its remote error
pub fn decode_result<T: DeserializeOwned>(envelope: RpcEnvelope) -> Result<T, SerumError> {
    if let Some(error) = envelope.error {
        return Err(SerumError::Remote {
            code: error.code,
            message: error.message,
            details: error.data.filter(|d| !d.is_null()),
        });
    }

    let result = envelope
        .result
        .ok_or_else(|| SerumError::Decode("JSON-RPC frame has neither result nor error".into()))?;

    serde_json::from_value(result)
        .map_err(|e| SerumError::Decode(format!("Failed to parse result payload: {}", e)))
}

/// Both decoding stages in one step
pub fn decode_frame<T: DeserializeOwned>(frame: &str) -> Result<T, SerumError> {
    decode_result(decode_envelope(frame)?)
}

/// Map a gRPC status onto the error taxonomy
///
/// `deadline` is the unary timeout that was in force, if any.
pub fn status_to_error(status: &tonic::Status, deadline: Option<Duration>) -> SerumError {
    match (status.code(), deadline) {
        (Code::Unavailable, _) => SerumError::Connection(status.message().to_string()),
        (Code::DeadlineExceeded, Some(deadline)) => SerumError::Timeout(deadline),
        (Code::Internal, _) if status.message().starts_with("failed to decode") => {
            SerumError::Decode(status.message().to_string())
        }
        (code, _) => SerumError::Remote {
            code: i64::from(code as i32),
            message: status.message().to_string(),
            details: if status.details().is_empty() {
                None
            } else {
                Some(Value::String(
                    general_purpose::STANDARD.encode(status.details()),
                ))
            },
        },
    }
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GetOrderbookResponse, PostSubmitResponse};
    use serde_json::json;

    #[test]
    fn test_http_success_is_not_checked_for_error_fields() {
        let body = r#"{"signature":"5xyz","code":5,"message":"ignored"}"#;
        let response: PostSubmitResponse = decode_http(200, body).unwrap();
        assert_eq!(response.signature, "5xyz");
    }

    #[test]
    fn test_http_error_preserves_message_and_details() {
        let body = r#"{"code":3,"message":"invalid payer specified","details":[{"@type":"x"}]}"#;
        let err = decode_http::<PostSubmitResponse>(400, body).unwrap_err();

        match err {
            SerumError::Remote {
                code,
                message,
                details,
            } => {
                assert_eq!(code, 3);
                assert_eq!(message, "invalid payer specified");
                assert_eq!(details, Some(json!([{"@type": "x"}])));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_http_error_body_that_looks_like_success_is_still_an_error() {
        let body = r#"{"signature":"5xyz"}"#;
        let err = decode_http::<PostSubmitResponse>(500, body).unwrap_err();

        match err {
            SerumError::Remote { code, message, .. } => {
                assert_eq!(code, 500);
                assert!(message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_http_error_message_is_kept_verbatim() {
        let err = decode_http::<PostSubmitResponse>(422, r#"{"code":9,"message":""}"#).unwrap_err();

        match err {
            SerumError::Remote { code, message, details } => {
                assert_eq!(code, 9);
                assert_eq!(message, "");
                assert!(details.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_http_unparsable_error_body_is_decode_error() {
        let err = decode_http::<PostSubmitResponse>(502, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, SerumError::Decode(_)));
    }

    #[test]
    fn test_frame_with_result() {
        let frame = r#"{"jsonrpc":"2.0","id":7,"result":{"market":"SOL/USDC","bids":[{"price":20.5,"size":3}]}}"#;
        let envelope = decode_envelope(frame).unwrap();
        assert_eq!(envelope.id, Some(7));

        let orderbook: GetOrderbookResponse = decode_result(envelope).unwrap();
        assert_eq!(orderbook.market, "SOL/USDC");
        assert_eq!(orderbook.bids.len(), 1);
        assert!(orderbook.asks.is_empty());
    }

    #[test]
    fn test_frame_with_error() {
        let frame = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid market","data":"SOL/XYZ"}}"#;
        let err = decode_frame::<GetOrderbookResponse>(frame).unwrap_err();

        assert!(err.is_remote());
        assert_eq!(err.details(), Some(&json!("SOL/XYZ")));
    }

    #[test]
    fn test_frame_without_result_or_error() {
        let err = decode_frame::<GetOrderbookResponse>(r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert!(matches!(err, SerumError::Decode(_)));
    }

    #[test]
    fn test_malformed_frame() {
        assert!(matches!(
            decode_envelope("not json"),
            Err(SerumError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_request() {
        let frame = encode_rpc_request(3, "GetMarkets", &json!({})).unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 3, "method": "GetMarkets", "params": {}})
        );
    }

    #[test]
    fn test_status_mapping() {
        let err = status_to_error(&tonic::Status::unavailable("connection refused"), None);
        assert!(matches!(err, SerumError::Connection(_)));

        let err = status_to_error(
            &tonic::Status::deadline_exceeded("deadline"),
            Some(Duration::from_secs(7)),
        );
        assert!(matches!(err, SerumError::Timeout(d) if d == Duration::from_secs(7)));

        let err = status_to_error(&tonic::Status::invalid_argument("bad market"), None);
        match err {
            SerumError::Remote { code, message, details } => {
                assert_eq!(code, 3);
                assert_eq!(message, "bad market");
                assert!(details.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
