//! Serum DEX API client: operations, connector and constructors

pub mod builder;
pub mod connector;
pub mod operations;

pub use builder::{
    new_grpc_client, new_grpc_client_with_opts, new_grpc_testnet, new_http_client,
    new_http_client_with_client, new_http_client_with_opts, new_http_testnet, new_ws_client,
    new_ws_client_with_opts, new_ws_testnet, GrpcClient, HttpClient, WsClient,
};
pub use connector::{BatchOutcome, SerumClient, SignedTransaction, UnsignedTransaction};
