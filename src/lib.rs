pub mod core;
pub mod serum;

pub use crate::core::{
    config::{ClientConfig, Environment, TransportKind},
    errors::{ErrorKind, SerumError},
    kernel::{Subscription, Transport, TxSigner},
    traits::{AccountInfo, MarketDataSource, OrderBuilder, OrderSubmitter, SerumApi},
    types::*,
};
pub use crate::serum::{
    new_grpc_client, new_grpc_client_with_opts, new_grpc_testnet, new_http_client,
    new_http_client_with_opts, new_http_testnet, new_ws_client, new_ws_client_with_opts,
    new_ws_testnet, GrpcClient, HttpClient, SerumClient, WsClient,
};
