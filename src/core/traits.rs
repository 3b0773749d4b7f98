use crate::core::{
    errors::SerumError,
    kernel::Subscription,
    types::{
        GetAccountBalanceResponse, GetMarketsResponse, GetOpenOrdersResponse,
        GetOrderStatusStreamResponse, GetOrderbookResponse, GetOrderbooksStreamResponse,
        GetTickersResponse, GetTradesResponse, GetTradesStreamResponse, GetUnsettledResponse,
        OrderParams, PostCancelAllResponse, PostCancelOrderResponse, PostOrderOpts,
        PostOrderResponse, PostSettleResponse, PostSubmitResponse, Side,
    },
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait MarketDataSource {
    /// Order book of one market; `limit` 0 means no limit
    async fn get_orderbook(
        &self,
        market: &str,
        limit: u32,
    ) -> Result<GetOrderbookResponse, SerumError>;

    async fn get_trades(&self, market: &str, limit: u32) -> Result<GetTradesResponse, SerumError>;

    /// Tickers of one market, or of every market when `market` is empty
    async fn get_tickers(&self, market: &str) -> Result<GetTickersResponse, SerumError>;

    async fn get_markets(&self) -> Result<GetMarketsResponse, SerumError>;

    /// Order book updates for several markets
    async fn get_orderbooks_stream(
        &self,
        markets: &[String],
        limit: u32,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetOrderbooksStreamResponse>, SerumError>;

    async fn get_trades_stream(
        &self,
        market: &str,
        limit: u32,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetTradesStreamResponse>, SerumError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_open_orders(
        &self,
        market: &str,
        owner: &str,
    ) -> Result<GetOpenOrdersResponse, SerumError>;

    async fn get_unsettled(
        &self,
        market: &str,
        owner: &str,
    ) -> Result<GetUnsettledResponse, SerumError>;

    async fn get_account_balance(
        &self,
        owner: &str,
    ) -> Result<GetAccountBalanceResponse, SerumError>;

    async fn get_order_status_stream(
        &self,
        market: &str,
        owner: &str,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetOrderStatusStreamResponse>, SerumError>;
}

/// Requests for unsigned transactions built by the server
///
/// Nothing here signs or submits anything, so none of these need a key.
#[async_trait]
pub trait OrderBuilder {
    async fn post_order(
        &self,
        order: &OrderParams,
        opts: &PostOrderOpts,
    ) -> Result<PostOrderResponse, SerumError>;

    /// Submit an already signed transaction
    async fn post_submit(
        &self,
        transaction: &str,
        skip_pre_flight: bool,
    ) -> Result<PostSubmitResponse, SerumError>;

    async fn post_cancel_order(
        &self,
        order_id: &str,
        side: Side,
        owner: &str,
        market: &str,
        open_orders: &str,
    ) -> Result<PostCancelOrderResponse, SerumError>;

    async fn post_cancel_by_client_order_id(
        &self,
        client_order_id: u64,
        owner: &str,
        market: &str,
        open_orders: &str,
    ) -> Result<PostCancelOrderResponse, SerumError>;

    async fn post_cancel_all(
        &self,
        market: &str,
        owner: &str,
        open_orders: &[String],
    ) -> Result<PostCancelAllResponse, SerumError>;

    async fn post_settle(
        &self,
        owner: &str,
        market: &str,
        base_token_wallet: &str,
        quote_token_wallet: &str,
        open_orders: &str,
    ) -> Result<PostSettleResponse, SerumError>;
}

/// Build, sign and submit in one call
///
/// Every method fails with [`SerumError::PrivateKeyNotFound`] before any
/// network call when the client has no key.
#[async_trait]
pub trait OrderSubmitter: OrderBuilder {
    /// Sign a server-built transaction and submit it, returning its signature
    async fn sign_and_submit(
        &self,
        unsigned_tx: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError>;

    async fn submit_order(
        &self,
        order: &OrderParams,
        opts: &PostOrderOpts,
    ) -> Result<String, SerumError>;

    async fn submit_cancel_order(
        &self,
        order_id: &str,
        side: Side,
        owner: &str,
        market: &str,
        open_orders: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError>;

    async fn submit_cancel_by_client_order_id(
        &self,
        client_order_id: u64,
        owner: &str,
        market: &str,
        open_orders: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError>;

    /// Cancel every order, one transaction per batch, in server order
    ///
    /// Stops at the first failure; the signatures already submitted are
    /// carried by [`SerumError::PartialBatch`].
    async fn submit_cancel_all(
        &self,
        market: &str,
        owner: &str,
        open_orders: &[String],
        skip_pre_flight: bool,
    ) -> Result<Vec<String>, SerumError>;

    async fn submit_settle(
        &self,
        owner: &str,
        market: &str,
        base_token_wallet: &str,
        quote_token_wallet: &str,
        open_orders: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError>;
}

// Keep a composite trait for convenience when you need all functionality
pub trait SerumApi: MarketDataSource + AccountInfo + OrderSubmitter {}
