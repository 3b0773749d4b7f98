use crate::core::errors::SerumError;
use crate::core::kernel::{Subscription, Transport, TxSigner};
use crate::core::traits::{AccountInfo, MarketDataSource, OrderBuilder, OrderSubmitter, SerumApi};
use crate::core::types::{
    GetAccountBalanceResponse, GetMarketsResponse, GetOpenOrdersResponse,
    GetOrderStatusStreamResponse, GetOrderbookResponse, GetOrderbooksStreamResponse,
    GetTickersResponse, GetTradesResponse, GetTradesStreamResponse, GetUnsettledResponse,
    OrderParams, PostCancelAllResponse, PostCancelOrderResponse, PostOrderOpts, PostOrderResponse,
    PostSettleResponse, PostSubmitResponse, Side,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub mod account;
pub mod market_data;
pub mod submitter;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use submitter::{BatchOutcome, SignedTransaction, Submitter, UnsignedTransaction};
pub use trading::Trading;

/// Reject an empty required argument before it reaches the network
pub(crate) fn require(name: &str, value: &str) -> Result<(), SerumError> {
    if value.trim().is_empty() {
        return Err(SerumError::InvalidParameters(format!("{} is required", name)));
    }
    Ok(())
}

/// Serum client that composes all sub-component implementations
///
/// The transport is the only thing that differs between the HTTP, WebSocket
/// and gRPC clients.
pub struct SerumClient<T: Transport> {
    pub market: MarketData<T>,
    pub account: Account<T>,
    pub trading: Trading<T>,
    pub submitter: Submitter<T>,
    transport: Arc<T>,
}

impl<T: Transport> SerumClient<T> {
    pub fn new(transport: T, signer: Option<Arc<dyn TxSigner>>) -> Self {
        Self::from_shared(Arc::new(transport), signer)
    }

    /// Build a client over a transport that is shared with other clients
    pub fn from_shared(transport: Arc<T>, signer: Option<Arc<dyn TxSigner>>) -> Self {
        Self {
            market: MarketData::new(&transport),
            account: Account::new(&transport),
            trading: Trading::new(&transport),
            submitter: Submitter::new(&transport, signer),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn has_signer(&self) -> bool {
        self.submitter.has_signer()
    }

    /// Fail fast on write paths when no key is configured
    fn ensure_signer(&self) -> Result<(), SerumError> {
        self.submitter.signer().map(|_| ())
    }
}

impl<T: Transport> std::fmt::Debug for SerumClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerumClient")
            .field("transport", &self.transport.kind())
            .field("has_signer", &self.has_signer())
            .finish_non_exhaustive()
    }
}

// Implement traits for the client by delegating to sub-components

#[async_trait]
impl<T: Transport> MarketDataSource for SerumClient<T> {
    async fn get_orderbook(
        &self,
        market: &str,
        limit: u32,
    ) -> Result<GetOrderbookResponse, SerumError> {
        self.market.get_orderbook(market, limit).await
    }

    async fn get_trades(&self, market: &str, limit: u32) -> Result<GetTradesResponse, SerumError> {
        self.market.get_trades(market, limit).await
    }

    async fn get_tickers(&self, market: &str) -> Result<GetTickersResponse, SerumError> {
        self.market.get_tickers(market).await
    }

    async fn get_markets(&self) -> Result<GetMarketsResponse, SerumError> {
        self.market.get_markets().await
    }

    async fn get_orderbooks_stream(
        &self,
        markets: &[String],
        limit: u32,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetOrderbooksStreamResponse>, SerumError> {
        self.market
            .get_orderbooks_stream(markets, limit, cancel)
            .await
    }

    async fn get_trades_stream(
        &self,
        market: &str,
        limit: u32,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetTradesStreamResponse>, SerumError> {
        self.market.get_trades_stream(market, limit, cancel).await
    }
}

#[async_trait]
impl<T: Transport> AccountInfo for SerumClient<T> {
    async fn get_open_orders(
        &self,
        market: &str,
        owner: &str,
    ) -> Result<GetOpenOrdersResponse, SerumError> {
        self.account.get_open_orders(market, owner).await
    }

    async fn get_unsettled(
        &self,
        market: &str,
        owner: &str,
    ) -> Result<GetUnsettledResponse, SerumError> {
        self.account.get_unsettled(market, owner).await
    }

    async fn get_account_balance(
        &self,
        owner: &str,
    ) -> Result<GetAccountBalanceResponse, SerumError> {
        self.account.get_account_balance(owner).await
    }

    async fn get_order_status_stream(
        &self,
        market: &str,
        owner: &str,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetOrderStatusStreamResponse>, SerumError> {
        self.account
            .get_order_status_stream(market, owner, cancel)
            .await
    }
}

#[async_trait]
impl<T: Transport> OrderBuilder for SerumClient<T> {
    async fn post_order(
        &self,
        order: &OrderParams,
        opts: &PostOrderOpts,
    ) -> Result<PostOrderResponse, SerumError> {
        self.trading.post_order(order, opts).await
    }

    async fn post_submit(
        &self,
        transaction: &str,
        skip_pre_flight: bool,
    ) -> Result<PostSubmitResponse, SerumError> {
        self.trading.post_submit(transaction, skip_pre_flight).await
    }

    async fn post_cancel_order(
        &self,
        order_id: &str,
        side: Side,
        owner: &str,
        market: &str,
        open_orders: &str,
    ) -> Result<PostCancelOrderResponse, SerumError> {
        self.trading
            .post_cancel_order(order_id, side, owner, market, open_orders)
            .await
    }

    async fn post_cancel_by_client_order_id(
        &self,
        client_order_id: u64,
        owner: &str,
        market: &str,
        open_orders: &str,
    ) -> Result<PostCancelOrderResponse, SerumError> {
        self.trading
            .post_cancel_by_client_order_id(client_order_id, owner, market, open_orders)
            .await
    }

    async fn post_cancel_all(
        &self,
        market: &str,
        owner: &str,
        open_orders: &[String],
    ) -> Result<PostCancelAllResponse, SerumError> {
        self.trading.post_cancel_all(market, owner, open_orders).await
    }

    async fn post_settle(
        &self,
        owner: &str,
        market: &str,
        base_token_wallet: &str,
        quote_token_wallet: &str,
        open_orders: &str,
    ) -> Result<PostSettleResponse, SerumError> {
        self.trading
            .post_settle(owner, market, base_token_wallet, quote_token_wallet, open_orders)
            .await
    }
}

#[async_trait]
impl<T: Transport> OrderSubmitter for SerumClient<T> {
    async fn sign_and_submit(
        &self,
        unsigned_tx: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError> {
        self.submitter
            .submit_one(UnsignedTransaction::new(unsigned_tx), skip_pre_flight)
            .await
    }

    async fn submit_order(
        &self,
        order: &OrderParams,
        opts: &PostOrderOpts,
    ) -> Result<String, SerumError> {
        self.ensure_signer()?;
        let built = self.trading.post_order(order, opts).await?;
        self.submitter
            .submit_one(built.transaction.into(), opts.skip_pre_flight)
            .await
    }

    async fn submit_cancel_order(
        &self,
        order_id: &str,
        side: Side,
        owner: &str,
        market: &str,
        open_orders: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError> {
        self.ensure_signer()?;
        let built = self
            .trading
            .post_cancel_order(order_id, side, owner, market, open_orders)
            .await?;
        self.submitter
            .submit_one(built.transaction.into(), skip_pre_flight)
            .await
    }

    async fn submit_cancel_by_client_order_id(
        &self,
        client_order_id: u64,
        owner: &str,
        market: &str,
        open_orders: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError> {
        self.ensure_signer()?;
        let built = self
            .trading
            .post_cancel_by_client_order_id(client_order_id, owner, market, open_orders)
            .await?;
        self.submitter
            .submit_one(built.transaction.into(), skip_pre_flight)
            .await
    }

    async fn submit_cancel_all(
        &self,
        market: &str,
        owner: &str,
        open_orders: &[String],
        skip_pre_flight: bool,
    ) -> Result<Vec<String>, SerumError> {
        self.ensure_signer()?;
        let built = self
            .trading
            .post_cancel_all(market, owner, open_orders)
            .await?;
        let transactions = built
            .transactions
            .into_iter()
            .map(UnsignedTransaction::from)
            .collect();

        self.submitter
            .submit_many(transactions, skip_pre_flight)
            .await
            .into_result()
    }

    async fn submit_settle(
        &self,
        owner: &str,
        market: &str,
        base_token_wallet: &str,
        quote_token_wallet: &str,
        open_orders: &str,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError> {
        self.ensure_signer()?;
        let built = self
            .trading
            .post_settle(owner, market, base_token_wallet, quote_token_wallet, open_orders)
            .await?;
        self.submitter
            .submit_one(built.transaction.into(), skip_pre_flight)
            .await
    }
}

impl<T: Transport> SerumApi for SerumClient<T> {}
