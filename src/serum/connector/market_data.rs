use crate::core::{
    errors::SerumError,
    kernel::{Subscription, Transport},
    types::{
        GetMarketsRequest, GetMarketsResponse, GetOrderbookRequest, GetOrderbookResponse,
        GetOrderbooksRequest, GetOrderbooksStreamResponse, GetTickersRequest, GetTickersResponse,
        GetTradesRequest, GetTradesResponse, GetTradesStreamResponse,
    },
};
use crate::serum::connector::require;
use crate::serum::operations::{
    GetMarkets, GetOrderbook, GetOrderbooksStream, GetTickers, GetTrades, GetTradesStream,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Market data implementation for Serum
pub struct MarketData<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> MarketData<T> {
    pub fn new(transport: &Arc<T>) -> Self {
        Self {
            transport: Arc::clone(transport),
        }
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn get_orderbook(
        &self,
        market: &str,
        limit: u32,
    ) -> Result<GetOrderbookResponse, SerumError> {
        require("market", market)?;
        self.transport
            .unary::<GetOrderbook>(GetOrderbookRequest {
                market: market.to_string(),
                limit,
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn get_trades(
        &self,
        market: &str,
        limit: u32,
    ) -> Result<GetTradesResponse, SerumError> {
        require("market", market)?;
        self.transport
            .unary::<GetTrades>(GetTradesRequest {
                market: market.to_string(),
                limit,
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn get_tickers(&self, market: &str) -> Result<GetTickersResponse, SerumError> {
        self.transport
            .unary::<GetTickers>(GetTickersRequest {
                market: market.to_string(),
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn get_markets(&self) -> Result<GetMarketsResponse, SerumError> {
        self.transport
            .unary::<GetMarkets>(GetMarketsRequest {})
            .await
    }

    #[instrument(skip(self, cancel), fields(transport = %self.transport.kind()))]
    pub async fn get_orderbooks_stream(
        &self,
        markets: &[String],
        limit: u32,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetOrderbooksStreamResponse>, SerumError> {
        if markets.is_empty() {
            return Err(SerumError::InvalidParameters(
                "at least one market is required".to_string(),
            ));
        }
        for market in markets {
            require("market", market)?;
        }

        self.transport
            .stream::<GetOrderbooksStream>(
                GetOrderbooksRequest {
                    markets: markets.to_vec(),
                    limit,
                },
                cancel,
            )
            .await
    }

    #[instrument(skip(self, cancel), fields(transport = %self.transport.kind()))]
    pub async fn get_trades_stream(
        &self,
        market: &str,
        limit: u32,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetTradesStreamResponse>, SerumError> {
        require("market", market)?;
        self.transport
            .stream::<GetTradesStream>(
                GetTradesRequest {
                    market: market.to_string(),
                    limit,
                },
                cancel,
            )
            .await
    }
}
