use crate::core::{
    errors::SerumError,
    kernel::{Subscription, Transport},
    types::{
        GetAccountBalanceRequest, GetAccountBalanceResponse, GetOpenOrdersRequest,
        GetOpenOrdersResponse, GetOrderStatusStreamRequest, GetOrderStatusStreamResponse,
        GetUnsettledRequest, GetUnsettledResponse,
    },
};
use crate::serum::connector::require;
use crate::serum::operations::{
    GetAccountBalance, GetOpenOrders, GetOrderStatusStream, GetUnsettled,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Account implementation for Serum
pub struct Account<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> Account<T> {
    pub fn new(transport: &Arc<T>) -> Self {
        Self {
            transport: Arc::clone(transport),
        }
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn get_open_orders(
        &self,
        market: &str,
        owner: &str,
    ) -> Result<GetOpenOrdersResponse, SerumError> {
        require("market", market)?;
        require("owner", owner)?;
        self.transport
            .unary::<GetOpenOrders>(GetOpenOrdersRequest {
                market: market.to_string(),
                address: owner.to_string(),
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn get_unsettled(
        &self,
        market: &str,
        owner: &str,
    ) -> Result<GetUnsettledResponse, SerumError> {
        require("market", market)?;
        require("owner", owner)?;
        self.transport
            .unary::<GetUnsettled>(GetUnsettledRequest {
                market: market.to_string(),
                owner: owner.to_string(),
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn get_account_balance(
        &self,
        owner: &str,
    ) -> Result<GetAccountBalanceResponse, SerumError> {
        require("owner", owner)?;
        self.transport
            .unary::<GetAccountBalance>(GetAccountBalanceRequest {
                owner_address: owner.to_string(),
            })
            .await
    }

    #[instrument(skip(self, cancel), fields(transport = %self.transport.kind()))]
    pub async fn get_order_status_stream(
        &self,
        market: &str,
        owner: &str,
        cancel: CancellationToken,
    ) -> Result<Subscription<GetOrderStatusStreamResponse>, SerumError> {
        require("market", market)?;
        require("owner", owner)?;
        self.transport
            .stream::<GetOrderStatusStream>(
                GetOrderStatusStreamRequest {
                    market: market.to_string(),
                    owner_address: owner.to_string(),
                },
                cancel,
            )
            .await
    }
}
