use crate::core::{
    errors::SerumError,
    kernel::Transport,
    types::{
        OrderParams, PostCancelAllRequest, PostCancelAllResponse,
        PostCancelByClientOrderIdRequest, PostCancelOrderRequest, PostCancelOrderResponse,
        PostOrderOpts, PostOrderRequest, PostOrderResponse, PostSettleRequest, PostSettleResponse,
        PostSubmitRequest, PostSubmitResponse, Side,
    },
};
use crate::serum::connector::require;
use crate::serum::operations::{
    PostCancelAll, PostCancelByClientOrderId, PostCancelOrder, PostOrder, PostSettle, PostSubmit,
};
use std::sync::Arc;
use tracing::instrument;

/// Trading implementation for Serum
///
/// Every call returns server-built, unsigned transactions; see
/// [`Submitter`](super::Submitter) for signing and submission.
pub struct Trading<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> Trading<T> {
    pub fn new(transport: &Arc<T>) -> Self {
        Self {
            transport: Arc::clone(transport),
        }
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn post_order(
        &self,
        order: &OrderParams,
        opts: &PostOrderOpts,
    ) -> Result<PostOrderResponse, SerumError> {
        require("owner", &order.owner)?;
        require("payer", &order.payer)?;
        require("market", &order.market)?;
        if order.order_types.is_empty() {
            return Err(SerumError::InvalidParameters(
                "at least one order type is required".to_string(),
            ));
        }
        if !(order.amount.is_finite() && order.amount > 0.0) {
            return Err(SerumError::InvalidParameters(format!(
                "amount must be positive, got {}",
                order.amount
            )));
        }
        if !order.price.is_finite() || order.price < 0.0 {
            return Err(SerumError::InvalidParameters(format!(
                "price must not be negative, got {}",
                order.price
            )));
        }

        self.transport
            .unary::<PostOrder>(PostOrderRequest {
                owner_address: order.owner.clone(),
                payer_address: order.payer.clone(),
                market: order.market.clone(),
                side: order.side.into(),
                order_types: order.order_types.iter().map(|t| (*t).into()).collect(),
                amount: order.amount,
                price: order.price,
                open_orders_address: opts.open_orders_address.clone(),
                client_order_id: opts.client_order_id,
            })
            .await
    }

    #[instrument(skip(self, transaction), fields(transport = %self.transport.kind()))]
    pub async fn post_submit(
        &self,
        transaction: &str,
        skip_pre_flight: bool,
    ) -> Result<PostSubmitResponse, SerumError> {
        require("transaction", transaction)?;
        self.transport
            .unary::<PostSubmit>(PostSubmitRequest {
                transaction: transaction.to_string(),
                skip_pre_flight,
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn post_cancel_order(
        &self,
        order_id: &str,
        side: Side,
        owner: &str,
        market: &str,
        open_orders: &str,
    ) -> Result<PostCancelOrderResponse, SerumError> {
        require("order id", order_id)?;
        require("owner", owner)?;
        require("market", market)?;
        self.transport
            .unary::<PostCancelOrder>(PostCancelOrderRequest {
                order_id: order_id.to_string(),
                side: side.into(),
                market_address: market.to_string(),
                owner_address: owner.to_string(),
                open_orders_address: open_orders.to_string(),
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn post_cancel_by_client_order_id(
        &self,
        client_order_id: u64,
        owner: &str,
        market: &str,
        open_orders: &str,
    ) -> Result<PostCancelOrderResponse, SerumError> {
        require("owner", owner)?;
        require("market", market)?;
        self.transport
            .unary::<PostCancelByClientOrderId>(PostCancelByClientOrderIdRequest {
                client_order_id,
                market_address: market.to_string(),
                owner_address: owner.to_string(),
                open_orders_address: open_orders.to_string(),
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn post_cancel_all(
        &self,
        market: &str,
        owner: &str,
        open_orders: &[String],
    ) -> Result<PostCancelAllResponse, SerumError> {
        require("market", market)?;
        require("owner", owner)?;
        self.transport
            .unary::<PostCancelAll>(PostCancelAllRequest {
                market: market.to_string(),
                owner_address: owner.to_string(),
                open_orders_addresses: open_orders.to_vec(),
            })
            .await
    }

    #[instrument(skip(self), fields(transport = %self.transport.kind()))]
    pub async fn post_settle(
        &self,
        owner: &str,
        market: &str,
        base_token_wallet: &str,
        quote_token_wallet: &str,
        open_orders: &str,
    ) -> Result<PostSettleResponse, SerumError> {
        require("owner", owner)?;
        require("market", market)?;
        require("base token wallet", base_token_wallet)?;
        require("quote token wallet", quote_token_wallet)?;
        self.transport
            .unary::<PostSettle>(PostSettleRequest {
                owner_address: owner.to_string(),
                market: market.to_string(),
                base_token_wallet: base_token_wallet.to_string(),
                quote_token_wallet: quote_token_wallet.to_string(),
                open_orders_address: open_orders.to_string(),
            })
            .await
    }
}
