//! Remote operations of the `api.Api` service
//!
//! Each unit type ties a request message to its response message, its
//! JSON-RPC / gRPC method name and, for unary operations, its HTTP route.

use crate::core::kernel::{HttpRoute, Operation, StreamOperation, UnaryOperation};
use crate::core::types::{
    GetAccountBalanceRequest, GetAccountBalanceResponse, GetMarketsRequest, GetMarketsResponse,
    GetOpenOrdersRequest, GetOpenOrdersResponse, GetOrderStatusStreamRequest,
    GetOrderStatusStreamResponse, GetOrderbookRequest, GetOrderbookResponse,
    GetOrderbooksRequest, GetOrderbooksStreamResponse, GetTickersRequest, GetTickersResponse,
    GetTradesRequest, GetTradesResponse, GetTradesStreamResponse, GetUnsettledRequest,
    GetUnsettledResponse, PostCancelAllRequest, PostCancelAllResponse,
    PostCancelByClientOrderIdRequest, PostCancelOrderRequest, PostCancelOrderResponse,
    PostOrderRequest, PostOrderResponse, PostSettleRequest, PostSettleResponse,
    PostSubmitRequest, PostSubmitResponse,
};

macro_rules! operation {
    ($name:ident, $method:literal, $request:ty => $response:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl Operation for $name {
            type Request = $request;
            type Response = $response;

            const METHOD: &'static str = $method;
            const GRPC_PATH: &'static str = concat!("/api.Api/", $method);
        }
    };
}

operation!(GetOrderbook, "GetOrderbook", GetOrderbookRequest => GetOrderbookResponse);
operation!(GetTrades, "GetTrades", GetTradesRequest => GetTradesResponse);
operation!(GetTickers, "GetTickers", GetTickersRequest => GetTickersResponse);
operation!(GetOpenOrders, "GetOpenOrders", GetOpenOrdersRequest => GetOpenOrdersResponse);
operation!(GetUnsettled, "GetUnsettled", GetUnsettledRequest => GetUnsettledResponse);
operation!(GetMarkets, "GetMarkets", GetMarketsRequest => GetMarketsResponse);
operation!(
    GetAccountBalance,
    "GetAccountBalance",
    GetAccountBalanceRequest => GetAccountBalanceResponse
);
operation!(PostOrder, "PostOrder", PostOrderRequest => PostOrderResponse);
operation!(PostSubmit, "PostSubmit", PostSubmitRequest => PostSubmitResponse);
operation!(PostCancelOrder, "PostCancelOrder", PostCancelOrderRequest => PostCancelOrderResponse);
operation!(
    PostCancelByClientOrderId,
    "PostCancelByClientOrderID",
    PostCancelByClientOrderIdRequest => PostCancelOrderResponse
);
operation!(PostCancelAll, "PostCancelAll", PostCancelAllRequest => PostCancelAllResponse);
operation!(PostSettle, "PostSettle", PostSettleRequest => PostSettleResponse);

operation!(
    GetOrderbooksStream,
    "GetOrderbooksStream",
    GetOrderbooksRequest => GetOrderbooksStreamResponse
);
operation!(GetTradesStream, "GetTradesStream", GetTradesRequest => GetTradesStreamResponse);
operation!(
    GetOrderStatusStream,
    "GetOrderStatusStream",
    GetOrderStatusStreamRequest => GetOrderStatusStreamResponse
);

impl StreamOperation for GetOrderbooksStream {}
impl StreamOperation for GetTradesStream {}
impl StreamOperation for GetOrderStatusStream {}

impl UnaryOperation for GetOrderbook {
    fn http_route(request: &Self::Request) -> HttpRoute {
        HttpRoute::get("/api/v1/market/orderbooks")
            .segment(request.market.as_str())
            .query("limit", request.limit)
    }
}

impl UnaryOperation for GetTrades {
    fn http_route(request: &Self::Request) -> HttpRoute {
        HttpRoute::get("/api/v1/market/trades")
            .segment(request.market.as_str())
            .query("limit", request.limit)
    }
}

impl UnaryOperation for GetTickers {
    fn http_route(request: &Self::Request) -> HttpRoute {
        HttpRoute::get("/api/v1/market/tickers").segment(request.market.as_str())
    }
}

impl UnaryOperation for GetOpenOrders {
    fn http_route(request: &Self::Request) -> HttpRoute {
        HttpRoute::get("/api/v1/trade/openorders")
            .segment(request.market.as_str())
            .query("address", &request.address)
    }
}

impl UnaryOperation for GetUnsettled {
    fn http_route(request: &Self::Request) -> HttpRoute {
        HttpRoute::get("/api/v1/trade/unsettled")
            .segment(request.market.as_str())
            .query("owner", &request.owner)
    }
}

impl UnaryOperation for GetMarkets {
    fn http_route(_request: &Self::Request) -> HttpRoute {
        HttpRoute::get("/api/v1/market/markets")
    }
}

impl UnaryOperation for GetAccountBalance {
    fn http_route(request: &Self::Request) -> HttpRoute {
        HttpRoute::get("/api/v1/account/balance").query("ownerAddress", &request.owner_address)
    }
}

impl UnaryOperation for PostOrder {
    fn http_route(_request: &Self::Request) -> HttpRoute {
        HttpRoute::post("/api/v1/trade/place")
    }
}

impl UnaryOperation for PostSubmit {
    fn http_route(_request: &Self::Request) -> HttpRoute {
        HttpRoute::post("/api/v1/trade/submit")
    }
}

impl UnaryOperation for PostCancelOrder {
    fn http_route(_request: &Self::Request) -> HttpRoute {
        HttpRoute::post("/api/v1/trade/cancel")
    }
}

impl UnaryOperation for PostCancelByClientOrderId {
    fn http_route(_request: &Self::Request) -> HttpRoute {
        HttpRoute::post("/api/v1/trade/cancelbyid")
    }
}

impl UnaryOperation for PostCancelAll {
    fn http_route(_request: &Self::Request) -> HttpRoute {
        HttpRoute::post("/api/v1/trade/cancelall")
    }
}

impl UnaryOperation for PostSettle {
    fn http_route(_request: &Self::Request) -> HttpRoute {
        HttpRoute::post("/api/v1/trade/settle")
    }
}
