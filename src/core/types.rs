//! Wire messages shared by every transport.
//!
//! Each message derives both `prost::Message` (gRPC) and serde (HTTP and
//! WebSocket JSON). JSON field names follow the proto3 JSON mapping used by
//! the gateway: lowerCamelCase, 64-bit integers as strings, enums by name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Proto enums that carry canonical string names on the JSON side
pub trait NamedEnum: Sized + Copy + TryFrom<i32> + Into<i32> {
    fn as_str_name(&self) -> &'static str;
    fn from_str_name(value: &str) -> Option<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Side {
    SUnknown = 0,
    SBid = 1,
    SAsk = 2,
}

impl NamedEnum for Side {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::SUnknown => "S_UNKNOWN",
            Self::SBid => "S_BID",
            Self::SAsk => "S_ASK",
        }
    }

    fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "S_UNKNOWN" => Some(Self::SUnknown),
            "S_BID" => Some(Self::SBid),
            "S_ASK" => Some(Self::SAsk),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum OrderType {
    OtLimit = 0,
    OtIoc = 1,
    OtPost = 2,
    OtMarket = 3,
}

impl NamedEnum for OrderType {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::OtLimit => "OT_LIMIT",
            Self::OtIoc => "OT_IOC",
            Self::OtPost => "OT_POST",
            Self::OtMarket => "OT_MARKET",
        }
    }

    fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "OT_LIMIT" => Some(Self::OtLimit),
            "OT_IOC" => Some(Self::OtIoc),
            "OT_POST" => Some(Self::OtPost),
            "OT_MARKET" => Some(Self::OtMarket),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum OrderStatus {
    OsUnknown = 0,
    OsOpen = 1,
    OsPartialFill = 2,
    OsFilled = 3,
    OsCancelled = 4,
}

impl NamedEnum for OrderStatus {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::OsUnknown => "OS_UNKNOWN",
            Self::OsOpen => "OS_OPEN",
            Self::OsPartialFill => "OS_PARTIAL_FILL",
            Self::OsFilled => "OS_FILLED",
            Self::OsCancelled => "OS_CANCELLED",
        }
    }

    fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "OS_UNKNOWN" => Some(Self::OsUnknown),
            "OS_OPEN" => Some(Self::OsOpen),
            "OS_PARTIAL_FILL" => Some(Self::OsPartialFill),
            "OS_FILLED" => Some(Self::OsFilled),
            "OS_CANCELLED" => Some(Self::OsCancelled),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MarketStatus {
    MsUnknown = 0,
    MsOnline = 1,
}

impl NamedEnum for MarketStatus {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::MsUnknown => "MS_UNKNOWN",
            Self::MsOnline => "MS_ONLINE",
        }
    }

    fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "MS_UNKNOWN" => Some(Self::MsUnknown),
            "MS_ONLINE" => Some(Self::MsOnline),
            _ => None,
        }
    }
}

/// Serde adapters between proto3 JSON conventions and prost field types
pub mod serde_helpers {
    use super::NamedEnum;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum EnumRepr {
        Name(String),
        Number(i32),
    }

    fn enum_value<E: NamedEnum, Err: serde::de::Error>(repr: EnumRepr) -> Result<i32, Err> {
        match repr {
            EnumRepr::Name(name) => E::from_str_name(&name)
                .map(Into::into)
                .ok_or_else(|| Err::custom(format!("unknown enum value `{}`", name))),
            EnumRepr::Number(n) => Ok(n),
        }
    }

    fn enum_name<E: NamedEnum>(value: i32) -> Result<&'static str, i32> {
        E::try_from(value).map(|e| e.as_str_name()).map_err(|_| value)
    }

    pub fn serialize_enum<E: NamedEnum, S: Serializer>(
        value: &i32,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match enum_name::<E>(*value) {
            Ok(name) => serializer.serialize_str(name),
            Err(raw) => serializer.serialize_i32(raw),
        }
    }

    pub fn deserialize_enum<'de, E: NamedEnum, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<i32, D::Error> {
        match Option::<EnumRepr>::deserialize(deserializer)? {
            Some(repr) => enum_value::<E, D::Error>(repr),
            None => Ok(0),
        }
    }

    pub fn serialize_enum_list<E: NamedEnum, S: Serializer>(
        values: &[i32],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            match enum_name::<E>(*value) {
                Ok(name) => seq.serialize_element(name)?,
                Err(raw) => seq.serialize_element(&raw)?,
            }
        }
        seq.end()
    }

    pub fn deserialize_enum_list<'de, E: NamedEnum, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<i32>, D::Error> {
        Option::<Vec<EnumRepr>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(enum_value::<E, D::Error>)
            .collect()
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntRepr {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn serialize_u64_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize_u64_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Option::<IntRepr>::deserialize(deserializer)? {
            Some(IntRepr::Text(s)) => s.parse().map_err(D::Error::custom),
            Some(IntRepr::Unsigned(n)) => Ok(n),
            Some(IntRepr::Signed(n)) => u64::try_from(n).map_err(D::Error::custom),
            None => Ok(0),
        }
    }

    pub fn serialize_i64_string<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize_i64_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Option::<IntRepr>::deserialize(deserializer)? {
            Some(IntRepr::Text(s)) => s.parse().map_err(D::Error::custom),
            Some(IntRepr::Unsigned(n)) => i64::try_from(n).map_err(D::Error::custom),
            Some(IntRepr::Signed(n)) => Ok(n),
            None => Ok(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOrderbookRequest {
    #[prost(string, tag = "1")]
    pub market: String,
    /// 0 requests the full book
    #[prost(uint32, tag = "2")]
    pub limit: u32,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOrderbooksRequest {
    #[prost(string, repeated, tag = "1")]
    pub markets: Vec<String>,
    #[prost(uint32, tag = "2")]
    pub limit: u32,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetTradesRequest {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(uint32, tag = "2")]
    pub limit: u32,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetTickersRequest {
    /// Empty selects every market
    #[prost(string, tag = "1")]
    pub market: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOpenOrdersRequest {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(string, tag = "2")]
    pub address: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetUnsettledRequest {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(string, tag = "2")]
    pub owner: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct GetMarketsRequest {}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetAccountBalanceRequest {
    #[prost(string, tag = "1")]
    pub owner_address: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOrderStatusStreamRequest {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(string, tag = "2")]
    pub owner_address: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostOrderRequest {
    #[prost(string, tag = "1")]
    pub owner_address: String,
    #[prost(string, tag = "2")]
    pub payer_address: String,
    #[prost(string, tag = "3")]
    pub market: String,
    #[prost(enumeration = "Side", tag = "4")]
    #[serde(
        serialize_with = "serde_helpers::serialize_enum::<Side, _>",
        deserialize_with = "serde_helpers::deserialize_enum::<Side, _>"
    )]
    pub side: i32,
    #[prost(enumeration = "OrderType", repeated, tag = "5")]
    #[serde(
        rename = "type",
        serialize_with = "serde_helpers::serialize_enum_list::<OrderType, _>",
        deserialize_with = "serde_helpers::deserialize_enum_list::<OrderType, _>"
    )]
    pub order_types: Vec<i32>,
    #[prost(double, tag = "6")]
    pub amount: f64,
    #[prost(double, tag = "7")]
    pub price: f64,
    #[prost(string, tag = "8")]
    pub open_orders_address: String,
    #[prost(uint64, tag = "9")]
    #[serde(
        rename = "clientOrderID",
        serialize_with = "serde_helpers::serialize_u64_string",
        deserialize_with = "serde_helpers::deserialize_u64_string"
    )]
    pub client_order_id: u64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostSubmitRequest {
    #[prost(string, tag = "1")]
    pub transaction: String,
    #[prost(bool, tag = "2")]
    pub skip_pre_flight: bool,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostCancelOrderRequest {
    #[prost(string, tag = "1")]
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[prost(enumeration = "Side", tag = "2")]
    #[serde(
        serialize_with = "serde_helpers::serialize_enum::<Side, _>",
        deserialize_with = "serde_helpers::deserialize_enum::<Side, _>"
    )]
    pub side: i32,
    #[prost(string, tag = "3")]
    pub market_address: String,
    #[prost(string, tag = "4")]
    pub owner_address: String,
    #[prost(string, tag = "5")]
    pub open_orders_address: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostCancelByClientOrderIdRequest {
    #[prost(uint64, tag = "1")]
    #[serde(
        rename = "clientOrderID",
        serialize_with = "serde_helpers::serialize_u64_string",
        deserialize_with = "serde_helpers::deserialize_u64_string"
    )]
    pub client_order_id: u64,
    #[prost(string, tag = "2")]
    pub market_address: String,
    #[prost(string, tag = "3")]
    pub owner_address: String,
    #[prost(string, tag = "4")]
    pub open_orders_address: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostCancelAllRequest {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(string, tag = "2")]
    pub owner_address: String,
    #[prost(string, repeated, tag = "3")]
    pub open_orders_addresses: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostSettleRequest {
    #[prost(string, tag = "1")]
    pub owner_address: String,
    #[prost(string, tag = "2")]
    pub market: String,
    #[prost(string, tag = "3")]
    pub base_token_wallet: String,
    #[prost(string, tag = "4")]
    pub quote_token_wallet: String,
    #[prost(string, tag = "5")]
    pub open_orders_address: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderbookItem {
    #[prost(double, tag = "1")]
    pub price: f64,
    #[prost(double, tag = "2")]
    pub size: f64,
    #[prost(string, tag = "3")]
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[prost(uint64, tag = "4")]
    #[serde(
        rename = "clientOrderID",
        serialize_with = "serde_helpers::serialize_u64_string",
        deserialize_with = "serde_helpers::deserialize_u64_string"
    )]
    pub client_order_id: u64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOrderbookResponse {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(string, tag = "2")]
    pub market_address: String,
    #[prost(message, repeated, tag = "3")]
    pub bids: Vec<OrderbookItem>,
    #[prost(message, repeated, tag = "4")]
    pub asks: Vec<OrderbookItem>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOrderbooksStreamResponse {
    #[prost(int64, tag = "1")]
    #[serde(
        serialize_with = "serde_helpers::serialize_i64_string",
        deserialize_with = "serde_helpers::deserialize_i64_string"
    )]
    pub slot: i64,
    #[prost(message, optional, tag = "2")]
    pub orderbook: Option<GetOrderbookResponse>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trade {
    #[prost(enumeration = "Side", tag = "1")]
    #[serde(
        serialize_with = "serde_helpers::serialize_enum::<Side, _>",
        deserialize_with = "serde_helpers::deserialize_enum::<Side, _>"
    )]
    pub side: i32,
    #[prost(double, tag = "2")]
    pub size: f64,
    #[prost(double, tag = "3")]
    pub price: f64,
    #[prost(string, tag = "4")]
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[prost(bool, tag = "5")]
    pub is_maker: bool,
    #[prost(double, tag = "6")]
    pub fee_cost: f64,
    #[prost(uint64, tag = "7")]
    #[serde(
        rename = "clientOrderID",
        serialize_with = "serde_helpers::serialize_u64_string",
        deserialize_with = "serde_helpers::deserialize_u64_string"
    )]
    pub client_order_id: u64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetTradesResponse {
    #[prost(message, repeated, tag = "1")]
    pub trades: Vec<Trade>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetTradesStreamResponse {
    #[prost(int64, tag = "1")]
    #[serde(
        serialize_with = "serde_helpers::serialize_i64_string",
        deserialize_with = "serde_helpers::deserialize_i64_string"
    )]
    pub slot: i64,
    #[prost(message, optional, tag = "2")]
    pub trades: Option<GetTradesResponse>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticker {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(string, tag = "2")]
    pub market_address: String,
    #[prost(double, tag = "3")]
    pub bid: f64,
    #[prost(double, tag = "4")]
    pub bid_size: f64,
    #[prost(double, tag = "5")]
    pub ask: f64,
    #[prost(double, tag = "6")]
    pub ask_size: f64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetTickersResponse {
    #[prost(message, repeated, tag = "1")]
    pub tickers: Vec<Ticker>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenOrder {
    #[prost(string, tag = "1")]
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[prost(string, tag = "2")]
    pub market: String,
    #[prost(enumeration = "Side", tag = "3")]
    #[serde(
        serialize_with = "serde_helpers::serialize_enum::<Side, _>",
        deserialize_with = "serde_helpers::deserialize_enum::<Side, _>"
    )]
    pub side: i32,
    #[prost(enumeration = "OrderType", repeated, tag = "4")]
    #[serde(
        rename = "types",
        serialize_with = "serde_helpers::serialize_enum_list::<OrderType, _>",
        deserialize_with = "serde_helpers::deserialize_enum_list::<OrderType, _>"
    )]
    pub order_types: Vec<i32>,
    #[prost(double, tag = "5")]
    pub price: f64,
    #[prost(double, tag = "6")]
    pub remaining_size: f64,
    #[prost(uint64, tag = "7")]
    #[serde(
        rename = "clientOrderID",
        serialize_with = "serde_helpers::serialize_u64_string",
        deserialize_with = "serde_helpers::deserialize_u64_string"
    )]
    pub client_order_id: u64,
    #[prost(string, tag = "8")]
    pub open_order_account: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOpenOrdersResponse {
    #[prost(message, repeated, tag = "1")]
    pub orders: Vec<OpenOrder>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnsettledAccount {
    #[prost(string, tag = "1")]
    pub account: String,
    #[prost(double, tag = "2")]
    pub base_unsettled: f64,
    #[prost(double, tag = "3")]
    pub quote_unsettled: f64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetUnsettledResponse {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(message, repeated, tag = "2")]
    pub unsettled: Vec<UnsettledAccount>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Market {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(enumeration = "MarketStatus", tag = "2")]
    #[serde(
        serialize_with = "serde_helpers::serialize_enum::<MarketStatus, _>",
        deserialize_with = "serde_helpers::deserialize_enum::<MarketStatus, _>"
    )]
    pub status: i32,
    #[prost(string, tag = "3")]
    pub address: String,
    #[prost(string, tag = "4")]
    pub base_mint: String,
    #[prost(string, tag = "5")]
    pub quote_mint: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetMarketsResponse {
    #[prost(map = "string, message", tag = "1")]
    pub markets: HashMap<String, Market>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenBalance {
    #[prost(string, tag = "1")]
    pub symbol: String,
    #[prost(string, tag = "2")]
    pub token_mint: String,
    #[prost(double, tag = "3")]
    pub settled_amount: f64,
    #[prost(double, tag = "4")]
    pub unsettled_amount: f64,
    #[prost(double, tag = "5")]
    pub open_orders_amount: f64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetAccountBalanceResponse {
    #[prost(message, repeated, tag = "1")]
    pub tokens: Vec<TokenBalance>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    #[prost(string, tag = "1")]
    pub market: String,
    #[prost(string, tag = "2")]
    pub open_order_address: String,
    #[prost(string, tag = "3")]
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[prost(uint64, tag = "4")]
    #[serde(
        rename = "clientOrderID",
        serialize_with = "serde_helpers::serialize_u64_string",
        deserialize_with = "serde_helpers::deserialize_u64_string"
    )]
    pub client_order_id: u64,
    #[prost(enumeration = "OrderStatus", tag = "5")]
    #[serde(
        serialize_with = "serde_helpers::serialize_enum::<OrderStatus, _>",
        deserialize_with = "serde_helpers::deserialize_enum::<OrderStatus, _>"
    )]
    pub order_status: i32,
    #[prost(double, tag = "6")]
    pub quantity_released: f64,
    #[prost(double, tag = "7")]
    pub quantity_remaining: f64,
    #[prost(enumeration = "Side", tag = "8")]
    #[serde(
        serialize_with = "serde_helpers::serialize_enum::<Side, _>",
        deserialize_with = "serde_helpers::deserialize_enum::<Side, _>"
    )]
    pub side: i32,
    #[prost(double, tag = "9")]
    pub fill_price: f64,
    #[prost(double, tag = "10")]
    pub order_price: f64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOrderStatusStreamResponse {
    #[prost(int64, tag = "1")]
    #[serde(
        serialize_with = "serde_helpers::serialize_i64_string",
        deserialize_with = "serde_helpers::deserialize_i64_string"
    )]
    pub slot: i64,
    #[prost(message, optional, tag = "2")]
    pub order_info: Option<OrderStatusUpdate>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostOrderResponse {
    /// Base64 unsigned transaction
    #[prost(string, tag = "1")]
    pub transaction: String,
    #[prost(string, tag = "2")]
    pub open_orders_address: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostSubmitResponse {
    #[prost(string, tag = "1")]
    pub signature: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostCancelOrderResponse {
    #[prost(string, tag = "1")]
    pub transaction: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostCancelAllResponse {
    /// One unsigned transaction per cancellation batch, in submission order
    #[prost(string, repeated, tag = "1")]
    pub transactions: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostSettleResponse {
    #[prost(string, tag = "1")]
    pub transaction: String,
}

/// Optional parameters for order placement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostOrderOpts {
    pub open_orders_address: String,
    pub client_order_id: u64,
    pub skip_pre_flight: bool,
}

/// Order placement parameters
#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    pub owner: String,
    pub payer: String,
    pub market: String,
    pub side: Side,
    pub order_types: Vec<OrderType>,
    pub amount: f64,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_orderbook_decodes_gateway_json() {
        let body = json!({
            "market": "SOL/USDC",
            "marketAddress": "9wFFyRfZBsuAha4YcuxcXLKwMxJR43S7fPfQLusDBzvT",
            "bids": [{"price": 170.2, "size": 1.5, "orderID": "42", "clientOrderID": "5000"}],
            "asks": [{"price": 170.4, "size": 2.0}]
        });

        let orderbook: GetOrderbookResponse = serde_json::from_value(body).unwrap();
        assert_eq!(orderbook.bids.len(), 1);
        assert_eq!(orderbook.bids[0].client_order_id, 5000);
        assert_eq!(orderbook.asks[0].order_id, "");

        let reencoded = serde_json::to_value(&orderbook).unwrap();
        let again: GetOrderbookResponse = serde_json::from_value(reencoded).unwrap();
        assert_eq!(again, orderbook);
    }

    #[test]
    fn test_enum_fields_use_names() {
        let request = PostOrderRequest {
            owner_address: "owner".to_string(),
            payer_address: "payer".to_string(),
            market: "SOL/USDC".to_string(),
            side: Side::SAsk.into(),
            order_types: vec![OrderType::OtLimit.into()],
            amount: 0.1,
            price: 170_200.0,
            open_orders_address: String::new(),
            client_order_id: 7,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["side"], "S_ASK");
        assert_eq!(value["type"], json!(["OT_LIMIT"]));
        assert_eq!(value["clientOrderID"], "7");
        assert_eq!(request.side(), Side::SAsk);
    }

    #[test]
    fn test_enum_accepts_numbers_and_rejects_unknown_names() {
        let trade: Trade = serde_json::from_value(json!({"side": 1})).unwrap();
        assert_eq!(trade.side(), Side::SBid);

        let err = serde_json::from_value::<Trade>(json!({"side": "S_SIDEWAYS"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_limit_zero_is_serialized() {
        let request = GetOrderbookRequest {
            market: "SOL/USDC".to_string(),
            limit: 0,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"market": "SOL/USDC", "limit": 0}));
    }
}
