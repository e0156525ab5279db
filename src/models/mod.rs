use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Path of the order placement endpoint, also embedded in the signed payload
pub const NEW_ORDER_PATH: &str = "/v1/order/new";

/// Maker orders undercut the ask and must rest on the book;
/// taker orders cross the spread immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderType {
    Maker,
    #[default]
    Taker,
}

impl OrderType {
    /// Parse a caller-supplied label; anything other than "maker" is a taker order
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("maker") {
            Self::Maker
        } else {
            Self::Taker
        }
    }

    pub fn is_maker(self) -> bool {
        self == Self::Maker
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Maker => "maker",
            Self::Taker => "taker",
        }
    }
}

/// Which exchange deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangeEnvironment {
    #[default]
    Live,
    Sandbox,
}

impl ExchangeEnvironment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Self::Sandbox
        } else {
            Self::Live
        }
    }
}

/// Validated order parameters for a single invocation
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub account: String,
    pub environment: ExchangeEnvironment,
    pub symbol: String,
    pub fiat_amount: Decimal,
    pub order_type: OrderType,
    pub include_fees: bool,
}

impl OrderRequest {
    /// Base currency of the symbol for display, e.g. "btcusd" -> "BTC"
    pub fn base_currency(&self) -> String {
        self.symbol.to_uppercase().replace("USD", "")
    }
}

/// Current best ask, fetched fresh per invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerSnapshot {
    pub ask: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderOption {
    MakerOrCancel,
    ImmediateOrCancel,
}

impl From<OrderType> for OrderOption {
    fn from(order_type: OrderType) -> Self {
        match order_type {
            OrderType::Maker => Self::MakerOrCancel,
            OrderType::Taker => Self::ImmediateOrCancel,
        }
    }
}

/// Signed order body. Field order is the serialization order and
/// therefore part of the signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPayload {
    pub request: &'static str,
    pub nonce: i64,
    pub symbol: String,
    pub amount: String,
    pub price: String,
    pub side: &'static str,
    #[serde(rename = "type")]
    pub order_kind: &'static str,
    pub options: Vec<OrderOption>,
}

impl OrderPayload {
    /// Build a limit buy for the request at the already formatted price and amount
    pub fn limit_buy(request: &OrderRequest, price: String, amount: String, nonce: i64) -> Self {
        Self {
            request: NEW_ORDER_PATH,
            nonce,
            symbol: request.symbol.clone(),
            amount,
            price,
            side: "buy",
            order_kind: "exchange limit",
            options: vec![OrderOption::from(request.order_type)],
        }
    }
}

/// Exchange acknowledgement of a new order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub original_amount: Option<String>,
    #[serde(default)]
    pub executed_amount: Option<String>,
    #[serde(default)]
    pub is_live: Option<bool>,
    #[serde(default)]
    pub is_cancelled: Option<bool>,
    /// Remaining fields as returned by the exchange
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OrderAck {
    /// Ack for a successful response whose body was not the expected JSON
    pub fn unparsed(body: String) -> Self {
        let mut extra = serde_json::Map::new();
        extra.insert("raw".to_string(), serde_json::Value::String(body));
        Self {
            extra,
            ..Self::default()
        }
    }
}
