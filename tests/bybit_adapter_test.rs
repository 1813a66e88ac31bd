//! Bybit Adapter Tests - Signed Requests Against a Local Server
//!
//! Serves canned v5 responses from an axum router on a loopback port
//! and checks headers, signatures and envelope handling end to end.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use bybit_signal_relay::adapters::bybit::types::TickersResult;
use bybit_signal_relay::adapters::bybit::{
    BybitAuth, BybitClient, BybitClientConfig, BybitMarketData, BybitOrders,
};
use bybit_signal_relay::config::ExchangeConfig;
use bybit_signal_relay::domain::order::OrderRequest;
use bybit_signal_relay::domain::signal::Side;
use bybit_signal_relay::ports::market_data::MarketDataPort;
use bybit_signal_relay::ports::orders::OrderPort;

const API_KEY: &str = "test-key";
const API_SECRET: &str = "test-secret";

/// True when the request carries a valid signature over `payload`.
fn signed(headers: &HeaderMap, payload: &str) -> bool {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let expected = BybitAuth::new(API_KEY, API_SECRET).sign(
        &header("X-BAPI-TIMESTAMP"),
        &header("X-BAPI-RECV-WINDOW"),
        payload,
    );
    header("X-BAPI-API-KEY") == API_KEY && header("X-BAPI-SIGN") == expected
}

fn bad_sign() -> Json<Value> {
    Json(json!({"retCode": 10004, "retMsg": "error sign!", "result": {}}))
}

async fn wallet_balance(headers: HeaderMap, RawQuery(query): RawQuery) -> Json<Value> {
    let query = query.unwrap_or_default();
    if !signed(&headers, &query) {
        return bad_sign();
    }
    if !query.contains("accountType=UNIFIED") {
        return Json(json!({
            "retCode": 10001,
            "retMsg": "accountType only support UNIFIED",
            "result": {}
        }));
    }
    Json(json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {"list": [{"accountType": "UNIFIED", "coin": [
            {"coin": "USDT", "walletBalance": "1000.25"},
            {"coin": "ETH", "walletBalance": "2"}
        ]}]}
    }))
}

async fn tickers(headers: HeaderMap, RawQuery(query): RawQuery) -> Json<Value> {
    let query = query.unwrap_or_default();
    if !signed(&headers, &query) {
        return bad_sign();
    }
    if query.contains("symbol=ETHUSDT") {
        Json(json!({"retCode": 0, "retMsg": "OK", "result": {
            "category": "spot",
            "list": [{"symbol": "ETHUSDT", "lastPrice": "2000.5"}]
        }}))
    } else {
        Json(json!({"retCode": 10001, "retMsg": "Not supported symbols", "result": {}}))
    }
}

type OrderLog = Arc<std::sync::Mutex<Vec<Value>>>;

async fn create_order(
    State(calls): State<OrderLog>,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    if !signed(&headers, &body) {
        return bad_sign();
    }
    let order: Value = serde_json::from_str(&body).unwrap_or_default();
    calls.lock().unwrap().push(order.clone());

    if order["qty"] == "999" {
        return Json(json!({
            "retCode": 170_131,
            "retMsg": "Insufficient balance.",
            "result": {}
        }));
    }
    Json(json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {"orderId": "1321003749386327552", "orderLinkId": ""}
    }))
}

async fn stall() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"retCode": 0, "retMsg": "OK", "result": {}}))
}

struct MockBybit {
    base_url: String,
    orders: OrderLog,
}

async fn spawn_mock() -> MockBybit {
    let orders = Arc::new(std::sync::Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v5/account/wallet-balance", get(wallet_balance))
        .route("/v5/market/tickers", get(tickers))
        .route("/v5/order/create", post(create_order))
        .with_state(Arc::clone(&orders));

    MockBybit {
        base_url: serve(app).await,
        orders,
    }
}

/// Serve `app` on a loopback port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_with_timeout(base_url: &str, secret: &str, timeout: Duration) -> Arc<BybitClient> {
    let config = BybitClientConfig {
        base_url: base_url.to_string(),
        recv_window_ms: 5000,
        timeout,
    };
    let auth = Arc::new(BybitAuth::new(API_KEY, secret));
    Arc::new(BybitClient::new(auth, config).unwrap())
}

fn client(base_url: &str, secret: &str) -> Arc<BybitClient> {
    client_with_timeout(base_url, secret, Duration::from_secs(2))
}

fn market(base_url: &str, secret: &str) -> BybitMarketData {
    BybitMarketData::new(client(base_url, secret), &ExchangeConfig::default())
}

fn request(qty: &str) -> OrderRequest {
    OrderRequest {
        category: "linear".to_string(),
        symbol: "ETHUSDT".to_string(),
        side: Side::Buy,
        order_type: "Market".to_string(),
        quantity: qty.to_string(),
    }
}

#[tokio::test]
async fn test_market_data_reads_balance_and_price() {
    let mock = spawn_mock().await;
    let market = market(&mock.base_url, API_SECRET);

    assert_eq!(market.get_balance("USDT").await, dec!(1000.25));
    assert_eq!(market.get_balance("ETH").await, dec!(2));
    assert_eq!(market.get_last_price("ETHUSDT").await, dec!(2000.5));
}

#[tokio::test]
async fn test_market_data_failures_read_as_zero() {
    let mock = spawn_mock().await;
    let md = market(&mock.base_url, API_SECRET);

    // unknown coin, unknown symbol
    assert_eq!(md.get_balance("BTC").await, Decimal::ZERO);
    assert_eq!(md.get_last_price("FOOUSDT").await, Decimal::ZERO);

    // wrong secret is rejected by the server
    let unsigned = market(&mock.base_url, "wrong");
    assert_eq!(unsigned.get_balance("USDT").await, Decimal::ZERO);
}

#[tokio::test]
async fn test_unreachable_exchange_reads_as_zero() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base_url = format!("http://{addr}");

    let market = market(&base_url, API_SECRET);
    assert_eq!(market.get_last_price("ETHUSDT").await, Decimal::ZERO);

    let orders = BybitOrders::new(client(&base_url, API_SECRET));
    assert!(orders.place_order(&request("0.04")).await.is_err());
}

#[tokio::test]
async fn test_slow_exchange_hits_request_timeout() {
    let app = Router::new()
        .route("/v5/market/tickers", get(stall))
        .route("/v5/order/create", post(stall));
    let base_url = serve(app).await;
    let client = client_with_timeout(&base_url, API_SECRET, Duration::from_millis(200));

    let market = BybitMarketData::new(Arc::clone(&client), &ExchangeConfig::default());
    let orders = BybitOrders::new(client);

    let started = Instant::now();
    assert_eq!(market.get_last_price("ETHUSDT").await, Decimal::ZERO);
    assert!(orders.place_order(&request("0.04")).await.is_err());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_non_ascii_query_is_signed_as_sent() {
    let mock = spawn_mock().await;
    let client = client(&mock.base_url, API_SECRET);

    let resp = client
        .get::<TickersResult>("/v5/market/tickers", &[("category", "spot"), ("symbol", "ÉTHUSDT")])
        .await
        .unwrap();
    // signature accepted, symbol unknown
    assert_eq!(resp.ret_code, 10001);
    assert_eq!(resp.ret_msg, "Not supported symbols");
}

#[tokio::test]
async fn test_order_create_sends_signed_body() {
    let mock = spawn_mock().await;
    let orders = BybitOrders::new(client(&mock.base_url, API_SECRET));

    let ack = orders.place_order(&request("0.04")).await.unwrap();
    assert!(ack.is_success());
    assert_eq!(ack.order_id.as_deref(), Some("1321003749386327552"));

    let sent = mock.orders.lock().unwrap().clone();
    assert_eq!(
        sent,
        vec![json!({
            "category": "linear",
            "symbol": "ETHUSDT",
            "side": "Buy",
            "orderType": "Market",
            "qty": "0.04"
        })]
    );
}

#[tokio::test]
async fn test_order_rejection_is_an_ack() {
    let mock = spawn_mock().await;
    let orders = BybitOrders::new(client(&mock.base_url, API_SECRET));

    let ack = orders.place_order(&request("999")).await.unwrap();
    assert!(!ack.is_success());
    assert_eq!(ack.ret_code, 170_131);
    assert_eq!(ack.ret_msg, "Insufficient balance.");
    assert!(ack.order_id.is_none());
}
