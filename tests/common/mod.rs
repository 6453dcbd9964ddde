#![allow(dead_code)]

use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const SLOTS: [&str; 11] = [
    "fear_and_greed",
    "fear_and_greed_historical",
    "market_momentum_sp500",
    "market_momentum_sp125",
    "stock_price_strength",
    "stock_price_breadth",
    "put_call_options",
    "market_volatility_vix",
    "market_volatility_vix_50",
    "junk_bond_demand",
    "safe_haven_demand",
];

/// A provider-shaped payload: numeric timestamps, nested `data` series
pub fn raw_payload() -> Value {
    let mut root = Map::new();
    root.insert(
        "fear_and_greed".to_string(),
        json!({
            "score": 63.2857142857143,
            "rating": "greed",
            "timestamp": "2024-05-10T23:59:50+00:00",
            "previous_close": 60.1,
            "previous_1_week": 45.0,
            "previous_1_month": 38.4,
            "previous_1_year": 71.9
        }),
    );
    for (i, slot) in SLOTS.iter().enumerate().skip(1) {
        root.insert(
            slot.to_string(),
            json!({
                "timestamp": 1_715_385_590_000_u64 + i as u64,
                "score": 10.0 * i as f64 - 5.0,
                "rating": "fear",
                "data": [{ "x": 1_715_385_590_000_u64, "y": 1.23, "rating": "fear" }]
            }),
        );
    }
    Value::Object(root)
}

/// Serves a single canned HTTP response on a loopback port.
/// The handle resolves to the raw request head the client sent.
pub async fn serve_once(status: u16, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{}/index/fearandgreed/graphdata", addr), handle)
}

/// A loopback URL nothing is listening on
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/graphdata", addr)
}
