//! Shared test fixtures for the listings client integration tests.
//!
//! Provides sample `listings/latest` payloads, tables built from them, and a
//! loopback HTTP stub that serves a canned response and records every request
//! it receives.

#![allow(dead_code)]

use cmc_listings::{parse_listings, ListingRecord, ListingTable};
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// One `data` element with a USD quote.
pub fn coin(slug: &str, symbol: &str, price: f64, ch_1h: f64, ch_24h: f64, ch_7d: f64) -> Value {
    json!({
        "id": 1,
        "name": slug,
        "slug": slug,
        "symbol": symbol,
        "cmc_rank": 1,
        "quote": {
            "USD": {
                "price": price,
                "volume_24h": price * 1000.0,
                "percent_change_1h": ch_1h,
                "percent_change_24h": ch_24h,
                "percent_change_7d": ch_7d,
                "market_cap": price * 1_000_000.0,
                "last_updated": "2024-01-01T00:00:00.000Z"
            }
        }
    })
}

/// Wrap `data` in a successful response envelope.
pub fn envelope(data: Vec<Value>) -> Value {
    json!({
        "status": {
            "timestamp": "2024-01-01T00:00:00.000Z",
            "error_code": 0,
            "error_message": null,
            "elapsed": 10,
            "credit_count": 1
        },
        "data": data
    })
}

/// Three coins, deliberately not in symbol order:
/// XRP (24h 0.0), BTC (24h +5.2), ETH (24h -1.1).
pub fn three_coin_payload() -> Value {
    envelope(vec![
        coin("xrp", "XRP", 0.5, 0.0, 0.0, -3.0),
        coin("bitcoin", "BTC", 42000.0, 0.3, 5.2, 10.0),
        coin("ethereum", "ETH", 2200.0, -0.2, -1.1, 4.0),
    ])
}

pub fn three_coin_table() -> ListingTable {
    parse_listings(&three_coin_payload().to_string(), "USD").unwrap()
}

/// Build a record directly, without going through JSON.
pub fn record(symbol: &str, ch_1h: Option<f64>, ch_24h: Option<f64>, ch_7d: Option<f64>) -> ListingRecord {
    ListingRecord {
        coin_name: symbol.to_lowercase(),
        coin_symbol: symbol.to_string(),
        market_cap: Some(1.0),
        percent_change_1h: ch_1h,
        percent_change_24h: ch_24h,
        percent_change_7d: ch_7d,
        price: Some(1.0),
        volume_24h: Some(1.0),
    }
}

/// A table of `n` coins with distinct symbols `C000`.. in reverse order.
pub fn numbered_table(n: usize) -> ListingTable {
    let rows = (0..n)
        .rev()
        .map(|i| {
            let change = i as f64 - (n as f64 / 2.0);
            record(&format!("C{i:03}"), Some(change), Some(change), Some(change))
        })
        .collect();
    ListingTable::new("USD", rows)
}

// ---------------------------------------------------------------------------
// StubServer
// ---------------------------------------------------------------------------

/// A loopback HTTP server answering every request with the same response.
///
/// The listener thread runs until the test process exits.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let head = read_request_head(&mut stream);
                seen.lock().unwrap().push(head);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::start(status, body.to_string())
    }

    /// Raw request heads (request line plus headers) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn read_request_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
