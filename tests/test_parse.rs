//! Decoding of `listings/latest` payloads into listing tables.

mod common;

use cmc_listings::{parse_listings, FetchError, FetchErrorKind, ListingTable};
use serde_json::json;

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

#[test]
fn flattens_rows_in_response_order() {
    let table = common::three_coin_table();

    assert_eq!(table.currency, "USD");
    assert_eq!(table.len(), 3);
    let symbols: Vec<_> = table.rows.iter().map(|r| r.coin_symbol.as_str()).collect();
    assert_eq!(symbols, vec!["XRP", "BTC", "ETH"]);
}

#[test]
fn maps_slug_and_quote_fields_to_columns() {
    let table = common::three_coin_table();
    let btc = table.get("BTC").unwrap();

    assert_eq!(btc.coin_name, "bitcoin");
    assert_eq!(btc.price, Some(42000.0));
    assert_eq!(btc.percent_change_1h, Some(0.3));
    assert_eq!(btc.percent_change_24h, Some(5.2));
    assert_eq!(btc.percent_change_7d, Some(10.0));
    assert_eq!(btc.market_cap, Some(42000.0 * 1_000_000.0));
    assert_eq!(btc.volume_24h, Some(42000.0 * 1000.0));
}

#[test]
fn shape_reports_eight_columns() {
    let table = common::three_coin_table();
    assert_eq!(table.shape(), (3, 8));
    assert_eq!(ListingTable::COLUMNS[0], "coin_name");
    assert_eq!(ListingTable::COLUMNS[7], "volume_24h");
}

#[test]
fn symbols_are_sorted_and_distinct() {
    let body = common::envelope(vec![
        common::coin("b", "BBB", 1.0, 0.0, 0.0, 0.0),
        common::coin("a", "AAA", 1.0, 0.0, 0.0, 0.0),
        common::coin("b2", "BBB", 1.0, 0.0, 0.0, 0.0),
    ]);
    let table = parse_listings(&body.to_string(), "USD").unwrap();
    assert_eq!(table.symbols(), vec!["AAA", "BBB"]);
}

#[test]
fn empty_data_array_is_an_empty_table() {
    let table = parse_listings(&common::envelope(vec![]).to_string(), "USD").unwrap();
    assert!(table.is_empty());
}

// ---------------------------------------------------------------------------
// Missing values
// ---------------------------------------------------------------------------

#[test]
fn missing_and_null_numbers_become_none() {
    let body = json!({
        "data": [{
            "slug": "newcoin",
            "symbol": "NEW",
            "quote": {
                "USD": {
                    "price": 0.01,
                    "percent_change_1h": null,
                    "market_cap": null
                }
            }
        }]
    });
    let table = parse_listings(&body.to_string(), "USD").unwrap();
    let row = &table.rows[0];

    assert_eq!(row.price, Some(0.01));
    assert_eq!(row.percent_change_1h, None);
    assert_eq!(row.percent_change_24h, None);
    assert_eq!(row.percent_change_7d, None);
    assert_eq!(row.market_cap, None);
    assert_eq!(row.volume_24h, None);
}

#[test]
fn null_quote_for_currency_leaves_one_row_empty() {
    let body = json!({
        "data": [
            common::coin("bitcoin", "BTC", 42000.0, 0.3, 5.2, 10.0),
            { "slug": "ghost", "symbol": "GHO", "quote": { "USD": null } }
        ]
    });
    let table = parse_listings(&body.to_string(), "USD").unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get("BTC").unwrap().price, Some(42000.0));
    let ghost = table.get("GHO").unwrap();
    assert_eq!(ghost.coin_name, "ghost");
    assert_eq!(ghost.price, None);
    assert_eq!(ghost.percent_change_24h, None);
    assert_eq!(ghost.market_cap, None);
}

#[test]
fn null_quote_object_leaves_one_row_empty() {
    let body = json!({
        "data": [
            common::coin("bitcoin", "BTC", 42000.0, 0.3, 5.2, 10.0),
            { "slug": "ghost", "symbol": "GHO", "quote": null }
        ]
    });
    let table = parse_listings(&body.to_string(), "USD").unwrap();

    assert_eq!(table.len(), 2);
    let ghost = table.get("GHO").unwrap();
    assert_eq!(ghost.price, None);
    assert_eq!(ghost.percent_change_7d, None);
    assert_eq!(ghost.volume_24h, None);
}

#[test]
fn null_identifiers_become_empty_strings() {
    let body = json!({
        "data": [
            common::coin("bitcoin", "BTC", 42000.0, 0.3, 5.2, 10.0),
            { "slug": null, "symbol": null, "quote": { "USD": { "price": 1.5 } } }
        ]
    });
    let table = parse_listings(&body.to_string(), "USD").unwrap();

    assert_eq!(table.len(), 2);
    let row = &table.rows[1];
    assert_eq!(row.coin_name, "");
    assert_eq!(row.coin_symbol, "");
    assert_eq!(row.price, Some(1.5));
}

#[test]
fn quote_for_other_currency_leaves_numbers_empty() {
    let body = common::envelope(vec![common::coin("bitcoin", "BTC", 1.0, 1.0, 1.0, 1.0)]);
    let table = parse_listings(&body.to_string(), "EUR").unwrap();
    let row = &table.rows[0];

    assert_eq!(table.currency, "EUR");
    assert_eq!(row.coin_symbol, "BTC");
    assert_eq!(row.price, None);
    assert_eq!(row.percent_change_7d, None);
}

#[test]
fn uses_quote_keyed_by_requested_currency() {
    let body = json!({
        "data": [{
            "slug": "bitcoin",
            "symbol": "BTC",
            "quote": {
                "USD": { "price": 100.0 },
                "EUR": { "price": 90.0, "percent_change_24h": -2.5 }
            }
        }]
    });
    let table = parse_listings(&body.to_string(), "EUR").unwrap();
    assert_eq!(table.rows[0].price, Some(90.0));
    assert_eq!(table.rows[0].percent_change_24h, Some(-2.5));
}

// ---------------------------------------------------------------------------
// Malformed and error bodies
// ---------------------------------------------------------------------------

#[test]
fn body_without_data_is_malformed() {
    let err = parse_listings("{}", "USD").unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    assert!(!err.is_retryable());
}

#[test]
fn null_data_is_malformed() {
    let err = parse_listings(r#"{"data": null}"#, "USD").unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[test]
fn invalid_json_is_malformed() {
    let err = parse_listings("<html>gateway timeout</html>", "USD").unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[test]
fn non_object_body_is_malformed() {
    let err = parse_listings("[1, 2, 3]", "USD").unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[test]
fn array_body_matching_field_count_is_malformed() {
    let err = parse_listings("[null, []]", "USD").unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
}

#[test]
fn error_status_without_data_is_api_error() {
    let body = json!({
        "status": {
            "error_code": 1002,
            "error_message": "API key missing."
        }
    });
    let err = parse_listings(&body.to_string(), "USD").unwrap_err();
    match err {
        FetchError::Api { code, message, .. } => {
            assert_eq!(code, 1002);
            assert_eq!(message, "API key missing.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn zero_error_code_without_data_is_malformed() {
    let body = json!({ "status": { "error_code": 0 } });
    let err = parse_listings(&body.to_string(), "USD").unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
}
