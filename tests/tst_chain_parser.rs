use serde_json::json;
use tos_chains::chain::{all_chain_tables, chain_table, days_to_expiry, valid_expiries};
use tos_chains::error::ChainError;
use tos_chains::models::RawChainDocument;

/// A provider-shaped document: two live expiries plus a same-day one,
/// several strikes per side, realistic record fields.
fn provider_doc() -> RawChainDocument {
    let record = |side: &str, strike: f64, bid: f64| {
        json!([{
            "putCall": side,
            "symbol": format!("SPY_{}{}", strike, side.chars().next().unwrap()),
            "bid": bid,
            "ask": bid + 0.1,
            "last": bid + 0.05,
            "totalVolume": 1523,
            "openInterest": 8000,
            "strikePrice": strike,
            "delta": if side == "CALL" { 0.55 } else { -0.45 }
        }])
    };

    serde_json::from_value(json!({
        "symbol": "SPY",
        "status": "SUCCESS",
        "underlyingPrice": 420.5,
        "callExpDateMap": {
            "2024-06-21:0": {"420.0": record("CALL", 420.0, 1.1)},
            "2024-06-28:5": {
                "415.0": record("CALL", 415.0, 7.2),
                "420.0": record("CALL", 420.0, 4.1),
                "425.0": record("CALL", 425.0, 2.0)
            },
            "2024-07-19:20": {
                "415.0": record("CALL", 415.0, 11.4),
                "420.0": record("CALL", 420.0, 8.6)
            }
        },
        "putExpDateMap": {
            "2024-06-21:0": {"420.0": record("PUT", 420.0, 1.0)},
            "2024-06-28:5": {
                "415.0": record("PUT", 415.0, 1.9),
                "420.0": record("PUT", 420.0, 3.8),
                "425.0": record("PUT", 425.0, 6.7)
            },
            "2024-07-19:20": {
                "415.0": record("PUT", 415.0, 6.1),
                "420.0": record("PUT", 420.0, 8.9)
            }
        }
    }))
    .unwrap()
}

#[test]
fn test_days_to_expiry_suffix() {
    assert_eq!(days_to_expiry("2024-06-21:0").unwrap(), 0);
    assert_eq!(days_to_expiry("X:15").unwrap(), 15);
    assert!(days_to_expiry("no-colon").is_err());
}

#[test]
fn test_valid_expiries_excludes_same_day() {
    let doc = provider_doc();
    assert_eq!(
        valid_expiries(&doc).unwrap(),
        vec!["2024-06-28:5", "2024-07-19:20"]
    );
}

#[test]
fn test_mismatched_sides_rejected() {
    let doc: RawChainDocument = serde_json::from_value(json!({
        "callExpDateMap": {"2024-06-28:5": {}},
        "putExpDateMap": {"2024-07-19:20": {}}
    }))
    .unwrap();

    assert!(matches!(
        valid_expiries(&doc),
        Err(ChainError::SchemaMismatch(_))
    ));
}

#[test]
fn test_table_shape_for_one_expiry() {
    let doc = provider_doc();
    let table = chain_table(&doc, "2024-06-28:5").unwrap();

    // 3 call strikes + 3 put strikes.
    assert_eq!(table.len(), 6);

    let sides: Vec<&str> = table
        .rows
        .iter()
        .map(|row| row["putCall"].as_str().unwrap())
        .collect();
    assert_eq!(sides, vec!["CALL", "CALL", "CALL", "PUT", "PUT", "PUT"]);

    // Columns are the provider's field names, in provider order.
    assert_eq!(table.columns()[0], "putCall");
    assert!(table.columns().contains(&"openInterest"));
}

#[test]
fn test_all_tables_cover_every_live_strike_once() {
    let doc = provider_doc();
    let tables = all_chain_tables(&doc).unwrap();

    assert_eq!(tables.len(), 2);
    assert!(tables.iter().all(|(expiry, _)| days_to_expiry(expiry).unwrap() != 0));

    // 6 rows for the weekly, 4 for the monthly; nothing from the 0dte maps.
    let row_counts: Vec<usize> = tables.iter().map(|(_, t)| t.len()).collect();
    assert_eq!(row_counts, vec![6, 4]);
}

#[test]
fn test_requested_expiry_must_exist_on_both_sides() {
    let doc: RawChainDocument = serde_json::from_value(json!({
        "callExpDateMap": {
            "2024-06-28:5": {"415.0": [{"bid": 1.0}]},
            "2024-07-19:20": {"415.0": [{"bid": 2.0}]}
        },
        "putExpDateMap": {
            "2024-06-28:5": {"415.0": [{"bid": 1.5}]},
            "2024-07-19:20": {"415.0": [{"bid": 2.5}]}
        }
    }))
    .unwrap();

    assert!(chain_table(&doc, "2024-06-28:5").is_ok());
    assert!(matches!(
        chain_table(&doc, "2024-08-16:48"),
        Err(ChainError::ExpiryNotFound(_))
    ));
}
