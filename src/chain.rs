use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ChainError;
use crate::models::{OptionChainTable, OptionRecord, RawChainDocument};

/// Decode the trading-days-to-expiry suffix of an expiry label,
/// e.g. "2024-06-21:5" -> 5.
pub fn days_to_expiry(expiry: &str) -> Result<i64, ChainError> {
    let (_, suffix) = expiry
        .rsplit_once(':')
        .ok_or_else(|| ChainError::MalformedLabel(expiry.to_string()))?;
    suffix
        .parse::<i64>()
        .map_err(|_| ChainError::MalformedLabel(expiry.to_string()))
}

/// Expiries present on both sides of the document, in the calls-side key
/// order, with day-of-expiry entries dropped.
///
/// The calls and puts expiry key sets must be equal (as sets; key order may
/// differ between the two sides) or the document is rejected outright.
pub fn valid_expiries(doc: &RawChainDocument) -> Result<Vec<String>, ChainError> {
    let call_expiries: HashSet<&str> = doc.calls.keys().map(String::as_str).collect();
    let put_expiries: HashSet<&str> = doc.puts.keys().map(String::as_str).collect();

    if call_expiries != put_expiries {
        return Err(ChainError::SchemaMismatch(format!(
            "call expiries do not match put expiries ({} calls, {} puts)",
            call_expiries.len(),
            put_expiries.len()
        )));
    }

    let mut expiries = Vec::new();
    for expiry in doc.calls.keys() {
        if days_to_expiry(expiry)? != 0 {
            expiries.push(expiry.clone());
        }
    }
    Ok(expiries)
}

/// Build the row table for one expiry: calls rows first, then puts rows,
/// each side in the strike order of the document.
pub fn chain_table(doc: &RawChainDocument, expiry: &str) -> Result<OptionChainTable, ChainError> {
    let calls = strikes_for_expiry(&doc.calls, expiry)?;
    let puts = strikes_for_expiry(&doc.puts, expiry)?;

    let mut rows = Vec::with_capacity(calls.len() + puts.len());
    collect_rows(calls, &mut rows);
    collect_rows(puts, &mut rows);

    Ok(OptionChainTable { rows })
}

/// Tables for every valid expiry, keyed in `valid_expiries` order.
pub fn all_chain_tables(
    doc: &RawChainDocument,
) -> Result<Vec<(String, OptionChainTable)>, ChainError> {
    let expiries = valid_expiries(doc)?;
    let mut tables = Vec::with_capacity(expiries.len());
    for expiry in expiries {
        let table = chain_table(doc, &expiry)?;
        tables.push((expiry, table));
    }
    Ok(tables)
}

fn strikes_for_expiry<'a>(
    side: &'a Map<String, Value>,
    expiry: &str,
) -> Result<&'a Map<String, Value>, ChainError> {
    side.get(expiry)
        .and_then(Value::as_object)
        .ok_or_else(|| ChainError::ExpiryNotFound(expiry.to_string()))
}

/// The provider wraps each strike's record in a single-element list; the
/// first element is the row. An empty or non-list entry is corrupt provider
/// data: skip the strike, keep the rest of the table.
fn collect_rows(strikes: &Map<String, Value>, rows: &mut Vec<OptionRecord>) {
    for (strike, entry) in strikes {
        match first_record(strike, entry) {
            Ok(record) => rows.push(record),
            Err(error) => warn!(strike = %strike, %error, "skipping strike"),
        }
    }
}

fn first_record(strike: &str, entry: &Value) -> Result<OptionRecord, ChainError> {
    entry
        .as_array()
        .and_then(|records| records.first())
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| ChainError::MalformedRecord(strike.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> RawChainDocument {
        serde_json::from_value(value).unwrap()
    }

    fn record(side: &str, strike: f64) -> Value {
        json!([{"putCall": side, "strikePrice": strike, "bid": 1.0, "ask": 1.2}])
    }

    #[test]
    fn test_days_to_expiry() {
        assert_eq!(days_to_expiry("2024-06-21:0").unwrap(), 0);
        assert_eq!(days_to_expiry("X:15").unwrap(), 15);
        assert_eq!(days_to_expiry("2024-06-21:5").unwrap(), 5);

        assert!(matches!(
            days_to_expiry("no-colon"),
            Err(ChainError::MalformedLabel(_))
        ));
        assert!(matches!(
            days_to_expiry("2024-06-21:abc"),
            Err(ChainError::MalformedLabel(_))
        ));
    }

    #[test]
    fn test_valid_expiries_drops_zero_dte() {
        let doc = doc(json!({
            "callExpDateMap": {
                "A:0": {"100.0": record("CALL", 100.0)},
                "B:3": {"100.0": record("CALL", 100.0)}
            },
            "putExpDateMap": {
                "A:0": {"100.0": record("PUT", 100.0)},
                "B:3": {"100.0": record("PUT", 100.0)}
            }
        }));

        assert_eq!(valid_expiries(&doc).unwrap(), vec!["B:3"]);
    }

    #[test]
    fn test_valid_expiries_ignores_key_order() {
        // Same expiry sets, different order on the two sides: still valid,
        // and the calls-side order wins.
        let doc = doc(json!({
            "callExpDateMap": {
                "B:3": {"100.0": record("CALL", 100.0)},
                "A:5": {"100.0": record("CALL", 100.0)}
            },
            "putExpDateMap": {
                "A:5": {"100.0": record("PUT", 100.0)},
                "B:3": {"100.0": record("PUT", 100.0)}
            }
        }));

        assert_eq!(valid_expiries(&doc).unwrap(), vec!["B:3", "A:5"]);
    }

    #[test]
    fn test_valid_expiries_rejects_mismatched_sides() {
        let doc = doc(json!({
            "callExpDateMap": {
                "A:5": {"100.0": record("CALL", 100.0)},
                "B:12": {"100.0": record("CALL", 100.0)}
            },
            "putExpDateMap": {
                "A:5": {"100.0": record("PUT", 100.0)}
            }
        }));

        assert!(matches!(
            valid_expiries(&doc),
            Err(ChainError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_valid_expiries_propagates_malformed_label() {
        let doc = doc(json!({
            "callExpDateMap": {"bad-label": {}},
            "putExpDateMap": {"bad-label": {}}
        }));

        assert!(matches!(
            valid_expiries(&doc),
            Err(ChainError::MalformedLabel(_))
        ));
    }

    #[test]
    fn test_chain_table_concatenates_calls_then_puts() {
        let doc = doc(json!({
            "callExpDateMap": {
                "A:5": {
                    "100.0": record("CALL", 100.0),
                    "105.0": record("CALL", 105.0),
                    "110.0": record("CALL", 110.0)
                }
            },
            "putExpDateMap": {
                "A:5": {
                    "100.0": record("PUT", 100.0),
                    "105.0": record("PUT", 105.0)
                }
            }
        }));

        let table = chain_table(&doc, "A:5").unwrap();
        assert_eq!(table.len(), 5);

        let sides: Vec<&str> = table
            .rows
            .iter()
            .map(|row| row["putCall"].as_str().unwrap())
            .collect();
        assert_eq!(sides, vec!["CALL", "CALL", "CALL", "PUT", "PUT"]);

        // Per-side order follows the document's strike order.
        let strikes: Vec<f64> = table
            .rows
            .iter()
            .map(|row| row["strikePrice"].as_f64().unwrap())
            .collect();
        assert_eq!(strikes, vec![100.0, 105.0, 110.0, 100.0, 105.0]);
    }

    #[test]
    fn test_chain_table_unknown_expiry() {
        let doc = doc(json!({
            "callExpDateMap": {"A:5": {"100.0": record("CALL", 100.0)}},
            "putExpDateMap": {"A:5": {"100.0": record("PUT", 100.0)}}
        }));

        assert!(matches!(
            chain_table(&doc, "Z:9"),
            Err(ChainError::ExpiryNotFound(_))
        ));
    }

    #[test]
    fn test_chain_table_skips_empty_record_lists() {
        let doc = doc(json!({
            "callExpDateMap": {
                "A:5": {
                    "100.0": record("CALL", 100.0),
                    "105.0": [],
                    "110.0": record("CALL", 110.0)
                }
            },
            "putExpDateMap": {
                "A:5": {"100.0": record("PUT", 100.0)}
            }
        }));

        let table = chain_table(&doc, "A:5").unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_all_chain_tables_covers_every_valid_expiry() {
        let doc = doc(json!({
            "callExpDateMap": {
                "A:0": {"100.0": record("CALL", 100.0)},
                "B:3": {"100.0": record("CALL", 100.0), "105.0": record("CALL", 105.0)},
                "C:10": {"100.0": record("CALL", 100.0)}
            },
            "putExpDateMap": {
                "A:0": {"100.0": record("PUT", 100.0)},
                "B:3": {"100.0": record("PUT", 100.0), "105.0": record("PUT", 105.0)},
                "C:10": {"100.0": record("PUT", 100.0)}
            }
        }));

        let tables = all_chain_tables(&doc).unwrap();
        let expiries: Vec<&str> = tables.iter().map(|(e, _)| e.as_str()).collect();
        assert_eq!(expiries, vec!["B:3", "C:10"]);

        // Every non-0dte strike entry shows up exactly once across tables.
        let total_rows: usize = tables.iter().map(|(_, t)| t.len()).sum();
        assert_eq!(total_rows, 4 + 2);
    }

    #[test]
    fn test_table_columns() {
        let doc = doc(json!({
            "callExpDateMap": {"A:5": {"100.0": record("CALL", 100.0)}},
            "putExpDateMap": {"A:5": {"100.0": record("PUT", 100.0)}}
        }));

        let table = chain_table(&doc, "A:5").unwrap();
        assert_eq!(table.columns(), vec!["putCall", "strikePrice", "bid", "ask"]);
    }
}
