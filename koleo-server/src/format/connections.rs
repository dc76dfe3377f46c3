//! Connection search summaries.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::koleo::types::Connection;

use super::clip_minute;

/// Render a price payload for the line suffix.
///
/// The remote `price` field may be a number or a pre-formatted string.
fn price_label(price: &Value) -> String {
    match price.get("price") {
        Some(Value::String(s)) => format!("  [{s}]"),
        Some(other) if !other.is_null() => format!("  [{other}]"),
        _ => String::new(),
    }
}

/// One connection line: times, duration, changes, trains, price.
pub fn format_connection(connection: &Connection, price: Option<&Value>) -> String {
    let departure = connection
        .departure
        .as_deref()
        .map(clip_minute)
        .unwrap_or_default();
    let arrival = connection
        .arrival
        .as_deref()
        .map(clip_minute)
        .unwrap_or_default();
    let duration = connection.duration.unwrap_or(0);
    let changes = connection.changes.unwrap_or(0);

    let trains: Vec<&str> = connection
        .legs
        .iter()
        .filter(|leg| leg.is_train())
        .filter_map(|leg| leg.train_full_name.as_deref())
        .filter(|name| !name.is_empty())
        .collect();

    let changes_label = if changes > 0 {
        format!("{changes} change(s)")
    } else {
        "direct".to_string()
    };
    let price_suffix = price.map(price_label).unwrap_or_default();

    format!(
        "{departure} -> {arrival}  {duration}min  {changes_label}  via {}{price_suffix}",
        trains.join(", ")
    )
}

/// Multi-line summary of a search result set.
pub fn summarize_connections(
    connections: &[Connection],
    start_name: &str,
    end_name: &str,
    prices: &BTreeMap<String, Option<Value>>,
) -> String {
    let mut lines = vec![format!("Connections {start_name} -> {end_name}:")];

    for connection in connections {
        let price = prices.get(&connection.uuid).and_then(|p| p.as_ref());
        lines.push(format!("  {}", format_connection(connection, price)));
    }

    if connections.is_empty() {
        lines.push("  No connections found.".to_string());
    }

    lines.join("\n")
}
