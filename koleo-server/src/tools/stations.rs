//! Station search and station info tools.

use std::collections::HashSet;

use serde_json::{Value, json};

use crate::koleo::KoleoApi;

use super::{ToolCallError, ToolResponse, station_slug, to_data};

/// Search stations by name, optionally filtered by type and country.
pub async fn search_stations<C: KoleoApi>(
    client: &C,
    query: &str,
    station_type: Option<&str>,
    country: Option<&str>,
) -> ToolResponse {
    match search_stations_inner(client, query, station_type, country).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn search_stations_inner<C: KoleoApi>(
    client: &C,
    query: &str,
    station_type: Option<&str>,
    country: Option<&str>,
) -> Result<ToolResponse, ToolCallError> {
    let mut results = client.find_stations(query, "pl").await?;

    if let Some(expected) = station_type {
        let expected = expected.to_lowercase();
        results.retain(|station| {
            station
                .station_type
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                == expected
        });
    }

    if let Some(expected) = country {
        // The search endpoint carries no country field; cross-check
        // against the full catalog.
        let expected = expected.to_lowercase();
        let catalog = client.stations().await?;
        let allowed: HashSet<i64> = catalog
            .iter()
            .filter(|station| {
                station.country.as_deref().unwrap_or_default().to_lowercase() == expected
            })
            .map(|station| station.id)
            .collect();
        results.retain(|station| allowed.contains(&station.id));
    }

    let lines: Vec<String> = results
        .iter()
        .take(15)
        .map(|station| {
            format!(
                "  {} (id={}, type={}, slug={})",
                station.name,
                station.id,
                station.station_type.as_deref().unwrap_or_default(),
                station.name_slug
            )
        })
        .collect();

    let url = reqwest::Url::parse_with_params("https://koleo.pl/ls", &[("q", query)])
        .map(String::from)
        .unwrap_or_default();

    Ok(ToolResponse::ok(
        to_data(&results),
        format!(
            "Found {} station(s) matching '{}':\n{}",
            results.len(),
            query,
            lines.join("\n")
        ),
        url,
    ))
}

/// Station detail: address, opening hours, facilities.
pub async fn get_station_info<C: KoleoApi>(client: &C, station: &str) -> ToolResponse {
    match get_station_info_inner(client, station).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn get_station_info_inner<C: KoleoApi>(
    client: &C,
    station: &str,
) -> Result<ToolResponse, ToolCallError> {
    let slug = station_slug(station);

    let (resolved, info) = tokio::try_join!(
        client.station_by_slug(&slug),
        client.station_info(&slug),
    )?;

    let features: Vec<&str> = info
        .get("features")
        .and_then(Value::as_array)
        .map(|features| {
            features
                .iter()
                .filter(|f| f.get("available").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|f| f.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let address = info
        .pointer("/address/full")
        .and_then(Value::as_str)
        .unwrap_or("N/A");

    let opening_hours = info
        .get("opening_hours")
        .and_then(Value::as_array)
        .filter(|hours| !hours.is_empty())
        .map(|hours| {
            hours
                .iter()
                .take(3)
                .map(|h| {
                    format!(
                        "day{}: {}-{}",
                        h.get("day").cloned().unwrap_or(Value::Null),
                        h.get("open").and_then(Value::as_str).unwrap_or("?"),
                        h.get("close").and_then(Value::as_str).unwrap_or("?")
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "N/A".to_string());

    let summary = [
        format!(
            "{} (id={}, slug={})",
            resolved.name, resolved.id, resolved.name_slug
        ),
        format!("  Address: {address}"),
        format!("  Opening hours: {opening_hours}"),
        format!(
            "  Features: {}",
            if features.is_empty() {
                "none listed".to_string()
            } else {
                features.join(", ")
            }
        ),
    ]
    .join("\n");

    Ok(ToolResponse::ok(
        json!({ "station": to_data(&resolved), "info": info }),
        summary,
        format!("https://koleo.pl/dworzec-pkp/{slug}"),
    ))
}
