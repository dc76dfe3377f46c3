//! Seat availability, brand and carrier tools.

use serde_json::Value;

use crate::datetime::parse_date_time;
use crate::koleo::KoleoApi;
use crate::koleo::types::ConnectionQuery;

use super::{ToolCallError, ToolErrorKind, ToolResponse, station_slug, to_data};

/// Free/reserved/blocked seat counts extracted from an availability
/// payload.
struct SeatCounts {
    total: usize,
    free: usize,
    reserved: usize,
}

impl SeatCounts {
    fn blocked(&self) -> usize {
        self.total - self.free - self.reserved
    }
}

fn seat_counts(availability: &Value) -> SeatCounts {
    let seats = availability
        .get("seats")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let state_count = |state: &str| {
        seats
            .iter()
            .filter(|seat| seat.get("state").and_then(Value::as_str) == Some(state))
            .count()
    };

    SeatCounts {
        total: seats.len(),
        free: state_count("FREE"),
        reserved: state_count("RESERVED"),
    }
}

/// Seat occupancy for a specific train on a connection between two
/// stations.
///
/// Finds the first matching connection in a single search page, resolves
/// it to a numeric connection id and reads the seat map for place type 1
/// (second class).
pub async fn get_seat_stats<C: KoleoApi>(
    client: &C,
    brand: &str,
    train_number: &str,
    date: Option<&str>,
    stations: &[String],
) -> ToolResponse {
    if stations.len() != 2 {
        return ToolResponse::failed(
            ToolErrorKind::InvalidParams,
            "stations parameter is required: provide [start_station, end_station]",
        );
    }

    match seat_stats_inner(client, brand, train_number, date, stations).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn seat_stats_inner<C: KoleoApi>(
    client: &C,
    brand: &str,
    train_number: &str,
    date: Option<&str>,
    stations: &[String],
) -> Result<ToolResponse, ToolCallError> {
    let dt = parse_date_time(date)?;

    let start_slug = station_slug(&stations[0]);
    let end_slug = station_slug(&stations[1]);
    let (start_station, end_station, catalog) = tokio::try_join!(
        client.station_by_slug(&start_slug),
        client.station_by_slug(&end_slug),
        client.brands(),
    )?;

    let brand_upper = brand.to_uppercase();
    let brand_ids: Vec<i64> = match catalog.iter().find(|entry| {
        entry.name.to_uppercase() == brand_upper
            || entry.logo_text.as_deref().unwrap_or_default().to_uppercase() == brand_upper
    }) {
        Some(matched) => vec![matched.id],
        None => catalog.iter().map(|entry| entry.id).collect(),
    };

    let number: Option<i64> = train_number.parse().ok();

    let query = ConnectionQuery {
        start_station: start_station.id,
        end_station: end_station.id,
        brand_ids,
        departure_after: dt,
        only_direct: false,
    };
    let connections = client.search_connections(&query).await?;

    let connection = connections.iter().find(|candidate| {
        candidate
            .legs
            .iter()
            .any(|leg| leg.is_train() && number.is_none_or(|n| leg.train_nr == Some(n)))
    });

    let Some(connection) = connection else {
        return Ok(ToolResponse::ok(
            Value::Null,
            format!("Train {brand} {train_number} not found on this connection"),
            "",
        ));
    };

    let connection_id = client.connection_id(&connection.uuid).await?;
    let detail = client.connection(connection_id).await?;
    let train_nr = detail
        .pointer("/trains/0/train_nr")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let availability = client.seats_availability(connection_id, train_nr, 1).await?;
    let counts = seat_counts(&availability);

    Ok(ToolResponse::ok(
        availability,
        format!(
            "{brand} {train_number} on {} -> {}:\n  {}/{} seats free, {} reserved, {} blocked",
            start_station.name,
            end_station.name,
            counts.free,
            counts.total,
            counts.reserved,
            counts.blocked()
        ),
        "",
    ))
}

/// Raw seat map for a known connection id, train number and place type.
pub async fn get_seat_availability<C: KoleoApi>(
    client: &C,
    connection_id: i64,
    train_nr: i64,
    place_type: i64,
) -> ToolResponse {
    match seat_availability_inner(client, connection_id, train_nr, place_type).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn seat_availability_inner<C: KoleoApi>(
    client: &C,
    connection_id: i64,
    train_nr: i64,
    place_type: i64,
) -> Result<ToolResponse, ToolCallError> {
    let availability = client
        .seats_availability(connection_id, train_nr, place_type)
        .await?;
    let counts = seat_counts(&availability);

    Ok(ToolResponse::ok(
        availability,
        format!(
            "{}/{} seats free for connection {connection_id}, train {train_nr}, type {place_type}",
            counts.free, counts.total
        ),
        "",
    ))
}

/// List train brands (service tiers).
pub async fn get_brands<C: KoleoApi>(client: &C) -> ToolResponse {
    match brands_inner(client).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn brands_inner<C: KoleoApi>(client: &C) -> Result<ToolResponse, ToolCallError> {
    let brands = client.brands().await?;

    let lines: Vec<String> = brands
        .iter()
        .map(|brand| {
            format!(
                "  {:<6} ({})",
                brand.logo_text.as_deref().unwrap_or_default(),
                brand.name
            )
        })
        .collect();

    Ok(ToolResponse::ok(
        to_data(&brands),
        format!("Available train brands:\n{}", lines.join("\n")),
        "",
    ))
}

/// List carrier companies.
pub async fn get_carriers<C: KoleoApi>(client: &C) -> ToolResponse {
    match carriers_inner(client).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn carriers_inner<C: KoleoApi>(client: &C) -> Result<ToolResponse, ToolCallError> {
    let carriers = client.carriers().await?;

    let lines: Vec<String> = carriers
        .iter()
        .map(|carrier| {
            format!(
                "  {:<6} -- {}",
                carrier.short_name.as_deref().unwrap_or_default(),
                carrier.name
            )
        })
        .collect();

    Ok(ToolResponse::ok(
        to_data(&carriers),
        format!("Train carriers:\n{}", lines.join("\n")),
        "",
    ))
}
