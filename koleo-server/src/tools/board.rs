//! Departure/arrival board tools.

use serde::Serialize;

use crate::datetime::{format_iso_minute, format_ymd, format_ymd_hm, parse_date_time};
use crate::format::board::{BoardKind, summarize_board};
use crate::format::clip_minute;
use crate::koleo::KoleoApi;
use crate::koleo::types::BoardEntry;

use super::{ToolCallError, ToolResponse, resolve_station, to_data};

/// Upcoming departures from a station, at or after the given time.
pub async fn get_departures<C: KoleoApi>(
    client: &C,
    station: &str,
    date: Option<&str>,
) -> ToolResponse {
    match board_inner(client, station, date, BoardKind::Departure).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Upcoming arrivals at a station, at or after the given time.
pub async fn get_arrivals<C: KoleoApi>(
    client: &C,
    station: &str,
    date: Option<&str>,
) -> ToolResponse {
    match board_inner(client, station, date, BoardKind::Arrival).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn board_inner<C: KoleoApi>(
    client: &C,
    station: &str,
    date: Option<&str>,
    kind: BoardKind,
) -> Result<ToolResponse, ToolCallError> {
    let dt = parse_date_time(date)?;
    let resolved = resolve_station(client, station).await?;

    let entries = match kind {
        BoardKind::Departure => client.departures(resolved.id, dt.date()).await?,
        BoardKind::Arrival => client.arrivals(resolved.id, dt.date()).await?,
    };

    // Lexical comparison works because both sides are zero-padded ISO.
    let cutoff = format_iso_minute(dt);
    let filtered: Vec<BoardEntry> = entries
        .into_iter()
        .filter(|entry| kind.time_of(entry).unwrap_or_default() >= cutoff.as_str())
        .collect();

    let path_segment = match kind {
        BoardKind::Departure => "odjazdy",
        BoardKind::Arrival => "przyjazdy",
    };

    Ok(ToolResponse::ok(
        to_data(&filtered),
        summarize_board(&filtered, &resolved.name, &format_ymd_hm(dt), kind),
        format!(
            "https://koleo.pl/dworzec-pkp/{}/{}/{}",
            resolved.name_slug,
            path_segment,
            format_ymd(dt)
        ),
    ))
}

/// A merged board row tagged with its direction.
#[derive(Debug, Serialize)]
struct MergedEntry {
    train: BoardEntry,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// All trains (departures and arrivals) at a station, merged and sorted
/// by time.
pub async fn get_all_trains<C: KoleoApi>(
    client: &C,
    station: &str,
    date: Option<&str>,
) -> ToolResponse {
    match all_trains_inner(client, station, date).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn all_trains_inner<C: KoleoApi>(
    client: &C,
    station: &str,
    date: Option<&str>,
) -> Result<ToolResponse, ToolCallError> {
    let dt = parse_date_time(date)?;
    let resolved = resolve_station(client, station).await?;

    let (departures, arrivals) = tokio::try_join!(
        client.departures(resolved.id, dt.date()),
        client.arrivals(resolved.id, dt.date()),
    )?;

    let cutoff = format_iso_minute(dt);
    let keep = |value: Option<&str>| value.unwrap_or_default() >= cutoff.as_str();

    let mut merged: Vec<(BoardEntry, BoardKind)> = departures
        .into_iter()
        .filter(|e| keep(e.departure.as_deref()))
        .map(|e| (e, BoardKind::Departure))
        .chain(
            arrivals
                .into_iter()
                .filter(|e| keep(e.arrival.as_deref()))
                .map(|e| (e, BoardKind::Arrival)),
        )
        .collect();

    merged.sort_by(|(a, a_kind), (b, b_kind)| {
        let a_time = a_kind.time_of(a).unwrap_or_default();
        let b_time = b_kind.time_of(b).unwrap_or_default();
        a_time.cmp(b_time)
    });

    let mut lines: Vec<String> = merged
        .iter()
        .take(20)
        .map(|(entry, kind)| {
            let time = clip_minute(kind.time_of(entry).unwrap_or_default());
            let name = entry.train_full_name.as_deref().unwrap_or_default();
            let terminus = entry
                .stations
                .first()
                .and_then(|s| s.name.as_deref())
                .unwrap_or_default();
            format!("  {} {}  {}  ({})", kind.label(), time, name, terminus)
        })
        .collect();

    if merged.len() > 20 {
        lines.push(format!("  ... and {} more", merged.len() - 20));
    }

    let data: Vec<MergedEntry> = merged
        .into_iter()
        .map(|(train, kind)| MergedEntry {
            train,
            kind: match kind {
                BoardKind::Departure => "departure",
                BoardKind::Arrival => "arrival",
            },
        })
        .collect();

    Ok(ToolResponse::ok(
        to_data(&data),
        format!(
            "{} -- all trains on {}:\n{}",
            resolved.name,
            format_ymd_hm(dt),
            lines.join("\n")
        ),
        format!(
            "https://koleo.pl/dworzec-pkp/{}/odjazdy/{}",
            resolved.name_slug,
            format_ymd(dt)
        ),
    ))
}
