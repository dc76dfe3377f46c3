//! Realtime timetable tool (authenticated).

use serde_json::Value;

use crate::config::KoleoConfig;
use crate::datetime::{format_ymd, parse_date_time};
use crate::koleo::KoleoApi;

use super::{ToolCallError, ToolErrorKind, ToolResponse};

fn clock_of(value: Option<&Value>) -> &str {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.get(11..16))
        .unwrap_or("     ")
}

/// Live positions and delays for a train's stops on an operating day.
///
/// Requires credentials; without them the call is rejected up front
/// rather than burning a network round trip on a guaranteed 401.
pub async fn get_realtime_timetable<C: KoleoApi>(
    client: &C,
    config: &KoleoConfig,
    train_id: i64,
    operating_day: Option<&str>,
) -> ToolResponse {
    if !config.has_credentials() {
        return ToolResponse::failed(
            ToolErrorKind::AuthRequired,
            "This tool requires authentication. Create ~/.config/koleo-mcp/config.json with:\n  {\"email\": \"your@email.com\", \"password\": \"yourpassword\"}",
        );
    }

    match realtime_inner(client, train_id, operating_day).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn realtime_inner<C: KoleoApi>(
    client: &C,
    train_id: i64,
    operating_day: Option<&str>,
) -> Result<ToolResponse, ToolCallError> {
    let day = parse_date_time(operating_day)?;
    let timetable = client.train_timetable(train_id, day).await?;

    let stops = timetable
        .get("stops")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut lines: Vec<String> = stops
        .iter()
        .take(15)
        .map(|stop| {
            let actual = clock_of(
                stop.get("actual_departure")
                    .or_else(|| stop.get("actual_arrival")),
            );
            let aimed = clock_of(
                stop.get("aimed_departure")
                    .or_else(|| stop.get("aimed_arrival"))
                    .or_else(|| stop.get("departure")),
            );
            let delayed = if !actual.trim().is_empty() && !aimed.trim().is_empty() && actual != aimed
            {
                " (DELAYED)"
            } else {
                ""
            };
            let station_id = stop.get("station_id").cloned().unwrap_or(Value::Null);
            format!("  {aimed} -> {actual}  station_id={station_id}{delayed}")
        })
        .collect();

    if stops.len() > 15 {
        lines.push(format!("  ... and {} more stops", stops.len() - 15));
    }

    let title = timetable
        .get("train_full_name")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| train_id.to_string());

    Ok(ToolResponse::ok(
        timetable.clone(),
        format!(
            "Realtime timetable: {title} on {}\n{}",
            format_ymd(day),
            lines.join("\n")
        ),
        "",
    ))
}
