//! Train route and calendar tools.

use crate::datetime::{format_ymd, parse_date_time};
use crate::format::trains::summarize_train_route;
use crate::koleo::KoleoApi;
use crate::koleo::types::TrainCalendar;

use super::{ToolCallError, ToolResponse, to_data};

/// Parse a train-number parameter; non-numeric input falls back to 0,
/// which the calendar endpoint treats as "no number filter".
fn parse_train_number(raw: &str) -> i64 {
    raw.parse().unwrap_or(0)
}

/// Route and stop schedule for a train, located by brand and number.
///
/// The calendar decides which physical train id runs on the requested
/// date; `closest` (or a date the train skips) falls forward to the next
/// running date.
pub async fn get_train_route<C: KoleoApi>(
    client: &C,
    brand: &str,
    train_number: &str,
    date: Option<&str>,
    closest: bool,
) -> ToolResponse {
    match train_route_inner(client, brand, train_number, date, closest).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn train_route_inner<C: KoleoApi>(
    client: &C,
    brand: &str,
    train_number: &str,
    date: Option<&str>,
    closest: bool,
) -> Result<ToolResponse, ToolCallError> {
    let dt = parse_date_time(date)?;
    let number = parse_train_number(train_number);

    let calendars = client
        .train_calendars(&brand.to_uppercase(), number, None)
        .await?;

    let Some(calendar) = calendars.train_calendars.first() else {
        return Ok(ToolResponse::ok(
            serde_json::Value::Null,
            format!("No train found for {brand} {train_number}"),
            "",
        ));
    };

    let mut date_string = format_ymd(dt);
    if closest || !calendar.date_train_map.contains_key(&date_string) {
        date_string = closest_running_date(calendar, &date_string).unwrap_or(date_string);
    }

    let Some(train_id) = calendar.date_train_map.get(&date_string) else {
        return Ok(ToolResponse::ok(
            serde_json::Value::Null,
            format!("Train {brand} {train_number} does not run on {date_string}"),
            "",
        ));
    };

    let detail = client.train(*train_id).await?;
    Ok(ToolResponse::ok(
        to_data(&detail),
        summarize_train_route(&detail.train, &detail.stops),
        format!("https://koleo.pl/pl/trains/{train_id}"),
    ))
}

/// First running date at or after `from`, else the last date overall.
fn closest_running_date(calendar: &TrainCalendar, from: &str) -> Option<String> {
    let mut dates: Vec<&String> = calendar.dates.iter().collect();
    dates.sort();

    dates
        .iter()
        .find(|d| d.as_str() >= from)
        .or(dates.last())
        .map(|d| (*d).clone())
}

/// Route and stops by internal Koleo train id.
pub async fn get_train_by_id<C: KoleoApi>(client: &C, train_id: i64) -> ToolResponse {
    match train_by_id_inner(client, train_id).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn train_by_id_inner<C: KoleoApi>(
    client: &C,
    train_id: i64,
) -> Result<ToolResponse, ToolCallError> {
    let detail = client.train(train_id).await?;
    Ok(ToolResponse::ok(
        to_data(&detail),
        summarize_train_route(&detail.train, &detail.stops),
        format!("https://koleo.pl/pl/trains/{train_id}"),
    ))
}

/// Operating calendar for a train: all dates it runs plus the next one.
pub async fn get_train_calendar<C: KoleoApi>(
    client: &C,
    brand: &str,
    train_number: &str,
) -> ToolResponse {
    match train_calendar_inner(client, brand, train_number).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn train_calendar_inner<C: KoleoApi>(
    client: &C,
    brand: &str,
    train_number: &str,
) -> Result<ToolResponse, ToolCallError> {
    let number = parse_train_number(train_number);
    let calendars = client
        .train_calendars(&brand.to_uppercase(), number, None)
        .await?;

    let Some(calendar) = calendars.train_calendars.first() else {
        return Ok(ToolResponse::ok(
            serde_json::json!([]),
            format!("No calendar found for {brand} {train_number}"),
            "",
        ));
    };

    let mut dates: Vec<&String> = calendar.dates.iter().collect();
    dates.sort();

    let today = format_ymd(parse_date_time(None)?);
    let next = dates.iter().find(|d| d.as_str() >= today.as_str());

    let summary = format!(
        "{} ({brand} {train_number}) runs on {} day(s). Next: {}.",
        calendar.train_name.as_deref().unwrap_or("?"),
        dates.len(),
        next.map(|d| d.as_str()).unwrap_or("no future dates found")
    );

    Ok(ToolResponse::ok(
        to_data(&calendars.train_calendars),
        summary,
        "",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koleo::MockKoleoClient;
    use crate::koleo::types::{StopTime, TrainCalendars, TrainDetail, TrainHeader, TrainStop};
    use std::collections::BTreeMap;

    fn calendar() -> TrainCalendars {
        TrainCalendars {
            train_calendars: vec![TrainCalendar {
                train_name: Some("KRAKUS".into()),
                dates: vec![
                    "2024-01-14".into(),
                    "2024-01-16".into(),
                    "2024-01-20".into(),
                ],
                date_train_map: BTreeMap::from([
                    ("2024-01-14".to_string(), 100),
                    ("2024-01-16".to_string(), 101),
                    ("2024-01-20".to_string(), 102),
                ]),
            }],
        }
    }

    fn detail() -> TrainDetail {
        TrainDetail {
            train: TrainHeader {
                train_full_name: Some("EIP 5320 KRAKUS".into()),
                run_desc: Some("codziennie".into()),
            },
            stops: vec![TrainStop {
                station_name: Some("Warszawa Centralna".into()),
                departure: Some(StopTime::Text("2024-01-16 10:30:00".into())),
                distance: Some(0.0),
                ..TrainStop::default()
            }],
        }
    }

    #[tokio::test]
    async fn exact_date_resolves_directly() {
        let mock = MockKoleoClient::new()
            .with_calendars(calendar())
            .with_train(101, detail());

        let response = get_train_route(&mock, "eip", "5320", Some("2024-01-16"), false).await;
        assert!(response.error.is_none());
        assert!(response.summary.starts_with("EIP 5320 KRAKUS"));
        assert_eq!(response.koleo_url, "https://koleo.pl/pl/trains/101");
    }

    #[tokio::test]
    async fn skipped_date_falls_forward() {
        let mock = MockKoleoClient::new()
            .with_calendars(calendar())
            .with_train(101, detail());

        // The 15th is not in the calendar: next running day is the 16th.
        let response = get_train_route(&mock, "EIP", "5320", Some("2024-01-15"), false).await;
        assert!(response.error.is_none());
        assert_eq!(response.koleo_url, "https://koleo.pl/pl/trains/101");
    }

    #[tokio::test]
    async fn past_the_calendar_uses_the_last_date() {
        let mock = MockKoleoClient::new()
            .with_calendars(calendar())
            .with_train(102, detail());

        let response = get_train_route(&mock, "EIP", "5320", Some("2024-06-01"), true).await;
        assert!(response.error.is_none());
        assert_eq!(response.koleo_url, "https://koleo.pl/pl/trains/102");
    }

    #[tokio::test]
    async fn unknown_train_reports_without_error_flag() {
        let mock = MockKoleoClient::new();

        let response = get_train_route(&mock, "EIP", "9999", Some("2024-01-16"), false).await;
        // Not an error per the envelope contract: data null, plain summary.
        assert!(response.error.is_none());
        assert_eq!(response.data, serde_json::Value::Null);
        assert!(response.summary.contains("No train found for EIP 9999"));
    }

    #[tokio::test]
    async fn train_by_id_summarizes_route() {
        let mock = MockKoleoClient::new().with_train(77, detail());

        let response = get_train_by_id(&mock, 77).await;
        assert!(response.error.is_none());
        assert!(response.summary.contains("Runs: codziennie"));
        assert!(response.summary.contains("1 stops:"));

        let missing = get_train_by_id(&mock, 78).await;
        assert_eq!(missing.error, Some(crate::tools::ToolErrorKind::NotFound));
    }

    #[tokio::test]
    async fn calendar_summary_names_next_date() {
        let mock = MockKoleoClient::new().with_calendars(calendar());

        let response = get_train_calendar(&mock, "EIP", "5320").await;
        assert!(response.error.is_none());
        assert!(response.summary.contains("KRAKUS (EIP 5320) runs on 3 day(s)."));

        let empty = MockKoleoClient::new();
        let response = get_train_calendar(&empty, "EIP", "1").await;
        assert!(response.summary.contains("No calendar found for EIP 1"));
        assert_eq!(response.data, serde_json::json!([]));
    }

    #[test]
    fn train_number_parsing_falls_back_to_zero() {
        assert_eq!(parse_train_number("5320"), 5320);
        assert_eq!(parse_train_number("KRAKUS"), 0);
        assert_eq!(parse_train_number(""), 0);
    }
}
