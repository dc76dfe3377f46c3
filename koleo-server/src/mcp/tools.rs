//! Tool registry and dispatch.
//!
//! One definition per tool for tools/list, and a name-keyed dispatcher
//! for tools/call. Argument structs mirror each tool's input schema;
//! a deserialization failure is reported as an in-band tool error.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::KoleoConfig;
use crate::koleo::KoleoApi;
use crate::tools;

use super::types::{ToolDefinition, ToolResult};

/// All tool definitions, in registration order.
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "tool_search_stations",
            description: "Search for train stations by name. Returns station IDs, slugs, and types.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string"},
                    "type": {"type": "string"},
                    "country": {"type": "string"}
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "tool_get_station_info",
            description: "Get detailed info about a station: address, opening hours, available facilities.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "station": {"type": "string"}
                },
                "required": ["station"]
            }),
        },
        ToolDefinition {
            name: "tool_get_departures",
            description: "Get upcoming train departures from a station.",
            input_schema: board_schema(),
        },
        ToolDefinition {
            name: "tool_get_arrivals",
            description: "Get upcoming train arrivals at a station.",
            input_schema: board_schema(),
        },
        ToolDefinition {
            name: "tool_get_all_trains",
            description: "Get all trains (both departures and arrivals) at a station, sorted by time.",
            input_schema: board_schema(),
        },
        ToolDefinition {
            name: "tool_search_connections",
            description: "Search for train connections between two stations.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "start": {"type": "string"},
                    "end": {"type": "string"},
                    "date": {"type": "string"},
                    "brands": {"type": "array", "items": {"type": "string"}},
                    "direct": {"type": "boolean"},
                    "include_prices": {"type": "boolean"},
                    "length": {"type": "integer"}
                },
                "required": ["start", "end"]
            }),
        },
        ToolDefinition {
            name: "tool_get_train_route",
            description: "Get the full route and stop schedule for a train by brand and number.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "brand": {"type": "string"},
                    "train_number": {"type": "string"},
                    "date": {"type": "string"},
                    "closest": {"type": "boolean"}
                },
                "required": ["brand", "train_number"]
            }),
        },
        ToolDefinition {
            name: "tool_get_train_by_id",
            description: "Get a train route and stops by internal Koleo train ID.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "train_id": {"type": "integer"}
                },
                "required": ["train_id"]
            }),
        },
        ToolDefinition {
            name: "tool_get_train_calendar",
            description: "Get all dates when a specific train runs (operating calendar).",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "brand": {"type": "string"},
                    "train_number": {"type": "string"}
                },
                "required": ["brand", "train_number"]
            }),
        },
        ToolDefinition {
            name: "tool_get_seat_stats",
            description: "Check seat occupancy statistics for a train on a given route segment.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "brand": {"type": "string"},
                    "train_number": {"type": "string"},
                    "stations": {"type": "array", "items": {"type": "string"}},
                    "date": {"type": "string"}
                },
                "required": ["brand", "train_number", "stations"]
            }),
        },
        ToolDefinition {
            name: "tool_get_seat_availability",
            description: "Get raw seat availability for a connection by connection_id, train_nr, and place_type.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "connection_id": {"type": "integer"},
                    "train_nr": {"type": "integer"},
                    "place_type": {"type": "integer"}
                },
                "required": ["connection_id", "train_nr", "place_type"]
            }),
        },
        ToolDefinition {
            name: "tool_get_brands",
            description: "List all available train brands/operators.",
            input_schema: json!({"type": "object", "properties": {}}),
        },
        ToolDefinition {
            name: "tool_get_carriers",
            description: "List all train carriers.",
            input_schema: json!({"type": "object", "properties": {}}),
        },
        ToolDefinition {
            name: "tool_get_realtime_timetable",
            description: "Get realtime timetable for a train, including actual vs scheduled times.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "train_id": {"type": "integer"},
                    "operating_day": {"type": "string"}
                },
                "required": ["train_id"]
            }),
        },
    ]
}

fn board_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "station": {"type": "string"},
            "date": {"type": "string"}
        },
        "required": ["station"]
    })
}

#[derive(Deserialize)]
struct SearchStationsArgs {
    query: String,
    #[serde(rename = "type")]
    station_type: Option<String>,
    country: Option<String>,
}

#[derive(Deserialize)]
struct StationArgs {
    station: String,
}

#[derive(Deserialize)]
struct BoardArgs {
    station: String,
    date: Option<String>,
}

fn default_length() -> usize {
    5
}

#[derive(Deserialize)]
struct SearchConnectionsArgs {
    start: String,
    end: String,
    date: Option<String>,
    #[serde(default)]
    brands: Vec<String>,
    #[serde(default)]
    direct: bool,
    #[serde(default)]
    include_prices: bool,
    #[serde(default = "default_length")]
    length: usize,
}

#[derive(Deserialize)]
struct TrainRouteArgs {
    brand: String,
    train_number: String,
    date: Option<String>,
    #[serde(default)]
    closest: bool,
}

#[derive(Deserialize)]
struct TrainByIdArgs {
    train_id: i64,
}

#[derive(Deserialize)]
struct TrainCalendarArgs {
    brand: String,
    train_number: String,
}

#[derive(Deserialize)]
struct SeatStatsArgs {
    brand: String,
    train_number: String,
    #[serde(default)]
    stations: Vec<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct SeatAvailabilityArgs {
    connection_id: i64,
    train_nr: i64,
    place_type: i64,
}

#[derive(Deserialize)]
struct RealtimeArgs {
    train_id: i64,
    operating_day: Option<String>,
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: &Value) -> Result<T, ToolResult> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| ToolResult::error(format!("Invalid arguments: {e}")))
}

/// Dispatch a tools/call by name.
pub async fn call_tool<C: KoleoApi>(
    client: &C,
    config: &KoleoConfig,
    name: &str,
    arguments: &Value,
) -> ToolResult {
    match dispatch(client, config, name, arguments).await {
        Ok(result) => result,
        Err(error_result) => error_result,
    }
}

async fn dispatch<C: KoleoApi>(
    client: &C,
    config: &KoleoConfig,
    name: &str,
    arguments: &Value,
) -> Result<ToolResult, ToolResult> {
    let result = match name {
        "tool_search_stations" => {
            let args: SearchStationsArgs = parse_args(arguments)?;
            tools::search_stations(
                client,
                &args.query,
                args.station_type.as_deref(),
                args.country.as_deref(),
            )
            .await
        }
        "tool_get_station_info" => {
            let args: StationArgs = parse_args(arguments)?;
            tools::get_station_info(client, &args.station).await
        }
        "tool_get_departures" => {
            let args: BoardArgs = parse_args(arguments)?;
            tools::get_departures(client, &args.station, args.date.as_deref()).await
        }
        "tool_get_arrivals" => {
            let args: BoardArgs = parse_args(arguments)?;
            tools::get_arrivals(client, &args.station, args.date.as_deref()).await
        }
        "tool_get_all_trains" => {
            let args: BoardArgs = parse_args(arguments)?;
            tools::get_all_trains(client, &args.station, args.date.as_deref()).await
        }
        "tool_search_connections" => {
            let args: SearchConnectionsArgs = parse_args(arguments)?;
            tools::search_connections(
                client,
                &args.start,
                &args.end,
                args.date.as_deref(),
                &args.brands,
                args.direct,
                args.include_prices,
                args.length,
            )
            .await
        }
        "tool_get_train_route" => {
            let args: TrainRouteArgs = parse_args(arguments)?;
            tools::get_train_route(
                client,
                &args.brand,
                &args.train_number,
                args.date.as_deref(),
                args.closest,
            )
            .await
        }
        "tool_get_train_by_id" => {
            let args: TrainByIdArgs = parse_args(arguments)?;
            tools::get_train_by_id(client, args.train_id).await
        }
        "tool_get_train_calendar" => {
            let args: TrainCalendarArgs = parse_args(arguments)?;
            tools::get_train_calendar(client, &args.brand, &args.train_number).await
        }
        "tool_get_seat_stats" => {
            let args: SeatStatsArgs = parse_args(arguments)?;
            tools::get_seat_stats(
                client,
                &args.brand,
                &args.train_number,
                args.date.as_deref(),
                &args.stations,
            )
            .await
        }
        "tool_get_seat_availability" => {
            let args: SeatAvailabilityArgs = parse_args(arguments)?;
            tools::get_seat_availability(client, args.connection_id, args.train_nr, args.place_type)
                .await
        }
        "tool_get_brands" => tools::get_brands(client).await,
        "tool_get_carriers" => tools::get_carriers(client).await,
        "tool_get_realtime_timetable" => {
            let args: RealtimeArgs = parse_args(arguments)?;
            tools::get_realtime_timetable(client, config, args.train_id, args.operating_day.as_deref())
                .await
        }
        _ => return Err(ToolResult::error(format!("Unknown tool: {name}"))),
    };

    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koleo::MockKoleoClient;
    use crate::koleo::types::Station;

    fn stations() -> Vec<Station> {
        vec![Station {
            id: 1,
            name: "Warszawa Centralna".into(),
            name_slug: "warszawa-centralna".into(),
            station_type: Some("station".into()),
            country: Some("pl".into()),
        }]
    }

    #[test]
    fn every_tool_is_listed_with_an_object_schema() {
        let defs = list_tools();
        assert_eq!(defs.len(), 14);
        for def in &defs {
            assert!(def.name.starts_with("tool_"), "{}", def.name);
            assert_eq!(def.input_schema["type"], "object");
        }
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let mock = MockKoleoClient::new().with_stations(stations());
        let config = KoleoConfig::default();

        let result = call_tool(
            &mock,
            &config,
            "tool_search_stations",
            &json!({"query": "Warszawa"}),
        )
        .await;

        assert!(!result.is_error);
        assert!(result.content[0].text.contains("Warszawa Centralna"));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["data"][0]["id"], 1);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_in_band_error() {
        let mock = MockKoleoClient::new();
        let config = KoleoConfig::default();

        let result = call_tool(&mock, &config, "tool_do_magic", &Value::Null).await;
        assert!(result.is_error);
        assert!(result.content[0].text.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn missing_required_argument_is_an_in_band_error() {
        let mock = MockKoleoClient::new();
        let config = KoleoConfig::default();

        let result = call_tool(&mock, &config, "tool_get_station_info", &json!({})).await;
        assert!(result.is_error);
        assert!(result.content[0].text.contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn search_connections_defaults_apply() {
        let mock = MockKoleoClient::new().with_stations(vec![
            Station {
                id: 1,
                name: "Warszawa Centralna".into(),
                name_slug: "warszawa-centralna".into(),
                station_type: None,
                country: None,
            },
            Station {
                id: 2,
                name: "Kraków Główny".into(),
                name_slug: "krakow-glowny".into(),
                station_type: None,
                country: None,
            },
        ]);
        let config = KoleoConfig::default();

        let result = call_tool(
            &mock,
            &config,
            "tool_search_connections",
            &json!({
                "start": "warszawa-centralna",
                "end": "krakow-glowny",
                "date": "2024-01-15T10:00"
            }),
        )
        .await;

        // No brands, not direct, no prices, length 5: empty result is fine.
        assert!(!result.is_error);
        assert!(result.content[0].text.contains("No connections found."));
    }

    #[tokio::test]
    async fn tool_failure_surfaces_as_error_result() {
        let mock = MockKoleoClient::new();
        let config = KoleoConfig::default();

        let result = call_tool(
            &mock,
            &config,
            "tool_get_station_info",
            &json!({"station": "nigdzie-takiego"}),
        )
        .await;

        assert!(result.is_error);
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["error"], "not_found");
    }
}
