//! Tool implementations.
//!
//! Each tool returns a well-formed [`ToolResponse`] envelope on every
//! path; errors never cross the tool boundary. The four-way error code
//! mapping lives in [`ToolCallError::into_response`].

use serde_json::Value;

use crate::datetime::InvalidDateTime;
use crate::koleo::{KoleoApi, KoleoError};
use crate::koleo::types::Station;
use crate::slug::{looks_like_slug, to_slug};

mod board;
mod connections;
mod realtime;
mod seats;
mod stations;
mod trains;

pub use board::{get_all_trains, get_arrivals, get_departures};
pub use connections::search_connections;
pub use realtime::get_realtime_timetable;
pub use seats::{get_brands, get_carriers, get_seat_availability, get_seat_stats};
pub use stations::{get_station_info, search_stations};
pub use trains::{get_train_by_id, get_train_calendar, get_train_route};

/// Error code reported to the caller in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    NotFound,
    AuthRequired,
    InvalidParams,
    Unknown,
}

/// Response envelope shared by every tool.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolResponse {
    pub data: Value,
    pub summary: String,
    pub koleo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolErrorKind>,
}

impl ToolResponse {
    /// Successful response.
    pub fn ok(data: Value, summary: impl Into<String>, koleo_url: impl Into<String>) -> Self {
        Self {
            data,
            summary: summary.into(),
            koleo_url: koleo_url.into(),
            error: None,
        }
    }

    /// Failed response with an error code.
    pub fn failed(kind: ToolErrorKind, summary: impl Into<String>) -> Self {
        Self {
            data: Value::Null,
            summary: summary.into(),
            koleo_url: String::new(),
            error: Some(kind),
        }
    }
}

/// Internal error type for tool bodies; `?`-friendly, translated once at
/// the boundary.
#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    #[error(transparent)]
    Api(#[from] KoleoError),

    #[error(transparent)]
    DateTime(#[from] InvalidDateTime),

    #[error("{0}")]
    InvalidParams(String),
}

impl ToolCallError {
    /// Map to the response envelope per the error taxonomy: 404 means
    /// not_found, 401/403 mean auth_required, a bad datetime means
    /// invalid_params, everything else is unknown with detail embedded
    /// in the summary.
    pub fn into_response(self) -> ToolResponse {
        match self {
            ToolCallError::Api(KoleoError::Api { status: 404, body }) => {
                let detail = if body.is_empty() {
                    "requested resource does not exist".to_string()
                } else {
                    body
                };
                ToolResponse::failed(ToolErrorKind::NotFound, format!("Not found: {detail}"))
            }
            ToolCallError::Api(KoleoError::Api {
                status: status @ (401 | 403),
                ..
            }) => {
                tracing::debug!(status, "auth-required response from Koleo");
                ToolResponse::failed(
                    ToolErrorKind::AuthRequired,
                    "Authentication required. Create ~/.config/koleo-mcp/config.json with email and password.",
                )
            }
            ToolCallError::Api(KoleoError::Api { status, body }) => {
                let detail = if body.is_empty() {
                    "unknown API error".to_string()
                } else {
                    body
                };
                ToolResponse::failed(
                    ToolErrorKind::Unknown,
                    format!("Error: KoleoApiError({status}): {detail}"),
                )
            }
            ToolCallError::Api(other) => {
                ToolResponse::failed(ToolErrorKind::Unknown, format!("Error: {other}"))
            }
            ToolCallError::DateTime(err) => {
                ToolResponse::failed(ToolErrorKind::InvalidParams, err.to_string())
            }
            ToolCallError::InvalidParams(message) => {
                ToolResponse::failed(ToolErrorKind::InvalidParams, message)
            }
        }
    }
}

/// Derive the lookup slug for a station parameter: values that already
/// look like slugs pass through unchanged.
pub(crate) fn station_slug(input: &str) -> String {
    if looks_like_slug(input) {
        input.to_string()
    } else {
        to_slug(input)
    }
}

/// Resolve a station parameter (name or slug) to its station record.
pub(crate) async fn resolve_station<C: KoleoApi>(
    client: &C,
    input: &str,
) -> Result<Station, KoleoError> {
    client.station_by_slug(&station_slug(input)).await
}

/// Serialize a value for the `data` field; serialization of our own
/// types cannot fail in practice, but degrade to null rather than panic.
pub(crate) fn to_data<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ToolErrorKind::NotFound).unwrap(),
            r#""not_found""#
        );
        assert_eq!(
            serde_json::to_string(&ToolErrorKind::AuthRequired).unwrap(),
            r#""auth_required""#
        );
        assert_eq!(
            serde_json::to_string(&ToolErrorKind::InvalidParams).unwrap(),
            r#""invalid_params""#
        );
        assert_eq!(
            serde_json::to_string(&ToolErrorKind::Unknown).unwrap(),
            r#""unknown""#
        );
    }

    #[test]
    fn envelope_omits_absent_error() {
        let ok = ToolResponse::ok(Value::Null, "fine", "");
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("error").is_none());

        let failed = ToolResponse::failed(ToolErrorKind::Unknown, "nope");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], "unknown");
        assert_eq!(json["data"], Value::Null);
    }

    #[test]
    fn maps_404_to_not_found() {
        let response = ToolCallError::Api(KoleoError::Api {
            status: 404,
            body: String::new(),
        })
        .into_response();
        assert_eq!(response.error, Some(ToolErrorKind::NotFound));
        assert_eq!(response.summary, "Not found: requested resource does not exist");
        assert_eq!(response.data, Value::Null);
    }

    #[test]
    fn maps_401_and_403_to_auth_required() {
        for status in [401u16, 403] {
            let response = ToolCallError::Api(KoleoError::Api {
                status,
                body: "denied".into(),
            })
            .into_response();
            assert_eq!(response.error, Some(ToolErrorKind::AuthRequired));
            assert!(response.summary.contains("config.json"));
        }
    }

    #[test]
    fn maps_other_api_errors_to_unknown_with_detail() {
        let response = ToolCallError::Api(KoleoError::Api {
            status: 500,
            body: "oops".into(),
        })
        .into_response();
        assert_eq!(response.error, Some(ToolErrorKind::Unknown));
        assert_eq!(response.summary, "Error: KoleoApiError(500): oops");
    }

    #[test]
    fn maps_bad_datetime_to_invalid_params() {
        let response = ToolCallError::DateTime(InvalidDateTime {
            input: "soonish".into(),
        })
        .into_response();
        assert_eq!(response.error, Some(ToolErrorKind::InvalidParams));
        assert_eq!(response.summary, "invalid datetime: soonish");
    }

    #[test]
    fn station_slug_passthrough_vs_derivation() {
        assert_eq!(station_slug("warszawa-centralna"), "warszawa-centralna");
        assert_eq!(station_slug("Warszawa Centralna"), "warszawa-centralna");
        assert_eq!(station_slug("Kraków Główny"), "krakow-glowny");
        // Single lowercase word has no hyphen: derived, which is a no-op.
        assert_eq!(station_slug("katowice"), "katowice");
    }
}
