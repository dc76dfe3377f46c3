//! Connection search aggregation.
//!
//! The search endpoint returns one bounded page per call, anchored to a
//! departure-after timestamp, with no continuation token. Pagination is
//! therefore simulated: after each page the anchor rolls forward past
//! the last-seen departure. This is correct only if pages are internally
//! time-ordered (assumed, not verified) and the skip constant does not
//! jump over distinct services clustered in the same window, an
//! accepted imprecision, preserved as-is.

use std::collections::BTreeMap;

use chrono::Duration;
use futures::future::try_join_all;
use serde_json::Value;

use crate::datetime::parse_api_datetime;
use crate::koleo::types::{Brand, Connection, ConnectionQuery};
use crate::koleo::{KoleoApi, KoleoError};

/// Hard cap on search pages per call, against runaway polling when the
/// upstream never converges.
pub const MAX_SEARCH_PAGES: usize = 10;

/// Cursor advance past the last-seen departure: 30 minutes plus one
/// second, so a connection departing exactly 30 minutes later is not
/// missed by upstream bucketing. Do not tune this constant.
const PAGE_ADVANCE_SECS: i64 = 1801;

/// Collect up to `want` connections by rolling the departure-after
/// cursor across pages.
///
/// Pages are appended whole; truncation happens once at the end, so
/// results stay in the non-decreasing departure order the upstream
/// produced. An empty page is normal termination. A last departure that
/// does not parse also stops the loop: the cursor cannot advance.
pub async fn paginate_connections<C: KoleoApi>(
    client: &C,
    query: &ConnectionQuery,
    want: usize,
) -> Result<Vec<Connection>, KoleoError> {
    let mut results: Vec<Connection> = Vec::new();
    let mut cursor = query.departure_after;
    let mut pages = 0;

    while results.len() < want && pages < MAX_SEARCH_PAGES {
        let page = client
            .search_connections(&ConnectionQuery {
                departure_after: cursor,
                ..query.clone()
            })
            .await?;

        if page.is_empty() {
            break;
        }

        let last_departure = page
            .last()
            .and_then(|c| c.departure.as_deref())
            .and_then(parse_api_datetime);

        results.extend(page);
        pages += 1;

        match last_departure {
            Some(departure) => cursor = departure + Duration::seconds(PAGE_ADVANCE_SECS),
            None => {
                tracing::warn!("last connection departure unparseable; stopping pagination");
                break;
            }
        }
    }

    results.truncate(want);
    Ok(results)
}

/// Resolve requested brand names/codes to numeric brand ids.
///
/// Matching is case-insensitive against the brand name or its short
/// logo code; unmatched names are silently dropped. An empty request
/// resolves to the full catalog (the remote contract treats an empty
/// filter as "all brands" anyway).
pub fn resolve_brand_ids(catalog: &[Brand], requested: &[String]) -> Vec<i64> {
    if requested.is_empty() {
        return catalog.iter().map(|b| b.id).collect();
    }

    let wanted: Vec<String> = requested.iter().map(|b| b.to_lowercase()).collect();
    catalog
        .iter()
        .filter(|brand| {
            let name = brand.name.to_lowercase();
            let code = brand
                .logo_text
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            wanted.contains(&name) || wanted.contains(&code)
        })
        .map(|brand| brand.id)
        .collect()
}

/// Fetch prices for the given connections in parallel, keyed by uuid.
///
/// A per-connection "price unavailable" (remote 404) is `None` in the
/// output; any other failure fails the whole join. Input order is
/// irrelevant to the mapping, which is keyed by uuid.
pub async fn fetch_prices<C: KoleoApi>(
    client: &C,
    connections: &[Connection],
) -> Result<BTreeMap<String, Option<Value>>, KoleoError> {
    let prices = try_join_all(
        connections
            .iter()
            .map(|connection| client.connection_price(&connection.uuid)),
    )
    .await?;

    Ok(connections
        .iter()
        .map(|connection| connection.uuid.clone())
        .zip(prices)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koleo::MockKoleoClient;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn query() -> ConnectionQuery {
        ConnectionQuery {
            start_station: 1,
            end_station: 2,
            brand_ids: vec![],
            departure_after: start(),
            only_direct: false,
        }
    }

    fn connection(uuid: &str, departure: &str) -> Connection {
        Connection {
            uuid: uuid.to_string(),
            departure: Some(departure.to_string()),
            ..Connection::default()
        }
    }

    #[tokio::test]
    async fn collects_across_pages_and_truncates() {
        let mock = MockKoleoClient::new()
            .with_search_page(vec![
                connection("a", "2024-01-15 10:10:00"),
                connection("b", "2024-01-15 10:40:00"),
            ])
            .with_search_page(vec![
                connection("c", "2024-01-15 11:20:00"),
                connection("d", "2024-01-15 11:50:00"),
            ]);

        let results = paginate_connections(&mock, &query(), 3).await.unwrap();

        let uuids: Vec<&str> = results.iter().map(|c| c.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["a", "b", "c"]);
        assert_eq!(mock.search_call_count(), 2);
    }

    #[tokio::test]
    async fn never_exceeds_want_even_when_pages_overshoot() {
        let mock = MockKoleoClient::new().with_search_page(vec![
            connection("a", "2024-01-15 10:10:00"),
            connection("b", "2024-01-15 10:20:00"),
            connection("c", "2024-01-15 10:30:00"),
        ]);

        let results = paginate_connections(&mock, &query(), 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn output_departures_are_non_decreasing() {
        let mock = MockKoleoClient::new()
            .with_search_page(vec![
                connection("a", "2024-01-15 10:10:00"),
                connection("b", "2024-01-15 10:40:00"),
            ])
            .with_search_page(vec![connection("c", "2024-01-15 11:20:00")])
            .with_search_page(vec![connection("d", "2024-01-15 12:05:00")]);

        let results = paginate_connections(&mock, &query(), 4).await.unwrap();
        let departures: Vec<NaiveDateTime> = results
            .iter()
            .map(|c| parse_api_datetime(c.departure.as_deref().unwrap()).unwrap())
            .collect();
        assert!(departures.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn empty_page_is_normal_termination() {
        let mock =
            MockKoleoClient::new().with_search_page(vec![connection("a", "2024-01-15 10:10:00")]);

        let results = paginate_connections(&mock, &query(), 5).await.unwrap();
        assert_eq!(results.len(), 1);
        // One page with data, one empty page that stopped the loop.
        assert_eq!(mock.search_call_count(), 2);
    }

    #[tokio::test]
    async fn repeating_full_page_terminates_at_the_page_cap() {
        // Upstream that never advances: the same full page forever. The
        // want count is unreachable; only the page cap stops the loop.
        let mock = MockKoleoClient::new().with_repeating_page(vec![connection(
            "same",
            "2024-01-15 10:10:00",
        )]);

        let results = paginate_connections(&mock, &query(), 100).await.unwrap();
        assert_eq!(mock.search_call_count(), MAX_SEARCH_PAGES);
        assert_eq!(results.len(), MAX_SEARCH_PAGES);
    }

    #[tokio::test]
    async fn cursor_advances_past_last_departure_by_the_skip_constant() {
        let mock = MockKoleoClient::new()
            .with_search_page(vec![connection("a", "2024-01-15 10:10:00")])
            .with_search_page(vec![connection("b", "2024-01-15 11:00:00")]);

        paginate_connections(&mock, &query(), 2).await.unwrap();

        let cursors = mock.search_cursors();
        assert_eq!(cursors[0], start());
        // 10:10:00 + 30min + 1s. The skip is a known-imprecise heuristic
        // against upstream bucketing; this pins the constant, nothing
        // stronger.
        assert_eq!(
            cursors[1],
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 40, 1)
                .unwrap()
        );
    }

    #[tokio::test]
    async fn unparseable_last_departure_stops_the_loop() {
        let mock = MockKoleoClient::new()
            .with_search_page(vec![connection("a", "not a timestamp")])
            .with_search_page(vec![connection("b", "2024-01-15 11:00:00")]);

        let results = paginate_connections(&mock, &query(), 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(mock.search_call_count(), 1);
    }

    #[tokio::test]
    async fn zero_want_makes_no_calls() {
        let mock = MockKoleoClient::new().with_repeating_page(vec![connection(
            "a",
            "2024-01-15 10:10:00",
        )]);

        let results = paginate_connections(&mock, &query(), 0).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(mock.search_call_count(), 0);
    }

    #[test]
    fn brand_resolution_matches_name_or_code_case_insensitively() {
        let catalog = vec![
            Brand {
                id: 1,
                name: "Express InterCity Premium".into(),
                logo_text: Some("EIP".into()),
            },
            Brand {
                id: 2,
                name: "Regio".into(),
                logo_text: Some("REG".into()),
            },
        ];

        assert_eq!(resolve_brand_ids(&catalog, &["eip".into()]), vec![1]);
        assert_eq!(resolve_brand_ids(&catalog, &["REGIO".into()]), vec![2]);
        assert_eq!(
            resolve_brand_ids(&catalog, &["eip".into(), "reg".into()]),
            vec![1, 2]
        );
    }

    #[test]
    fn unmatched_brands_drop_silently() {
        let catalog = vec![Brand {
            id: 1,
            name: "Regio".into(),
            logo_text: Some("REG".into()),
        }];

        // Partially unmatched: the matched subset survives.
        assert_eq!(
            resolve_brand_ids(&catalog, &["regio".into(), "tgv".into()]),
            vec![1]
        );
        // All unmatched: empty filter, which the remote contract reads
        // as "all brands".
        assert!(resolve_brand_ids(&catalog, &["tgv".into()]).is_empty());
    }

    #[test]
    fn empty_request_resolves_to_full_catalog() {
        let catalog = vec![
            Brand {
                id: 7,
                name: "A".into(),
                logo_text: None,
            },
            Brand {
                id: 9,
                name: "B".into(),
                logo_text: None,
            },
        ];
        assert_eq!(resolve_brand_ids(&catalog, &[]), vec![7, 9]);
    }

    #[tokio::test]
    async fn price_enrichment_preserves_the_three_states() {
        let mock = MockKoleoClient::new()
            .with_price("a", Some(json!({"price": 10})))
            .with_price("b", None);

        let connections = vec![
            connection("a", "2024-01-15 10:00:00"),
            connection("b", "2024-01-15 10:30:00"),
        ];

        let prices = fetch_prices(&mock, &connections).await.unwrap();
        assert_eq!(prices.get("a").unwrap(), &Some(json!({"price": 10})));
        // Requested but unavailable: present in the map, value None.
        assert_eq!(prices.get("b").unwrap(), &None);
        // Never requested: absent from the map entirely.
        assert!(!prices.contains_key("c"));
    }

    #[tokio::test]
    async fn non_404_price_failure_fails_the_join() {
        let mock = MockKoleoClient::new().with_price_failure(500, "backend down");

        let connections = vec![connection("a", "2024-01-15 10:00:00")];
        let err = fetch_prices(&mock, &connections).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
