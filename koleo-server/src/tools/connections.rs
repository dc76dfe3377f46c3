//! Connection search tool.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::datetime::{format_dmy_hm, parse_date_time};
use crate::format::connections::summarize_connections;
use crate::koleo::KoleoApi;
use crate::koleo::types::ConnectionQuery;
use crate::search::{fetch_prices, paginate_connections, resolve_brand_ids};

use super::{ToolCallError, ToolResponse, station_slug, to_data};

/// Search connections between two stations.
///
/// Resolves both stations and the brand catalog concurrently, pages the
/// search until `length` results are collected, then optionally enriches
/// with prices.
#[allow(clippy::too_many_arguments)]
pub async fn search_connections<C: KoleoApi>(
    client: &C,
    start: &str,
    end: &str,
    date: Option<&str>,
    brands: &[String],
    direct: bool,
    include_prices: bool,
    length: usize,
) -> ToolResponse {
    match search_inner(
        client,
        start,
        end,
        date,
        brands,
        direct,
        include_prices,
        length,
    )
    .await
    {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn search_inner<C: KoleoApi>(
    client: &C,
    start: &str,
    end: &str,
    date: Option<&str>,
    brands: &[String],
    direct: bool,
    include_prices: bool,
    length: usize,
) -> Result<ToolResponse, ToolCallError> {
    let dt = parse_date_time(date)?;
    let start_slug = station_slug(start);
    let end_slug = station_slug(end);

    let (start_station, end_station, catalog) = tokio::try_join!(
        client.station_by_slug(&start_slug),
        client.station_by_slug(&end_slug),
        client.brands(),
    )?;

    let brand_ids = resolve_brand_ids(&catalog, brands);

    let query = ConnectionQuery {
        start_station: start_station.id,
        end_station: end_station.id,
        brand_ids,
        departure_after: dt,
        only_direct: direct,
    };

    let results = paginate_connections(client, &query, length).await?;

    let prices: BTreeMap<String, Option<Value>> = if include_prices && !results.is_empty() {
        fetch_prices(client, &results).await?
    } else {
        BTreeMap::new()
    };

    let data: Vec<Value> = results
        .iter()
        .map(|connection| {
            json!({
                "connection": to_data(connection),
                "price": prices.get(&connection.uuid).cloned().flatten(),
            })
        })
        .collect();

    let summary = summarize_connections(&results, &start_station.name, &end_station.name, &prices);

    Ok(ToolResponse::ok(
        Value::Array(data),
        summary,
        format!(
            "https://koleo.pl/rozklad-pkp/{start_slug}/{end_slug}/{}/{}/all",
            format_dmy_hm(dt),
            if direct { "direct" } else { "all" }
        ),
    ))
}
