//! The Koleo API surface as a trait.
//!
//! Tools and the search aggregator are generic over this trait, so they
//! run unchanged against the real HTTP client or the in-memory mock.
//! Pass-through payloads (station info, connection detail, seat maps,
//! realtime timetables) stay as raw JSON; everything the core logic
//! touches is typed.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::error::KoleoError;
use super::types::{
    BoardEntry, Brand, Carrier, Connection, ConnectionQuery, Station, TrainCalendars, TrainDetail,
};

#[allow(async_fn_in_trait)]
pub trait KoleoApi {
    /// Full station catalog.
    async fn stations(&self) -> Result<Vec<Station>, KoleoError>;

    /// Free-text station search.
    async fn find_stations(&self, query: &str, language: &str)
    -> Result<Vec<Station>, KoleoError>;

    /// Station record by its URL slug.
    async fn station_by_slug(&self, slug: &str) -> Result<Station, KoleoError>;

    /// Station facility/address info by slug (pass-through payload).
    async fn station_info(&self, slug: &str) -> Result<Value, KoleoError>;

    /// Departure board for a station on a given day.
    async fn departures(
        &self,
        station_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BoardEntry>, KoleoError>;

    /// Arrival board for a station on a given day.
    async fn arrivals(
        &self,
        station_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BoardEntry>, KoleoError>;

    /// Operating calendars for a train number under a brand.
    async fn train_calendars(
        &self,
        brand: &str,
        number: i64,
        name: Option<&str>,
    ) -> Result<TrainCalendars, KoleoError>;

    /// Train route by internal train id.
    async fn train(&self, id: i64) -> Result<TrainDetail, KoleoError>;

    /// Connection detail by numeric connection id (pass-through payload).
    async fn connection(&self, id: i64) -> Result<Value, KoleoError>;

    /// Brand catalog.
    async fn brands(&self) -> Result<Vec<Brand>, KoleoError>;

    /// Carrier catalog.
    async fn carriers(&self) -> Result<Vec<Carrier>, KoleoError>;

    /// One page of the connection search, anchored at the query's
    /// departure-after cursor.
    async fn search_connections(
        &self,
        query: &ConnectionQuery,
    ) -> Result<Vec<Connection>, KoleoError>;

    /// Price for a connection by uuid.
    ///
    /// A remote 404 resolves to `Ok(None)` ("requested but unavailable");
    /// any other failure propagates.
    async fn connection_price(&self, uuid: &str) -> Result<Option<Value>, KoleoError>;

    /// Resolve a connection uuid to its internal numeric id.
    async fn connection_id(&self, uuid: &str) -> Result<i64, KoleoError>;

    /// Seat availability map (pass-through payload).
    async fn seats_availability(
        &self,
        connection_id: i64,
        train_nr: i64,
        place_type: i64,
    ) -> Result<Value, KoleoError>;

    /// Realtime timetable for a train on an operating day. Requires
    /// session auth.
    async fn train_timetable(
        &self,
        train_id: i64,
        operating_day: NaiveDateTime,
    ) -> Result<Value, KoleoError>;
}
