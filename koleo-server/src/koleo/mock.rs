//! Mock Koleo client for testing without network access.
//!
//! Holds fixture data in memory and serves it through the same
//! [`KoleoApi`] surface as the real client. Individual endpoints can be
//! made to fail with a chosen status, and connection-search pages are
//! served either from a queue (one page per call) or as a single
//! repeating page (for pagination-bound tests).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::api::KoleoApi;
use super::error::KoleoError;
use super::types::{
    BoardEntry, Brand, Carrier, Connection, ConnectionQuery, Station, TrainCalendars, TrainDetail,
};

/// In-memory Koleo API double.
#[derive(Default)]
pub struct MockKoleoClient {
    stations: Vec<Station>,
    station_infos: HashMap<String, Value>,
    departures: HashMap<i64, Vec<BoardEntry>>,
    arrivals: HashMap<i64, Vec<BoardEntry>>,
    brands: Vec<Brand>,
    carriers: Vec<Carrier>,
    calendars: TrainCalendars,
    trains: HashMap<i64, TrainDetail>,
    connection_details: HashMap<i64, Value>,
    /// uuid -> price; `None` models a remote 404 for that uuid.
    prices: HashMap<String, Option<Value>>,
    connection_ids: HashMap<String, i64>,
    seat_maps: HashMap<(i64, i64, i64), Value>,
    timetables: HashMap<i64, Value>,

    /// Successive search pages, popped one per call.
    search_pages: Mutex<VecDeque<Vec<Connection>>>,
    /// When set, every search call returns this same page.
    repeating_page: Option<Vec<Connection>>,
    search_calls: Mutex<usize>,
    /// Departure-after cursors observed across search calls.
    search_cursors: Mutex<Vec<NaiveDateTime>>,

    /// Injected failure for station lookups.
    station_failure: Option<(u16, String)>,
    /// Injected failure for price lookups (other than the per-uuid 404).
    price_failure: Option<(u16, String)>,
}

impl MockKoleoClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stations(mut self, stations: Vec<Station>) -> Self {
        self.stations = stations;
        self
    }

    pub fn with_station_info(mut self, slug: impl Into<String>, info: Value) -> Self {
        self.station_infos.insert(slug.into(), info);
        self
    }

    pub fn with_departures(mut self, station_id: i64, entries: Vec<BoardEntry>) -> Self {
        self.departures.insert(station_id, entries);
        self
    }

    pub fn with_arrivals(mut self, station_id: i64, entries: Vec<BoardEntry>) -> Self {
        self.arrivals.insert(station_id, entries);
        self
    }

    pub fn with_brands(mut self, brands: Vec<Brand>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_carriers(mut self, carriers: Vec<Carrier>) -> Self {
        self.carriers = carriers;
        self
    }

    pub fn with_calendars(mut self, calendars: TrainCalendars) -> Self {
        self.calendars = calendars;
        self
    }

    pub fn with_train(mut self, id: i64, detail: TrainDetail) -> Self {
        self.trains.insert(id, detail);
        self
    }

    pub fn with_connection_detail(mut self, id: i64, detail: Value) -> Self {
        self.connection_details.insert(id, detail);
        self
    }

    /// Queue one search page; pages are served in insertion order and an
    /// exhausted queue serves empty pages.
    pub fn with_search_page(self, page: Vec<Connection>) -> Self {
        self.search_pages
            .lock()
            .expect("search page lock")
            .push_back(page);
        self
    }

    /// Serve the same page on every search call, regardless of cursor.
    pub fn with_repeating_page(mut self, page: Vec<Connection>) -> Self {
        self.repeating_page = Some(page);
        self
    }

    /// Set the price (or `None` for a 404) for a connection uuid.
    pub fn with_price(mut self, uuid: impl Into<String>, price: Option<Value>) -> Self {
        self.prices.insert(uuid.into(), price);
        self
    }

    pub fn with_connection_id(mut self, uuid: impl Into<String>, id: i64) -> Self {
        self.connection_ids.insert(uuid.into(), id);
        self
    }

    pub fn with_seat_map(
        mut self,
        connection_id: i64,
        train_nr: i64,
        place_type: i64,
        map: Value,
    ) -> Self {
        self.seat_maps
            .insert((connection_id, train_nr, place_type), map);
        self
    }

    pub fn with_timetable(mut self, train_id: i64, timetable: Value) -> Self {
        self.timetables.insert(train_id, timetable);
        self
    }

    /// Make station lookups fail with the given status and body.
    pub fn with_station_failure(mut self, status: u16, body: impl Into<String>) -> Self {
        self.station_failure = Some((status, body.into()));
        self
    }

    /// Make price lookups fail with the given status and body.
    pub fn with_price_failure(mut self, status: u16, body: impl Into<String>) -> Self {
        self.price_failure = Some((status, body.into()));
        self
    }

    /// Number of search pages served so far.
    pub fn search_call_count(&self) -> usize {
        *self.search_calls.lock().expect("search call lock")
    }

    /// Departure-after cursors seen by the search endpoint, in order.
    pub fn search_cursors(&self) -> Vec<NaiveDateTime> {
        self.search_cursors.lock().expect("search cursor lock").clone()
    }

    fn not_found(what: &str) -> KoleoError {
        KoleoError::Api {
            status: 404,
            body: format!("{what} not found"),
        }
    }
}

impl KoleoApi for MockKoleoClient {
    async fn stations(&self) -> Result<Vec<Station>, KoleoError> {
        Ok(self.stations.clone())
    }

    async fn find_stations(
        &self,
        query: &str,
        _language: &str,
    ) -> Result<Vec<Station>, KoleoError> {
        let needle = query.to_lowercase();
        Ok(self
            .stations
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn station_by_slug(&self, slug: &str) -> Result<Station, KoleoError> {
        if let Some((status, body)) = &self.station_failure {
            return Err(KoleoError::Api {
                status: *status,
                body: body.clone(),
            });
        }

        self.stations
            .iter()
            .find(|s| s.name_slug == slug)
            .cloned()
            .ok_or_else(|| Self::not_found("station"))
    }

    async fn station_info(&self, slug: &str) -> Result<Value, KoleoError> {
        self.station_infos
            .get(slug)
            .cloned()
            .ok_or_else(|| Self::not_found("station info"))
    }

    async fn departures(
        &self,
        station_id: i64,
        _date: NaiveDate,
    ) -> Result<Vec<BoardEntry>, KoleoError> {
        Ok(self.departures.get(&station_id).cloned().unwrap_or_default())
    }

    async fn arrivals(
        &self,
        station_id: i64,
        _date: NaiveDate,
    ) -> Result<Vec<BoardEntry>, KoleoError> {
        Ok(self.arrivals.get(&station_id).cloned().unwrap_or_default())
    }

    async fn train_calendars(
        &self,
        _brand: &str,
        _number: i64,
        _name: Option<&str>,
    ) -> Result<TrainCalendars, KoleoError> {
        Ok(self.calendars.clone())
    }

    async fn train(&self, id: i64) -> Result<TrainDetail, KoleoError> {
        self.trains
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found("train"))
    }

    async fn connection(&self, id: i64) -> Result<Value, KoleoError> {
        self.connection_details
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found("connection"))
    }

    async fn brands(&self) -> Result<Vec<Brand>, KoleoError> {
        Ok(self.brands.clone())
    }

    async fn carriers(&self) -> Result<Vec<Carrier>, KoleoError> {
        Ok(self.carriers.clone())
    }

    async fn search_connections(
        &self,
        query: &ConnectionQuery,
    ) -> Result<Vec<Connection>, KoleoError> {
        *self.search_calls.lock().expect("search call lock") += 1;
        self.search_cursors
            .lock()
            .expect("search cursor lock")
            .push(query.departure_after);

        if let Some(page) = &self.repeating_page {
            return Ok(page.clone());
        }

        Ok(self
            .search_pages
            .lock()
            .expect("search page lock")
            .pop_front()
            .unwrap_or_default())
    }

    async fn connection_price(&self, uuid: &str) -> Result<Option<Value>, KoleoError> {
        if let Some((status, body)) = &self.price_failure {
            return Err(KoleoError::Api {
                status: *status,
                body: body.clone(),
            });
        }

        // Like the real client: a fixture `None` is the mapped 404, an
        // unknown uuid is also a 404.
        Ok(self.prices.get(uuid).cloned().flatten())
    }

    async fn connection_id(&self, uuid: &str) -> Result<i64, KoleoError> {
        self.connection_ids
            .get(uuid)
            .copied()
            .ok_or_else(|| Self::not_found("connection id"))
    }

    async fn seats_availability(
        &self,
        connection_id: i64,
        train_nr: i64,
        place_type: i64,
    ) -> Result<Value, KoleoError> {
        self.seat_maps
            .get(&(connection_id, train_nr, place_type))
            .cloned()
            .ok_or_else(|| Self::not_found("seat availability"))
    }

    async fn train_timetable(
        &self,
        train_id: i64,
        _operating_day: NaiveDateTime,
    ) -> Result<Value, KoleoError> {
        self.timetables
            .get(&train_id)
            .cloned()
            .ok_or_else(|| Self::not_found("timetable"))
    }
}
