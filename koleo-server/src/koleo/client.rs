//! Koleo HTTP client.
//!
//! A single reqwest-backed façade over api.koleo.pl and the koleo.pl web
//! endpoints. Owns no retry logic: transient failures propagate to the
//! caller as typed errors.

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::KoleoConfig;
use crate::datetime::format_ymd;

use super::api::KoleoApi;
use super::error::KoleoError;
use super::types::{
    BoardEntry, Brand, Carrier, Connection, ConnectionIdResponse, ConnectionQuery, Station,
    StationSearchResponse, TrainCalendars, TrainDetail,
};

/// Default base URL for the JSON API.
const DEFAULT_API_BASE_URL: &str = "https://api.koleo.pl";

/// Default base URL for the koleo.pl web endpoints (station search,
/// train calendars, train detail).
const DEFAULT_WEB_BASE_URL: &str = "https://koleo.pl";

/// Client identification headers expected by the API.
const KOLEO_VERSION: &str = "2";
const KOLEO_CLIENT: &str = "Nuxt-1";
const USER_AGENT: &str = concat!("koleo-server/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Koleo railway API.
#[derive(Debug, Clone)]
pub struct KoleoClient {
    http: reqwest::Client,
    api_base_url: String,
    web_base_url: String,
    /// Pre-assembled session cookie; absent when no credentials are
    /// configured. Only attached to auth-required requests.
    cookie: Option<String>,
}

/// Options for one request. Everything defaults to off.
#[derive(Default)]
struct RequestOptions<'a> {
    query: &'a [(&'a str, String)],
    body: Option<Value>,
    use_auth: bool,
    extra_headers: &'a [(&'static str, &'static str)],
}

impl KoleoClient {
    /// Create a client from loaded configuration.
    pub fn new(config: &KoleoConfig) -> Result<Self, KoleoError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-koleo-version", HeaderValue::from_static(KOLEO_VERSION));
        headers.insert("x-koleo-client", HeaderValue::from_static(KOLEO_CLIENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            web_base_url: DEFAULT_WEB_BASE_URL.to_string(),
            cookie: config.cookie_header(),
        })
    }

    /// Point both endpoints at a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base_url.clone_from(&url);
        self.web_base_url = url;
        self
    }

    /// Perform a request and return the parsed JSON body.
    ///
    /// Non-2xx responses and syntactically empty bodies become
    /// [`KoleoError::Api`]; a 2xx body that is not valid JSON is returned
    /// as a JSON string value (some web endpoints reply with plain text).
    async fn request(
        &self,
        method: Method,
        path_or_url: &str,
        options: RequestOptions<'_>,
    ) -> Result<Value, KoleoError> {
        let url = if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}{}", self.api_base_url, path_or_url)
        };

        tracing::debug!(method = %method, url = %url, "koleo request");

        let mut builder = self.http.request(method, &url);

        if !options.query.is_empty() {
            builder = builder.query(options.query);
        }

        for (name, value) in options.extra_headers {
            builder = builder.header(*name, *value);
        }

        if options.use_auth {
            if let Some(cookie) = &self.cookie {
                builder = builder.header(reqwest::header::COOKIE, cookie);
            }
        }

        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(KoleoError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.is_empty() {
            return Err(KoleoError::empty_response());
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(text)),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path_or_url: &str) -> Result<T, KoleoError> {
        let value = self
            .request(Method::GET, path_or_url, RequestOptions::default())
            .await?;
        decode(value)
    }
}

/// Decode a JSON value into the expected response shape.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, KoleoError> {
    serde_json::from_value(value).map_err(|e| KoleoError::Json {
        message: e.to_string(),
    })
}

impl KoleoApi for KoleoClient {
    async fn stations(&self) -> Result<Vec<Station>, KoleoError> {
        self.get_json("/v2/main/stations").await
    }

    async fn find_stations(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<Station>, KoleoError> {
        let url = format!("{}/ls", self.web_base_url);
        let value = self
            .request(
                Method::GET,
                &url,
                RequestOptions {
                    query: &[("q", query.to_string()), ("language", language.to_string())],
                    ..RequestOptions::default()
                },
            )
            .await?;
        let response: StationSearchResponse = decode(value)?;
        Ok(response.stations)
    }

    async fn station_by_slug(&self, slug: &str) -> Result<Station, KoleoError> {
        self.get_json(&format!("/v2/main/stations/by_slug/{slug}"))
            .await
    }

    async fn station_info(&self, slug: &str) -> Result<Value, KoleoError> {
        self.request(
            Method::GET,
            &format!("/v2/main/station_info/{slug}"),
            RequestOptions::default(),
        )
        .await
    }

    async fn departures(
        &self,
        station_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BoardEntry>, KoleoError> {
        let day = date.format("%Y-%m-%d").to_string();
        self.get_json(&format!("/v2/main/timetables/{station_id}/{day}/departures"))
            .await
    }

    async fn arrivals(
        &self,
        station_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BoardEntry>, KoleoError> {
        let day = date.format("%Y-%m-%d").to_string();
        self.get_json(&format!("/v2/main/timetables/{station_id}/{day}/arrivals"))
            .await
    }

    async fn train_calendars(
        &self,
        brand: &str,
        number: i64,
        name: Option<&str>,
    ) -> Result<TrainCalendars, KoleoError> {
        let url = format!("{}/pl/train_calendars", self.web_base_url);
        let mut query = vec![("brand", brand.to_string()), ("nr", number.to_string())];
        if let Some(name) = name {
            query.push(("name", name.to_uppercase()));
        }

        let value = self
            .request(
                Method::GET,
                &url,
                RequestOptions {
                    query: query.as_slice(),
                    ..RequestOptions::default()
                },
            )
            .await?;
        decode(value)
    }

    async fn train(&self, id: i64) -> Result<TrainDetail, KoleoError> {
        let url = format!("{}/pl/trains/{id}", self.web_base_url);
        self.get_json(&url).await
    }

    async fn connection(&self, id: i64) -> Result<Value, KoleoError> {
        self.request(
            Method::GET,
            &format!("/v2/main/connections/{id}"),
            RequestOptions::default(),
        )
        .await
    }

    async fn brands(&self) -> Result<Vec<Brand>, KoleoError> {
        self.get_json("/v2/main/brands").await
    }

    async fn carriers(&self) -> Result<Vec<Carrier>, KoleoError> {
        self.get_json("/v2/main/carriers").await
    }

    async fn search_connections(
        &self,
        query: &ConnectionQuery,
    ) -> Result<Vec<Connection>, KoleoError> {
        let mut body = json!({
            "start_id": query.start_station,
            "end_id": query.end_station,
            "departure_after": query.departure_after.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "only_direct": query.only_direct,
        });
        if !query.brand_ids.is_empty() {
            body["allowed_brands"] = json!(query.brand_ids);
        }

        let value = self
            .request(
                Method::POST,
                "/v2/main/eol_connections/search",
                RequestOptions {
                    body: Some(body),
                    extra_headers: &[("accept-eol-response-version", "1")],
                    ..RequestOptions::default()
                },
            )
            .await?;
        decode(value)
    }

    async fn connection_price(&self, uuid: &str) -> Result<Option<Value>, KoleoError> {
        match self
            .request(
                Method::GET,
                &format!("/v2/main/eol_connections/{uuid}/price"),
                RequestOptions::default(),
            )
            .await
        {
            Ok(value) => Ok(Some(value)),
            Err(KoleoError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn connection_id(&self, uuid: &str) -> Result<i64, KoleoError> {
        let value = self
            .request(
                Method::PUT,
                &format!("/v2/main/eol_connections/{uuid}/connection_id"),
                RequestOptions::default(),
            )
            .await?;
        let response: ConnectionIdResponse = decode(value)?;
        Ok(response.connection_id)
    }

    async fn seats_availability(
        &self,
        connection_id: i64,
        train_nr: i64,
        place_type: i64,
    ) -> Result<Value, KoleoError> {
        self.request(
            Method::GET,
            &format!("/v2/main/seats_availability/{connection_id}/{train_nr}/{place_type}"),
            RequestOptions::default(),
        )
        .await
    }

    async fn train_timetable(
        &self,
        train_id: i64,
        operating_day: NaiveDateTime,
    ) -> Result<Value, KoleoError> {
        let day = format_ymd(operating_day);
        self.request(
            Method::GET,
            &format!("/v2/main/train_timetable/{train_id}/{day}"),
            RequestOptions {
                use_auth: true,
                ..RequestOptions::default()
            },
        )
        .await
    }
}
