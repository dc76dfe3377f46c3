//! Koleo API client.
//!
//! HTTP façade over api.koleo.pl plus the koleo.pl web endpoints, the
//! [`KoleoApi`] trait the rest of the crate is generic over, and an
//! in-memory mock for tests.
//!
//! Key characteristics of the remote service:
//! - timestamps are local-wall-clock ISO strings (no offsets)
//! - the connection search endpoint pages by a departure-after anchor
//!   with no continuation token
//! - an empty 2xx body means "not found" and is surfaced as a 404

mod api;
mod client;
mod error;
mod mock;
pub mod types;

pub use api::KoleoApi;
pub use client::KoleoClient;
pub use error::KoleoError;
pub use mock::MockKoleoClient;
