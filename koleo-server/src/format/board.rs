//! Departure/arrival board summaries.

use crate::koleo::types::BoardEntry;

use super::clip_minute;

/// Which side of the board a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardKind {
    Departure,
    Arrival,
}

impl BoardKind {
    /// Board heading ("Departures"/"Arrivals").
    pub fn heading(self) -> &'static str {
        match self {
            BoardKind::Departure => "Departures",
            BoardKind::Arrival => "Arrivals",
        }
    }

    /// Short row label used in merged listings.
    pub fn label(self) -> &'static str {
        match self {
            BoardKind::Departure => "DEP",
            BoardKind::Arrival => "ARR",
        }
    }

    /// The timestamp relevant for this kind of row.
    pub fn time_of<'a>(self, entry: &'a BoardEntry) -> Option<&'a str> {
        match self {
            BoardKind::Departure => entry.departure.as_deref(),
            BoardKind::Arrival => entry.arrival.as_deref(),
        }
    }
}

/// One board row: time, train name, terminus, platform/track.
pub fn format_board_entry(entry: &BoardEntry, kind: BoardKind) -> String {
    let time = match kind.time_of(entry) {
        Some(value) if !value.is_empty() => clip_minute(value),
        _ => "??:??",
    };
    let name = entry.train_full_name.as_deref().unwrap_or_default();
    let terminus = entry
        .stations
        .first()
        .and_then(|s| s.name.as_deref())
        .unwrap_or_default();

    let mut position = String::new();
    if let Some(platform) = entry.platform.as_deref().filter(|p| !p.is_empty()) {
        position.push_str(&format!(" pl.{platform}"));
    }
    if let Some(track) = entry.track.as_deref().filter(|t| !t.is_empty()) {
        position.push_str(&format!("/{track}"));
    }

    format!("{time}  {name}  ({terminus}){position}")
}

/// Multi-line board summary: header plus up to 20 rows.
pub fn summarize_board(
    entries: &[BoardEntry],
    station_name: &str,
    date_string: &str,
    kind: BoardKind,
) -> String {
    let mut lines = vec![format!(
        "{station_name} -- {} on {date_string}:",
        kind.heading()
    )];

    for entry in entries.iter().take(20) {
        lines.push(format_board_entry(entry, kind));
    }

    if entries.len() > 20 {
        lines.push(format!("  ... and {} more", entries.len() - 20));
    }

    if entries.is_empty() {
        lines.push("  No trains found for this time.".to_string());
    }

    lines.join("\n")
}
