//! Train route summaries.

use crate::koleo::types::{StopTime, TrainHeader, TrainStop};

/// Render a stop time as `HH:MM`.
///
/// Missing times become a five-space blank so columns stay aligned. ISO
/// strings are clipped to their time-of-day portion; bare clock values
/// are zero-padded.
pub fn format_stop_time(value: Option<&StopTime>) -> String {
    match value {
        None => "     ".to_string(),
        Some(StopTime::Clock(time)) => time.display_hm(),
        Some(StopTime::Text(text)) => text.get(11..16).unwrap_or_default().to_string(),
    }
}

/// One route stop: distance, arrival/departure, name, platform.
pub fn format_stop(stop: &TrainStop, base_distance: f64) -> String {
    let distance_km = (stop.distance.unwrap_or(0.0) - base_distance) / 1000.0;
    let arrival = format_stop_time(stop.arrival.as_ref());
    let departure = format_stop_time(stop.departure.as_ref());
    let name = stop
        .station_display_name
        .as_deref()
        .or(stop.station_name.as_deref())
        .unwrap_or("?");
    let position = stop
        .platform
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| format!(" pl.{p}"))
        .unwrap_or_default();

    format!("{:>6.1}km  {arrival} / {departure}  {name}{position}", distance_km)
}

/// Multi-line route summary: header, running days, stop list.
///
/// Distances are shown relative to the first stop, so the route always
/// starts at 0.0km even when the train joins a line partway.
pub fn summarize_train_route(train: &TrainHeader, stops: &[TrainStop]) -> String {
    let mut lines = vec![
        train.train_full_name.clone().unwrap_or_else(|| "?".to_string()),
        format!("  Runs: {}", train.run_desc.as_deref().unwrap_or("N/A")),
        format!("  {} stops:", stops.len()),
    ];

    let base_distance = stops.first().and_then(|s| s.distance).unwrap_or(0.0);
    for stop in stops {
        lines.push(format!("  {}", format_stop(stop, base_distance)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::TimeOfDay;

    fn stop(name: &str, distance: f64, departure: &str) -> TrainStop {
        TrainStop {
            station_name: Some(name.to_string()),
            distance: Some(distance),
            departure: Some(StopTime::Text(departure.to_string())),
            ..TrainStop::default()
        }
    }

    #[test]
    fn stop_time_variants() {
        assert_eq!(format_stop_time(None), "     ");
        assert_eq!(
            format_stop_time(Some(&StopTime::Text("2024-01-15 10:30:00".into()))),
            "10:30"
        );
        assert_eq!(
            format_stop_time(Some(&StopTime::Clock(TimeOfDay {
                hour: 7,
                minute: 5,
                second: None
            }))),
            "07:05"
        );
        // Malformed short string degrades to blank, never panics.
        assert_eq!(format_stop_time(Some(&StopTime::Text("10:30".into()))), "");
    }

    #[test]
    fn stop_line_layout() {
        let mut s = stop("Warszawa Zachodnia", 3500.0, "2024-01-15 10:35:00");
        s.arrival = Some(StopTime::Text("2024-01-15 10:33:00".into()));
        s.platform = Some("III".into());

        assert_eq!(
            format_stop(&s, 0.0),
            "   3.5km  10:33 / 10:35  Warszawa Zachodnia pl.III"
        );
    }

    #[test]
    fn display_name_wins_over_station_name() {
        let mut s = stop("warszawa-centralna", 0.0, "2024-01-15 10:30:00");
        s.station_display_name = Some("Warszawa Centralna".into());
        assert!(format_stop(&s, 0.0).contains("Warszawa Centralna"));
    }

    #[test]
    fn empty_stop_degrades_to_placeholders() {
        assert_eq!(format_stop(&TrainStop::default(), 0.0), "   0.0km        /        ?");
    }

    #[test]
    fn route_distances_are_relative_to_first_stop() {
        let train = TrainHeader {
            train_full_name: Some("IC 1234 MARS".into()),
            run_desc: Some("daily".into()),
        };
        let stops = vec![
            stop("A", 120_000.0, "2024-01-15 10:00:00"),
            stop("B", 155_000.0, "2024-01-15 10:30:00"),
        ];

        let summary = summarize_train_route(&train, &stops);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "IC 1234 MARS");
        assert_eq!(lines[1], "  Runs: daily");
        assert_eq!(lines[2], "  2 stops:");
        assert!(lines[3].contains("   0.0km"));
        assert!(lines[4].contains("  35.0km"));
    }

    #[test]
    fn unknown_train_header_degrades() {
        let summary = summarize_train_route(&TrainHeader::default(), &[]);
        assert!(summary.starts_with("?\n  Runs: N/A\n  0 stops:"));
    }
}
