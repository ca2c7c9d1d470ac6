use crate::error::{AppError, Result};
use crate::models::RawEvent;
use std::path::Path;

/// Load raw disaster events from a CSV table.
///
/// Required columns: disaster type and the three readings. Missing
/// cells deserialize to `None`; exclusion of incomplete rows happens
/// during dataset construction, not here.
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<RawEvent>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        AppError::Persistence(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let mut events = Vec::new();
    for record in reader.deserialize() {
        let event: RawEvent = record?;
        events.push(event);
    }

    tracing::info!(rows = events.len(), path = %path.display(), "Loaded raw event table");

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Disaster_Type,Temperature (°C),Humidity Level (%),Pollution Level (AQI)";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn test_load_events() {
        let file = write_csv(&[
            "Wildfire,42.0,18.0,310.0",
            "Flood,22.0,88.0,40.0",
            "Earthquake,25.0,,55.0",
        ]);

        let events = load_events(file.path()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].disaster_type, "Wildfire");
        assert_eq!(events[0].temperature, Some(42.0));
        assert!(events[2].humidity.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_events("does/not/exist.csv").unwrap_err();
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
    }
}
