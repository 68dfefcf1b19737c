//! Local CSV forecast source
//!
//! Expects a header row with a timestamp column (`timestamp`, `date` or
//! `ds`) and a value column (`val` or `value`). Rows that fail to parse are
//! skipped with a warning; the series is returned sorted by time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, warn};

use super::{ForecastError, ForecastProvider, ForecastSample};

const TIMESTAMP_COLUMNS: [&str; 3] = ["timestamp", "date", "ds"];
const VALUE_COLUMNS: [&str; 2] = ["val", "value"];

/// Reads the forecast from a CSV file on every call.
#[derive(Debug, Clone)]
pub struct CsvForecastProvider {
    path: PathBuf,
}

impl CsvForecastProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<ForecastSample>, ForecastError> {
        let file = File::open(&self.path).map_err(|e| ForecastError::Io(self.path.clone(), e))?;
        let mut lines = BufReader::new(file).lines();

        let header = lines
            .next()
            .ok_or(ForecastError::MissingHeader)?
            .map_err(|e| ForecastError::Io(self.path.clone(), e))?;
        let columns: Vec<String> = split_row(&header)
            .iter()
            .map(|c| c.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
            .collect();

        let ts_idx = find_column(&columns, &TIMESTAMP_COLUMNS).ok_or(ForecastError::MissingColumn("timestamp"))?;
        let val_idx = find_column(&columns, &VALUE_COLUMNS).ok_or(ForecastError::MissingColumn("val"))?;

        let mut samples = Vec::new();
        let mut skipped = 0usize;
        for (line_num, line) in lines.enumerate() {
            let line = line.map_err(|e| ForecastError::Io(self.path.clone(), e))?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_row(&line);
            let timestamp = fields.get(ts_idx).and_then(|s| parse_timestamp(s));
            let value = fields
                .get(val_idx)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite());

            match (timestamp, value) {
                (Some(timestamp), Some(value)) => samples.push(ForecastSample { timestamp, value }),
                _ => {
                    if skipped < 10 {
                        warn!(line = line_num + 2, row = %line, "Skipping unparseable forecast row");
                    }
                    skipped += 1;
                }
            }
        }

        samples.sort_by_key(|s| s.timestamp);
        debug!(path = %self.path.display(), rows = samples.len(), skipped, "Forecast CSV parsed");
        Ok(samples)
    }
}

impl ForecastProvider for CsvForecastProvider {
    fn samples(&self) -> Result<Vec<ForecastSample>, ForecastError> {
        self.read()
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

fn find_column(columns: &[String], names: &[&str]) -> Option<usize> {
    columns.iter().position(|c| names.contains(&c.as_str()))
}

/// Split a row on commas, honouring double quotes.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// RFC 3339, naive date-times (assumed UTC), `YYYY-MM-DD`, or Unix seconds.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    s.parse::<i64>().ok().and_then(|secs| DateTime::from_timestamp(secs, 0))
}
