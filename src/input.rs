use std::path::Path;

use log::warn;
use serde::de::DeserializeOwned;

use crate::error::InputError;
use crate::models::{RawCard, RawReviewSegment};

enum Format {
    Json,
    Csv,
}

fn detect_format(path: &Path) -> Result<Format, InputError> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") => Ok(Format::Json),
        Some("csv") => Ok(Format::Csv),
        _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
    }
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, InputError> {
    let display = path.display().to_string();

    match detect_format(path)? {
        Format::Json => {
            let contents = std::fs::read_to_string(path).map_err(|source| InputError::Io {
                path: display.clone(),
                source,
            })?;
            let rows: Vec<serde_json::Value> =
                serde_json::from_str(&contents).map_err(|source| InputError::Json {
                    path: display.clone(),
                    source,
                })?;

            Ok(rows
                .into_iter()
                .enumerate()
                .filter_map(|(i, row)| match serde_json::from_value::<T>(row) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!("skipping element {i} of {display}: {err}");
                        None
                    }
                })
                .collect())
        }
        Format::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_path(path)
                .map_err(|source| InputError::Csv {
                    path: display.clone(),
                    source,
                })?;

            let mut records = Vec::new();
            for result in reader.deserialize::<T>() {
                match result {
                    Ok(record) => records.push(record),
                    Err(err) if err.is_io_error() => {
                        return Err(InputError::Csv {
                            path: display.clone(),
                            source: err,
                        });
                    }
                    Err(err) => warn!("skipping row of {display}: {err}"),
                }
            }
            Ok(records)
        }
    }
}

pub fn load_cards(path: &Path) -> Result<Vec<RawCard>, InputError> {
    load_records(path)
}

pub fn load_reviews(path: &Path) -> Result<Vec<RawReviewSegment>, InputError> {
    load_records(path)
}
