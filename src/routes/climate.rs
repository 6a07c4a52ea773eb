use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use log::{debug, warn};

use crate::app::AppState;
use crate::error::{ApiError, InternalError};
use crate::models::measurement::{DatasetRange, Measurement, TemperatureStats};
use crate::models::station::Station;
use crate::report::{range_report, start_report};

/// Only observations after this date are served by `/tobs`.
pub const RECENT_YEAR_CUTOFF: &str = "2016-08-23";

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/precipitation", get(get_precipitation))
        .route("/stations", get(get_stations))
        .route("/tobs", get(get_tobs))
        .route("/{start}", get(get_start_summary))
        .route("/{start}/{end}", get(get_range_summary))
        .with_state(state)
}

async fn get_precipitation(
    State(state): State<AppState>,
) -> Result<Json<Vec<Measurement>>, InternalError> {
    Ok(Json(state.store.read(Measurement::fetch_all).await?))
}

async fn get_stations(State(state): State<AppState>) -> Result<Json<Vec<Station>>, InternalError> {
    Ok(Json(state.store.read(Station::fetch_all).await?))
}

async fn get_tobs(State(state): State<AppState>) -> Result<Json<Vec<Measurement>>, InternalError> {
    let measurements = state
        .store
        .read(|conn| Measurement::fetch_after(conn, RECENT_YEAR_CUTOFF))
        .await?;
    Ok(Json(measurements))
}

/// Result of checking requested dates against the dataset.
enum Lookup {
    Found(TemperatureStats),
    Rejected(String),
}

async fn get_start_summary(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let requested = start.clone();
    let lookup = state
        .store
        .read(move |conn| {
            let range = Measurement::dataset_range(conn)?;
            debug!("Dataset covers {}", range);
            if !Measurement::date_exists(conn, &requested)? {
                return Ok(Lookup::Rejected(format!(
                    "Input Date {requested} not valid. Date Range is {range}"
                )));
            }
            Ok(Lookup::Found(Measurement::temperature_stats(
                conn, &requested, None,
            )?))
        })
        .await?;

    match lookup {
        Lookup::Found(stats) => Ok(Json(start_report(&start, &stats))),
        Lookup::Rejected(message) => {
            warn!("Rejected start date {}", start);
            Err(ApiError::NotFound(message))
        }
    }
}

async fn get_range_summary(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let (requested_start, requested_end) = (start.clone(), end.clone());
    let lookup = state
        .store
        .read(move |conn| {
            let range = Measurement::dataset_range(conn)?;
            debug!("Dataset covers {}", range);
            let start_found = Measurement::date_exists(conn, &requested_start)?;
            let end_found = Measurement::date_exists(conn, &requested_end)?;
            if let Some(message) = range_rejection(
                &requested_start,
                &requested_end,
                start_found,
                end_found,
                &range,
            ) {
                return Ok(Lookup::Rejected(message));
            }
            Ok(Lookup::Found(Measurement::temperature_stats(
                conn,
                &requested_start,
                Some(requested_end.as_str()),
            )?))
        })
        .await?;

    match lookup {
        Lookup::Found(stats) => Ok(Json(range_report(&start, &end, &stats))),
        Lookup::Rejected(message) => {
            warn!("Rejected date range {} to {}", start, end);
            Err(ApiError::NotFound(message))
        }
    }
}

/// The error message for a start/end pair, or `None` when both dates exist
/// and are in order.
fn range_rejection(
    start: &str,
    end: &str,
    start_found: bool,
    end_found: bool,
    range: &DatasetRange,
) -> Option<String> {
    match (start_found, end_found) {
        // ISO dates order the same as strings.
        (true, true) if start > end => Some(format!(
            "Input Start Date {start} is after End Date {end}. Date Range is {range}"
        )),
        (true, true) => None,
        (false, false) => Some(format!(
            "Input Start {start} and End Date {end} not valid. Date Range is {range}"
        )),
        (true, false) => Some(format!(
            "Input End Date {end} not valid. Date Range is {range}"
        )),
        (false, true) => Some(format!(
            "Input Start Date {start} not valid. Date Range is {range}"
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn range() -> DatasetRange {
        DatasetRange {
            first: Some("2010-01-01".to_string()),
            last: Some("2017-08-23".to_string()),
        }
    }

    #[test]
    fn valid_ordered_range_is_accepted() {
        assert_eq!(
            range_rejection("2017-01-01", "2017-01-03", true, true, &range()),
            None
        );
        assert_eq!(
            range_rejection("2017-01-01", "2017-01-01", true, true, &range()),
            None
        );
    }

    #[test]
    fn each_invalid_side_is_named() {
        assert_eq!(
            range_rejection("2099-01-01", "2017-01-03", false, true, &range()).as_deref(),
            Some("Input Start Date 2099-01-01 not valid. Date Range is 2010-01-01 to 2017-08-23")
        );
        assert_eq!(
            range_rejection("2017-01-01", "2099-01-01", true, false, &range()).as_deref(),
            Some("Input End Date 2099-01-01 not valid. Date Range is 2010-01-01 to 2017-08-23")
        );
        assert_eq!(
            range_rejection("1999-01-01", "2099-01-01", false, false, &range()).as_deref(),
            Some(
                "Input Start 1999-01-01 and End Date 2099-01-01 not valid. Date Range is 2010-01-01 to 2017-08-23"
            )
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            range_rejection("2017-01-03", "2017-01-01", true, true, &range()).as_deref(),
            Some(
                "Input Start Date 2017-01-03 is after End Date 2017-01-01. Date Range is 2010-01-01 to 2017-08-23"
            )
        );
    }
}
