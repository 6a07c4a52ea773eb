use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::database::SqliteDatabaseError;

/// One daily observation at a station, served as `{date, tobs}`. `tobs` is
/// `null` for rows without a temperature.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Measurement {
    pub date: String,
    pub tobs: Option<f64>,
}

/// First and last date present in the dataset. Both are `None` when the
/// table is empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetRange {
    pub first: Option<String>,
    pub last: Option<String>,
}

impl fmt::Display for DatasetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.first.as_deref().unwrap_or("None"),
            self.last.as_deref().unwrap_or("None")
        )
    }
}

/// MIN/AVG/MAX of `tobs` over a set of rows. All `None` for an empty set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

fn measurement_from_row(row: &Row) -> rusqlite::Result<Measurement> {
    Ok(Measurement {
        date: row.get(0)?,
        tobs: row.get(1)?,
    })
}

fn stats_from_row(row: &Row) -> rusqlite::Result<TemperatureStats> {
    Ok(TemperatureStats {
        min: row.get(0)?,
        avg: row.get(1)?,
        max: row.get(2)?,
    })
}

impl Measurement {
    /// Every measurement, oldest first.
    pub fn fetch_all(conn: &Connection) -> Result<Vec<Measurement>, SqliteDatabaseError> {
        let mut statement =
            conn.prepare("SELECT date, tobs FROM measurement ORDER BY date")?;
        let measurements = statement
            .query_map((), measurement_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(measurements)
    }

    /// Measurements with a temperature strictly after `date`, oldest first.
    pub fn fetch_after(
        conn: &Connection,
        date: &str,
    ) -> Result<Vec<Measurement>, SqliteDatabaseError> {
        let mut statement = conn.prepare(
            "SELECT date, tobs FROM measurement WHERE date > (?1) AND tobs IS NOT NULL ORDER BY date",
        )?;
        let measurements = statement
            .query_map((date,), measurement_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(measurements)
    }

    pub fn dataset_range(conn: &Connection) -> Result<DatasetRange, SqliteDatabaseError> {
        let (first, last) = conn.query_row(
            "SELECT MIN(date), MAX(date) FROM measurement",
            (),
            |row| {
                Ok((
                    row.get::<usize, Option<String>>(0)?,
                    row.get::<usize, Option<String>>(1)?,
                ))
            },
        )?;
        Ok(DatasetRange { first, last })
    }

    /// Whether some row has exactly this date.
    pub fn date_exists(conn: &Connection, date: &str) -> Result<bool, SqliteDatabaseError> {
        let found = conn
            .query_row(
                "SELECT 1 FROM measurement WHERE date = (?1) LIMIT 1",
                (date,),
                |row| row.get::<usize, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Temperature statistics over `start <= date`, bounded by `end` when
    /// given. The bounds are inclusive.
    pub fn temperature_stats(
        conn: &Connection,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, SqliteDatabaseError> {
        let stats = match end {
            Some(end) => conn.query_row(
                "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= (?1) AND date <= (?2)",
                (start, end),
                stats_from_row,
            )?,
            None => conn.query_row(
                "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= (?1)",
                (start,),
                stats_from_row,
            )?,
        };
        Ok(stats)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::fixture::{FixtureDatabase, create_fixture_database};

    fn open(measurements: &[(&str, f64)]) -> (FixtureDatabase, Connection) {
        let fixture = create_fixture_database(&[], measurements);
        let conn = Connection::open(&fixture.path).expect("fixture should open");
        (fixture, conn)
    }

    #[test]
    fn fetch_all_orders_by_date() {
        let (_fixture, conn) = open(&[
            ("2017-01-03", 80.0),
            ("2017-01-01", 60.0),
            ("2017-01-02", 70.0),
        ]);
        let dates: Vec<String> = Measurement::fetch_all(&conn)
            .expect("query should succeed")
            .into_iter()
            .map(|m| m.date)
            .collect();
        assert_eq!(dates, vec!["2017-01-01", "2017-01-02", "2017-01-03"]);
    }

    #[test]
    fn fetch_after_excludes_threshold() {
        let (_fixture, conn) = open(&[
            ("2016-08-22", 70.0),
            ("2016-08-23", 71.0),
            ("2016-08-24", 72.0),
        ]);
        let measurements =
            Measurement::fetch_after(&conn, "2016-08-23").expect("query should succeed");
        assert_eq!(
            measurements,
            vec![Measurement {
                date: "2016-08-24".to_string(),
                tobs: Some(72.0)
            }]
        );
    }

    fn insert_without_temperature(fixture: &FixtureDatabase, date: &str) {
        let conn = Connection::open(&fixture.path).expect("fixture should open");
        conn.execute(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES ('USC00000000', (?1), 0.5, NULL)",
            (date,),
        )
        .expect("should be able to insert measurement");
    }

    #[test]
    fn fetch_all_keeps_rows_without_temperature() {
        let (fixture, conn) = open(&[("2017-01-01", 60.0)]);
        insert_without_temperature(&fixture, "2017-01-02");
        let measurements = Measurement::fetch_all(&conn).expect("query should succeed");
        assert_eq!(
            measurements,
            vec![
                Measurement {
                    date: "2017-01-01".to_string(),
                    tobs: Some(60.0)
                },
                Measurement {
                    date: "2017-01-02".to_string(),
                    tobs: None
                },
            ]
        );
    }

    #[test]
    fn fetch_after_skips_rows_without_temperature() {
        let (fixture, conn) = open(&[("2017-01-01", 60.0)]);
        insert_without_temperature(&fixture, "2017-01-02");
        let measurements =
            Measurement::fetch_after(&conn, "2016-08-23").expect("query should succeed");
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].tobs, Some(60.0));
    }

    #[test]
    fn dataset_range_of_empty_table() {
        let (_fixture, conn) = open(&[]);
        let range = Measurement::dataset_range(&conn).expect("query should succeed");
        assert_eq!(range, DatasetRange::default());
        assert_eq!(range.to_string(), "None to None");
    }

    #[test]
    fn dataset_range_spans_first_and_last_date() {
        let (_fixture, conn) = open(&[
            ("2017-01-02", 70.0),
            ("2010-01-01", 65.0),
            ("2017-08-23", 81.0),
        ]);
        let range = Measurement::dataset_range(&conn).expect("query should succeed");
        assert_eq!(range.to_string(), "2010-01-01 to 2017-08-23");
    }

    #[test]
    fn date_exists_requires_exact_match() {
        let (_fixture, conn) = open(&[("2017-01-02", 70.0)]);
        assert!(Measurement::date_exists(&conn, "2017-01-02").expect("query should succeed"));
        assert!(!Measurement::date_exists(&conn, "2017-01-01").expect("query should succeed"));
        assert!(!Measurement::date_exists(&conn, "2017-1-2").expect("query should succeed"));
    }

    #[test]
    fn temperature_stats_respect_bounds() {
        let (_fixture, conn) = open(&[
            ("2017-01-01", 60.0),
            ("2017-01-02", 70.0),
            ("2017-01-02", 72.0),
            ("2017-01-03", 80.0),
            ("2017-01-04", 90.0),
        ]);
        let stats = Measurement::temperature_stats(&conn, "2017-01-02", Some("2017-01-03"))
            .expect("query should succeed");
        assert_eq!(stats.min, Some(70.0));
        assert_eq!(stats.avg, Some(74.0));
        assert_eq!(stats.max, Some(80.0));

        let stats =
            Measurement::temperature_stats(&conn, "2017-01-03", None).expect("query should succeed");
        assert_eq!(stats.min, Some(80.0));
        assert_eq!(stats.avg, Some(85.0));
        assert_eq!(stats.max, Some(90.0));
    }

    #[test]
    fn temperature_stats_of_empty_selection() {
        let (_fixture, conn) = open(&[("2017-01-01", 60.0)]);
        let stats = Measurement::temperature_stats(&conn, "2017-01-02", Some("2017-01-01"))
            .expect("query should succeed");
        assert_eq!(stats, TemperatureStats::default());
    }
}
