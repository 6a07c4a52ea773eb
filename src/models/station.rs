use rusqlite::Connection;
use serde::Serialize;

use crate::database::SqliteDatabaseError;

/// A reporting site. Only the name is exposed; the remaining columns of the
/// `station` table are never read.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Station {
    pub name: String,
}

impl Station {
    /// All stations in table order.
    pub fn fetch_all(conn: &Connection) -> Result<Vec<Station>, SqliteDatabaseError> {
        let mut statement = conn.prepare("SELECT name FROM station")?;
        let stations = statement
            .query_map((), |row| {
                Ok(Station {
                    name: row.get::<usize, String>(0)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }
}
