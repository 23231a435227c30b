//! The flight-records sample that every script in this tutorial loads.
//!
//! One year of made-up but realistically shaped departures from the three
//! New York airports. The table is loaded once at the top of each script and
//! is read-only from then on; nothing in the tutorial mutates it.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// The raw CSV compiled into the binary. `FlightTable::bundled` parses it,
/// so the scripts run without any files on disk.
pub const BUNDLED_CSV: &str = include_str!("../data/flights.csv");

/// One flight record.
///
/// Delay fields are minutes relative to schedule: negative means early,
/// `None` means the value was never reported (cancelled, or diverted in the
/// case of a missing arrival delay). A handful of records are missing the
/// tail number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Flight {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub carrier: String,
    pub flight: u16,
    pub tailnum: Option<String>,
    pub origin: String,
    pub dest: String,
    pub dep_delay: Option<i32>,
    pub arr_delay: Option<i32>,
    pub distance: u32,
}

impl Flight {
    /// Carrier code plus flight number, e.g. `B6 982`.
    pub fn ident(&self) -> String {
        format!("{} {}", self.carrier, self.flight)
    }
}

/// Failures while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    /// A row that does not decode aborts the load. The bundled file is
    /// curated, and a reader's own extract should fail loudly here rather
    /// than silently shrink.
    #[error("bad flight record: {0}")]
    Decode(#[from] csv::Error),
}

/// The loaded table: a plain row store.
///
/// The rows are private on purpose. Every demo takes `&FlightTable` or
/// `&[Flight]`, so the shape is fixed for the duration of each snippet.
#[derive(Debug, Clone)]
pub struct FlightTable {
    rows: Vec<Flight>,
}

impl FlightTable {
    /// Parse the bundled sample.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_reader(BUNDLED_CSV.as_bytes())
    }

    /// Parse a CSV file with the same columns, for readers who want to point
    /// the scripts at their own extract.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for record in csv_reader.deserialize() {
            rows.push(record?);
        }
        Ok(FlightTable { rows })
    }

    pub fn rows(&self) -> &[Flight] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column-oriented copy of a table: one contiguous `Vec` per column, in row
/// order. This is the layout the "vectorized" snippets run over; it carries
/// just the columns those snippets read.
#[derive(Debug, Clone)]
pub struct FlightColumns {
    pub carrier: Vec<String>,
    pub origin: Vec<String>,
    pub dest: Vec<String>,
    pub dep_delay: Vec<Option<i32>>,
    pub arr_delay: Vec<Option<i32>>,
    pub distance: Vec<u32>,
}

impl FlightColumns {
    pub fn from_table(table: &FlightTable) -> Self {
        Self::from_rows(table.rows())
    }

    pub fn from_rows(rows: &[Flight]) -> Self {
        let mut columns = FlightColumns {
            carrier: Vec::with_capacity(rows.len()),
            origin: Vec::with_capacity(rows.len()),
            dest: Vec::with_capacity(rows.len()),
            dep_delay: Vec::with_capacity(rows.len()),
            arr_delay: Vec::with_capacity(rows.len()),
            distance: Vec::with_capacity(rows.len()),
        };
        for flight in rows {
            columns.carrier.push(flight.carrier.clone());
            columns.origin.push(flight.origin.clone());
            columns.dest.push(flight.dest.clone());
            columns.dep_delay.push(flight.dep_delay);
            columns.arr_delay.push(flight.arr_delay);
            columns.distance.push(flight.distance);
        }
        columns
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }
}

/// Mean of the reported values in a delay column. `None` when nothing was
/// reported, never `0.0`: an airport with no data is not an on-time airport.
pub fn mean_delay(delays: &[Option<i32>]) -> Option<f64> {
    let (sum, count) = delays
        .iter()
        .flatten()
        .fold((0i64, 0u32), |(sum, count), &d| {
            (sum + i64::from(d), count + 1)
        });
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Repeat the sample rows until there are `len` of them. The bundled table
/// is small enough to read; the timing snippets cycle it in memory so the
/// differences they narrate are visible.
pub fn amplify(rows: &[Flight], len: usize) -> Vec<Flight> {
    rows.iter().cloned().cycle().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn bundled_loads_every_row() {
        let table = FlightTable::bundled().unwrap();
        assert_eq!(table.len(), 408);
        assert!(!table.is_empty());
    }

    #[test]
    fn bundled_first_row_decodes_into_typed_fields() {
        let table = FlightTable::bundled().unwrap();
        let first = &table.rows()[0];
        assert_eq!(first.year, 2013);
        assert_eq!(first.month, 1);
        assert_eq!(first.carrier, "UA");
        assert_eq!(first.origin, "EWR");
        assert_eq!(first.dest, "SFO");
        assert_eq!(first.dep_delay, Some(6));
        assert_eq!(first.distance, 2565);
        assert_eq!(first.ident(), "UA 1452");
    }

    #[test]
    fn bundled_has_the_documented_gaps() {
        let table = FlightTable::bundled().unwrap();
        let missing_dep = table.rows().iter().filter(|f| f.dep_delay.is_none()).count();
        let missing_arr = table.rows().iter().filter(|f| f.arr_delay.is_none()).count();
        let missing_tail = table.rows().iter().filter(|f| f.tailnum.is_none()).count();
        assert_eq!(missing_dep, 10);
        assert_eq!(missing_arr, 13);
        assert_eq!(missing_tail, 5);
    }

    #[test]
    fn empty_fields_decode_to_none_not_zero() {
        let csv = "year,month,day,carrier,flight,tailnum,origin,dest,dep_delay,arr_delay,distance\n\
                   2013,6,1,B6,507,,JFK,MCO,,,944\n";
        let table = FlightTable::from_reader(csv.as_bytes()).unwrap();
        let flight = &table.rows()[0];
        assert_eq!(flight.tailnum, None);
        assert_eq!(flight.dep_delay, None);
        assert_eq!(flight.arr_delay, None);
    }

    #[test]
    fn malformed_row_fails_the_load() {
        let csv = "year,month,day,carrier,flight,tailnum,origin,dest,dep_delay,arr_delay,distance\n\
                   2013,6,1,B6,507,N516JB,JFK,MCO,12,7,not-a-number\n";
        let result = FlightTable::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(DatasetError::Decode(_))));
    }

    #[test]
    fn from_path_round_trips_the_bundled_csv() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BUNDLED_CSV.as_bytes()).unwrap();

        let table = FlightTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 408);
    }

    #[test]
    fn from_path_reports_the_missing_file() {
        let result = FlightTable::from_path("does/not/exist.csv");
        match result {
            Err(DatasetError::Open { path, .. }) => assert!(path.ends_with("exist.csv")),
            other => panic!("expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn columns_line_up_with_rows() {
        let table = FlightTable::bundled().unwrap();
        let columns = FlightColumns::from_table(&table);

        assert_eq!(columns.len(), table.len());
        assert_eq!(columns.carrier.len(), table.len());
        assert_eq!(columns.origin.len(), table.len());
        assert_eq!(columns.dest.len(), table.len());
        assert_eq!(columns.dep_delay.len(), table.len());
        assert_eq!(columns.arr_delay.len(), table.len());

        for (i, flight) in table.rows().iter().enumerate() {
            assert_eq!(columns.origin[i], flight.origin);
            assert_eq!(columns.arr_delay[i], flight.arr_delay);
            assert_eq!(columns.distance[i], flight.distance);
        }
    }

    #[test]
    fn mean_delay_ignores_missing_values() {
        let delays = [Some(10), None, Some(-4), Some(0), None];
        assert_eq!(mean_delay(&delays), Some(2.0));
    }

    #[test]
    fn mean_delay_of_nothing_is_none() {
        assert_eq!(mean_delay(&[]), None);
        assert_eq!(mean_delay(&[None, None]), None);
    }

    #[test]
    fn amplify_cycles_the_sample() {
        let table = FlightTable::bundled().unwrap();
        let rows = amplify(table.rows(), 1000);
        assert_eq!(rows.len(), 1000);
        assert_eq!(rows[0], table.rows()[0]);
        assert_eq!(rows[408], table.rows()[0]);
        assert_eq!(rows[409], table.rows()[1]);
    }
}
