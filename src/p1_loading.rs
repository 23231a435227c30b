// Pattern 1: Loading the Dataset
// One load at the top, read-only after; what the decode step actually costs.

use std::error::Error;
use std::time::Instant;

use csv::{ReaderBuilder, StringRecord};
use tabular_performance::flights::{Flight, FlightTable, BUNDLED_CSV};

// ============================================================================
// Example: The table every script starts from
// ============================================================================

fn fmt_delay(delay: Option<i32>) -> String {
    match delay {
        Some(d) => format!("{:+}", d),
        None => "NA".to_string(),
    }
}

fn preview(table: &FlightTable) {
    println!(
        "{} rows, 11 columns (year month day carrier flight tailnum origin dest dep_delay arr_delay distance)\n",
        table.len()
    );
    for flight in table.rows().iter().take(5) {
        println!(
            "{:04}-{:02}-{:02}  {:<7} {:<7} {} -> {}  dep {:>4}  arr {:>4}  {:>4} mi",
            flight.year,
            flight.month,
            flight.day,
            flight.ident(),
            flight.tailnum.as_deref().unwrap_or("NA"),
            flight.origin,
            flight.dest,
            fmt_delay(flight.dep_delay),
            fmt_delay(flight.arr_delay),
            flight.distance,
        );
    }
    println!("...");
}

// ============================================================================
// Example: Three ways to decode the same bytes
// ============================================================================

/// The way the rest of the tutorial does it: serde derives the row decode.
fn parse_typed(csv_text: &str) -> Result<Vec<Flight>, csv::Error> {
    let mut reader = ReaderBuilder::new().from_reader(csv_text.as_bytes());
    reader.deserialize().collect()
}

/// Field-by-field parsing of `StringRecord`s. More code, same table.
fn parse_by_hand(csv_text: &str) -> Result<Vec<Flight>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().from_reader(csv_text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(flight_from_record(&record?)?);
    }
    Ok(rows)
}

fn flight_from_record(record: &StringRecord) -> Result<Flight, Box<dyn Error>> {
    fn field<'a>(record: &'a StringRecord, index: usize) -> Result<&'a str, Box<dyn Error>> {
        record
            .get(index)
            .ok_or_else(|| format!("missing column {}", index).into())
    }
    fn opt_i32(raw: &str) -> Result<Option<i32>, std::num::ParseIntError> {
        if raw.is_empty() {
            Ok(None)
        } else {
            raw.parse().map(Some)
        }
    }

    let tailnum = field(record, 5)?;
    Ok(Flight {
        year: field(record, 0)?.parse()?,
        month: field(record, 1)?.parse()?,
        day: field(record, 2)?.parse()?,
        carrier: field(record, 3)?.to_string(),
        flight: field(record, 4)?.parse()?,
        tailnum: (!tailnum.is_empty()).then(|| tailnum.to_string()),
        origin: field(record, 6)?.to_string(),
        dest: field(record, 7)?.to_string(),
        dep_delay: opt_i32(field(record, 8)?)?,
        arr_delay: opt_i32(field(record, 9)?)?,
        distance: field(record, 10)?.parse()?,
    })
}

/// Raw `ByteRecord` scan: no UTF-8 validation, no per-row allocation beyond
/// the reused record. The floor for "how fast can reading this file be".
fn scan_raw(csv_text: &str) -> Result<usize, csv::Error> {
    let mut reader = ReaderBuilder::new().from_reader(csv_text.as_bytes());
    let mut record = csv::ByteRecord::new();
    let mut rows = 0;
    while reader.read_byte_record(&mut record)? {
        debug_assert_eq!(record.len(), 11);
        rows += 1;
    }
    Ok(rows)
}

// ============================================================================
// Demonstration
// ============================================================================

fn benchmark_parsers() {
    const ROUNDS: usize = 200;

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = scan_raw(BUNDLED_CSV).unwrap();
    }
    println!("raw byte records  ({} parses): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = parse_by_hand(BUNDLED_CSV).unwrap();
    }
    println!("hand-rolled parse ({} parses): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = parse_typed(BUNDLED_CSV).unwrap();
    }
    println!("serde deserialize ({} parses): {:?}", ROUNDS, start.elapsed());
}


fn main() -> Result<(), Box<dyn Error>> {
    println!("Pattern 1: Loading the Dataset");
    println!("==============================\n");

    // The one load. Everything after this point only borrows the table.
    let table = FlightTable::bundled()?;

    println!("=== The Bundled Sample ===\n");
    preview(&table);

    println!("\n=== Decoding the Same Bytes Three Ways ===\n");
    benchmark_parsers();

    println!("\n=== Key Points ===");
    println!("1. Load once at the top; every snippet borrows the same table");
    println!("2. serde row decoding is the convenient default and close to hand-rolled speed");
    println!("3. ByteRecord scanning shows the I/O floor: typed decoding is what you pay for");
    println!("4. Empty CSV fields become Option::None, never zero");

    Ok(())
}
