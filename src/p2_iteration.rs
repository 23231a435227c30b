// Pattern 2: Loops vs. Iterator Pipelines
// The scalar accumulation everyone writes first, and what it compiles into.

use std::error::Error;
use std::time::Instant;

use tabular_performance::flights::{amplify, mean_delay, Flight, FlightColumns, FlightTable};

// ============================================================================
// Example: Summing the distance column five ways
// ============================================================================

fn total_distance_indexed(rows: &[Flight]) -> u64 {
    let mut total = 0u64;
    for i in 0..rows.len() {
        total += u64::from(rows[i].distance);
    }
    total
}

fn total_distance_for_loop(rows: &[Flight]) -> u64 {
    let mut total = 0u64;
    for flight in rows {
        total += u64::from(flight.distance);
    }
    total
}

fn total_distance_pipeline(rows: &[Flight]) -> u64 {
    rows.iter().map(|f| u64::from(f.distance)).sum()
}

fn total_distance_fold(rows: &[Flight]) -> u64 {
    rows.iter()
        .fold(0u64, |total, f| total + u64::from(f.distance))
}

/// The columnar version: one contiguous slice of integers, no struct in
/// sight. This is what "apply it to the whole column" means here.
fn total_distance_column(distance: &[u32]) -> u64 {
    distance.iter().map(|&d| u64::from(d)).sum()
}

// ============================================================================
// Example: Means over a column with gaps
// ============================================================================

fn mean_dep_delay_loop(rows: &[Flight]) -> Option<f64> {
    let mut sum = 0i64;
    let mut count = 0u32;
    for flight in rows {
        if let Some(delay) = flight.dep_delay {
            sum += i64::from(delay);
            count += 1;
        }
    }
    (count > 0).then(|| sum as f64 / count as f64)
}

fn mean_dep_delay_pipeline(rows: &[Flight]) -> Option<f64> {
    let (sum, count) = rows
        .iter()
        .filter_map(|f| f.dep_delay)
        .fold((0i64, 0u32), |(sum, count), d| (sum + i64::from(d), count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

// ============================================================================
// Demonstration
// ============================================================================

fn benchmark_sums(rows: &[Flight], columns: &FlightColumns) {
    const ROUNDS: usize = 200;

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = total_distance_indexed(rows);
    }
    println!("indexed loop    ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = total_distance_for_loop(rows);
    }
    println!("for-each loop   ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = total_distance_pipeline(rows);
    }
    println!("iterator sum    ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = total_distance_fold(rows);
    }
    println!("iterator fold   ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = total_distance_column(&columns.distance);
    }
    println!("columnar sum    ({} rounds): {:?}", ROUNDS, start.elapsed());
}

fn benchmark_means(rows: &[Flight]) {
    const ROUNDS: usize = 200;

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = mean_dep_delay_loop(rows);
    }
    println!("mean, loop      ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = mean_dep_delay_pipeline(rows);
    }
    println!("mean, pipeline  ({} rounds): {:?}", ROUNDS, start.elapsed());
}


fn main() -> Result<(), Box<dyn Error>> {
    println!("Pattern 2: Loops vs. Iterator Pipelines");
    println!("=======================================\n");

    let table = FlightTable::bundled()?;

    println!("=== One Column, Five Sums ===\n");
    println!("indexed loop:  {} miles", total_distance_indexed(table.rows()));
    println!("for-each loop: {} miles", total_distance_for_loop(table.rows()));
    println!("iterator sum:  {} miles", total_distance_pipeline(table.rows()));
    println!("iterator fold: {} miles", total_distance_fold(table.rows()));
    let columns = FlightColumns::from_table(&table);
    println!("columnar sum:  {} miles", total_distance_column(&columns.distance));

    let amplified = amplify(table.rows(), 100_000);
    println!("\n=== Timing on {} In-Memory Rows ===\n", amplified.len());
    let start = Instant::now();
    let amplified_columns = FlightColumns::from_rows(&amplified);
    println!("columnar build  (paid once):  {:?}", start.elapsed());
    benchmark_sums(&amplified, &amplified_columns);
    benchmark_means(&amplified);

    println!("\n=== A Column With Gaps ===\n");
    println!("mean departure delay (loop):       {:?}", mean_dep_delay_loop(table.rows()));
    println!("mean departure delay (pipeline):   {:?}", mean_dep_delay_pipeline(table.rows()));
    println!("mean departure delay (mean_delay): {:?}", mean_delay(&columns.dep_delay));
    println!("all three skip unreported delays; a cancelled flight is not 'on time'");

    println!("\n=== Key Points ===");
    println!("1. The iterator pipeline is the loop: same machine code, fewer places for bugs");
    println!("2. Indexing adds bounds checks the iterator never needs");
    println!("3. Contiguous columns scan fastest; structs drag the other ten fields through cache");
    println!("4. filter_map over Option columns keeps missing values out of the arithmetic");

    Ok(())
}
