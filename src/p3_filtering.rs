// Pattern 3: Filter, Then Aggregate
// Equality filters three ways, and the equivalence the whole lesson leans on:
// the vectorized filter-then-aggregate returns exactly what the loop returns.

use std::error::Error;
use std::time::Instant;

use tabular_performance::flights::{amplify, mean_delay, Flight, FlightColumns, FlightTable};

// ============================================================================
// Example: An equality filter: clone, borrow, or mask
// ============================================================================

/// The first version everyone writes: index, compare, clone the keepers.
fn flights_from_cloned(rows: &[Flight], origin: &str) -> Vec<Flight> {
    let mut matches = Vec::new();
    for i in 0..rows.len() {
        if rows[i].origin == origin {
            matches.push(rows[i].clone());
        }
    }
    matches
}

/// Borrow instead of clone: the result is a view, the table stays put.
fn flights_from_borrowed<'a>(rows: &'a [Flight], origin: &str) -> Vec<&'a Flight> {
    rows.iter().filter(|f| f.origin == origin).collect()
}

/// Columnar: compare the whole origin column at once into a boolean mask.
fn origin_mask(origins: &[String], origin: &str) -> Vec<bool> {
    origins.iter().map(|o| o == origin).collect()
}

fn mask_count(mask: &[bool]) -> usize {
    mask.iter().filter(|&&keep| keep).count()
}

// ============================================================================
// Example: Filter -> aggregate
// ============================================================================

/// Loop version: one pass, accumulate when both tests pass.
fn mean_dep_delay_from_loop(rows: &[Flight], origin: &str) -> Option<f64> {
    let mut sum = 0i64;
    let mut count = 0u32;
    for flight in rows {
        if flight.origin == origin {
            if let Some(delay) = flight.dep_delay {
                sum += i64::from(delay);
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Pipeline version: filter, project, accumulate.
fn mean_dep_delay_from_pipeline(rows: &[Flight], origin: &str) -> Option<f64> {
    let (sum, count) = rows
        .iter()
        .filter(|f| f.origin == origin)
        .filter_map(|f| f.dep_delay)
        .fold((0i64, 0u32), |(sum, count), d| (sum + i64::from(d), count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Columnar version: mask the origin column, then mean the delay column
/// under the mask. Two whole-column passes, no row structs touched.
fn mean_dep_delay_from_columns(columns: &FlightColumns, origin: &str) -> Option<f64> {
    let mask = origin_mask(&columns.origin, origin);
    masked_mean(&columns.dep_delay, &mask)
}

/// Mean of the values the mask selects, skipping gaps.
fn masked_mean(delays: &[Option<i32>], mask: &[bool]) -> Option<f64> {
    let (sum, count) = delays
        .iter()
        .zip(mask)
        .filter(|&(_, &keep)| keep)
        .filter_map(|(delay, _)| *delay)
        .fold((0i64, 0u32), |(sum, count), d| (sum + i64::from(d), count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

// ============================================================================
// Demonstration
// ============================================================================

fn benchmark_filters(rows: &[Flight], columns: &FlightColumns) {
    const ROUNDS: usize = 50;

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = flights_from_cloned(rows, "JFK");
    }
    println!("clone the keepers   ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = flights_from_borrowed(rows, "JFK");
    }
    println!("borrow the keepers  ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = origin_mask(&columns.origin, "JFK");
    }
    println!("build a mask        ({} rounds): {:?}", ROUNDS, start.elapsed());
}

fn benchmark_filter_aggregate(rows: &[Flight], columns: &FlightColumns) {
    const ROUNDS: usize = 50;

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = mean_dep_delay_from_loop(rows, "JFK");
    }
    println!("loop                ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = mean_dep_delay_from_pipeline(rows, "JFK");
    }
    println!("iterator pipeline   ({} rounds): {:?}", ROUNDS, start.elapsed());

    let start = Instant::now();
    for _ in 0..ROUNDS {
        let _ = mean_dep_delay_from_columns(columns, "JFK");
    }
    println!("columnar mask+mean  ({} rounds): {:?}", ROUNDS, start.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> (Vec<Flight>, FlightColumns) {
        let table = FlightTable::bundled().unwrap();
        let columns = FlightColumns::from_table(&table);
        (table.rows().to_vec(), columns)
    }

    #[test]
    fn all_three_filters_select_the_same_rows() {
        let (rows, columns) = bundled();

        let cloned = flights_from_cloned(&rows, "JFK");
        let borrowed = flights_from_borrowed(&rows, "JFK");
        let mask = origin_mask(&columns.origin, "JFK");

        assert_eq!(cloned.len(), 142);
        assert_eq!(borrowed.len(), cloned.len());
        assert_eq!(mask_count(&mask), cloned.len());

        for (kept, original) in cloned.iter().zip(&borrowed) {
            assert_eq!(&kept, original);
        }
    }

    #[test]
    fn vectorized_filter_aggregate_equals_the_loop() {
        let (rows, columns) = bundled();

        let by_loop = mean_dep_delay_from_loop(&rows, "JFK");
        let by_pipeline = mean_dep_delay_from_pipeline(&rows, "JFK");
        let by_columns = mean_dep_delay_from_columns(&columns, "JFK");

        // Identical accumulation order, identical floats. Not "close": equal.
        assert_eq!(by_loop, by_pipeline);
        assert_eq!(by_loop, by_columns);
        assert_eq!(by_loop, Some(809.0 / 138.0));
    }

    #[test]
    fn shared_mean_delay_gives_the_unfiltered_baseline() {
        let (rows, columns) = bundled();

        let all_origins = mean_delay(&columns.dep_delay);
        assert_eq!(all_origins, Some(3014.0 / 398.0));

        // The filter earns its keep: JFK alone sits below the baseline.
        let jfk = mean_dep_delay_from_loop(&rows, "JFK").unwrap();
        assert!(jfk < all_origins.unwrap());
    }

    #[test]
    fn unknown_origin_matches_nothing() {
        let (rows, columns) = bundled();

        assert!(flights_from_cloned(&rows, "SFO").is_empty());
        assert!(flights_from_borrowed(&rows, "SFO").is_empty());
        assert_eq!(mask_count(&origin_mask(&columns.origin, "SFO")), 0);
        assert_eq!(mean_dep_delay_from_loop(&rows, "SFO"), None);
        assert_eq!(mean_dep_delay_from_pipeline(&rows, "SFO"), None);
        assert_eq!(mean_dep_delay_from_columns(&columns, "SFO"), None);
    }

    #[test]
    fn masked_mean_only_sees_selected_rows() {
        let delays = [Some(10), Some(20), None, Some(40)];
        let mask = [true, false, true, true];
        // Selected: 10, gap, 40.
        assert_eq!(masked_mean(&delays, &mask), Some(25.0));
    }

    #[test]
    fn masked_mean_of_all_gaps_is_none() {
        let delays = [None, None];
        let mask = [true, true];
        assert_eq!(masked_mean(&delays, &mask), None);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("Pattern 3: Filter, Then Aggregate");
    println!("=================================\n");

    let table = FlightTable::bundled()?;
    let columns = FlightColumns::from_table(&table);

    println!("=== Flights Out of JFK ===\n");
    let cloned = flights_from_cloned(table.rows(), "JFK");
    let borrowed = flights_from_borrowed(table.rows(), "JFK");
    let mask = origin_mask(&columns.origin, "JFK");
    println!(
        "cloned:   {} rows (and ~{} string allocations nobody asked for)",
        cloned.len(),
        cloned.len() * 4
    );
    println!("borrowed: {} rows", borrowed.len());
    println!("mask:     {} rows set out of {}", mask_count(&mask), mask.len());

    println!("\n=== Mean Departure Delay Out of JFK ===\n");
    println!("all origins (mean_delay):  {:?}", mean_delay(&columns.dep_delay));
    println!("loop:                      {:?}", mean_dep_delay_from_loop(table.rows(), "JFK"));
    println!("iterator pipeline:         {:?}", mean_dep_delay_from_pipeline(table.rows(), "JFK"));
    println!("columnar mask+mean:        {:?}", mean_dep_delay_from_columns(&columns, "JFK"));
    println!("same filter, same aggregate, same answer, to the last bit");

    let amplified = amplify(table.rows(), 100_000);
    let amplified_columns = FlightColumns::from_rows(&amplified);

    println!("\n=== Timing the Filter on {} Rows ===\n", amplified.len());
    benchmark_filters(&amplified, &amplified_columns);

    println!("\n=== Timing Filter + Aggregate on {} Rows ===\n", amplified.len());
    benchmark_filter_aggregate(&amplified, &amplified_columns);

    println!("\n=== Key Points ===");
    println!("1. Filters that clone pay for every row they keep; borrows and masks pay almost nothing");
    println!("2. For one aggregate, fuse filter and fold into a single pass; never materialize the middle");
    println!("3. The mask is the reusable form: build once, aggregate many columns under it");
    println!("4. Equivalence is testable: loop and vectorized forms agree exactly, so tests can say ==");

    Ok(())
}
