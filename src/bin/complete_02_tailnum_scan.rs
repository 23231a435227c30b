//! complete_02_tailnum_scan.rs
//!
//! Sample answer for practice exercise 2: the tail-number scan.
//!
//! Milestones:
//! 1) Precompiled patterns for the two registration shapes in the table
//! 2) Accounting: every tail number on file fits exactly one shape
//! 3) Compile once vs compile per row, timed
//! 4) A leading-digit class vs the union of single-digit matches
//!
//! Run:
//!   cargo run --bin complete_02_tailnum_scan
//! Test:
//!   cargo test --bin complete_02_tailnum_scan

use std::error::Error;
use std::time::Instant;

use lazy_static::lazy_static;
use regex::Regex;

use tabular_performance::flights::{Flight, FlightTable};

// =============================================================================
// Milestone 1: The two shapes
// =============================================================================

lazy_static! {
    /// The usual US registration: N, three digits, two letters.
    static ref STANDARD: Regex = Regex::new(r"^N\d{3}[A-Z]{2}$").unwrap();
    /// The older all-digit form: N followed by five digits.
    static ref DIGITS_ONLY: Regex = Regex::new(r"^N\d{5}$").unwrap();
    /// Tail numbers whose first digit is 1 through 4.
    static ref LEADING_1_4: Regex = Regex::new(r"^N[1-4]").unwrap();
}

/// Count rows whose tail number is on file and matches. Rows with no tail
/// number are not candidates, so they are skipped, not counted as misses.
pub fn count_matching(rows: &[Flight], re: &Regex) -> usize {
    rows.iter()
        .filter_map(|flight| flight.tailnum.as_deref())
        .filter(|tail| re.is_match(tail))
        .count()
}

/// Indices of the matching rows. Two patterns are interchangeable exactly
/// when they produce the same index list over the same table.
pub fn rows_matching(rows: &[Flight], re: &Regex) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, flight)| {
            flight
                .tailnum
                .as_deref()
                .is_some_and(|tail| re.is_match(tail))
        })
        .map(|(index, _)| index)
        .collect()
}

// =============================================================================
// Milestone 3: Compile cost
// =============================================================================

/// The per-row compile, written out so the timing in main has something
/// honest to measure.
pub fn count_recompiling(rows: &[Flight], pattern: &str) -> usize {
    let mut matches = 0;
    for flight in rows {
        let re = Regex::new(pattern).unwrap();
        if let Some(tail) = flight.tailnum.as_deref() {
            if re.is_match(tail) {
                matches += 1;
            }
        }
    }
    matches
}

// =============================================================================
// Milestone 4: Class vs union of single digits
// =============================================================================

/// The same rows the `^N[1-4]` class selects, assembled the long way: four
/// single-digit patterns, results merged. The class is one scan; this is four.
pub fn union_of_single_digits(rows: &[Flight]) -> Vec<usize> {
    let mut union = std::collections::BTreeSet::new();
    for digit in ["^N1", "^N2", "^N3", "^N4"] {
        let re = Regex::new(digit).unwrap();
        union.extend(rows_matching(rows, &re));
    }
    union.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ----- Milestone 1 tests -----
    #[test]
    fn the_two_shapes_count_as_expected() {
        let table = FlightTable::bundled().unwrap();
        assert_eq!(count_matching(table.rows(), &STANDARD), 310);
        assert_eq!(count_matching(table.rows(), &DIGITS_ONLY), 93);
    }

    #[test]
    fn missing_tail_numbers_are_skipped_not_missed() {
        let table = FlightTable::bundled().unwrap();
        let present = table
            .rows()
            .iter()
            .filter(|flight| flight.tailnum.is_some())
            .count();
        assert_eq!(present, 403);
        assert_eq!(table.len() - present, 5);
    }

    // ----- Milestone 2 tests -----
    #[test]
    fn every_tail_number_fits_exactly_one_shape() {
        let table = FlightTable::bundled().unwrap();
        for flight in table.rows() {
            if let Some(tail) = flight.tailnum.as_deref() {
                let standard = STANDARD.is_match(tail);
                let digits = DIGITS_ONLY.is_match(tail);
                assert!(
                    standard != digits,
                    "{} fits {} shapes",
                    tail,
                    if standard { 2 } else { 0 }
                );
            }
        }
    }

    #[test]
    fn shape_counts_account_for_the_whole_table() {
        let table = FlightTable::bundled().unwrap();
        let standard = count_matching(table.rows(), &STANDARD);
        let digits = count_matching(table.rows(), &DIGITS_ONLY);
        assert_eq!(standard + digits, 403);
        assert_eq!(standard + digits + 5, table.len());
    }

    // ----- Milestone 3 tests -----
    #[test]
    fn recompiling_gives_the_same_count() {
        let table = FlightTable::bundled().unwrap();
        let fresh = count_recompiling(table.rows(), r"^N\d{3}[A-Z]{2}$");
        assert_eq!(fresh, count_matching(table.rows(), &STANDARD));
        assert_eq!(fresh, 310);
    }

    // ----- Milestone 4 tests -----
    #[test]
    fn class_and_union_select_the_same_rows() {
        let table = FlightTable::bundled().unwrap();
        let class = rows_matching(table.rows(), &LEADING_1_4);
        let union = union_of_single_digits(table.rows());
        assert_eq!(class, union);
        assert_eq!(class.len(), 169);
    }

    #[test]
    fn single_digit_patterns_are_disjoint() {
        let table = FlightTable::bundled().unwrap();
        let counts: Vec<usize> = ["^N1", "^N2", "^N3", "^N4"]
            .iter()
            .map(|digit| count_matching(table.rows(), &Regex::new(digit).unwrap()))
            .collect();
        assert_eq!(counts, vec![42, 45, 36, 46]);
        assert_eq!(counts.iter().sum::<usize>(), 169);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("Exercise 2: The Tail-Number Scan");
    println!("================================\n");

    let table = FlightTable::bundled()?;
    let rows = table.rows();

    let standard = count_matching(rows, &STANDARD);
    let digits = count_matching(rows, &DIGITS_ONLY);
    let present = rows.iter().filter(|flight| flight.tailnum.is_some()).count();

    println!(
        "{} rows, {} tail numbers on file, {} missing\n",
        rows.len(),
        present,
        rows.len() - present
    );
    println!("{:<10} {:>8} {:>7}", "shape", "pattern", "rows");
    println!("{:<10} {:>8} {:>7}", "standard", "N###AA", standard);
    println!("{:<10} {:>8} {:>7}", "digits", "N#####", digits);
    println!("{:<10} {:>8} {:>7}", "", "total", standard + digits);
    assert_eq!(standard + digits, present);
    println!("every tail number on file fits exactly one shape\n");

    let start = Instant::now();
    let fresh = count_recompiling(rows, r"^N\d{3}[A-Z]{2}$");
    println!("compile per row ({} compiles): {:?}", rows.len(), start.elapsed());

    const ROUNDS: usize = 100;
    let start = Instant::now();
    let mut hoisted = 0;
    for _ in 0..ROUNDS {
        hoisted = count_matching(rows, &STANDARD);
    }
    println!("compile once ({} rounds):      {:?}", ROUNDS, start.elapsed());
    assert_eq!(fresh, hoisted);

    let class = rows_matching(rows, &LEADING_1_4);
    let union = union_of_single_digits(rows);
    println!("\n^N[1-4] selects {} rows in one scan", class.len());
    println!(
        "^N1..^N4 singles select {} rows in four scans, same set: {}",
        union.len(),
        class == union
    );
    for digit in ["^N1", "^N2", "^N3", "^N4"] {
        let count = count_matching(rows, &Regex::new(digit)?);
        println!("  {:<5} {:>4}", digit, count);
    }

    Ok(())
}
