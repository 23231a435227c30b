//! # Tabular Performance
//!
//! A tutorial on performance idioms for tabular data processing, narrated
//! over a bundled sample of flight records. Each pattern is an annotated
//! script that loads the dataset once, runs the same computation the slow
//! way and the fast way, and prints what happened. The lesson text lives in
//! `README.md`; the scripts are the code it walks through.
//!
//! ## Patterns Covered
//!
//! 1. **Loading the Dataset**
//!    - One load at the top, read-only after
//!    - What decoding actually costs: serde rows vs. hand parsing vs. raw records
//!
//! 2. **Loops vs. Iterator Pipelines**
//!    - Summing a column five ways
//!    - Means over columns with missing values
//!
//! 3. **Filter, Then Aggregate**
//!    - Equality filters: clone, borrow, or mask
//!    - The loop and the pipeline agree to the last bit
//!
//! 4. **Group, Then Average**
//!    - HashMap entry accumulation
//!    - itertools grouping, sort-then-scan, and a columnar pass
//!
//! 5. **Regex on a Column**
//!    - Compile once, not per row
//!    - Alternation vs. character class, and when a regex is overkill
//!
//! ## Running the Scripts
//!
//! ```bash
//! cargo run --bin p1_loading
//! cargo run --bin p2_iteration
//! cargo run --bin p3_filtering
//! cargo run --bin p4_grouping
//! cargo run --bin p5_regex
//!
//! # Practice-exercise sample answers
//! cargo run --bin complete_01_route_report
//! cargo run --bin complete_02_tailnum_scan
//!
//! # Reproduce the comparisons with a real harness
//! cargo bench
//! ```

pub mod flights;

pub use flights::{Flight, FlightColumns, FlightTable};
