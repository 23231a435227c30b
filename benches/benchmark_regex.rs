// Criterion benchmark comparing regex strategies on destination codes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use regex::{Regex, RegexSet};

use tabular_performance::flights::{amplify, FlightTable};

fn count_with_regex(dests: &[String], re: &Regex) -> usize {
    dests.iter().filter(|dest| re.is_match(dest)).count()
}

fn count_with_set(dests: &[String], set: &RegexSet) -> usize {
    dests.iter().filter(|dest| set.is_match(dest)).count()
}

fn count_with_starts_with(dests: &[String]) -> usize {
    dests
        .iter()
        .filter(|dest| dest.starts_with(&['S', 'P', 'B']))
        .count()
}

fn count_recompiling(dests: &[String]) -> usize {
    let mut matches = 0;
    for dest in dests {
        let re = Regex::new(r"^[SPB]").unwrap();
        if re.is_match(dest) {
            matches += 1;
        }
    }
    matches
}

fn count_compiled_per_scan(dests: &[String]) -> usize {
    let re = Regex::new(r"^[SPB]").unwrap();
    count_with_regex(dests, &re)
}

fn dest_column(size: usize) -> Vec<String> {
    let table = FlightTable::bundled().unwrap();
    amplify(table.rows(), size)
        .into_iter()
        .map(|flight| flight.dest)
        .collect()
}

fn benchmark_pattern_shapes(c: &mut Criterion) {
    let class = Regex::new(r"^[SPB]").unwrap();
    let alternation = Regex::new(r"^(S|P|B)").unwrap();
    let set = RegexSet::new([r"^S", r"^P", r"^B"]).unwrap();

    let mut group = c.benchmark_group("pattern_shapes");

    for size in [1_000, 10_000, 100_000] {
        let dests = dest_column(size);

        group.bench_with_input(BenchmarkId::new("class", size), &dests, |b, dests| {
            b.iter(|| count_with_regex(black_box(dests), &class))
        });
        group.bench_with_input(BenchmarkId::new("alternation", size), &dests, |b, dests| {
            b.iter(|| count_with_regex(black_box(dests), &alternation))
        });
        group.bench_with_input(BenchmarkId::new("regex_set", size), &dests, |b, dests| {
            b.iter(|| count_with_set(black_box(dests), &set))
        });
        group.bench_with_input(BenchmarkId::new("starts_with", size), &dests, |b, dests| {
            b.iter(|| count_with_starts_with(black_box(dests)))
        });
    }

    group.finish();
}

fn benchmark_compile_cost(c: &mut Criterion) {
    let hoisted = Regex::new(r"^[SPB]").unwrap();

    let mut group = c.benchmark_group("compile_cost");

    // Recompiling per row is slow enough that large sizes would drag the
    // whole run out; the lesson shows at small ones.
    for size in [100, 1_000] {
        let dests = dest_column(size);

        group.bench_with_input(BenchmarkId::new("per_row", size), &dests, |b, dests| {
            b.iter(|| count_recompiling(black_box(dests)))
        });
        group.bench_with_input(BenchmarkId::new("per_scan", size), &dests, |b, dests| {
            b.iter(|| count_compiled_per_scan(black_box(dests)))
        });
        group.bench_with_input(BenchmarkId::new("hoisted", size), &dests, |b, dests| {
            b.iter(|| count_with_regex(black_box(dests), &hoisted))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_pattern_shapes, benchmark_compile_cost);
criterion_main!(benches);
