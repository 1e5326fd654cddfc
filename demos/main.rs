//! Timing-sample demo/benchmark shell around the `powersort` library.
//!
//! This binary is the outer harness the engine sits behind: argument
//! parsing, algorithm/variant selection, input generation, and sample
//! collection. None of this is part of the engine's own contract (see the
//! crate's top-level documentation); it exists so the crate remains
//! buildable and runnable the way a sort-research crate like this one is.

use clap::Parser as _;
use rand::SeedableRng as _;

use powersort::cli;
use powersort::data::Data as _;
use powersort::with_match_type;

/// Program entry point
fn main() {
    let cli::Args {
        algorithm,
        data,
        variant,
        runs,
        size,
        seed,
    } = cli::Args::parse();

    if variant < 0 {
        println!("Available variants for {algorithm}:");
        for (index, variant) in cli::AlgorithmVariants::variants(algorithm).enumerate() {
            println!("{index}:\n{variant}");
        }
        return;
    }

    let Some(variant) = cli::AlgorithmVariants::validate(algorithm, variant) else {
        eprintln!("Invalid variant {variant} for {algorithm}, use `-v=-1` to list variants");
        std::process::exit(1);
    };

    println!(
        "Running measurements for the following algorithm:\n{algorithm} (stable: {stable})",
        stable = cli::AlgorithmVariants::is_stable(algorithm, variant).unwrap(),
    );
    println!("Runs: {runs}, Slice size: {size}, Data type: {data}");

    // Create rng
    let mut rng = match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => {
            println!("No seed provided, generating one using system rng");
            rand::rngs::StdRng::from_os_rng()
        }
    };

    let (samples, stats) = with_match_type!(data; T, D => {
        let sorter = cli::AlgorithmVariants::sorter::<T>(algorithm, variant)
            .expect("variant was already validated");
        perform_experiment::<T, D>(sorter, runs, size, &mut rng)
    });

    println!("Stats: {stats:?}");
    let _ = samples;
}

/// Perform a time sampling experiment on the given sorting algorithm
///
/// - `runs`: the number of samples to measure
/// - `size`: the size of the slices to sort
/// - `rng`: the rng used for sampling the data
fn perform_experiment<T: Ord + std::fmt::Debug, D: powersort::data::Data<T>>(
    sorter: fn(&mut [T]),
    runs: usize,
    size: usize,
    rng: &mut impl rand::Rng,
) -> (Vec<std::time::Duration>, rolling_stats::Stats<f64>) {
    let mut samples = Vec::with_capacity(runs);
    let mut stats: rolling_stats::Stats<f64> = rolling_stats::Stats::new();
    let bar = indicatif::ProgressBar::new(runs as u64);

    for run in 0..=runs {
        let mut values = D::initialize(size, rng);

        let now = std::time::Instant::now();
        sorter(std::hint::black_box(&mut values));
        let elapsed = now.elapsed();

        debug_assert!(
            values.is_sorted(),
            "values are not sorted after algorithm run"
        );

        // Skip the first sample: it pays for one-time warmup costs (page
        // faults, allocator growth) that later runs don't.
        if run != 0 {
            samples.push(elapsed);
            stats.update(elapsed.as_secs_f64() * 1000.0);
            bar.inc(1);
        }
    }

    bar.finish_and_clear();
    (samples, stats)
}
