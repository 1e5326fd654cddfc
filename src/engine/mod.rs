//! The powersort engine: run detection, node-power scheduling, and the
//! galloping merge, wired together behind [`sort_by`]/[`sort`].

pub mod merge;
pub mod power;
pub mod run;

use std::cmp::Ordering;

use crate::config::SortConfig;
use crate::error::PowersortError;

/// Sort `slice` in place under `cmp`, using `config` to select the
/// node-power computation, run-detection variant, and short-run threshold.
///
/// See [`crate::config::SortConfig`] for the constraints on combinations of
/// options, and [`crate::error::PowersortError`] for the failure modes.
pub fn sort_by<T, F>(slice: &mut [T], config: SortConfig, mut cmp: F) -> Result<(), PowersortError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = slice.len();
    let mut merger = merge::Merger::new(n);
    sort_by_with_merger(slice, config, &mut cmp, &mut merger)
}

/// Sort `slice` in place under `T`'s natural order.
pub fn sort<T: Ord>(slice: &mut [T]) -> Result<(), PowersortError> {
    sort_by(slice, SortConfig::default(), |a, b| a.cmp(b))
}

/// Like [`sort_by`], but also returns the total merge cost (`sum(|A| + |B|)`
/// over every merge performed), gated behind the `counters` feature the way
/// [`merge::Merger::merge_cost`] itself is. Intended for differential
/// benchmarking against the sibling sorts in [`crate::algorithms`], not for
/// use by the engine's own algorithm.
#[cfg(feature = "counters")]
pub fn sort_by_with_cost<T, F>(
    slice: &mut [T],
    config: SortConfig,
    mut cmp: F,
) -> Result<u64, PowersortError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = slice.len();
    let mut merger = merge::Merger::new(n);
    sort_by_with_merger(slice, config, &mut cmp, &mut merger)?;
    Ok(merger.merge_cost.get())
}

fn sort_by_with_merger<T, F>(
    slice: &mut [T],
    config: SortConfig,
    cmp: &mut F,
    merger: &mut merge::Merger<T>,
) -> Result<(), PowersortError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    config.validate()?;

    let n = slice.len();
    if n < 2 {
        return Ok(());
    }
    check_range_len(n, &config)?;

    if n < config.min_run_len {
        // Small-range fast path: a single detected-and-extended run, no
        // merges.
        let run_len = detect_run_len(slice, &config, cmp);
        run::extend_run(slice, run_len, cmp);
        return Ok(());
    }

    // `L = floor(log2 n) + 2` stack levels; node power is always in
    // `[1, floor(log2 n) + 1]`, so this never overflows.
    let level_count = (n.ilog2() as usize) + 2;
    let mut stack: Vec<Option<(usize, usize)>> = vec![None; level_count];
    let mut top = 0usize;

    let mut run_a = detect_and_extend(slice, 0, &config, cmp);

    while run_a.1 != n {
        let run_b = detect_and_extend(slice, run_a.1, &config, cmp);

        let e_b_inclusive = run_b.1 - 1;
        let node_power = if config.use_msb_merge_type {
            power::node_power_msb(n, 0, run_a.0, run_b.0, e_b_inclusive)
        } else {
            power::node_power_bitwise(n, 0, run_a.0, run_b.0, e_b_inclusive)
        };
        debug_assert_ne!(node_power, top, "node power must never equal the current stack top");

        if node_power < top {
            for level in (node_power..=top).rev() {
                if let Some((start, _end)) = stack[level].take() {
                    let split = run_a.0 - start;
                    merger.merge(&mut slice[start..run_a.1], split, cmp)?;
                    run_a.0 = start;
                }
            }
        }

        top = node_power;
        stack[node_power] = Some(run_a);
        run_a = run_b;
    }

    for level in (1..=top).rev() {
        if let Some((start, _end)) = stack[level].take() {
            let split = run_a.0 - start;
            merger.merge(&mut slice[start..run_a.1], split, cmp)?;
            run_a.0 = start;
        }
    }

    Ok(())
}

/// The MSB node-power trick only works for ranges whose length fits the
/// fixed-point encoding in [`power::node_power_msb`]; reject it up front
/// rather than letting that routine silently misbehave. Split out of
/// [`sort_by_with_merger`] (which otherwise only ever calls this with
/// `n = slice.len()`) so the rejection path is exercisable by a real test
/// without allocating a slice anywhere near `MAX_MSB_RANGE_LEN` elements.
fn check_range_len(n: usize, config: &SortConfig) -> Result<(), PowersortError> {
    if config.use_msb_merge_type && n > power::MAX_MSB_RANGE_LEN {
        return Err(PowersortError::RangeTooLarge(n));
    }
    Ok(())
}

fn detect_run_len<T, F>(slice: &mut [T], config: &SortConfig, cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    if config.only_increasing_runs {
        run::detect_increasing_run(slice, cmp)
    } else {
        run::detect_run(slice, cmp)
    }
}

/// Detect the run starting at `start` in `slice`, extend it via binary
/// insertion sort if it is shorter than `config.min_run_len`, and return its
/// bounds as `(start, end)` (`end` exclusive).
fn detect_and_extend<T, F>(
    slice: &mut [T],
    start: usize,
    config: &SortConfig,
    cmp: &mut F,
) -> (usize, usize)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let tail = &mut slice[start..];
    let mut len = detect_run_len(tail, config, cmp);

    if len < config.min_run_len {
        let target_len = config.min_run_len.min(tail.len());
        run::extend_run(&mut tail[..target_len], len, cmp);
        len = target_len;
    }

    (start, start + len)
}
