//! The powersort implementation: a [`super::Sort`] facade, monomorphized
//! over const generics, over [`crate::engine`].

/// The default `MIN_RUN_LENGTH` to use
pub const DEFAULT_MIN_RUN_LENGTH: usize = crate::config::DEFAULT_MIN_RUN_LENGTH;

/// The default `ONLY_INCREASING_RUNS` to use
pub const DEFAULT_ONLY_INCREASING_RUNS: bool = false;

/// The default `USE_MSB_MERGE_TYPE` to use
pub const DEFAULT_USE_MSB_MERGE_TYPE: bool = true;

/// The powersort [`super::Sort`].
///
/// Thin wrapper around [`crate::engine::sort_by`], monomorphized over the
/// same tunables [`crate::config::SortConfig`] validates at runtime. Unlike
/// [`crate::sort_by`], [`super::Sort::sort`] is infallible (the trait has no
/// `Result` in its signature): an invalid const generic combination, or a
/// comparator contract violation, panics rather than returning `Err`. See
/// `DESIGN.md` for this trade-off.
pub struct PowerSort<
    const MIN_RUN_LENGTH: usize = DEFAULT_MIN_RUN_LENGTH,
    const ONLY_INCREASING_RUNS: bool = DEFAULT_ONLY_INCREASING_RUNS,
    const USE_MSB_MERGE_TYPE: bool = DEFAULT_USE_MSB_MERGE_TYPE,
>;

impl<const MIN_RUN_LENGTH: usize, const ONLY_INCREASING_RUNS: bool, const USE_MSB_MERGE_TYPE: bool>
    super::Sort for PowerSort<MIN_RUN_LENGTH, ONLY_INCREASING_RUNS, USE_MSB_MERGE_TYPE>
{
    const IS_STABLE: bool = true;

    const BASE_NAME: &str = "powersort";

    fn parameters() -> impl Iterator<Item = (&'static str, String)> {
        vec![
            ("min_run_length", MIN_RUN_LENGTH.to_string()),
            ("only_increasing_runs", ONLY_INCREASING_RUNS.to_string()),
            ("use_msb_merge_type", USE_MSB_MERGE_TYPE.to_string()),
        ]
        .into_iter()
    }

    fn sort<T: Ord>(slice: &mut [T]) {
        let config = crate::config::SortConfig {
            min_run_len: MIN_RUN_LENGTH,
            use_msb_merge_type: USE_MSB_MERGE_TYPE,
            only_increasing_runs: ONLY_INCREASING_RUNS,
        };

        crate::engine::sort_by(slice, config, |a: &T, b: &T| a.cmp(b))
            .expect("PowerSort's const generics must form a valid SortConfig");
    }
}
