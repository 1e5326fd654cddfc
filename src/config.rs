//! Runtime configuration for the powersort engine's entry point.
//!
//! [`SortConfig`] bundles the three tunables the specification exposes at
//! the public boundary: the short-run extension threshold and the two
//! variant switches (`use_msb_merge_type`, `only_increasing_runs`). Compile
//! time configuration via const generics (mirroring the teacher crate's
//! `PowerSort<..., MIN_RUN_LENGTH, ...>` style) lives on
//! [`crate::algorithms::powersort::PowerSort`] instead; this runtime form
//! exists because the entry point in [`crate::sort_by`] validates option
//! combinations and must be able to reject them with a [`PowersortError`]
//! rather than a compile error.

use crate::error::PowersortError;

/// The default minimum run length to extend short natural runs to.
pub const DEFAULT_MIN_RUN_LENGTH: usize = 24;

/// Runtime configuration for a single [`crate::sort_by`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// Short natural runs are extended via binary insertion sort to this
    /// length. Must be in `[1, 64]`.
    pub min_run_len: usize,
    /// If `true`, node powers are computed via the O(1) MSB trick
    /// ([`crate::engine::power::node_power_msb`]); if `false`, via the
    /// bitwise fallback loop
    /// ([`crate::engine::power::node_power_bitwise`]).
    pub use_msb_merge_type: bool,
    /// If `true`, the run detector only ever extends weakly increasing
    /// runs and never reverses a descending run.
    pub only_increasing_runs: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            min_run_len: DEFAULT_MIN_RUN_LENGTH,
            use_msb_merge_type: true,
            only_increasing_runs: false,
        }
    }
}

impl SortConfig {
    /// A config using the bitwise node-power fallback rather than the MSB
    /// trick. Incompatible with [`Self::only_increasing_runs`] and with a
    /// `min_run_len` greater than 1 (see [`Self::validate`]).
    pub fn bitwise() -> Self {
        Self {
            min_run_len: 1,
            use_msb_merge_type: false,
            only_increasing_runs: false,
        }
    }

    /// Reject combinations the specification disallows:
    ///
    /// - `use_msb_merge_type = false` together with `only_increasing_runs = true`.
    /// - `min_run_len > 1` without `{use_msb_merge_type = true, only_increasing_runs = false}`.
    /// - `min_run_len` outside `[1, 64]`.
    pub fn validate(&self) -> Result<(), PowersortError> {
        if !(1..=64).contains(&self.min_run_len) {
            return Err(PowersortError::InvalidConfig(
                "min_run_len must be in [1, 64]",
            ));
        }

        if !self.use_msb_merge_type && self.only_increasing_runs {
            return Err(PowersortError::InvalidConfig(
                "only_increasing_runs requires use_msb_merge_type",
            ));
        }

        if self.min_run_len > 1 && !(self.use_msb_merge_type && !self.only_increasing_runs) {
            return Err(PowersortError::InvalidConfig(
                "min_run_len > 1 requires use_msb_merge_type and !only_increasing_runs",
            ));
        }

        Ok(())
    }
}
