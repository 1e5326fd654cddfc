//! Error taxonomy for the powersort engine.
//!
//! Mirrors the three error kinds a sort call can surface: a precondition
//! violation (caught before any mutation), a comparator contract violation
//! (caught mid-merge, after partial mutation), and configuration
//! incompatibilities (also a precondition violation, kept as a distinct
//! variant so callers can match on it directly).

/// Errors that can be returned by [`crate::sort`] and [`crate::sort_by`].
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum PowersortError {
    /// The requested [`crate::config::SortConfig`] combines options that are
    /// mutually incompatible (see [`crate::config::SortConfig::validate`]).
    /// No mutation is performed before this error is returned.
    #[error("invalid powersort configuration: {0}")]
    InvalidConfig(&'static str),

    /// The range to sort is too long to be addressed by the node-power MSB
    /// trick, which requires the range length to fit in a signed 32-bit
    /// integer. No mutation is performed before this error is returned.
    #[error("range length {0} does not fit in a signed 32-bit index")]
    RangeTooLarge(usize),

    /// The galloping merge observed a cursor run past its bound while both
    /// runs were expected to still hold elements. This can only happen if
    /// `cmp` is not a consistent total order (not transitive, or not
    /// consistent with itself across repeated calls on equal arguments).
    /// The slice may already be partially mutated when this is returned.
    #[error("comparison method violates its general contract")]
    ComparatorContractViolation,
}
