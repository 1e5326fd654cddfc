//! Node-power computation: the numeric heart of the merge schedule.
//!
//! Given the outer range `[lo, lo+n)` and two adjacent runs `A = [s_a, s_b)`
//! and `B = [s_b, e_b]` (`e_b` inclusive, matching the run stack's internal
//! convention), the node power is the depth at which the two runs' midpoints
//! first diverge in the binary expansion of their position within the outer
//! range. Equal node powers never arise for distinct adjacent run pairs, so
//! `usize` return values double as both a numeric power and a stack index.
//!
//! Both computations below must agree bit-for-bit; [`node_power_msb`] is the
//! O(1) path used whenever `n` fits in a signed 32-bit integer, and
//! [`node_power_bitwise`] is a fallback with no such limit, kept for parity
//! testing and for configurations that request it explicitly.

/// The largest range length the MSB trick can address: the node-power
/// fixed-point arithmetic needs `n` to fit in a signed 32-bit integer.
pub const MAX_MSB_RANGE_LEN: usize = (1 << 31) - 1;

/// O(1) node power via leading-zero count on a fixed-point midpoint
/// encoding. Requires `n <= MAX_MSB_RANGE_LEN`; callers must check this
/// (see [`crate::error::PowersortError::RangeTooLarge`]).
///
/// `s_a`, `s_b`, `e_b` are absolute indices (not offsets from `lo`); `e_b` is
/// inclusive.
pub fn node_power_msb(n: usize, lo: usize, s_a: usize, s_b: usize, e_b: usize) -> usize {
    debug_assert!(n <= MAX_MSB_RANGE_LEN);

    // `l` and `r` are 4x the distance of each run's midpoint from `lo`:
    // l = 4*((s_a + s_b)/2 - lo), r = 4*((s_b + e_b + 1)/2 - lo).
    let l = 2 * s_a as u64 + 2 * s_b as u64 - 4 * lo as u64;
    let r = 2 * s_b as u64 + 2 * e_b as u64 + 2 - 4 * lo as u64;
    let n64 = n as u64;

    // (l << 30) / n == floor(a * 2^32) for a = (midpoint_a - lo) / n in
    // [0, 1); narrowing to u32 is exact (no wraparound) since a < 1.
    let a = ((l << 30) / n64) as u32;
    let b = ((r << 30) / n64) as u32;

    // `leading_zeros(a ^ b)` counts the shared leading bits; the power is
    // one past that, the position of the first bit where they diverge.
    (a ^ b).leading_zeros() as usize + 1
}

/// Node power via bit-by-bit simulated long division, with no range limit.
/// Produces the same result as [`node_power_msb`] whenever both are defined.
pub fn node_power_bitwise(n: usize, lo: usize, s_a: usize, s_b: usize, e_b: usize) -> usize {
    // Numerators over an implicit denominator of 2*n: l = 2*(midpoint_a -
    // lo), r = 2*(midpoint_b - lo).
    let mut l = (s_a + s_b - 2 * lo) as u64;
    let mut r = (s_b + e_b + 1 - 2 * lo) as u64;
    let n64 = n as u64;

    let mut count = 0usize;
    loop {
        let digit_l = if l >= n64 {
            l -= n64;
            1u8
        } else {
            0u8
        };
        l <<= 1;

        let digit_r = if r >= n64 {
            r -= n64;
            1u8
        } else {
            0u8
        };
        r <<= 1;

        count += 1;
        if digit_l != digit_r {
            return count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_and_bitwise_agree_on_hand_picked_cases() {
        let cases: &[(usize, usize, usize, usize, usize)] = &[
            (10, 0, 0, 4, 9),
            (10, 0, 0, 1, 9),
            (1000, 0, 0, 500, 999),
            (1000, 0, 0, 1, 999),
            (7, 0, 2, 4, 6),
            (1 << 20, 0, 0, (1 << 19) + 3, (1 << 20) - 1),
        ];
        for &(n, lo, s_a, s_b, e_b) in cases {
            assert_eq!(
                node_power_msb(n, lo, s_a, s_b, e_b),
                node_power_bitwise(n, lo, s_a, s_b, e_b),
                "mismatch for n={n} lo={lo} s_a={s_a} s_b={s_b} e_b={e_b}"
            );
        }
    }

    #[test]
    fn power_is_at_least_one() {
        assert!(node_power_msb(10, 0, 0, 4, 9) >= 1);
        assert!(node_power_bitwise(10, 0, 0, 4, 9) >= 1);
    }

    #[test]
    fn lo_offset_does_not_change_the_result() {
        let base = node_power_msb(10, 0, 0, 4, 9);
        let shifted = node_power_msb(10, 100, 100, 104, 109);
        assert_eq!(base, shifted);
        let base_bw = node_power_bitwise(10, 0, 0, 4, 9);
        let shifted_bw = node_power_bitwise(10, 100, 100, 104, 109);
        assert_eq!(base_bw, shifted_bw);
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// The MSB fast path and the bitwise fallback must agree bit-for-bit
        /// on every input where both are defined, over randomly generated
        /// adjacent-run boundaries.
        #[test]
        fn msb_and_bitwise_agree(
            n in 2usize..100_000,
            a_frac in 0u32..1000,
            b_frac in 1u32..1000,
        ) {
            // s_a = lo (0), s_b somewhere strictly inside (0, n), e_b = n - 1.
            let s_b = 1 + ((a_frac as usize * (n - 1)) / 1000).min(n - 2);
            let _ = b_frac;
            let e_b = n - 1;

            prop_assert_eq!(
                node_power_msb(n, 0, 0, s_b, e_b),
                node_power_bitwise(n, 0, 0, s_b, e_b),
            );
        }
    }
}
