//! Fence (thermometer) encoding of chunk values and chunk-local ranges.
//!
//! A `c`-bit value `v` becomes `2^c - 1` symbols: `2^c - 1 - v` zeros then
//! `v` ones. A chunk-local range `[s, e]` additionally opens `e - s`
//! wildcards between the zeros and the ones, so one pattern matches exactly
//! the range. Unlike binary, integer order of `v` equals lexicographic order
//! of the fence string.

use super::{Sym, Ternary};

/// Fence-encode a single chunk value. Asserts `v < 2^chunk`.
pub fn fence_value(v: u32, chunk: u32) -> Ternary {
    fence_range(v, v, chunk)
}

/// Fence-encode a chunk-local range. Asserts `lo <= hi < 2^chunk`.
pub fn fence_range(lo: u32, hi: u32, chunk: u32) -> Ternary {
    let max = (1u32 << chunk) - 1;
    assert!(lo <= hi, "fence range requires lo <= hi, got [{lo}, {hi}]");
    assert!(hi <= max, "fence range [{lo}, {hi}] exceeds {chunk}-bit chunk");
    let mut t = Ternary::with_capacity(max as usize);
    t.extend_run(Sym::Zero, (max - hi) as usize);
    t.extend_run(Sym::Any, (hi - lo) as usize);
    t.extend_run(Sym::One, lo as usize);
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_value_two_bit() {
        let table = ["000", "001", "011", "111"];
        for (v, want) in table.iter().enumerate() {
            assert_eq!(fence_value(v as u32, 2).to_string(), *want);
        }
    }

    #[test]
    fn test_fence_range_two_bit() {
        assert_eq!(fence_range(0, 0, 2).to_string(), "000");
        assert_eq!(fence_range(0, 1, 2).to_string(), "00*");
        assert_eq!(fence_range(0, 3, 2).to_string(), "***");
        assert_eq!(fence_range(1, 2, 2).to_string(), "0*1");
        assert_eq!(fence_range(2, 3, 2).to_string(), "*11");
    }

    #[test]
    fn test_fence_range_matches_exactly_its_range() {
        for chunk in 1..=4u32 {
            let max = (1 << chunk) - 1;
            for lo in 0..=max {
                for hi in lo..=max {
                    let pat = fence_range(lo, hi, chunk);
                    for v in 0..=max {
                        let word = fence_value(v, chunk);
                        assert_eq!(pat.covers(&word), (lo..=hi).contains(&v));
                    }
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_fence_value_out_of_chunk() {
        let _ = fence_value(4, 2);
    }
}
