//! SRGE: symmetric range Gray encoding.
//!
//! Patterns produced here match the Gray code `G(x) = x ^ (x >> 1)` of a
//! value, not its plain binary form. Under `G` the domain forms a reflected
//! binary tree: the Gray codes of the right half of any subtree walk the
//! mirror image of the left half. A pattern covering an aligned block next
//! to a subtree axis therefore also covers the mirrored block once the axis
//! bit is wildcarded, which is what lets an arbitrary range cost far fewer
//! entries than its binary prefix expansion.
//!
//! The encoder splits the range at the axis of the least common ancestor of
//! the endpoints, reflects an axis-anchored block cover of the longer side
//! onto the shorter one, and recurses on what remains of the longer side.
//! Remainder patterns pick up the axis wildcard as well whenever their
//! mirrored match set stays inside the originally requested interval; the
//! preimage bound check below keeps that sound.

use super::{
    bits::{aligned_blocks_down, aligned_blocks_up, binary_to_gray, is_hypercube},
    dedup_patterns,
    prefix::cover,
    Sym, Ternary,
};

/// Encode `[lo, hi]` into Gray-domain patterns of `width` symbols.
pub fn encode(lo: u16, hi: u16, width: u32) -> Vec<Ternary> {
    assert!((1..=16).contains(&width), "width must be in 1..=16");
    if lo > hi {
        return Vec::new();
    }
    let (lo, hi) = (lo as u32, hi as u32);
    assert!(hi <= (1u32 << width) - 1, "endpoints exceed {width}-bit domain");
    let mut out = Vec::new();
    split(lo, hi, lo, hi, width, &mut out);
    let out = dedup_patterns(out);
    debug_assert!(out.iter().all(|p| p.len() == width as usize));
    #[cfg(debug_assertions)]
    super::debug_check_cover(&out, lo, hi, width, |v| {
        Ternary::from_bits(binary_to_gray(v), width)
    });
    out
}

fn split(lo: u32, hi: u32, lo0: u32, hi0: u32, width: u32, out: &mut Vec<Ternary>) {
    if lo == hi {
        out.push(Ternary::from_bits(binary_to_gray(lo), width));
        return;
    }
    if is_hypercube(lo, hi) {
        out.push(subtree_cover(lo, hi, width));
        return;
    }

    // The highest differing binary bit is also the highest differing Gray
    // bit; the axis is where that bit flips.
    let beta = 31 - (lo ^ hi).leading_zeros();
    let pl = lo | ((1 << beta) - 1);
    let pr = pl + 1;
    let left = pl - lo + 1;
    let right = hi - pr + 1;
    let m = left.min(right);
    let axis_sym = (width - 1 - beta) as usize;

    // Reflect: cover the m values adjacent to the axis on the longer side
    // with aligned blocks; freeing the axis bit extends each block cover to
    // its mirror, which tiles the entire shorter side.
    let (blocks, rem_lo, rem_hi) = if left <= right {
        (aligned_blocks_up(pr, pr + m - 1), pr + m, hi)
    } else {
        (aligned_blocks_down(pl - m + 1, pl), lo, pl - m)
    };
    for (a, b) in blocks {
        let mut p = subtree_cover(a, b, width);
        p.set(axis_sym, Sym::Any);
        out.push(p);
    }

    if rem_lo <= rem_hi {
        let mut tail = Vec::new();
        split(rem_lo, rem_hi, lo0, hi0, width, &mut tail);
        for mut p in tail {
            // A remainder pattern may take the axis wildcard too, when the
            // mirror it picks up is already inside the requested range.
            let mut freed = p.clone();
            freed.set(axis_sym, Sym::Any);
            let (min, max) = preimage_span(&freed, width);
            if lo0 <= min && max <= hi0 {
                p = freed;
            }
            out.push(p);
        }
    }
}

/// Gray cover of an aligned block: all its Gray codes agree above the
/// block's free low bits.
fn subtree_cover(lo: u32, hi: u32, width: u32) -> Ternary {
    debug_assert!(is_hypercube(lo, hi));
    cover(binary_to_gray(lo), (hi - lo + 1).trailing_zeros(), width)
}

/// Smallest and largest binary value whose Gray code matches the pattern.
///
/// Walking from the most significant bit, a fixed Gray symbol forces the
/// binary bit (`x_i = g_i ^ x_{i+1}`) while a wildcard leaves it free, so a
/// greedy choice per walk is exact. Together with the interval being
/// contiguous this bounds the whole match set.
fn preimage_span(p: &Ternary, width: u32) -> (u32, u32) {
    let mut min = 0u32;
    let mut max = 0u32;
    let mut prev_min = 0u32;
    let mut prev_max = 0u32;
    for i in (0..width).rev() {
        let (bit_min, bit_max) = match p.get((width - 1 - i) as usize) {
            Sym::Zero => (prev_min, prev_max),
            Sym::One => (1 - prev_min, 1 - prev_max),
            Sym::Any => (0, 1),
        };
        min |= bit_min << i;
        max |= bit_max << i;
        prev_min = bit_min;
        prev_max = bit_max;
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::bits::gray_to_binary;
    use std::collections::BTreeSet;

    fn pattern_set(lo: u16, hi: u16, width: u32) -> BTreeSet<String> {
        encode(lo, hi, width)
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    fn set_of(strs: &[&str]) -> BTreeSet<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reflection_across_top_axis() {
        assert_eq!(pattern_set(6, 14, 4), set_of(&["*10*", "1*1*", "1*01"]));
    }

    #[test]
    fn test_multi_subtree_traversal() {
        assert_eq!(pattern_set(1, 13, 4), set_of(&["*1**", "*01*", "0001"]));
    }

    #[test]
    fn test_single_subtree() {
        assert_eq!(pattern_set(1, 6, 4), set_of(&["0*1*", "0*01"]));
    }

    #[test]
    fn test_single_point_is_gray_code() {
        for v in 0..16u16 {
            let pats = encode(v, v, 4);
            assert_eq!(pats.len(), 1);
            assert_eq!(pats[0], Ternary::from_bits(binary_to_gray(v as u32), 4));
        }
        let pats = encode(443, 443, 16);
        assert_eq!(pats[0], Ternary::from_bits(binary_to_gray(443), 16));
    }

    #[test]
    fn test_full_domain() {
        assert_eq!(pattern_set(0, 15, 4), set_of(&["****"]));
        assert_eq!(encode(0, u16::MAX, 16)[0].to_string(), "*".repeat(16));
    }

    #[test]
    fn test_empty_range() {
        assert!(encode(9, 2, 4).is_empty());
    }

    #[test]
    fn test_preimage_span() {
        // *001 matches Gray codes 0001 and 1001, i.e. binary 1 and 14
        let p: Ternary = "*001".parse().unwrap();
        assert_eq!(preimage_span(&p, 4), (1, 14));
        let p: Ternary = "1*01".parse().unwrap();
        assert_eq!(preimage_span(&p, 4), (9, 14));
    }

    #[test]
    fn test_coverage_exhaustive_small_widths() {
        for width in [3u32, 4, 5, 6] {
            let max = (1u16 << width) - 1;
            let words: Vec<Ternary> = (0..=max)
                .map(|v| Ternary::from_bits(binary_to_gray(v as u32), width))
                .collect();
            for lo in 0..=max {
                for hi in lo..=max {
                    let pats = encode(lo, hi, width);
                    for v in 0..=max {
                        let hit = pats.iter().any(|p| p.covers(&words[v as usize]));
                        assert_eq!(
                            hit,
                            (lo..=hi).contains(&v),
                            "srge W={width} [{lo},{hi}] at {v}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_symmetric_range_costs_half() {
        // A range symmetric around a subtree axis is covered entirely by
        // reflected patterns of one side.
        assert_eq!(pattern_set(2, 13, 4), set_of(&["*1**", "*01*"]));
    }

    #[test]
    fn test_gray_inverse_consistency() {
        for v in 0..1u32 << 12 {
            assert_eq!(gray_to_binary(binary_to_gray(v)), v);
        }
    }
}
