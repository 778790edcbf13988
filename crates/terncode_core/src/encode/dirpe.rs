//! DIRPE: directed range prefix encoding.
//!
//! The value is cut into `W/c` chunks and every chunk of a directly
//! encodable span is fence-encoded independently; the pattern is the
//! concatenation, high chunk first. Spans that would over-match through the
//! per-chunk Cartesian product are first split by the shared chunk-aligned
//! decomposition.

use super::{
    chunks::{chunk_of, chunk_spans},
    dedup_patterns,
    fence::{fence_range, fence_value},
    ChunkConfig, Ternary,
};

/// Encode `[lo, hi]` into DIRPE patterns of length
/// [`encoded_len`](ChunkConfig::encoded_len).
pub fn encode(lo: u16, hi: u16, cfg: &ChunkConfig) -> Vec<Ternary> {
    if lo > hi {
        return Vec::new();
    }
    let (lo, hi) = (lo as u32, hi as u32);
    assert!(
        hi <= cfg.domain_max(),
        "endpoints exceed {}-bit domain",
        cfg.width()
    );
    let patterns = chunk_spans(lo, hi, cfg.width(), cfg.chunk())
        .into_iter()
        .map(|(a, b)| encode_span(a, b, cfg))
        .collect();
    let patterns = dedup_patterns(patterns);
    debug_assert!(patterns.iter().all(|p| p.len() == cfg.encoded_len()));
    #[cfg(debug_assertions)]
    super::debug_check_cover(&patterns, lo, hi, cfg.width(), |v| {
        encode_value(v as u16, cfg)
    });
    patterns
}

/// Chunk-wise fence encoding of a single value.
pub fn encode_value(v: u16, cfg: &ChunkConfig) -> Ternary {
    let v = v as u32;
    assert!(v <= cfg.domain_max());
    let mut t = Ternary::with_capacity(cfg.encoded_len());
    for i in 0..cfg.num_chunks() {
        t.append(&fence_value(chunk_of(v, i, cfg.width(), cfg.chunk()), cfg.chunk()));
    }
    t
}

fn encode_span(lo: u32, hi: u32, cfg: &ChunkConfig) -> Ternary {
    let mut t = Ternary::with_capacity(cfg.encoded_len());
    for i in 0..cfg.num_chunks() {
        let s = chunk_of(lo, i, cfg.width(), cfg.chunk());
        let e = chunk_of(hi, i, cfg.width(), cfg.chunk());
        t.append(&fence_range(s, e, cfg.chunk()));
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(pats: &[Ternary]) -> Vec<String> {
        pats.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_paper_example_2_9() {
        let cfg = ChunkConfig::new(4, 2);
        assert_eq!(
            strings(&encode(2, 9, &cfg)),
            vec!["000*11", "001***", "01100*"]
        );
    }

    #[test]
    fn test_split_1_13_produces_four() {
        let cfg = ChunkConfig::new(4, 2);
        assert_eq!(
            strings(&encode(1, 13, &cfg)),
            vec!["000**1", "001***", "011***", "11100*"]
        );
    }

    #[test]
    fn test_split_1_6() {
        let cfg = ChunkConfig::new(4, 2);
        assert_eq!(strings(&encode(1, 6, &cfg)), vec!["000**1", "0010**"]);
    }

    #[test]
    fn test_single_value_has_no_wildcards() {
        let cfg = ChunkConfig::new(4, 2);
        let pats = encode(5, 5, &cfg);
        assert_eq!(pats.len(), 1);
        assert_eq!(pats[0], encode_value(5, &cfg));
        assert_eq!(pats[0].to_string(), "001001");
    }

    #[test]
    fn test_full_domain_is_all_wildcards() {
        let cfg = ChunkConfig::new(4, 2);
        let pats = encode(0, 15, &cfg);
        assert_eq!(strings(&pats), vec!["******"]);
    }

    #[test]
    fn test_empty_range() {
        let cfg = ChunkConfig::new(4, 2);
        assert!(encode(9, 2, &cfg).is_empty());
    }

    #[test]
    fn test_coverage_exhaustive_small_widths() {
        for (width, chunk) in [(4u32, 1u32), (4, 2), (4, 4), (6, 2), (6, 3)] {
            let cfg = ChunkConfig::new(width, chunk);
            let max = cfg.domain_max() as u16;
            let words: Vec<Ternary> = (0..=max).map(|v| encode_value(v, &cfg)).collect();
            for lo in 0..=max {
                for hi in lo..=max {
                    let pats = encode(lo, hi, &cfg);
                    assert!(pats.iter().all(|p| p.len() == cfg.encoded_len()));
                    for v in 0..=max {
                        let hit = pats.iter().any(|p| p.covers(&words[v as usize]));
                        assert_eq!(
                            hit,
                            (lo..=hi).contains(&v),
                            "dirpe W={width} c={chunk} [{lo},{hi}] at {v}"
                        );
                    }
                }
            }
        }
    }
}
