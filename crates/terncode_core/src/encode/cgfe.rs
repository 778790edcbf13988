//! CGFE: chunked Gray fence encoding.
//!
//! Every value factors as `MSC * BLOCK_SIZE + TC`: the high chunk indexes a
//! block, the tail addresses into it. The tail encoding is direction-
//! sensitive: in odd blocks the first tail chunk is fence-encoded mirrored,
//! and the mirroring propagates chunk-by-chunk through the low bit of each
//! *encoded* chunk value. The payoff is that one tail pattern matches a TC
//! range `T` in blocks of its own parity and the mirrored range
//! `BLOCK_SIZE-1-T` in blocks of the opposite parity, so a single entry
//! whose MSC is itself a fence range can cover symmetric partial blocks at
//! both ends of the interval.
//!
//! The reflection lives entirely in [`tc_direct`]'s parity propagation;
//! produced patterns are never bit-flipped after the fact.

use super::{
    chunks::chunk_spans,
    dedup_patterns,
    fence::{fence_range, fence_value},
    ChunkConfig, Sym, Ternary,
};

/// One encoder entry before rendering: an MSC span plus a tail pattern.
struct Entry {
    msc_lo: u32,
    msc_hi: u32,
    tc: Ternary,
}

/// Encode `[lo, hi]` into CGFE patterns of length
/// [`encoded_len`](ChunkConfig::encoded_len).
pub fn encode(lo: u16, hi: u16, cfg: &ChunkConfig) -> Vec<Ternary> {
    assert!(
        cfg.chunk() < cfg.width(),
        "CGFE needs at least one tail chunk below the MSC"
    );
    if lo > hi {
        return Vec::new();
    }
    let (lo, hi) = (lo as u32, hi as u32);
    assert!(
        hi <= cfg.domain_max(),
        "endpoints exceed {}-bit domain",
        cfg.width()
    );
    let mut entries = Vec::new();
    expand(lo, hi, cfg, &mut entries);
    let patterns = entries
        .into_iter()
        .map(|en| {
            let mut t = fence_range(en.msc_lo, en.msc_hi, cfg.chunk());
            t.append(&en.tc);
            t
        })
        .collect();
    let patterns = dedup_patterns(patterns);
    debug_assert!(patterns.iter().all(|p| p.len() == cfg.encoded_len()));
    #[cfg(debug_assertions)]
    super::debug_check_cover(&patterns, lo, hi, cfg.width(), |v| {
        encode_value(v as u16, cfg)
    });
    patterns
}

/// CGFE codeword of a single value: MSC fence plus the parity-directed tail.
pub fn encode_value(v: u16, cfg: &ChunkConfig) -> Ternary {
    let v = v as u32;
    assert!(v <= cfg.domain_max());
    let bs = cfg.block_size();
    let (msc, tc) = (v / bs, v % bs);
    let mut t = fence_value(msc, cfg.chunk());
    t.append(&tc_direct(tc, tc, cfg, msc & 1 == 1));
    t
}

fn expand(lo: u32, hi: u32, cfg: &ChunkConfig, out: &mut Vec<Entry>) {
    let bs = cfg.block_size();
    let (ms, ts) = (lo / bs, lo % bs);
    let (me, te) = (hi / bs, hi % bs);

    // same block
    if ms == me {
        push_all(out, ms, ms, encode_tc_range(ts, te, cfg, ms & 1 == 1));
        return;
    }
    // block-aligned at both ends
    if ts == 0 && te == bs - 1 {
        out.push(full_blocks(ms, me, cfg));
        return;
    }
    // flush-low: complete blocks then a leading partial block
    if ts == 0 {
        out.push(full_blocks(ms, me - 1, cfg));
        push_all(out, me, me, encode_tc_range(0, te, cfg, me & 1 == 1));
        return;
    }
    // flush-high: a trailing partial block then complete blocks
    if te == bs - 1 {
        push_all(out, ms, ms, encode_tc_range(ts, bs - 1, cfg, ms & 1 == 1));
        out.push(full_blocks(ms + 1, me, cfg));
        return;
    }

    let head = bs - ts; // tail values of the first block
    let tail = te + 1; // leading values of the last block
    if (me - ms) % 2 == 1 {
        // Opposite-parity endpoints: the shorter partial block, extended
        // over the whole MSC span, reflects onto the other end.
        if head <= tail {
            push_all(out, ms, me, encode_tc_range(ts, bs - 1, cfg, ms & 1 == 1));
            if head < tail {
                push_all(out, me, me, encode_tc_range(head, te, cfg, me & 1 == 1));
            }
        } else {
            push_all(out, ms, me, encode_tc_range(0, te, cfg, me & 1 == 1));
            push_all(out, ms, ms, encode_tc_range(ts, bs - 1 - tail, cfg, ms & 1 == 1));
        }
        if ms + 1 <= me - 1 {
            out.push(full_blocks(ms + 1, me - 1, cfg));
        }
    } else {
        // Same-parity endpoints: extend each partial block across the
        // opposite-parity interior; together they saturate every interior
        // block when the partials overlap a full block's worth.
        push_all(out, ms, me - 1, encode_tc_range(ts, bs - 1, cfg, ms & 1 == 1));
        push_all(out, ms + 1, me, encode_tc_range(0, te, cfg, me & 1 == 1));
        if head + tail < bs {
            // interior blocks keep a symmetric uncovered band; one family
            // over the interior span closes it in both parities at once
            push_all(out, ms + 1, me - 1, encode_tc_range(te + 1, ts - 1, cfg, ms & 1 == 1));
        }
    }
}

fn push_all(out: &mut Vec<Entry>, msc_lo: u32, msc_hi: u32, tcs: Vec<Ternary>) {
    for tc in tcs {
        out.push(Entry { msc_lo, msc_hi, tc });
    }
}

fn full_blocks(msc_lo: u32, msc_hi: u32, cfg: &ChunkConfig) -> Entry {
    let mut tc = Ternary::with_capacity(cfg.encoded_len() - cfg.chunk_syms());
    tc.extend_run(Sym::Any, cfg.encoded_len() - cfg.chunk_syms());
    Entry { msc_lo, msc_hi, tc }
}

/// Encode a tail-chunk range under the given block parity.
///
/// A pattern returned here matches exactly `[lo, hi]` inside blocks of the
/// given parity and exactly the mirrored range inside blocks of the other
/// parity.
fn encode_tc_range(lo: u32, hi: u32, cfg: &ChunkConfig, parity: bool) -> Vec<Ternary> {
    if lo > hi {
        return Vec::new();
    }
    chunk_spans(lo, hi, cfg.tc_width(), cfg.chunk())
        .into_iter()
        .map(|(a, b)| tc_direct(a, b, cfg, parity))
        .collect()
}

/// Fence-encode a directly encodable tail span, mirroring each chunk when
/// the running parity is odd. The parity advances with the low bit of the
/// encoded chunk value, not the original one.
fn tc_direct(lo: u32, hi: u32, cfg: &ChunkConfig, mut parity: bool) -> Ternary {
    let chunk = cfg.chunk();
    let cmask = cfg.chunk_max();
    let n = cfg.tc_width() / chunk;
    let mut t = Ternary::with_capacity((n as usize) * cfg.chunk_syms());
    for i in 0..n {
        let shift = (n - 1 - i) * chunk;
        let (mut s, mut e) = ((lo >> shift) & cmask, (hi >> shift) & cmask);
        if parity {
            (s, e) = (cmask - e, cmask - s);
        }
        t.append(&fence_range(s, e, chunk));
        parity ^= s & 1 == 1;
    }
    t
}
