//! # Range encoding
//!
//! ## Relations of important items
//! ```text
//!              [lo, hi] interval
//!                      |
//!                      v
//!   prefix / srge / dirpe / cgfe  --(ChunkConfig for the chunked schemes)
//!                      |
//!                      v
//!               Vec<Ternary>
//! ```
//!
//! Every encoder is a pure function of its inputs: the union of the match
//! sets of the returned patterns equals the requested interval, no pattern
//! matches outside it, and identical inputs produce the identical sequence.
//! An empty interval (`lo > hi`) yields an empty set; a malformed
//! configuration is a caller bug and asserts.
//!
//! ## Example
//! ```
//! use terncode_core::encode::{encode_cgfe, encode_srge};
//!
//! let srge = encode_srge(1000, 2000);
//! let cgfe = encode_cgfe(1000, 2000, 2);
//! assert!(srge.iter().all(|p| p.len() == 16));
//! assert!(cgfe.iter().all(|p| p.len() == 24));
//! ```

pub mod bits;
pub mod cgfe;
pub mod chunks;
pub mod dirpe;
pub mod fence;
pub mod prefix;
pub mod srge;

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use bitvec::prelude::*;
use fxhash::FxBuildHasher;
use indexmap::IndexSet;

/// Bit width of a transport-layer port.
pub const PORT_BITS: u32 = 16;

/// One ternary symbol of a TCAM cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sym {
    Zero,
    One,
    /// Wildcard; matches either bit value.
    Any,
}

/// A fixed-length ternary string, stored as a value/mask bit pair.
///
/// The leftmost symbol is the most significant position of the encoded
/// quantity. Value bits under a cleared mask bit are kept at zero so that
/// equality and hashing are structural.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Ternary {
    value: BitVec<u8, Msb0>,
    mask: BitVec<u8, Msb0>,
}

impl Ternary {
    pub fn with_capacity(n: usize) -> Self {
        Ternary {
            value: BitVec::with_capacity(n),
            mask: BitVec::with_capacity(n),
        }
    }

    /// Fully-fixed pattern holding the low `width` bits of `bits`, MSB first.
    pub fn from_bits(bits: u32, width: u32) -> Self {
        let mut t = Ternary::with_capacity(width as usize);
        for i in (0..width).rev() {
            t.push(if (bits >> i) & 1 == 1 { Sym::One } else { Sym::Zero });
        }
        t
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn push(&mut self, sym: Sym) {
        match sym {
            Sym::Zero => {
                self.value.push(false);
                self.mask.push(true);
            }
            Sym::One => {
                self.value.push(true);
                self.mask.push(true);
            }
            Sym::Any => {
                self.value.push(false);
                self.mask.push(false);
            }
        }
    }

    pub fn extend_run(&mut self, sym: Sym, n: usize) {
        for _ in 0..n {
            self.push(sym);
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> Sym {
        match (self.mask[i], self.value[i]) {
            (false, _) => Sym::Any,
            (true, false) => Sym::Zero,
            (true, true) => Sym::One,
        }
    }

    pub fn set(&mut self, i: usize, sym: Sym) {
        match sym {
            Sym::Zero => {
                self.value.set(i, false);
                self.mask.set(i, true);
            }
            Sym::One => {
                self.value.set(i, true);
                self.mask.set(i, true);
            }
            Sym::Any => {
                self.value.set(i, false);
                self.mask.set(i, false);
            }
        }
    }

    /// Append all symbols of `tail`.
    pub fn append(&mut self, tail: &Ternary) {
        self.value.extend_from_bitslice(&tail.value);
        self.mask.extend_from_bitslice(&tail.mask);
    }

    /// Does every word matched by `other` also match `self`?
    pub fn covers(&self, other: &Ternary) -> bool {
        debug_assert_eq!(self.len(), other.len());
        (0..self.len()).all(|i| match self.get(i) {
            Sym::Any => true,
            sym => sym == other.get(i),
        })
    }

    /// Render with a separator every `group` symbols, for diagnostics.
    pub fn grouped(&self, group: usize) -> String {
        let group = group.max(1);
        let mut s = String::with_capacity(self.len() + self.len() / group);
        for i in 0..self.len() {
            if i > 0 && i % group == 0 {
                s.push(' ');
            }
            s.push(match self.get(i) {
                Sym::Zero => '0',
                Sym::One => '1',
                Sym::Any => '*',
            });
        }
        s
    }
}

impl Display for Ternary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.len() {
            match self.get(i) {
                Sym::Zero => write!(f, "0")?,
                Sym::One => write!(f, "1")?,
                Sym::Any => write!(f, "*")?,
            }
        }
        Ok(())
    }
}

impl Debug for Ternary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Error produced when parsing a ternary string containing a symbol outside
/// `{'0', '1', '*'}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTernaryError(pub char);

impl Display for ParseTernaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid ternary symbol {:?}", self.0)
    }
}

impl std::error::Error for ParseTernaryError {}

impl FromStr for Ternary {
    type Err = ParseTernaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut t = Ternary::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => t.push(Sym::Zero),
                '1' => t.push(Sym::One),
                '*' => t.push(Sym::Any),
                other => return Err(ParseTernaryError(other)),
            }
        }
        Ok(t)
    }
}

/// Configuration of the chunked schemes (DIRPE, CGFE).
///
/// `width` is the total bit width of the encoded value, `chunk` the bit width
/// of one chunk. One chunk expands to `2^chunk - 1` ternary symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkConfig {
    width: u32,
    chunk: u32,
}

impl ChunkConfig {
    pub fn new(width: u32, chunk: u32) -> Self {
        assert!(
            (1..=16).contains(&width),
            "value width must be in 1..=16, got {width}"
        );
        assert!(
            chunk >= 1 && chunk <= width,
            "chunk width must be in 1..={width}, got {chunk}"
        );
        assert!(
            width % chunk == 0,
            "chunk width {chunk} must divide value width {width}"
        );
        ChunkConfig { width, chunk }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    #[inline]
    pub fn num_chunks(&self) -> u32 {
        self.width / self.chunk
    }

    /// Largest value a single chunk can hold.
    #[inline]
    pub fn chunk_max(&self) -> u32 {
        (1 << self.chunk) - 1
    }

    /// Number of ternary symbols one chunk expands to.
    #[inline]
    pub fn chunk_syms(&self) -> usize {
        (1usize << self.chunk) - 1
    }

    /// Total symbol length of one encoded pattern.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.num_chunks() as usize * self.chunk_syms()
    }

    /// Size of one low-order block under the MSC/TC factorization.
    #[inline]
    pub fn block_size(&self) -> u32 {
        1 << (self.width - self.chunk)
    }

    /// Number of MSC values.
    #[inline]
    pub fn num_blocks(&self) -> u32 {
        1 << self.chunk
    }

    /// Bit width of the tail chunk (everything below the MSC).
    #[inline]
    pub fn tc_width(&self) -> u32 {
        self.width - self.chunk
    }

    #[inline]
    pub fn domain_max(&self) -> u32 {
        (1u32 << self.width) - 1
    }
}

/// Remove duplicate patterns, keeping first-occurrence order.
pub fn dedup_patterns(patterns: Vec<Ternary>) -> Vec<Ternary> {
    let set: IndexSet<Ternary, FxBuildHasher> = patterns.into_iter().collect();
    set.into_iter().collect()
}

/// Debug-build self check: at small widths, enumerate the domain and verify
/// the pattern set matches exactly `[lo, hi]` under the scheme's codeword.
#[cfg(debug_assertions)]
pub(crate) fn debug_check_cover(
    patterns: &[Ternary],
    lo: u32,
    hi: u32,
    width: u32,
    word: impl Fn(u32) -> Ternary,
) {
    if width > 10 {
        return;
    }
    for v in 0..=(1u32 << width) - 1 {
        let hit = patterns.iter().any(|p| p.covers(&word(v)));
        debug_assert_eq!(
            hit,
            (lo..=hi).contains(&v),
            "pattern set disagrees with [{lo}, {hi}] at {v}"
        );
    }
}

/// SRGE-encode a 16-bit port range.
pub fn encode_srge(lo: u16, hi: u16) -> Vec<Ternary> {
    srge::encode(lo, hi, PORT_BITS)
}

/// DIRPE-encode a 16-bit port range with `chunk`-bit chunks.
pub fn encode_dirpe(lo: u16, hi: u16, chunk: u8) -> Vec<Ternary> {
    dirpe::encode(lo, hi, &ChunkConfig::new(PORT_BITS, chunk as u32))
}

/// CGFE-encode a 16-bit port range with `chunk`-bit chunks.
pub fn encode_cgfe(lo: u16, hi: u16, chunk: u8) -> Vec<Ternary> {
    cgfe::encode(lo, hi, &ChunkConfig::new(PORT_BITS, chunk as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tern(s: &str) -> Ternary {
        s.parse().unwrap()
    }

    #[test]
    fn test_ternary_roundtrip() {
        let t = tern("01*10*");
        assert_eq!(t.to_string(), "01*10*");
        assert_eq!(t.len(), 6);
        assert_eq!(t.get(2), Sym::Any);
        assert_eq!(t.get(3), Sym::One);
    }

    #[test]
    fn test_ternary_canonical_eq() {
        // A wildcard written over a one must compare equal to a pushed wildcard.
        let mut a = tern("0110");
        a.set(1, Sym::Any);
        let b = tern("0*10");
        assert_eq!(a, b);
    }

    #[test]
    fn test_ternary_from_bits() {
        assert_eq!(Ternary::from_bits(0b1001, 4).to_string(), "1001");
        assert_eq!(Ternary::from_bits(5, 6).to_string(), "000101");
    }

    #[test]
    fn test_ternary_covers() {
        assert!(tern("0*1*").covers(&tern("0010")));
        assert!(tern("0*1*").covers(&tern("0*10")));
        assert!(!tern("0*1*").covers(&tern("0000")));
        assert!(!tern("001*").covers(&tern("0***")));
    }

    #[test]
    fn test_ternary_grouped() {
        assert_eq!(tern("000*11").grouped(3), "000 *11");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("01x".parse::<Ternary>(), Err(ParseTernaryError('x')));
    }

    #[test]
    fn test_chunk_config_derived() {
        let cfg = ChunkConfig::new(16, 2);
        assert_eq!(cfg.num_chunks(), 8);
        assert_eq!(cfg.chunk_syms(), 3);
        assert_eq!(cfg.encoded_len(), 24);
        assert_eq!(cfg.block_size(), 1 << 14);
        assert_eq!(cfg.num_blocks(), 4);
    }

    #[test]
    #[should_panic]
    fn test_chunk_config_rejects_nondivisor() {
        let _ = ChunkConfig::new(16, 3);
    }

    #[test]
    fn test_dedup_keeps_order() {
        let pats = vec![tern("01"), tern("1*"), tern("01")];
        let out = dedup_patterns(pats);
        assert_eq!(out, vec![tern("01"), tern("1*")]);
    }
}
