//! Rule records and the TCAM entry assembler.
//!
//! A five-tuple ACL rule is split upstream into an IP projection and a port
//! projection sharing a priority. This module owns the port side: both port
//! ranges of a [`PortRule`] are encoded by the selected scheme and the
//! Cartesian product of the two pattern sets becomes the rule's TCAM
//! entries. Priority and action are carried through opaquely.

use crate::encode::{cgfe, dirpe, prefix, srge, ChunkConfig, Ternary, PORT_BITS};

/// Port projection of one classification rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortRule {
    pub rid: u32,
    pub src_port_lo: u16,
    pub src_port_hi: u16,
    pub dst_port_lo: u16,
    pub dst_port_hi: u16,
    pub priority: u32,
    /// Opaque `"0xHHHH/0xHHHH"` value/mask action string.
    pub action: String,
}

/// IP projection of one classification rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpRule {
    pub rid: u32,
    pub src_ip_lo: u32,
    pub src_ip_hi: u32,
    pub dst_ip_lo: u32,
    pub dst_ip_hi: u32,
    pub src_prefix_len: u8,
    pub dst_prefix_len: u8,
    pub proto: u8,
    pub priority: u32,
}

/// One installable TCAM line: a source/destination port pattern pair with
/// the originating rule's priority and action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TcamEntry {
    pub src_pattern: Ternary,
    pub dst_pattern: Ternary,
    pub priority: u32,
    pub action: String,
}

/// Scheme selector for port-range encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortEncoder {
    /// Naive binary prefix expansion (the baseline).
    Prefix,
    Srge,
    Dirpe(ChunkConfig),
    Cgfe(ChunkConfig),
}

impl PortEncoder {
    /// Chunked variants with the standard 16-bit port width.
    pub fn dirpe(chunk: u8) -> Self {
        PortEncoder::Dirpe(ChunkConfig::new(PORT_BITS, chunk as u32))
    }

    pub fn cgfe(chunk: u8) -> Self {
        PortEncoder::Cgfe(ChunkConfig::new(PORT_BITS, chunk as u32))
    }

    /// Encode one inclusive port range.
    pub fn encode_range(&self, lo: u16, hi: u16) -> Vec<Ternary> {
        match self {
            PortEncoder::Prefix => prefix::encode(lo, hi, PORT_BITS),
            PortEncoder::Srge => srge::encode(lo, hi, PORT_BITS),
            PortEncoder::Dirpe(cfg) => dirpe::encode(lo, hi, cfg),
            PortEncoder::Cgfe(cfg) => cgfe::encode(lo, hi, cfg),
        }
    }

    /// Symbol length of every pattern this encoder emits.
    pub fn pattern_len(&self) -> usize {
        match self {
            PortEncoder::Prefix | PortEncoder::Srge => PORT_BITS as usize,
            PortEncoder::Dirpe(cfg) | PortEncoder::Cgfe(cfg) => cfg.encoded_len(),
        }
    }
}

/// Expand one port rule into its TCAM entries: the Cartesian product of the
/// encoded source and destination pattern sets.
pub fn expand_rule(rule: &PortRule, coder: &PortEncoder) -> Vec<TcamEntry> {
    let src = coder.encode_range(rule.src_port_lo, rule.src_port_hi);
    let dst = coder.encode_range(rule.dst_port_lo, rule.dst_port_hi);
    let mut entries = Vec::with_capacity(src.len() * dst.len());
    for sp in &src {
        for dp in &dst {
            entries.push(TcamEntry {
                src_pattern: sp.clone(),
                dst_pattern: dp.clone(),
                priority: rule.priority,
                action: rule.action.clone(),
            });
        }
    }
    entries
}

/// Expand a whole port table, preserving rule order.
pub fn expand_rules(rules: &[PortRule], coder: &PortEncoder) -> Vec<TcamEntry> {
    rules
        .iter()
        .flat_map(|r| expand_rule(r, coder))
        .collect()
}
