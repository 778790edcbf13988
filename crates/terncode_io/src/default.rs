use std::io::{self, Write};
use std::net::Ipv4Addr;

use indexmap::IndexMap;
use nom::{
    character::complete::{char, multispace0, multispace1},
    combinator::all_consuming,
    error::ParseError,
    sequence::{preceded, separated_pair, tuple},
    IResult,
};

use terncode_core::rule::{IpRule, PortRule, TcamEntry};

use crate::{
    basic::parser::{parse_hex_byte, parse_ipv4_prefix, parse_token, parse_u16},
    RuleLoader,
};

/// One parsed five-tuple filter line.
///
/// Priority is the 0-based position of the rule in its file and is carried
/// opaquely from here on; the action token is never interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AclRule {
    pub rid: u32,
    pub src_ip_lo: u32,
    pub src_ip_hi: u32,
    pub src_prefix_len: u8,
    pub dst_ip_lo: u32,
    pub dst_ip_hi: u32,
    pub dst_prefix_len: u8,
    pub src_port_lo: u16,
    pub src_port_hi: u16,
    pub dst_port_lo: u16,
    pub dst_port_hi: u16,
    pub proto: u8,
    pub proto_mask: u8,
    pub priority: u32,
    pub action: String,
}

/// Parser for the classbench-style filter format:
///
/// ```text
/// @SIP/PLEN  DIP/PLEN  SPLO : SPHI  DPLO : DPHI  0xPP/0xMM  ACTION
/// ```
///
/// Blank lines and `#` comment lines are skipped.
#[derive(Default)]
pub struct DefaultRuleLoader {}

impl RuleLoader for DefaultRuleLoader {
    fn _load<'x, E: ParseError<&'x str>>(
        &self,
        content: &'x str,
    ) -> IResult<(), Vec<AclRule>, E> {
        let mut rules = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (_, mut rule) = all_consuming(parse_rule::<E>)(line)?;
            rule.rid = rules.len() as u32;
            rule.priority = rules.len() as u32;
            rules.push(rule);
        }
        Ok(((), rules))
    }
}

fn parse_port_range<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, (u16, u16), E> {
    separated_pair(
        parse_u16,
        tuple((multispace0, char(':'), multispace0)),
        parse_u16,
    )(input)
}

fn parse_rule<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, AclRule, E> {
    let (rest, (src, _, dst, _, sport, _, dport, _, (proto, proto_mask), _, action)) =
        tuple((
            preceded(char('@'), parse_ipv4_prefix),
            multispace1,
            parse_ipv4_prefix,
            multispace1,
            parse_port_range,
            multispace1,
            parse_port_range,
            multispace1,
            separated_pair(parse_hex_byte, char('/'), parse_hex_byte),
            multispace1,
            parse_token,
        ))(input)?;
    Ok((
        rest,
        AclRule {
            rid: 0,
            src_ip_lo: src.0,
            src_ip_hi: src.1,
            src_prefix_len: src.2,
            dst_ip_lo: dst.0,
            dst_ip_hi: dst.1,
            dst_prefix_len: dst.2,
            src_port_lo: sport.0,
            src_port_hi: sport.1,
            dst_port_lo: dport.0,
            dst_port_hi: dport.1,
            proto,
            proto_mask,
            priority: 0,
            action,
        },
    ))
}

/// Project parsed rules onto the IP table and the port table. Both
/// projections keep the rule's id, priority and (for ports) action.
pub fn split_rules(rules: &[AclRule]) -> (Vec<IpRule>, Vec<PortRule>) {
    let mut ip_table = Vec::with_capacity(rules.len());
    let mut port_table = Vec::with_capacity(rules.len());
    for r in rules {
        ip_table.push(IpRule {
            rid: r.rid,
            src_ip_lo: r.src_ip_lo,
            src_ip_hi: r.src_ip_hi,
            dst_ip_lo: r.dst_ip_lo,
            dst_ip_hi: r.dst_ip_hi,
            src_prefix_len: r.src_prefix_len,
            dst_prefix_len: r.dst_prefix_len,
            proto: r.proto,
            priority: r.priority,
        });
        port_table.push(PortRule {
            rid: r.rid,
            src_port_lo: r.src_port_lo,
            src_port_hi: r.src_port_hi,
            dst_port_lo: r.dst_port_lo,
            dst_port_hi: r.dst_port_hi,
            priority: r.priority,
            action: r.action.clone(),
        });
    }
    (ip_table, port_table)
}

/// Write the assembled TCAM table.
///
/// Entries are grouped under their priority-matching IP rule, in emission
/// order. Returns the number of emitted lines.
pub fn write_tcam_table<W: Write>(
    out: &mut W,
    ip_table: &[IpRule],
    entries: &[TcamEntry],
) -> io::Result<usize> {
    writeln!(out, "# terncode TCAM rules")?;
    writeln!(out, "# format: SRC_IP DST_IP SRC_PORT DST_PORT PROTOCOL ACTION")?;
    writeln!(out, "#")?;
    let mut by_priority: IndexMap<u32, Vec<&TcamEntry>> = IndexMap::new();
    for entry in entries {
        by_priority.entry(entry.priority).or_default().push(entry);
    }
    let mut emitted = 0;
    for ip_rule in ip_table {
        for entry in by_priority.get(&ip_rule.priority).into_iter().flatten() {
            writeln!(
                out,
                "{} {} {} {} 0x{:02x} {}",
                Ipv4Addr::from(ip_rule.src_ip_lo),
                Ipv4Addr::from(ip_rule.dst_ip_lo),
                entry.src_pattern,
                entry.dst_pattern,
                ip_rule.proto,
                entry.action,
            )?;
            emitted += 1;
        }
    }
    writeln!(out)?;
    writeln!(out, "# total entries: {emitted}")?;
    Ok(emitted)
}
