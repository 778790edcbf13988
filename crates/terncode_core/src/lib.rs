//! This crate provides the range encoders that turn integer port ranges into
//! ternary TCAM patterns, and the entry assembler that combines them into
//! installable rules.
pub mod encode;
pub mod rule;

// these are compile-run parameters
pub use crate::encode::PORT_BITS;

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        encode::{
            cgfe, dedup_patterns, dirpe, encode_cgfe, encode_dirpe, encode_srge, prefix, srge,
            ChunkConfig, Sym, Ternary, PORT_BITS,
        },
        rule::{expand_rule, expand_rules, IpRule, PortEncoder, PortRule, TcamEntry},
    };
}
