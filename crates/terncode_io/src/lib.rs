//! This module provides parsing of classification rule files (classbench
//! style `@`-prefixed five-tuple filters), splitting of parsed rules into
//! their IP and port projections, and the text formatter for assembled TCAM
//! tables.
mod default;

use nom::{
    error::{Error, ParseError},
    {Finish, IResult},
};

pub use default::{split_rules, write_tcam_table, AclRule, DefaultRuleLoader};

/// RuleLoader parses rule-file content into [AclRule] records.
///
/// ***The trait and the format are dataset-specific.***
pub trait RuleLoader {
    // Required method
    fn _load<'x, E: ParseError<&'x str>>(&self, content: &'x str)
        -> IResult<(), Vec<AclRule>, E>;

    // Provided method
    fn load<'x>(&self, content: &'x str) -> Result<Vec<AclRule>, Error<&'x str>> {
        let res = self._load(content).finish();
        match res {
            Ok((_, rules)) => Ok(rules),
            Err(e) => Err(e),
        }
    }
}

/// Basics for io
pub mod basic {
    /// Basic helper functions for parsing
    pub mod parser {
        use nom::bytes::complete::{tag, take_while1, take_while_m_n};
        use nom::character::complete::{char, digit1};
        use nom::combinator::map;
        use nom::error::{ErrorKind, ParseError};
        use nom::sequence::{preceded, separated_pair, tuple};
        use nom::Err::Error;
        use nom::IResult;

        /// r"[0-9]+"
        pub fn parse_digits<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, &'a str, E> {
            digit1(input)
        }

        pub fn parse_u8<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, u8, E> {
            let (rest, num) = digit1(input)?;
            if let Ok(num) = num.parse::<u8>() {
                Ok((rest, num))
            } else {
                Err(Error(E::from_error_kind(input, ErrorKind::Digit)))
            }
        }

        pub fn parse_u16<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, u16, E> {
            let (rest, num) = digit1(input)?;
            if let Ok(num) = num.parse::<u16>() {
                Ok((rest, num))
            } else {
                Err(Error(E::from_error_kind(input, ErrorKind::Digit)))
            }
        }

        /// r"[<=255].[<=255].[<=255].[<=255]"
        pub fn parse_ipv4_dotted<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, u32, E> {
            let (rest, (o1, _, o2, _, o3, _, o4)) = tuple((
                parse_u8,
                char('.'),
                parse_u8,
                char('.'),
                parse_u8,
                char('.'),
                parse_u8,
            ))(input)?;
            Ok((
                rest,
                (o1 as u32) << 24 | (o2 as u32) << 16 | (o3 as u32) << 8 | o4 as u32,
            ))
        }

        /// r"<ipv4>/[<=32]", expanded to the covered address interval
        pub fn parse_ipv4_prefix<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, (u32, u32, u8), E> {
            let (rest, (ip, plen)) =
                separated_pair(parse_ipv4_dotted, char('/'), parse_u8)(input)?;
            if plen > 32 {
                return Err(Error(E::from_error_kind(input, ErrorKind::Verify)));
            }
            let mask = if plen == 0 { 0 } else { !0u32 << (32 - plen) };
            Ok((rest, (ip & mask, ip | !mask, plen)))
        }

        /// r"0x[0-9a-fA-F]{1,2}"
        pub fn parse_hex_byte<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, u8, E> {
            let (rest, digits) = preceded(
                tag("0x"),
                take_while_m_n(1, 2, |c: char| c.is_ascii_hexdigit()),
            )(input)?;
            match u8::from_str_radix(digits, 16) {
                Ok(v) => Ok((rest, v)),
                Err(_) => Err(Error(E::from_error_kind(input, ErrorKind::HexDigit))),
            }
        }

        /// An opaque non-whitespace token, e.g. a `"0xHHHH/0xHHHH"` action.
        pub fn parse_token<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, String, E> {
            map(take_while1(|c: char| !c.is_whitespace()), str::to_owned)(input)
        }
    }
}

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{split_rules, write_tcam_table, AclRule, DefaultRuleLoader, RuleLoader};
}
