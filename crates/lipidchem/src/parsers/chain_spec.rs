use std::ops::RangeInclusive;

// External Crate Imports
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{cut, opt, value},
    multi::{many1, separated_list1},
    sequence::{pair, preceded, tuple},
};

// Local Crate Imports
use super::{
    errors::{expect, map_res, ParseErrorKind, ParseResult},
    fatty_acid::chain_class,
    primitives::number,
};
use crate::{ChainClass, ChainSpec};

// Public API ==========================================================================================================

/// Chain Spec = Range List , ":" , Range List , [ ";" , Range List ] , [ Class Set ] ;
pub fn chain_spec(i: &str) -> ParseResult<ChainSpec> {
    let colon = cut(expect(char(':'), ParseErrorKind::ExpectedColon));
    let hydroxyls = opt(preceded(char(';'), cut(range_list)));
    let parser = tuple((range_list, colon, cut(range_list), hydroxyls, opt(class_set)));
    map_res(
        parser,
        |(lengths, _, double_bonds, hydroxyls, classes)| {
            let hydroxyls = hydroxyls.unwrap_or_else(|| vec![0..=0]);
            let classes = classes.unwrap_or_else(|| vec![ChainClass::Plain]);
            ChainSpec::new(lengths, double_bonds, hydroxyls, classes)
        },
    )(i)
}

// Private Sub-Parsers =================================================================================================

/// Range List = Range , { "," , Range } ;
fn range_list(i: &str) -> ParseResult<Vec<RangeInclusive<u32>>> {
    let parser = separated_list1(char(','), range);
    expect(parser, ParseErrorKind::ExpectedRange)(i)
}

/// Range = Number , [ "-" , Number ] ;
fn range(i: &str) -> ParseResult<RangeInclusive<u32>> {
    let parser = pair(number, opt(preceded(char('-'), cut(number))));
    map_res(parser, |(start, end)| {
        let end = end.unwrap_or(start);
        if start <= end {
            Ok(start..=end)
        } else {
            Err(ParseErrorKind::EmptyRange(start, end))
        }
    })(i)
}

/// Class Set = { "." | Chain Class }- ;
fn class_set(i: &str) -> ParseResult<Vec<ChainClass>> {
    many1(alt((value(ChainClass::Plain, char('.')), chain_class)))(i)
}

// Module Tests ========================================================================================================
