// External Crate Imports
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{cut, map, opt, value},
    sequence::{delimited, preceded, tuple},
};

// Local Crate Imports
use super::{
    element_vector::element_vector,
    errors::{expect, map_res, ParseErrorKind, ParseResult},
    primitives::number,
};
use crate::{ChainClass, ElementVector, FattyAcid, Result};

// Public API ==========================================================================================================

/// Fatty Acid = Chain Numbers , [ Chain Class ] , [ Heavy Label ] ;
pub fn fatty_acid(i: &str) -> ParseResult<FattyAcid> {
    let parser = tuple((chain_numbers, opt(chain_class), opt(heavy_label)));
    map_res(
        parser,
        |((length, double_bonds, hydroxyl_count), class, label)| -> Result<_> {
            let chain = FattyAcid::new(
                length,
                double_bonds,
                hydroxyl_count,
                class.unwrap_or_default(),
            )?;
            match label {
                Some(heavy) => chain.label(&heavy),
                None => Ok(chain),
            }
        },
    )(i)
}

/// Long Chain Base = Chain Numbers , [ Heavy Label ] ;
pub fn long_chain_base(i: &str) -> ParseResult<FattyAcid> {
    let parser = tuple((chain_numbers, opt(heavy_label)));
    map_res(
        parser,
        |((length, double_bonds, hydroxyl_count), label)| -> Result<_> {
            let chain = FattyAcid::long_chain_base(length, double_bonds, hydroxyl_count)?;
            match label {
                Some(heavy) => chain.label(&heavy),
                None => Ok(chain),
            }
        },
    )(i)
}

/// Chain Class = "p" | "a" | "x" ;
pub fn chain_class(i: &str) -> ParseResult<ChainClass> {
    let parser = alt((
        value(ChainClass::Ether, char('p')),
        value(ChainClass::AlphaHydroxy, char('a')),
        value(ChainClass::Excluded, char('x')),
    ));
    expect(parser, ParseErrorKind::ExpectedChainClass)(i)
}

// Private Sub-Parsers =================================================================================================

/// Chain Numbers = Number , ":" , Number , [ ";" , Number ] ;
fn chain_numbers(i: &str) -> ParseResult<(u32, u32, u32)> {
    let colon = cut(expect(char(':'), ParseErrorKind::ExpectedColon));
    let hydroxyls = opt(preceded(char(';'), cut(number)));
    map(
        tuple((number, colon, cut(number), hydroxyls)),
        |(length, _, double_bonds, hydroxyl_count)| {
            (length, double_bonds, hydroxyl_count.unwrap_or_default())
        },
    )(i)
}

/// Heavy Label = "{" , Element Vector , "}" ;
fn heavy_label(i: &str) -> ParseResult<ElementVector> {
    let closing_bracket = cut(expect(char('}'), ParseErrorKind::ExpectedLabelEnd));
    delimited(char('{'), element_vector, closing_bracket)(i)
}

// Module Tests ========================================================================================================
