// External Crate Imports
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{cut, opt, recognize},
    multi::many0,
    sequence::{delimited, pair},
};

// Local Crate Imports
use super::{
    errors::{expect, map_res, ParseErrorKind, ParseResult},
    primitives::{count, lowercase, uppercase},
};
use crate::{Element, ElementVector};

// Public API ==========================================================================================================

/// Element Vector = { Atomic Offset } ;
pub fn element_vector(i: &str) -> ParseResult<ElementVector> {
    map_res(many0(atomic_offset), |offsets| {
        offsets
            .into_iter()
            .try_fold(ElementVector::new(), |vector, (element, count)| {
                vector
                    .checked_add_count(element, count)
                    .ok_or(ParseErrorKind::CountTooLarge(count.unsigned_abs()))
            })
    })(i)
}

// Private Sub-Parsers =================================================================================================

/// Atomic Offset = ( Element | Isotope ) , [ Count ] ;
fn atomic_offset(i: &str) -> ParseResult<(Element, i32)> {
    let element_or_isotope = alt((element, isotope));
    let optional_count = map_res(opt(count), |count| {
        let count = count.unwrap_or(1);
        i32::try_from(count).map_err(|_| ParseErrorKind::CountTooLarge(count))
    });
    pair(element_or_isotope, optional_count)(i)
}

/// Element = uppercase , [ lowercase ] ;
fn element(i: &str) -> ParseResult<Element> {
    map_res(element_symbol, |symbol| {
        Element::from_symbol(symbol).ok_or_else(|| ParseErrorKind::UnknownElement(symbol.to_owned()))
    })(i)
}

// NOTE: These are not meant to be links, it's just EBNF
#[allow(clippy::doc_link_with_quotes)]
/// Isotope = "[" , Count , Element , "]" ;
fn isotope(i: &str) -> ParseResult<Element> {
    let mass_number = expect(count, ParseErrorKind::ExpectedMassNumber);
    let closing_bracket = cut(expect(char(']'), ParseErrorKind::ExpectedIsotopeEnd));
    let isotope_expr = delimited(
        char('['),
        cut(pair(mass_number, element_symbol)),
        closing_bracket,
    );
    map_res(isotope_expr, |(mass_number, symbol)| {
        Element::from_isotope(mass_number, symbol)
            .ok_or_else(|| ParseErrorKind::UnknownIsotope(mass_number, symbol.to_owned()))
    })(i)
}

// ---------------------------------------------------------------------------------------------------------------------

/// Element = uppercase , [ lowercase ] ;
fn element_symbol(i: &str) -> ParseResult<&str> {
    recognize(pair(uppercase, opt(lowercase)))(i)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use miette::SourceSpan;

    use super::*;
    use crate::parsers::errors::final_parser;

    #[test]
    fn test_element_vector() {
        let (rest, vector) = element_vector("C16H31O1").unwrap();
        assert_eq!(rest, "");
        assert_eq!(vector.to_string(), "C16H31O1");
        // Repeated elements are summed
        let (_, vector) = element_vector("CH3CH2OH").unwrap();
        assert_eq!(vector.to_string(), "C2H6O1");
        // Stops at the first thing that isn't an element
        let (rest, vector) = element_vector("[2H]8}").unwrap();
        assert_eq!(rest, "}");
        assert_eq!(vector.get(Element::H2), 8);
        // The empty composition
        assert_eq!(element_vector(""), Ok(("", ElementVector::new())));
    }

    #[test]
    fn test_atomic_offset() {
        assert_eq!(atomic_offset("Na"), Ok(("", (Element::Na, 1))));
        assert_eq!(atomic_offset("H2O"), Ok(("O", (Element::H, 2))));
        assert_eq!(atomic_offset("[13C]20"), Ok(("", (Element::C13, 20))));
        assert_eq!(atomic_offset("[16O]"), Ok(("", (Element::O, 1))));
        assert!(atomic_offset("C0").is_err());
        assert!(atomic_offset("C4294967295").is_err());
        assert!(atomic_offset("2H").is_err());
        assert!(atomic_offset("h").is_err());
    }

    #[test]
    fn test_isotope() {
        assert_eq!(isotope("[2H]"), Ok(("", Element::H2)));
        assert_eq!(isotope("[15N]H"), Ok(("H", Element::N15)));
        assert!(isotope("2H").is_err());
        assert!(isotope("[2H").is_err());
        assert!(isotope("[H]").is_err());
        assert!(isotope("[02H]").is_err());
        assert!(isotope("[3H]").is_err());
    }

    #[test]
    fn errors_point_at_the_problem() {
        let mut parser = final_parser(element_vector);

        let error = parser("C20H32Au").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::UnknownElement("Au".to_owned())
        );
        assert_eq!(error.span(), SourceSpan::from(6..8));

        let error = parser("C20[14C]").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::UnknownIsotope(14, "C".to_owned())
        );
        assert_eq!(error.span(), SourceSpan::from(3..8));

        let error = parser("C20[13C").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::ExpectedIsotopeEnd);
        assert_eq!(error.span(), SourceSpan::from(7..7));

        let error = parser("C2 H6").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::Incomplete);
        assert_eq!(error.span(), SourceSpan::from(2..2));

        let error = parser("H02").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::ExpectedNoLeadingZero);
        assert_eq!(error.span(), SourceSpan::from(1..1));

        // Each count fits, but their sum doesn't
        let error = parser("C2000000000C2000000000").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::CountTooLarge(2_000_000_000));
        assert_eq!(error.span(), SourceSpan::from(0..22));
    }
}
