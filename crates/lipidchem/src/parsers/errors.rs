use std::{fmt, iter};

// External Crate Imports
use miette::{Diagnostic, LabeledSpan, SourceSpan};
use nom::{
    combinator::{all_consuming, complete, consumed},
    error::{ErrorKind, ParseError as NomParseError},
    Err, Finish, IResult, Offset, Parser,
};
use thiserror::Error;

// Local Crate Imports
use crate::errors::LipidError;

pub type ParseResult<'a, O> = IResult<&'a str, O, ParseFailure<'a>>;

// Public API ==========================================================================================================

/// A parse error that owns its input, so it can outlive the string that was parsed
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("{kind}")]
pub struct ParseError {
    input: String,
    span: SourceSpan,
    kind: ParseErrorKind,
}

impl ParseError {
    #[must_use]
    pub const fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

// NOTE: Manually implemented since the label depends on which `kind` of error this is
impl Diagnostic for ParseError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.input)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.kind.label()?;
        Some(Box::new(iter::once(LabeledSpan::new_with_span(
            Some(label.to_owned()),
            self.span,
        ))))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum ParseErrorKind {
    #[diagnostic(help(
        "a 0 value doesn't make sense here, if you've mistakenly included a leading zero, like \
        H02, try just H2 instead"
    ))]
    #[error("counts cannot start with 0")]
    ExpectedNoLeadingZero,

    #[error("expected an ASCII digit 1-9")]
    ExpectedDigit,

    #[error("expected an uppercase ASCII letter")]
    ExpectedUppercase,

    #[error("expected a lowercase ASCII letter")]
    ExpectedLowercase,

    #[error("expected an isotopic mass number")]
    ExpectedMassNumber,

    #[diagnostic(help("you've probably forgotten to close an earlier '[' bracket"))]
    #[error("expected ']' to close isotope brackets")]
    ExpectedIsotopeEnd,

    #[diagnostic(help("lipid compositions are built from C, H, N, O, P, S, and Na"))]
    #[error("the element {0:?} is not supported")]
    UnknownElement(String),

    #[diagnostic(help("heavy labels may use [13C], [2H], [15N], or [18O]"))]
    #[error("the isotope [{0}{1}] is not supported")]
    UnknownIsotope(u32, String),

    #[error("the count {0} is too large to be stored")]
    CountTooLarge(u32),

    #[error("expected ':' between the number of carbons and the number of double bonds")]
    ExpectedColon,

    #[error("expected a chain class marker: 'p' (ether), 'a' (alpha-hydroxy), or 'x' (excluded)")]
    ExpectedChainClass,

    #[diagnostic(help("you've probably forgotten to close an earlier '{{' bracket"))]
    #[error("expected '}}' to close the heavy-isotope label")]
    ExpectedLabelEnd,

    #[error("expected a number or a range of numbers, like 16 or 14-18")]
    ExpectedRange,

    #[diagnostic(help("ranges are written from smallest to largest, like 14-18"))]
    #[error("the range {0}-{1} doesn't contain any numbers")]
    EmptyRange(u32, u32),

    #[diagnostic(transparent)]
    #[error(transparent)]
    Invalid(Box<LipidError>),

    #[diagnostic(help(
        "this is an internal error that you shouldn't ever see! If you have gotten this error, \
        then please report it as a bug!"
    ))]
    #[error("internal `nom` error: {0:?}")]
    NomError(ErrorKind),

    #[diagnostic(help("check the unparsed region for errors, or remove it from the rest of the input"))]
    #[error("could not interpret the full input")]
    Incomplete,
}

impl ParseErrorKind {
    fn label(&self) -> Option<&'static str> {
        Some(match self {
            Self::ExpectedUppercase => "expected uppercase",
            Self::ExpectedLowercase => "expected lowercase",
            Self::ExpectedDigit => "expected digit",
            Self::ExpectedNoLeadingZero => "expected non-zero",
            Self::ExpectedMassNumber => "expected a mass number",
            Self::ExpectedIsotopeEnd => "expected ']'",
            Self::UnknownElement(_) => "element not found",
            Self::UnknownIsotope(..) => "isotope not found",
            Self::CountTooLarge(_) => "count too large",
            Self::ExpectedColon => "expected ':'",
            Self::ExpectedChainClass => "expected 'p', 'a', or 'x'",
            Self::ExpectedLabelEnd => "expected '}'",
            Self::ExpectedRange => "expected a range",
            Self::EmptyRange(..) => "empty range",
            Self::Invalid(_) => "invalid value",
            Self::Incomplete => "input was valid up until this point",
            Self::NomError(_) => "the region that triggered this bug!",
            _ => return None,
        })
    }
}

impl From<ErrorKind> for ParseErrorKind {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::Eof => Self::Incomplete,
            kind => Self::NomError(kind),
        }
    }
}

impl From<Box<LipidError>> for ParseErrorKind {
    fn from(value: Box<LipidError>) -> Self {
        Self::Invalid(value)
    }
}

// Intermediate Parser Errors ==========================================================================================

/// The error threaded through parsers, borrowing a slice of the input that starts where the error occurred
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseFailure<'a> {
    input: &'a str,
    length: usize,
    kind: ParseErrorKind,
}

impl<'a> ParseFailure<'a> {
    fn new(input: &'a str, kind: ParseErrorKind) -> Self {
        Self {
            input,
            length: 0,
            kind,
        }
    }

    fn into_final_error(self, full_input: &str) -> ParseError {
        let start = full_input.offset(self.input);
        // NOTE: The additional space is added so that labels can point to the end of an input
        let input = format!("{full_input} ");
        ParseError {
            input,
            span: SourceSpan::from(start..start + self.length),
            kind: self.kind,
        }
    }
}

impl<'a> NomParseError<&'a str> for ParseFailure<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self::new(input, kind.into())
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

// Parser Combinators ==================================================================================================

/// Runs `parser` over the whole of `input`, failing if anything is left unparsed
pub fn final_parser<'a, O, P>(parser: P) -> impl FnMut(&'a str) -> Result<O, ParseError>
where
    P: Parser<&'a str, O, ParseFailure<'a>>,
{
    let mut parser = all_consuming(complete(parser));
    move |input| {
        parser(input)
            .finish()
            .map(|(_, output)| output)
            .map_err(|e| e.into_final_error(input))
    }
}

/// Replaces any recoverable error from `parser` with `kind`, leaving failures from a `cut` untouched
pub fn expect<'a, O, P>(
    mut parser: P,
    kind: ParseErrorKind,
) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    P: Parser<&'a str, O, ParseFailure<'a>>,
{
    move |i| match parser.parse(i) {
        Err(Err::Error(_)) => Err(Err::Error(ParseFailure::new(i, kind.clone()))),
        result => result,
    }
}

/// Validates the output of `parser` with `f`; a rejected value is a failure spanning everything `parser` consumed
pub fn map_res<'a, O1, O2, E, P, F>(
    parser: P,
    mut f: F,
) -> impl FnMut(&'a str) -> ParseResult<'a, O2>
where
    P: Parser<&'a str, O1, ParseFailure<'a>>,
    F: FnMut(O1) -> Result<O2, E>,
    E: Into<ParseErrorKind>,
{
    let mut parser = consumed(parser);
    move |i| {
        let (rest, (consumed, output)) = parser(i)?;
        match f(output) {
            Ok(output) => Ok((rest, output)),
            Err(e) => Err(Err::Failure(ParseFailure {
                input: i,
                length: consumed.len(),
                kind: e.into(),
            })),
        }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use nom::character::complete::{alpha1, char, digit1};

    use super::*;

    #[test]
    fn final_errors_are_spanned() {
        let mut parser = final_parser(digit1);
        assert_eq!(parser("42"), Ok("42"));

        let error = parser("42abc").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::Incomplete);
        assert_eq!(error.span(), SourceSpan::from(2..2));
        assert_eq!(error.to_string(), "could not interpret the full input");
    }

    #[test]
    fn expect_replaces_recoverable_errors() {
        let mut parser = expect(char('['), ParseErrorKind::ExpectedIsotopeEnd);
        assert_eq!(parser("[13C]"), Ok(("13C]", '[')));
        assert_eq!(
            parser("13C]"),
            Err(Err::Error(ParseFailure::new(
                "13C]",
                ParseErrorKind::ExpectedIsotopeEnd
            )))
        );
    }

    #[test]
    fn map_res_spans_consumed_input() {
        let parser = map_res(alpha1, |s: &str| {
            if s == "Na" {
                Ok(s.to_owned())
            } else {
                Err(ParseErrorKind::UnknownElement(s.to_owned()))
            }
        });
        let error = final_parser(parser)("Xyz").unwrap_err();
        assert_eq!(error.span(), SourceSpan::from(0..3));
        assert_eq!(
            error.kind(),
            &ParseErrorKind::UnknownElement("Xyz".to_owned())
        );
        let labels: Vec<_> = error.labels().unwrap().collect();
        assert_eq!(labels[0].label(), Some("element not found"));
    }
}
