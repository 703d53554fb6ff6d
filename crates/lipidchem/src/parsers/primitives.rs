use nom::{
    branch::alt,
    character::complete::{char, digit1, satisfy, u32},
    combinator::{cut, not, value},
    sequence::{preceded, terminated},
};

use super::errors::{expect, ParseErrorKind, ParseResult};

/// uppercase
///   = "A" | "B" | "C" | "D" | "E" | "F" | "G"
///   | "H" | "I" | "J" | "K" | "L" | "M" | "N"
///   | "O" | "P" | "Q" | "R" | "S" | "T" | "U"
///   | "V" | "W" | "X" | "Y" | "Z"
///   ;
pub fn uppercase(i: &str) -> ParseResult<char> {
    let parser = satisfy(|c| c.is_ascii_uppercase());
    expect(parser, ParseErrorKind::ExpectedUppercase)(i)
}

/// lowercase
///   = "a" | "b" | "c" | "d" | "e" | "f" | "g"
///   | "h" | "i" | "j" | "k" | "l" | "m" | "n"
///   | "o" | "p" | "q" | "r" | "s" | "t" | "u"
///   | "v" | "w" | "x" | "y" | "z"
///   ;
pub fn lowercase(i: &str) -> ParseResult<char> {
    let parser = satisfy(|c| c.is_ascii_lowercase());
    expect(parser, ParseErrorKind::ExpectedLowercase)(i)
}

/// Count = digit - "0" , { digit } ;
pub fn count(i: &str) -> ParseResult<u32> {
    let not_zero = cut(expect(
        not(char('0')),
        ParseErrorKind::ExpectedNoLeadingZero,
    ));
    let digits = expect(u32, ParseErrorKind::ExpectedDigit);
    preceded(not_zero, digits)(i)
}

/// Number = "0" | Count ;
pub fn number(i: &str) -> ParseResult<u32> {
    let zero = value(0, terminated(char('0'), not(digit1)));
    alt((zero, count))(i)
}
