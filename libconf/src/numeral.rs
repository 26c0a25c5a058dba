//! Numeral systems and number literal scanning.
//!
//! A number literal is the maximal run of [`is_literal_char`] characters
//! starting at a value position. [`is_float_literal`] decides which scanner
//! applies; scanners report errors as a category kind plus the character
//! offset into the literal, which the parser turns into a location.

use std::fmt;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::error::{FloatError, IntegerError};
use crate::value::Integer;

/// Scanner result: the error kind and its character offset in the literal.
pub(crate) type Scan<T, E> = std::result::Result<T, (E, usize)>;

/// Radix, prefix and digit alphabet of an integer literal.
///
/// Integers remember the system they were written in so serialization can
/// reproduce the same radix and prefix.
pub struct NumeralSystem {
    pub name: &'static str,
    pub radix: u32,
    /// Prefix letter after the leading `0`, `None` for decimal.
    pub prefix: Option<char>,
    pub alt_prefix: Option<char>,
    /// Digits in value order, lowercase.
    pub digits: &'static str,
    is_digit: fn(char) -> bool,
}

pub static BINARY: NumeralSystem = NumeralSystem {
    name: "binary",
    radix: 2,
    prefix: Some('b'),
    alt_prefix: Some('B'),
    digits: "01",
    is_digit: is_binary_digit,
};

pub static OCTAL: NumeralSystem = NumeralSystem {
    name: "octal",
    radix: 8,
    prefix: Some('o'),
    alt_prefix: Some('O'),
    digits: "01234567",
    is_digit: is_octal_digit,
};

pub static DECIMAL: NumeralSystem = NumeralSystem {
    name: "decimal",
    radix: 10,
    prefix: None,
    alt_prefix: None,
    digits: "0123456789",
    is_digit: is_decimal_digit,
};

pub static HEXADECIMAL: NumeralSystem = NumeralSystem {
    name: "hexadecimal",
    radix: 16,
    prefix: Some('x'),
    alt_prefix: Some('X'),
    digits: "0123456789abcdef",
    is_digit: is_hex_digit,
};

fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}

fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

impl NumeralSystem {
    pub fn is_digit(&self, c: char) -> bool {
        (self.is_digit)(c)
    }

    /// The system named by a prefix letter, in either case.
    pub fn from_prefix(letter: char) -> Option<&'static NumeralSystem> {
        [&BINARY, &OCTAL, &HEXADECIMAL]
            .into_iter()
            .find(|system| system.prefix == Some(letter) || system.alt_prefix == Some(letter))
    }

    pub fn from_radix(radix: u32) -> Option<&'static NumeralSystem> {
        match radix {
            2 => Some(&BINARY),
            8 => Some(&OCTAL),
            10 => Some(&DECIMAL),
            16 => Some(&HEXADECIMAL),
            _ => None,
        }
    }

    /// Render `value` in this system, sign first, then prefix, then digits.
    pub fn format(&self, value: i64, uppercase: bool) -> String {
        let magnitude = value.unsigned_abs();
        let digits = match (self.radix, uppercase) {
            (2, _) => format!("{:b}", magnitude),
            (8, _) => format!("{:o}", magnitude),
            (16, false) => format!("{:x}", magnitude),
            (16, true) => format!("{:X}", magnitude),
            _ => magnitude.to_string(),
        };
        let prefix = if uppercase {
            self.alt_prefix
        } else {
            self.prefix
        };
        let sign = if value < 0 { "-" } else { "" };
        match prefix {
            Some(letter) => format!("{}0{}{}", sign, letter, digits),
            None => format!("{}{}", sign, digits),
        }
    }
}

impl PartialEq for NumeralSystem {
    fn eq(&self, other: &Self) -> bool {
        self.radix == other.radix
    }
}

impl Eq for NumeralSystem {}

impl fmt::Debug for NumeralSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Literal Classification
// ============================================================================

/// Characters that may appear in a number literal.
pub(crate) fn is_literal_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')
}

/// Characters that, after a gap, would continue a number literal.
pub(crate) fn continues_literal(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '_' | '.')
}

pub(crate) fn is_special_float(text: &str) -> bool {
    matches!(text, "inf" | "+inf" | "-inf" | "nan")
}

/// Floats are the special spellings, or unprefixed literals containing a
/// decimal point or an exponent marker.
pub(crate) fn is_float_literal(text: &str) -> bool {
    if is_special_float(text) {
        return true;
    }
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut chars = unsigned.chars();
    if let (Some('0'), Some(letter)) = (chars.next(), chars.next()) {
        if letter.is_ascii_alphabetic() && !matches!(letter, 'e' | 'E') {
            return false;
        }
    }
    unsigned.contains(['.', 'e', 'E'])
}

// ============================================================================
// Integer Scanning
// ============================================================================

/// Scan an integer literal: optional sign, optional `0` + prefix letter, then
/// digits of that system with `_` allowed between two digits.
pub(crate) fn scan_integer(text: &str) -> Scan<Integer, IntegerError> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    let negative = match chars.first() {
        Some('-') => {
            i = 1;
            true
        }
        Some('+') => {
            i = 1;
            false
        }
        _ => false,
    };

    let system = match (chars.get(i), chars.get(i + 1)) {
        (Some('0'), Some(&letter)) if letter.is_ascii_alphabetic() => {
            let system = NumeralSystem::from_prefix(letter)
                .ok_or((IntegerError::UnknownPrefix(letter), i + 1))?;
            i += 2;
            system
        }
        _ => &DECIMAL,
    };

    let mut digits = String::with_capacity(chars.len());
    let mut prev_digit = false;
    while i < chars.len() {
        let c = chars[i];
        if system.is_digit(c) {
            digits.push(c);
            prev_digit = true;
        } else if c == '_' {
            let next_digit = chars.get(i + 1).map_or(false, |&n| system.is_digit(n));
            if !prev_digit || !next_digit {
                return Err((IntegerError::MisplacedSeparator, i));
            }
            prev_digit = false;
        } else if c == '+' || c == '-' {
            return Err((IntegerError::MisplacedSign, i));
        } else if NumeralSystem::from_prefix(c).is_some() {
            return Err((IntegerError::MisplacedPrefix, i));
        } else {
            return Err((IntegerError::InvalidCharacter(c), i));
        }
        i += 1;
    }

    if digits.is_empty() {
        return Err((IntegerError::MissingDigits, i));
    }

    let mut magnitude = BigInt::parse_bytes(digits.as_bytes(), system.radix)
        .ok_or((IntegerError::MissingDigits, 0))?;
    if negative {
        magnitude = -magnitude;
    }
    let value = magnitude.to_i64().ok_or((IntegerError::TooLarge, 0))?;

    Ok(Integer::new(value, system))
}

// ============================================================================
// Float Scanning
// ============================================================================

/// Scan a float literal: optional sign, digits with `_` separators, an
/// optional `.` with digits on both sides, an optional exponent; or one of
/// `inf`, `+inf`, `-inf`, `nan`.
pub(crate) fn scan_float(text: &str) -> Scan<f64, FloatError> {
    match text {
        "inf" | "+inf" => return Ok(f64::INFINITY),
        "-inf" => return Ok(f64::NEG_INFINITY),
        "nan" => return Ok(f64::NAN),
        _ => {}
    }

    let chars: Vec<char> = text.chars().collect();
    let mut cleaned = String::with_capacity(chars.len());
    let mut i = 0;
    if let Some(&sign @ ('+' | '-')) = chars.first() {
        cleaned.push(sign);
        i = 1;
    }

    let is_digit_at = |j: usize| chars.get(j).map_or(false, |c| c.is_ascii_digit());
    let mut seen_point = false;
    let mut seen_exponent = false;
    let mut mantissa_digits = false;

    while i < chars.len() {
        let c = chars[i];
        let prev_digit = i > 0 && is_digit_at(i - 1);
        match c {
            '0'..='9' => {
                if !seen_exponent {
                    mantissa_digits = true;
                }
                cleaned.push(c);
            }
            '_' => {
                if !prev_digit || !is_digit_at(i + 1) {
                    return Err((FloatError::MisplacedSeparator, i));
                }
            }
            '.' => {
                if seen_exponent {
                    return Err((FloatError::DecimalPointInExponent, i));
                }
                if seen_point {
                    return Err((FloatError::MultipleDecimalPoints, i));
                }
                if !prev_digit || !is_digit_at(i + 1) {
                    return Err((FloatError::BareDecimalPoint, i));
                }
                seen_point = true;
                cleaned.push('.');
            }
            'e' | 'E' => {
                if seen_exponent {
                    return Err((FloatError::MultipleExponents, i));
                }
                if !prev_digit {
                    return Err((FloatError::MissingDigits, i));
                }
                seen_exponent = true;
                cleaned.push('e');
                if let Some(&sign @ ('+' | '-')) = chars.get(i + 1) {
                    cleaned.push(sign);
                    i += 1;
                }
                if !is_digit_at(i + 1) {
                    return Err((FloatError::MissingExponentDigits, i + 1));
                }
            }
            '+' | '-' => return Err((FloatError::MisplacedSign, i)),
            _ => return Err((FloatError::InvalidCharacter(c), i)),
        }
        i += 1;
    }

    if !mantissa_digits {
        return Err((FloatError::MissingDigits, 0));
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| (FloatError::MissingDigits, 0))?;
    if value.is_infinite() {
        return Err((FloatError::OutOfRange, 0));
    }
    Ok(value)
}
