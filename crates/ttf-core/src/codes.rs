//! Contract code grammar.
//!
//! | kind            | form                   | example      |
//! |-----------------|------------------------|--------------|
//! | concrete        | `TFM\<letter><YY>`     | `TFM\J25`    |
//! | generic         | `TFM<N>`               | `TFM1`       |
//! | monthly generic | `TFM<MON><N>`          | `TFMAPR1`    |
//! | spread          | `TFM<MON1><MON2><N>`   | `TFMDECJUN1` |
//!
//! Concrete codes may arrive with the `ENDEX::F:` source prefix; it is
//! stripped by [`normalize_code`] both when the calendar is loaded and when a
//! specific reference is parsed. Symbolic codes are parsed without regard to
//! case and rendered upper-case.

use crate::error::{TtfError, TtfResult};
use crate::types::{Month, ReferenceKind, SecurityReference, Sequence, YearMonth};

/// Product root shared by every TTF code.
pub const PRODUCT_ROOT: &str = "TFM";

/// Source-system prefix carried by raw exchange codes.
pub const SOURCE_PREFIX: &str = "ENDEX::F:";

/// Strips surrounding whitespace and the source-system prefix.
#[must_use]
pub fn normalize_code(code: &str) -> &str {
    let code = code.trim();
    code.strip_prefix(SOURCE_PREFIX).unwrap_or(code)
}

/// Decodes the delivery month of a concrete code such as `TFM\J25`.
///
/// Returns `None` when the code does not end in `TFM\` followed by a month
/// letter and a two-digit year. Years are taken as 20YY.
#[must_use]
pub fn parse_delivery_month(code: &str) -> Option<YearMonth> {
    let code = normalize_code(code);
    let marker = format!("{PRODUCT_ROOT}\\");
    let start = code.rfind(&marker)? + marker.len();
    let mut chars = code[start..].chars();

    let month = Month::from_code_letter(chars.next()?)?;
    let yy: String = chars.collect();
    if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = yy.parse().ok()?;
    Some(YearMonth::new(2000 + yy, month))
}

/// Parses a generic code (`TFM<N>`).
///
/// # Errors
///
/// Returns `TtfError::MalformedReference` unless `N` is a positive integer.
pub fn parse_generic(input: &str) -> TtfResult<Sequence> {
    let kind = ReferenceKind::Generic;
    let body = strip_root(input, kind)?;
    parse_sequence(body, input, kind)
}

/// Parses a monthly-generic code (`TFM<MON><N>`).
///
/// # Errors
///
/// Returns `TtfError::MalformedReference` when the abbreviation is not a
/// month or `N` is not a positive integer.
pub fn parse_monthly_generic(input: &str) -> TtfResult<(Month, Sequence)> {
    let kind = ReferenceKind::MonthlyGeneric;
    let body = strip_root(input, kind)?;
    let (letters, digits) = split_letters(body);
    let month = Month::from_abbr(letters).ok_or_else(|| {
        TtfError::malformed(kind, input, format!("unknown month abbreviation '{letters}'"))
    })?;
    let sequence = parse_sequence(digits, input, kind)?;
    Ok((month, sequence))
}

/// Parses a spread code (`TFM<MON1><MON2><N>`).
///
/// # Errors
///
/// Returns `TtfError::MalformedReference` when the code does not carry two
/// month abbreviations followed by a positive integer.
pub fn parse_spread(input: &str) -> TtfResult<(Month, Month, Sequence)> {
    let kind = ReferenceKind::Spread;
    let body = strip_root(input, kind)?;
    let (letters, digits) = split_letters(body);
    if letters.len() != 6 {
        return Err(TtfError::malformed(
            kind,
            input,
            format!("expected two three-letter months, found '{letters}'"),
        ));
    }
    let (first, second) = letters.split_at(3);
    let front = Month::from_abbr(first).ok_or_else(|| {
        TtfError::malformed(kind, input, format!("unknown month abbreviation '{first}'"))
    })?;
    let back = Month::from_abbr(second).ok_or_else(|| {
        TtfError::malformed(kind, input, format!("unknown month abbreviation '{second}'"))
    })?;
    let sequence = parse_sequence(digits, input, kind)?;
    Ok((front, back, sequence))
}

/// Parses a raw reference string according to its declared kind.
///
/// # Errors
///
/// Returns `TtfError::MalformedReference` if the string does not follow the
/// grammar for `kind`.
pub fn parse_reference(input: &str, kind: ReferenceKind) -> TtfResult<SecurityReference> {
    match kind {
        ReferenceKind::Specific => {
            let code = normalize_code(input);
            if code.is_empty() {
                return Err(TtfError::malformed(kind, input, "empty contract code"));
            }
            Ok(SecurityReference::Specific {
                code: code.to_string(),
            })
        }
        ReferenceKind::Generic => {
            parse_generic(input).map(|sequence| SecurityReference::Generic { sequence })
        }
        ReferenceKind::MonthlyGeneric => parse_monthly_generic(input)
            .map(|(month, sequence)| SecurityReference::MonthlyGeneric { month, sequence }),
        ReferenceKind::Spread => {
            parse_spread(input).map(|(front, back, sequence)| SecurityReference::Spread {
                front,
                back,
                sequence,
            })
        }
    }
}

fn strip_root(input: &str, kind: ReferenceKind) -> TtfResult<&str> {
    let trimmed = input.trim();
    match trimmed.get(..PRODUCT_ROOT.len()) {
        Some(root) if root.eq_ignore_ascii_case(PRODUCT_ROOT) => Ok(&trimmed[PRODUCT_ROOT.len()..]),
        _ => Err(TtfError::malformed(
            kind,
            input,
            format!("expected the {PRODUCT_ROOT} root"),
        )),
    }
}

fn split_letters(body: &str) -> (&str, &str) {
    let split = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    body.split_at(split)
}

fn parse_sequence(digits: &str, input: &str, kind: ReferenceKind) -> TtfResult<Sequence> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TtfError::malformed(
            kind,
            input,
            format!("sequence '{digits}' is not a positive integer"),
        ));
    }
    digits
        .parse::<u32>()
        .ok()
        .and_then(Sequence::new)
        .ok_or_else(|| {
            TtfError::malformed(kind, input, format!("sequence '{digits}' is not a positive integer"))
        })
}
