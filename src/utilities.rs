use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::*;
use crate::errors::*;
use crate::types::*;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const EXPORT_DATE_FORMATS: [&str; 3] = [ISO_DATE_FORMAT, "%Y/%m/%d", "%d.%m.%Y"];

// Windows-1252 differs from Latin-1 only in 0x80..=0x9F. Undefined bytes keep
// their C1 code point.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn parse_iso_date(iso_date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(iso_date, ISO_DATE_FORMAT)
        .chain_err(|| format!("Invalid ISO date string (YYYY-MM-DD): {}", iso_date))
}

/// Parses the date formats seen in bank and YNAB exports.
pub fn parse_export_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    EXPORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .chain_err(|| format!("Invalid date: {:?}", text))
}

/// Parses a human formatted amount such as `-1 234,50 kr`, `$1,234.50` or `(12.00)`.
pub fn parse_amount(text: &str) -> Result<Cents> {
    let text = text.trim().replace('\u{2212}', "-");
    ensure!(!text.is_empty(), format!("Missing amount: {:?}", text));
    let invalid = || format!("Invalid amount: {:?}", text);
    let captures = AMOUNT_REGEX.captures(&text).chain_err(invalid)?;
    let parenthesized = captures.name("open").is_some();
    ensure!(parenthesized == captures.name("close").is_some(), invalid());
    let negative = match (captures.name("sign"), captures.name("inner_sign")) {
        (Some(_), Some(_)) => bail!(invalid()),
        (Some(sign), None) | (None, Some(sign)) => sign.as_str() == "-",
        (None, None) => false,
    };
    let number = normalize_separators(&captures["number"]).chain_err(invalid)?;
    let value = Decimal::from_str(&number).chain_err(invalid)?;
    Cents::from_decimal(if negative || parenthesized { -value } else { value })
}

/// Rewrites a number to `1234.50` form. `None` when its grouping is not consistent.
fn normalize_separators(number: &str) -> Option<String> {
    let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    let (integer, fraction) = match (number.rfind(','), number.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => {
            (ungroup(&number[..comma], '.')?, &number[comma + 1..])
        }
        (Some(_), Some(dot)) => (ungroup(&number[..dot], ',')?, &number[dot + 1..]),
        (Some(_), None) if COMMA_GROUPED_REGEX.is_match(&number) => (ungroup(&number, ',')?, ""),
        (None, Some(_)) if number.matches('.').count() > 1 => (ungroup(&number, '.')?, ""),
        (Some(separator), None) | (None, Some(separator)) => {
            (number[..separator].to_string(), &number[separator + 1..])
        }
        (None, None) => (number.clone(), ""),
    };
    let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if integer.is_empty() || !is_digits(integer.as_str()) || !is_digits(fraction) {
        return None;
    }
    Some(if fraction.is_empty() {
        integer
    } else {
        format!("{}.{}", integer, fraction)
    })
}

fn ungroup(integer: &str, separator: char) -> Option<String> {
    let grouped = match separator {
        ',' => COMMA_GROUPED_REGEX.is_match(integer),
        _ => DOT_GROUPED_REGEX.is_match(integer),
    };
    if grouped || (!integer.is_empty() && integer.chars().all(|c| c.is_ascii_digit())) {
        Some(integer.replace(separator, ""))
    } else {
        None
    }
}

/// Decodes an export as UTF-8, falling back to Windows-1252 for legacy bank files.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&byte| windows_1252_char(byte)).collect(),
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

fn windows_1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WINDOWS_1252_HIGH[(byte - 0x80) as usize],
        _ => char::from(byte),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_swedish() {
        assert_eq!(parse_amount("-1 234,50 kr").unwrap(), Cents::new(-123_450));
        assert_eq!(parse_amount("33,71kr").unwrap(), Cents::new(3371));
        assert_eq!(
            parse_amount("-1\u{a0}234,50\u{a0}kr").unwrap(),
            Cents::new(-123_450)
        );
        assert_eq!(parse_amount("1.234,5").unwrap(), Cents::new(123_450));
    }

    #[test]
    fn test_parse_amount_english() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), Cents::new(123_456));
        assert_eq!(parse_amount("-100.00").unwrap(), Cents::new(-10_000));
        assert_eq!(parse_amount("1,234").unwrap(), Cents::new(123_400));
        assert_eq!(parse_amount("+12").unwrap(), Cents::new(1200));
    }

    #[test]
    fn test_parse_amount_negative_forms() {
        assert_eq!(parse_amount("(100.00)").unwrap(), Cents::new(-10_000));
        assert_eq!(parse_amount("\u{2212}5,00").unwrap(), Cents::new(-500));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("kr").is_err());
        assert!(parse_amount("1,2,3").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("12abc34").is_err());
        assert!(parse_amount("5 kr 3").is_err());
        assert!(parse_amount("(5.00").is_err());
        assert!(parse_amount("-+5").is_err());
    }

    #[test]
    fn test_parse_amount_error_messages() {
        assert_eq!(
            parse_amount("  ").unwrap_err().to_string(),
            "Missing amount: \"\""
        );
        assert_eq!(
            parse_amount("abc").unwrap_err().to_string(),
            "Invalid amount: \"abc\""
        );
    }

    #[test]
    fn test_parse_amount_out_of_range_is_an_error() {
        let err = parse_amount("79228162514264337593543950335").unwrap_err();
        assert!(err.to_string().starts_with("Amount out of range"));
        assert!(parse_amount("99999999999999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_amount_grouping() {
        assert_eq!(parse_amount("1.234.567").unwrap(), Cents::new(123_456_700));
        assert_eq!(parse_amount("1,234,567.89").unwrap(), Cents::new(123_456_789));
        assert_eq!(parse_amount("$-5.00").unwrap(), Cents::new(-500));
        assert_eq!(parse_amount("SEK 12").unwrap(), Cents::new(1200));
    }

    #[test]
    fn test_parse_export_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_export_date("2024-03-01").unwrap(), expected);
        assert_eq!(parse_export_date(" 2024/03/01 ").unwrap(), expected);
        assert_eq!(parse_export_date("01.03.2024").unwrap(), expected);
        assert!(parse_export_date("03/01/2024").is_err());
    }

    #[test]
    fn test_iso_date_round_trip() {
        let date = parse_iso_date("2020-06-01").unwrap();
        assert_eq!(format_iso_date(date), "2020-06-01");
        assert!(parse_iso_date("2020-13-01").is_err());
    }

    #[test]
    fn test_decode_text_utf8_strips_bom() {
        assert_eq!(decode_text("\u{feff}Datum;Text".as_bytes()), "Datum;Text");
    }

    #[test]
    fn test_decode_text_windows_1252() {
        let bytes = b"Bokf\xf6rt saldo \x80";
        assert_eq!(decode_text(bytes), "Bokf\u{f6}rt saldo \u{20ac}");
    }
}
