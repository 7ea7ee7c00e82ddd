//! Number formatting for list and outline labels.

use crate::source::NumFormat;

/// Format a counter value.
///
/// Values that a format cannot express (zero, roman numerals above 3999)
/// fall back to arabic digits.
pub fn format_number(value: u32, format: NumFormat, letter_sync: bool) -> String {
    match format {
        NumFormat::Arabic => value.to_string(),
        NumFormat::LowerRoman => roman(value).map_or_else(|| value.to_string(), |r| r.to_lowercase()),
        NumFormat::UpperRoman => roman(value).unwrap_or_else(|| value.to_string()),
        NumFormat::LowerAlpha => alpha(value, letter_sync).unwrap_or_else(|| value.to_string()),
        NumFormat::UpperAlpha => alpha(value, letter_sync)
            .map_or_else(|| value.to_string(), |a| a.to_uppercase()),
        NumFormat::None => String::new(),
    }
}

/// Upper-case roman numeral for 1..=3999.
pub fn roman(value: u32) -> Option<String> {
    const TABLE: &[(u32, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    if value == 0 || value > 3999 {
        return None;
    }
    let mut out = String::new();
    let mut rest = value;
    for &(n, symbol) in TABLE {
        while rest >= n {
            out.push_str(symbol);
            rest -= n;
        }
    }
    Some(out)
}

/// Longest letter-sync label; larger values fall back to arabic digits.
pub const MAX_SYNC_LETTERS: u32 = 64;

/// Lower-case alphabetic numbering.
///
/// With `letter_sync` the letter repeats (`z, aa, bb`); otherwise the
/// spreadsheet-style sequence is used (`z, aa, ab`).
pub fn alpha(value: u32, letter_sync: bool) -> Option<String> {
    if value == 0 {
        return None;
    }
    if letter_sync {
        let count = (value - 1) / 26 + 1;
        if count > MAX_SYNC_LETTERS {
            return None;
        }
        let letter = (b'a' + ((value - 1) % 26) as u8) as char;
        return Some(std::iter::repeat_n(letter, count as usize).collect());
    }
    let mut out = Vec::new();
    let mut n = value;
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    Some(out.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_roman() {
        assert_eq!(roman(4).as_deref(), Some("IV"));
        assert_eq!(roman(1994).as_deref(), Some("MCMXCIV"));
        assert_eq!(roman(3999).as_deref(), Some("MMMCMXCIX"));
        assert_eq!(roman(4000), None);
        assert_eq!(format_number(4000, NumFormat::UpperRoman, false), "4000");
        assert_eq!(format_number(14, NumFormat::LowerRoman, false), "xiv");
    }

    #[test]
    fn test_alpha() {
        assert_eq!(alpha(1, false).as_deref(), Some("a"));
        assert_eq!(alpha(26, false).as_deref(), Some("z"));
        assert_eq!(alpha(27, false).as_deref(), Some("aa"));
        assert_eq!(alpha(28, false).as_deref(), Some("ab"));
        assert_eq!(alpha(28, true).as_deref(), Some("bb"));
        assert_eq!(format_number(3, NumFormat::UpperAlpha, false), "C");
        assert_eq!(format_number(0, NumFormat::LowerAlpha, false), "0");
    }

    #[test]
    fn test_letter_sync_length_is_bounded() {
        assert_eq!(alpha(26 * 64, true).map(|a| a.len()), Some(64));
        assert_eq!(alpha(26 * 64 + 1, true), None);
        assert_eq!(
            format_number(u32::MAX, NumFormat::LowerAlpha, true),
            u32::MAX.to_string()
        );
        assert_eq!(alpha(u32::MAX, false).as_deref(), Some("mwlqkwu"));
    }

    #[test]
    fn test_none_format_is_empty() {
        assert_eq!(format_number(7, NumFormat::None, false), "");
    }

    proptest! {
        #[test]
        fn alpha_sequence_is_injective(a in 1u32..5000, b in 1u32..5000) {
            prop_assume!(a != b);
            prop_assert_ne!(alpha(a, false), alpha(b, false));
        }

        #[test]
        fn roman_uses_only_numeral_letters(n in 1u32..4000) {
            let r = roman(n).unwrap();
            prop_assert!(r.chars().all(|c| "MDCLXVI".contains(c)));
        }
    }
}
