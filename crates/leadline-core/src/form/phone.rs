/// Number of digits in a valid US phone number (no country code, no extension)
pub const PHONE_DIGITS: usize = 10;

/// Longest string `format_phone_number` can produce: `(XXX) XXX-XXXX`.
/// Front ends cap the phone input at this length.
pub const MAX_FORMATTED_PHONE_LENGTH: usize = 14;

/// Extract just the ASCII digits from a phone string
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a phone number as the user types it.
///
/// Partial input is formatted progressively toward `(XXX) XXX-XXXX`:
/// fewer than three digits are returned as-is, three to five digits get the
/// area code wrapped, and six or more get the full mask. Digits beyond the
/// tenth are dropped. Re-applying the function to its own output returns the
/// same string.
pub fn format_phone_number(raw: &str) -> String {
    let mut digits = phone_digits(raw);
    digits.truncate(PHONE_DIGITS);

    match digits.len() {
        0..=2 => digits,
        3..=5 => format!("({}) {}", &digits[0..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone_number_full() {
        assert_eq!(format_phone_number("9803167792"), "(980) 316-7792");
        assert_eq!(format_phone_number("980-316-7792"), "(980) 316-7792");
        assert_eq!(format_phone_number("(980) 316-7792"), "(980) 316-7792");
        assert_eq!(format_phone_number("980.316.7792"), "(980) 316-7792");
    }

    #[test]
    fn test_format_phone_number_partial() {
        assert_eq!(format_phone_number(""), "");
        assert_eq!(format_phone_number("9"), "9");
        assert_eq!(format_phone_number("98"), "98");
        assert_eq!(format_phone_number("980"), "(980) ");
        assert_eq!(format_phone_number("98031"), "(980) 31");
        assert_eq!(format_phone_number("980316"), "(980) 316-");
        assert_eq!(format_phone_number("9803167"), "(980) 316-7");
    }

    #[test]
    fn test_format_phone_number_drops_extra_digits() {
        assert_eq!(format_phone_number("980316779212"), "(980) 316-7792");
        // A leading country code is not stripped, the extra digit just shifts the mask
        assert_eq!(format_phone_number("19803167792"), "(198) 031-6779");
    }

    #[test]
    fn test_format_phone_number_ignores_non_digits() {
        assert_eq!(format_phone_number("abc"), "");
        assert_eq!(format_phone_number("call 98"), "98");
        assert_eq!(format_phone_number("+1 (980)"), "(198) 0");
    }

    #[test]
    fn test_format_phone_number_is_idempotent() {
        let inputs = [
            "",
            "9",
            "98",
            "980",
            "98031",
            "980316",
            "9803167792",
            "980316779299",
            "(980) 316-779",
            "phone: 980 316 7792 ext 4",
            "ñ9é8",
        ];
        for input in inputs {
            let once = format_phone_number(input);
            assert_eq!(format_phone_number(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_formatted_length_never_exceeds_cap() {
        let formatted = format_phone_number("99999999999999999999");
        assert_eq!(formatted.len(), MAX_FORMATTED_PHONE_LENGTH);
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(phone_digits("(980) 316-7792"), "9803167792");
        assert_eq!(phone_digits("no digits"), "");
    }
}
