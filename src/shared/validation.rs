use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Thai national ID card number: exactly 13 digits
    /// - Valid: "1103700012345"
    /// - Invalid: "110370001234", "1-1037-00012-34-5"
    pub static ref ID_CARD_REGEX: Regex = Regex::new(r"^\d{13}$").unwrap();

    /// Staff login PIN: exactly 6 digits
    pub static ref PIN_REGEX: Regex = Regex::new(r"^\d{6}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_card_regex() {
        assert!(ID_CARD_REGEX.is_match("1103700012345"));
        assert!(!ID_CARD_REGEX.is_match("110370001234")); // 12 digits
        assert!(!ID_CARD_REGEX.is_match("11037000123456")); // 14 digits
        assert!(!ID_CARD_REGEX.is_match("1-1037-00012-34-5"));
        assert!(!ID_CARD_REGEX.is_match(""));
    }

    #[test]
    fn test_pin_regex() {
        assert!(PIN_REGEX.is_match("123456"));
        assert!(!PIN_REGEX.is_match("12345"));
        assert!(!PIN_REGEX.is_match("1234567"));
        assert!(!PIN_REGEX.is_match("12345a"));
    }
}
