//! Credit card number checks: Luhn checksum and brand detection.
//!
//! Only the number's shape is checked. Nothing here says whether a card
//! exists.

pub const MIN_DIGITS: usize = 12;
pub const MAX_DIGITS: usize = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardBrand {
    /// Lowercase brand name, as shown to users and in JSON.
    pub fn name(self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Discover => "discover",
            CardBrand::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of [`check_card`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CardCheck {
    /// The input with separators removed. Empty if the input had other
    /// non-digit characters.
    pub digits: String,
    pub brand: CardBrand,
    pub valid: bool,
}

/// Luhn checksum over an all-digit string.
///
/// Returns false for non-digit input or fewer than two digits.
///
/// ```
/// use tidbit::card::luhn_valid;
///
/// assert!(luhn_valid("79927398713"));
/// assert!(!luhn_valid("79927398710"));
/// ```
pub fn luhn_valid(digits: &str) -> bool {
    if digits.len() < 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Detect the issuer from the number's prefix.
pub fn card_brand(digits: &str) -> CardBrand {
    let prefix = |n: usize| digits.get(..n).and_then(|p| p.parse::<u32>().ok());

    if digits.starts_with('4') {
        CardBrand::Visa
    } else if matches!(prefix(2), Some(34 | 37)) {
        CardBrand::Amex
    } else if matches!(prefix(2), Some(51..=55)) || matches!(prefix(4), Some(2221..=2720)) {
        CardBrand::Mastercard
    } else if digits.starts_with("6011")
        || digits.starts_with("65")
        || matches!(prefix(3), Some(644..=649))
    {
        CardBrand::Discover
    } else {
        CardBrand::Unknown
    }
}

/// Normalize and check a user-typed card number.
///
/// Spaces and dashes are separators; any other non-digit makes the number
/// invalid.
pub fn check_card(input: &str) -> CardCheck {
    let mut digits = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' => {}
            _ => {
                return CardCheck {
                    digits: String::new(),
                    brand: CardBrand::Unknown,
                    valid: false,
                };
            }
        }
    }

    let valid = (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) && luhn_valid(&digits);
    CardCheck {
        brand: card_brand(&digits),
        digits,
        valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luhn_known_numbers() {
        assert!(luhn_valid("4111111111111111"));
        assert!(luhn_valid("5555555555554444"));
        assert!(luhn_valid("378282246310005"));
        assert!(luhn_valid("6011111111111117"));
        assert!(!luhn_valid("4111111111111112"));
    }

    #[test]
    fn test_luhn_rejects_non_digits() {
        assert!(!luhn_valid(""));
        assert!(!luhn_valid("0"));
        assert!(!luhn_valid("4111a11111111111"));
    }

    #[test]
    fn test_brands() {
        assert_eq!(card_brand("4111111111111111"), CardBrand::Visa);
        assert_eq!(card_brand("5555555555554444"), CardBrand::Mastercard);
        assert_eq!(card_brand("2223003122003222"), CardBrand::Mastercard);
        assert_eq!(card_brand("378282246310005"), CardBrand::Amex);
        assert_eq!(card_brand("6011111111111117"), CardBrand::Discover);
        assert_eq!(card_brand("6445644564456445"), CardBrand::Discover);
        assert_eq!(card_brand("3530111333300000"), CardBrand::Unknown);
        assert_eq!(card_brand(""), CardBrand::Unknown);
    }

    #[test]
    fn test_brand_names() {
        assert_eq!(check_card("4111 1111 1111 1111").brand.name(), "visa");
        assert_eq!(CardBrand::Mastercard.to_string(), "mastercard");
        assert_eq!(CardBrand::Amex.name(), "amex");
        assert_eq!(CardBrand::Discover.name(), "discover");
        assert_eq!(CardBrand::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_check_card_separators() {
        let check = check_card("4111 1111-1111 1111");
        assert_eq!(check.digits, "4111111111111111");
        assert_eq!(check.brand, CardBrand::Visa);
        assert!(check.valid);
    }

    #[test]
    fn test_check_card_length_bounds() {
        // Luhn-valid but too short to be a card.
        assert!(luhn_valid("18"));
        assert!(!check_card("18").valid);
        assert!(!check_card("4111.1111.1111.1111").valid);
        assert!(check_card("4111.1111.1111.1111").digits.is_empty());
    }
}
