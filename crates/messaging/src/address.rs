//! Wallet address helpers.

/// Shorten an address to its first `length` characters and last four
///
/// `0x1234567890abcdef1234567890abcdef12345678` becomes `0x1234...5678`.
/// Addresses too short to shorten are returned unchanged.
pub fn truncate_address(address: &str, length: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= length + 4 {
        return address.to_string();
    }

    let head: String = chars[..length].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// `0x` followed by exactly 40 hex digits
pub fn is_valid_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Canonical lowercase form used as a lookup key
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x1234567890abcdef1234567890abcdef12345678";

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address(ADDR, 6), "0x1234...5678");
        assert_eq!(truncate_address(ADDR, 4), "0x12...5678");
    }

    #[test]
    fn test_truncate_short_input_unchanged() {
        assert_eq!(truncate_address("", 6), "");
        assert_eq!(truncate_address("0x12345678", 6), "0x12345678");
    }

    #[test]
    fn test_is_valid_address() {
        assert!(is_valid_address(ADDR));
        assert!(is_valid_address("0xABCDEF7890abcdef1234567890abcdef12345678"));
        assert!(!is_valid_address("1234567890abcdef1234567890abcdef12345678"));
        assert!(!is_valid_address("0x1234"));
        assert!(!is_valid_address("0xzz34567890abcdef1234567890abcdef12345678"));
        assert!(!is_valid_address("vitalik.eth"));
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("  0xABCdef  "), "0xabcdef");
    }
}
