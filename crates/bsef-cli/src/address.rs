//! Byte address parsing.

/// Parse a byte address: decimal by default, hexadecimal with a `0x` prefix.
pub fn parse_address(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("Invalid byte address '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_address("0").unwrap(), 0);
        assert_eq!(parse_address("4096").unwrap(), 4096);
    }

    #[test]
    fn test_parse_hex_prefix() {
        assert_eq!(parse_address("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_address("0XdeadBEEF").unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_address("").is_err());
        assert!(parse_address("12ab").is_err());
        assert!(parse_address("0x").is_err());
        assert!(parse_address("-1").is_err());
    }
}
