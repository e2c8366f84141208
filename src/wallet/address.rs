//! Solana address helpers

/// Check that `address` looks like a Solana public key: 32 to 44 base58
/// characters decoding to exactly 32 bytes. Surrounding whitespace is ignored.
pub fn is_valid_solana_address(address: &str) -> bool {
    let trimmed = address.trim();
    if !(32..=44).contains(&trimmed.len()) {
        return false;
    }
    matches!(bs58::decode(trimmed).into_vec(), Ok(bytes) if bytes.len() == 32)
}

/// Shorten an address for display and log lines: `first8...last6`
pub fn short_address(address: &str) -> String {
    const HEAD: usize = 8;
    const TAIL: usize = 6;

    let chars: Vec<char> = address.chars().collect();
    if chars.len() < HEAD + TAIL {
        return address.to_string();
    }
    let head: String = chars[..HEAD].iter().collect();
    let tail: String = chars[chars.len() - TAIL..].iter().collect();
    format!("{}...{}", head, tail)
}
