//! Address input validation.

use std::str::FromStr;

use ethers::types::Address;
use ethers::utils::to_checksum;

/// Parses user input as an address.
///
/// Requires a `0x` prefix and 40 hex digits. All-lowercase and all-uppercase input is
/// accepted as-is; mixed case must match the EIP-55 checksum.
pub fn parse_address(input: &str) -> Option<Address> {
    let input = input.trim();
    let digits = input.strip_prefix("0x")?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let address = Address::from_str(digits).ok()?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address, None) != input {
        return None;
    }
    Some(address)
}

/// EIP-55 form for display.
pub fn display_address(address: &Address) -> String {
    to_checksum(address, None)
}
