//! Metadata URI construction.
//!
//! Game and quest metadata live off-chain behind a base URI configured at
//! initialization; the on-chain URI for a record is the base plus the
//! record's decimal index.

use soroban_sdk::{Env, String};

/// Maximum byte length of a constructed metadata URI.
pub const MAX_URI_LENGTH: usize = 256;

/// Append the decimal representation of `index` to `base`.
///
/// The base URI plus ten digits must fit in [`MAX_URI_LENGTH`] bytes.
pub fn with_index(env: &Env, base: &String, index: u32) -> String {
    let base_len = base.len() as usize;
    let mut buf = [0u8; MAX_URI_LENGTH];
    base.copy_into_slice(&mut buf[..base_len]);

    let len = base_len + write_decimal(&mut buf[base_len..], index);

    let uri = core::str::from_utf8(&buf[..len]).unwrap_or("");
    String::from_str(env, uri)
}

/// Write `value` as decimal digits into `buf`, returning the digit count.
fn write_decimal(buf: &mut [u8], value: u32) -> usize {
    let mut digits = [0u8; 10];
    let mut n = value;
    let mut count = 0;
    loop {
        digits[count] = b'0' + (n % 10) as u8;
        n /= 10;
        count += 1;
        if n == 0 {
            break;
        }
    }

    for i in 0..count {
        buf[i] = digits[count - 1 - i];
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_index() {
        let env = Env::default();
        let base = String::from_str(&env, "https://gg.quest/api/games/");

        assert_eq!(
            with_index(&env, &base, 0),
            String::from_str(&env, "https://gg.quest/api/games/0")
        );
        assert_eq!(
            with_index(&env, &base, 7),
            String::from_str(&env, "https://gg.quest/api/games/7")
        );
        assert_eq!(
            with_index(&env, &base, 42),
            String::from_str(&env, "https://gg.quest/api/games/42")
        );
        assert_eq!(
            with_index(&env, &base, 4294967295),
            String::from_str(&env, "https://gg.quest/api/games/4294967295")
        );
    }

    #[test]
    fn test_empty_base() {
        let env = Env::default();
        let base = String::from_str(&env, "");

        assert_eq!(with_index(&env, &base, 103), String::from_str(&env, "103"));
    }
}
