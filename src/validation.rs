//! Pseudo validation logic.
//!
//! A pseudo carries no format restrictions beyond being non-empty;
//! uniqueness is enforced at the storage layer.

use soroban_sdk::String;

/// Validate a profile pseudo.
///
/// Returns true if the pseudo is valid, false otherwise.
pub fn validate_pseudo(pseudo: &String) -> bool {
    pseudo.len() > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn test_valid_pseudos() {
        let env = Env::default();

        assert!(validate_pseudo(&String::from_str(&env, "bob")));
        assert!(validate_pseudo(&String::from_str(&env, "bob.near")));
        assert!(validate_pseudo(&String::from_str(&env, "B")));
        assert!(validate_pseudo(&String::from_str(&env, "player one")));
    }

    #[test]
    fn test_empty_pseudo() {
        let env = Env::default();

        assert!(!validate_pseudo(&String::from_str(&env, "")));
    }
}
