//! Random short code generation.
//!
//! Codes are drawn uniformly from the 62-character alphanumeric alphabet
//! (`a-z`, `A-Z`, `0-9`). A generated code is only a candidate: uniqueness is
//! settled by the record store, and callers retry on collision.

use rand::{Rng, distr::Alphanumeric};

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Upper bound for both generated and custom codes; matches the store column.
pub const MAX_CODE_LENGTH: usize = 64;

/// Generates a random alphanumeric code of `length` characters.
///
/// Uses the thread-local generator, so concurrent callers share no state.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_requested_length() {
        assert_eq!(generate_code(DEFAULT_CODE_LENGTH).len(), 6);
        assert_eq!(generate_code(12).len(), 12);
        assert!(generate_code(0).is_empty());
    }

    #[test]
    fn test_generate_code_alphanumeric_only() {
        for _ in 0..100 {
            let code = generate_code(DEFAULT_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_code_covers_alphabet_classes() {
        let sample: String = (0..200).map(|_| generate_code(16)).collect();

        assert!(sample.chars().any(|c| c.is_ascii_lowercase()));
        assert!(sample.chars().any(|c| c.is_ascii_uppercase()));
        assert!(sample.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<_> = (0..1000).map(|_| generate_code(12)).collect();
        assert_eq!(codes.len(), 1000);
    }
}
