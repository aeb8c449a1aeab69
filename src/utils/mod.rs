//! Helpers shared by the services.
//!
//! - [`code_generator`] - random alphanumeric short codes
//! - [`password`] - Argon2id hashing for protected codes

pub mod code_generator;
pub mod password;
