//! Shared helpers: short code generation, URL normalization, password
//! hashing and credential cookies.

pub mod code_generator;
pub mod cookies;
pub mod password;
pub mod url_normalizer;
