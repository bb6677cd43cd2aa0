//! Utility functions and helpers
//!
//! Hashing helpers used to derive class hashes and contract addresses.

pub mod crypto;

pub use crypto::{sha256_digest, sha256_digest_parts};
