//! SQL canonicalization and fingerprinting

pub mod canonical;
pub mod fingerprint;

pub use canonical::{AstCanonicalizer, Canonicalize, SqlDialect, TokenCanonicalizer};
pub use fingerprint::fingerprint;
