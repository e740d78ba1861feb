//! Order-independent identity derivation for host batches.

use sha2::{Digest, Sha256};

/// Derive a stable identity string for a set of host names.
///
/// The names are sorted lexicographically into a copy, their bytes are fed
/// into a SHA-256 digest in that order, and the hex digest is returned. The
/// result is identical for any permutation of the same name set and differs
/// when the set differs.
///
/// This is an identity, not a security primitive; collision risk is accepted.
#[must_use]
pub fn compound_identity<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<S> = names.into_iter().collect();
    sorted.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));

    let mut hasher = Sha256::new();
    for name in &sorted {
        hasher.update(name.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}
