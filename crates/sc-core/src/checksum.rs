//! SHA-256 checksum chain for migration drift detection.
//!
//! Every script is signed on its own, then folded into a running digest so
//! that `chain[n]` fingerprints the first `n` scripts in order. The chain is
//! recomputed from whatever scripts the caller supplies and compared against
//! the single checksum persisted alongside the schema version.

use sha2::{Digest, Sha256};

/// Produces a fingerprint for a piece of text.
///
/// Used both for individual scripts and for folding the chain.
pub type Signer = fn(&str) -> String;

/// Default [`Signer`]: SHA-256 over the input with all whitespace removed,
/// rendered as lowercase hex.
///
/// Stripping whitespace keeps formatting-only edits from registering as
/// content changes.
pub fn normalized_sha256(s: &str) -> String {
    let normalized = strip_whitespace(s);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compute the checksum chain for `scripts` using `sign`.
///
/// The result has `scripts.len() + 1` entries. Index 0 is the empty state
/// (`sign("")`); index `i` is `sign(chain[i - 1] + sign(scripts[i - 1]))`.
pub fn checksum_chain<S: AsRef<str>>(scripts: &[S], sign: Signer) -> Vec<String> {
    let mut chain = Vec::with_capacity(scripts.len() + 1);
    chain.push(sign(""));

    for script in scripts {
        let previous = &chain[chain.len() - 1];
        let next = sign(&format!("{}{}", previous, sign(script.as_ref())));
        chain.push(next);
    }

    chain
}

#[cfg(test)]
#[path = "checksum_test.rs"]
mod tests;
