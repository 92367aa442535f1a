//! SHA-256 digests of output artifacts.
//!
//! Digests are lowercase 64-character hex strings over the exact file bytes,
//! so two runs over the same input and rules yield the same digests.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use sieve_contracts::error::{SieveError, SieveResult};

/// Hash an in-memory byte slice.
pub fn digest_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hash the file at `path`, streaming its contents.
pub fn digest_file(path: &Path) -> SieveResult<String> {
    let mut file = File::open(path).map_err(|e| SieveError::ReportError {
        reason: format!("failed to open artifact '{}': {}", path.display(), e),
    })?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| SieveError::ReportError {
        reason: format!("failed to hash artifact '{}': {}", path.display(), e),
    })?;
    Ok(hex::encode(hasher.finalize()))
}
