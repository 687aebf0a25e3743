// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic cache key derivation.
//!
//! Heterogeneous call arguments are reduced to a canonical form and hashed
//! with SHA-256 into a fixed-length key, namespaced by a caller-supplied
//! prefix. Equal normalized arguments always produce the same key; unequal
//! arguments produce different keys with overwhelming probability.

use sha2::{Digest, Sha256};
use tollbooth_core::TollboothError;

/// A deterministic opaque cache key: `{prefix}:{sha256-hex}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(pub String);

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A call argument reduced to its canonical-value vocabulary.
///
/// Only values with a reproducible identity can participate in key
/// derivation. Non-finite floats are rejected at derivation time.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPart {
    /// Text, normalized before hashing (case-folded, whitespace-collapsed).
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// An explicitly absent optional argument.
    None,
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Text(s.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Text(s)
    }
}

impl From<i64> for KeyPart {
    fn from(v: i64) -> Self {
        KeyPart::Int(v)
    }
}

impl From<u64> for KeyPart {
    fn from(v: u64) -> Self {
        KeyPart::UInt(v)
    }
}

impl From<f64> for KeyPart {
    fn from(v: f64) -> Self {
        KeyPart::Float(v)
    }
}

impl From<bool> for KeyPart {
    fn from(v: bool) -> Self {
        KeyPart::Bool(v)
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => KeyPart::None,
        }
    }
}

/// Normalize text for key derivation: case-fold, strip leading/trailing
/// whitespace, collapse internal whitespace runs to a single space.
///
/// Folding trivial textual variation into cache hits is deliberate: two
/// prompts differing only by capitalization or spacing are treated as the
/// same request.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Derive a cache key from a prefix, positional arguments, and named
/// arguments.
///
/// Positional arguments are hashed in call order (order-sensitive). Named
/// arguments are hashed sorted by name, so equivalent calls expressed with
/// arguments in different order collide to the same key. Every value is
/// framed with a type tag and length prefix, so distinct argument lists can
/// never serialize to the same byte stream.
///
/// Fails with [`TollboothError::KeyDerivation`] only for arguments lacking a
/// canonical representation (non-finite floats); it never silently produces
/// a non-deterministic key.
pub fn derive_key(
    prefix: &str,
    positional: &[KeyPart],
    named: &[(&str, KeyPart)],
) -> Result<CacheKey, TollboothError> {
    let mut hasher = Sha256::new();

    hasher.update((prefix.len() as u64).to_le_bytes());
    hasher.update(prefix.as_bytes());

    hasher.update((positional.len() as u64).to_le_bytes());
    for part in positional {
        hash_part(&mut hasher, part)?;
    }

    let mut sorted: Vec<&(&str, KeyPart)> = named.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    hasher.update((sorted.len() as u64).to_le_bytes());
    for (name, part) in sorted {
        hasher.update((name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
        hash_part(&mut hasher, part)?;
    }

    let digest = hasher.finalize();
    Ok(CacheKey(format!("{prefix}:{}", hex::encode(digest))))
}

/// Feed one canonical value into the hasher, tagged and length-framed.
fn hash_part(hasher: &mut Sha256, part: &KeyPart) -> Result<(), TollboothError> {
    match part {
        KeyPart::Text(s) => {
            let canon = normalize_text(s);
            hasher.update([1u8]);
            hasher.update((canon.len() as u64).to_le_bytes());
            hasher.update(canon.as_bytes());
        }
        KeyPart::Int(v) => {
            hasher.update([2u8]);
            hasher.update(v.to_le_bytes());
        }
        KeyPart::UInt(v) => {
            hasher.update([3u8]);
            hasher.update(v.to_le_bytes());
        }
        KeyPart::Float(v) => {
            if !v.is_finite() {
                return Err(TollboothError::KeyDerivation {
                    message: format!("float {v} has no canonical representation"),
                });
            }
            // Fold -0.0 into 0.0 so the hashed bit pattern is reproducible.
            let v = if *v == 0.0 { 0.0 } else { *v };
            hasher.update([4u8]);
            hasher.update(v.to_le_bytes());
        }
        KeyPart::Bool(v) => {
            hasher.update([5u8, u8::from(*v)]);
        }
        KeyPart::None => {
            hasher.update([6u8]);
        }
    }
    Ok(())
}
