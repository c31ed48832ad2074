//! Case-escape codec for module paths and versions.
//!
//! An uppercase ASCII letter `X` is transmitted on the wire as `!x`, so a
//! case-insensitive filesystem or URL component can still round-trip a
//! mixed-case identifier.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid escaped module path")]
    InvalidModulePath,
    #[error("invalid escaped version")]
    InvalidVersion,
}

/// Decodes a `!`-escaped module path.
pub fn decode(s: &str) -> Result<String, PathError> {
    decode_with(s, PathError::InvalidModulePath)
}

/// Decodes a `!`-escaped version identifier.
pub fn decode_version(s: &str) -> Result<String, PathError> {
    decode_with(s, PathError::InvalidVersion)
}

fn decode_with(s: &str, err: PathError) -> Result<String, PathError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '!' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next.is_ascii_lowercase() => out.push(next.to_ascii_uppercase()),
            _ => return Err(err),
        }
    }
    Ok(out)
}

/// Encodes a module path or version for transmission, escaping every uppercase
/// ASCII letter as `!` followed by its lowercase form.
pub fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
