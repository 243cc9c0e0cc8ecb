//! Content signatures for generated files.
//!
//! Emitters write `MAGIC_PLACEHOLDER` into every header. Signing swaps it for
//! a fixed token, hashes the whole text, then swaps the token for the digest,
//! so any later hand edit is detectable by recomputing.

use md5::{Digest, Md5};
use std::fmt::Write;

/// Written by every backend prologue; replaced at sign time.
pub const MAGIC_PLACEHOLDER: &str = "MAGIC_PLACEHOLDER";

const TOKEN: &str = "<<SignedSource::*O*zOeWoEQle#+L!plEphiEmie@IsG>>";
const SIGNED_PREFIX: &str = "SignedSource<<";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    #[error("no `MAGIC_PLACEHOLDER` in generated text")]
    MissingPlaceholder,
}

/// Outcome of checking a file's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// Digest matches the content.
    Signed,
    /// No signature present.
    Unsigned,
    /// Content changed after signing.
    Tampered { expected: String, found: String },
}

/// Lowercase hex MD5, the signedsource digest.
fn digest(text: &str) -> String {
    let hash = Md5::digest(text.as_bytes());
    let mut out = String::with_capacity(32);
    for byte in &hash {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Replace the placeholder with `@generated SignedSource<<digest>>`.
///
/// # Errors
/// Fails if the text carries no placeholder.
pub fn sign(text: &str) -> Result<String, SignError> {
    if !text.contains(MAGIC_PLACEHOLDER) {
        return Err(SignError::MissingPlaceholder);
    }
    let with_token = text.replacen(MAGIC_PLACEHOLDER, &format!("@generated {TOKEN}"), 1);
    let signature = format!("{SIGNED_PREFIX}{}>>", digest(&with_token));
    Ok(with_token.replacen(TOKEN, &signature, 1))
}

/// Recompute the digest of a signed file and compare.
#[must_use]
pub fn verify_signature(text: &str) -> Signature {
    let marker = format!("@generated {SIGNED_PREFIX}");
    let Some(start) = text.find(&marker) else {
        return Signature::Unsigned;
    };
    let digest_start = start + marker.len();
    let Some(len) = text[digest_start..].find(">>") else {
        return Signature::Unsigned;
    };
    let found = &text[digest_start..digest_start + len];

    let signature = format!("{SIGNED_PREFIX}{found}>>");
    let token_start = start + "@generated ".len();
    let mut unsigned = String::with_capacity(text.len());
    unsigned.push_str(&text[..token_start]);
    unsigned.push_str(TOKEN);
    unsigned.push_str(&text[token_start + signature.len()..]);

    let expected = digest(&unsigned);
    if expected == found {
        Signature::Signed
    } else {
        Signature::Tampered {
            expected,
            found: found.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "/**\n * MAGIC_PLACEHOLDER\n */\nint x = 1;\n";

    #[test]
    fn signed_text_verifies() {
        let signed = sign(SAMPLE).unwrap();
        assert!(signed.contains("@generated SignedSource<<"));
        assert!(!signed.contains(MAGIC_PLACEHOLDER));
        assert_eq!(verify_signature(&signed), Signature::Signed);
    }

    #[test]
    fn digest_is_md5_hex() {
        assert_eq!(digest(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(digest("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn signature_matches_signedsource() {
        assert_eq!(
            sign(SAMPLE).unwrap(),
            "/**\n * @generated SignedSource<<da584de0b96bee725ca06bf1ec59cc31>>\n */\nint x = 1;\n"
        );
    }

    #[test]
    fn signing_is_deterministic() {
        assert_eq!(sign(SAMPLE).unwrap(), sign(SAMPLE).unwrap());
    }

    #[test]
    fn edits_are_detected() {
        let signed = sign(SAMPLE).unwrap().replace("x = 1", "x = 2");
        assert!(matches!(verify_signature(&signed), Signature::Tampered { .. }));
        assert_eq!(verify_signature(SAMPLE), Signature::Unsigned);
    }

    #[test]
    fn placeholder_is_required() {
        assert_eq!(sign("int x;"), Err(SignError::MissingPlaceholder));
    }
}
