//! Password hashing and the expected credential digest.
//!
//! To provision a new password, run `vaultgate hash` and replace
//! [`DEFAULT_CREDENTIAL_HEX`] with the printed digest.

use std::fmt;

use sha2::{Digest as _, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CredentialError;

/// SHA-256 of `"password"`. Change this before publishing anything.
pub const DEFAULT_CREDENTIAL_HEX: &str =
    "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// A lowercase hex-encoded SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash a plaintext password the same way the credential was produced.
pub fn compute_hash(plaintext: &str) -> HexDigest {
    HexDigest(hex::encode(Sha256::digest(plaintext.as_bytes())))
}

/// The expected digest of the correct password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(HexDigest);

impl Credential {
    /// Parse a hex digest, accepting either case.
    pub fn from_hex(digest: &str) -> Result<Self, CredentialError> {
        let actual = digest.chars().count();
        if actual != DIGEST_HEX_LEN {
            return Err(CredentialError::InvalidLength {
                expected: DIGEST_HEX_LEN,
                actual,
            });
        }
        if let Some(bad) = digest.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CredentialError::InvalidCharacter(bad));
        }
        Ok(Self(HexDigest(digest.to_ascii_lowercase())))
    }

    pub fn digest(&self) -> &HexDigest {
        &self.0
    }

    /// Compare a computed digest against this credential in constant time
    pub fn matches(&self, candidate: &HexDigest) -> bool {
        self.0.as_str().as_bytes().ct_eq(candidate.as_str().as_bytes()).into()
    }

    /// Hash `plaintext` and compare it against this credential
    pub fn verify(&self, plaintext: &str) -> bool {
        self.matches(&compute_hash(plaintext))
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self(HexDigest(DEFAULT_CREDENTIAL_HEX.to_string()))
    }
}
