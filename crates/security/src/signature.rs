//! Keyed-hash signatures over canonical request bytes

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("unsupported signature algorithm '{algorithm}'")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("invalid key for {algorithm}")]
    InvalidKey { algorithm: HmacAlgorithm },
}

/// Supported keyed-hash functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HmacAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HmacAlgorithm {
    pub const ALL: [HmacAlgorithm; 4] = [
        HmacAlgorithm::Sha1,
        HmacAlgorithm::Sha256,
        HmacAlgorithm::Sha384,
        HmacAlgorithm::Sha512,
    ];

    /// Canonical identifier, e.g. `HmacSHA256`
    #[must_use]
    pub fn identifier(&self) -> &'static str {
        match self {
            HmacAlgorithm::Sha1 => "HmacSHA1",
            HmacAlgorithm::Sha256 => "HmacSHA256",
            HmacAlgorithm::Sha384 => "HmacSHA384",
            HmacAlgorithm::Sha512 => "HmacSHA512",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            HmacAlgorithm::Sha1 => "hmac-sha1",
            HmacAlgorithm::Sha256 => "hmac-sha256",
            HmacAlgorithm::Sha384 => "hmac-sha384",
            HmacAlgorithm::Sha512 => "hmac-sha512",
        }
    }

    /// Signature length in bytes
    #[must_use]
    pub fn output_len(&self) -> usize {
        match self {
            HmacAlgorithm::Sha1 => 20,
            HmacAlgorithm::Sha256 => 32,
            HmacAlgorithm::Sha384 => 48,
            HmacAlgorithm::Sha512 => 64,
        }
    }

    /// Sign `message` with `key`. The key is only borrowed for the call.
    pub fn sign(&self, message: &[u8], key: &[u8]) -> Result<Vec<u8>, SignatureError> {
        match self {
            HmacAlgorithm::Sha1 => mac::<Hmac<Sha1>>(*self, message, key),
            HmacAlgorithm::Sha256 => mac::<Hmac<Sha256>>(*self, message, key),
            HmacAlgorithm::Sha384 => mac::<Hmac<Sha384>>(*self, message, key),
            HmacAlgorithm::Sha512 => mac::<Hmac<Sha512>>(*self, message, key),
        }
    }
}

fn mac<M: Mac + KeyInit>(
    algorithm: HmacAlgorithm,
    message: &[u8],
    key: &[u8],
) -> Result<Vec<u8>, SignatureError> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|_| SignatureError::InvalidKey { algorithm })?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl FromStr for HmacAlgorithm {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.identifier() == s || algorithm.alias() == s)
            .ok_or_else(|| SignatureError::UnsupportedAlgorithm {
                algorithm: s.to_string(),
            })
    }
}

impl fmt::Display for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Computes signatures from an algorithm identifier as supplied by a client
pub struct SignatureEngine;

impl SignatureEngine {
    /// Deterministic: identical inputs always yield identical bytes
    pub fn compute_signature(
        algorithm: &str,
        message: &[u8],
        secret_key: &[u8],
    ) -> Result<Vec<u8>, SignatureError> {
        algorithm.parse::<HmacAlgorithm>()?.sign(message, secret_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 2202 / RFC 4231 test case 2
    const KEY: &[u8] = b"Jefe";
    const DATA: &[u8] = b"what do ya want for nothing?";

    #[test]
    fn test_known_vectors() {
        let cases = [
            ("HmacSHA1", "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"),
            (
                "HmacSHA256",
                "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843",
            ),
            (
                "HmacSHA384",
                "af45d2e376484031617f78d2b58a6b1b9c7ef464f5a01b47e42ec3736322445e8e2240ca5e69e2c78b3239ecfab21649",
            ),
            (
                "HmacSHA512",
                "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737",
            ),
        ];
        for (algorithm, expected) in cases {
            let signature = SignatureEngine::compute_signature(algorithm, DATA, KEY).unwrap();
            assert_eq!(hex::encode(&signature), expected, "{algorithm}");
        }
    }

    #[test]
    fn test_output_len_matches() {
        for algorithm in HmacAlgorithm::ALL {
            assert_eq!(algorithm.sign(DATA, KEY).unwrap().len(), algorithm.output_len());
        }
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!("hmac-sha256".parse::<HmacAlgorithm>().unwrap(), HmacAlgorithm::Sha256);
        assert_eq!("HmacSHA512".parse::<HmacAlgorithm>().unwrap(), HmacAlgorithm::Sha512);

        for unknown in ["HmacMD5", "hmacsha256", "SHA256", ""] {
            let err = SignatureEngine::compute_signature(unknown, DATA, KEY).unwrap_err();
            assert_eq!(
                err,
                SignatureError::UnsupportedAlgorithm {
                    algorithm: unknown.to_string()
                }
            );
        }
    }

    #[test]
    fn test_deterministic_and_key_sensitive() {
        let a = SignatureEngine::compute_signature("HmacSHA256", DATA, KEY).unwrap();
        let b = SignatureEngine::compute_signature("HmacSHA256", DATA, KEY).unwrap();
        assert_eq!(a, b);

        let other = SignatureEngine::compute_signature("HmacSHA256", DATA, b"Jeff").unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_empty_key_and_message() {
        let signature = HmacAlgorithm::Sha256.sign(b"", b"").unwrap();
        assert_eq!(signature.len(), 32);
    }
}
