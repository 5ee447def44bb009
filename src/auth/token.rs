// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stateless session tokens.
//!
//! ## Format
//!
//! ```text
//! keeper.local.<base64url(nonce || ciphertext || tag)>
//! ```
//!
//! The payload is JSON, sealed with XChaCha20-Poly1305 under a single 32-byte
//! server key. The header is bound as associated data so it cannot be
//! swapped. Every token gets a fresh random 192-bit nonce.
//!
//! Verification needs only the key and the clock: there is no session table,
//! and a token cannot be invalidated before it expires.

use base64ct::{Base64UrlUnpadded, Encoding};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Token header, also used as associated data.
const HEADER: &str = "keeper.local.";

/// XChaCha20 nonce length.
const NONCE_LEN: usize = 24;

/// Poly1305 tag length.
const TAG_LEN: usize = 16;

/// Required key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Token errors.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The key does not match the cipher's key size.
    #[error("invalid key size: must be {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    /// The token is malformed, tampered with, or sealed under another key.
    #[error("token is invalid")]
    InvalidToken,

    /// The token is authentic but past its expiry.
    #[error("token has expired")]
    ExpiredToken,

    /// `issued_at + ttl` is outside the representable time range.
    #[error("token lifetime out of range")]
    TtlOutOfRange,

    /// Sealing failed (RNG or serialization failure).
    #[error("token encryption failed: {0}")]
    Crypto(String),
}

/// Decrypted content of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "expired_at")]
    pub expires_at: DateTime<Utc>,
}

impl TokenPayload {
    /// Build a payload valid for `ttl` starting now.
    pub fn new(user_id: UserId, ttl: Duration) -> Result<Self, TokenError> {
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::TtlOutOfRange)?;
        Ok(Self {
            user_id,
            issued_at,
            expires_at,
        })
    }

    /// Check the validity window against the current time.
    ///
    /// A token is expired once the clock has passed `expires_at`.
    pub fn valid(&self) -> Result<(), TokenError> {
        self.valid_at(Utc::now())
    }

    fn valid_at(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        if now > self.expires_at {
            return Err(TokenError::ExpiredToken);
        }
        Ok(())
    }
}

/// Creates and verifies session tokens under one symmetric key.
pub struct TokenMaker {
    cipher: XChaCha20Poly1305,
    rng: SystemRandom,
}

impl std::fmt::Debug for TokenMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMaker").finish_non_exhaustive()
    }
}

impl TokenMaker {
    /// Create a token maker.
    ///
    /// # Errors
    /// Returns `TokenError::InvalidKeySize` unless `key` is exactly
    /// [`KEY_SIZE`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        if key.len() != KEY_SIZE {
            return Err(TokenError::InvalidKeySize {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }

        let cipher =
            XChaCha20Poly1305::new_from_slice(key).map_err(|_| TokenError::InvalidKeySize {
                expected: KEY_SIZE,
                actual: key.len(),
            })?;

        Ok(Self {
            cipher,
            rng: SystemRandom::new(),
        })
    }

    /// Create a token for `user_id` valid for `ttl`.
    ///
    /// A zero or negative `ttl` produces a token that is already expired.
    /// A `ttl` that overflows the calendar is `TtlOutOfRange`.
    pub fn create(&self, user_id: UserId, ttl: Duration) -> Result<String, TokenError> {
        let payload = TokenPayload::new(user_id, ttl)?;
        let json = serde_json::to_vec(&payload).map_err(|e| TokenError::Crypto(e.to_string()))?;

        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| TokenError::Crypto("nonce generation failed".to_string()))?;

        let ciphertext = self
            .cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: &json,
                    aad: HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::Crypto("seal failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(format!("{HEADER}{}", Base64UrlUnpadded::encode_string(&sealed)))
    }

    /// Decrypt and validate a token.
    ///
    /// Any decoding or authentication failure is `InvalidToken`; only an
    /// authentic token can be reported as `ExpiredToken`.
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let body = token.strip_prefix(HEADER).ok_or(TokenError::InvalidToken)?;
        let sealed = Base64UrlUnpadded::decode_vec(body).map_err(|_| TokenError::InvalidToken)?;

        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(TokenError::InvalidToken);
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::InvalidToken)?;

        let payload: TokenPayload =
            serde_json::from_slice(&plaintext).map_err(|_| TokenError::InvalidToken)?;

        payload.valid()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn maker() -> TokenMaker {
        TokenMaker::new(TEST_KEY).unwrap()
    }

    #[test]
    fn rejects_wrong_key_size() {
        let result = TokenMaker::new(b"too-short");
        assert!(matches!(
            result,
            Err(TokenError::InvalidKeySize {
                expected: 32,
                actual: 9
            })
        ));
    }

    #[test]
    fn create_and_verify() {
        let maker = maker();
        let before = Utc::now();
        let token = maker.create(UserId(42), Duration::minutes(5)).unwrap();

        assert!(token.starts_with("keeper.local."));

        let payload = maker.verify(&token).unwrap();
        assert_eq!(payload.user_id, UserId(42));
        assert!(payload.issued_at >= before);
        assert_eq!(payload.expires_at - payload.issued_at, Duration::minutes(5));
    }

    #[test]
    fn tokens_for_same_user_differ() {
        let maker = maker();
        let first = maker.create(UserId(1), Duration::minutes(5)).unwrap();
        let second = maker.create(UserId(1), Duration::minutes(5)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn negative_ttl_is_expired() {
        let maker = maker();
        let token = maker.create(UserId(7), Duration::seconds(-1)).unwrap();
        assert!(matches!(maker.verify(&token), Err(TokenError::ExpiredToken)));
    }

    #[test]
    fn zero_ttl_is_expired() {
        let maker = maker();
        let token = maker.create(UserId(7), Duration::zero()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(matches!(maker.verify(&token), Err(TokenError::ExpiredToken)));
    }

    #[test]
    fn still_valid_at_the_expiry_instant() {
        let payload = TokenPayload::new(UserId(7), Duration::minutes(5)).unwrap();

        assert!(payload.valid_at(payload.expires_at).is_ok());
        assert!(matches!(
            payload.valid_at(payload.expires_at + Duration::nanoseconds(1)),
            Err(TokenError::ExpiredToken)
        ));
    }

    #[test]
    fn overflowing_ttl_is_an_error() {
        let maker = maker();
        let result = maker.create(UserId(1), Duration::seconds(100_000_000_000_000));
        assert!(matches!(result, Err(TokenError::TtlOutOfRange)));

        assert!(matches!(
            maker.create(UserId(1), Duration::MAX),
            Err(TokenError::TtlOutOfRange)
        ));
    }

    #[test]
    fn each_token_gets_a_fresh_nonce() {
        let token = maker().create(UserId(7), Duration::minutes(5)).unwrap();
        let sealed = Base64UrlUnpadded::decode_vec(token.strip_prefix(HEADER).unwrap()).unwrap();
        let payload_len = sealed.len() - NONCE_LEN - TAG_LEN;

        let other = maker().create(UserId(7), Duration::minutes(5)).unwrap();
        let other_sealed =
            Base64UrlUnpadded::decode_vec(other.strip_prefix(HEADER).unwrap()).unwrap();

        assert!(payload_len > 0);
        assert_ne!(sealed[..NONCE_LEN], other_sealed[..NONCE_LEN]);
    }

    #[test]
    fn tampered_token_is_invalid() {
        let maker = maker();
        let token = maker.create(UserId(7), Duration::minutes(5)).unwrap();

        let body = token.strip_prefix(HEADER).unwrap();
        let mut sealed = Base64UrlUnpadded::decode_vec(body).unwrap();
        for i in 0..sealed.len() {
            sealed[i] ^= 0x01;
            let forged = format!("{HEADER}{}", Base64UrlUnpadded::encode_string(&sealed));
            assert!(
                matches!(maker.verify(&forged), Err(TokenError::InvalidToken)),
                "flipping byte {i} must invalidate the token"
            );
            sealed[i] ^= 0x01;
        }
    }

    #[test]
    fn tampered_expired_token_is_invalid_not_expired() {
        let maker = maker();
        let token = maker.create(UserId(7), Duration::seconds(-1)).unwrap();

        let body = token.strip_prefix(HEADER).unwrap();
        let mut sealed = Base64UrlUnpadded::decode_vec(body).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;
        let forged = format!("{HEADER}{}", Base64UrlUnpadded::encode_string(&sealed));

        assert!(matches!(maker.verify(&forged), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn token_from_other_key_is_invalid() {
        let other = TokenMaker::new(b"fedcba9876543210fedcba9876543210").unwrap();
        let token = other.create(UserId(7), Duration::minutes(5)).unwrap();
        assert!(matches!(maker().verify(&token), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn garbage_is_invalid() {
        let maker = maker();
        for garbage in [
            "",
            "garbage",
            "keeper.local.",
            "keeper.local.!!!",
            "keeper.local.AAAA",
        ] {
            assert!(
                matches!(maker.verify(garbage), Err(TokenError::InvalidToken)),
                "{garbage:?} must be rejected as invalid"
            );
        }
    }
}
