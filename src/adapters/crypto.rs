// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-CBC value masking adapter.
//!
//! This module provides the `ValueCipher` type, which turns individual values
//! into opaque hex tokens and back. Masking is explicit: the store never
//! encrypts whole documents, only the values the caller asks it to, and the
//! resulting token can be stored under any key like an ordinary string.
//!
//! It is gated behind the `crypto` feature flag.

use crate::domain::{Result, StoreError};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;
use std::fmt;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Number of raw key bytes required by AES-256.
pub const KEY_LEN: usize = 32;

/// Initialization vector length for AES-CBC, in bytes.
const IV_LEN: usize = 16;

/// Encrypts and decrypts individual settings values.
///
/// A token is the lowercase hex rendering of a fresh random initialization
/// vector followed by the hex rendering of the PKCS#7-padded ciphertext. The
/// plaintext is the compact JSON rendering of the value, so any JSON-shaped
/// value survives the round trip with its type intact.
///
/// Masking the same value twice yields different tokens, because every call
/// draws a new initialization vector from the operating system.
///
/// # Examples
///
/// ```
/// use appsave::adapters::ValueCipher;
/// use serde_json::json;
///
/// let cipher = ValueCipher::new("0123456789abcdef0123456789abcdef").unwrap();
/// let token = cipher.mask(&json!({"user": "ana", "pin": 1234})).unwrap();
/// assert_eq!(cipher.unmask(&token).unwrap(), json!({"user": "ana", "pin": 1234}));
/// ```
pub struct ValueCipher {
    key: [u8; KEY_LEN],
}

impl ValueCipher {
    /// Creates a cipher from a key string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKeyLength`] unless the key is exactly
    /// 32 bytes long.
    pub fn new(key: &str) -> Result<Self> {
        let bytes = key.as_bytes();
        if bytes.len() != KEY_LEN {
            return Err(StoreError::InvalidKeyLength {
                length: bytes.len(),
            });
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(ValueCipher { key })
    }

    /// Encrypts a value into an opaque hex token.
    pub fn mask(&self, value: &Value) -> Result<String> {
        let plaintext = serde_json::to_string(value)
            .map_err(|e| StoreError::crypto(format!("value cannot be rendered as JSON: {}", e)))?;

        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut token = hex::encode(iv);
        token.push_str(&hex::encode(ciphertext));
        Ok(token)
    }

    /// Decrypts a token produced by [`ValueCipher::mask`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Crypto`] when the token is not hex, is too short
    /// to hold an initialization vector, or does not decrypt to valid JSON
    /// under this key.
    pub fn unmask(&self, token: &str) -> Result<Value> {
        let raw = hex::decode(token).map_err(|_| StoreError::crypto("token is not valid hex"))?;
        if raw.len() < IV_LEN {
            return Err(StoreError::crypto(
                "token is shorter than an initialization vector",
            ));
        }
        let (iv, ciphertext) = raw.split_at(IV_LEN);

        let decryptor = Aes256CbcDec::new_from_slices(&self.key, iv)
            .map_err(|_| StoreError::crypto("malformed initialization vector"))?;
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| StoreError::crypto("decryption failed; wrong key or corrupted token"))?;

        let text = String::from_utf8(plaintext)
            .map_err(|_| StoreError::crypto("decrypted bytes are not valid UTF-8"))?;
        serde_json::from_str(&text)
            .map_err(|_| StoreError::crypto("decrypted text is not valid JSON"))
    }
}

impl fmt::Debug for ValueCipher {
    // Never print key material.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCipher").finish_non_exhaustive()
    }
}
