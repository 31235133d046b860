use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("invalid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("key must be {KEY_LEN} bytes, got {0}")]
    KeyLength(usize),

    #[error("sealed secret is too short")]
    Truncated,

    #[error("decryption failed")]
    Decrypt,

    #[error("encryption failed")]
    Encrypt,

    #[error("secret is not valid UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

pub trait KeyManagement: Send + Sync {
    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, SecretError>;
}

pub struct AesGcmKeyring {
    cipher: Aes256Gcm,
}

impl AesGcmKeyring {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    pub fn from_base64(encoded: &str) -> Result<Self, SecretError> {
        let bytes = BASE64.decode(encoded.trim())?;
        let key: [u8; KEY_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| SecretError::KeyLength(bytes.len()))?;
        Ok(Self::new(&key))
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, SecretError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| SecretError::Encrypt)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }
}

impl KeyManagement for AesGcmKeyring {
    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, SecretError> {
        if sealed.len() <= NONCE_LEN {
            return Err(SecretError::Truncated);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SecretError::Decrypt)
    }
}

pub fn open_sealed_secret(kms: &dyn KeyManagement, encoded: &str) -> Result<String, SecretError> {
    let sealed = BASE64.decode(encoded.trim())?;
    let plaintext = kms.decrypt(&sealed)?;
    Ok(String::from_utf8(plaintext)?)
}

pub fn seal_secret(keyring: &AesGcmKeyring, plaintext: &str) -> Result<String, SecretError> {
    Ok(BASE64.encode(keyring.seal(plaintext.as_bytes())?))
}
