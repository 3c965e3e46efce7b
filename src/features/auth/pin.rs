use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Keyed digest of staff PINs; only the digest is stored
pub struct PinHasher {
    pepper: Vec<u8>,
}

impl PinHasher {
    pub fn new(pepper: &str) -> Self {
        Self {
            pepper: pepper.as_bytes().to_vec(),
        }
    }

    /// hex(HMAC-SHA256(pepper, pin))
    pub fn digest(&self, pin: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.pepper)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(pin.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_hex() {
        let hasher = PinHasher::new("pepper");
        let a = hasher.digest("123456").unwrap();
        let b = hasher.digest("123456").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_depends_on_pin_and_pepper() {
        let hasher = PinHasher::new("pepper");
        assert_ne!(
            hasher.digest("123456").unwrap(),
            hasher.digest("654321").unwrap()
        );
        assert_ne!(
            hasher.digest("123456").unwrap(),
            PinHasher::new("other").digest("123456").unwrap()
        );
    }
}
