use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::model::AuthenticatedUser;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::staff::{Staff, StaffRole};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    role: StaffRole,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 access tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(config.jwt_secret.as_bytes(), config.token_ttl)
    }

    pub fn from_secret(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.as_secs() as i64
    }

    pub fn issue(&self, staff: &Staff) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: staff.id.to_string(),
            name: staff.name.clone(),
            role: staff.role,
            iat: now,
            exp: now + self.ttl_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let staff_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(AuthenticatedUser {
            staff_id,
            name: data.claims.name,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(role: StaffRole) -> Staff {
        Staff {
            id: Uuid::new_v4(),
            name: "สมชาย ใจดี".to_string(),
            role,
            pin_hash: "digest".to_string(),
            phone: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let service = JwtService::from_secret(b"test-secret", Duration::from_secs(3600));
        let staff = staff(StaffRole::Approver);

        let token = service.issue(&staff).unwrap();
        let user = service.verify(&token).unwrap();

        assert_eq!(user.staff_id, staff.id);
        assert_eq!(user.name, staff.name);
        assert_eq!(user.role, StaffRole::Approver);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let issuer = JwtService::from_secret(b"secret-a", Duration::from_secs(3600));
        let verifier = JwtService::from_secret(b"secret-b", Duration::from_secs(3600));

        let token = issuer.issue(&staff(StaffRole::Sale)).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = JwtService::from_secret(b"test-secret", Duration::from_secs(3600));
        let past = Utc::now().timestamp() - 7200;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            name: "old".to_string(),
            role: StaffRole::Sale,
            iat: past,
            exp: past + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let service = JwtService::from_secret(b"test-secret", Duration::from_secs(3600));
        assert!(service.verify("not.a.token").is_err());
    }
}
