use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, MeResponseDto};
use crate::features::auth::{JwtService, PinHasher};
use crate::features::staff::StaffService;

/// PIN login backed by the staff directory
pub struct AuthService {
    staff_service: Arc<StaffService>,
    jwt: Arc<JwtService>,
    pin_hasher: PinHasher,
}

impl AuthService {
    pub fn new(staff_service: Arc<StaffService>, jwt: Arc<JwtService>, pin_hasher: PinHasher) -> Self {
        Self {
            staff_service,
            jwt,
            pin_hasher,
        }
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let digest = self.pin_hasher.digest(&dto.pin)?;

        let staff = self
            .staff_service
            .find_by_pin_hash(&digest)
            .await?
            .ok_or_else(|| {
                tracing::info!("Login rejected: unknown PIN");
                AppError::Unauthorized("Invalid PIN".to_string())
            })?;

        let access_token = self.jwt.issue(&staff)?;
        tracing::info!(staff_id = %staff.id, role = %staff.role, "Staff signed in");

        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.ttl_secs(),
            user: MeResponseDto::from(&staff),
        })
    }
}
