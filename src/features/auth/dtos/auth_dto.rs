use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::staff::{Staff, StaffRole};
use crate::shared::validation::PIN_REGEX;

/// Request DTO for PIN login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(regex(path = *PIN_REGEX, message = "PIN must be exactly 6 digits"))]
    #[schema(example = "123456")]
    pub pin: String,
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// HS256 access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: MeResponseDto,
}

/// Profile of the signed-in staff member
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub id: Uuid,
    pub name: String,
    pub role: StaffRole,
}

impl From<&Staff> for MeResponseDto {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id,
            name: staff.name.clone(),
            role: staff.role,
        }
    }
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.staff_id,
            name: user.name,
            role: user.role,
        }
    }
}
