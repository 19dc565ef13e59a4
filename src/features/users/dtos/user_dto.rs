use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::{User, UserRole};

/// Response DTO for a user account (never exposes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// Technician entry for the admin assignment picker, with a hint about the
/// tasks currently on their plate
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct TechnicianDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub open_tasks: i64,
}
