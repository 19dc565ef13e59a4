#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::users::models::UserRole;

#[cfg(test)]
pub fn reporter(id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        name: format!("Reporter {}", id),
        email: format!("reporter{}@campus.test", id),
        role: UserRole::Reporter,
    }
}

#[cfg(test)]
pub fn technician(id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        name: format!("Technician {}", id),
        email: format!("tech{}@campus.test", id),
        role: UserRole::Technician,
    }
}

#[cfg(test)]
pub fn admin(id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        name: format!("Admin {}", id),
        email: format!("admin{}@campus.test", id),
        role: UserRole::Admin,
    }
}
