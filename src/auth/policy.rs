use uuid::Uuid;

use super::{Identity, Role};
use crate::error::{AppError, AppResult, ACCESS_DENIED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Decide whether `caller` may mutate a record owned by `owner`.
///
/// Admins may act on anything. Everyone else must be the resolved owner; an
/// unresolvable owner (no profile, dangling reference) is a plain denial.
pub fn authorize(role: Role, caller: Uuid, owner: Option<Uuid>) -> Decision {
    match role {
        Role::Admin => Decision::Allow,
        Role::User if owner == Some(caller) => Decision::Allow,
        Role::User => Decision::Deny,
    }
}

/// [`authorize`] as a `Result`, with the generic denial message
pub fn ensure_allowed(identity: &Identity, owner: Option<Uuid>) -> AppResult<()> {
    match authorize(identity.role, identity.user_id, owner) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(AppError::Forbidden(ACCESS_DENIED)),
    }
}

pub fn require_admin(identity: &Identity) -> AppResult<()> {
    if identity.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("admin only"))
    }
}
