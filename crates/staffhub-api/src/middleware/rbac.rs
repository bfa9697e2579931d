//! Coarse role guards applied in handlers before calling services.

use staffhub_core::error::AppError;

use crate::extractors::Actor;

/// Checks that the caller is an admin.
pub fn require_admin(actor: &Actor) -> Result<(), AppError> {
    if !actor.is_admin() {
        return Err(AppError::authorization("Admin access required"));
    }
    Ok(())
}

/// Checks that the caller is at least a manager.
pub fn require_manager(actor: &Actor) -> Result<(), AppError> {
    if !actor.is_manager_or_above() {
        return Err(AppError::authorization("Manager or Admin access required"));
    }
    Ok(())
}
