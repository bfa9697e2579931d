//! Request context carrying the acting user and their role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffhub_core::error::AppError;
use staffhub_core::types::UserId;
use staffhub_entity::user::UserRole;

/// Who is performing the current operation.
///
/// Built from the gateway-supplied identity headers and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// The acting user's role.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user is at least a manager.
    pub fn is_manager_or_above(&self) -> bool {
        self.role.is_manager_or_above()
    }

    /// The owner filter for list queries: `None` when the user sees every
    /// row, otherwise their own ID.
    pub fn visibility_scope(&self) -> Option<UserId> {
        if self.is_manager_or_above() {
            None
        } else {
            Some(self.user_id)
        }
    }

    /// Whether the user may see a row owned by any of `owners`.
    pub fn can_access(&self, owners: &[Option<UserId>]) -> bool {
        self.is_manager_or_above() || owners.iter().flatten().any(|o| *o == self.user_id)
    }

    /// Fail with 403 unless [`Self::can_access`] holds.
    pub fn ensure_access(&self, owners: &[Option<UserId>], what: &str) -> Result<(), AppError> {
        if self.can_access(owners) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "You do not have access to this {what}"
            )))
        }
    }

    /// Fail with 403 unless the user is a manager or admin.
    pub fn require_manager(&self, action: &str) -> Result<(), AppError> {
        if self.is_manager_or_above() {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Only managers and admins can {action}"
            )))
        }
    }

    /// Fail with 403 unless the user is an admin.
    pub fn require_admin(&self, action: &str) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization(format!("Only admins can {action}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffhub_core::error::ErrorKind;

    #[test]
    fn test_managers_see_everything() {
        let ctx = RequestContext::new(UserId::new(), UserRole::Manager);
        assert_eq!(ctx.visibility_scope(), None);
        assert!(ctx.can_access(&[Some(UserId::new())]));
        assert!(ctx.can_access(&[None]));
    }

    #[test]
    fn test_recruiter_sees_own_rows() {
        let me = UserId::new();
        let ctx = RequestContext::new(me, UserRole::Recruiter);
        assert_eq!(ctx.visibility_scope(), Some(me));
        assert!(ctx.can_access(&[Some(UserId::new()), Some(me)]));
        assert!(!ctx.can_access(&[Some(UserId::new()), None]));
        let err = ctx.ensure_access(&[None], "task").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_role_gates() {
        let viewer = RequestContext::new(UserId::new(), UserRole::Viewer);
        assert!(viewer.require_manager("approve transfers").is_err());
        let manager = RequestContext::new(UserId::new(), UserRole::Manager);
        assert!(manager.require_manager("approve transfers").is_ok());
        assert!(manager.require_admin("delete users").is_err());
    }
}
