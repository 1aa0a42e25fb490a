//! Authenticated requester, attached to request extensions by the
//! authorization middleware.

use kernel::id::UserId;
use serde::Serialize;

use crate::domain::value_object::user_role::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Identity {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owners act on their own resources; administrators act on anyone's.
    pub fn can_act_for(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.user_id == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_act_for() {
        let owner = UserId::new();
        let provider = Identity::new(owner, UserRole::Provider);
        let stranger = Identity::new(UserId::new(), UserRole::Provider);
        let admin = Identity::new(UserId::new(), UserRole::Administrator);

        assert!(provider.can_act_for(&owner));
        assert!(!stranger.can_act_for(&owner));
        assert!(admin.can_act_for(&owner));
    }
}
