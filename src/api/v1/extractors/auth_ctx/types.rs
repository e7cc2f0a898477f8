/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型 (principal)
 * - access middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - roles は毎リクエスト credential store から読み直した値 (token claim ではない)
 */

use uuid::Uuid;

use crate::repos::user_repo::{Role, RoleSet, UserRecord};

/// Principal attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub email: String,
    pub roles: RoleSet,
}

impl AuthCtx {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<UserRecord> for AuthCtx {
    fn from(user: UserRecord) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            roles: user.roles,
        }
    }
}
