use crate::model::{id::UserId, role::Role};

#[derive(Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
