use serde::Serialize;

use crate::identity::Caller;
use crate::permissions;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub groups: Vec<String>,
    pub is_admin: bool,
}

impl From<Caller> for CurrentUserResponse {
    fn from(caller: Caller) -> Self {
        let is_admin = permissions::is_admin(&caller);
        CurrentUserResponse {
            id: caller.id,
            username: caller.username,
            email: caller.email,
            first_name: caller.first_name,
            last_name: caller.last_name,
            is_staff: caller.is_staff,
            is_superuser: caller.is_superuser,
            groups: caller.groups,
            is_admin,
        }
    }
}
