use diesel::prelude::*;

use crate::schema::user_groups;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = user_groups)]
pub struct UserGroup {
    pub user_id: u64,
    pub group_name: String,
}
