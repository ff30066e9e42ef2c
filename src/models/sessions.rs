use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::sessions;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub login_time: NaiveDateTime,
}
