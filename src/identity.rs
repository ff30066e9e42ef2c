//! Auflösung des Aufrufers aus dem `Authorization`-Header. Die
//! Sitzungs-Token liegen wie beim Login in der `sessions`-Tabelle;
//! abgelaufene oder unbekannte Token führen zu 401.

use actix_web::{http::header, web, HttpRequest};
use chrono::Utc;
use diesel::prelude::*;

use crate::database::get_db_conn;
use crate::error::ServiceError;
use crate::models::{sessions::Session, users::User};
use crate::permissions::Role;
use crate::DbPool;

const MAX_SESSION_AGE_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct Caller {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub groups: Vec<String>,
    pub role: Role,
}

impl Caller {
    pub fn new(user: User, groups: Vec<String>) -> Self {
        let role = Role::derive(user.is_staff, &groups);
        Caller {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            groups,
            role,
        }
    }
}

pub async fn caller_from_request(
    req: &HttpRequest,
    pool: &web::Data<DbPool>,
) -> Result<Caller, ServiceError> {
    let token = bearer_token(req)
        .ok_or_else(|| ServiceError::Unauthorized("Anmeldung erforderlich.".to_string()))?;

    let mut conn = get_db_conn(pool)?;
    let caller = web::block(move || load_caller(&mut conn, &token)).await??;
    Ok(caller)
}

pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    parse_bearer(header).map(str::to_string)
}

fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn load_caller(conn: &mut MysqlConnection, token: &str) -> Result<Caller, ServiceError> {
    use crate::schema::{sessions, user_groups, users};

    let session = sessions::table
        .filter(sessions::token.eq(token))
        .order(sessions::login_time.desc())
        .first::<Session>(conn)
        .optional()?
        .ok_or_else(|| ServiceError::Unauthorized("Sie sind nicht angemeldet.".to_string()))?;

    let age = Utc::now()
        .naive_utc()
        .signed_duration_since(session.login_time);
    if age.num_seconds() > MAX_SESSION_AGE_SECS {
        return Err(ServiceError::Unauthorized(
            "Ihre Sitzung ist abgelaufen.".to_string(),
        ));
    }

    let user = users::table
        .filter(users::username.eq(&session.username))
        .first::<User>(conn)
        .optional()?
        .ok_or_else(|| ServiceError::Unauthorized("Sie sind nicht angemeldet.".to_string()))?;

    let groups = user_groups::table
        .filter(user_groups::user_id.eq(user.id))
        .select(user_groups::group_name)
        .load::<String>(conn)?;

    Ok(Caller::new(user, groups))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_wird_geparst() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("Bearer   abc123  "), Some("abc123"));
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Token abc123"), None);
        assert_eq!(parse_bearer("abc123"), None);
    }

    #[test]
    fn caller_uebernimmt_benutzerdaten() {
        let user = User {
            id: 3,
            username: "patient1".to_string(),
            password: "x".to_string(),
            email: "patient1@example.com".to_string(),
            first_name: "Max".to_string(),
            last_name: "Mustermann".to_string(),
            is_staff: false,
            is_superuser: false,
        };
        let caller = Caller::new(user, vec!["patient".to_string()]);
        assert_eq!(caller.role, Role::Patient);
        assert_eq!(caller.email, "patient1@example.com");
    }
}
