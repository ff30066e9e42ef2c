mod requests;
mod responses;
mod utils;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use serde_json::json;

use crate::{
    database::get_db_conn,
    error::ServiceError,
    identity::{bearer_token, caller_from_request},
    models::{sessions::Session, users::User},
    DbPool,
};

use self::requests::*;
use self::responses::*;
use self::utils::{hash_password, issue_token};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout);
}

#[post("/login")]
async fn login(
    pool: web::Data<DbPool>,
    info: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&pool)?;
    let token = web::block(move || create_session(&mut conn, info)).await??;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

#[post("/logout")]
async fn logout(req: HttpRequest, pool: web::Data<DbPool>) -> Result<HttpResponse, ServiceError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ServiceError::Unauthorized("Anmeldung erforderlich.".to_string()))?;

    let mut conn = get_db_conn(&pool)?;
    web::block(move || delete_session(&mut conn, &token)).await??;

    Ok(HttpResponse::Ok().json(json!({ "detail": "Abgemeldet." })))
}

/// Informationen über den angemeldeten Benutzer samt abgeleiteter Rolle.
#[get("/current-user/")]
pub async fn current_user(
    req: HttpRequest,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    Ok(HttpResponse::Ok().json(CurrentUserResponse::from(caller)))
}

fn create_session(conn: &mut MysqlConnection, info: LoginRequest) -> Result<String, ServiceError> {
    use crate::schema::{sessions, users};

    conn.transaction(|conn| {
        let digest = hash_password(&info.password);
        let user = users::table
            .filter(users::username.eq(&info.username))
            .filter(users::password.eq(&digest))
            .first::<User>(conn)
            .optional()?
            .ok_or_else(|| {
                ServiceError::Unauthorized("Benutzername oder Passwort falsch.".to_string())
            })?;

        let login_time = Utc::now().naive_utc();
        let session = Session {
            token: issue_token(&user.username, &login_time),
            username: user.username,
            login_time,
        };
        diesel::insert_into(sessions::table)
            .values(&session)
            .execute(conn)?;

        Ok(session.token)
    })
}

fn delete_session(conn: &mut MysqlConnection, token: &str) -> Result<usize, ServiceError> {
    use crate::schema::sessions;

    diesel::delete(sessions::table.filter(sessions::token.eq(token)))
        .execute(conn)
        .map_err(ServiceError::from)
}
