mod requests;
mod responses;

use actix_web::{delete, get, patch, post, put, web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use crate::{
    database::get_db_conn,
    error::ServiceError,
    identity::{caller_from_request, Caller},
    models::termine::{NewTermin, Termin, UpdateTermin, STATUS_FREI, STATUS_GEBUCHT},
    permissions,
    utils::{assert_status_str, parse_datum_str},
    DbPool,
};

use self::requests::*;
use self::responses::*;

pub fn config(cfg: &mut web::ServiceConfig) {
    // Literal-Pfade vor den {id}-Routen registrieren.
    cfg.service(list)
        .service(create)
        .service(verfuegbar)
        .service(benutzer)
        .service(buchen)
        .service(retrieve)
        .service(update)
        .service(update_partial)
        .service(remove);
}

fn require_admin(caller: &Caller) -> Result<(), ServiceError> {
    if !permissions::is_admin(caller) {
        return Err(ServiceError::Forbidden(
            "Sie haben keine Berechtigung, diese Aktion auszuführen.".to_string(),
        ));
    }
    Ok(())
}

/// Admins sehen alle Termine, Patienten nur ihre eigenen.
#[get("/")]
async fn list(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    let query = query.into_inner();

    let datum = query.datum.as_deref().map(parse_datum_str).transpose()?;
    if let Some(status) = &query.status {
        assert_status_str(status)?;
    }
    let nur_eigene = if permissions::is_admin(&caller) {
        None
    } else {
        Some(caller.email.clone())
    };

    let mut conn = get_db_conn(&pool)?;
    let termine =
        web::block(move || load_termine(&mut conn, nur_eigene, datum, query.status)).await??;

    Ok(HttpResponse::Ok().json(to_responses(termine)))
}

#[post("/")]
async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    form: web::Json<TerminForm>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    require_admin(&caller)?;

    let neu = form.into_inner().into_new_termin()?;
    let mut conn = get_db_conn(&pool)?;
    let termin = web::block(move || insert_termin(&mut conn, neu)).await??;

    Ok(HttpResponse::Ok().json(TerminResponse::from(termin)))
}

/// Alle freien Termine, unabhängig von der Rolle des Aufrufers.
#[get("/verfuegbar/")]
async fn verfuegbar(req: HttpRequest, pool: web::Data<DbPool>) -> Result<HttpResponse, ServiceError> {
    caller_from_request(&req, &pool).await?;

    let mut conn = get_db_conn(&pool)?;
    let termine = web::block(move || {
        load_termine(&mut conn, None, None, Some(STATUS_FREI.to_string()))
    })
    .await??;

    Ok(HttpResponse::Ok().json(to_responses(termine)))
}

/// Alle Termine eines Benutzers (nach E-Mail), unabhängig vom Status.
#[get("/benutzer/{email}/")]
async fn benutzer(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;

    // Der Pfadparameter kann (doppelt) URL-kodiert ankommen.
    let email = path.into_inner();
    let email = match urlencoding::decode(&email) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => email,
    };
    tracing::debug!(%email, "Anfrage für Benutzertermine");

    if !(permissions::is_admin(&caller) || caller.email == email) {
        return Err(ServiceError::Forbidden(
            "Sie haben keine Berechtigung, diese Termine einzusehen.".to_string(),
        ));
    }

    let mut conn = get_db_conn(&pool)?;
    let termine = web::block(move || load_termine(&mut conn, Some(email), None, None)).await??;

    Ok(HttpResponse::Ok().json(to_responses(termine)))
}

#[post("/{id}/buchen/")]
async fn buchen(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<u64>,
    buchung: web::Json<BuchenRequest>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    let id = path.into_inner();
    let buchung = buchung.into_inner();

    let email = caller.email.clone();
    let mut conn = get_db_conn(&pool)?;
    let termin = web::block(move || buche_termin(&mut conn, id, buchung, email)).await??;

    tracing::info!(id, patient = %caller.email, "Termin gebucht");
    Ok(HttpResponse::Ok().json(TerminResponse::from(termin)))
}

#[get("/{id}/")]
async fn retrieve(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    let id = path.into_inner();

    let mut conn = get_db_conn(&pool)?;
    let termin = web::block(move || load_termin(&mut conn, id)).await??;

    if !permissions::is_owner_or_admin(&caller, &termin) {
        return Err(ServiceError::Forbidden(
            "Sie haben keine Berechtigung, diesen Termin einzusehen.".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(TerminResponse::from(termin)))
}

#[put("/{id}/")]
async fn update(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<u64>,
    form: web::Json<TerminForm>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    require_admin(&caller)?;

    let id = path.into_inner();
    let changes = form.into_inner().into_update()?;
    let mut conn = get_db_conn(&pool)?;
    let termin = web::block(move || update_termin(&mut conn, id, changes)).await??;

    Ok(HttpResponse::Ok().json(TerminResponse::from(termin)))
}

#[patch("/{id}/")]
async fn update_partial(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<u64>,
    form: web::Json<TerminUpdateForm>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    require_admin(&caller)?;

    let id = path.into_inner();
    let changes = form.into_inner().into_update()?;
    let mut conn = get_db_conn(&pool)?;
    let termin = web::block(move || update_termin(&mut conn, id, changes)).await??;

    Ok(HttpResponse::Ok().json(TerminResponse::from(termin)))
}

#[delete("/{id}/")]
async fn remove(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let caller = caller_from_request(&req, &pool).await?;
    require_admin(&caller)?;

    let id = path.into_inner();
    let mut conn = get_db_conn(&pool)?;
    web::block(move || delete_termin(&mut conn, id)).await??;

    Ok(HttpResponse::NoContent().finish())
}

fn to_responses(termine: Vec<Termin>) -> Vec<TerminResponse> {
    termine.into_iter().map(TerminResponse::from).collect()
}

fn load_termine(
    conn: &mut MysqlConnection,
    patient_email: Option<String>,
    datum: Option<NaiveDate>,
    status: Option<String>,
) -> Result<Vec<Termin>, ServiceError> {
    use crate::schema::termine;

    let mut query = termine::table.into_boxed();
    if let Some(email) = patient_email {
        query = query.filter(termine::patient_email.eq(email));
    }
    if let Some(datum) = datum {
        query = query.filter(termine::datum.eq(datum));
    }
    if let Some(status) = status {
        query = query.filter(termine::status.eq(status));
    }

    let termine = query
        .order((termine::datum.asc(), termine::uhrzeit.asc()))
        .load::<Termin>(conn)?;
    Ok(termine)
}

fn load_termin(conn: &mut MysqlConnection, id: u64) -> Result<Termin, ServiceError> {
    use crate::schema::termine;

    termine::table
        .find(id)
        .first::<Termin>(conn)
        .optional()?
        .ok_or_else(|| ServiceError::NotFound("Termin nicht gefunden.".to_string()))
}

fn insert_termin(conn: &mut MysqlConnection, neu: NewTermin) -> Result<Termin, ServiceError> {
    use crate::schema::termine;

    conn.transaction(|conn| {
        // Slot-Prüfung unabhängig vom Status des vorhandenen Termins.
        let belegt = termine::table
            .filter(termine::datum.eq(neu.datum))
            .filter(termine::uhrzeit.eq(neu.uhrzeit))
            .count()
            .get_result::<i64>(conn)?;
        if belegt > 0 {
            return Err(ServiceError::Validation(
                "Dieser Termin ist bereits vergeben.".to_string(),
            ));
        }

        diesel::insert_into(termine::table)
            .values(&neu)
            .execute(conn)?;

        let termin = termine::table
            .filter(termine::datum.eq(neu.datum))
            .filter(termine::uhrzeit.eq(neu.uhrzeit))
            .first::<Termin>(conn)?;
        Ok(termin)
    })
}

fn update_termin(
    conn: &mut MysqlConnection,
    id: u64,
    changes: UpdateTermin,
) -> Result<Termin, ServiceError> {
    use crate::schema::termine;

    conn.transaction(|conn| {
        let bestehend = termine::table
            .find(id)
            .first::<Termin>(conn)
            .optional()?
            .ok_or_else(|| ServiceError::NotFound("Termin nicht gefunden.".to_string()))?;

        let datum = changes.datum.unwrap_or(bestehend.datum);
        let uhrzeit = changes.uhrzeit.unwrap_or(bestehend.uhrzeit);
        let konflikt = termine::table
            .filter(termine::datum.eq(datum))
            .filter(termine::uhrzeit.eq(uhrzeit))
            .filter(termine::id.ne(id))
            .count()
            .get_result::<i64>(conn)?;
        if konflikt > 0 {
            return Err(ServiceError::Validation(
                "Dieser Termin ist bereits vergeben.".to_string(),
            ));
        }

        diesel::update(termine::table.find(id))
            .set(&changes)
            .execute(conn)?;

        let termin = termine::table.find(id).first::<Termin>(conn)?;
        Ok(termin)
    })
}

fn delete_termin(conn: &mut MysqlConnection, id: u64) -> Result<(), ServiceError> {
    use crate::schema::termine;

    let geloescht = diesel::delete(termine::table.find(id)).execute(conn)?;
    if geloescht == 0 {
        return Err(ServiceError::NotFound("Termin nicht gefunden.".to_string()));
    }
    Ok(())
}

/// Bucht einen noch freien Termin. Die Statusprüfung läuft innerhalb der
/// Transaktion mit Zeilensperre; von zwei gleichzeitigen Buchungen gewinnt
/// genau eine, die andere erhält den Konfliktfehler.
fn buche_termin(
    conn: &mut MysqlConnection,
    id: u64,
    buchung: BuchenRequest,
    caller_email: String,
) -> Result<Termin, ServiceError> {
    use crate::schema::termine;

    conn.transaction(|conn| {
        let termin = termine::table
            .find(id)
            .for_update()
            .first::<Termin>(conn)
            .optional()?
            .ok_or_else(|| ServiceError::NotFound("Termin nicht gefunden.".to_string()))?;

        assert_buchbar(&termin)?;

        // patient_email kommt vom angemeldeten Aufrufer, nie aus dem Body.
        diesel::update(termine::table.find(id))
            .set((
                termine::patient_name.eq(buchung.patient_name),
                termine::patient_email.eq(Some(caller_email)),
                termine::patient_telefon.eq(buchung.patient_phone),
                termine::status.eq(STATUS_GEBUCHT),
                termine::aktualisiert_am.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        let termin = termine::table.find(id).first::<Termin>(conn)?;
        Ok(termin)
    })
}

fn assert_buchbar(termin: &Termin) -> Result<(), ServiceError> {
    if termin.status != STATUS_FREI {
        return Err(ServiceError::Validation(
            "Dieser Termin ist nicht mehr verfügbar.".to_string(),
        ));
    }
    Ok(())
}
