use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::schema::termine;

pub const STATUS_FREI: &str = "frei";
pub const STATUS_GEBUCHT: &str = "gebucht";

#[derive(Debug, Clone, Queryable)]
pub struct Termin {
    pub id: u64,
    pub titel: String,
    pub beschreibung: Option<String>,
    pub datum: NaiveDate,
    pub uhrzeit: NaiveTime,
    pub dauer_minuten: i32,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_telefon: Option<String>,
    pub status: String,
    pub erstellt_am: NaiveDateTime,
    pub aktualisiert_am: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = termine)]
pub struct NewTermin {
    pub titel: String,
    pub beschreibung: Option<String>,
    pub datum: NaiveDate,
    pub uhrzeit: NaiveTime,
    pub dauer_minuten: i32,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_telefon: Option<String>,
    pub status: String,
    pub erstellt_am: NaiveDateTime,
    pub aktualisiert_am: NaiveDateTime,
}

/// Changeset für Admin-Änderungen; `aktualisiert_am` wird immer mitgeschrieben.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = termine)]
pub struct UpdateTermin {
    pub titel: Option<String>,
    pub beschreibung: Option<String>,
    pub datum: Option<NaiveDate>,
    pub uhrzeit: Option<NaiveTime>,
    pub dauer_minuten: Option<i32>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_telefon: Option<String>,
    pub status: Option<String>,
    pub aktualisiert_am: NaiveDateTime,
}
