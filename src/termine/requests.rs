use chrono::Utc;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::models::termine::{NewTermin, UpdateTermin, STATUS_FREI};
use crate::utils::{assert_status_str, parse_datum_str, parse_uhrzeit_str};

/// Vollständige Termindaten für POST und PUT.
#[derive(Debug, Deserialize)]
pub struct TerminForm {
    pub titel: String,
    #[serde(default)]
    pub beschreibung: Option<String>,
    pub datum: String,
    pub uhrzeit: String,
    #[serde(default = "default_dauer_minuten")]
    pub dauer_minuten: i32,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_email: Option<String>,
    #[serde(default)]
    pub patient_telefon: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_dauer_minuten() -> i32 {
    30
}

fn default_status() -> String {
    STATUS_FREI.to_string()
}

impl TerminForm {
    pub fn into_new_termin(self) -> Result<NewTermin, ServiceError> {
        assert_status_str(&self.status)?;
        let jetzt = Utc::now().naive_utc();
        Ok(NewTermin {
            titel: self.titel,
            beschreibung: self.beschreibung,
            datum: parse_datum_str(&self.datum)?,
            uhrzeit: parse_uhrzeit_str(&self.uhrzeit)?,
            dauer_minuten: self.dauer_minuten,
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            patient_telefon: self.patient_telefon,
            status: self.status,
            erstellt_am: jetzt,
            aktualisiert_am: jetzt,
        })
    }

    pub fn into_update(self) -> Result<UpdateTermin, ServiceError> {
        assert_status_str(&self.status)?;
        Ok(UpdateTermin {
            titel: Some(self.titel),
            beschreibung: self.beschreibung,
            datum: Some(parse_datum_str(&self.datum)?),
            uhrzeit: Some(parse_uhrzeit_str(&self.uhrzeit)?),
            dauer_minuten: Some(self.dauer_minuten),
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            patient_telefon: self.patient_telefon,
            status: Some(self.status),
            aktualisiert_am: Utc::now().naive_utc(),
        })
    }
}

/// Teilmenge der Termindaten für PATCH; fehlende Felder bleiben unverändert.
#[derive(Debug, Deserialize)]
pub struct TerminUpdateForm {
    pub titel: Option<String>,
    pub beschreibung: Option<String>,
    pub datum: Option<String>,
    pub uhrzeit: Option<String>,
    pub dauer_minuten: Option<i32>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_telefon: Option<String>,
    pub status: Option<String>,
}

impl TerminUpdateForm {
    pub fn into_update(self) -> Result<UpdateTermin, ServiceError> {
        if let Some(status) = &self.status {
            assert_status_str(status)?;
        }
        Ok(UpdateTermin {
            titel: self.titel,
            beschreibung: self.beschreibung,
            datum: self.datum.as_deref().map(parse_datum_str).transpose()?,
            uhrzeit: self.uhrzeit.as_deref().map(parse_uhrzeit_str).transpose()?,
            dauer_minuten: self.dauer_minuten,
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            patient_telefon: self.patient_telefon,
            status: self.status,
            aktualisiert_am: Utc::now().naive_utc(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BuchenRequest {
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub datum: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    #[test]
    fn form_mit_standardwerten() {
        let form: TerminForm = serde_json::from_value(json!({
            "titel": "Routineuntersuchung",
            "datum": "2024-01-10",
            "uhrzeit": "09:00"
        }))
        .unwrap();
        let neu = form.into_new_termin().unwrap();
        assert_eq!(neu.dauer_minuten, 30);
        assert_eq!(neu.status, STATUS_FREI);
        assert_eq!(neu.datum, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(neu.uhrzeit, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(neu.erstellt_am, neu.aktualisiert_am);
        assert!(neu.patient_email.is_none());
    }

    #[test]
    fn unbekannter_status_wird_abgelehnt() {
        let form: TerminForm = serde_json::from_value(json!({
            "titel": "Beratung",
            "datum": "2024-01-10",
            "uhrzeit": "10:00",
            "status": "abgesagt"
        }))
        .unwrap();
        assert!(form.into_new_termin().is_err());
    }

    #[test]
    fn kaputtes_datum_wird_abgelehnt() {
        let form: TerminForm = serde_json::from_value(json!({
            "titel": "Beratung",
            "datum": "10.01.2024",
            "uhrzeit": "10:00"
        }))
        .unwrap();
        assert!(form.into_new_termin().is_err());
    }

    #[test]
    fn patch_ohne_felder_setzt_nur_aktualisiert_am() {
        let form: TerminUpdateForm = serde_json::from_value(json!({})).unwrap();
        let update = form.into_update().unwrap();
        assert!(update.titel.is_none());
        assert!(update.datum.is_none());
        assert!(update.status.is_none());
    }

    #[test]
    fn patch_parst_datum_und_uhrzeit() {
        let form: TerminUpdateForm = serde_json::from_value(json!({
            "datum": "2024-02-01",
            "uhrzeit": "14:30"
        }))
        .unwrap();
        let update = form.into_update().unwrap();
        assert_eq!(update.datum, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(update.uhrzeit, NaiveTime::from_hms_opt(14, 30, 0));
    }

    #[test]
    fn buchen_ohne_telefon_ist_erlaubt() {
        let req: BuchenRequest =
            serde_json::from_value(json!({ "patient_name": "Max" })).unwrap();
        assert_eq!(req.patient_name.as_deref(), Some("Max"));
        assert!(req.patient_phone.is_none());
    }
}
