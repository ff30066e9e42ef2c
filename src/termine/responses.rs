use serde::Serialize;

use crate::models::termine::Termin;
use crate::utils::{format_datum, format_uhrzeit, format_zeitstempel};

#[derive(Debug, Serialize)]
pub struct TerminResponse {
    pub id: u64,
    pub titel: String,
    pub beschreibung: Option<String>,
    pub datum: String,
    pub uhrzeit: String,
    pub dauer_minuten: i32,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_telefon: Option<String>,
    pub status: String,
    pub erstellt_am: String,
    pub aktualisiert_am: String,
}

impl From<Termin> for TerminResponse {
    fn from(termin: Termin) -> Self {
        TerminResponse {
            id: termin.id,
            titel: termin.titel,
            beschreibung: termin.beschreibung,
            datum: format_datum(&termin.datum),
            uhrzeit: format_uhrzeit(&termin.uhrzeit),
            dauer_minuten: termin.dauer_minuten,
            patient_name: termin.patient_name,
            patient_email: termin.patient_email,
            patient_telefon: termin.patient_telefon,
            status: termin.status,
            erstellt_am: format_zeitstempel(&termin.erstellt_am),
            aktualisiert_am: format_zeitstempel(&termin.aktualisiert_am),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::termine::STATUS_GEBUCHT;

    #[test]
    fn antwort_enthaelt_alle_felder() {
        let erstellt = NaiveDate::from_ymd_opt(2024, 1, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let termin = Termin {
            id: 42,
            titel: "Kontrolluntersuchung".to_string(),
            beschreibung: Some("Nachkontrolle".to_string()),
            datum: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            uhrzeit: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            dauer_minuten: 45,
            patient_name: Some("Max Mustermann".to_string()),
            patient_email: Some("patient1@example.com".to_string()),
            patient_telefon: Some("01234567890".to_string()),
            status: STATUS_GEBUCHT.to_string(),
            erstellt_am: erstellt,
            aktualisiert_am: erstellt,
        };

        let json = serde_json::to_value(TerminResponse::from(termin)).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["titel"], "Kontrolluntersuchung");
        assert_eq!(json["datum"], "2024-01-10");
        assert_eq!(json["uhrzeit"], "09:00:00");
        assert_eq!(json["dauer_minuten"], 45);
        assert_eq!(json["patient_email"], "patient1@example.com");
        assert_eq!(json["status"], "gebucht");
        assert_eq!(json["erstellt_am"], "2024-01-09T12:00:00.000000+00:00");
    }

    #[test]
    fn freier_termin_hat_null_patientenfelder() {
        let erstellt = NaiveDate::from_ymd_opt(2024, 1, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let termin = Termin {
            id: 1,
            titel: "Routineuntersuchung".to_string(),
            beschreibung: None,
            datum: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            uhrzeit: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            dauer_minuten: 30,
            patient_name: None,
            patient_email: None,
            patient_telefon: None,
            status: "frei".to_string(),
            erstellt_am: erstellt,
            aktualisiert_am: erstellt,
        };

        let json = serde_json::to_value(TerminResponse::from(termin)).unwrap();
        assert!(json["patient_name"].is_null());
        assert!(json["patient_email"].is_null());
        assert!(json["patient_telefon"].is_null());
    }
}
