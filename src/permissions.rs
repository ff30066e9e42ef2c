//! Reine Berechtigungsprüfungen über Aufrufer und Termin. Kein I/O,
//! keine Seitenwirkungen; ein nicht angemeldeter Aufrufer kommt gar
//! nicht erst bis hierher.

use crate::identity::Caller;
use crate::models::termine::Termin;

pub const ADMIN_GROUP: &str = "admin";

/// Rolle eines Aufrufers, einmal pro Anfrage aus den Benutzerattributen
/// abgeleitet und explizit an die Operationen durchgereicht.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Patient,
}

impl Role {
    pub fn derive(is_staff: bool, groups: &[String]) -> Role {
        if is_staff || groups.iter().any(|g| g == ADMIN_GROUP) {
            Role::Admin
        } else {
            Role::Patient
        }
    }
}

pub fn is_admin(caller: &Caller) -> bool {
    caller.role == Role::Admin
}

pub fn is_patient(caller: &Caller) -> bool {
    caller.role == Role::Patient
}

pub fn is_owner_or_admin(caller: &Caller, termin: &Termin) -> bool {
    is_admin(caller) || termin.patient_email.as_deref() == Some(caller.email.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::termine::STATUS_GEBUCHT;

    fn caller(email: &str, is_staff: bool, groups: &[&str]) -> Caller {
        let groups: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
        Caller {
            id: 1,
            username: "test".to_string(),
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "Person".to_string(),
            is_staff,
            is_superuser: false,
            role: Role::derive(is_staff, &groups),
            groups,
        }
    }

    fn gebuchter_termin(patient_email: Option<&str>) -> Termin {
        let jetzt = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Termin {
            id: 7,
            titel: "Routineuntersuchung".to_string(),
            beschreibung: None,
            datum: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            uhrzeit: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            dauer_minuten: 30,
            patient_name: patient_email.map(|_| "Max Mustermann".to_string()),
            patient_email: patient_email.map(|e| e.to_string()),
            patient_telefon: None,
            status: STATUS_GEBUCHT.to_string(),
            erstellt_am: jetzt,
            aktualisiert_am: jetzt,
        }
    }

    #[test]
    fn staff_flag_macht_admin() {
        let c = caller("a@x.com", true, &[]);
        assert!(is_admin(&c));
        assert!(!is_patient(&c));
    }

    #[test]
    fn admin_gruppe_macht_admin() {
        let c = caller("a@x.com", false, &["admin"]);
        assert!(is_admin(&c));
    }

    #[test]
    fn andere_gruppen_machen_keinen_admin() {
        let c = caller("a@x.com", false, &["patient"]);
        assert!(is_patient(&c));
        assert!(!is_admin(&c));
    }

    #[test]
    fn besitzer_wird_an_der_email_erkannt() {
        let c = caller("patient1@example.com", false, &["patient"]);
        assert!(is_owner_or_admin(
            &c,
            &gebuchter_termin(Some("patient1@example.com"))
        ));
        assert!(!is_owner_or_admin(
            &c,
            &gebuchter_termin(Some("patient2@example.com"))
        ));
    }

    #[test]
    fn freier_termin_hat_keinen_besitzer() {
        let c = caller("patient1@example.com", false, &["patient"]);
        assert!(!is_owner_or_admin(&c, &gebuchter_termin(None)));
    }

    #[test]
    fn admin_ist_immer_besitzer() {
        let c = caller("admin@example.com", true, &[]);
        assert!(is_owner_or_admin(
            &c,
            &gebuchter_termin(Some("patient1@example.com"))
        ));
    }
}
