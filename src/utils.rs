use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ServiceError;
use crate::models::termine::{STATUS_FREI, STATUS_GEBUCHT};

pub fn assert_status_str(status: &str) -> Result<(), ServiceError> {
    if status != STATUS_FREI && status != STATUS_GEBUCHT {
        return Err(ServiceError::Validation(format!(
            "Ungültiger Status '{}', erlaubt sind '{}' und '{}'.",
            status, STATUS_FREI, STATUS_GEBUCHT
        )));
    }
    Ok(())
}

pub fn parse_datum_str(s: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        ServiceError::Validation("Datumsformat ungültig, erwartet JJJJ-MM-TT.".to_string())
    })
}

/// Akzeptiert "HH:MM" und "HH:MM:SS".
pub fn parse_uhrzeit_str(s: &str) -> Result<NaiveTime, ServiceError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| {
            ServiceError::Validation("Uhrzeitformat ungültig, erwartet HH:MM.".to_string())
        })
}

pub fn format_datum(datum: &NaiveDate) -> String {
    datum.format("%Y-%m-%d").to_string()
}

pub fn format_uhrzeit(uhrzeit: &NaiveTime) -> String {
    uhrzeit.format("%H:%M:%S").to_string()
}

pub fn format_zeitstempel(zeit: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    format!("{}+00:00", zeit.format(TIME_FMT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datum_wird_geparst() {
        assert_eq!(
            parse_datum_str("2024-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(parse_datum_str("10.01.2024").is_err());
        assert!(parse_datum_str("").is_err());
    }

    #[test]
    fn uhrzeit_mit_und_ohne_sekunden() {
        let erwartet = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(parse_uhrzeit_str("09:00").unwrap(), erwartet);
        assert_eq!(parse_uhrzeit_str("09:00:00").unwrap(), erwartet);
        assert!(parse_uhrzeit_str("9 Uhr").is_err());
    }

    #[test]
    fn nur_bekannte_status_erlaubt() {
        assert!(assert_status_str("frei").is_ok());
        assert!(assert_status_str("gebucht").is_ok());
        assert!(assert_status_str("storniert").is_err());
    }

    #[test]
    fn formatierung_rundet_nicht() {
        let datum = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let uhrzeit = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(format_datum(&datum), "2024-01-10");
        assert_eq!(format_uhrzeit(&uhrzeit), "09:30:00");
        assert_eq!(
            format_zeitstempel(&datum.and_time(uhrzeit)),
            "2024-01-10T09:30:00.000000+00:00"
        );
    }
}
