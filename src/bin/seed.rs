//! Legt Demo-Benutzer und Demo-Termine an. Bereits vorhandene Datensätze
//! (Unique-Key-Treffer) werden gemeldet und übersprungen, der Rest des
//! Durchlaufs läuft weiter.

use anyhow::Context;
use blake2::{Blake2b512, Digest};
use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing_subscriber::EnvFilter;

use terminverwaltung::models::termine::{NewTermin, STATUS_FREI, STATUS_GEBUCHT};
use terminverwaltung::models::user_groups::UserGroup;
use terminverwaltung::models::users::NewUser;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let conn_url = std::env::var("DATABASE_URL").context("DATABASE_URL not found")?;
    let mut conn = MysqlConnection::establish(&conn_url).context("Datenbankverbindung")?;

    seed_users(&mut conn)?;
    seed_termine(&mut conn)?;

    Ok(())
}

fn ist_duplikat(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn hash_password(password: &str) -> String {
    format!("{:x}", Blake2b512::digest(password.as_bytes()))
}

fn seed_users(conn: &mut MysqlConnection) -> anyhow::Result<()> {
    use terminverwaltung::schema::{user_groups, users};

    let demo_users = [
        ("admin", "admin123", "admin@example.com", "Admin", "User", true, "admin"),
        ("patient1", "patient123", "patient1@example.com", "Max", "Mustermann", false, "patient"),
        ("patient2", "patient123", "patient2@example.com", "Erika", "Musterfrau", false, "patient"),
    ];

    for (username, password, email, first_name, last_name, is_staff, group) in demo_users {
        let neu = NewUser {
            username: username.to_string(),
            password: hash_password(password),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_staff,
            is_superuser: false,
        };

        match diesel::insert_into(users::table).values(&neu).execute(conn) {
            Ok(_) => tracing::info!(username, "Benutzer erstellt"),
            Err(err) if ist_duplikat(&err) => {
                tracing::info!(username, "Benutzer existiert bereits")
            }
            Err(err) => return Err(err).context("Benutzer anlegen"),
        }

        let user_id = users::table
            .filter(users::username.eq(username))
            .select(users::id)
            .first::<u64>(conn)
            .context("Benutzer nachschlagen")?;

        let zuordnung = UserGroup {
            user_id,
            group_name: group.to_string(),
        };
        match diesel::insert_into(user_groups::table)
            .values(&zuordnung)
            .execute(conn)
        {
            Ok(_) | Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {}
            Err(err) => return Err(err).context("Gruppenzuordnung anlegen"),
        }
    }

    tracing::info!("Benutzer und Gruppen erfolgreich erstellt");
    Ok(())
}

struct SeedTermin {
    titel: &'static str,
    beschreibung: &'static str,
    datum: NaiveDate,
    uhrzeit: &'static str,
    dauer_minuten: i32,
    patient: Option<(&'static str, &'static str, &'static str)>,
}

fn seed_termine(conn: &mut MysqlConnection) -> anyhow::Result<()> {
    use terminverwaltung::schema::termine;
    use terminverwaltung::utils::parse_uhrzeit_str;

    let heute = Utc::now().date_naive();
    let morgen = heute + Duration::days(1);
    let uebermorgen = heute + Duration::days(2);
    let naechste_woche = heute + Duration::days(7);

    let eintraege = [
        SeedTermin {
            titel: "Routineuntersuchung",
            beschreibung: "Allgemeine Untersuchung",
            datum: heute,
            uhrzeit: "09:00",
            dauer_minuten: 30,
            patient: None,
        },
        SeedTermin {
            titel: "Vorsorgeuntersuchung",
            beschreibung: "Vorsorge-Checkup",
            datum: heute,
            uhrzeit: "10:00",
            dauer_minuten: 45,
            patient: None,
        },
        SeedTermin {
            titel: "Beratungsgespräch",
            beschreibung: "Beratung zu Behandlungsoptionen",
            datum: morgen,
            uhrzeit: "14:00",
            dauer_minuten: 30,
            patient: None,
        },
        SeedTermin {
            titel: "Routineuntersuchung",
            beschreibung: "Allgemeine Untersuchung",
            datum: morgen,
            uhrzeit: "15:00",
            dauer_minuten: 30,
            patient: None,
        },
        SeedTermin {
            titel: "Spezialuntersuchung",
            beschreibung: "Spezielle Diagnostik",
            datum: uebermorgen,
            uhrzeit: "11:00",
            dauer_minuten: 60,
            patient: None,
        },
        SeedTermin {
            titel: "Routineuntersuchung",
            beschreibung: "Allgemeine Untersuchung",
            datum: naechste_woche,
            uhrzeit: "09:30",
            dauer_minuten: 30,
            patient: None,
        },
        SeedTermin {
            titel: "Kontrolluntersuchung",
            beschreibung: "Nachkontrolle",
            datum: morgen,
            uhrzeit: "16:00",
            dauer_minuten: 30,
            patient: Some(("Max Mustermann", "patient1@example.com", "01234567890")),
        },
        SeedTermin {
            titel: "Behandlung",
            beschreibung: "Folgebehandlung",
            datum: uebermorgen,
            uhrzeit: "14:30",
            dauer_minuten: 45,
            patient: Some(("Erika Musterfrau", "patient2@example.com", "09876543210")),
        },
    ];

    let mut erstellt = 0;
    for eintrag in eintraege {
        let jetzt = Utc::now().naive_utc();
        let uhrzeit = parse_uhrzeit_str(eintrag.uhrzeit)
            .map_err(|err| anyhow::anyhow!("Seed-Uhrzeit: {}", err))?;
        let status = if eintrag.patient.is_some() {
            STATUS_GEBUCHT
        } else {
            STATUS_FREI
        };
        let neu = NewTermin {
            titel: eintrag.titel.to_string(),
            beschreibung: Some(eintrag.beschreibung.to_string()),
            datum: eintrag.datum,
            uhrzeit,
            dauer_minuten: eintrag.dauer_minuten,
            patient_name: eintrag.patient.map(|(name, _, _)| name.to_string()),
            patient_email: eintrag.patient.map(|(_, email, _)| email.to_string()),
            patient_telefon: eintrag.patient.map(|(_, _, telefon)| telefon.to_string()),
            status: status.to_string(),
            erstellt_am: jetzt,
            aktualisiert_am: jetzt,
        };

        match diesel::insert_into(termine::table).values(&neu).execute(conn) {
            Ok(_) => erstellt += 1,
            Err(err) if ist_duplikat(&err) => tracing::info!(
                "Termin für {} um {} existiert bereits",
                eintrag.datum,
                eintrag.uhrzeit
            ),
            Err(err) => return Err(err).context("Termin anlegen"),
        }
    }

    tracing::info!(erstellt, "Termine wurden erstellt");
    Ok(())
}
