diesel::table! {
    sessions (token, username, login_time) {
        token -> Char,
        username -> Varchar,
        login_time -> Datetime,
    }
}

diesel::table! {
    termine (id) {
        id -> Unsigned<Bigint>,
        titel -> Varchar,
        beschreibung -> Nullable<Text>,
        datum -> Date,
        uhrzeit -> Time,
        dauer_minuten -> Integer,
        patient_name -> Nullable<Varchar>,
        patient_email -> Nullable<Varchar>,
        patient_telefon -> Nullable<Varchar>,
        status -> Varchar,
        erstellt_am -> Datetime,
        aktualisiert_am -> Datetime,
    }
}

diesel::table! {
    user_groups (user_id, group_name) {
        user_id -> Unsigned<Bigint>,
        group_name -> Varchar,
    }
}

diesel::table! {
    users (id) {
        id -> Unsigned<Bigint>,
        username -> Varchar,
        password -> Char,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        is_staff -> Bool,
        is_superuser -> Bool,
    }
}

diesel::allow_tables_to_appear_in_same_query!(sessions, termine, user_groups, users);
