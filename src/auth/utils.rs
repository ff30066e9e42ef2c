use blake2::{Blake2b512, Digest};
use chrono::NaiveDateTime;

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Blake2b512::digest(password.as_bytes()))
}

pub fn issue_token(username: &str, login_time: &NaiveDateTime) -> String {
    let basis = format!("{}:{}", username, login_time);
    format!("{:x}", Blake2b512::digest(basis.as_bytes()))
}
