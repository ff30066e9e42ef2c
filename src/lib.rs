pub mod auth;
pub mod database;
pub mod error;
pub mod identity;
pub mod models;
pub mod permissions;
pub mod schema;
pub mod termine;
pub mod utils;

use diesel::{r2d2::ConnectionManager, MysqlConnection};

pub type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;
