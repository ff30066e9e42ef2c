use actix_web::web;
use diesel::{r2d2::ConnectionManager, MysqlConnection};
use r2d2::PooledConnection;

use crate::{error::ServiceError, DbPool};

pub type DbConn = PooledConnection<ConnectionManager<MysqlConnection>>;

pub fn get_db_conn(pool: &web::Data<DbPool>) -> Result<DbConn, ServiceError> {
    pool.get().map_err(ServiceError::from)
}
