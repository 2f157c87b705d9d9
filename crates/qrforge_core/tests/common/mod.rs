#![allow(dead_code)]

use qrforge_core::{
    AccountService, NewUser, QrService, SqliteQrCodeRepository, SqliteSessionRepository,
    SqliteStatisticsRepository, SqliteUserRepository, UserId,
};
use rusqlite::Connection;

pub fn register(conn: &Connection, username: &str) -> UserId {
    AccountService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteSessionRepository::try_new(conn).unwrap(),
    )
    .register(&NewUser::new(
        username,
        format!("{username}@example.com"),
        "password",
    ))
    .unwrap()
}

pub fn qr_service(
    conn: &Connection,
) -> QrService<SqliteQrCodeRepository<'_>, SqliteStatisticsRepository<'_>> {
    QrService::new(
        SqliteQrCodeRepository::try_new(conn).unwrap(),
        SqliteStatisticsRepository::try_new(conn).unwrap(),
    )
}
