use qrforge_core::db::open_db_in_memory;
use qrforge_core::{
    AccountError, AccountService, NewUser, SqliteSessionRepository, SqliteUserRepository,
    UserRepository, ValidationError, SESSION_MAX_AGE_MS,
};
use qrforge_core::timestamp::now_epoch_ms;
use rusqlite::Connection;

fn service(conn: &Connection) -> AccountService<SqliteUserRepository<'_>, SqliteSessionRepository<'_>> {
    AccountService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteSessionRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn register_hashes_password_and_persists_user() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);

    let user_id = accounts
        .register(&NewUser::new("alice", "alice@example.com", "s3cret"))
        .unwrap();

    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let user = repo.get_user(user_id).unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_ne!(user.password_hash, "s3cret");
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[test]
fn duplicate_username_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();

    let err = accounts
        .register(&NewUser::new("alice", "other@example.com", "pw"))
        .unwrap_err();
    assert!(matches!(err, AccountError::UsernameTaken));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn duplicate_email_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&NewUser::new("alice", "shared@example.com", "pw"))
        .unwrap();

    let err = accounts
        .register(&NewUser::new("bob", "shared@example.com", "pw"))
        .unwrap_err();
    assert!(matches!(err, AccountError::EmailTaken));
}

#[test]
fn invalid_registration_input_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);

    let err = accounts
        .register(&NewUser::new("carol", "carol@example.com", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::Validation(ValidationError::EmptyField("password"))
    ));
}

#[test]
fn login_opens_session_and_logout_closes_it() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    let user_id = accounts
        .register(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();

    let session = accounts.login("alice", "pw").unwrap();
    assert_eq!(session.user_id, user_id);

    let current = accounts.current_user(&session.token).unwrap().unwrap();
    assert_eq!(current.id, user_id);

    assert!(accounts.logout(&session.token).unwrap());
    assert!(accounts.current_user(&session.token).unwrap().is_none());
    assert!(!accounts.logout(&session.token).unwrap());
}

#[test]
fn login_with_wrong_password_or_unknown_user_fails() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();

    assert!(matches!(
        accounts.login("alice", "nope").unwrap_err(),
        AccountError::InvalidCredentials
    ));
    assert!(matches!(
        accounts.login("mallory", "pw").unwrap_err(),
        AccountError::InvalidCredentials
    ));

    let sessions: i64 = conn
        .query_row("SELECT COUNT(*) FROM sessions;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(sessions, 0);
}

#[test]
fn stale_sessions_stop_resolving_and_are_pruned_on_login() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&NewUser::new("alice", "alice@example.com", "s3cret"))
        .unwrap();
    let stale = accounts.login("alice", "s3cret").unwrap();
    conn.execute(
        "UPDATE sessions SET created_at = ?1 WHERE token = ?2;",
        rusqlite::params![now_epoch_ms() - SESSION_MAX_AGE_MS - 1, stale.token],
    )
    .unwrap();

    assert!(accounts.current_user(&stale.token).unwrap().is_none());

    let fresh = accounts.login("alice", "s3cret").unwrap();
    assert!(accounts.current_user(&fresh.token).unwrap().is_some());
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM sessions;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
}
