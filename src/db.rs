use std::str::FromStr;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::dates;
use crate::models::user::{User, DEFAULT_USER_EMAIL, DEFAULT_USER_ID, DEFAULT_USER_NAME};

const SCHEMA: [&str; 4] = [
    "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(title) > 0),
        description TEXT,
        status TEXT NOT NULL DEFAULT 'todo'
            CHECK (status IN ('todo', 'in-progress', 'review', 'done')),
        priority TEXT NOT NULL DEFAULT 'medium'
            CHECK (priority IN ('low', 'medium', 'high')),
        user_id INTEGER NOT NULL REFERENCES users(id),
        deadline TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at)",
];

/// Opens the pool with foreign keys enforced. An in-memory database lives
/// only as long as its connection, so it gets exactly one that never expires.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

/// Creates missing tables; safe to run on every start.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Upserts the fixed default user that new tasks are assigned to.
pub async fn ensure_default_user(pool: &SqlitePool) -> Result<User, sqlx::Error> {
    let now = dates::now();

    sqlx::query(
        "INSERT INTO users (id, name, email, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(id) DO NOTHING",
    )
    .bind(DEFAULT_USER_ID)
    .bind(DEFAULT_USER_NAME)
    .bind(DEFAULT_USER_EMAIL)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(DEFAULT_USER_ID)
    .fetch_one(pool)
    .await?;

    info!("Default user ready: {}", user.name);
    Ok(user)
}

/// Schema plus default user, run once at process start.
pub async fn bootstrap(pool: &SqlitePool) -> Result<User, sqlx::Error> {
    ensure_schema(pool).await?;
    info!("Database schema ready");
    ensure_default_user(pool).await
}
