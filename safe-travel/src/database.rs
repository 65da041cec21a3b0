use crate::errors::app_error::{AppError, AppResult};
use diesel::SqliteConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::info;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applied to every connection the pool hands out
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        apply_pragmas(connection).map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn apply_pragmas(connection: &mut SqliteConnection) -> diesel::QueryResult<()> {
    connection.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
}

pub fn build_pool(database_url: &str) -> AppResult<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .test_on_check_out(true)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(AppError::Pool)
}

pub fn run_migrations(connection: &mut SqliteConnection) -> AppResult<()> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|error| AppError::Internal(format!("Could not run migrations: {error}")))?;

    if !applied.is_empty() {
        info!("Applied {} migration(s)", applied.len());
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_connection() -> SqliteConnection {
    use diesel::Connection;

    let mut connection =
        SqliteConnection::establish(":memory:").expect("Could not open in-memory database");
    apply_pragmas(&mut connection).expect("Could not apply pragmas");
    run_migrations(&mut connection).expect("Could not run migrations");
    connection
}
