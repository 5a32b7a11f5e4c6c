pub mod entities;
mod roast_repository;

pub use roast_repository::RoastRepository;

use entities::{roast, Roast};
use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::time::Duration;
use zodiac_roast_errors::AppError;

pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// Opens a private in-memory SQLite database with the schema applied.
///
/// The pool is pinned to a single connection: every SQLite in-memory
/// connection is its own database.
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    run_migrations(&db).await?;
    Ok(db)
}

/// Creates the `roasts` table and its creation-time index if missing.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut create_table = schema.create_table_from_entity(Roast);
    create_table.if_not_exists();
    db.execute(backend.build(&create_table)).await?;

    let create_index = Index::create()
        .if_not_exists()
        .name("idx_roasts_created_at")
        .table(Roast)
        .col(roast::Column::CreatedAt)
        .to_owned();
    db.execute(backend.build(&create_index)).await?;

    Ok(())
}

pub fn db_error(err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotFound(_) => AppError::NotFound,
        other => {
            tracing::error!("Database error: {}", other);
            AppError::Database(other.to_string())
        }
    }
}
