use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::comic;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("comics_server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Create secondary indexes the schema sync does not manage.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Lookups by display name:
    // SELECT * FROM comic WHERE name = ? ORDER BY id LIMIT 1
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_comic_name")
        .table(comic::Entity)
        .col(comic::Column::Name)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_comic_name exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_comic_name: {}", e);
        }
    }

    Ok(())
}
