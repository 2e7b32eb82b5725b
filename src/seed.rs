use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::snippet;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for owner back-reference lookups:
    // SELECT id FROM snippet WHERE owner_id = ? ORDER BY id
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_snippet_owner_created")
        .table(snippet::Entity)
        .col(snippet::Column::OwnerId)
        .col(snippet::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    let result = db.execute_unprepared(&stmt).await;

    match result {
        Ok(_) => {
            info!("Ensured index idx_snippet_owner_created exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_snippet_owner_created: {}", e);
        }
    }

    Ok(())
}
