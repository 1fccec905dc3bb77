use sqlx::sqlite::SqlitePool;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

async fn has_table(pool: &SqlitePool, table_name: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(1) FROM sqlite_master WHERE type='table' AND name = ?1",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Applies the embedded migrations on a dedicated pool, closed afterwards.
pub async fn run_migrations(db_url: &str) -> anyhow::Result<()> {
    let pool = SqlitePool::connect(db_url).await?;

    if !has_table(&pool, "_sqlx_migrations").await? {
        tracing::info!("Fresh database, creating schema");
    }

    MIGRATOR.run(&pool).await?;
    pool.close().await;

    tracing::info!("Database migrations applied successfully");
    Ok(())
}
