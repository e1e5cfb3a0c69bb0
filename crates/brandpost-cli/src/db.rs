//! Database maintenance commands.

async fn connect() -> anyhow::Result<sqlx::SqlitePool> {
    let config = brandpost_core::load_app_config()?;
    let pool_config = brandpost_db::PoolConfig::from_app_config(&config);
    Ok(brandpost_db::connect_pool(&config.database_url, pool_config).await?)
}

pub(crate) async fn run_ping() -> anyhow::Result<()> {
    let pool = connect().await?;
    brandpost_db::health_check(&pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_migrate() -> anyhow::Result<()> {
    let pool = connect().await?;
    let applied = brandpost_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}
