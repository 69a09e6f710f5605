use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    if config.uses_memory_store() {
        println!("In-memory store configured, nothing to migrate.");
        return Ok(());
    }

    let store = Store::with_pool_options(&config.general.database_path, 1, 1).await?;
    store.ping().await?;

    println!("✓ Migrations applied to {}", config.general.database_path);
    Ok(())
}
