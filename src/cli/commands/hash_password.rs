//! Hash a password for seeding or resetting a user row by hand.

use crate::config::Config;
use crate::db::hash_password;

pub async fn cmd_hash_password(config: &Config, password: &str) -> anyhow::Result<()> {
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let password = password.to_string();
    let security = config.security.clone();
    let hash =
        tokio::task::spawn_blocking(move || hash_password(&password, Some(&security))).await??;

    println!("{hash}");
    Ok(())
}
