use crate::config::Config;
use crate::db::{BookingStore, InMemoryStore, Store};

pub async fn cmd_rooms(config: &Config) -> anyhow::Result<()> {
    let rooms = if config.uses_memory_store() {
        InMemoryStore::new().all_rooms().await?
    } else {
        Store::new(&config.general.database_path)
            .await?
            .all_rooms()
            .await?
    };

    if rooms.is_empty() {
        println!("No rooms configured.");
        return Ok(());
    }

    println!("Rooms ({} total)", rooms.len());
    println!("{:-<40}", "");

    for room in rooms {
        println!("  {:>3}  {}", room.id, room.room_name);
    }

    Ok(())
}
