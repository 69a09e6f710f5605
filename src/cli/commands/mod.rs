mod hash_password;
mod init;
mod migrate;
mod rooms;
mod user;

pub use hash_password::cmd_hash_password;
pub use init::cmd_init;
pub use migrate::cmd_migrate;
pub use rooms::cmd_rooms;
pub use user::{ProfileChanges, cmd_update_user};
