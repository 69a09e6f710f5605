//! Command-line interface for the bookings server.

mod commands;

use clap::{Parser, Subcommand};

/// Bookings - bed and breakfast reservation site
#[derive(Parser)]
#[command(name = "bookings")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Apply database migrations and exit
    Migrate,

    /// Print an argon2 hash for a password
    HashPassword {
        /// Plain-text password
        password: String,
    },

    /// List rooms
    #[command(alias = "ls")]
    Rooms,

    /// Update a user's name or email
    User {
        /// User id
        id: i32,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

pub use commands::*;
