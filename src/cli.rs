//! Command-line interface for the storekeep binary.

use clap::{Parser, Subcommand};

/// Storekeep - admin panel for a small web shop
#[derive(Parser)]
#[command(name = "storekeep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the admin panel server
    #[command(alias = "-s", alias = "--serve")]
    Serve,

    /// Create a default config file
    #[command(alias = "--init")]
    Init,

    /// Create a panel account (admin by default)
    CreateAdmin {
        /// Username for the new account
        username: String,

        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,

        /// Create the account without admin rights
        #[arg(long)]
        no_admin: bool,
    },

    /// Rotate an account's password
    SetPassword {
        /// Username of the account
        username: String,

        /// New password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
}
