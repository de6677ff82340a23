use clap::{Parser, Subcommand};

use crate::auth::Role;

#[derive(Parser, Debug)]
#[command(name = "alumni-tracker", about = "Alumni and job history tracking service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply migrations and start the HTTP server (the default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Seed a login account
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
}

impl Cli {
    pub fn command(self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
