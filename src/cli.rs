use clap::{Parser, Subcommand};

/// Job application tracker backend
#[derive(Debug, Parser)]
#[command(name = "job-tracker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending migrations, then serve HTTP (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}
