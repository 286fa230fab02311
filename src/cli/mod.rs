pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "snack-catalog-api")]
#[command(about = "Snack catalog and review API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API (default when no command is given)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Create missing tables in the configured database")]
    Migrate,

    #[command(about = "Insert the default categories into an empty catalog")]
    Seed,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or_else(|| Commands::Serve(Default::default())) {
        Commands::Serve(args) => commands::serve::handle(args).await,
        Commands::Migrate => commands::database::migrate().await,
        Commands::Seed => commands::database::seed().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_command_means_serve() {
        let cli = Cli::try_parse_from(["snack-catalog-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from(["snack-catalog-api", "serve", "--port", "8080", "--memory"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.memory);
            }
            _ => panic!("expected serve"),
        }
    }
}
