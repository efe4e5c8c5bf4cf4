//! Bikeshop CLI
//!
//! Command-line front end for the owner, bike and revision registry

use clap::{Parser, Subcommand};

use bikeshop_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bikeshop")]
#[command(about = "Bikeshop - owners, bikes and maintenance revisions", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Owner operations
    Owner(commands::owner::OwnerArgs),
    /// Bike operations
    Bike(commands::bike::BikeArgs),
    /// Revision operations
    Revision(commands::revision::RevisionArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.global.log_json {
        init(Profile::Production);
    } else if std::env::var_os("RUST_LOG").is_some() {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Owner(args) => commands::owner::execute(&cli.global, args),
        Commands::Bike(args) => commands::bike::execute(&cli.global, args),
        Commands::Revision(args) => commands::revision::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error [{}] {}", e.code(), e.message());
        std::process::exit(1);
    }
}
