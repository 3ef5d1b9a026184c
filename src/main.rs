use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use appointment_scheduler::{commands, config, web};

/// Service appointment scheduler: weekly hours, bookable slots and bookings
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List bookable start times for a service on a date
    ///
    /// Examples:
    ///   slots -s 1 --date 2030-01-07   # service 1 on that date
    ///   slots -s 2 --day tuesday       # service 2 next Tuesday
    Slots {
        /// Service id from the config catalog
        #[arg(short = 's', long)]
        service: String,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Next occurrence of this weekday instead of --date
        #[arg(long)]
        day: Option<String>,

        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Validate and print a booking against the configured appointments
    Book {
        /// Service id from the config catalog
        #[arg(short = 's', long)]
        service: String,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        time: String,

        /// Customer name
        #[arg(short = 'n', long)]
        name: String,

        /// Customer e-mail
        #[arg(short = 'e', long)]
        email: String,

        /// Customer phone (optional)
        #[arg(short = 'p', long)]
        phone: Option<String>,

        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Validate the config file and print the weekly schedule
    Check {
        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Start the booking API and dashboard
    Serve {
        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,

        /// Listen address (e.g. "0.0.0.0:3000")
        #[arg(short = 'a', long, default_value = "0.0.0.0:3009")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Serve { config, addr } => {
            let cfg = config::load_config(config)?;
            web::serve(cfg, addr).await?;
        }
        Command::Slots {
            service,
            date,
            day,
            config,
        } => {
            commands::run_slots(config, service, date, day)?;
        }
        Command::Book {
            service,
            date,
            time,
            name,
            email,
            phone,
            config,
        } => {
            commands::run_book(config, service, date, time, name, email, phone)?;
        }
        Command::Check { config } => {
            commands::run_check(config)?;
        }
    }

    Ok(())
}
