use clap::{Parser, Subcommand};
use keepintouch_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "keepintouch", version, about = "Keep In Touch CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Friend management
    Friend {
        #[command(subcommand)]
        action: commands::friend::FriendAction,
    },
    /// Interaction log
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Friends past their due date
    Overdue,
    /// Relationship health
    Stats,
    /// Upcoming birthdays
    Birthdays {
        /// Lookahead in days (defaults to reminders.birthday_lookahead_days)
        #[arg(long)]
        days: Option<i64>,
    },
    /// Best weekday to reach out to a friend
    Suggest {
        /// Friend ID
        friend_id: String,
    },
    /// Tier catalog management
    Tier {
        #[command(subcommand)]
        action: commands::tier::TierAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    // KEEPINTOUCH_LOG wins over the configured filter.
    let filter = EnvFilter::try_from_env("KEEPINTOUCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Friend { action } => commands::friend::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Overdue => commands::stats::overdue(),
        Commands::Stats => commands::stats::health(),
        Commands::Birthdays { days } => commands::stats::birthdays(days),
        Commands::Suggest { friend_id } => commands::stats::suggest(&friend_id),
        Commands::Tier { action } => commands::tier::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
